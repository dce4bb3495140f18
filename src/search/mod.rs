//! Query matching and ranking over a loaded index

pub mod matcher;
pub mod scoring;

pub use matcher::Searcher;
pub use scoring::{rank, ScoreBoard, TokenScores};
