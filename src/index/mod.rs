//! Document registry and term tables, plus the ways to build, load and
//! store them.

pub mod builder;
pub mod loader;
pub mod schema;
pub mod search_index;
pub mod snapshot;
pub mod term_table;

pub use builder::{extract_title, IndexBuilder};
pub use loader::IndexFormat;
pub use schema::{IndexFile, PostingEntry};
pub use search_index::{IndexStats, SearchIndex};
pub use snapshot::{IndexSnapshot, SNAPSHOT_VERSION};
pub use term_table::TermTable;
