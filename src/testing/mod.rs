//! Testing infrastructure for correctness verification
//!
//! Reusable invariant checkers that run a [`Searcher`](crate::search::Searcher)
//! with a list of queries.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use docsearch::testing::prelude::*;
//!
//! let violations = check_all_invariants(&searcher, &["plot", "gpm dpr"], &default_invariants());
//! assert!(violations.is_empty());
//! ```
//!
//! # Invariants
//!
//! - **NoDanglingReferences**: hits only name registered documents
//! - **EmptyQueryFindsNothing**: token-free queries return no hits
//! - **IdempotentSearch**: repeated queries give identical output
//! - **MonotonicScoring**: adding query words never lowers a score
//! - **RankingOrder**: hits sorted by score, ties by document id

pub mod invariants;

pub use invariants::{
    check_all_invariants, default_invariants, EmptyQueryFindsNothing, IdempotentSearch,
    Invariant, MonotonicScoring, NoDanglingReferences, RankingOrder, Violation,
};

/// Prelude for easy imports
pub mod prelude {
    pub use super::invariants::{check_all_invariants, default_invariants, Invariant, Violation};
}
