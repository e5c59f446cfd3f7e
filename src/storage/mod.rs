//! Storage layer for problem persistence.
//!
//! One JSON file per problem in the output directory:
//!
//! ```text
//! problems/
//! ├── 1.two-sum.json
//! ├── 2.add-two-numbers.json
//! └── 3.longest-substring-without-repeating-characters.json
//! ```

pub mod local;

// Re-export for convenience
pub use local::ProblemStore;
