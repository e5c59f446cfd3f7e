//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Walk the problem index and persist each problem
//! - `RatePolicy`: Adaptive pacing state owned by the driver

pub mod crawl;
pub mod pace;

pub use crawl::{CrawlOptions, run_crawler};
pub use pace::{AttemptOutcome, RatePolicy};
