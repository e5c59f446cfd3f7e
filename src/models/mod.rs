// src/models/mod.rs

//! Domain models for the crawler application.

mod config;
mod problem;

// Re-export all public types
pub use config::{Config, CrawlerConfig, PacingConfig};
pub use problem::{CrawlStats, ProblemDetail, ProblemIndex, ProblemStat, StatStatusPair};
