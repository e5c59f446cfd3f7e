// src/models/problem.rs

//! Problem catalog wire types.
//!
//! Field names mirror the remote listing endpoint (`/api/problems/all/`),
//! which nests per-problem identity under `stat_status_pairs[].stat`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// The full problem listing as returned by the index endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProblemIndex {
    #[serde(default)]
    pub stat_status_pairs: Vec<StatStatusPair>,

    /// Remaining top-level fields (user info, category, ...), passed through.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ProblemIndex {
    /// True if the listing carries no problems at all.
    pub fn is_empty(&self) -> bool {
        self.stat_status_pairs.is_empty()
    }

    /// Problem stats in ascending id order, duplicate ids removed.
    ///
    /// The remote lists newest-first; the crawl walks oldest-first so file
    /// numbering fills in from 1.
    pub fn sorted_stats(&self) -> Vec<&ProblemStat> {
        let mut stats: Vec<&ProblemStat> =
            self.stat_status_pairs.iter().map(|p| &p.stat).collect();
        stats.sort_by_key(|s| s.question_id);
        stats.dedup_by_key(|s| s.question_id);
        stats
    }
}

/// One entry of `stat_status_pairs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatStatusPair {
    pub stat: ProblemStat,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Identity and basic attributes of one problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemStat {
    pub question_id: u64,

    #[serde(rename = "question__title", default)]
    pub title: String,

    #[serde(rename = "question__title_slug")]
    pub slug: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Full per-problem payload from the GraphQL detail endpoint.
///
/// The body is persisted verbatim, so this wraps the raw JSON after checking
/// it actually carries a question. Unknown remote fields survive untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ProblemDetail(Value);

impl ProblemDetail {
    /// Validate the response shape: `data.question` must be a non-null object.
    pub fn from_value(slug: &str, value: Value) -> Result<Self> {
        match value.pointer("/data/question") {
            Some(Value::Object(_)) => Ok(Self(value)),
            Some(Value::Null) | None => Err(AppError::malformed(
                slug,
                "response has no data.question object",
            )),
            Some(other) => Err(AppError::malformed(
                slug,
                format!("data.question is not an object: {other}"),
            )),
        }
    }

    /// The question object inside the payload.
    pub fn question(&self) -> &Value {
        // from_value guarantees presence
        &self.0["data"]["question"]
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Counters accumulated across one crawl run.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl CrawlStats {
    pub fn begin() -> Self {
        let now = Utc::now();
        Self {
            start_time: now,
            end_time: now,
            fetched: 0,
            skipped: 0,
            failed: 0,
        }
    }

    pub fn finish(&mut self) {
        self.end_time = Utc::now();
    }

    pub fn total(&self) -> usize {
        self.fetched + self.skipped + self.failed
    }
}
