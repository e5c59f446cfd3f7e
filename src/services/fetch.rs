// src/services/fetch.rs

//! HTTP fetching with bounded retry.
//!
//! One request is in flight at any time. Every failed attempt is classified:
//! throttling (429) and transport-level trouble (network error, timeout, 5xx)
//! are retried with the delay the pacing policy hands back; a payload that
//! decoded into the wrong shape is not retried at all.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::time::Instant;

use crate::error::{AppError, Result};
use crate::models::{Config, ProblemDetail, ProblemIndex, ProblemStat};
use crate::pipeline::{AttemptOutcome, RatePolicy};
use crate::services::Site;

/// Source of index and detail payloads, as seen by the crawl driver.
#[async_trait]
pub trait ProblemSource {
    async fn fetch_index(&self, pace: &mut RatePolicy) -> Result<ProblemIndex>;
    async fn fetch_detail(&self, stat: &ProblemStat, pace: &mut RatePolicy)
    -> Result<ProblemDetail>;
}

/// Fetches problem data from one site variant.
pub struct ProblemFetcher {
    client: Client,
    site: Box<dyn Site>,
    max_attempts: u32,
    slow_threshold: Duration,
}

impl ProblemFetcher {
    /// Create a fetcher with a client configured from `config`.
    pub fn new(config: &Config, site: Box<dyn Site>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.crawler.user_agent)
            .timeout(Duration::from_secs(config.crawler.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            site,
            max_attempts: config.pacing.max_attempts,
            slow_threshold: Duration::from_secs(config.pacing.slow_response_secs),
        })
    }

    /// Run one attempt: send, check status, decode.
    async fn attempt(context: &str, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::throttled(context));
        }
        let response = response.error_for_status()?;
        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::malformed(context, e))
    }
}

#[async_trait]
impl ProblemSource for ProblemFetcher {
    async fn fetch_index(&self, pace: &mut RatePolicy) -> Result<ProblemIndex> {
        let url = self.site.index_url();
        let value = retry_with_pacing(
            "problem index",
            self.max_attempts,
            self.slow_threshold,
            pace,
            || Self::attempt("problem index", self.client.get(&url)),
        )
        .await?;

        serde_json::from_value(value).map_err(|e| AppError::malformed("problem index", e))
    }

    async fn fetch_detail(
        &self,
        stat: &ProblemStat,
        pace: &mut RatePolicy,
    ) -> Result<ProblemDetail> {
        let url = self.site.graphql_url();
        let body = self.site.detail_body(&stat.slug);

        let value = retry_with_pacing(
            &stat.slug,
            self.max_attempts,
            self.slow_threshold,
            pace,
            || Self::attempt(stat.slug.as_str(), self.client.post(&url).json(&body)),
        )
        .await?;

        ProblemDetail::from_value(&stat.slug, value)
    }
}

/// Retry `op` up to `max_attempts` times, sleeping the policy-supplied delay
/// between attempts. Non-retryable errors surface immediately; a successful
/// attempt records `Slow` or `Success` into the policy based on elapsed time.
async fn retry_with_pacing<T, F, Fut>(
    context: &str,
    max_attempts: u32,
    slow_threshold: Duration,
    pace: &mut RatePolicy,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1u32;
    loop {
        let started = Instant::now();
        match op().await {
            Ok(value) => {
                let outcome = if started.elapsed() > slow_threshold {
                    AttemptOutcome::Slow
                } else {
                    AttemptOutcome::Success
                };
                pace.next_delay(outcome);
                return Ok(value);
            }
            Err(err) if err.retryable() => {
                let outcome = match err {
                    AppError::Throttled(_) => AttemptOutcome::Throttled,
                    _ => AttemptOutcome::TransientError,
                };
                let delay = pace.next_delay(outcome);

                if attempt >= max_attempts {
                    log::warn!("{context}: giving up after {attempt} attempts: {err}");
                    return Err(err);
                }

                log::warn!(
                    "{context}: attempt {attempt}/{max_attempts} failed ({err}), \
                     retrying in {}s",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
