// src/pipeline/crawl.rs

//! Crawl driver.
//!
//! Walks the problem index in ascending id order, strictly sequentially:
//! skip items already on disk (unless update mode), fetch the rest one at a
//! time with the pacing delay between requests, write each result, and keep
//! going when a single item fails. Ctrl+C stops the run between items.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AppError, Result};
use crate::models::{Config, CrawlStats, ProblemIndex, ProblemStat};
use crate::pipeline::RatePolicy;
use crate::services::{ProblemFetcher, ProblemSource, SiteKind};
use crate::storage::ProblemStore;

/// Per-run options from the command line.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Directory receiving one JSON file per problem
    pub output_dir: PathBuf,
    /// Optional local metadata snapshot, used instead of the live listing
    pub metadata_file: Option<PathBuf>,
    /// Re-fetch and overwrite problems already on disk
    pub update: bool,
    /// Inclusive lower id bound
    pub start: Option<u64>,
    /// Inclusive upper id bound
    pub end: Option<u64>,
}

/// Run a full crawl against the selected site.
pub async fn run_crawler(
    config: &Config,
    site: SiteKind,
    options: &CrawlOptions,
) -> Result<CrawlStats> {
    let fetcher = ProblemFetcher::new(config, site.site())?;
    let store = ProblemStore::new(&options.output_dir);
    let mut pace = RatePolicy::new(&config.pacing);
    let cancel = shutdown_flag();

    let index = obtain_index(&fetcher, options.metadata_file.as_deref(), &mut pace).await?;
    log::info!(
        "Index loaded: {} problems known to {}",
        index.stat_status_pairs.len(),
        site.host()
    );

    let stats = crawl_index(&fetcher, &store, &index, options, &mut pace, &cancel).await?;

    log::info!(
        "Crawl complete in {}s: {} fetched, {} skipped, {} failed",
        (stats.end_time - stats.start_time).num_seconds(),
        stats.fetched,
        stats.skipped,
        stats.failed
    );

    Ok(stats)
}

/// Obtain the problem index, from a snapshot file if one was given, otherwise
/// from the live listing endpoint. Failure here is fatal to the run.
async fn obtain_index(
    source: &dyn ProblemSource,
    snapshot: Option<&Path>,
    pace: &mut RatePolicy,
) -> Result<ProblemIndex> {
    let index = match snapshot {
        Some(path) => ProblemStore::load_index(path).await.map_err(|e| {
            AppError::startup(format!(
                "cannot load metadata snapshot {}: {e}",
                path.display()
            ))
        })?,
        None => source
            .fetch_index(pace)
            .await
            .map_err(|e| AppError::startup(format!("cannot fetch problem listing: {e}")))?,
    };

    if index.is_empty() {
        return Err(AppError::startup("problem listing is empty"));
    }
    Ok(index)
}

/// Crawl every candidate problem in the index.
async fn crawl_index(
    source: &dyn ProblemSource,
    store: &ProblemStore,
    index: &ProblemIndex,
    options: &CrawlOptions,
    pace: &mut RatePolicy,
    cancel: &AtomicBool,
) -> Result<CrawlStats> {
    let candidates: Vec<&ProblemStat> = index
        .sorted_stats()
        .into_iter()
        .filter(|s| in_range(s.question_id, options.start, options.end))
        .collect();

    log::info!("{} candidate problems in range", candidates.len());
    let mut stats = CrawlStats::begin();

    for stat in candidates {
        if cancel.load(Ordering::Relaxed) {
            log::warn!("Cancellation requested, stopping before problem {}", stat.question_id);
            break;
        }

        if !store.should_fetch(stat.question_id, &stat.slug, options.update) {
            log::debug!(
                "Skipping {} (already on disk)",
                ProblemStore::file_name(stat.question_id, &stat.slug)
            );
            stats.skipped += 1;
            continue;
        }

        log::info!("Fetching {}. {}", stat.question_id, stat.title);
        match source.fetch_detail(stat, pace).await {
            Ok(detail) => match store.write(stat.question_id, &stat.slug, &detail).await {
                Ok(path) => {
                    log::debug!("Wrote {}", path.display());
                    stats.fetched += 1;
                }
                Err(e) => {
                    log::error!("Failed to write problem {}: {e}", stat.question_id);
                    stats.failed += 1;
                }
            },
            Err(e) => {
                log::error!("Failed to fetch problem {}: {e}", stat.question_id);
                stats.failed += 1;
            }
        }

        // Pacing wait between requests; skipped items issue no request and
        // trigger no wait.
        tokio::time::sleep(pace.current_delay()).await;
    }

    stats.finish();
    Ok(stats)
}

/// Inclusive range check with open-ended bounds.
fn in_range(id: u64, start: Option<u64>, end: Option<u64>) -> bool {
    start.is_none_or(|s| id >= s) && end.is_none_or(|e| id <= e)
}

/// Spawn a Ctrl+C listener that flips the cancellation flag.
fn shutdown_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handle = Arc::clone(&flag);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Ctrl+C received, finishing the current item then stopping");
            handle.store(true, Ordering::Relaxed);
        }
    });
    flag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PacingConfig;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serves a fixed id set; listed ids in `malformed` yield a permanent
    /// error instead of a payload.
    struct FakeSource {
        ids: Vec<u64>,
        malformed: HashSet<u64>,
        detail_calls: Mutex<Vec<u64>>,
    }

    impl FakeSource {
        fn new(ids: &[u64]) -> Self {
            Self {
                ids: ids.to_vec(),
                malformed: HashSet::new(),
                detail_calls: Mutex::new(Vec::new()),
            }
        }

        fn with_malformed(mut self, ids: &[u64]) -> Self {
            self.malformed = ids.iter().copied().collect();
            self
        }

        fn calls(&self) -> Vec<u64> {
            self.detail_calls.lock().unwrap().clone()
        }

        fn index(&self) -> ProblemIndex {
            let pairs: Vec<serde_json::Value> = self
                .ids
                .iter()
                .map(|id| {
                    json!({
                        "stat": {
                            "question_id": id,
                            "question__title": format!("Problem {id}"),
                            "question__title_slug": format!("problem-{id}")
                        }
                    })
                })
                .collect();
            serde_json::from_value(json!({ "stat_status_pairs": pairs })).unwrap()
        }
    }

    #[async_trait]
    impl ProblemSource for FakeSource {
        async fn fetch_index(&self, _pace: &mut RatePolicy) -> crate::error::Result<ProblemIndex> {
            Ok(self.index())
        }

        async fn fetch_detail(
            &self,
            stat: &ProblemStat,
            _pace: &mut RatePolicy,
        ) -> crate::error::Result<crate::models::ProblemDetail> {
            self.detail_calls.lock().unwrap().push(stat.question_id);
            if self.malformed.contains(&stat.question_id) {
                return Err(AppError::malformed(stat.slug.as_str(), "no data.question"));
            }
            crate::models::ProblemDetail::from_value(
                &stat.slug,
                json!({ "data": { "question": { "titleSlug": stat.slug } } }),
            )
        }
    }

    fn options(dir: &TempDir) -> CrawlOptions {
        CrawlOptions {
            output_dir: dir.path().to_path_buf(),
            metadata_file: None,
            update: false,
            start: None,
            end: None,
        }
    }

    fn pace() -> RatePolicy {
        RatePolicy::new(&PacingConfig::default())
    }

    async fn run(
        source: &FakeSource,
        dir: &TempDir,
        opts: &CrawlOptions,
    ) -> crate::error::Result<CrawlStats> {
        let store = ProblemStore::new(dir.path());
        let cancel = AtomicBool::new(false);
        crawl_index(source, &store, &source.index(), opts, &mut pace(), &cancel).await
    }

    #[test]
    fn in_range_open_and_closed_bounds() {
        assert!(in_range(5, None, None));
        assert!(in_range(5, Some(5), Some(5)));
        assert!(!in_range(5, Some(6), None));
        assert!(!in_range(5, None, Some(4)));
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_everything_on_first_run() {
        let source = FakeSource::new(&[1, 2, 3]);
        let dir = TempDir::new().unwrap();

        let stats = run(&source, &dir, &options(&dir)).await.unwrap();
        assert_eq!((stats.fetched, stats.skipped, stats.failed), (3, 0, 0));
        assert_eq!(source.calls(), vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn skips_existing_file_without_update() {
        let source = FakeSource::new(&[1, 2, 3]);
        let dir = TempDir::new().unwrap();
        let store = ProblemStore::new(dir.path());

        // Pre-seed problem 2
        let detail = crate::models::ProblemDetail::from_value(
            "problem-2",
            json!({ "data": { "question": { "titleSlug": "problem-2" } } }),
        )
        .unwrap();
        store.write(2, "problem-2", &detail).await.unwrap();

        let mut opts = options(&dir);
        opts.start = Some(1);
        opts.end = Some(3);
        let stats = run(&source, &dir, &opts).await.unwrap();

        assert_eq!((stats.fetched, stats.skipped, stats.failed), (2, 1, 0));
        assert_eq!(source.calls(), vec![1, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn second_run_is_idempotent() {
        let source = FakeSource::new(&[1, 2]);
        let dir = TempDir::new().unwrap();

        let first = run(&source, &dir, &options(&dir)).await.unwrap();
        assert_eq!(first.fetched, 2);

        let second = run(&source, &dir, &options(&dir)).await.unwrap();
        assert_eq!((second.fetched, second.skipped, second.failed), (0, 2, 0));
        // No detail requests beyond the first run's
        assert_eq!(source.calls(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn update_mode_refetches_existing() {
        let source = FakeSource::new(&[1]);
        let dir = TempDir::new().unwrap();

        run(&source, &dir, &options(&dir)).await.unwrap();

        let mut opts = options(&dir);
        opts.update = true;
        let stats = run(&source, &dir, &opts).await.unwrap();
        assert_eq!((stats.fetched, stats.skipped), (1, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_item_fails_without_stopping_run() {
        let source = FakeSource::new(&[6, 7, 8]).with_malformed(&[7]);
        let dir = TempDir::new().unwrap();

        let stats = run(&source, &dir, &options(&dir)).await.unwrap();
        assert_eq!((stats.fetched, stats.skipped, stats.failed), (2, 0, 1));
        // Exactly one attempt for the malformed item
        assert_eq!(source.calls().iter().filter(|&&id| id == 7).count(), 1);
        let store = ProblemStore::new(dir.path());
        assert!(!store.exists(7, "problem-7"));
    }

    #[tokio::test(start_paused = true)]
    async fn inverted_bounds_yield_empty_run() {
        let source = FakeSource::new(&[1, 2, 3]);
        let dir = TempDir::new().unwrap();

        let mut opts = options(&dir);
        opts.start = Some(3);
        opts.end = Some(1);
        let stats = run(&source, &dir, &opts).await.unwrap();

        assert_eq!((stats.fetched, stats.skipped, stats.failed), (0, 0, 0));
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_before_next_item() {
        let source = FakeSource::new(&[1, 2, 3]);
        let dir = TempDir::new().unwrap();
        let store = ProblemStore::new(dir.path());
        let cancel = AtomicBool::new(true);

        let stats = crawl_index(
            &source,
            &store,
            &source.index(),
            &options(&dir),
            &mut pace(),
            &cancel,
        )
        .await
        .unwrap();

        assert_eq!(stats.total(), 0);
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_index_is_startup_fatal() {
        let source = FakeSource::new(&[]);
        let result = obtain_index(&source, None, &mut pace()).await;
        assert!(matches!(result, Err(AppError::Startup(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_load_failure_is_startup_fatal() {
        let source = FakeSource::new(&[1]);
        let missing = Path::new("/nonexistent/metadata.json");
        let result = obtain_index(&source, Some(missing), &mut pace()).await;
        assert!(matches!(result, Err(AppError::Startup(_))));
    }
}
