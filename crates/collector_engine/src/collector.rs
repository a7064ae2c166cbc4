use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use collector_core::{PacingPolicy, PageEvent, PageStep, Pagination, PostingCandidate, StopReason};
use collector_logging::{collector_debug, collector_info, collector_warn};
use thiserror::Error;

use crate::enrich::DetailEnricher;
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::listing::{ListingFetcher, SearchQuery};
use crate::pacing::RateLimiter;
use crate::parse::parse_postings;
use crate::store::{CsvStore, StoreError};
use crate::types::FetchError;

/// Everything a collection cycle needs; supplied by the caller.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub search: SearchQuery,
    /// Default cap on postings per cycle.
    pub max_results: usize,
    pub fetch: FetchSettings,
    /// Pause after every `pace_every`-th enriched posting.
    pub pace_every: usize,
    pub pace_delay: Duration,
    pub store_path: PathBuf,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            search: SearchQuery::default(),
            max_results: 75,
            fetch: FetchSettings::default(),
            pace_every: PacingPolicy::DEFAULT_EVERY,
            pace_delay: Duration::from_millis(1500),
            store_path: PathBuf::from("data").join("job_postings.csv"),
        }
    }
}

/// Only storage failures end a cycle with an error.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[source] FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Non-empty listing pages fetched.
    pub pages: usize,
    pub stop_reason: StopReason,
    pub enriched: usize,
    pub appended: usize,
}

pub struct Collector {
    config: CollectorConfig,
    listing: ListingFetcher,
    enricher: DetailEnricher,
    limiter: RateLimiter,
    store: CsvStore,
}

impl Collector {
    pub fn new(config: CollectorConfig) -> Result<Self, CollectError> {
        let fetcher = ReqwestFetcher::new(config.fetch.clone()).map_err(CollectError::Client)?;
        let store = CsvStore::new(config.store_path.clone());
        Ok(Self::with_parts(config, Arc::new(fetcher), store))
    }

    /// Wires a collector around an arbitrary fetcher and store.
    pub fn with_parts(config: CollectorConfig, fetcher: Arc<dyn Fetcher>, store: CsvStore) -> Self {
        let listing = ListingFetcher::new(fetcher.clone(), config.search.clone());
        let enricher = DetailEnricher::new(fetcher);
        let limiter = RateLimiter::new(PacingPolicy::new(config.pace_every), config.pace_delay);
        Self {
            config,
            listing,
            enricher,
            limiter,
            store,
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn store(&self) -> &CsvStore {
        &self.store
    }

    /// Runs one cycle and returns the number of rows written.
    pub async fn run_cycle(&self, limit: Option<usize>) -> Result<usize, CollectError> {
        Ok(self.collect(limit).await?.appended)
    }

    /// Paginate, enrich, persist. A non-zero `limit` overrides `max_results`
    /// for this run.
    pub async fn collect(&self, limit: Option<usize>) -> Result<CycleReport, CollectError> {
        let limit = limit
            .filter(|&limit| limit > 0)
            .unwrap_or(self.config.max_results);
        let query = self.listing.query();
        collector_info!(
            "Collecting up to {} postings for {:?} in {:?}",
            limit,
            query.keywords,
            query.location
        );

        let (candidates, pages, stop_reason) = self.paginate(limit).await;
        collector_info!(
            "Pagination stopped ({}) after {} page(s) with {} candidate(s)",
            stop_reason,
            pages,
            candidates.len()
        );
        if candidates.is_empty() {
            collector_warn!("No postings were collected during this run");
            return Ok(CycleReport {
                pages,
                stop_reason,
                enriched: 0,
                appended: 0,
            });
        }

        let mut enriched = Vec::with_capacity(candidates.len());
        for (idx, candidate) in candidates.into_iter().enumerate() {
            enriched.push(self.enricher.enrich(candidate).await);
            self.limiter.after_item(idx + 1).await;
        }
        let enriched_count = enriched.len();

        let appended = self.store.append_batch(enriched)?;
        collector_info!(
            "Persisted {} of {} posting(s) to {:?}",
            appended,
            enriched_count,
            self.store.path()
        );

        Ok(CycleReport {
            pages,
            stop_reason,
            enriched: enriched_count,
            appended,
        })
    }

    async fn paginate(&self, limit: usize) -> (Vec<PostingCandidate>, usize, StopReason) {
        let mut pagination = Pagination::new(limit, self.config.search.page_size);
        let mut step = pagination.start();
        while let PageStep::Fetch { start } = step {
            let event = match self.listing.fetch_page(start).await {
                Ok(markup) => {
                    let parsed = parse_postings(&markup);
                    collector_debug!("Offset {}: {} posting(s)", start, parsed.len());
                    PageEvent::Parsed(parsed)
                }
                Err(err) => {
                    collector_warn!("{}", err);
                    PageEvent::FetchFailed
                }
            };
            step = pagination.apply(event);
        }
        let pages = pagination.pages();
        let (candidates, reason) = pagination.finish();
        (candidates, pages, reason)
    }

    /// Deletes all stored postings and recreates an empty store.
    pub fn reset_store(&self) -> Result<(), CollectError> {
        self.store.reset()?;
        collector_info!("Data file reset at {:?}", self.store.path());
        Ok(())
    }

    pub fn compact_store(&self) -> Result<usize, CollectError> {
        Ok(self.store.compact()?)
    }
}
