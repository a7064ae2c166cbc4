use std::sync::Arc;

use url::Url;

use crate::fetch::{fetch_markup, Fetcher};
use crate::{FailureKind, FetchError};

pub const DEFAULT_SEARCH_ENDPOINT: &str =
    "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";

/// Search parameters sent with every listing page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub endpoint: String,
    pub keywords: String,
    pub location: String,
    /// Offset increment between consecutive pages.
    pub page_size: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            keywords: "Data Scientist".to_string(),
            location: "Israel".to_string(),
            page_size: 25,
        }
    }
}

impl SearchQuery {
    pub fn page_url(&self, start: usize) -> Result<Url, url::ParseError> {
        let start = start.to_string();
        Url::parse_with_params(
            &self.endpoint,
            [
                ("keywords", self.keywords.as_str()),
                ("location", self.location.as_str()),
                ("start", start.as_str()),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("listing page at offset {start} failed: {source}")]
pub struct PageFetchError {
    pub start: usize,
    #[source]
    pub source: FetchError,
}

pub struct ListingFetcher {
    fetcher: Arc<dyn Fetcher>,
    query: SearchQuery,
}

impl ListingFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher>, query: SearchQuery) -> Self {
        Self { fetcher, query }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Fetches the listing page at `start`. Exactly one attempt.
    pub async fn fetch_page(&self, start: usize) -> Result<String, PageFetchError> {
        let url = self.query.page_url(start).map_err(|err| PageFetchError {
            start,
            source: FetchError::new(FailureKind::InvalidUrl, err.to_string()),
        })?;
        fetch_markup(self.fetcher.as_ref(), url.as_str())
            .await
            .map_err(|source| PageFetchError { start, source })
    }
}
