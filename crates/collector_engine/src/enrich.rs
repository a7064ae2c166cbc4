use std::sync::Arc;

use collector_core::{extract_degree, extract_years, EnrichedPosting, PostingCandidate};
use collector_logging::{collector_debug, collector_warn};

use crate::fetch::{fetch_markup, Fetcher};
use crate::parse::extract_description;

/// Fetches detail pages and classifies their description text.
pub struct DetailEnricher {
    fetcher: Arc<dyn Fetcher>,
}

impl DetailEnricher {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Never fails: a missing link, a failed fetch or a page without a
    /// description leaves both fields `NotSpecified`.
    pub async fn enrich(&self, candidate: PostingCandidate) -> EnrichedPosting {
        if candidate.link.is_empty() {
            return EnrichedPosting::unenriched(candidate);
        }

        let markup = match fetch_markup(self.fetcher.as_ref(), &candidate.link).await {
            Ok(markup) => markup,
            Err(err) => {
                collector_warn!("Failed to load job detail {}: {}", candidate.link, err);
                return EnrichedPosting::unenriched(candidate);
            }
        };

        match extract_description(&markup) {
            Some(description) => enrich_from_description(candidate, &description),
            None => {
                collector_debug!("No description block on {}", candidate.link);
                EnrichedPosting::unenriched(candidate)
            }
        }
    }
}

pub fn enrich_from_description(candidate: PostingCandidate, description: &str) -> EnrichedPosting {
    EnrichedPosting {
        degree: extract_degree(description),
        years_experience: extract_years(description),
        candidate,
    }
}
