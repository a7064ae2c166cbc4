//! Collector engine: fetch, parse, enrich and persist job postings.
mod collector;
mod decode;
mod enrich;
mod fetch;
mod handle;
mod listing;
mod pacing;
mod parse;
mod persist;
mod store;
mod types;

pub use collector::{CollectError, Collector, CollectorConfig, CycleReport};
pub use decode::{decode_markup, DecodeError, DecodedMarkup};
pub use enrich::{enrich_from_description, DetailEnricher};
pub use fetch::{fetch_markup, FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use handle::CollectorHandle;
pub use listing::{ListingFetcher, PageFetchError, SearchQuery, DEFAULT_SEARCH_ENDPOINT};
pub use pacing::RateLimiter;
pub use parse::{extract_description, parse_postings};
pub use store::{Clock, CsvStore, StoreError, COLUMNS};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
