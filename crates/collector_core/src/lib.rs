//! Collector core: posting model, heuristic classifiers and the pure
//! pagination/pacing policies driven by the engine.
mod degree;
mod pacing;
mod pagination;
mod posting;
mod years;

pub use degree::{classify_context, extract_degree, ContextTier, CONTEXT_WINDOW};
pub use pacing::PacingPolicy;
pub use pagination::{PageEvent, PageStep, Pagination, StopReason};
pub use posting::{
    Degree, EnrichedPosting, Identity, PostingCandidate, StoredRecord, YearsExperience,
    NOT_SPECIFIED,
};
pub use years::extract_years;
