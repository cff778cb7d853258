//! Retrieval providers: where raw postings come from.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::posting::PostingCandidate;
use crate::models::search::SearchSpec;

pub mod jobspy;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job source error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Parameters for one retrieval call, derived from a saved search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub search_term: String,
    pub country: Option<String>,
    pub experience_level: String,
    pub job_type: String,
    pub hours_old: u32,
    pub results_wanted: u32,
}

impl SearchQuery {
    pub fn from_spec(spec: &SearchSpec, results_wanted: u32) -> Self {
        Self {
            search_term: spec.search_term.clone(),
            country: spec.country.clone(),
            experience_level: spec.experience_level().to_string(),
            job_type: spec.job_type().to_string(),
            hours_old: spec.hours_old(),
            results_wanted,
        }
    }
}

/// An empty result is a normal outcome, not an error.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<PostingCandidate>, SourceError>;
}
