//! Record Normalizer: the last stop before a screened posting is written.

use crate::models::job::{JobRecord, NewJob};

/// `None` for NaN and infinities, the value otherwise.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Pure and total: non-finite floats become `None`, everything else passes through.
pub fn normalize(record: JobRecord) -> NewJob {
    NewJob {
        title: record.title,
        company: record.company,
        job_url: record.job_url,
        description: record.description,
        similarity_score: finite(record.similarity_score),
        gemini_rating: Some(i32::from(record.gemini_rating)),
        ai_reason: Some(record.ai_reason),
        created_at: record.created_at,
        profile_id: record.profile_id,
        search_id: record.search_id,
    }
}
