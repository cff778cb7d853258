use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A posting that cleared both screening stages, with scores as computed.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub title: Option<String>,
    pub company: Option<String>,
    pub job_url: Option<String>,
    pub description: String,
    pub similarity_score: f64,
    pub gemini_rating: u8,
    pub ai_reason: String,
    pub created_at: DateTime<Utc>,
    pub profile_id: Uuid,
    pub search_id: Uuid,
}

/// Persistence-ready job row. Absent values are `None`, never NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: Option<String>,
    pub company: Option<String>,
    pub job_url: Option<String>,
    pub description: String,
    pub similarity_score: Option<f64>,
    pub gemini_rating: Option<i32>,
    pub ai_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub profile_id: Uuid,
    pub search_id: Uuid,
}

impl NewJob {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("<untitled>")
    }
}
