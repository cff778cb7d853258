use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_EXPERIENCE_LEVEL: &str = "entry_level";
pub const DEFAULT_JOB_TYPE: &str = "fulltime";
pub const DEFAULT_HOURS_OLD: u32 = 24;

#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub profile_name: String,
    pub resume_context: Option<String>,
}

impl Profile {
    /// The resume text, or `None` when it is missing or blank.
    pub fn resume_context(&self) -> Option<&str> {
        self.resume_context
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// A saved search joined with the profile it screens against.
#[derive(Debug, Clone)]
pub struct SearchSpec {
    pub id: Uuid,
    pub search_name: String,
    pub search_term: String,
    pub country: Option<String>,
    pub experience_level: Option<String>,
    pub job_type: Option<String>,
    pub hours_old: Option<i32>,
    pub profile: Option<Profile>,
}

impl SearchSpec {
    pub fn experience_level(&self) -> &str {
        non_blank(self.experience_level.as_deref()).unwrap_or(DEFAULT_EXPERIENCE_LEVEL)
    }

    pub fn job_type(&self) -> &str {
        non_blank(self.job_type.as_deref()).unwrap_or(DEFAULT_JOB_TYPE)
    }

    pub fn hours_old(&self) -> u32 {
        self.hours_old
            .and_then(|h| u32::try_from(h).ok())
            .filter(|h| *h > 0)
            .unwrap_or(DEFAULT_HOURS_OLD)
    }
}

/// Flat row produced by `searches LEFT JOIN profiles`.
#[derive(Debug, Clone, FromRow)]
pub struct SearchRow {
    pub id: Uuid,
    pub search_name: String,
    pub search_term: String,
    pub country: Option<String>,
    pub experience_level: Option<String>,
    pub job_type: Option<String>,
    pub hours_old: Option<i32>,
    pub profile_id: Option<Uuid>,
    pub profile_name: Option<String>,
    pub resume_context: Option<String>,
}

impl From<SearchRow> for SearchSpec {
    fn from(row: SearchRow) -> Self {
        let profile = row.profile_id.map(|id| Profile {
            id,
            profile_name: row.profile_name.unwrap_or_default(),
            resume_context: row.resume_context,
        });
        SearchSpec {
            id: row.id,
            search_name: row.search_name,
            search_term: row.search_term,
            country: row.country,
            experience_level: row.experience_level,
            job_type: row.job_type,
            hours_old: row.hours_old,
            profile,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
