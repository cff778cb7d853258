//! Deduplicating Store Writer: at most one stored job per `job_url`.
//!
//! Check-then-insert is not atomic. Only one pipeline run is active per
//! process (see `pipeline::guard`) and the `jobs.job_url` UNIQUE constraint
//! turns a lost race into an insert error, which lands in `SaveOutcome::Failed`.

use tracing::{error, info, warn};

use crate::jobs::store::JobStore;
use crate::models::job::NewJob;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Duplicate,
    MissingUrl,
    Failed,
}

/// Writes `job` unless a row with the same URL exists. Never returns an error:
/// store failures are logged and reported as `Failed`.
pub async fn save_job(store: &dyn JobStore, job: &NewJob) -> SaveOutcome {
    let Some(job_url) = job.job_url.as_deref().filter(|u| !u.trim().is_empty()) else {
        warn!("Skipped save: job '{}' has no URL", job.display_title());
        return SaveOutcome::MissingUrl;
    };

    match store.job_exists(job_url).await {
        Ok(true) => {
            info!("Skipped save: job '{}' already exists", job.display_title());
            return SaveOutcome::Duplicate;
        }
        Ok(false) => {}
        Err(e) => {
            error!("Existence check failed for {job_url}: {e:#}");
            return SaveOutcome::Failed;
        }
    }

    info!("Saving new job '{}'", job.display_title());
    match store.insert_job(job).await {
        Ok(()) => SaveOutcome::Inserted,
        Err(e) => {
            error!("Insert failed for {job_url}: {e:#}");
            SaveOutcome::Failed
        }
    }
}
