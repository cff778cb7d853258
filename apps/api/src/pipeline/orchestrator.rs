//! Pipeline Orchestrator — runs every saved search through both screening stages.
//!
//! Flow per search: resume embedding → retrieval → per posting:
//! description check → similarity → qualitative gate → normalize → save.
//!
//! Nothing in here returns an error. Each failure is logged and downgraded to
//! "skip this search/posting" or, for the initial search fetch, "halt the run".

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::jobs::dedup::{save_job, SaveOutcome};
use crate::jobs::normalize::normalize;
use crate::jobs::store::JobStore;
use crate::models::job::JobRecord;
use crate::models::posting::PostingCandidate;
use crate::models::search::{Profile, SearchSpec};
use crate::screening::gate::{QualitativeGate, Verdict};
use crate::screening::similarity::SimilarityScorer;
use crate::sources::{JobSource, SearchQuery};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.45;
pub const DEFAULT_RATING_THRESHOLD: u8 = 7;
pub const DEFAULT_RESULTS_WANTED: u32 = 30;

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub similarity_threshold: f64,
    pub rating_threshold: u8,
    pub results_wanted: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            rating_threshold: DEFAULT_RATING_THRESHOLD,
            results_wanted: DEFAULT_RESULTS_WANTED,
        }
    }
}

/// Why a posting stopped short of `Persisted`.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingDescription,
    ScoringFailed,
    BelowSimilarity(f64),
    GateFailed,
    BelowRating(u8),
    MissingUrl,
    Duplicate,
    StoreFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingDescription => write!(f, "missing description"),
            SkipReason::ScoringFailed => write!(f, "similarity scoring failed"),
            SkipReason::BelowSimilarity(score) => {
                write!(f, "similarity score ({score:.2}) below threshold")
            }
            SkipReason::GateFailed => write!(f, "Gemini rating (N/A) below threshold"),
            SkipReason::BelowRating(rating) => {
                write!(f, "Gemini rating ({rating}/10) below threshold")
            }
            SkipReason::MissingUrl => write!(f, "job has no URL"),
            SkipReason::Duplicate => write!(f, "job already exists"),
            SkipReason::StoreFailed => write!(f, "store error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostingOutcome {
    Persisted,
    Skipped(SkipReason),
}

/// Counters logged at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub searches_run: usize,
    pub searches_skipped: usize,
    pub postings_seen: usize,
    pub persisted: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &PostingOutcome) {
        self.postings_seen += 1;
        match outcome {
            PostingOutcome::Persisted => self.persisted += 1,
            PostingOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Per-search context shared by every posting of that search.
struct SearchContext<'a> {
    search: &'a SearchSpec,
    profile: &'a Profile,
    resume_context: &'a str,
    resume_embedding: &'a [f32],
}

pub struct Pipeline {
    store: Arc<dyn JobStore>,
    source: Arc<dyn JobSource>,
    scorer: SimilarityScorer,
    gate: QualitativeGate,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn JobStore>,
        source: Arc<dyn JobSource>,
        scorer: SimilarityScorer,
        gate: QualitativeGate,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            store,
            source,
            scorer,
            gate,
            settings,
        }
    }

    /// Runs every saved search once.
    pub async fn run(&self) -> RunSummary {
        info!("Starting job search run");
        let mut summary = RunSummary::default();

        let searches = match self.store.fetch_searches().await {
            Ok(searches) => searches,
            Err(e) => {
                error!("Halting: could not load saved searches: {e:#}");
                return summary;
            }
        };
        if searches.is_empty() {
            warn!("Halting: no saved searches to run");
            return summary;
        }
        info!("Found {} searches to run", searches.len());

        // Resume embeddings keyed by profile id, reused across searches.
        let mut embeddings: HashMap<Uuid, Vec<f32>> = HashMap::new();

        for search in &searches {
            self.run_search(search, &mut embeddings, &mut summary).await;
        }

        info!(
            "Job search run finished: {} searches run, {} skipped, {} postings seen, {} saved, {} skipped",
            summary.searches_run,
            summary.searches_skipped,
            summary.postings_seen,
            summary.persisted,
            summary.skipped
        );
        summary
    }

    async fn run_search(
        &self,
        search: &SearchSpec,
        embeddings: &mut HashMap<Uuid, Vec<f32>>,
        summary: &mut RunSummary,
    ) {
        info!("Running search '{}'", search.search_name);

        let Some(profile) = search.profile.as_ref() else {
            warn!("Skipping search '{}': no linked profile", search.search_name);
            summary.searches_skipped += 1;
            return;
        };
        let Some(resume_context) = profile.resume_context() else {
            warn!(
                "Skipping search '{}': profile '{}' has no resume context",
                search.search_name, profile.profile_name
            );
            summary.searches_skipped += 1;
            return;
        };

        let resume_embedding: &[f32] = match embeddings.entry(profile.id) {
            Entry::Occupied(cached) => cached.into_mut().as_slice(),
            Entry::Vacant(slot) => match self.scorer.embed_resume(resume_context).await {
                Ok(embedding) => slot.insert(embedding).as_slice(),
                Err(e) => {
                    warn!(
                        "Skipping search '{}': resume embedding failed: {e}",
                        search.search_name
                    );
                    summary.searches_skipped += 1;
                    return;
                }
            },
        };

        let query = SearchQuery::from_spec(search, self.settings.results_wanted);
        let postings = match self.source.fetch(&query).await {
            Ok(postings) => postings,
            Err(e) => {
                warn!("Retrieval failed for search '{}': {e}", search.search_name);
                Vec::new()
            }
        };
        summary.searches_run += 1;

        if postings.is_empty() {
            info!("No new jobs found for search '{}'", search.search_name);
            return;
        }
        info!("Found {} potential jobs", postings.len());

        let ctx = SearchContext {
            search,
            profile,
            resume_context,
            resume_embedding,
        };
        for posting in &postings {
            let outcome = self.process_posting(&ctx, posting).await;
            summary.record(&outcome);
        }
    }

    async fn process_posting(
        &self,
        ctx: &SearchContext<'_>,
        posting: &PostingCandidate,
    ) -> PostingOutcome {
        info!("Processing job: {}", posting.display_title());

        let outcome = match self.screen(ctx, posting).await {
            Ok(record) => match save_job(self.store.as_ref(), &normalize(record)).await {
                SaveOutcome::Inserted => PostingOutcome::Persisted,
                SaveOutcome::Duplicate => PostingOutcome::Skipped(SkipReason::Duplicate),
                SaveOutcome::MissingUrl => PostingOutcome::Skipped(SkipReason::MissingUrl),
                SaveOutcome::Failed => PostingOutcome::Skipped(SkipReason::StoreFailed),
            },
            Err(reason) => PostingOutcome::Skipped(reason),
        };

        match &outcome {
            PostingOutcome::Persisted => info!("Saved job '{}'", posting.display_title()),
            PostingOutcome::Skipped(reason) => info!("Skipped: {reason}"),
        }
        outcome
    }

    /// Runs the checkpoints in order; the first one that fails decides the skip reason.
    async fn screen(
        &self,
        ctx: &SearchContext<'_>,
        posting: &PostingCandidate,
    ) -> Result<JobRecord, SkipReason> {
        let Some(description) = posting.description.as_deref() else {
            return Err(SkipReason::MissingDescription);
        };

        let similarity_score = match self
            .scorer
            .score(ctx.resume_embedding, Some(description))
            .await
        {
            Ok(score) => score,
            Err(e) => {
                warn!("Similarity scoring failed: {e}");
                return Err(SkipReason::ScoringFailed);
            }
        };
        if similarity_score.is_nan() || similarity_score < self.settings.similarity_threshold {
            return Err(SkipReason::BelowSimilarity(similarity_score));
        }
        info!("Passed similarity check: {similarity_score:.2}");

        let verdict = self
            .gate
            .analyze(
                ctx.resume_context,
                description,
                ctx.search.experience_level(),
            )
            .await;
        if !verdict.passes(self.settings.rating_threshold) {
            return Err(verdict
                .rating()
                .map_or(SkipReason::GateFailed, SkipReason::BelowRating));
        }
        let Verdict::Rated { rating, reason } = verdict else {
            return Err(SkipReason::GateFailed);
        };
        info!("Gemini rated {rating}/10");

        Ok(JobRecord {
            title: posting.title.clone(),
            company: posting.company.clone(),
            job_url: posting.job_url.clone(),
            description: description.to_string(),
            similarity_score,
            gemini_rating: rating,
            ai_reason: reason,
            created_at: Utc::now(),
            profile_id: ctx.profile.id,
            search_id: ctx.search.id,
        })
    }
}
