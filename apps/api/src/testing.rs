//! Scripted stand-ins for the external collaborators, shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::embedding::{Embedder, EmbeddingError};
use crate::jobs::store::JobStore;
use crate::llm_client::{LlmError, LlmOracle};
use crate::models::job::NewJob;
use crate::models::posting::PostingCandidate;
use crate::models::search::{Profile, SearchSpec};
use crate::pipeline::guard::RunGuard;
use crate::pipeline::orchestrator::{Pipeline, PipelineSettings};
use crate::screening::gate::QualitativeGate;
use crate::screening::similarity::SimilarityScorer;
use crate::sources::{JobSource, SearchQuery, SourceError};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Embedding oracle
// ────────────────────────────────────────────────────────────────────────────

/// Returns a fixed vector per exact input text, `fallback` otherwise.
pub struct ScriptedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    failing: HashSet<String>,
    fallback: Vec<f32>,
    calls: AtomicUsize,
}

impl ScriptedEmbedder {
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            failing: HashSet::new(),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for ScriptedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(text) {
            return Err(EmbeddingError::Api {
                status: 503,
                message: "embedding service unavailable".to_string(),
            });
        }
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LLM oracle
// ────────────────────────────────────────────────────────────────────────────

type Script = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Answers each prompt through a closure; `None` simulates a transport error.
pub struct ScriptedOracle {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new(script: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Some(text.clone()))
    }

    pub fn failing() -> Self {
        Self::new(|_| None)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmOracle for ScriptedOracle {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.script)(prompt).ok_or_else(|| LlmError::Api {
            status: 503,
            message: "model overloaded".to_string(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Retrieval provider
// ────────────────────────────────────────────────────────────────────────────

/// Postings keyed by search term. Unknown terms return an empty list.
#[derive(Default)]
pub struct ScriptedSource {
    postings: HashMap<String, Vec<PostingCandidate>>,
    failing: HashSet<String>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl ScriptedSource {
    pub fn with(mut self, term: &str, postings: Vec<PostingCandidate>) -> Self {
        self.postings.insert(term.to_string(), postings);
        self
    }

    pub fn failing_on(mut self, term: &str) -> Self {
        self.failing.insert(term.to_string());
        self
    }

    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobSource for ScriptedSource {
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<PostingCandidate>, SourceError> {
        self.queries.lock().unwrap().push(query.clone());
        if self.failing.contains(&query.search_term) {
            return Err(SourceError::Api {
                status: 502,
                message: "scraper timed out".to_string(),
            });
        }
        Ok(self
            .postings
            .get(&query.search_term)
            .cloned()
            .unwrap_or_default())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

/// In-memory store. `failing_lookups` breaks every read, `failing_inserts` every write.
#[derive(Default)]
pub struct MemoryStore {
    searches: Vec<SearchSpec>,
    profiles: Vec<Profile>,
    jobs: Mutex<Vec<NewJob>>,
    exists_checks: AtomicUsize,
    fail_lookups: bool,
    fail_inserts: bool,
}

impl MemoryStore {
    pub fn with_searches(searches: Vec<SearchSpec>) -> Self {
        Self {
            searches,
            ..Self::default()
        }
    }

    /// Profiles in creation order; the last one is the most recent.
    pub fn with_profiles(mut self, profiles: Vec<Profile>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub fn failing_inserts(mut self) -> Self {
        self.fail_inserts = true;
        self
    }

    pub fn jobs(&self) -> Vec<NewJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn exists_checks(&self) -> usize {
        self.exists_checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn fetch_searches(&self) -> Result<Vec<SearchSpec>> {
        if self.fail_lookups {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.searches.clone())
    }

    async fn latest_profile(&self) -> Result<Option<Profile>> {
        if self.fail_lookups {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.profiles.last().cloned())
    }

    async fn job_exists(&self, job_url: &str) -> Result<bool> {
        self.exists_checks.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(anyhow!("connection refused"));
        }
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .any(|j| j.job_url.as_deref() == Some(job_url)))
    }

    async fn insert_job(&self, job: &NewJob) -> Result<()> {
        if self.fail_inserts {
            return Err(anyhow!("insert rejected"));
        }
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixtures
// ────────────────────────────────────────────────────────────────────────────

pub fn profile(resume_context: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        profile_name: "Backend".to_string(),
        resume_context: Some(resume_context.to_string()),
    }
}

/// A search whose term doubles as the `ScriptedSource` key.
pub fn search(term: &str, profile: Option<Profile>) -> SearchSpec {
    SearchSpec {
        id: Uuid::new_v4(),
        search_name: format!("{term} search"),
        search_term: term.to_string(),
        country: None,
        experience_level: Some("entry_level".to_string()),
        job_type: None,
        hours_old: None,
        profile,
    }
}

pub fn posting(slug: &str, description: Option<&str>) -> PostingCandidate {
    PostingCandidate {
        title: Some(format!("Job {slug}")),
        company: Some("Acme".to_string()),
        job_url: Some(format!("https://jobs.example.com/{slug}")),
        description: description.map(str::to_string),
        ..PostingCandidate::default()
    }
}

pub fn new_job(job_url: &str) -> NewJob {
    NewJob {
        title: Some("Backend Engineer".to_string()),
        company: Some("Acme".to_string()),
        job_url: Some(job_url.to_string()),
        description: "Build Rust services".to_string(),
        similarity_score: Some(0.7),
        gemini_rating: Some(8),
        ai_reason: Some("Strong match.".to_string()),
        created_at: Utc::now(),
        profile_id: Uuid::new_v4(),
        search_id: Uuid::new_v4(),
    }
}

/// Router state over in-memory collaborators. The pipeline sees no postings.
pub fn app_state(store: Arc<MemoryStore>, oracle: Arc<ScriptedOracle>) -> AppState {
    let gate = QualitativeGate::new(oracle);
    let pipeline = Pipeline::new(
        store.clone(),
        Arc::new(ScriptedSource::default()),
        SimilarityScorer::new(Arc::new(ScriptedEmbedder::new(vec![1.0, 0.0]))),
        gate.clone(),
        PipelineSettings::default(),
    );
    AppState {
        pipeline: Arc::new(pipeline),
        run_guard: RunGuard::new(),
        store,
        gate,
    }
}
