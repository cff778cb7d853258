use std::sync::Arc;

use crate::jobs::store::JobStore;
use crate::pipeline::guard::RunGuard;
use crate::pipeline::orchestrator::Pipeline;
use crate::screening::gate::QualitativeGate;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// Process-wide single-flight flag for pipeline runs.
    pub run_guard: RunGuard,
    /// Read-only access for the suggestions endpoint (latest profile lookup).
    pub store: Arc<dyn JobStore>,
    pub gate: QualitativeGate,
}
