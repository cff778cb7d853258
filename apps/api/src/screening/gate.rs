//! Qualitative Gate — asks the LLM for a 1–10 suitability verdict on a posting.
//!
//! The oracle's text is untrusted: anything other than one well-formed JSON
//! object with an integer rating in range collapses to `Verdict::Failed`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::prompts::fill;
use crate::llm_client::{parse_json_response, LlmOracle};
use crate::screening::prompts::{SUGGESTIONS_PROMPT_TEMPLATE, VERDICT_PROMPT_TEMPLATE};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 10;

/// Outcome of one gate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Rated { rating: u8, reason: String },
    Failed,
}

impl Verdict {
    pub fn rating(&self) -> Option<u8> {
        match self {
            Verdict::Rated { rating, .. } => Some(*rating),
            Verdict::Failed => None,
        }
    }

    /// `Failed` never passes.
    pub fn passes(&self, threshold: u8) -> bool {
        self.rating().is_some_and(|r| r >= threshold)
    }
}

/// Exact schema the verdict prompt asks for.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVerdict {
    gemini_rating: i64,
    ai_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub suggestions: Vec<String>,
}

#[derive(Clone)]
pub struct QualitativeGate {
    oracle: Arc<dyn LlmOracle>,
}

impl QualitativeGate {
    pub fn new(oracle: Arc<dyn LlmOracle>) -> Self {
        Self { oracle }
    }

    pub async fn analyze(
        &self,
        resume_context: &str,
        description: &str,
        experience_level: &str,
    ) -> Verdict {
        info!("Requesting qualitative verdict (target level: {experience_level})");
        let prompt = fill(
            VERDICT_PROMPT_TEMPLATE,
            &[
                ("experience_level", experience_level),
                ("resume_context", resume_context),
                ("job_description", description),
            ],
        );

        match self.oracle.generate(&prompt).await {
            Ok(text) => parse_verdict(&text),
            Err(e) => {
                warn!("Qualitative gate oracle error: {e}");
                Verdict::Failed
            }
        }
    }

    /// Advisory tailoring tips. Same failure contract as `analyze`: `None` on
    /// any oracle or parse problem.
    pub async fn suggest(&self, resume_context: &str, description: &str) -> Option<Suggestions> {
        info!("Requesting resume tailoring suggestions");
        let prompt = fill(
            SUGGESTIONS_PROMPT_TEMPLATE,
            &[
                ("resume_context", resume_context),
                ("job_description", description),
            ],
        );

        let text = match self.oracle.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Suggestion oracle error: {e}");
                return None;
            }
        };

        match parse_json_response::<Suggestions>(&text) {
            Ok(suggestions) => Some(suggestions),
            Err(e) => {
                warn!("Malformed suggestion output: {e}");
                None
            }
        }
    }
}

/// Never fails past this boundary.
pub fn parse_verdict(text: &str) -> Verdict {
    let raw = match parse_json_response::<RawVerdict>(text) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Malformed verdict output: {e}");
            return Verdict::Failed;
        }
    };

    if !(MIN_RATING..=MAX_RATING).contains(&raw.gemini_rating) {
        warn!("Verdict rating {} outside 1-10", raw.gemini_rating);
        return Verdict::Failed;
    }

    Verdict::Rated {
        rating: raw.gemini_rating as u8,
        reason: raw.ai_reason,
    }
}
