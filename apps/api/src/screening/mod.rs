// Two-stage screening: a cheap embedding similarity filter, then an LLM verdict.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod gate;
pub mod prompts;
pub mod similarity;
