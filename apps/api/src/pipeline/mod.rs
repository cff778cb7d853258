// The screening pipeline and the single-flight guard that launches it.

pub mod guard;
pub mod orchestrator;
