use thiserror::Error;

/// Startup-fatal corpus problems. The engine must not come up in a
/// partially trained state, so these abort initialization.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("training corpus is empty")]
    EmptyCorpus,
    #[error("unknown intent label in training corpus: {0:?}")]
    UnknownLabel(String),
    #[error("training corpus needs at least two distinct intents, found {0}")]
    TooFewLabels(usize),
}

/// Knowledge-store defects. Requesting a category that was never
/// loaded is a programming or data-packaging error, not user input.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("no knowledge entries registered for category {0}")]
    UnknownCategory(&'static str),
}
