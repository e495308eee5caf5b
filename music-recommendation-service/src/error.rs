use thiserror::Error;
use turn_flow::FlowError;

/// Failures raised by the recommendation dialog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendationError {
    /// A carried, chosen, or inferred genre that has no catalog entry, or no genre at all
    #[error("Could not resolve a genre: {0}")]
    Resolution(String),

    /// A catalog genre with no items. Never expected from a validated catalog.
    #[error("Catalog integrity violated: genre '{0}' has no items")]
    CatalogIntegrity(String),

    #[error("Invalid card: {0}")]
    Card(String),

    #[error("Recognizer failed: {0}")]
    Recognizer(String),
}

impl From<RecommendationError> for FlowError {
    fn from(err: RecommendationError) -> Self {
        FlowError::StepFailed(err.to_string())
    }
}
