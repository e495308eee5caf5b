// Recommendation dialog steps, in execution order
pub mod intro;
pub mod resolve_genre;
pub mod recommend;
pub mod confirm;

// Shared state and copy
pub mod types;

pub use confirm::ConfirmStep;
pub use intro::IntroStep;
pub use recommend::RecommendStep;
pub use resolve_genre::ResolveGenreStep;

pub use types::{RecommendationState, ResumeOptions, messages};
