use serde::{Deserialize, Serialize};
use turn_flow::FlowState;

/// Conversation state of one recommendation flow instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationState {
    /// Empty until a genre is inferred, carried over, or chosen
    pub resolved_genre: Option<String>,
}

/// Carry-over handed from a finished flow to the one replacing it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeOptions {
    pub carried_genre: Option<String>,
}

impl ResumeOptions {
    /// The carried genre, if one was actually carried
    pub fn genre(&self) -> Option<&str> {
        self.carried_genre.as_deref().filter(|g| !g.is_empty())
    }
}

impl FlowState for RecommendationState {
    type Resume = ResumeOptions;
}

// User-facing copy
pub mod messages {
    pub const GREETING: &str = "How are you doing today?";
    pub const POSITIVE_ACK: &str = "That's great to hear!";
    pub const NEGATIVE_ACK: &str = "Sorry to hear that. Let me try to help.";
    pub const GENRE_CHOICE: &str = "What kind of music would you like me to recommend?";
    pub const RECOMMENDATION_INTRO: &str = "I recommend listening to:";
    pub const CONFIRM: &str = "Did you enjoy my recommendation?";
    pub const ENJOYED: &str = "Glad you enjoyed it!";
    pub const NOT_ENJOYED: &str = "Sorry to hear that.";
}
