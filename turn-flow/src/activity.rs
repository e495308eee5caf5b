use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompt::Prompt;

/// Opaque displayable payload handed to the channel as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub content_type: String,
    pub content: Value,
}

/// One outbound message produced during a turn, in send order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activity {
    Text { text: String },
    Attachment { attachment: Attachment },
    Prompt { prompt: Prompt },
}

impl Activity {
    pub fn text(text: impl Into<String>) -> Self {
        Activity::Text { text: text.into() }
    }

    /// Text shown to the user, if this activity carries any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Activity::Text { text } => Some(text),
            Activity::Prompt { prompt } => Some(prompt.text()),
            Activity::Attachment { .. } => None,
        }
    }
}
