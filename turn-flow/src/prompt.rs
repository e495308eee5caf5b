use serde::{Deserialize, Serialize};

/// A question sent to the user. Issuing one suspends the flow until the next turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    /// Any reply is accepted verbatim
    FreeText { text: String },
    /// Reply must name one of the choices, or its 1-based position
    Choice { text: String, choices: Vec<String> },
    /// Reply must be a yes or a no
    Confirm { text: String },
}

/// Kind of prompt a session is currently suspended on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    #[default]
    None,
    FreeText,
    Choice,
    Confirm,
}

/// The recognized reply to a prompt, delivered to the step after the one that prompted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PromptResult {
    Text(String),
    Choice(String),
    Confirm(bool),
}

const YES_WORDS: &[&str] = &["yes", "y", "yeah", "yep", "sure", "ok", "okay", "true"];
const NO_WORDS: &[&str] = &["no", "n", "nope", "nah", "false"];

impl Prompt {
    pub fn free_text(text: impl Into<String>) -> Self {
        Prompt::FreeText { text: text.into() }
    }

    pub fn choice<I, T>(text: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Prompt::Choice {
            text: text.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn confirm(text: impl Into<String>) -> Self {
        Prompt::Confirm { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Prompt::FreeText { text } | Prompt::Choice { text, .. } | Prompt::Confirm { text } => {
                text
            }
        }
    }

    pub fn kind(&self) -> PromptKind {
        match self {
            Prompt::FreeText { .. } => PromptKind::FreeText,
            Prompt::Choice { .. } => PromptKind::Choice,
            Prompt::Confirm { .. } => PromptKind::Confirm,
        }
    }

    /// Interpret a raw user reply against this prompt.
    ///
    /// Returns `None` when the reply does not answer the prompt; the caller re-prompts.
    pub fn recognize(&self, reply: &str) -> Option<PromptResult> {
        let normalized = reply.trim().to_lowercase();
        match self {
            Prompt::FreeText { .. } => Some(PromptResult::Text(reply.to_string())),
            Prompt::Choice { choices, .. } => {
                if let Some(found) = choices.iter().find(|c| c.to_lowercase() == normalized) {
                    return Some(PromptResult::Choice(found.clone()));
                }
                normalized
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=choices.len()).contains(n))
                    .map(|n| PromptResult::Choice(choices[n - 1].clone()))
            }
            Prompt::Confirm { .. } => {
                if YES_WORDS.contains(&normalized.as_str()) {
                    Some(PromptResult::Confirm(true))
                } else if NO_WORDS.contains(&normalized.as_str()) {
                    Some(PromptResult::Confirm(false))
                } else {
                    None
                }
            }
        }
    }
}
