//! Song cards rendered as Adaptive Card attachments.
//!
//! The card is a typed structure serialized to JSON, not a template patched by path.

use serde::Serialize;
use turn_flow::Attachment;

use crate::{catalog::Item, error::RecommendationError};

pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";
pub const SEARCH_PREFIX: &str = "https://www.google.com/search?q=";

/// Turns a catalog item into something the channel can display
pub trait CardRenderer: Send + Sync {
    fn render(&self, item: &Item) -> Result<Attachment, RecommendationError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct AdaptiveCard {
    #[serde(rename = "$schema")]
    schema: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    version: &'static str,
    body: Vec<CardElement>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
enum CardElement {
    TextBlock {
        text: String,
        wrap: bool,
    },
    Image {
        url: String,
        size: &'static str,
    },
    ColumnSet {
        columns: Vec<Column>,
    },
    Container {
        items: Vec<CardElement>,
    },
    ActionSet {
        actions: Vec<CardAction>,
    },
}

#[derive(Debug, Clone, Serialize)]
struct Column {
    #[serde(rename = "type")]
    kind: &'static str,
    width: &'static str,
    items: Vec<CardElement>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
enum CardAction {
    #[serde(rename = "Action.OpenUrl")]
    OpenUrl { title: String, url: String },
}

/// Search link for the song: creator and title words joined with `+`
pub fn search_url(prefix: &str, item: &Item) -> String {
    let terms: Vec<&str> = item
        .creator
        .split_whitespace()
        .chain(item.title.split_whitespace())
        .collect();
    format!("{prefix}{}", terms.join("+"))
}

impl AdaptiveCard {
    /// Build the song card, rejecting items that cannot be displayed
    pub fn for_song(item: &Item, search_prefix: &str) -> Result<Self, RecommendationError> {
        if item.creator.trim().is_empty() || item.title.trim().is_empty() {
            return Err(RecommendationError::Card(
                "song needs both an artist and a title".to_string(),
            ));
        }
        if !(item.image_url.starts_with("https://") || item.image_url.starts_with("http://")) {
            return Err(RecommendationError::Card(format!(
                "cover image is not an http(s) url: '{}'",
                item.image_url
            )));
        }

        let text = |text: String| CardElement::TextBlock { text, wrap: true };
        let details = Column {
            kind: "Column",
            width: "stretch",
            items: vec![
                text(format!("Artist: {}", item.creator)),
                text(format!("Song: {}", item.title)),
                text(format!("Album: {}", item.collection)),
                CardElement::Container {
                    items: vec![CardElement::ActionSet {
                        actions: vec![CardAction::OpenUrl {
                            title: "Look it up".to_string(),
                            url: search_url(search_prefix, item),
                        }],
                    }],
                },
            ],
        };
        let cover = Column {
            kind: "Column",
            width: "auto",
            items: vec![CardElement::Image {
                url: item.image_url.clone(),
                size: "Medium",
            }],
        };

        Ok(Self {
            schema: "http://adaptivecards.io/schemas/adaptive-card.json",
            kind: "AdaptiveCard",
            version: "1.0",
            body: vec![CardElement::ColumnSet {
                columns: vec![details, cover],
            }],
        })
    }
}

pub struct AdaptiveCardRenderer {
    search_prefix: String,
}

impl AdaptiveCardRenderer {
    pub fn new(search_prefix: impl Into<String>) -> Self {
        Self {
            search_prefix: search_prefix.into(),
        }
    }
}

impl Default for AdaptiveCardRenderer {
    fn default() -> Self {
        Self::new(SEARCH_PREFIX)
    }
}

impl CardRenderer for AdaptiveCardRenderer {
    fn render(&self, item: &Item) -> Result<Attachment, RecommendationError> {
        let card = AdaptiveCard::for_song(item, &self.search_prefix)?;
        let content = serde_json::to_value(card)
            .map_err(|e| RecommendationError::Card(e.to_string()))?;
        Ok(Attachment {
            content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(),
            content,
        })
    }
}
