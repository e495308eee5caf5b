use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::error::RecommendationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    /// Unknown labels count as neutral
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

/// Intent, entities and sentiment for one utterance. Produced fresh each turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecognitionResult {
    pub top_intent: String,
    /// Entity type → mentioned values, in utterance order
    pub entities: HashMap<String, Vec<String>>,
    pub sentiment: Sentiment,
}

impl RecognitionResult {
    pub fn first_entity(&self, entity_type: &str) -> Option<&str> {
        self.entities
            .get(entity_type)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// What a recognizer produced for an utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    NotConfigured,
    Recognized(RecognitionResult),
}

/// Sentiment/intent classification collaborator
#[async_trait]
pub trait Recognizer: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn recognize(&self, text: &str) -> Result<Recognition, RecommendationError>;
}

/// Stand-in used when no recognition endpoint is configured
pub struct UnconfiguredRecognizer;

#[async_trait]
impl Recognizer for UnconfiguredRecognizer {
    fn is_configured(&self) -> bool {
        false
    }

    async fn recognize(&self, _text: &str) -> Result<Recognition, RecommendationError> {
        Ok(Recognition::NotConfigured)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LuisResponse {
    top_scoring_intent: Option<LuisIntent>,
    #[serde(default)]
    entities: Vec<LuisEntity>,
    sentiment_analysis: Option<LuisSentiment>,
}

#[derive(Deserialize)]
struct LuisIntent {
    intent: String,
}

#[derive(Deserialize)]
struct LuisEntity {
    entity: String,
    #[serde(rename = "type")]
    entity_type: String,
}

#[derive(Deserialize)]
struct LuisSentiment {
    label: String,
}

/// Parse a LUIS v2 style prediction body
pub fn parse_prediction(body: &str) -> Result<RecognitionResult, RecommendationError> {
    let response: LuisResponse = serde_json::from_str(body)
        .map_err(|e| RecommendationError::Recognizer(format!("invalid prediction: {e}")))?;

    let mut entities: HashMap<String, Vec<String>> = HashMap::new();
    for entity in response.entities {
        entities
            .entry(entity.entity_type)
            .or_default()
            .push(entity.entity);
    }

    Ok(RecognitionResult {
        top_intent: response
            .top_scoring_intent
            .map(|i| i.intent)
            .unwrap_or_else(|| "None".to_string()),
        entities,
        sentiment: response
            .sentiment_analysis
            .map(|s| Sentiment::from_label(&s.label))
            .unwrap_or_default(),
    })
}

/// Calls a hosted LUIS-compatible prediction endpoint
pub struct HttpRecognizer {
    client: reqwest::Client,
    endpoint: String,
    key: Option<String>,
}

impl HttpRecognizer {
    /// Requests that take longer than `timeout` fail with a recognizer error
    pub fn new(
        endpoint: impl Into<String>,
        key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RecommendationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RecommendationError::Recognizer(format!("http client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            key,
        })
    }
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    fn is_configured(&self) -> bool {
        true
    }

    async fn recognize(&self, text: &str) -> Result<Recognition, RecommendationError> {
        let mut request = self.client.get(&self.endpoint).query(&[("q", text)]);
        if let Some(key) = &self.key {
            request = request.header("Ocp-Apim-Subscription-Key", key);
        }

        let body = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RecommendationError::Recognizer(e.to_string()))?
            .text()
            .await
            .map_err(|e| RecommendationError::Recognizer(e.to_string()))?;

        let result = parse_prediction(&body)?;
        debug!(intent = %result.top_intent, sentiment = ?result.sentiment, "Utterance recognized");
        Ok(Recognition::Recognized(result))
    }
}
