use std::sync::Arc;

use crate::{
    catalog::Catalog,
    error::RecommendationError,
    recognizer::{RecognitionResult, Sentiment},
};

/// Intent name the recognizer reports when the user asks for music
pub const RECOMMENDATION_INTENT: &str = "Recommendation";
/// Entity type carrying a genre or mood word
pub const GENRE_ENTITY: &str = "genre";

/// Where a resolved genre came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenreSource {
    Carried,
    Chosen,
    Entity,
    Sentiment(Sentiment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub genre: String,
    pub source: GenreSource,
}

/// Translate a mood adjective into a genre key. Other values pass through unchanged.
pub fn map_adjective(value: &str) -> &str {
    match value {
        "upbeat" => "pop",
        "relaxing" => "jazz",
        "calm" => "classical",
        other => other,
    }
}

pub fn genre_for_sentiment(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "pop",
        Sentiment::Negative | Sentiment::Neutral => "jazz",
    }
}

/// Picks the active genre. Priority: carried-over genre, explicit choice, genre
/// entity (after adjective mapping), sentiment.
#[derive(Clone)]
pub struct GenreResolver {
    catalog: Arc<Catalog>,
}

impl GenreResolver {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Fails with [`RecommendationError::Resolution`] when no source applies or the
    /// winning value is not a catalog key. Callers recover by offering the genre list.
    pub fn resolve(
        &self,
        carried: Option<&str>,
        recognition: Option<&RecognitionResult>,
        chosen: Option<&str>,
    ) -> Result<Resolution, RecommendationError> {
        let (genre, source) = if let Some(genre) = carried.filter(|g| !g.is_empty()) {
            (genre, GenreSource::Carried)
        } else if let Some(genre) = chosen.filter(|g| !g.is_empty()) {
            (genre, GenreSource::Chosen)
        } else {
            match recognition {
                Some(result) if result.top_intent == RECOMMENDATION_INTENT => {
                    match result.first_entity(GENRE_ENTITY) {
                        Some(value) => (map_adjective(value), GenreSource::Entity),
                        None => (
                            genre_for_sentiment(result.sentiment),
                            GenreSource::Sentiment(result.sentiment),
                        ),
                    }
                }
                Some(result) => {
                    return Err(RecommendationError::Resolution(format!(
                        "intent '{}' is not a recommendation request",
                        result.top_intent
                    )));
                }
                None => {
                    return Err(RecommendationError::Resolution(
                        "nothing to resolve a genre from".to_string(),
                    ));
                }
            }
        };

        if !self.catalog.contains(genre) {
            return Err(RecommendationError::Resolution(format!(
                "unknown genre '{genre}'"
            )));
        }

        Ok(Resolution {
            genre: genre.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolver() -> GenreResolver {
        GenreResolver::new(Arc::new(Catalog::builtin()))
    }

    fn recommendation(entity: Option<&str>, sentiment: Sentiment) -> RecognitionResult {
        let mut entities = HashMap::new();
        if let Some(value) = entity {
            entities.insert(GENRE_ENTITY.to_string(), vec![value.to_string()]);
        }
        RecognitionResult {
            top_intent: RECOMMENDATION_INTENT.to_string(),
            entities,
            sentiment,
        }
    }

    #[test]
    fn test_adjectives_map_to_genres() {
        let resolver = resolver();
        for (adjective, genre) in [("upbeat", "pop"), ("relaxing", "jazz"), ("calm", "classical")] {
            let result = recommendation(Some(adjective), Sentiment::Negative);
            let resolution = resolver.resolve(None, Some(&result), None).unwrap();
            assert_eq!(resolution.genre, genre);
            assert_eq!(resolution.source, GenreSource::Entity);
        }
    }

    #[test]
    fn test_other_entity_values_pass_through() {
        let result = recommendation(Some("metal"), Sentiment::Positive);
        let resolution = resolver().resolve(None, Some(&result), None).unwrap();
        assert_eq!(resolution.genre, "metal");
        assert_eq!(map_adjective("polka"), "polka");
    }

    #[test]
    fn test_sentiment_decides_when_no_entity_is_present() {
        let resolver = resolver();
        let positive = recommendation(None, Sentiment::Positive);
        assert_eq!(
            resolver.resolve(None, Some(&positive), None).unwrap(),
            Resolution {
                genre: "pop".to_string(),
                source: GenreSource::Sentiment(Sentiment::Positive),
            }
        );
        for sentiment in [Sentiment::Negative, Sentiment::Neutral] {
            let result = recommendation(None, sentiment);
            let resolution = resolver.resolve(None, Some(&result), None).unwrap();
            assert_eq!(resolution.genre, "jazz");
        }
    }

    #[test]
    fn test_carried_genre_wins_over_everything() {
        let result = recommendation(Some("calm"), Sentiment::Positive);
        let resolution = resolver()
            .resolve(Some("rock"), Some(&result), Some("metal"))
            .unwrap();
        assert_eq!(resolution.genre, "rock");
        assert_eq!(resolution.source, GenreSource::Carried);
    }

    #[test]
    fn test_explicit_choice_wins_over_inference() {
        let result = recommendation(Some("calm"), Sentiment::Positive);
        let resolution = resolver().resolve(Some(""), Some(&result), Some("electronic")).unwrap();
        assert_eq!(resolution.genre, "electronic");
        assert_eq!(resolution.source, GenreSource::Chosen);
    }

    #[test]
    fn test_unknown_genre_or_other_intent_is_a_resolution_error() {
        let resolver = resolver();
        let polka = recommendation(Some("polka"), Sentiment::Positive);
        assert!(matches!(
            resolver.resolve(None, Some(&polka), None),
            Err(RecommendationError::Resolution(_))
        ));

        let greeting = RecognitionResult {
            top_intent: "Greeting".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            resolver.resolve(None, Some(&greeting), None),
            Err(RecommendationError::Resolution(_))
        ));
        assert!(resolver.resolve(Some("polka"), None, None).is_err());
    }
}
