use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use turn_flow::{NextAction, Prompt, Result, Step, StepContext};

use super::types::{RecommendationState, ResumeOptions, messages};
use crate::{
    catalog::Catalog,
    genre::{GenreResolver, GenreSource},
    recognizer::{Recognition, Recognizer, Sentiment},
};

/// Works out which genre to recommend from; offers the genre list when it cannot
pub struct ResolveGenreStep {
    recognizer: Arc<dyn Recognizer>,
    resolver: GenreResolver,
    catalog: Arc<Catalog>,
}

impl ResolveGenreStep {
    pub fn new(
        recognizer: Arc<dyn Recognizer>,
        resolver: GenreResolver,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            recognizer,
            resolver,
            catalog,
        }
    }

    fn genre_choice(&self) -> NextAction<ResumeOptions> {
        NextAction::WaitForInput(Prompt::choice(
            messages::GENRE_CHOICE,
            self.catalog.genre_keys(),
        ))
    }
}

#[async_trait]
impl Step<RecommendationState> for ResolveGenreStep {
    fn id(&self) -> &str {
        "resolve_genre"
    }

    async fn run(
        &self,
        ctx: &mut StepContext<'_, RecommendationState>,
    ) -> Result<NextAction<ResumeOptions>> {
        ctx.state.resolved_genre = None;

        if let Some(carried) = ctx.resume().and_then(ResumeOptions::genre) {
            return match self.resolver.resolve(Some(carried), None, None) {
                Ok(resolution) => {
                    info!(genre = %resolution.genre, "Reusing carried-over genre");
                    ctx.state.resolved_genre = Some(resolution.genre);
                    Ok(NextAction::Advance)
                }
                Err(e) => {
                    warn!(error = %e, "Carried-over genre rejected, offering the list");
                    Ok(self.genre_choice())
                }
            };
        }

        let recognition = match self.recognizer.recognize(ctx.text).await {
            Ok(Recognition::Recognized(result)) => result,
            Ok(Recognition::NotConfigured) => return Ok(self.genre_choice()),
            Err(e) => {
                warn!(error = %e, "Recognition failed, offering the list");
                return Ok(self.genre_choice());
            }
        };

        match self.resolver.resolve(None, Some(&recognition), None) {
            Ok(resolution) => {
                if let GenreSource::Sentiment(sentiment) = resolution.source {
                    ctx.send_text(match sentiment {
                        Sentiment::Positive => messages::POSITIVE_ACK,
                        Sentiment::Negative | Sentiment::Neutral => messages::NEGATIVE_ACK,
                    });
                }
                info!(genre = %resolution.genre, source = ?resolution.source, "Genre inferred");
                ctx.state.resolved_genre = Some(resolution.genre);
                Ok(NextAction::Advance)
            }
            Err(e) => {
                info!(intent = %recognition.top_intent, reason = %e, "No genre inferred, offering the list");
                Ok(self.genre_choice())
            }
        }
    }
}
