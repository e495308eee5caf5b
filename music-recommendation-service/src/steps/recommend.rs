use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use turn_flow::{NextAction, Prompt, Result, Step, StepContext};

use super::types::{RecommendationState, ResumeOptions, messages};
use crate::{card::CardRenderer, genre::GenreResolver, selector::RecommendationSelector};

/// Picks a song from the resolved genre, shows it, and asks whether it landed
pub struct RecommendStep {
    resolver: GenreResolver,
    selector: Arc<RecommendationSelector>,
    renderer: Arc<dyn CardRenderer>,
}

impl RecommendStep {
    pub fn new(
        resolver: GenreResolver,
        selector: Arc<RecommendationSelector>,
        renderer: Arc<dyn CardRenderer>,
    ) -> Self {
        Self {
            resolver,
            selector,
            renderer,
        }
    }
}

#[async_trait]
impl Step<RecommendationState> for RecommendStep {
    fn id(&self) -> &str {
        "recommend"
    }

    async fn run(
        &self,
        ctx: &mut StepContext<'_, RecommendationState>,
    ) -> Result<NextAction<ResumeOptions>> {
        // No genre yet means the previous step asked the user to pick one
        let genre = match ctx.state.resolved_genre.clone() {
            Some(genre) => genre,
            None => {
                let chosen = ctx.choice()?;
                self.resolver.resolve(None, None, Some(chosen))?.genre
            }
        };

        let item = self.selector.select(&genre)?;
        info!(genre = %genre, creator = %item.creator, title = %item.title, "Recommending");
        let card = self.renderer.render(&item)?;

        ctx.state.resolved_genre = Some(genre);
        ctx.send_text(messages::RECOMMENDATION_INTRO);
        ctx.send_attachment(card);
        Ok(NextAction::WaitForInput(Prompt::confirm(messages::CONFIRM)))
    }
}
