use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use turn_flow::{NextAction, Prompt, Result, Step, StepContext};

use super::types::{RecommendationState, ResumeOptions, messages};
use crate::recognizer::Recognizer;

/// Greets the user, unless there is nothing to ask: no recognizer to interpret the
/// answer, or a genre carried over from the previous round.
pub struct IntroStep {
    recognizer: Arc<dyn Recognizer>,
}

impl IntroStep {
    pub fn new(recognizer: Arc<dyn Recognizer>) -> Self {
        Self { recognizer }
    }
}

#[async_trait]
impl Step<RecommendationState> for IntroStep {
    fn id(&self) -> &str {
        "intro"
    }

    async fn run(
        &self,
        ctx: &mut StepContext<'_, RecommendationState>,
    ) -> Result<NextAction<ResumeOptions>> {
        let carried = ctx.resume().and_then(ResumeOptions::genre);
        if !self.recognizer.is_configured() || carried.is_some() {
            debug!(carried = ?carried, "Skipping greeting");
            return Ok(NextAction::Advance);
        }

        ctx.state.resolved_genre = None;
        Ok(NextAction::WaitForInput(Prompt::free_text(messages::GREETING)))
    }
}
