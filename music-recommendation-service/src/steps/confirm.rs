use async_trait::async_trait;
use tracing::info;
use turn_flow::{NextAction, Prompt, Result, Step, StepContext};

use super::types::{RecommendationState, ResumeOptions, messages};

/// Starts the conversation over once the user says whether they liked the song.
/// A liked genre is carried into the next round; a disliked one is dropped.
pub struct ConfirmStep;

/// Hand the conversation to a fresh flow instance carrying `carried_genre`
pub fn restart(carried_genre: Option<String>) -> NextAction<ResumeOptions> {
    NextAction::Restart(ResumeOptions { carried_genre })
}

#[async_trait]
impl Step<RecommendationState> for ConfirmStep {
    fn id(&self) -> &str {
        "confirm"
    }

    async fn run(
        &self,
        ctx: &mut StepContext<'_, RecommendationState>,
    ) -> Result<NextAction<ResumeOptions>> {
        let enjoyed = ctx.confirmed()?;
        let (acknowledgement, carried) = if enjoyed {
            (messages::ENJOYED, ctx.state.resolved_genre.clone())
        } else {
            (messages::NOT_ENJOYED, None)
        };
        info!(enjoyed, carried = ?carried, "Recommendation rated");

        // The acknowledgement goes out as a free-text prompt; its reply is never read
        // because the restarted flow takes over this turn.
        ctx.send_prompt(Prompt::free_text(acknowledgement));
        Ok(restart(carried))
    }
}
