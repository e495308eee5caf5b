use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

use crate::{
    activity::{Activity, Attachment},
    error::{FlowError, Result},
    prompt::{Prompt, PromptResult},
};

/// Typed per-conversation state shared by the steps of one flow instance.
///
/// `Default` is the state of a freshly started flow. `Resume` is the carry-over a
/// finished flow hands to the instance that replaces it.
pub trait FlowState:
    Default + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Resume: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;
}

/// Defines what should happen after a step runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction<R> {
    /// Send the prompt and suspend until the next turn
    WaitForInput(Prompt),
    /// Run the next step immediately, in the same turn
    Advance,
    /// The flow is finished
    Complete,
    /// Discard this flow instance and start a fresh one with the given carry-over
    Restart(R),
}

/// Everything a step may read or produce during one invocation
pub struct StepContext<'a, S: FlowState> {
    /// Raw text of the inbound message for this turn
    pub text: &'a str,
    pub state: &'a mut S,
    resume: Option<&'a S::Resume>,
    input: Option<PromptResult>,
    outbox: &'a mut Vec<Activity>,
}

impl<'a, S: FlowState> StepContext<'a, S> {
    pub fn new(
        text: &'a str,
        state: &'a mut S,
        resume: Option<&'a S::Resume>,
        input: Option<PromptResult>,
        outbox: &'a mut Vec<Activity>,
    ) -> Self {
        Self {
            text,
            state,
            resume,
            input,
            outbox,
        }
    }

    /// Carry-over this flow instance was started with, if any
    pub fn resume(&self) -> Option<&'a S::Resume> {
        self.resume
    }

    /// Reply to the prompt issued by the previous step, if this step was resumed
    pub fn prompt_result(&self) -> Option<&PromptResult> {
        self.input.as_ref()
    }

    /// The selected option of a choice prompt
    pub fn choice(&self) -> Result<&str> {
        match &self.input {
            Some(PromptResult::Choice(value)) => Ok(value),
            other => Err(FlowError::Protocol(format!(
                "expected a choice result, got {other:?}"
            ))),
        }
    }

    /// The answer to a yes/no prompt
    pub fn confirmed(&self) -> Result<bool> {
        match &self.input {
            Some(PromptResult::Confirm(value)) => Ok(*value),
            other => Err(FlowError::Protocol(format!(
                "expected a confirm result, got {other:?}"
            ))),
        }
    }

    pub fn send_text(&mut self, text: impl Into<String>) {
        self.outbox.push(Activity::text(text));
    }

    pub fn send_attachment(&mut self, attachment: Attachment) {
        self.outbox.push(Activity::Attachment { attachment });
    }

    /// Send a prompt without suspending. Nothing routes a reply back to it.
    pub fn send_prompt(&mut self, prompt: Prompt) {
        self.outbox.push(Activity::Prompt { prompt });
    }
}

/// Core trait that all steps must implement
#[async_trait]
pub trait Step<S: FlowState>: Send + Sync {
    /// Unique identifier for this step
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Execute the step against the conversation state
    async fn run(&self, ctx: &mut StepContext<'_, S>) -> Result<NextAction<S::Resume>>;
}
