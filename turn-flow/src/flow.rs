use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    activity::Activity,
    error::{FlowError, Result},
    interrupt::{InterruptHandler, Interruption},
    prompt::{PromptKind, PromptResult},
    step::{FlowState, NextAction, Step, StepContext},
    storage::Session,
};

/// Upper bound on step invocations within one turn. A flow that keeps restarting
/// without ever prompting would otherwise never yield.
pub const MAX_TRANSITIONS_PER_TURN: usize = 64;

/// An ordered sequence of steps executed one turn at a time
pub struct Flow<S: FlowState> {
    pub id: String,
    steps: Vec<Arc<dyn Step<S>>>,
    interrupt_handler: Option<Arc<dyn InterruptHandler>>,
}

impl<S: FlowState> Flow<S> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            steps: Vec::new(),
            interrupt_handler: None,
        }
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Process one inbound message for the session up to its next suspension point.
    ///
    /// An active session is first checked for interrupts, then its pending prompt is
    /// answered and the step after the prompting one runs with the reply. A session
    /// without a pending prompt starts the flow from its current step.
    ///
    /// The turn is applied to the session only when it succeeds. On error the session
    /// is left exactly as it was, still suspended on the same prompt.
    pub async fn execute_session(
        &self,
        session: &mut Session<S>,
        text: &str,
    ) -> Result<ExecutionResult> {
        let mut working = session.clone();
        match self.execute_turn(&mut working, text).await {
            Ok(result) => {
                *session = working;
                Ok(result)
            }
            Err(e) => {
                warn!(session_id = %session.id, step_index = session.step_index, error = %e, "Turn failed, session left unchanged");
                Err(e)
            }
        }
    }

    async fn execute_turn(&self, session: &mut Session<S>, text: &str) -> Result<ExecutionResult> {
        session.turn_count += 1;
        let mut outbox = Vec::new();
        let mut input = None;

        let interruption = match (&self.interrupt_handler, session.is_active()) {
            (Some(handler), true) => handler.check(text),
            _ => None,
        };

        match interruption {
            Some(Interruption::Cancel { message }) => {
                info!(session_id = %session.id, step_index = session.step_index, "Flow cancelled by user");
                outbox.push(Activity::text(message));
                session.restart(None);
                return Ok(ExecutionResult {
                    activities: outbox,
                    status: ExecutionStatus::Cancelled,
                });
            }
            Some(Interruption::Restart { message }) => {
                info!(session_id = %session.id, step_index = session.step_index, "Flow restarted by user");
                outbox.push(Activity::text(message));
                session.restart(None);
            }
            None => {
                if let Some(prompt) = session.pending_prompt.clone() {
                    match prompt.recognize(text) {
                        Some(result) => {
                            debug!(session_id = %session.id, result = ?result, "Prompt answered");
                            session.pending_prompt = None;
                            session.step_index += 1;
                            input = Some(result);
                        }
                        None => {
                            debug!(session_id = %session.id, kind = ?prompt.kind(), "Reply not recognized, prompting again");
                            let kind = prompt.kind();
                            outbox.push(Activity::Prompt { prompt });
                            return Ok(ExecutionResult {
                                activities: outbox,
                                status: ExecutionStatus::WaitingForInput(kind),
                            });
                        }
                    }
                }
            }
        }

        self.run_steps(session, text, input, outbox).await
    }

    /// Run steps from `session.step_index` until one suspends or the flow completes
    async fn run_steps(
        &self,
        session: &mut Session<S>,
        text: &str,
        mut input: Option<PromptResult>,
        mut outbox: Vec<Activity>,
    ) -> Result<ExecutionResult> {
        for _ in 0..MAX_TRANSITIONS_PER_TURN {
            let Some(step) = self.steps.get(session.step_index).cloned() else {
                if self.steps.is_empty() {
                    return Err(FlowError::StepNotFound(session.step_index));
                }
                info!(session_id = %session.id, flow_id = %self.id, "Flow completed");
                session.restart(None);
                return Ok(ExecutionResult {
                    activities: outbox,
                    status: ExecutionStatus::Completed,
                });
            };

            debug!(
                session_id = %session.id,
                step_id = %step.id(),
                step_index = session.step_index,
                "Running step"
            );

            let action = {
                let mut ctx = StepContext::new(
                    text,
                    &mut session.state,
                    session.resume.as_ref(),
                    input.take(),
                    &mut outbox,
                );
                step.run(&mut ctx).await?
            };

            match action {
                NextAction::WaitForInput(prompt) => {
                    let kind = prompt.kind();
                    session.pending_prompt = Some(prompt.clone());
                    session.resume = None;
                    outbox.push(Activity::Prompt { prompt });
                    return Ok(ExecutionResult {
                        activities: outbox,
                        status: ExecutionStatus::WaitingForInput(kind),
                    });
                }
                NextAction::Advance => session.step_index += 1,
                NextAction::Complete => session.step_index = self.steps.len(),
                NextAction::Restart(resume) => {
                    info!(session_id = %session.id, resume = ?resume, "Starting a new flow instance");
                    session.restart(Some(resume));
                }
            }
        }

        warn!(session_id = %session.id, "Turn did not reach a suspension point");
        Err(FlowError::TransitionLimit(MAX_TRANSITIONS_PER_TURN))
    }
}

/// Builder for creating flows
pub struct FlowBuilder<S: FlowState> {
    flow: Flow<S>,
}

impl<S: FlowState> FlowBuilder<S> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            flow: Flow::new(id),
        }
    }

    /// Append a step; steps run in the order they are added
    pub fn add_step(mut self, step: Arc<dyn Step<S>>) -> Self {
        self.flow.steps.push(step);
        self
    }

    pub fn with_interrupt_handler(mut self, handler: Arc<dyn InterruptHandler>) -> Self {
        self.flow.interrupt_handler = Some(handler);
        self
    }

    pub fn build(self) -> Flow<S> {
        self.flow
    }
}

/// Outcome of one turn
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub activities: Vec<Activity>,
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "prompt", rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Suspended on a prompt of the given kind
    WaitingForInput(PromptKind),
    /// The flow ran past its last step
    Completed,
    /// A cancel command ended the flow
    Cancelled,
}
