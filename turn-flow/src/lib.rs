pub mod activity;
pub mod error;
pub mod flow;
pub mod interrupt;
pub mod prompt;
pub mod runner;
pub mod step;
pub mod storage;

// Re-export commonly used types
pub use activity::{Activity, Attachment};
pub use error::{FlowError, Result};
pub use flow::{ExecutionResult, ExecutionStatus, Flow, FlowBuilder, MAX_TRANSITIONS_PER_TURN};
pub use interrupt::{InterruptHandler, Interruption};
pub use prompt::{Prompt, PromptKind, PromptResult};
pub use runner::FlowRunner;
pub use step::{FlowState, NextAction, Step, StepContext};
pub use storage::{InMemorySessionStorage, Session, SessionStorage};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Notes {
        name: Option<String>,
        visits: u32,
    }

    impl FlowState for Notes {
        type Resume = String;
    }

    /// Asks for a name unless one was carried over
    struct AskName;

    #[async_trait]
    impl Step<Notes> for AskName {
        fn id(&self) -> &str {
            "ask_name"
        }

        async fn run(&self, ctx: &mut StepContext<'_, Notes>) -> Result<NextAction<String>> {
            ctx.state.visits += 1;
            if let Some(name) = ctx.resume() {
                ctx.state.name = Some(name.clone());
                return Ok(NextAction::Advance);
            }
            Ok(NextAction::WaitForInput(Prompt::free_text("Name?")))
        }
    }

    struct Greet;

    #[async_trait]
    impl Step<Notes> for Greet {
        fn id(&self) -> &str {
            "greet"
        }

        async fn run(&self, ctx: &mut StepContext<'_, Notes>) -> Result<NextAction<String>> {
            if ctx.state.name.is_none() {
                ctx.state.name = match ctx.prompt_result() {
                    Some(PromptResult::Text(name)) => Some(name.clone()),
                    _ => None,
                };
            }
            let name = ctx.state.name.clone().unwrap_or_default();
            ctx.send_text(format!("Hello, {name}"));
            Ok(NextAction::WaitForInput(Prompt::confirm("Again?")))
        }
    }

    struct Again;

    #[async_trait]
    impl Step<Notes> for Again {
        fn id(&self) -> &str {
            "again"
        }

        async fn run(&self, ctx: &mut StepContext<'_, Notes>) -> Result<NextAction<String>> {
            if ctx.confirmed()? {
                let name = ctx.state.name.clone().unwrap_or_default();
                Ok(NextAction::Restart(name))
            } else {
                Ok(NextAction::Complete)
            }
        }
    }

    struct Commands;

    impl InterruptHandler for Commands {
        fn check(&self, text: &str) -> Option<Interruption> {
            match text.to_lowercase().as_str() {
                "stop" => Some(Interruption::Cancel {
                    message: "bye".to_string(),
                }),
                "reset" => Some(Interruption::Restart {
                    message: "resetting".to_string(),
                }),
                _ => None,
            }
        }
    }

    fn greeting_flow() -> Flow<Notes> {
        FlowBuilder::new("greeting")
            .add_step(Arc::new(AskName))
            .add_step(Arc::new(Greet))
            .add_step(Arc::new(Again))
            .with_interrupt_handler(Arc::new(Commands))
            .build()
    }

    fn texts(result: &ExecutionResult) -> Vec<&str> {
        result.activities.iter().filter_map(Activity::as_text).collect()
    }

    #[tokio::test]
    async fn test_prompt_reply_is_delivered_to_the_next_step() {
        let flow = greeting_flow();
        let mut session = Session::new("s1", "greeting");

        let first = flow.execute_session(&mut session, "hi").await.unwrap();
        assert_eq!(first.status, ExecutionStatus::WaitingForInput(PromptKind::FreeText));
        assert_eq!(session.step_index, 0);

        let second = flow.execute_session(&mut session, "Ada").await.unwrap();
        assert_eq!(texts(&second), vec!["Hello, Ada", "Again?"]);
        assert_eq!(session.step_index, 1);
        assert_eq!(session.pending_prompt_kind(), PromptKind::Confirm);
    }

    #[tokio::test]
    async fn test_unrecognized_reply_prompts_again_without_running_steps() {
        let flow = greeting_flow();
        let mut session = Session::new("s1", "greeting");
        flow.execute_session(&mut session, "hi").await.unwrap();
        flow.execute_session(&mut session, "Ada").await.unwrap();

        let result = flow.execute_session(&mut session, "perhaps").await.unwrap();
        assert_eq!(texts(&result), vec!["Again?"]);
        assert_eq!(session.step_index, 1);
        assert_eq!(session.state.visits, 1);
    }

    #[tokio::test]
    async fn test_restart_carries_resume_options_into_a_fresh_state() {
        let flow = greeting_flow();
        let mut session = Session::new("s1", "greeting");
        flow.execute_session(&mut session, "hi").await.unwrap();
        flow.execute_session(&mut session, "Ada").await.unwrap();

        let result = flow.execute_session(&mut session, "yes").await.unwrap();
        assert_eq!(texts(&result), vec!["Hello, Ada", "Again?"]);
        assert_eq!(session.state.name.as_deref(), Some("Ada"));
        // Replaced, not merged: the visit counter starts over
        assert_eq!(session.state.visits, 1);
        // Carry-over does not outlive the turn that restarted the flow
        assert!(session.resume.is_none());
    }

    #[tokio::test]
    async fn test_cancel_interrupt_stops_before_any_step() {
        let flow = greeting_flow();
        let mut session = Session::new("s1", "greeting");
        flow.execute_session(&mut session, "hi").await.unwrap();

        let result = flow.execute_session(&mut session, "STOP").await.unwrap();
        assert_eq!(result.status, ExecutionStatus::Cancelled);
        assert_eq!(texts(&result), vec!["bye"]);
        assert!(!session.is_active());
        assert_eq!(session.state.visits, 0);
    }

    #[tokio::test]
    async fn test_restart_interrupt_reenters_the_first_step() {
        let flow = greeting_flow();
        let mut session = Session::new("s1", "greeting");
        flow.execute_session(&mut session, "hi").await.unwrap();
        flow.execute_session(&mut session, "Ada").await.unwrap();

        let result = flow.execute_session(&mut session, "reset").await.unwrap();
        assert_eq!(texts(&result), vec!["resetting", "Name?"]);
        assert_eq!(session.step_index, 0);
        assert!(session.resume.is_none());
    }

    #[tokio::test]
    async fn test_interrupts_are_ignored_when_no_flow_is_active() {
        let flow = greeting_flow();
        let mut session = Session::new("s1", "greeting");

        let result = flow.execute_session(&mut session, "stop").await.unwrap();
        assert_eq!(texts(&result), vec!["Name?"]);
    }

    #[tokio::test]
    async fn test_completed_flow_resets_the_session() {
        let flow = greeting_flow();
        let mut session = Session::new("s1", "greeting");
        flow.execute_session(&mut session, "hi").await.unwrap();
        flow.execute_session(&mut session, "Ada").await.unwrap();

        let result = flow.execute_session(&mut session, "no").await.unwrap();
        assert_eq!(result.status, ExecutionStatus::Completed);
        assert_eq!(session.step_index, 0);
        assert!(session.state.name.is_none());
    }

    #[tokio::test]
    async fn test_wrong_prompt_result_is_a_protocol_error() {
        let flow: Flow<Notes> = FlowBuilder::new("broken")
            .add_step(Arc::new(AskName))
            .add_step(Arc::new(Again))
            .build();
        let mut session = Session::new("s1", "broken");
        flow.execute_session(&mut session, "hi").await.unwrap();

        let err = flow.execute_session(&mut session, "Ada").await.unwrap_err();
        assert!(matches!(err, FlowError::Protocol(_)));
    }

    struct Broken;

    #[async_trait]
    impl Step<Notes> for Broken {
        async fn run(&self, ctx: &mut StepContext<'_, Notes>) -> Result<NextAction<String>> {
            ctx.state.visits += 10;
            ctx.send_text("half done");
            Err(FlowError::StepFailed("backend unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_the_session_suspended_on_its_prompt() {
        let flow: Flow<Notes> = FlowBuilder::new("fragile")
            .add_step(Arc::new(AskName))
            .add_step(Arc::new(Broken))
            .with_interrupt_handler(Arc::new(Commands))
            .build();
        let mut session = Session::new("s1", "fragile");
        flow.execute_session(&mut session, "hi").await.unwrap();

        let err = flow.execute_session(&mut session, "Ada").await.unwrap_err();
        assert!(matches!(err, FlowError::StepFailed(_)));
        assert_eq!(session.step_index, 0);
        assert_eq!(session.pending_prompt_kind(), PromptKind::FreeText);
        assert_eq!(session.state.visits, 1);
        assert_eq!(session.turn_count, 1);

        let result = flow.execute_session(&mut session, "stop").await.unwrap();
        assert_eq!(result.status, ExecutionStatus::Cancelled);
        assert_eq!(texts(&result), vec!["bye"]);
    }

    struct Loop;

    #[async_trait]
    impl Step<Notes> for Loop {
        async fn run(&self, _ctx: &mut StepContext<'_, Notes>) -> Result<NextAction<String>> {
            Ok(NextAction::Restart(String::new()))
        }
    }

    #[tokio::test]
    async fn test_restart_cycle_hits_the_transition_limit() {
        let flow: Flow<Notes> = FlowBuilder::new("loop").add_step(Arc::new(Loop)).build();
        let mut session = Session::new("s1", "loop");

        let err = flow.execute_session(&mut session, "go").await.unwrap_err();
        assert!(matches!(err, FlowError::TransitionLimit(_)));
        assert!(flow.step_ids()[0].ends_with("Loop"));
    }

    #[tokio::test]
    async fn test_runner_persists_and_discards_sessions() {
        let storage: Arc<InMemorySessionStorage<Notes>> = Arc::new(InMemorySessionStorage::new());
        let runner = FlowRunner::new(Arc::new(greeting_flow()), storage.clone());

        runner.run("s1", "hi").await.unwrap();
        runner.run("s1", "Ada").await.unwrap();
        let saved = storage.get("s1").await.unwrap().unwrap();
        assert_eq!(saved.state.name.as_deref(), Some("Ada"));
        assert_eq!(saved.turn_count, 2);

        let result = runner.run("s1", "stop").await.unwrap();
        assert_eq!(result.status, ExecutionStatus::Cancelled);
        assert!(storage.get("s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_runner_releases_locks_of_ended_conversations() {
        let storage: Arc<InMemorySessionStorage<Notes>> = Arc::new(InMemorySessionStorage::new());
        let runner = FlowRunner::new(Arc::new(greeting_flow()), storage.clone());

        for i in 0..20 {
            let id = format!("s{i}");
            runner.run(&id, "hi").await.unwrap();
            runner.run(&id, "Ada").await.unwrap();
            let result = runner.run(&id, "no").await.unwrap();
            assert_eq!(result.status, ExecutionStatus::Completed);
            assert!(storage.get(&id).await.unwrap().is_none());
        }
        assert_eq!(runner.lock_count(), 0);

        runner.run("waiting", "hi").await.unwrap();
        assert_eq!(runner.lock_count(), 1);
        runner.run("waiting", "stop").await.unwrap();
        assert_eq!(runner.lock_count(), 0);
    }
}
