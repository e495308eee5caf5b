//! FlowRunner – convenience wrapper that loads a session, executes exactly **one** turn, and
//! persists the updated session back to storage.
//!
//! Turns for the same session id are serialized through a per-session lock, so a host
//! may call [`FlowRunner::run`] concurrently for any mix of conversations. Sessions whose
//! flow was cancelled or completed are deleted instead of saved; the next message for
//! that id starts a brand-new flow.
//!
//! Use `Flow::execute_session` directly when you want to own loading and saving, e.g. in
//! tests that inspect the `Session` between turns.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    error::Result,
    flow::{ExecutionResult, ExecutionStatus, Flow},
    step::FlowState,
    storage::{Session, SessionStorage},
};

/// High-level helper that orchestrates the common _load → execute → save_ pattern.
pub struct FlowRunner<S: FlowState> {
    flow: Arc<Flow<S>>,
    storage: Arc<dyn SessionStorage<S>>,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl<S: FlowState> Clone for FlowRunner<S> {
    fn clone(&self) -> Self {
        Self {
            flow: self.flow.clone(),
            storage: self.storage.clone(),
            locks: self.locks.clone(),
        }
    }
}

impl<S: FlowState> FlowRunner<S> {
    /// Create a new `FlowRunner` from an `Arc<Flow>` and any `SessionStorage` implementation.
    pub fn new(flow: Arc<Flow<S>>, storage: Arc<dyn SessionStorage<S>>) -> Self {
        Self {
            flow,
            storage,
            locks: Arc::new(DashMap::new()),
        }
    }

    pub fn flow(&self) -> &Flow<S> {
        &self.flow
    }

    /// Process one inbound message for `session_id`, creating the session if needed.
    pub async fn run(&self, session_id: &str, text: &str) -> Result<ExecutionResult> {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;
            self.run_turn(session_id, text).await
        };

        // Forget the lock of an ended conversation unless another turn holds it
        let ended = matches!(
            result,
            Ok(ExecutionResult {
                status: ExecutionStatus::Cancelled | ExecutionStatus::Completed,
                ..
            })
        );
        if ended {
            drop(lock);
            self.locks
                .remove_if(session_id, |_, lock| Arc::strong_count(lock) == 1);
        }

        result
    }

    async fn run_turn(&self, session_id: &str, text: &str) -> Result<ExecutionResult> {
        // 1. Load session, or start a new conversation
        let mut session = match self.storage.get(session_id).await? {
            Some(session) => session,
            None => {
                debug!(session_id = %session_id, "Creating new session");
                Session::new(session_id, self.flow.id.clone())
            }
        };

        // 2. Execute one turn
        let result = self.flow.execute_session(&mut session, text).await?;

        // 3. Persist, or drop the conversation state once the flow has ended
        match result.status {
            ExecutionStatus::WaitingForInput(_) => self.storage.save(session).await?,
            ExecutionStatus::Cancelled | ExecutionStatus::Completed => {
                debug!(session_id = %session_id, status = ?result.status, "Discarding session");
                self.storage.delete(session_id).await?
            }
        }

        Ok(result)
    }

    #[cfg(test)]
    pub(crate) fn lock_count(&self) -> usize {
        self.locks.len()
    }
}
