use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::Result,
    prompt::{Prompt, PromptKind},
    step::FlowState,
};

/// Session information for one conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Session<S: FlowState> {
    pub id: String,
    pub flow_id: String,
    /// Index of the step that runs next, or that is suspended on `pending_prompt`
    pub step_index: usize,
    pub state: S,
    /// Carry-over a restarted flow instance was started with. Only the turn that
    /// performed the restart sees it; it is dropped when the instance first suspends.
    pub resume: Option<S::Resume>,
    pub pending_prompt: Option<Prompt>,
    pub turn_count: u64,
}

impl<S: FlowState> Session<S> {
    pub fn new(id: impl Into<String>, flow_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            flow_id: flow_id.into(),
            step_index: 0,
            state: S::default(),
            resume: None,
            pending_prompt: None,
            turn_count: 0,
        }
    }

    /// Whether a flow instance is suspended waiting on the user
    pub fn is_active(&self) -> bool {
        self.pending_prompt.is_some()
    }

    pub fn pending_prompt_kind(&self) -> PromptKind {
        self.pending_prompt
            .as_ref()
            .map(Prompt::kind)
            .unwrap_or_default()
    }

    /// Replace the flow instance wholesale: fresh state, first step, given carry-over
    pub fn restart(&mut self, resume: Option<S::Resume>) {
        self.state = S::default();
        self.step_index = 0;
        self.resume = resume;
        self.pending_prompt = None;
    }
}

/// Trait for storing and retrieving sessions
#[async_trait]
pub trait SessionStorage<S: FlowState>: Send + Sync {
    async fn save(&self, session: Session<S>) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Session<S>>>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// In-memory implementation of SessionStorage
pub struct InMemorySessionStorage<S: FlowState> {
    sessions: Arc<DashMap<String, Session<S>>>,
}

impl<S: FlowState> InMemorySessionStorage<S> {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }
}

impl<S: FlowState> Default for InMemorySessionStorage<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S: FlowState> SessionStorage<S> for InMemorySessionStorage<S> {
    async fn save(&self, session: Session<S>) -> Result<()> {
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Session<S>>> {
        Ok(self.sessions.get(id).map(|entry| entry.clone()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.sessions.remove(id);
        Ok(())
    }
}
