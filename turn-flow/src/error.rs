use thiserror::Error;

/// Errors that abort a turn and surface to the host
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Step not found at index {0}")]
    StepNotFound(usize),

    /// A step was resumed with a prompt result of the wrong shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Step execution failed: {0}")]
    StepFailed(String),

    #[error("Turn exceeded {0} step transitions without suspending")]
    TransitionLimit(usize),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;
