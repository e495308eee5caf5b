/// A global command recognized ahead of normal step logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interruption {
    /// Send `message`, then cancel every active step. Nothing else runs this turn.
    Cancel { message: String },
    /// Send `message`, then start the flow over from its first step without carry-over
    Restart { message: String },
}

/// Inspects each inbound message before any suspended step is resumed
pub trait InterruptHandler: Send + Sync {
    fn check(&self, text: &str) -> Option<Interruption>;
}
