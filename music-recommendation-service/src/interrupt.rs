use turn_flow::{InterruptHandler, Interruption};

pub const CANCEL_MESSAGE: &str =
    "Thanks for coming in, hope to recommend you more music in the future!";
pub const RESTART_MESSAGE: &str = "Refreshing...";

/// Cancel and restart commands, honoured at any point of the conversation
pub struct GlobalCommands;

impl InterruptHandler for GlobalCommands {
    fn check(&self, text: &str) -> Option<Interruption> {
        match text.to_lowercase().as_str() {
            "end" | "cancel" | "quit" => Some(Interruption::Cancel {
                message: CANCEL_MESSAGE.to_string(),
            }),
            "restart" | "begin" => Some(Interruption::Restart {
                message: RESTART_MESSAGE.to_string(),
            }),
            _ => None,
        }
    }
}
