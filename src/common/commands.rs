use super::types::ChatMessage;

/// Commands the UI side sends down to the network task.
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Subscribe to the inbox of `identity`.
    Register { identity: String },
    /// Publish to the recipient's inbox and echo back locally.
    SendMessage(ChatMessage),
    Shutdown,
}
