use super::types::ChatMessage;

/// Events the network task sends up to the UI side.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    Registered(String),
    MessageReceived(ChatMessage),
    SendFailed { to: String, reason: String },
    PeerConnected(String),
    PeerDisconnected(String),
}
