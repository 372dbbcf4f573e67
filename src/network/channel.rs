use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::common::{ChatError, ChatMessage, NetworkCommand, NetworkEvent, Result};

use super::client::{NetworkSettings, P2PClient};

const CHANNEL_CAPACITY: usize = 100;

/// Publish/subscribe channel a chat session talks through.
pub trait ChatTransport {
    /// Announce `identity` so messages addressed to it are delivered here.
    fn register(&mut self, identity: &str) -> Result<()>;
    fn emit(&mut self, message: ChatMessage) -> Result<()>;
    /// Next pending event, without blocking.
    fn try_next_event(&mut self) -> Option<NetworkEvent>;
    fn close(&mut self);
}

/// Owned handle to a running `P2PClient` task.
pub struct ChatChannel {
    command_sender: mpsc::Sender<NetworkCommand>,
    event_receiver: mpsc::Receiver<NetworkEvent>,
    task: Option<JoinHandle<()>>,
}

impl ChatChannel {
    /// Spawn the network task. Must be called from within a tokio runtime.
    pub fn open(settings: NetworkSettings) -> Self {
        // UI -> Network
        let (command_sender, command_receiver) = mpsc::channel(CHANNEL_CAPACITY);
        // Network -> UI
        let (event_sender, event_receiver) = mpsc::channel(CHANNEL_CAPACITY);

        let task = tokio::spawn(async move {
            let client = P2PClient::new(event_sender, command_receiver, settings);
            if let Err(err) = client.run().await {
                log::error!("Network client terminated: {err}");
            }
        });

        Self {
            command_sender,
            event_receiver,
            task: Some(task),
        }
    }

    fn send(&self, command: NetworkCommand) -> Result<()> {
        if self.task.is_none() {
            return Err(ChatError::TransportUnavailable);
        }
        self.command_sender.try_send(command).map_err(|err| {
            log::warn!("Failed to send command to network: {err}");
            ChatError::TransportUnavailable
        })
    }
}

impl ChatTransport for ChatChannel {
    fn register(&mut self, identity: &str) -> Result<()> {
        self.send(NetworkCommand::Register {
            identity: identity.to_string(),
        })
    }

    fn emit(&mut self, message: ChatMessage) -> Result<()> {
        self.send(NetworkCommand::SendMessage(message))
    }

    fn try_next_event(&mut self) -> Option<NetworkEvent> {
        self.event_receiver.try_recv().ok()
    }

    fn close(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if self.command_sender.try_send(NetworkCommand::Shutdown).is_err() {
            task.abort();
        }
        log::info!("Chat channel closed");
    }
}

impl Drop for ChatChannel {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
pub(crate) use loopback::Loopback;

#[cfg(test)]
mod loopback {
    use std::collections::VecDeque;

    use super::ChatTransport;
    use crate::common::{ChatError, ChatMessage, NetworkEvent, Result};

    /// Delivers every emitted message straight back, like a broadcasting server.
    #[derive(Default)]
    pub(crate) struct Loopback {
        pub(crate) registered: Vec<String>,
        pub(crate) pending: VecDeque<NetworkEvent>,
        pub(crate) closes: usize,
        pub(crate) offline: bool,
    }

    impl ChatTransport for Loopback {
        fn register(&mut self, identity: &str) -> Result<()> {
            if self.offline {
                return Err(ChatError::TransportUnavailable);
            }
            self.registered.push(identity.to_string());
            self.pending
                .push_back(NetworkEvent::Registered(identity.to_string()));
            Ok(())
        }

        fn emit(&mut self, message: ChatMessage) -> Result<()> {
            if self.offline {
                return Err(ChatError::TransportUnavailable);
            }
            self.pending.push_back(NetworkEvent::MessageReceived(message));
            Ok(())
        }

        fn try_next_event(&mut self) -> Option<NetworkEvent> {
            self.pending.pop_front()
        }

        fn close(&mut self) {
            self.closes += 1;
        }
    }
}
