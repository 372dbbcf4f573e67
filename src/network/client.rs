use std::error::Error;

use futures::StreamExt;
use libp2p::gossipsub;
use libp2p::multiaddr::Protocol;
use libp2p::swarm::SwarmEvent;
use libp2p::{Multiaddr, PeerId, Swarm, identity, mdns};
use tokio::sync::mpsc;

use crate::common::{ChatMessage, NetworkCommand, NetworkEvent};

use super::behavior::{ChatBehavior, ChatBehaviorEvent, inbox_topic};
use super::swarm::build_chat_swarm;

#[derive(Debug, Clone)]
pub struct NetworkSettings {
    pub listen_addr: String,
    pub bootstrap_nodes: Vec<String>,
}

/// Background task driving the libp2p swarm for one chat channel.
pub struct P2PClient {
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
    settings: NetworkSettings,
    identity: Option<String>,
}

impl P2PClient {
    pub fn new(
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
        settings: NetworkSettings,
    ) -> Self {
        Self {
            event_sender,
            command_receiver,
            settings,
            identity: None,
        }
    }

    pub async fn run(mut self) -> Result<(), Box<dyn Error>> {
        let local_key = identity::Keypair::generate_ed25519();
        let mut swarm = build_chat_swarm(&local_key)?;
        log::info!("Local PeerID: {:?}", swarm.local_peer_id());

        swarm.listen_on(self.settings.listen_addr.parse()?)?;

        for (peer_id, addr) in parse_bootstrap_peers(&self.settings.bootstrap_nodes) {
            log::info!("Dialing bootstrap peer {peer_id} at {addr}");
            swarm.behaviour_mut().gossipsub.add_explicit_peer(&peer_id);
            if let Err(err) = swarm.dial(addr) {
                log::warn!("Failed to dial bootstrap peer {peer_id}: {err}");
            }
        }

        log::info!("Network event loop started");

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(NetworkCommand::Shutdown) | None => break,
                        Some(command) => self.handle_command(command, &mut swarm).await,
                    }
                }
                event = swarm.select_next_some() => {
                    self.handle_swarm_event(event, &mut swarm).await;
                }
            }
        }

        log::info!("Network event loop stopped");
        Ok(())
    }

    async fn handle_command(&mut self, command: NetworkCommand, swarm: &mut Swarm<ChatBehavior>) {
        match command {
            NetworkCommand::Register { identity } => {
                self.register(identity, swarm).await;
            }
            NetworkCommand::SendMessage(message) => {
                self.publish(message, swarm).await;
            }
            NetworkCommand::Shutdown => {}
        }
    }

    async fn register(&mut self, identity: String, swarm: &mut Swarm<ChatBehavior>) {
        if let Some(previous) = self.identity.take() {
            let _ = swarm
                .behaviour_mut()
                .gossipsub
                .unsubscribe(&inbox_topic(&previous));
        }

        match swarm
            .behaviour_mut()
            .gossipsub
            .subscribe(&inbox_topic(&identity))
        {
            Ok(_) => {
                log::info!("Registered identity {identity}");
                self.identity = Some(identity.clone());
                self.emit(NetworkEvent::Registered(identity)).await;
            }
            Err(err) => {
                log::error!("Failed to subscribe inbox for {identity}: {err:?}");
            }
        }
    }

    /// Publish to the recipient's inbox, then echo the message back to the local side.
    async fn publish(&mut self, message: ChatMessage, swarm: &mut Swarm<ChatBehavior>) {
        let payload = match serde_json::to_vec(&message) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("Failed to serialize message: {err:?}");
                return;
            }
        };

        match swarm
            .behaviour_mut()
            .gossipsub
            .publish(inbox_topic(&message.to), payload)
        {
            Ok(_) => {
                log::debug!("Published message to {}", message.to);
                self.emit(NetworkEvent::MessageReceived(message)).await;
            }
            Err(err) => {
                log::warn!("Publish error: {err:?}");
                self.emit(NetworkEvent::SendFailed {
                    to: message.to,
                    reason: err.to_string(),
                })
                .await;
            }
        }
    }

    async fn handle_swarm_event(
        &mut self,
        event: SwarmEvent<ChatBehaviorEvent>,
        swarm: &mut Swarm<ChatBehavior>,
    ) {
        match event {
            SwarmEvent::Behaviour(ChatBehaviorEvent::Gossipsub(gossipsub::Event::Message {
                message,
                ..
            })) => match serde_json::from_slice::<ChatMessage>(&message.data) {
                Ok(chat_msg) => {
                    log::debug!("Received message from {}", chat_msg.from);
                    self.emit(NetworkEvent::MessageReceived(chat_msg)).await;
                }
                Err(err) => {
                    log::warn!("Dropping undecodable chat payload: {err}");
                }
            },
            SwarmEvent::Behaviour(ChatBehaviorEvent::Mdns(mdns::Event::Discovered(list))) => {
                for (peer_id, _) in list {
                    swarm.behaviour_mut().gossipsub.add_explicit_peer(&peer_id);
                    self.emit(NetworkEvent::PeerConnected(peer_id.to_string()))
                        .await;
                }
            }
            SwarmEvent::Behaviour(ChatBehaviorEvent::Mdns(mdns::Event::Expired(list))) => {
                for (peer_id, _) in list {
                    swarm
                        .behaviour_mut()
                        .gossipsub
                        .remove_explicit_peer(&peer_id);
                    self.emit(NetworkEvent::PeerDisconnected(peer_id.to_string()))
                        .await;
                }
            }
            SwarmEvent::NewListenAddr { address, .. } => {
                log::info!("Listening on {address:?}");
            }
            _ => {}
        }
    }

    async fn emit(&self, event: NetworkEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to forward network event: {err}");
        }
    }
}

/// Split `.../p2p/<PeerId>` multiaddrs into dialable pairs, skipping invalid entries.
pub fn parse_bootstrap_peers(entries: &[String]) -> Vec<(PeerId, Multiaddr)> {
    entries
        .iter()
        .filter_map(|entry| {
            let mut addr: Multiaddr = match entry.parse() {
                Ok(addr) => addr,
                Err(err) => {
                    log::warn!("Invalid multiaddr `{entry}`: {err}");
                    return None;
                }
            };

            let peer_id = match addr.pop() {
                Some(Protocol::P2p(peer)) => peer,
                _ => {
                    log::warn!("Multiaddr `{entry}` missing /p2p/PeerId suffix");
                    return None;
                }
            };

            Some((peer_id, addr))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_entries_need_peer_id_suffix() {
        let peer_id = identity::Keypair::generate_ed25519().public().to_peer_id();
        let entries = vec![
            format!("/ip4/127.0.0.1/tcp/4001/p2p/{peer_id}"),
            "/ip4/127.0.0.1/tcp/4002".to_string(),
            "not an address".to_string(),
        ];

        let peers = parse_bootstrap_peers(&entries);

        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].0, peer_id);
        assert_eq!(peers[0].1.to_string(), "/ip4/127.0.0.1/tcp/4001");
    }
}
