use std::collections::hash_map::DefaultHasher;
use std::error::Error;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use libp2p::gossipsub::{self, IdentTopic};
use libp2p::mdns;
use libp2p::swarm::NetworkBehaviour;
use libp2p::{PeerId, identity};

const INBOX_TOPIC_PREFIX: &str = "shopora-chat/inbox/";

#[derive(NetworkBehaviour)]
pub struct ChatBehavior {
    pub gossipsub: gossipsub::Behaviour,
    pub mdns: mdns::tokio::Behaviour,
}

/// Topic an identity listens on once registered.
pub fn inbox_topic(identity: &str) -> IdentTopic {
    IdentTopic::new(format!("{INBOX_TOPIC_PREFIX}{identity}"))
}

/// Content-addressed id: identical payloads (same sender, recipient, body and
/// timestamp) share an id, so gossipsub drops a repeated copy before it reaches
/// the session. The chat cache itself keeps every message it is handed.
pub fn content_message_id(message: &gossipsub::Message) -> gossipsub::MessageId {
    let mut hasher = DefaultHasher::new();
    message.data.hash(&mut hasher);
    gossipsub::MessageId::from(hasher.finish().to_string())
}

pub fn build_behavior(
    local_key: &identity::Keypair,
    local_peer_id: PeerId,
) -> Result<ChatBehavior, Box<dyn Error>> {
    let gossipsub_config = gossipsub::ConfigBuilder::default()
        .heartbeat_interval(Duration::from_secs(10))
        .validation_mode(gossipsub::ValidationMode::Strict)
        .message_id_fn(content_message_id)
        .build()?;

    let gossipsub = gossipsub::Behaviour::new(
        gossipsub::MessageAuthenticity::Signed(local_key.clone()),
        gossipsub_config,
    )?;

    let mdns_behaviour = mdns::tokio::Behaviour::new(mdns::Config::default(), local_peer_id)?;

    Ok(ChatBehavior {
        gossipsub,
        mdns: mdns_behaviour,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbox_topic_is_per_identity() {
        let admin = inbox_topic("admin@shopora.com");
        let user = inbox_topic("u1@x.com");
        assert_eq!(admin.to_string(), "shopora-chat/inbox/admin@shopora.com");
        assert_ne!(admin.hash(), user.hash());
    }

    fn gossip(payload: &str) -> gossipsub::Message {
        gossipsub::Message {
            source: None,
            data: payload.as_bytes().to_vec(),
            sequence_number: None,
            topic: inbox_topic("u1@x.com").hash(),
        }
    }

    #[test]
    fn identical_payloads_share_a_message_id() {
        let payload = r#"{"from":"admin","to":"u1@x.com","message":"hi","timestamp":1}"#;
        let other = r#"{"from":"admin","to":"u1@x.com","message":"hi","timestamp":2}"#;

        assert_eq!(
            content_message_id(&gossip(payload)),
            content_message_id(&gossip(payload))
        );
        assert_ne!(
            content_message_id(&gossip(payload)),
            content_message_id(&gossip(other))
        );
    }
}
