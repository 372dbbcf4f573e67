use std::error::Error;
use std::time::Duration;

use libp2p::core::upgrade::Version;
use libp2p::swarm::Config as SwarmConfig;
use libp2p::{PeerId, Swarm, Transport, identity, noise, tcp, yamux};

use super::behavior::{ChatBehavior, build_behavior};

/// Chat peers sit idle between messages; keep their connections around for this long.
const IDLE_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Swarm for one chat channel: TCP + noise + yamux carrying the inbox behaviour.
pub fn build_chat_swarm(
    local_key: &identity::Keypair,
) -> Result<Swarm<ChatBehavior>, Box<dyn Error>> {
    let local_peer_id = PeerId::from(local_key.public());

    let transport = tcp::tokio::Transport::new(tcp::Config::default().nodelay(true))
        .upgrade(Version::V1)
        .authenticate(noise::Config::new(local_key)?)
        .multiplex(yamux::Config::default())
        .boxed();
    let behavior = build_behavior(local_key, local_peer_id)?;

    Ok(Swarm::new(
        transport,
        behavior,
        local_peer_id,
        SwarmConfig::with_tokio_executor()
            .with_idle_connection_timeout(IDLE_CONNECTION_TIMEOUT),
    ))
}
