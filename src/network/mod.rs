pub mod behavior;
pub mod channel;
pub mod client;
pub mod swarm;

pub use channel::{ChatChannel, ChatTransport};
pub use client::NetworkSettings;
