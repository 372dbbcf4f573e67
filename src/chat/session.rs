use super::cache::ChatCache;
use super::clock::{Clock, SystemClock};
use crate::common::{ChatMessage, NetworkEvent, Result};
use crate::network::ChatTransport;
use crate::storage::KvStore;

const PRUNE_INTERVAL_MS: i64 = 60 * 1000;

/// A viewer's chat cache bound to the transport channel that feeds it.
///
/// The session owns the channel: it registers the viewer on `open` and closes the
/// channel on `close`. Sent messages are not recorded directly; they come back
/// through the transport's echo like any inbound message.
pub struct ChatSession<S, T, C = SystemClock>
where
    S: KvStore,
    T: ChatTransport,
    C: Clock,
{
    cache: ChatCache<S, C>,
    transport: T,
    connected_peers: Vec<String>,
    status: Option<String>,
    last_prune: i64,
    closed: bool,
}

impl<S, T, C> ChatSession<S, T, C>
where
    S: KvStore,
    T: ChatTransport,
    C: Clock,
{
    pub fn open(mut cache: ChatCache<S, C>, mut transport: T) -> Result<Self> {
        cache.load();
        transport.register(cache.viewer())?;
        let last_prune = cache.now_millis();

        Ok(Self {
            cache,
            transport,
            connected_peers: Vec::new(),
            status: None,
            last_prune,
            closed: false,
        })
    }

    /// Emit a message from the viewer to `to`. Returns `Ok(false)` when there is nothing to send.
    pub fn send(&mut self, to: &str, body: &str) -> Result<bool> {
        let to = to.trim();
        if to.is_empty() || body.trim().is_empty() {
            return Ok(false);
        }

        let message = ChatMessage::new(self.cache.viewer(), to, body, self.cache.now_millis());
        self.transport.emit(message)?;
        Ok(true)
    }

    /// Drain pending transport events in arrival order. Returns how many messages were recorded.
    pub fn pump(&mut self) -> usize {
        let mut recorded = 0;
        while let Some(event) = self.transport.try_next_event() {
            match event {
                NetworkEvent::MessageReceived(message) => {
                    self.cache.receive(message);
                    recorded += 1;
                }
                NetworkEvent::Registered(identity) => {
                    self.status = Some(format!("Registered as {identity}"));
                }
                NetworkEvent::SendFailed { to, reason } => {
                    self.status = Some(format!("Could not deliver to {to}: {reason}"));
                }
                NetworkEvent::PeerConnected(peer_id) => {
                    if !self.connected_peers.iter().any(|peer| peer == &peer_id) {
                        self.connected_peers.push(peer_id);
                    }
                }
                NetworkEvent::PeerDisconnected(peer_id) => {
                    self.connected_peers.retain(|peer| peer != &peer_id);
                }
            }
        }
        recorded
    }

    /// Prune expired messages, at most once per minute.
    pub fn maintain(&mut self) {
        let now = self.cache.now_millis();
        if now - self.last_prune >= PRUNE_INTERVAL_MS {
            self.cache.prune(now);
            self.last_prune = now;
        }
    }

    pub fn close(&mut self) {
        if !self.closed {
            self.transport.close();
            self.closed = true;
        }
    }

    pub fn cache(&self) -> &ChatCache<S, C> {
        &self.cache
    }

    pub fn viewer(&self) -> &str {
        self.cache.viewer()
    }

    pub fn connected_peers(&self) -> &[String] {
        &self.connected_peers
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
