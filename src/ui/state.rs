use crate::chat::ChatSession;
use crate::network::{ChatChannel, ChatTransport};
use crate::storage::SqliteStore;

pub type LiveSession = ChatSession<SqliteStore, ChatChannel>;

/// Local state of the chat panel.
pub struct AppState<T: ChatTransport = ChatChannel> {
    pub session: ChatSession<SqliteStore, T>,
    pub selected_partner: Option<String>,
    pub input_text: String,
}

impl<T: ChatTransport> AppState<T> {
    pub fn new(session: ChatSession<SqliteStore, T>) -> Self {
        Self {
            session,
            selected_partner: None,
            input_text: String::new(),
        }
    }

    pub fn select(&mut self, partner: String) {
        if self.selected_partner.as_deref() != Some(partner.as_str()) {
            log::debug!("Selected conversation with {partner}");
            self.selected_partner = Some(partner);
        }
    }

    /// Send the input line to the selected partner; the line is cleared once it is handed off.
    pub fn submit_input(&mut self) {
        let Some(partner) = &self.selected_partner else {
            return;
        };
        match self.session.send(partner, &self.input_text) {
            Ok(true) => self.input_text.clear(),
            Ok(false) => {}
            Err(err) => log::warn!("Failed to send message to {partner}: {err}"),
        }
    }
}
