use serde::{Deserialize, Serialize};

/// One chat line between two identities.
///
/// The body travels under the `message` field name; `body` is accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: String,
    pub to: String,
    #[serde(rename = "message", alias = "body")]
    pub body: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        body: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            body: body.into(),
            timestamp,
        }
    }

    /// The other party of this message, seen from `viewer`.
    pub fn partner_for(&self, viewer: &str) -> &str {
        if self.from == viewer {
            &self.to
        } else {
            &self.from
        }
    }

    pub fn involves(&self, identity: &str) -> bool {
        self.from == identity || self.to == identity
    }
}

/// A counterpart of the viewer and the timestamp of the last message exchanged with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPartner {
    pub id: String,
    pub last_active: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_serialized_as_message() {
        let msg = ChatMessage::new("a@x.com", "b@x.com", "hi", 42);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["message"], "hi");
        assert!(json.get("body").is_none());
    }

    #[test]
    fn body_alias_is_accepted() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"from":"a","to":"b","body":"yo","timestamp":7}"#).unwrap();
        assert_eq!(msg.body, "yo");
        assert_eq!(msg.timestamp, 7);
    }

    #[test]
    fn partner_depends_on_direction() {
        let outgoing = ChatMessage::new("admin", "u1", "hi", 1);
        let incoming = ChatMessage::new("u2", "admin", "hey", 2);
        assert_eq!(outgoing.partner_for("admin"), "u1");
        assert_eq!(incoming.partner_for("admin"), "u2");
        assert!(incoming.involves("u2"));
        assert!(!incoming.involves("u1"));
    }
}
