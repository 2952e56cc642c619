//! Single-identity authorization.
//!
//! Exactly one chat is allowed to drive the device.  There is no allowlist
//! and no runtime revocation; changing the identity means reflashing.

use super::ports::InboundMessage;

/// Compares a message's chat identity against the configured one.
#[derive(Debug, Clone)]
pub struct AuthorizationGuard {
    authorized_chat_id: String,
}

impl AuthorizationGuard {
    pub fn new(authorized_chat_id: impl Into<String>) -> Self {
        Self {
            authorized_chat_id: authorized_chat_id.into(),
        }
    }

    /// Pure identity check, no side effects.
    pub fn is_authorized(&self, message: &InboundMessage) -> bool {
        message.chat_id == self.authorized_chat_id
    }

    pub fn authorized_chat_id(&self) -> &str {
        &self.authorized_chat_id
    }
}
