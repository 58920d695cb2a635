//! Mail-access trait definitions

use anyhow::Result;

use crate::models::{MailMessage, MessageId};

/// One page of a message listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    pub message_ids: Vec<MessageId>,
    /// Token for the following page, if any
    pub next_page_token: Option<String>,
}

/// Read access to a single mailbox
///
/// Implementations return [`crate::AuthError`] (wrapped in `anyhow::Error`)
/// when the underlying credentials are rejected.
pub trait MailAccess {
    /// List message IDs matching a search query, one page at a time
    fn list_messages(
        &self,
        query: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<MessagePage>;

    /// Get a message with its full part tree
    fn get_message(&self, id: &MessageId) -> Result<MailMessage>;

    /// Get an attachment body as base64url text
    fn get_attachment(&self, id: &MessageId, attachment_id: &str) -> Result<String>;
}
