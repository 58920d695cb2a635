//! In-memory mailbox implementation
//!
//! Used by tests and demos. Every stored message is treated as a search
//! hit: the query string is recorded but not evaluated.

use anyhow::{Context, Result, bail};
use base64::prelude::*;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{MailAccess, MessagePage};
use crate::error::AuthError;
use crate::models::{MailMessage, MessageId};

/// In-memory implementation of MailAccess
///
/// Page tokens are stringified offsets into the message list.
pub struct InMemoryMailbox {
    messages: RwLock<Vec<MailMessage>>,
    /// (message_id, attachment_id) -> base64url body
    attachments: RwLock<HashMap<(String, String), String>>,
    /// Caps the requested page size, to exercise pagination with few messages
    page_size: Option<usize>,
    queries: RwLock<Vec<String>>,
    message_fetches: RwLock<HashMap<String, usize>>,
    credentials_expired: AtomicBool,
}

impl InMemoryMailbox {
    /// Create a new empty mailbox
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            attachments: RwLock::new(HashMap::new()),
            page_size: None,
            queries: RwLock::new(Vec::new()),
            message_fetches: RwLock::new(HashMap::new()),
            credentials_expired: AtomicBool::new(false),
        }
    }

    /// Serve at most `page_size` messages per listing page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    /// Add a message to the search results
    pub fn add_message(&self, message: MailMessage) {
        self.messages.write().unwrap().push(message);
    }

    /// Store attachment bytes, encoded the way Gmail returns them
    pub fn add_attachment(&self, message_id: &str, attachment_id: &str, data: &[u8]) {
        self.add_encoded_attachment(message_id, attachment_id, BASE64_URL_SAFE_NO_PAD.encode(data));
    }

    /// Store an attachment body verbatim (may be deliberately malformed)
    pub fn add_encoded_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
        encoded: impl Into<String>,
    ) {
        self.attachments.write().unwrap().insert(
            (message_id.to_string(), attachment_id.to_string()),
            encoded.into(),
        );
    }

    /// Make every subsequent call fail with [`AuthError`]
    pub fn expire_credentials(&self) {
        self.credentials_expired.store(true, Ordering::SeqCst);
    }

    /// Queries received so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.read().unwrap().clone()
    }

    /// How many times a message was fetched
    pub fn message_fetches(&self, id: &str) -> usize {
        self.message_fetches
            .read()
            .unwrap()
            .get(id)
            .copied()
            .unwrap_or(0)
    }

    fn check_credentials(&self) -> Result<()> {
        if self.credentials_expired.load(Ordering::SeqCst) {
            return Err(AuthError::new("credentials expired").into());
        }
        Ok(())
    }
}

impl Default for InMemoryMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl MailAccess for InMemoryMailbox {
    fn list_messages(
        &self,
        query: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<MessagePage> {
        self.check_credentials()?;
        self.queries.write().unwrap().push(query.to_string());

        let offset: usize = match page_token {
            Some(token) => token
                .parse()
                .with_context(|| format!("Invalid page token: {}", token))?,
            None => 0,
        };
        let limit = self.page_size.map_or(page_size, |cap| cap.min(page_size));

        let messages = self.messages.read().unwrap();
        let message_ids: Vec<MessageId> = messages
            .iter()
            .skip(offset)
            .take(limit)
            .map(|m| m.id.clone())
            .collect();

        let end = offset + message_ids.len();
        let next_page_token = (end < messages.len()).then(|| end.to_string());

        Ok(MessagePage {
            message_ids,
            next_page_token,
        })
    }

    fn get_message(&self, id: &MessageId) -> Result<MailMessage> {
        self.check_credentials()?;
        *self
            .message_fetches
            .write()
            .unwrap()
            .entry(id.as_str().to_string())
            .or_default() += 1;

        self.messages
            .read()
            .unwrap()
            .iter()
            .find(|m| &m.id == id)
            .cloned()
            .with_context(|| format!("Message not found: {}", id))
    }

    fn get_attachment(&self, id: &MessageId, attachment_id: &str) -> Result<String> {
        self.check_credentials()?;
        let key = (id.as_str().to_string(), attachment_id.to_string());
        match self.attachments.read().unwrap().get(&key) {
            Some(data) => Ok(data.clone()),
            None => bail!("Attachment {} not found on message {}", attachment_id, id),
        }
    }
}
