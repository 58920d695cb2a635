//! Gmail API HTTP client
//!
//! Provides the three read calls the retrieval pipeline needs.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use super::api::{AttachmentResponse, GmailMessage, ListMessagesResponse};
use super::{RetryPolicy, TokenProvider, normalize_message};
use crate::error::AuthError;
use crate::mailbox::{MailAccess, MessagePage};
use crate::models::{MailMessage, MessageId};
use crate::query::MAX_PAGE_SIZE;

/// Gmail API client for reading one mailbox
pub struct GmailClient {
    auth: Box<dyn TokenProvider>,
    retry: RetryPolicy,
    base_url: String,
}

impl GmailClient {
    /// Gmail API base URL
    const BASE_URL: &'static str = "https://gmail.googleapis.com/gmail/v1";

    /// Create a new Gmail client
    pub fn new(auth: impl TokenProvider + 'static) -> Self {
        Self {
            auth: Box::new(auth),
            retry: RetryPolicy::default(),
            base_url: Self::BASE_URL.to_string(),
        }
    }

    /// Override the retry policy applied to every request
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Point the client at a different API root (e.g. a local mock)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the list-messages URL for a query and page
    fn list_url(&self, query: &str, page_size: usize, page_token: Option<&str>) -> String {
        let mut url = format!(
            "{}/users/me/messages?q={}&maxResults={}",
            self.base_url,
            urlencoding::encode(query),
            page_size.clamp(1, MAX_PAGE_SIZE)
        );

        if let Some(token) = page_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
        }

        url
    }

    /// Authenticated GET returning parsed JSON, with retries
    fn get_json<T: DeserializeOwned>(&self, what: &str, url: &str) -> Result<T> {
        self.retry.run(what, || {
            let access_token = self.auth.access_token()?;

            let response = ureq::get(url)
                .header("Authorization", &format!("Bearer {}", access_token))
                .call();

            match response {
                Ok(mut resp) => resp
                    .body_mut()
                    .read_json()
                    .with_context(|| format!("Failed to parse {} response", what)),
                Err(ureq::Error::StatusCode(code @ (401 | 403))) => {
                    Err(AuthError::new(format!("{} returned HTTP {}", what, code)).into())
                }
                Err(e) => {
                    Err(anyhow::Error::new(e).context(format!("Failed to send {} request", what)))
                }
            }
        })
    }
}

impl MailAccess for GmailClient {
    fn list_messages(
        &self,
        query: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<MessagePage> {
        let url = self.list_url(query, page_size, page_token);
        let list: ListMessagesResponse = self.get_json("list messages", &url)?;

        log::debug!(
            "Listed {} messages (estimate {:?}, more: {})",
            list.messages.as_ref().map_or(0, Vec::len),
            list.result_size_estimate,
            list.next_page_token.is_some()
        );

        Ok(MessagePage {
            message_ids: list
                .messages
                .unwrap_or_default()
                .into_iter()
                .map(|m| MessageId::new(m.id))
                .collect(),
            next_page_token: list.next_page_token,
        })
    }

    fn get_message(&self, id: &MessageId) -> Result<MailMessage> {
        let url = format!(
            "{}/users/me/messages/{}?format=full",
            self.base_url,
            urlencoding::encode(id.as_str())
        );
        let message: GmailMessage = self.get_json("get message", &url)?;
        Ok(normalize_message(message))
    }

    fn get_attachment(&self, id: &MessageId, attachment_id: &str) -> Result<String> {
        let url = format!(
            "{}/users/me/messages/{}/attachments/{}",
            self.base_url,
            urlencoding::encode(id.as_str()),
            urlencoding::encode(attachment_id)
        );
        let attachment: AttachmentResponse = self.get_json("get attachment", &url)?;
        Ok(attachment.data)
    }
}
