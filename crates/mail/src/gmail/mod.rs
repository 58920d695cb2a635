//! Gmail API integration
//!
//! This module provides:
//! - Token refresh for an already-authorized user
//! - Gmail API client implementing [`crate::mailbox::MailAccess`]
//! - Response normalization to domain models

mod auth;
mod client;
mod normalize;
mod retry;

pub use auth::{AuthorizedUser, GmailAuth, StaticToken, TokenProvider};
pub use client::GmailClient;
pub use normalize::{normalize_message, normalize_part};
pub use retry::RetryPolicy;

/// Gmail API response types
pub mod api {
    use serde::Deserialize;

    /// Response from listing messages
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListMessagesResponse {
        pub messages: Option<Vec<MessageRef>>,
        pub next_page_token: Option<String>,
        pub result_size_estimate: Option<u32>,
    }

    /// Reference to a message (just ID and thread ID)
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessageRef {
        pub id: String,
        pub thread_id: Option<String>,
    }

    /// Full message from Gmail API
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GmailMessage {
        pub id: String,
        pub thread_id: Option<String>,
        pub payload: Option<MessagePart>,
    }

    /// Message part; the payload itself is the root part
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessagePart {
        pub part_id: Option<String>,
        pub mime_type: Option<String>,
        pub filename: Option<String>,
        pub body: Option<MessagePartBody>,
        pub parts: Option<Vec<MessagePart>>,
    }

    /// Part body: inline data, or a pointer to a separately stored attachment
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessagePartBody {
        pub size: Option<u64>,
        pub data: Option<String>,
        pub attachment_id: Option<String>,
    }

    /// Response from the attachments endpoint
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AttachmentResponse {
        pub size: Option<u64>,
        pub data: String,
    }
}
