//! Message model: a mailbox message reduced to its MIME part tree

use serde::{Deserialize, Serialize};

/// Unique identifier for a message (Gmail message ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a leaf part's body lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentRef {
    /// Body stored server-side; fetched by attachment ID
    Remote { attachment_id: String },
    /// Body carried in the message itself (base64url)
    Inline { data: String },
}

/// A node in a message's MIME tree
///
/// A part is either a container of other parts or a leaf with content,
/// never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MimePart {
    Container {
        children: Vec<MimePart>,
    },
    Leaf {
        filename: Option<String>,
        mime_type: Option<String>,
        content: Option<ContentRef>,
    },
}

impl MimePart {
    /// Create a container part
    pub fn container(children: Vec<MimePart>) -> Self {
        Self::Container { children }
    }

    /// Create a leaf whose body must be fetched by attachment ID
    pub fn attachment(filename: impl Into<String>, attachment_id: impl Into<String>) -> Self {
        Self::Leaf {
            filename: Some(filename.into()),
            mime_type: None,
            content: Some(ContentRef::Remote {
                attachment_id: attachment_id.into(),
            }),
        }
    }

    /// Create a leaf with no filename (e.g. a text body)
    pub fn body(mime_type: impl Into<String>) -> Self {
        Self::Leaf {
            filename: None,
            mime_type: Some(mime_type.into()),
            content: None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container { .. })
    }
}

/// A message as seen by the attachment pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub id: MessageId,
    /// Top-level parts of the message payload
    pub parts: Vec<MimePart>,
}

impl MailMessage {
    pub fn new(id: MessageId, parts: Vec<MimePart>) -> Self {
        Self { id, parts }
    }
}
