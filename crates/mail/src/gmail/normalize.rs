//! Gmail API response normalization
//!
//! Converts Gmail's loosely shaped part JSON into the typed [`MimePart`] tree.

use super::api::{GmailMessage, MessagePart};
use crate::models::{ContentRef, MailMessage, MessageId, MimePart};

/// Normalize a Gmail API message to a MailMessage
///
/// A multipart payload contributes its children as top-level parts; a
/// single-part payload becomes the only part. A message without a payload
/// has no parts.
pub fn normalize_message(gmail_msg: GmailMessage) -> MailMessage {
    let id = MessageId::new(&gmail_msg.id);

    let parts = match gmail_msg.payload.map(normalize_part) {
        Some(MimePart::Container { children }) => children,
        Some(leaf) => vec![leaf],
        None => {
            log::debug!("Message {} has no payload", id);
            Vec::new()
        }
    };

    MailMessage::new(id, parts)
}

/// Normalize one part and its descendants
pub fn normalize_part(part: MessagePart) -> MimePart {
    if let Some(children) = part.parts
        && !children.is_empty()
    {
        return MimePart::Container {
            children: children.into_iter().map(normalize_part).collect(),
        };
    }

    let content = part.body.and_then(|body| {
        if let Some(attachment_id) = body.attachment_id.filter(|id| !id.is_empty()) {
            Some(ContentRef::Remote { attachment_id })
        } else {
            body.data
                .filter(|data| !data.is_empty())
                .map(|data| ContentRef::Inline { data })
        }
    });

    MimePart::Leaf {
        filename: part.filename.filter(|f| !f.is_empty()),
        mime_type: part.mime_type,
        content,
    }
}
