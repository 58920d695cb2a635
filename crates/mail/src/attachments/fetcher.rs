//! Attachment download and transport decoding

use base64::prelude::*;

use crate::error::{RetrievalError, Stage};
use crate::mailbox::MailAccess;
use crate::models::{AttachmentDescriptor, ContentRef};

/// Decode Gmail's URL-safe base64
///
/// Gmail may or may not pad the payload, so padding is stripped first.
pub fn decode_base64url(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64_URL_SAFE_NO_PAD.decode(data.trim().trim_end_matches('='))
}

/// Retrieve an attachment's raw bytes
pub fn fetch_attachment(
    handle: &dyn MailAccess,
    descriptor: &AttachmentDescriptor,
) -> Result<Vec<u8>, RetrievalError> {
    let encoded = match &descriptor.content {
        ContentRef::Inline { data } => data.clone(),
        ContentRef::Remote { attachment_id } => handle
            .get_attachment(&descriptor.message_id, attachment_id)
            .map_err(|source| {
                RetrievalError::from_transport(Stage::FetchingAttachment, source, |source| {
                    RetrievalError::AttachmentFetch {
                        message_id: descriptor.message_id.clone(),
                        filename: descriptor.filename.clone(),
                        source,
                    }
                })
            })?,
    };

    decode_base64url(&encoded).map_err(|source| RetrievalError::Decode {
        message_id: descriptor.message_id.clone(),
        filename: descriptor.filename.clone(),
        source,
    })
}
