//! Errors surfaced by a retrieval run

use std::path::PathBuf;

use crate::models::{InvalidDateRange, MessageId};

/// Error indicating the mail-access handle was rejected
///
/// Raised by transports for expired or revoked credentials. Never retried.
#[derive(Debug, thiserror::Error)]
#[error("Mailbox authorization failed: {reason}")]
pub struct AuthError {
    pub reason: String,
}

impl AuthError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Stage of a run at which an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Querying,
    FetchingMessage,
    FetchingAttachment,
    Staging,
    Archiving,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Querying => "querying",
            Stage::FetchingMessage => "fetching message",
            Stage::FetchingAttachment => "fetching attachment",
            Stage::Staging => "staging",
            Stage::Archiving => "archiving",
        };
        f.write_str(name)
    }
}

/// A fatal error that aborted a retrieval run
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error(transparent)]
    InvalidRange(#[from] InvalidDateRange),

    #[error("Authorization failed while {stage}")]
    Auth {
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to list messages (page {page})")]
    Query {
        page: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to fetch message {message_id}")]
    MessageFetch {
        message_id: MessageId,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to fetch attachment {filename:?} from message {message_id}")]
    AttachmentFetch {
        message_id: MessageId,
        filename: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to decode attachment {filename:?} from message {message_id}")]
    Decode {
        message_id: MessageId,
        filename: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Staging I/O failed for {}", path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write archive {}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl RetrievalError {
    /// Stage at which the run failed
    pub fn stage(&self) -> Stage {
        match self {
            RetrievalError::InvalidRange(_) => Stage::Validating,
            RetrievalError::Auth { stage, .. } => *stage,
            RetrievalError::Query { .. } => Stage::Querying,
            RetrievalError::MessageFetch { .. } => Stage::FetchingMessage,
            RetrievalError::AttachmentFetch { .. } | RetrievalError::Decode { .. } => {
                Stage::FetchingAttachment
            }
            RetrievalError::Staging { .. } => Stage::Staging,
            RetrievalError::Archive { .. } => Stage::Archiving,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, RetrievalError::Auth { .. })
    }

    /// Classify a transport error, routing `AuthError` to `Auth`
    pub(crate) fn from_transport(
        stage: Stage,
        source: anyhow::Error,
        otherwise: impl FnOnce(anyhow::Error) -> RetrievalError,
    ) -> RetrievalError {
        if source.downcast_ref::<AuthError>().is_some() {
            RetrievalError::Auth { stage, source }
        } else {
            otherwise(source)
        }
    }
}
