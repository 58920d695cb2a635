//! Mail crate - bulk attachment retrieval from a mailbox
//!
//! This crate provides:
//! - Domain models (MessageId, MimePart, SearchCriteria, RunResult)
//! - Gmail API client and token refresh
//! - A mail-access trait with an in-memory implementation
//! - Paginated message search
//! - Attachment discovery over MIME part trees and download
//! - A staging directory and zip archive assembly
//! - The retrieval pipeline tying these together
//!
//! The crate has no UI dependencies; progress is reported through
//! [`ProgressSink`].

pub mod attachments;
pub mod config;
pub mod error;
pub mod gmail;
pub mod mailbox;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod staging;

pub use attachments::{
    AttachmentRef, ExtensionFilter, decode_base64url, fetch_attachment, walk_parts,
    walk_parts_with,
};
pub use config::{HarvestSettings, RetrySettings};
pub use error::{AuthError, RetrievalError, Stage};
pub use gmail::{AuthorizedUser, GmailAuth, GmailClient, RetryPolicy, StaticToken, TokenProvider};
pub use mailbox::{InMemoryMailbox, MailAccess, MessagePage};
pub use models::{
    AttachmentDescriptor, ContentRef, InvalidDateRange, MailMessage, MessageId, MimePart,
    RunResult, RunStats, SearchCriteria,
};
pub use pipeline::{NoProgress, Progress, ProgressSink, RetrievalPipeline, RunContext};
pub use query::{MAX_PAGE_SIZE, MessagePager, build_query};
pub use staging::{
    RemoveFile, ResetReport, StagedFile, StagingStore, StaleFilePolicy, archive_name,
    sanitize_filename, write_archive,
};
