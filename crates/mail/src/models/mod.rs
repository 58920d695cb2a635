//! Domain models for attachment retrieval

mod attachment;
mod criteria;
mod message;

pub use attachment::{AttachmentDescriptor, RunResult, RunStats};
pub use criteria::{InvalidDateRange, SearchCriteria};
pub use message::{ContentRef, MailMessage, MessageId, MimePart};
