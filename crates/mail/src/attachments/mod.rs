//! Attachment discovery and download
//!
//! [`walk_parts`] finds matching leaves in a message's part tree without any
//! I/O; [`fetch_attachment`] turns a descriptor into bytes.

mod fetcher;
mod filter;
mod walker;

pub use fetcher::{decode_base64url, fetch_attachment};
pub use filter::ExtensionFilter;
pub use walker::{AttachmentRef, Walk, walk_parts, walk_parts_with};
