//! Message search
//!
//! Builds the Gmail search expression for a [`crate::models::SearchCriteria`]
//! and walks its paginated results.

mod pager;
mod search;

pub use pager::{MAX_PAGE_SIZE, MessagePager};
pub use search::{build_query, gmail_date};
