//! Mail-access abstraction
//!
//! The pipeline talks to a mailbox only through [`MailAccess`], so the
//! Gmail transport can be swapped for the in-memory mailbox in tests.

mod memory;
mod traits;

pub use memory::InMemoryMailbox;
pub use traits::{MailAccess, MessagePage};
