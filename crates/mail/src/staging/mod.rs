//! Local staging directory and archive assembly

mod archive;
mod filename;
mod store;

pub use archive::{archive_name, write_archive};
pub use filename::sanitize_filename;
pub use store::{RemoveFile, ResetReport, StagedFile, StagingStore, StaleFilePolicy};
