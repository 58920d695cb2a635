//! Retrieval pipeline
//!
//! Ties the pager, walker, fetcher and staging store into a single run:
//! search, download every matching attachment, then archive.

mod progress;
mod run;

pub use progress::{NoProgress, Progress, ProgressSink};
pub use run::{RetrievalPipeline, RunContext};
