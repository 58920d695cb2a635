//! Retrieval pipeline implementation

use chrono::NaiveDate;
use log::{debug, info};
use std::time::Instant;

use super::{Progress, ProgressSink};
use crate::attachments::{fetch_attachment, walk_parts_with};
use crate::config::HarvestSettings;
use crate::error::{RetrievalError, Stage};
use crate::mailbox::MailAccess;
use crate::models::{RunResult, RunStats, SearchCriteria};
use crate::query::{MessagePager, build_query};
use crate::staging::{StagingStore, archive_name, write_archive};

/// Everything a run needs, owned by the caller
///
/// The mailbox handle is borrowed for the lifetime of the context.
pub struct RunContext<'a> {
    pub mailbox: &'a dyn MailAccess,
    pub settings: HarvestSettings,
}

impl<'a> RunContext<'a> {
    pub fn new(mailbox: &'a dyn MailAccess, settings: HarvestSettings) -> Self {
        Self { mailbox, settings }
    }

    /// Criteria for a date range using the configured sender and subjects
    pub fn criteria(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SearchCriteria, RetrievalError> {
        Ok(SearchCriteria::new(
            self.settings.sender.clone(),
            &self.settings.subject_terms,
            from,
            to,
        )?)
    }
}

/// Downloads matching attachments and bundles them into an archive
///
/// Runs are sequential and stateless. Two runs must not share a staging
/// directory at the same time.
pub struct RetrievalPipeline<'a> {
    ctx: RunContext<'a>,
}

impl<'a> RetrievalPipeline<'a> {
    pub fn new(ctx: RunContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &RunContext<'a> {
        &self.ctx
    }

    /// Run for a date range using the configured sender and subjects
    pub fn run_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        progress: &mut dyn ProgressSink,
    ) -> Result<RunResult, RetrievalError> {
        let criteria = self.ctx.criteria(from, to)?;
        self.run(&criteria, progress)
    }

    /// Search, download and archive
    ///
    /// Stale staged files are cleared first. A run that downloads nothing
    /// creates no archive. On error, files staged so far are left in place.
    pub fn run(
        &self,
        criteria: &SearchCriteria,
        progress: &mut dyn ProgressSink,
    ) -> Result<RunResult, RetrievalError> {
        let settings = &self.ctx.settings;
        let staging = StagingStore::new(
            &settings.staging_dir,
            settings.extension.clone(),
            settings.stale_file_policy,
        )?;
        self.run_with_staging(criteria, &staging, progress)
    }

    /// Like [`run`](Self::run), staging into an already opened store
    pub fn run_with_staging(
        &self,
        criteria: &SearchCriteria,
        staging: &StagingStore,
        progress: &mut dyn ProgressSink,
    ) -> Result<RunResult, RetrievalError> {
        let start = Instant::now();
        let settings = &self.ctx.settings;
        let mailbox = self.ctx.mailbox;
        let mut stats = RunStats::default();

        let report = staging.reset()?;
        stats.stale_files_skipped = report.skipped.len();

        let query = build_query(criteria);
        info!("Searching: {}", query);
        progress.report(Progress::Started {
            query: query.clone(),
        });

        let mut pager = MessagePager::new(mailbox, query);
        let mut total = 0;

        while let Some(message_ids) = pager.next_page()? {
            info!("Processing {} emails...", message_ids.len());
            progress.report(Progress::PageReceived {
                page: pager.pages_fetched(),
                messages: message_ids.len(),
            });

            for id in message_ids {
                let message = mailbox.get_message(&id).map_err(|source| {
                    RetrievalError::from_transport(Stage::FetchingMessage, source, |source| {
                        RetrievalError::MessageFetch {
                            message_id: id.clone(),
                            source,
                        }
                    })
                })?;
                stats.messages_scanned += 1;

                for found in walk_parts_with(&message.parts, settings.extension.clone()) {
                    let descriptor = found.to_descriptor(&id);
                    let content = fetch_attachment(mailbox, &descriptor)?;
                    let path = staging.write(&descriptor.filename, &content)?;
                    total += 1;
                    debug!("Staged {} ({} bytes)", path.display(), content.len());
                }

                if total > 0 {
                    progress.report(Progress::Downloaded { total });
                }
            }
        }
        stats.pages_fetched = pager.pages_fetched();

        if total == 0 {
            stats.duration_ms = start.elapsed().as_millis() as u64;
            info!(
                "No matching attachments for {} to {}",
                criteria.date_from, criteria.date_to
            );
            return Ok(RunResult::empty(stats));
        }

        let files = staging.list_staged_files()?;
        let archive_path = settings.output_dir.join(archive_name(
            &settings.archive_prefix,
            criteria.date_from,
            criteria.date_to,
        ));
        write_archive(&archive_path, &files)?;
        progress.report(Progress::Archived {
            files: files.len(),
            path: archive_path.clone(),
        });

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Downloaded {} attachments from {} messages in {}ms",
            total, stats.messages_scanned, stats.duration_ms
        );

        Ok(RunResult {
            files_downloaded: total,
            archive_path: Some(archive_path),
            stats,
        })
    }
}
