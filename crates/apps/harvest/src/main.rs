//! Harvest - download PDF attachments for a date range and zip them
//!
//! This is the command-line entry point for the retrieval pipeline.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Parser;
use log::{error, info, warn};
use mail::{
    AuthorizedUser, GmailAuth, GmailClient, HarvestSettings, Progress, RetrievalPipeline,
    RunContext,
};

#[derive(Parser)]
#[command(
    name = "harvest",
    version,
    about = "Download PDF attachments for a date range into a zip archive"
)]
struct Cli {
    /// First day to include (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    from: NaiveDate,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    to: NaiveDate,

    /// Settings file (defaults to ~/.config/pdfharvest/settings.json)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Authorized-user token file (defaults to ~/.config/pdfharvest/gmail-token.json,
    /// then the GMAIL_TOKEN_JSON environment variable)
    #[arg(long, value_name = "FILE")]
    token: Option<PathBuf>,

    /// Override the staging directory
    #[arg(long, value_name = "DIR")]
    staging: Option<PathBuf>,

    /// Override the archive output directory
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.from > cli.to {
        bail!("From date {} cannot be after to date {}", cli.from, cli.to);
    }

    // Bootstrap config directory
    if let Err(e) = config::init() {
        warn!("Failed to initialize config directory: {}", e);
    }

    let mut settings = match &cli.settings {
        Some(path) => HarvestSettings::from_file(path)?,
        None => HarvestSettings::load()?,
    };
    if let Some(dir) = cli.staging {
        settings.staging_dir = dir;
    }
    if let Some(dir) = cli.output {
        settings.output_dir = dir;
    }

    let user = match &cli.token {
        Some(path) => AuthorizedUser::from_file(path)?,
        None => AuthorizedUser::load().with_context(|| match AuthorizedUser::default_path() {
            Some(path) => format!("Gmail token not found; place it at {}", path.display()),
            None => "Gmail token not found".to_string(),
        })?,
    };

    let client = GmailClient::new(GmailAuth::new(user)).with_retry(settings.retry.policy());
    let pipeline = RetrievalPipeline::new(RunContext::new(&client, settings));

    info!("Searching mails from {} to {}", cli.from, cli.to);
    let mut report = |progress: Progress| match progress {
        Progress::Started { .. } | Progress::PageReceived { .. } => {}
        Progress::Downloaded { total } => println!("Downloaded {} PDFs so far...", total),
        Progress::Archived { files, path } => {
            println!("Archived {} files into {}", files, path.display())
        }
    };
    let result = pipeline.run_range(cli.from, cli.to, &mut report)?;

    let stale = result.stats.stale_files_skipped;
    if result.is_empty() {
        warn!("No PDF files found for the selected date range.");
        if stale > 0 {
            warn!("{} stale files could not be removed from the staging directory", stale);
        }
    } else {
        println!(
            "Completed! {} PDFs downloaded: {}",
            result.files_downloaded,
            result.archive_path_str()
        );
        if stale > 0 {
            warn!(
                "{} stale files could not be removed and were archived with this run's downloads",
                stale
            );
        }
    }

    Ok(())
}
