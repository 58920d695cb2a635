//! Zip assembly from staged files

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use super::StagedFile;
use crate::error::RetrievalError;

/// Archive file name for a date range: `<prefix>_<from>_to_<to>.zip`
pub fn archive_name(prefix: &str, from: NaiveDate, to: NaiveDate) -> String {
    format!(
        "{}_{}_to_{}.zip",
        prefix,
        from.format("%Y-%m-%d"),
        to.format("%Y-%m-%d")
    )
}

/// Write `files` into a flat zip at `path`, replacing any existing file
pub fn write_archive(path: &Path, files: &[StagedFile]) -> Result<PathBuf, RetrievalError> {
    write_zip(path, files).map_err(|source| RetrievalError::Archive {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Wrote {} files to {}", files.len(), path.display());
    Ok(path.to_path_buf())
}

fn write_zip(path: &Path, files: &[StagedFile]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let out = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut zip = zip::ZipWriter::new(BufWriter::new(out));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        zip.start_file(file.arcname.as_str(), options)
            .with_context(|| format!("Failed to add entry {}", file.arcname))?;
        let mut input = File::open(&file.path)
            .with_context(|| format!("Failed to open {}", file.path.display()))?;
        io::copy(&mut input, &mut zip)
            .with_context(|| format!("Failed to compress {}", file.path.display()))?;
    }

    zip.finish().context("Failed to finalize archive")?;
    Ok(())
}
