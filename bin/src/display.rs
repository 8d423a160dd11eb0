//! Output formatting and attachment writing for the viralapp CLI.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use viralapp_lib::prelude::*;

/// Print records as a pretty JSON array on stdout.
pub(crate) fn print_records(records: &[ExecutionRecord]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

/// Write every attachment into `dir`, returning the paths written.
///
/// Only the final component of a suggested file name is used. Names repeated
/// within one batch get the item index as a prefix.
pub(crate) fn write_attachments(
    records: &[ExecutionRecord],
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written: Vec<PathBuf> = Vec::new();
    for record in records {
        let Some(binary) = &record.binary else {
            continue;
        };

        let name = Path::new(&binary.file_name)
            .file_name()
            .map_or_else(|| "attachment".into(), |n| n.to_string_lossy().into_owned());
        let mut path = dir.join(&name);
        if written.contains(&path) {
            path = dir.join(format!("{}-{name}", record.paired_item));
        }

        fs::write(&path, &binary.data)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

/// Warn about attachments that will not be saved.
pub(crate) fn warn_unsaved(records: &[ExecutionRecord]) {
    for binary in records.iter().filter_map(|r| r.binary.as_ref()) {
        warn!(
            file = %binary.file_name,
            bytes = binary.len(),
            "attachment not saved; pass --output-dir to keep it"
        );
    }
}
