//! Persistence helpers for tables and plain-text artifacts.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use csv::WriterBuilder;
use std::fs;
use std::path::Path;

/// Writes `records` as a CSV table at `path`, replacing any existing file.
///
/// The header row is derived from the record's field names.
pub fn write_records<T: Serialize>(path: &str, records: &[T]) -> Result<()> {
    create_parent_dir(Path::new(path))?;
    debug!(path, rows = records.len(), "Writing CSV table");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create '{path}'"))?;

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes a plain-text artifact, creating parent directories as needed.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    create_parent_dir(path)?;
    fs::write(path, text).with_context(|| format!("failed to write '{}'", path.display()))?;
    info!(path = %path.display(), bytes = text.len(), "Text file written");
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
