//! Keeps the recorder's start time on disk between invocations.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::config::root_path;

pub fn recorder_path(dev: bool) -> Result<PathBuf> {
    let name = if dev { "recorder-dev" } else { "recorder" };
    Ok(root_path()?.join(name))
}

pub fn load(path: &Path) -> Result<Option<OffsetDateTime>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path).context("Failed to read recorder file")?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let date_start = OffsetDateTime::parse(raw, &Rfc3339)
        .with_context(|| format!("Invalid start time in {}", path.display()))?;
    Ok(Some(date_start))
}

pub fn save(path: &Path, date_start: OffsetDateTime) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let raw = date_start
        .format(&Rfc3339)
        .context("Failed to format start time")?;
    std::fs::write(path, raw)?;
    Ok(())
}

pub fn clear(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}
