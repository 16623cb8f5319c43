//! JSON file sink
//!
//! Writes a category's deduplicated records as a single pretty-printed JSON
//! array, fields in canonical order.

use crate::record::Record;
use crate::TrawlError;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes `records` to `directory/file_name`, creating the directory if needed
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(TrawlError)` - The directory or file could not be written
pub fn write_records(
    directory: &Path,
    file_name: &str,
    records: &[Record],
) -> Result<PathBuf, TrawlError> {
    fs::create_dir_all(directory)?;

    let path = directory.join(file_name);
    let json = serde_json::to_string_pretty(records)?;
    fs::write(&path, json)?;

    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}
