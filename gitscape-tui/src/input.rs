//! Path entry sources: a JSON file, or standard input.

use std::fs;
use std::io::Read;
use std::path::Path;

use gitscape_diagram::{PathEntry, entries_from_json};

use crate::error::AppError;

/// Read the entry document at `source`; `-` reads standard input.
pub fn read_entries(source: &Path) -> Result<Vec<PathEntry>, AppError> {
    let source_name = if source == Path::new("-") {
        "standard input".to_string()
    } else {
        source.display().to_string()
    };

    let text = if source == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map(|_| text)
    } else {
        fs::read_to_string(source)
    }
    .map_err(|error| AppError::ReadEntries {
        source_name: source_name.clone(),
        error,
    })?;

    let entries = entries_from_json(&text).map_err(|error| AppError::ParseEntries {
        source_name: source_name.clone(),
        error,
    })?;
    log::info!("read {} entries from {source_name}", entries.len());
    Ok(entries)
}
