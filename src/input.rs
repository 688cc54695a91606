// src/input.rs
//! Identifier list files: UTF-8 text, one identifier or locator per line.

use crate::error::AppError;
use crate::types::NotionId;
use log::warn;
use std::path::Path;

/// Read source identifiers from a line-oriented file.
///
/// Blank lines are ignored. A line with no recognizable identifier is
/// skipped with a warning, never an abort. An optional `limit` caps how
/// many identifiers are returned.
pub fn read_identifier_file(path: &Path, limit: Option<usize>) -> Result<Vec<NotionId>, AppError> {
    let contents = std::fs::read_to_string(path)?;
    let mut ids = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match NotionId::find_in(line) {
            Some(id) => ids.push(id),
            None => {
                warn!("skipping line with no recognizable identifier: {line}");
                eprintln!("Skipping invalid line (no page id found): {line}");
            }
        }
    }

    if let Some(limit) = limit {
        ids.truncate(limit);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_ids_and_skips_garbage_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "550e8400-e29b-41d4-a716-446655440000").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "definitely not an identifier").unwrap();
        writeln!(
            file,
            "https://www.notion.so/Trip-Log-0123456789abcdef0123456789abcdef"
        )
        .unwrap();

        let ids = read_identifier_file(file.path(), None).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].as_str(), "550e8400e29b41d4a716446655440000");
        assert_eq!(ids[1].as_str(), "0123456789abcdef0123456789abcdef");
    }

    #[test]
    fn limit_caps_the_result() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for n in 0..5 {
            writeln!(file, "{:032x}", n as u128).unwrap();
        }
        let ids = read_identifier_file(file.path(), Some(2)).unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_identifier_file(Path::new("/nonexistent/pages.txt"), None).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
