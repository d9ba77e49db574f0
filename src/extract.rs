//! Statement extraction.
//!
//! Turns raw input (literal strings or file contents) into an ordered
//! sequence of trimmed, semicolon-delimited SQL statements, stripping
//! comment lines and re-joining statement fragments split across lines.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{DbRunError, Result};

/// Extracts the ordered statement sequence from the given inputs.
///
/// With `from_file` set, each input is a path to a SQL file; files that
/// cannot be read are logged and skipped, and the run continues with the
/// remaining inputs. Otherwise each input is used as literal SQL text.
///
/// Input order and in-source statement order are preserved end to end.
pub fn extract(inputs: &[String], from_file: bool) -> Vec<String> {
    let sqls: Vec<String> = if from_file {
        inputs
            .iter()
            .filter(|path| !path.trim().is_empty())
            .filter_map(|path| match read_source(path) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Skipping input file '{path}'. {e}");
                    None
                }
            })
            .flat_map(|text| fold_statements(&text))
            .collect()
    } else {
        inputs.to_vec()
    };

    // Uniform normalization for both file and literal inputs: one
    // semicolon-terminated clause in, one clean statement out.
    sqls.iter()
        .flat_map(|sql| sql.lines())
        .flat_map(|line| line.split(';'))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads one input file as UTF-8 text.
fn read_source(path: &str) -> Result<String> {
    let meta = fs::metadata(Path::new(path))
        .map_err(|e| DbRunError::file_read(format!("{path}: {e}")))?;
    if !meta.is_file() {
        return Err(DbRunError::file_read(format!("{path}: not a regular file")));
    }
    fs::read_to_string(path).map_err(|e| DbRunError::file_read(format!("{path}: {e}")))
}

/// Folds the lines of one source text into statements.
///
/// Blank lines and comment lines (trimmed first character `-` or `#`, which
/// also covers the SQL `--` block opener) are discarded. A new statement
/// starts when the buffer is empty or the previous statement already ends
/// with `;`; otherwise the line is appended to the previous statement with
/// no inserted whitespace.
///
/// Known limitation, kept on purpose: folding has no awareness of semicolons
/// inside string literals or procedural bodies. A line ending in `;` always
/// closes the current statement, even mid-construct.
fn fold_statements(text: &str) -> Vec<String> {
    let mut statements: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('-') || line.starts_with('#') {
            continue;
        }
        match statements.last_mut() {
            Some(last) if !last.ends_with(';') => last.push_str(line),
            _ => statements.push(line.to_string()),
        }
    }
    statements
}
