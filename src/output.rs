//! Output formatting for gotags.
//!
//! The default format is the classic tags layout, one tag per line:
//! `name<TAB>path<TAB>:line`. A JSON array is available for tooling.

use std::io::Write;

use thiserror::Error;

use crate::collector::Tag;

/// Errors that can occur while writing output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `name\tpath\t:line` lines (default).
    #[default]
    Tags,
    /// JSON array of `{name, path, line}` objects.
    Json,
}

/// Write `tags` to `out` in the given format, in the order given.
pub fn write_tags<W: Write>(
    out: &mut W,
    tags: &[Tag],
    format: OutputFormat,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Tags => {
            for tag in tags {
                writeln!(out, "{tag}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, tags)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Render `tags` to a string.
pub fn format_tags(tags: &[Tag], format: OutputFormat) -> Result<String, OutputError> {
    let mut buf = Vec::new();
    write_tags(&mut buf, tags, format)?;
    String::from_utf8(buf).map_err(|e| OutputError::Io(std::io::Error::other(e)))
}
