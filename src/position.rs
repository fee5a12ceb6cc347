//! Offset to line resolution.
//!
//! Tree nodes only record byte offsets. A [`SourceMap`] is built once per
//! parsed file and turns those offsets back into `(file, line)` pairs.

use std::path::{Path, PathBuf};

/// A resolved source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position<'a> {
    /// File the offset belongs to.
    pub path: &'a Path,
    /// 1-indexed line.
    pub line: usize,
}

/// Line table for a single source file.
#[derive(Debug, Clone)]
pub struct SourceMap {
    path: PathBuf,
    /// Byte offset at which each line starts. Always contains at least `0`.
    line_starts: Vec<usize>,
}

impl SourceMap {
    /// Build the line table for `source`.
    pub fn new(path: impl Into<PathBuf>, source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = Vec::with_capacity(bytecount::count(bytes, b'\n') + 1);
        line_starts.push(0);
        line_starts.extend(
            bytes
                .iter()
                .enumerate()
                .filter(|(_, b)| **b == b'\n')
                .map(|(i, _)| i + 1),
        );

        Self {
            path: path.into(),
            line_starts,
        }
    }

    /// Path of the file this map describes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a byte offset to its position.
    ///
    /// Offsets past the end of the file resolve to the last line.
    pub fn resolve(&self, offset: usize) -> Position<'_> {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        Position {
            path: &self.path,
            line: line.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_lines() {
        let src = "package a\n\nfunc F() {}\n";
        let map = SourceMap::new("a.go", src);

        assert_eq!(map.resolve(0).line, 1);
        assert_eq!(map.resolve(8).line, 1);
        // The newline byte itself still belongs to its line.
        assert_eq!(map.resolve(9).line, 1);
        assert_eq!(map.resolve(10).line, 2);
        assert_eq!(map.resolve(src.find("func").unwrap()).line, 3);
        assert_eq!(map.resolve(0).path, Path::new("a.go"));
    }

    #[test]
    fn test_resolve_past_end_clamps() {
        let map = SourceMap::new("a.go", "one\ntwo");
        assert_eq!(map.resolve(1_000).line, 2);
    }

    #[test]
    fn test_empty_source() {
        let map = SourceMap::new("empty.go", "");
        assert_eq!(map.resolve(0).line, 1);
    }

    #[test]
    fn test_crlf_counts_lines_once() {
        let src = "a\r\nb\r\nc";
        let map = SourceMap::new("crlf.go", src);
        assert_eq!(map.resolve(src.find('c').unwrap()).line, 3);
    }
}
