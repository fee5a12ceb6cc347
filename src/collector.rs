//! Tag records and the per-run collector.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::position::Position;

/// One tag: a declared name and where it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub path: PathBuf,
    /// 1-indexed line.
    pub line: usize,
}

impl Tag {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            line,
        }
    }

    /// Build a tag at a resolved position.
    pub fn at(name: impl Into<String>, position: Position<'_>) -> Self {
        Self::new(name, position.path, position.line)
    }
}

/// Renders the tags-file line, without a trailing newline.
impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t:{}", self.name, self.path.display(), self.line)
    }
}

/// Append-only list of tags gathered during a run.
///
/// Duplicates are kept. The collector is consumed by [`into_sorted`],
/// so it can only be drained once.
///
/// [`into_sorted`]: TagCollector::into_sorted
#[derive(Debug, Default)]
pub struct TagCollector {
    tags: Vec<Tag>,
}

impl TagCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Drain all tags, ordered by name (byte-wise, case-sensitive).
    ///
    /// The sort is stable: tags with equal names keep discovery order.
    pub fn into_sorted(self) -> Vec<Tag> {
        let mut tags = self.tags;
        tags.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        tags
    }
}
