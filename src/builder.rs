//! Run driver.
//!
//! Discovers source files, parses them one at a time in discovery order,
//! extracts their tags into a single collector and hands back the sorted
//! result.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::collector::{Tag, TagCollector};
use crate::errors::GoTagsError;
use crate::extract::extract_tags;
use crate::syntax::{self, ParseError};
use crate::walker::{discover, WalkOptions};

/// Builder for a tagging run.
///
/// # Examples
///
/// ```no_run
/// use gotags::builder::GoTags;
///
/// let run = GoTags::new(".").run().unwrap();
/// for tag in &run.tags {
///     println!("{tag}");
/// }
/// ```
pub struct GoTags {
    root: PathBuf,
    walk_options: WalkOptions,
}

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files parsed and walked.
    pub files_indexed: usize,
    /// Files skipped because they could not be read or parsed.
    pub files_skipped: usize,
    /// Tags collected.
    pub tags: usize,
}

/// Result of a run: tags sorted by name, plus counters.
#[derive(Debug, Clone)]
pub struct TagRun {
    pub tags: Vec<Tag>,
    pub summary: RunSummary,
}

impl GoTags {
    /// Create a new builder for the given root path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            walk_options: WalkOptions::default(),
        }
    }

    /// Replace the walk options wholesale.
    pub fn walk_options(mut self, options: WalkOptions) -> Self {
        self.walk_options = options;
        self
    }

    /// Walk, parse and extract. Fails only on traversal errors.
    pub fn run(self) -> Result<TagRun, GoTagsError> {
        let mut collector = TagCollector::new();
        let mut summary = RunSummary::default();

        for entry in discover(&self.root, &self.walk_options) {
            let path = entry?;
            match index_file(&path, &mut collector) {
                Ok(count) => {
                    debug!("{}: {} tags", path.display(), count);
                    summary.files_indexed += 1;
                }
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                    summary.files_skipped += 1;
                }
            }
        }

        summary.tags = collector.len();
        info!(
            "indexed {} files ({} skipped), {} tags",
            summary.files_indexed, summary.files_skipped, summary.tags
        );

        Ok(TagRun {
            tags: collector.into_sorted(),
            summary,
        })
    }
}

/// Parse one file and append its tags. Nothing is appended on failure.
pub fn index_file(path: &Path, collector: &mut TagCollector) -> Result<usize, ParseError> {
    let file = syntax::parse_file(path)?;
    Ok(extract_tags(&file, collector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{format_tags, OutputFormat};
    use crate::walker::WalkError;
    use std::fs;
    use tempfile::TempDir;

    fn names(run: &TagRun) -> Vec<&str> {
        run.tags.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_run_sorted_across_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a.go"), "package a\n\nfunc Zed() {}\n").unwrap();
        fs::write(dir.path().join("b/b.go"), "package b\n\ntype Alpha int\n").unwrap();

        let run = GoTags::new(dir.path()).run().unwrap();
        assert_eq!(names(&run), ["Alpha", "Zed", "a", "b"]);
        assert_eq!(
            run.summary,
            RunSummary {
                files_indexed: 2,
                files_skipped: 0,
                tags: 4
            }
        );

        for pair in run.tags.windows(2) {
            assert!(pair[0].name <= pair[1].name);
        }
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.go"), "package bad\n\nfunc Broken( {\nvar Leak = 1\n").unwrap();
        fs::write(dir.path().join("good.go"), "package good\n\nvar Ok = 1\n").unwrap();

        let run = GoTags::new(dir.path()).run().unwrap();
        assert_eq!(names(&run), ["Ok", "good"]);
        assert!(run.tags.iter().all(|t| t.path.ends_with("good.go")));
        assert_eq!(run.summary.files_skipped, 1);
        assert_eq!(run.summary.files_indexed, 1);
    }

    #[test]
    fn test_top_level_statements_skip_the_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a_block.go"),
            "package p\n\nif true {\n    var Leak = 1\n    _ = Leak\n}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b_call.go"),
            "package p\n\nfunc() {\n    var Leak2 = 1\n    _ = Leak2\n}()\n",
        )
        .unwrap();
        fs::write(dir.path().join("c_late.go"), "func F() {}\n\npackage p\n").unwrap();
        fs::write(dir.path().join("d_valid.go"), "package p\n\nvar Kept = 1\n").unwrap();

        let run = GoTags::new(dir.path()).run().unwrap();
        assert_eq!(names(&run), ["Kept", "p"]);
        assert!(run.tags.iter().all(|t| t.path.ends_with("d_valid.go")));
        assert_eq!(run.summary.files_skipped, 3);
        assert_eq!(run.summary.files_indexed, 1);
    }

    #[test]
    fn test_duplicate_names_across_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.go"), "package p\n\ntype A struct{ Name string }\n").unwrap();
        fs::write(dir.path().join("b.go"), "package p\n\ntype B struct{ Name string }\n").unwrap();

        let run = GoTags::new(dir.path()).run().unwrap();
        let name_tags: Vec<_> = run.tags.iter().filter(|t| t.name == "Name").collect();
        assert_eq!(name_tags.len(), 2);
        assert!(name_tags[0].path.ends_with("a.go"));
        assert!(name_tags[1].path.ends_with("b.go"));
        assert_eq!(run.tags.iter().filter(|t| t.name == "p").count(), 2);
    }

    #[test]
    fn test_run_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for (name, body) in [
            ("x.go", "package x\n\nvar Shared, Other = 1, 2\n"),
            ("y.go", "package x\n\nfunc Shared2() {}\n"),
            ("z.go", "package x\n\ntype Shared3 struct{ F int }\n"),
        ] {
            fs::write(dir.path().join(name), body).unwrap();
        }

        let first = GoTags::new(dir.path()).run().unwrap();
        let second = GoTags::new(dir.path()).run().unwrap();
        assert_eq!(
            format_tags(&first.tags, OutputFormat::Tags).unwrap(),
            format_tags(&second.tags, OutputFormat::Tags).unwrap()
        );
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let err = GoTags::new("/nonexistent/gotags/root").run().unwrap_err();
        assert!(matches!(err, GoTagsError::Walk(WalkError::NotFound { .. })));
    }

    #[test]
    fn test_index_file_leaves_collector_untouched_on_error() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.go");
        fs::write(&bad, "not go at all {").unwrap();

        let mut collector = TagCollector::new();
        assert!(index_file(&bad, &mut collector).is_err());
        assert!(collector.is_empty());
    }
}
