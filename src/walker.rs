//! Source file discovery.
//!
//! Uses the `ignore` crate to walk the root recursively, yielding every file
//! whose base name matches `*.go`. By default this is a plain walk: hidden
//! entries are visited and ignore files are not consulted.

use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;
use thiserror::Error;
use tracing::warn;

/// Base-name pattern of indexed source files.
pub const SOURCE_PATTERN: &str = "*.go";

/// Errors that can occur during directory walking. All of them end the run.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("symlink loop detected: {path}")]
    SymlinkLoop { path: PathBuf },
}

/// Options for directory walking.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Honour `.gitignore`, `.ignore` and global git excludes.
    pub respect_ignore_files: bool,
    /// Visit hidden files and directories.
    pub include_hidden: bool,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            respect_ignore_files: false,
            include_hidden: true,
            follow_symlinks: false,
        }
    }
}

impl WalkOptions {
    /// Options that behave like a repository-aware tool: skip hidden
    /// entries and anything git ignores.
    pub fn repository() -> Self {
        Self {
            respect_ignore_files: true,
            include_hidden: false,
            ..Default::default()
        }
    }
}

/// Walk `root` and yield the source files under it, in lexical order.
///
/// Paths are joined onto `root` as given, with a leading `./` removed.
/// The iterator yields an error and should be abandoned on the first
/// traversal failure.
///
/// # Examples
///
/// ```no_run
/// use gotags::walker::{discover, WalkOptions};
/// use std::path::Path;
///
/// for path in discover(Path::new("."), &WalkOptions::default()) {
///     println!("{}", path.unwrap().display());
/// }
/// ```
pub fn discover(
    root: &Path,
    options: &WalkOptions,
) -> impl Iterator<Item = Result<PathBuf, WalkError>> {
    let root = root.to_path_buf();

    if !root.exists() {
        return itertools_lite::Either::Left(std::iter::once(Err(WalkError::NotFound {
            path: root,
        })));
    }

    let pattern = match Pattern::new(SOURCE_PATTERN) {
        Ok(p) => p,
        Err(e) => {
            return itertools_lite::Either::Left(std::iter::once(Err(WalkError::Io {
                path: root,
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
            })))
        }
    };

    let mut builder = WalkBuilder::new(&root);
    builder
        .standard_filters(options.respect_ignore_files)
        .hidden(!options.include_hidden)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name(|a, b| a.cmp(b));

    let walker = builder.build();

    itertools_lite::Either::Right(walker.filter_map(move |result| match result {
        Ok(entry) => {
            // Links are not followed for traversal, but a link to a file is
            // still a source file.
            let is_file = entry.file_type().is_some_and(|ft| ft.is_file())
                || (entry.path_is_symlink() && entry.path().is_file());
            let matches = entry
                .path()
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| pattern.matches(n));

            if is_file && matches {
                Some(Ok(display_path(entry.path())))
            } else {
                None
            }
        }
        Err(e) => convert_error(e, &root),
    }))
}

/// Drop a leading `./` so paths under the default root read `dir/file.go`.
fn display_path(path: &Path) -> PathBuf {
    path.strip_prefix(".").unwrap_or(path).to_path_buf()
}

fn convert_error(err: ignore::Error, path: &Path) -> Option<Result<PathBuf, WalkError>> {
    match err {
        ignore::Error::WithPath { path, err } => convert_error(*err, &path),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            convert_error(*err, path)
        }
        ignore::Error::Loop { child, .. } => Some(Err(WalkError::SymlinkLoop { path: child })),
        ignore::Error::Io(io_err) => {
            let path = path.to_path_buf();
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                Some(Err(WalkError::PermissionDenied { path }))
            } else {
                Some(Err(WalkError::Io {
                    path,
                    source: io_err,
                }))
            }
        }
        // Malformed ignore files do not stop the walk.
        other => {
            warn!("ignoring walk problem at {}: {}", path.display(), other);
            None
        }
    }
}

/// Simple Either type to avoid adding itertools dependency.
mod itertools_lite {
    pub enum Either<L, R> {
        Left(L),
        Right(R),
    }

    impl<L, R, T> Iterator for Either<L, R>
    where
        L: Iterator<Item = T>,
        R: Iterator<Item = T>,
    {
        type Item = T;

        fn next(&mut self) -> Option<Self::Item> {
            match self {
                Either::Left(l) => l.next(),
                Either::Right(r) => r.next(),
            }
        }
    }
}
