//! Error types for gotags.

use crate::output::OutputError;
use crate::walker::WalkError;

/// Top-level error type: anything that aborts a run.
///
/// Per-file parse failures are not represented here; they only cause the
/// file to be skipped.
#[derive(Debug, thiserror::Error)]
pub enum GoTagsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

/// Map an error to its exit code.
pub fn exit_code(error: &GoTagsError) -> i32 {
    match error {
        GoTagsError::Walk(WalkError::NotFound { .. }) => 3,
        GoTagsError::Walk(WalkError::PermissionDenied { .. }) => 4,
        GoTagsError::Walk(_) => 2,
        GoTagsError::Io(_) => 1,
        GoTagsError::Output(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_exit_codes() {
        let not_found = GoTagsError::from(WalkError::NotFound {
            path: PathBuf::from("missing"),
        });
        assert_eq!(exit_code(&not_found), 3);
        assert_eq!(not_found.to_string(), "path not found: missing");

        let denied = GoTagsError::from(WalkError::PermissionDenied {
            path: PathBuf::from("locked"),
        });
        assert_eq!(exit_code(&denied), 4);

        let looped = GoTagsError::from(WalkError::SymlinkLoop {
            path: PathBuf::from("loop"),
        });
        assert_eq!(exit_code(&looped), 2);

        let io = GoTagsError::from(std::io::Error::other("broken pipe"));
        assert_eq!(exit_code(&io), 1);
    }
}
