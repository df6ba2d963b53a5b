//! Exit codes and structured error reporting for the binary.

use serde::Serialize;

/// Exit codes for the mediadupe binary.
///
/// - 0: Success (duplicates found, or removals carried out)
/// - 1: General error (bad arguments, unreadable config, missing root)
/// - 2: No duplicates found / nothing to remove
/// - 3: Partial success (some files could not be trashed)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: duplicates were found (and, for `remove`, handled).
    Success = 0,
    /// General error: an unexpected failure.
    GeneralError = 1,
    /// No duplicates: the scan completed but found nothing to report or remove.
    NoDuplicates = 2,
    /// Partial success: at least one selected file could not be trashed.
    PartialSuccess = 3,
    /// Interrupted: the scan was interrupted by the user.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "MD000",
            Self::GeneralError => "MD001",
            Self::NoDuplicates => "MD002",
            Self::PartialSuccess => "MD003",
            Self::Interrupted => "MD130",
        }
    }
}

/// Structured error information for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "MD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

/// Pick the exit code for an error that escaped `run_app`.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    let interrupted = err
        .downcast_ref::<crate::duplicates::FinderError>()
        .is_some_and(|e| matches!(e, crate::duplicates::FinderError::Interrupted));
    if interrupted {
        ExitCode::Interrupted
    } else {
        ExitCode::GeneralError
    }
}
