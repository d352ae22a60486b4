//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                   |
//! |------|-----------|-----------------------------------------------|
//! | 0    | Universal | Success                                       |
//! | 1    | Universal | General error (unspecified)                   |
//! | 2    | Universal | CLI usage error (bad args)                    |
//! | 3    | input     | Input file unreadable or malformed            |
//! | 4    | upload    | Upload has no header or no data rows          |
//! | 5    | upload    | No review text column in the upload           |
//! | 6    | config    | Verification config invalid                   |
//!
//! Verification results never change the exit code: a run where every
//! review is `not_found` still exits 0.
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use funnel_io::UploadError;
use funnel_verify::VerifyError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Input (3-5)
// =============================================================================

/// Input file cannot be read, or customers JSON / spreadsheet is malformed.
pub const EXIT_INPUT: u8 = 3;

/// Upload has no header row or no data rows.
pub const EXIT_EMPTY_UPLOAD: u8 = 4;

/// No header in the upload matches the review text role.
pub const EXIT_MISSING_COLUMN: u8 = 5;

// =============================================================================
// Config (6)
// =============================================================================

/// Verification config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 6;

/// Map an upload error to its exit code.
pub fn upload_exit_code(err: &UploadError) -> u8 {
    match err {
        UploadError::EmptyInput => EXIT_EMPTY_UPLOAD,
        UploadError::MissingColumn { .. } => EXIT_MISSING_COLUMN,
        UploadError::Spreadsheet(_) | UploadError::Io(_) => EXIT_INPUT,
    }
}

/// Map a config error to its exit code.
pub fn config_exit_code(err: &VerifyError) -> u8 {
    match err {
        VerifyError::ConfigParse(_) | VerifyError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        VerifyError::Io(_) => EXIT_INPUT,
    }
}
