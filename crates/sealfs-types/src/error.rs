//! Error-code contract shared by every sealfs error type.
//!
//! Each crate keeps its own `thiserror` enum; [`ErrorCode`] gives them a
//! common machine-readable surface so collaborators (commands, the CLI,
//! audit tooling) can branch on a stable code instead of on message text.
//!
//! # Example
//!
//! ```
//! use sealfs_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LookupError {
//!     Missing(String),
//!     Busy,
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Missing(_) => "LOOKUP_MISSING",
//!             Self::Busy => "LOOKUP_BUSY",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Busy)
//!     }
//! }
//!
//! assert_eq!(LookupError::Busy.code(), "LOOKUP_BUSY");
//! assert!(!LookupError::Missing("/x".into()).is_recoverable());
//! ```

/// Machine-readable view of an error.
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE, e.g. `"FS_NOT_FOUND"`
/// - prefixed by the layer that raised it (`FS_`, `AUTH_`, `TREE_`, `CONFIG_`)
/// - stable once published; listing tools match on them
///
/// # Recoverability
///
/// An error is recoverable when the caller can act to make a retry
/// succeed (create the missing parent, release a handle, fix a flag).
/// Permission denials and invalid input are not.
pub trait ErrorCode {
    /// Returns the stable code of this error.
    fn code(&self) -> &'static str;

    /// Returns whether a corrective action followed by a retry may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows the sealfs conventions.
///
/// # Panics
///
/// Panics if the code is empty, lacks `expected_prefix` or is not
/// UPPER_SNAKE_CASE.
///
/// # Example
///
/// ```
/// use sealfs_types::{ErrorCode, assert_error_code};
///
/// struct Busy;
///
/// impl ErrorCode for Busy {
///     fn code(&self) -> &'static str { "FS_BUSY" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Busy, "FS_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every error in `errors`, typically one per enum variant.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
