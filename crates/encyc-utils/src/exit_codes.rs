//! Exit code constants for the `encyc` binary.
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 70 | `UPSTREAM_FAILURE` | Generation service failed |

/// Type-safe process exit code.
///
/// ```rust
/// use encyc_utils::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::from_i32(70), ExitCode::UPSTREAM_FAILURE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Upstream failure - the generation service rejected or dropped a request
    pub const UPSTREAM_FAILURE: ExitCode = ExitCode(70);

    /// Get the numeric exit code value for `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 1);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::UPSTREAM_FAILURE.as_i32(), 70);
    }

    #[test]
    fn test_exit_code_conversions() {
        let raw: i32 = ExitCode::CLI_ARGS.into();
        assert_eq!(raw, 2);
        assert_eq!(ExitCode::from(70), ExitCode::UPSTREAM_FAILURE);
    }
}
