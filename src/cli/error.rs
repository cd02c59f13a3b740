//! CLI-level errors (wraps application errors)

use std::io::ErrorKind;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(e.into())
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(d) if d.is_format_error() => crate::exitcode::DATAERR,
                ApplicationError::Domain(DomainError::InvalidArgument(_)) => {
                    crate::exitcode::SOFTWARE
                }
                ApplicationError::Domain(_) => crate::exitcode::IOERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { context, .. } => match e.io_kind() {
                    Some(ErrorKind::NotFound) => crate::exitcode::NOINPUT,
                    Some(ErrorKind::PermissionDenied) => crate::exitcode::NOPERM,
                    _ if context.starts_with("write") || context.starts_with("create") => {
                        crate::exitcode::CANTCREAT
                    }
                    _ => crate::exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::IoResultExt;
    use std::path::Path;

    #[test]
    fn given_format_error_when_mapping_then_dataerr() {
        let err: CliError = DomainError::EmptyTranscript.into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_missing_file_when_mapping_then_noinput() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(ErrorKind::NotFound, "missing"));
        let err: CliError = result
            .with_path_context("read tree file", Path::new("nope.txt"))
            .unwrap_err()
            .into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_failed_write_when_mapping_then_cantcreat() {
        let result: std::io::Result<()> = Err(std::io::Error::new(ErrorKind::Other, "disk full"));
        let err: CliError = result
            .with_path_context("write tree file", Path::new("out.txt"))
            .unwrap_err()
            .into();
        assert_eq!(err.exit_code(), crate::exitcode::CANTCREAT);
    }

    #[test]
    fn given_usage_error_when_mapping_then_usage() {
        assert_eq!(
            CliError::Usage("no command".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
