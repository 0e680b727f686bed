//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Domain(d) | ApplicationError::Scenario { source: d, .. } => {
                    match d {
                        DomainError::UnsupportedOperation { .. }
                        | DomainError::NotFound { .. }
                        | DomainError::DuplicateId(_)
                        | DomainError::AlreadyAttached { .. }
                        | DomainError::CycleDetected { .. }
                        | DomainError::PriceOverflow { .. } => crate::exitcode::DATAERR,
                        DomainError::NodeNotFound => crate::exitcode::SOFTWARE,
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_config_error_when_mapping_then_config_exit_code() {
        let err = CliError::from(ApplicationError::Config {
            message: "bad".into(),
        });
        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
    }

    #[test]
    fn given_leaf_add_error_when_mapping_then_dataerr() {
        let err = CliError::from(ApplicationError::from(DomainError::UnsupportedOperation {
            id: 1,
            op: "add",
        }));
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_price_overflow_in_scenario_when_mapping_then_dataerr() {
        let err = CliError::from(ApplicationError::Scenario {
            scenario: "assembly",
            context: "net price".into(),
            source: DomainError::PriceOverflow { id: 5 },
        });
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }
}
