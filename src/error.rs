use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad class of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Incomplete or invalid coefficient/friction data, raised before any physics runs.
    Configuration,
    /// Malformed arguments to a configuration call.
    InputValidation,
    /// Internal corruption, aborts the run.
    InvariantViolation,
}

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing coefficient '{param}' for type pair ({type_a}, {type_b})")]
    MissingCoefficient {
        type_a: String,
        type_b: String,
        param: &'static str,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingCoefficient { .. } | Error::Configuration(_) => ErrorKind::Configuration,
            Error::InvalidInput(_) => ErrorKind::InputValidation,
            Error::InvariantViolation(_) => ErrorKind::InvariantViolation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_coefficient_names_pair_and_parameter() {
        let e = Error::MissingCoefficient {
            type_a: "A".to_string(),
            type_b: "B".to_string(),
            param: "epsilon",
        };
        let msg = format!("{e}");
        assert!(msg.contains("epsilon"));
        assert!(msg.contains("(A, B)"));
        assert_eq!(e.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(
            Error::InvalidInput("mode".into()).kind(),
            ErrorKind::InputValidation
        );
        assert_eq!(
            Error::InvariantViolation("body".into()).kind(),
            ErrorKind::InvariantViolation
        );
        assert_eq!(
            Error::Configuration("gamma".into()).kind(),
            ErrorKind::Configuration
        );
    }
}
