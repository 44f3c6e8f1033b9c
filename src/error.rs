//! Error type carried through a query chain.

use thiserror::Error;

/// Failure produced by a builder operation.
///
/// Clone + PartialEq so a failed chain can hand back the exact error that
/// stopped it, however many operations followed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Base URL could not be parsed into scheme and host.
    #[error("invalid base URL {input:?}: {reason}")]
    InvalidUrl { input: String, reason: String },

    /// Timestamp string is not ISO-8601.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp { input: String, reason: String },

    /// Relative range amount is not a positive integer (or overflows seconds).
    #[error("invalid argument {name}={value}: must be a positive integer")]
    InvalidArgument { name: &'static str, value: i64 },
}

impl SearchError {
    pub(crate) fn invalid_url(input: &str, reason: impl ToString) -> Self {
        SearchError::InvalidUrl {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_timestamp(input: &str, reason: impl ToString) -> Self {
        SearchError::InvalidTimestamp {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = SearchError::invalid_url("nope", "relative URL without a base");
        assert_eq!(
            e.to_string(),
            "invalid base URL \"nope\": relative URL without a base"
        );

        let e = SearchError::InvalidArgument {
            name: "minutes",
            value: -3,
        };
        assert_eq!(
            e.to_string(),
            "invalid argument minutes=-3: must be a positive integer"
        );
    }
}
