//! Error types for predicate compilation and SQL generation.

use thiserror::Error;

/// Result alias for fallible query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while compiling predicates or building dialect SQL.
///
/// Every error is raised synchronously and fail-fast: nothing here is
/// retried or partially applied, the caller has to correct the
/// predicate or the builder arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The predicate tree has a shape the compiler does not translate.
    #[error("unsupported predicate shape: {reason}")]
    UnsupportedPredicate {
        /// What the compiler found instead of a supported node.
        reason: String,
    },

    /// A resolved operand fell outside the supported value set.
    #[error("unsupported constant: {reason}")]
    UnsupportedConstant {
        /// Description of the offending value.
        reason: String,
    },

    /// A method call carried arguments.
    #[error("unsupported method call: `{method}` takes {argc} argument(s), only parameterless calls translate")]
    UnsupportedCall {
        /// Name of the called method.
        method: String,
        /// How many arguments it carried.
        argc: usize,
    },

    /// An argument to a SQL builder failed validation.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Which precondition was violated.
        reason: String,
    },
}

impl QueryError {
    /// Create an unsupported-predicate-shape error.
    pub fn unsupported_predicate(reason: impl Into<String>) -> Self {
        Self::UnsupportedPredicate {
            reason: reason.into(),
        }
    }

    /// Create an unsupported-constant error.
    pub fn unsupported_constant(reason: impl Into<String>) -> Self {
        Self::UnsupportedConstant {
            reason: reason.into(),
        }
    }

    /// Create an unsupported-method-call error.
    pub fn unsupported_call(method: impl Into<String>, argc: usize) -> Self {
        Self::UnsupportedCall {
            method: method.into(),
            argc,
        }
    }

    /// Create an argument-validation error.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}
