//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These wrap domain rule violations and infrastructure failures into the
//! taxonomy the service facade exposes. A rejected mutation always leaves
//! stored state untouched; the error message names the first violated rule.

use crate::domain::errors::{DomainError, EligibilityError};
use crate::infrastructure::directory::DirectoryError;
use crate::infrastructure::numbering::NumberingError;
use crate::infrastructure::persistence::traits::RepositoryError;
use crate::application::services::retry::Retryable;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Request validation failed before reaching the domain.
    #[error("validation error: {0}")]
    Validation(String),

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The caller is not allowed to perform this operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The requested RFQ does not exist (or is invisible to the caller).
    #[error("rfq not found: {0}")]
    RfqNotFound(String),

    /// The supplier is unknown to the directory or deactivated.
    #[error("supplier not admitted: {0}")]
    SupplierNotAdmitted(String),

    /// Optimistic-concurrency retries were exhausted.
    #[error("concurrent modification persisted after {attempts} attempts, giving up")]
    ConcurrencyConflict {
        /// Total attempts made, including the first.
        attempts: u32,
    },

    /// Repository failure other than a version conflict.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// RFQ number allocation failed.
    #[error("numbering error: {0}")]
    Numbering(#[from] NumberingError),

    /// Supplier directory failure.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}

impl From<EligibilityError> for ApplicationError {
    fn from(error: EligibilityError) -> Self {
        Self::Domain(DomainError::Eligibility(error))
    }
}

impl Retryable for ApplicationError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Repository(e) if e.is_retryable())
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_conflict_is_retryable_through_the_wrapper() {
        let err: ApplicationError =
            RepositoryError::version_conflict("Rfq", "x", 1, 2).into();
        assert!(err.is_retryable());
    }

    #[test]
    fn domain_errors_are_not_retryable() {
        let err: ApplicationError = DomainError::MissingField("title").into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn eligibility_converts_through_domain() {
        let err: ApplicationError =
            EligibilityError::DuplicateQuote("s1".into()).into();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::Eligibility(_))
        ));
    }
}
