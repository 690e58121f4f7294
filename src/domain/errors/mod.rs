//! # Domain Errors
//!
//! Typed error definitions for the domain layer.

pub mod domain_error;
pub mod eligibility_error;

pub use domain_error::{DomainError, DomainResult};
pub use eligibility_error::EligibilityError;
