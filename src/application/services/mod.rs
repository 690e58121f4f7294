//! # Application Services
//!
//! Cross-cutting services used by the use-case layer: caller
//! authorization and bounded-retry execution.

pub mod authorization;
pub mod retry;

pub use authorization::{CallerContext, Role};
pub use retry::{execute_with_retry, RetryError, RetryPolicy, Retryable};
