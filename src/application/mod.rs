//! # Application Layer
//!
//! Use case orchestration and application services.
//!
//! This layer coordinates domain objects to perform lifecycle operations,
//! handling authorization, optimistic-concurrency retries, and number
//! allocation. It exposes one facade, [`RfqService`], whose collaborators
//! are injected as trait objects.

pub mod dto;
pub mod error;
pub mod services;
pub mod use_cases;

pub use dto::{CreateRfqRequest, MutationReceipt, QuoteSubmission, RfqView};
pub use error::{ApplicationError, ApplicationResult};
pub use services::{
    execute_with_retry, CallerContext, RetryError, RetryPolicy, Retryable, Role,
};
pub use use_cases::RfqService;
