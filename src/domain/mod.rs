//! # Domain Layer
//!
//! Core procurement business logic following Domain-Driven Design.
//!
//! This layer contains:
//! - **Entities**: The RFQ aggregate root and its embedded quotes
//! - **Value Objects**: Immutable types with validation (Money, identifiers, statuses)
//! - **Events**: Typed activity-log entries forming the audit trail
//! - **Errors**: Domain-specific error types
//! - **Services**: The eligibility gate and the quote evaluation engine

pub mod entities;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;
