//! # RFQ Engine
//!
//! Procurement Request-for-Quote lifecycle and quote-evaluation engine:
//! tenant-scoped RFQ numbering, a published/closed/awarded state machine
//! with lazy expiry, a supplier quote ledger, weighted multi-criteria
//! evaluation, and atomic award handling under optimistic concurrency.
//!
//! ## Architecture
//!
//! This crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): The RFQ aggregate, value objects, the
//!   eligibility gate, and the evaluation engine
//! - **Application Layer** (`application`): The [`RfqService`] facade,
//!   authorization, and bounded-retry write cycles
//! - **Infrastructure Layer** (`infrastructure`): Repository traits with
//!   in-memory implementations, number generation, supplier directory
//!
//! ## Example
//!
//! ```rust,ignore
//! use rfq_engine::application::{CallerContext, CreateRfqRequest, RfqService};
//! use rfq_engine::config::EngineConfig;
//!
//! let service = RfqService::new(repository, numbers, directory, EngineConfig::default());
//! let view = service
//!     .create_rfq(&CallerContext::buyer("buyer-1", "acme"), request)
//!     .await?;
//! ```
//!
//! [`RfqService`]: application::RfqService

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
