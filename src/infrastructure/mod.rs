//! # Infrastructure Layer
//!
//! External adapters and implementations of domain ports.
//!
//! ## Persistence
//!
//! Repository traits plus the in-memory implementation used for tests and
//! embedding.
//!
//! ## Numbering
//!
//! Atomic per-tenant-per-month RFQ number allocation.
//!
//! ## Directory
//!
//! Read-only supplier account lookup.

pub mod directory;
pub mod numbering;
pub mod persistence;

pub use directory::{InMemorySupplierDirectory, SupplierDirectory, SupplierStatus};
pub use numbering::{InMemoryNumberGenerator, NumberingError, RfqNumberGenerator};
pub use persistence::{InMemoryRfqRepository, RepositoryError, RfqRepository};
