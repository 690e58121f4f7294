//! # Persistence Layer
//!
//! Repository traits and the in-memory implementation.

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryRfqRepository;
pub use traits::{RepositoryError, RepositoryResult, RfqRepository};
