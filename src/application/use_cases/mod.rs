//! # Use Cases
//!
//! The RFQ lifecycle service facade.

pub mod rfq_service;

pub use rfq_service::RfqService;
