//! # Domain Entities
//!
//! The RFQ aggregate root and its embedded quote entity.

pub mod quote;
pub mod rfq;

pub use quote::{Quote, QuoteLineItem};
pub use rfq::{ItemRequirement, Rfq, RfqBuilder};
