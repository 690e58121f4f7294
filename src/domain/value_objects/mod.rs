//! # Value Objects
//!
//! Immutable, validated domain values.
//!
//! Value objects carry their invariants with them: a [`SelectionCriteria`]
//! always sums to 100, a [`Money`] amount is never negative, an
//! [`RfqNumber`] always matches `PREFIX-YYMM-NNNNN`. Entities compose these
//! so the aggregate only has to re-check cross-field constraints.

pub mod criteria;
pub mod ids;
pub mod money;
pub mod quote_status;
pub mod rfq_number;
pub mod rfq_status;
pub mod timestamp;
pub mod visibility;

pub use criteria::{Criterion, InvalidWeightsError, SelectionCriteria};
pub use ids::{BuyerId, EventId, QuoteId, RfqId, SupplierId, TenantId};
pub use money::{Money, MoneyError};
pub use quote_status::QuoteStatus;
pub use rfq_number::{RfqNumber, RfqNumberError};
pub use rfq_status::RfqStatus;
pub use timestamp::Timestamp;
pub use visibility::Visibility;
