//! # Eligibility Gate
//!
//! Decides whether a supplier may submit a quote to an RFQ.
//!
//! The gate is a pure function over the aggregate: it runs an ordered list
//! of vetoes and the first failure wins, so callers always see the most
//! fundamental objection. Because the check reads only aggregate state, the
//! service layer re-runs it at commit time after every optimistic-concurrency
//! retry; a decision made against a stale version is never persisted.

use crate::domain::entities::rfq::Rfq;
use crate::domain::errors::EligibilityError;
use crate::domain::value_objects::ids::SupplierId;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::visibility::Visibility;

/// Stateless eligibility gate.
///
/// # Examples
///
/// ```
/// use rfq_engine::domain::entities::rfq::{ItemRequirement, Rfq};
/// use rfq_engine::domain::services::eligibility::EligibilityGate;
/// use rfq_engine::domain::value_objects::{
///     BuyerId, RfqNumber, SelectionCriteria, SupplierId, TenantId, Timestamp,
/// };
///
/// let now = Timestamp::now();
/// let mut rfq = Rfq::builder(
///     TenantId::new("acme"),
///     RfqNumber::format("RFQ", "2608", 1).unwrap(),
///     BuyerId::new("buyer-1"),
///     "Steel brackets",
/// )
/// .item(ItemRequirement::new("M8 bracket", 500, "pcs"))
/// .criteria(SelectionCriteria::price_only())
/// .timeline(now, now.add_days(14), now.add_days(30))
/// .build(now)
/// .unwrap();
/// rfq.publish("buyer-1", now).unwrap();
///
/// assert!(EligibilityGate::can_submit(&rfq, &SupplierId::new("supplier-1"), now).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityGate;

impl EligibilityGate {
    /// Runs the ordered vetoes for `supplier_id` against `rfq` at `now`.
    ///
    /// Veto order: RFQ not active, visibility denied, supplier excluded,
    /// duplicate quote. The first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`EligibilityError`] veto that applies.
    pub fn can_submit(
        rfq: &Rfq,
        supplier_id: &SupplierId,
        now: Timestamp,
    ) -> Result<(), EligibilityError> {
        Self::admission(rfq, supplier_id, now)?;
        if rfq.blocking_quote_of(supplier_id).is_some() {
            return Err(EligibilityError::DuplicateQuote(format!(
                "supplier {supplier_id} already has an active quote on rfq {}",
                rfq.number()
            )));
        }
        Ok(())
    }

    /// Runs the admission vetoes for a revision of an existing quote.
    ///
    /// Same order as [`Self::can_submit`] minus the duplicate veto: a
    /// revision replaces the supplier's active quote, so holding one is the
    /// point rather than an objection.
    ///
    /// # Errors
    ///
    /// Returns the first [`EligibilityError`] veto that applies.
    pub fn can_revise(
        rfq: &Rfq,
        supplier_id: &SupplierId,
        now: Timestamp,
    ) -> Result<(), EligibilityError> {
        Self::admission(rfq, supplier_id, now)
    }

    /// Vetoes shared by submission and revision: activity, visibility,
    /// exclusion.
    fn admission(
        rfq: &Rfq,
        supplier_id: &SupplierId,
        now: Timestamp,
    ) -> Result<(), EligibilityError> {
        if !rfq.is_active(now) {
            return Err(EligibilityError::RfqNotActive(format!(
                "rfq {} is {} and not accepting quotes",
                rfq.number(),
                rfq.status()
            )));
        }
        match rfq.visibility() {
            Visibility::Public => {}
            Visibility::Private => {
                return Err(EligibilityError::VisibilityDenied(format!(
                    "rfq {} is private",
                    rfq.number()
                )));
            }
            Visibility::Invited => {
                if !rfq.invited_suppliers().contains(supplier_id) {
                    return Err(EligibilityError::VisibilityDenied(format!(
                        "supplier {supplier_id} is not on the invitation list"
                    )));
                }
            }
        }
        if rfq.excluded_suppliers().contains(supplier_id) {
            return Err(EligibilityError::SupplierExcluded(format!(
                "supplier {supplier_id} is excluded from rfq {}",
                rfq.number()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::quote::{Quote, QuoteLineItem};
    use crate::domain::entities::rfq::ItemRequirement;
    use crate::domain::value_objects::criteria::SelectionCriteria;
    use crate::domain::value_objects::ids::{BuyerId, TenantId};
    use crate::domain::value_objects::money::Money;
    use crate::domain::value_objects::rfq_number::RfqNumber;

    fn base_time() -> Timestamp {
        Timestamp::from_unix_secs(1_770_000_000)
    }

    fn build_rfq(visibility: Visibility, now: Timestamp) -> Rfq {
        let mut rfq = Rfq::builder(
            TenantId::new("acme"),
            RfqNumber::format("RFQ", "2608", 1).unwrap(),
            BuyerId::new("buyer-1"),
            "Gate fixtures",
        )
        .item(ItemRequirement::new("widget", 10, "pcs"))
        .criteria(SelectionCriteria::price_only())
        .timeline(now, now.add_days(14), now.add_days(30))
        .visibility(visibility)
        .invited(vec![SupplierId::new("invited-1")])
        .excluded(vec![SupplierId::new("banned-1")])
        .build(now)
        .unwrap();
        rfq.publish("buyer-1", now).unwrap();
        rfq
    }

    fn quote_from(supplier: &str, now: Timestamp) -> Quote {
        Quote::submitted(
            SupplierId::new(supplier),
            Money::new(100.0, "USD").unwrap(),
            now.add_days(30),
            vec![QuoteLineItem {
                item_index: 0,
                unit_price: Money::new(10.0, "USD").unwrap(),
                quantity: 10,
                lead_time_days: 7,
                notes: None,
            }],
            now,
        )
    }

    #[test]
    fn open_public_rfq_admits_any_supplier() {
        let now = base_time();
        let rfq = build_rfq(Visibility::Public, now);
        assert!(EligibilityGate::can_submit(&rfq, &SupplierId::new("anyone"), now).is_ok());
    }

    #[test]
    fn draft_rfq_is_not_active() {
        let now = base_time();
        let rfq = Rfq::builder(
            TenantId::new("acme"),
            RfqNumber::format("RFQ", "2608", 2).unwrap(),
            BuyerId::new("buyer-1"),
            "Still a draft",
        )
        .item(ItemRequirement::new("widget", 10, "pcs"))
        .criteria(SelectionCriteria::price_only())
        .timeline(now, now.add_days(14), now.add_days(30))
        .build(now)
        .unwrap();
        assert!(matches!(
            EligibilityGate::can_submit(&rfq, &SupplierId::new("s1"), now),
            Err(EligibilityError::RfqNotActive(_))
        ));
    }

    #[test]
    fn past_due_rfq_is_not_active() {
        let now = base_time();
        let rfq = build_rfq(Visibility::Public, now);
        assert!(matches!(
            EligibilityGate::can_submit(&rfq, &SupplierId::new("s1"), now.add_days(15)),
            Err(EligibilityError::RfqNotActive(_))
        ));
    }

    #[test]
    fn private_rfq_denies_everyone() {
        let now = base_time();
        let rfq = build_rfq(Visibility::Private, now);
        assert!(matches!(
            EligibilityGate::can_submit(&rfq, &SupplierId::new("invited-1"), now),
            Err(EligibilityError::VisibilityDenied(_))
        ));
    }

    #[test]
    fn invited_rfq_checks_invitation_list() {
        let now = base_time();
        let rfq = build_rfq(Visibility::Invited, now);
        assert!(EligibilityGate::can_submit(&rfq, &SupplierId::new("invited-1"), now).is_ok());
        assert!(matches!(
            EligibilityGate::can_submit(&rfq, &SupplierId::new("outsider"), now),
            Err(EligibilityError::VisibilityDenied(_))
        ));
    }

    #[test]
    fn excluded_supplier_is_vetoed() {
        let now = base_time();
        let rfq = build_rfq(Visibility::Public, now);
        assert!(matches!(
            EligibilityGate::can_submit(&rfq, &SupplierId::new("banned-1"), now),
            Err(EligibilityError::SupplierExcluded(_))
        ));
    }

    #[test]
    fn duplicate_active_quote_is_vetoed() {
        let now = base_time();
        let mut rfq = build_rfq(Visibility::Public, now);
        rfq.submit_quote(quote_from("s1", now), now).unwrap();
        assert!(matches!(
            EligibilityGate::can_submit(&rfq, &SupplierId::new("s1"), now),
            Err(EligibilityError::DuplicateQuote(_))
        ));
    }

    #[test]
    fn withdrawn_quote_does_not_block_resubmission() {
        let now = base_time();
        let mut rfq = build_rfq(Visibility::Public, now);
        rfq.submit_quote(quote_from("s1", now), now).unwrap();
        rfq.withdraw_quote(&SupplierId::new("s1"), now).unwrap();
        assert!(EligibilityGate::can_submit(&rfq, &SupplierId::new("s1"), now).is_ok());
    }

    #[test]
    fn revision_is_admitted_despite_an_active_quote() {
        let now = base_time();
        let mut rfq = build_rfq(Visibility::Public, now);
        rfq.submit_quote(quote_from("s1", now), now).unwrap();
        assert!(EligibilityGate::can_revise(&rfq, &SupplierId::new("s1"), now).is_ok());
    }

    #[test]
    fn revision_still_runs_the_admission_vetoes() {
        let now = base_time();
        let rfq = build_rfq(Visibility::Invited, now);
        assert!(matches!(
            EligibilityGate::can_revise(&rfq, &SupplierId::new("outsider"), now),
            Err(EligibilityError::VisibilityDenied(_))
        ));
        assert!(matches!(
            EligibilityGate::can_revise(&rfq, &SupplierId::new("invited-1"), now.add_days(15)),
            Err(EligibilityError::RfqNotActive(_))
        ));

        let public = build_rfq(Visibility::Public, now);
        assert!(matches!(
            EligibilityGate::can_revise(&public, &SupplierId::new("banned-1"), now),
            Err(EligibilityError::SupplierExcluded(_))
        ));
    }

    #[test]
    fn first_veto_wins_over_later_ones() {
        // Excluded supplier on an expired rfq: the activity veto fires first.
        let now = base_time();
        let rfq = build_rfq(Visibility::Public, now);
        assert!(matches!(
            EligibilityGate::can_submit(&rfq, &SupplierId::new("banned-1"), now.add_days(20)),
            Err(EligibilityError::RfqNotActive(_))
        ));
    }
}
