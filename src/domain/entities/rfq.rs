//! # RFQ Aggregate
//!
//! The Request-for-Quote aggregate root.
//!
//! An [`Rfq`] embeds its quotes and its activity log; the three form one
//! consistency boundary written atomically. Every mutating operation
//! re-validates the standing invariants, appends exactly one
//! [`ActivityEntry`], and bumps the optimistic `version` counter the
//! repository checks at commit time.
//!
//! # Invariants
//!
//! - Selection-criteria weights sum to exactly 100 at every write
//! - `issued_date < due_date <= valid_until`
//! - At most one quote per supplier is active at any instant
//! - No transition leaves a terminal status

use crate::domain::entities::quote::Quote;
use crate::domain::errors::{DomainError, DomainResult, EligibilityError};
use crate::domain::events::activity::{ActivityEntry, ActivityKind};
use crate::domain::services::evaluation::RankedQuote;
use crate::domain::value_objects::criteria::SelectionCriteria;
use crate::domain::value_objects::ids::{BuyerId, QuoteId, RfqId, SupplierId, TenantId};
use crate::domain::value_objects::money::Money;
use crate::domain::value_objects::rfq_number::RfqNumber;
use crate::domain::value_objects::rfq_status::RfqStatus;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::visibility::Visibility;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One requested item on an RFQ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRequirement {
    /// Item name.
    pub name: String,
    /// Required quantity (>= 1).
    pub quantity: u32,
    /// Unit of measure (e.g. "pcs", "kg").
    pub unit: String,
    /// Optional target unit price.
    pub target_price: Option<Money>,
    /// Required certifications, if any.
    pub certifications: Vec<String>,
}

impl ItemRequirement {
    /// Creates an item requirement without target price or certifications.
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: u32, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
            target_price: None,
            certifications: Vec::new(),
        }
    }
}

/// The RFQ aggregate root.
///
/// Constructed through [`RfqBuilder`]; mutated only through the lifecycle
/// methods below, each of which appends one activity entry and bumps
/// `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rfq {
    id: RfqId,
    tenant_id: TenantId,
    number: RfqNumber,
    buyer_id: BuyerId,
    title: String,
    description: String,
    category: String,
    items: Vec<ItemRequirement>,
    delivery_location: String,
    delivery_terms: Option<String>,
    criteria: SelectionCriteria,
    issued_date: Timestamp,
    due_date: Timestamp,
    valid_until: Timestamp,
    status: RfqStatus,
    visibility: Visibility,
    invited_suppliers: Vec<SupplierId>,
    excluded_suppliers: Vec<SupplierId>,
    version: u64,
    quotes: Vec<Quote>,
    activity_log: Vec<ActivityEntry>,
    awarded_to: Option<SupplierId>,
    awarded_quote: Option<QuoteId>,
    awarded_date: Option<Timestamp>,
}

impl Rfq {
    /// Starts building a new draft RFQ.
    #[must_use]
    pub fn builder(
        tenant_id: TenantId,
        number: RfqNumber,
        buyer_id: BuyerId,
        title: impl Into<String>,
    ) -> RfqBuilder {
        RfqBuilder::new(tenant_id, number, buyer_id, title)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Internal opaque id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> RfqId {
        self.id
    }

    /// Owning tenant.
    #[inline]
    #[must_use]
    pub const fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Human-readable, tenant-scoped number. Generated once, never changes.
    #[inline]
    #[must_use]
    pub const fn number(&self) -> &RfqNumber {
        &self.number
    }

    /// Owning buyer.
    #[inline]
    #[must_use]
    pub const fn buyer_id(&self) -> &BuyerId {
        &self.buyer_id
    }

    /// Title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Ordered item requirements.
    #[must_use]
    pub fn items(&self) -> &[ItemRequirement] {
        &self.items
    }

    /// Selection-criteria weights.
    #[inline]
    #[must_use]
    pub const fn criteria(&self) -> &SelectionCriteria {
        &self.criteria
    }

    /// Issue date.
    #[inline]
    #[must_use]
    pub const fn issued_date(&self) -> Timestamp {
        self.issued_date
    }

    /// Quoting deadline.
    #[inline]
    #[must_use]
    pub const fn due_date(&self) -> Timestamp {
        self.due_date
    }

    /// End of quote validity.
    #[inline]
    #[must_use]
    pub const fn valid_until(&self) -> Timestamp {
        self.valid_until
    }

    /// Current lifecycle status.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> RfqStatus {
        self.status
    }

    /// Visibility rule.
    #[inline]
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Invitation list (meaningful when visibility is `Invited`).
    #[must_use]
    pub fn invited_suppliers(&self) -> &[SupplierId] {
        &self.invited_suppliers
    }

    /// Exclusion list.
    #[must_use]
    pub fn excluded_suppliers(&self) -> &[SupplierId] {
        &self.excluded_suppliers
    }

    /// Optimistic concurrency counter, bumped on every mutating write.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Embedded quotes, in submission order.
    #[must_use]
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Append-only activity log, in event order.
    #[must_use]
    pub fn activity_log(&self) -> &[ActivityEntry] {
        &self.activity_log
    }

    /// Winning supplier, once awarded.
    #[inline]
    #[must_use]
    pub const fn awarded_to(&self) -> Option<&SupplierId> {
        self.awarded_to.as_ref()
    }

    /// Winning quote, once awarded.
    #[inline]
    #[must_use]
    pub const fn awarded_quote(&self) -> Option<QuoteId> {
        self.awarded_quote
    }

    /// Award date, once awarded.
    #[inline]
    #[must_use]
    pub const fn awarded_date(&self) -> Option<Timestamp> {
        self.awarded_date
    }

    /// Looks up a quote by id.
    #[must_use]
    pub fn quote(&self, quote_id: QuoteId) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.id() == quote_id)
    }

    /// The supplier's quote that blocks a fresh submission, if any
    /// (any non-withdrawn, non-rejected quote).
    #[must_use]
    pub fn blocking_quote_of(&self, supplier_id: &SupplierId) -> Option<&Quote> {
        self.quotes
            .iter()
            .find(|q| q.supplier_id() == supplier_id && q.status().blocks_resubmission())
    }

    /// The supplier's currently competing quote (submitted or revised).
    #[must_use]
    pub fn competing_quote_of(&self, supplier_id: &SupplierId) -> Option<&Quote> {
        self.quotes
            .iter()
            .find(|q| q.supplier_id() == supplier_id && q.is_competing())
    }

    /// Iterator over competing quotes, in submission order.
    pub fn competing_quotes(&self) -> impl Iterator<Item = &Quote> {
        self.quotes.iter().filter(|q| q.is_competing())
    }

    /// Returns true if the RFQ is open for quoting at `now`.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.status.accepts_quotes() && !now.is_after(self.due_date)
    }

    // ------------------------------------------------------------------
    // Standing invariants
    // ------------------------------------------------------------------

    /// Re-validates the standing invariants.
    ///
    /// Called before every persist, creation or mutation alike: the
    /// weight-sum and timeline rules are standing constraints, not
    /// construction-time checks.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`DomainError`].
    pub fn validate(&self) -> DomainResult<()> {
        self.criteria.validate()?;
        Self::validate_timeline(self.issued_date, self.due_date, self.valid_until)?;
        if self.title.trim().is_empty() {
            return Err(DomainError::MissingField("title"));
        }
        if self.items.is_empty() {
            return Err(DomainError::MissingField("items"));
        }
        Ok(())
    }

    fn validate_timeline(
        issued: Timestamp,
        due: Timestamp,
        valid_until: Timestamp,
    ) -> DomainResult<()> {
        if !due.is_after(issued) {
            return Err(DomainError::InvalidTimeline(format!(
                "due date {due} must be after issue date {issued}"
            )));
        }
        if due.is_after(valid_until) {
            return Err(DomainError::InvalidTimeline(format!(
                "valid-until {valid_until} must not precede due date {due}"
            )));
        }
        Ok(())
    }

    fn record(&mut self, at: Timestamp, actor: impl Into<String>, kind: ActivityKind) -> ActivityEntry {
        let entry = ActivityEntry::new(at, actor, kind);
        self.activity_log.push(entry.clone());
        self.version += 1;
        entry
    }

    fn require_transition(&self, target: RfqStatus) -> DomainResult<()> {
        if self.status.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
            })
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle transitions
    // ------------------------------------------------------------------

    /// Publishes a draft, opening it for quoting per its visibility.
    ///
    /// # Errors
    ///
    /// Returns a state error unless the RFQ is a draft with a due date
    /// still in the future.
    pub fn publish(&mut self, actor: &str, now: Timestamp) -> DomainResult<ActivityEntry> {
        self.require_transition(RfqStatus::Published)?;
        if now.is_after(self.due_date) {
            return Err(DomainError::OperationNotAllowed(format!(
                "cannot publish: due date {} already passed",
                self.due_date
            )));
        }
        self.validate()?;
        self.status = RfqStatus::Published;
        Ok(self.record(now, actor, ActivityKind::RfqPublished))
    }

    /// Applies lazy expiry: a published RFQ past its due date becomes
    /// expired the moment it is read or written.
    ///
    /// Returns the appended entry if the status changed, `None` otherwise.
    pub fn expire_if_due(&mut self, now: Timestamp) -> Option<ActivityEntry> {
        if self.status == RfqStatus::Published && now.is_after(self.due_date) {
            self.status = RfqStatus::Expired;
            Some(self.record(now, "system", ActivityKind::RfqExpired))
        } else {
            None
        }
    }

    /// Cancels the RFQ. Quotes are kept untouched as historical record.
    ///
    /// # Errors
    ///
    /// Returns a state error from any terminal status.
    pub fn cancel(
        &mut self,
        actor: &str,
        reason: impl Into<String>,
        now: Timestamp,
    ) -> DomainResult<ActivityEntry> {
        self.require_transition(RfqStatus::Cancelled)?;
        self.status = RfqStatus::Cancelled;
        Ok(self.record(
            now,
            actor,
            ActivityKind::RfqCancelled {
                reason: reason.into(),
            },
        ))
    }

    /// Closes quoting early without an award.
    ///
    /// # Errors
    ///
    /// Returns a state error unless the RFQ is published.
    pub fn close(&mut self, actor: &str, now: Timestamp) -> DomainResult<ActivityEntry> {
        self.require_transition(RfqStatus::Closed)?;
        self.status = RfqStatus::Closed;
        Ok(self.record(now, actor, ActivityKind::RfqClosed))
    }

    /// Extends the quoting deadline, strictly forward in time.
    ///
    /// If the new due date passes `valid_until`, the validity window is
    /// pushed out with it so the timeline invariant keeps holding.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::OperationNotAllowed`] unless published, or
    /// [`DomainError::DeadlineNotForward`] if `new_date` is not strictly
    /// after the current due date.
    pub fn extend_deadline(
        &mut self,
        actor: &str,
        new_date: Timestamp,
        now: Timestamp,
    ) -> DomainResult<ActivityEntry> {
        if self.status != RfqStatus::Published {
            return Err(DomainError::OperationNotAllowed(format!(
                "deadline can only be extended while published, status is {}",
                self.status
            )));
        }
        if !new_date.is_after(self.due_date) {
            return Err(DomainError::DeadlineNotForward {
                current: self.due_date.to_string(),
                requested: new_date.to_string(),
            });
        }
        let old_date = self.due_date;
        self.due_date = new_date;
        if new_date.is_after(self.valid_until) {
            self.valid_until = new_date;
        }
        Ok(self.record(
            now,
            actor,
            ActivityKind::DeadlineExtended { old_date, new_date },
        ))
    }

    // ------------------------------------------------------------------
    // Quote ledger
    // ------------------------------------------------------------------

    /// Appends a freshly submitted quote.
    ///
    /// The eligibility gate runs before this call; the aggregate still
    /// re-checks the one-active-quote invariant and the line items so a
    /// stale gate decision can never corrupt state.
    ///
    /// # Errors
    ///
    /// Returns [`EligibilityError::DuplicateQuote`] if the supplier already
    /// has a blocking quote, or [`DomainError::InvalidLineItem`] for a bad
    /// line.
    pub fn submit_quote(&mut self, quote: Quote, now: Timestamp) -> DomainResult<ActivityEntry> {
        if self.blocking_quote_of(quote.supplier_id()).is_some() {
            return Err(EligibilityError::DuplicateQuote(format!(
                "supplier {} already has an active quote",
                quote.supplier_id()
            ))
            .into());
        }
        for item in quote.line_items() {
            item.validate(self.items.len())?;
        }
        let quote_id = quote.id();
        self.quotes.push(quote);
        Ok(self.record(
            now,
            quote_id.to_string(),
            ActivityKind::QuoteSubmitted { quote_id },
        ))
    }

    /// Replaces the supplier's competing quote with a revision.
    ///
    /// The prior quote is marked withdrawn and the revision appended within
    /// this one call, so there is never a window with two active quotes
    /// from one supplier.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::QuoteNotFound`] if the supplier has no
    /// competing quote, or [`DomainError::InvalidLineItem`] for a bad line.
    pub fn revise_quote(&mut self, revision: Quote, now: Timestamp) -> DomainResult<ActivityEntry> {
        for item in revision.line_items() {
            item.validate(self.items.len())?;
        }
        let supplier_id = revision.supplier_id().clone();
        let superseded = self
            .quotes
            .iter_mut()
            .find(|q| q.supplier_id() == &supplier_id && q.is_competing())
            .ok_or_else(|| {
                DomainError::QuoteNotFound(format!(
                    "supplier {supplier_id} has no active quote to revise"
                ))
            })?;
        let superseded_id = superseded.id();
        superseded.withdraw()?;
        let quote_id = revision.id();
        self.quotes.push(revision);
        Ok(self.record(
            now,
            quote_id.to_string(),
            ActivityKind::QuoteRevised {
                quote_id,
                superseded: superseded_id,
            },
        ))
    }

    /// Withdraws the supplier's competing quote. The record is kept.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::QuoteNotFound`] if the supplier has no
    /// competing quote.
    pub fn withdraw_quote(
        &mut self,
        supplier_id: &SupplierId,
        now: Timestamp,
    ) -> DomainResult<ActivityEntry> {
        let quote = self
            .quotes
            .iter_mut()
            .find(|q| q.supplier_id() == supplier_id && q.is_competing())
            .ok_or_else(|| {
                DomainError::QuoteNotFound(format!(
                    "supplier {supplier_id} has no active quote to withdraw"
                ))
            })?;
        let quote_id = quote.id();
        quote.withdraw()?;
        Ok(self.record(
            now,
            supplier_id.to_string(),
            ActivityKind::QuoteWithdrawn { quote_id },
        ))
    }

    // ------------------------------------------------------------------
    // Evaluation and award
    // ------------------------------------------------------------------

    /// Persists an evaluation run onto the competing quotes.
    ///
    /// A no-op returning `None` when the ranking is empty; otherwise each
    /// listed quote gets its display score (rounded to 2 decimals) and
    /// rank, and one `quotes_evaluated` entry is appended.
    pub fn apply_evaluation(
        &mut self,
        ranking: &[RankedQuote],
        now: Timestamp,
    ) -> Option<ActivityEntry> {
        if ranking.is_empty() {
            return None;
        }
        for ranked in ranking {
            if let Some(quote) = self.quotes.iter_mut().find(|q| q.id() == ranked.quote_id) {
                quote.record_evaluation(ranked.score, ranked.rank);
            }
        }
        Some(self.record(
            now,
            "system",
            ActivityKind::QuotesEvaluated {
                evaluated: ranking.len(),
            },
        ))
    }

    /// Awards the RFQ to a supplier's quote.
    ///
    /// One atomic effect: status becomes `Awarded` with the award fields
    /// set, the winning quote becomes `Accepted`, every other competing
    /// quote becomes `Rejected`, and one `rfq_awarded` entry is appended.
    ///
    /// # Errors
    ///
    /// Returns a state error unless the RFQ is published, the quote exists,
    /// belongs to the supplier, and is competing.
    pub fn award(
        &mut self,
        actor: &str,
        supplier_id: &SupplierId,
        quote_id: QuoteId,
        now: Timestamp,
    ) -> DomainResult<ActivityEntry> {
        self.require_transition(RfqStatus::Awarded)?;
        let winner = self
            .quote(quote_id)
            .ok_or_else(|| DomainError::QuoteNotFound(quote_id.to_string()))?;
        if winner.supplier_id() != supplier_id {
            return Err(DomainError::OperationNotAllowed(format!(
                "quote {quote_id} does not belong to supplier {supplier_id}"
            )));
        }
        if !winner.is_competing() {
            return Err(DomainError::QuoteNotActive(format!(
                "quote {} is {}",
                quote_id,
                winner.status()
            )));
        }
        let amount = winner.total_amount().clone();

        for quote in &mut self.quotes {
            if quote.id() == quote_id {
                quote.accept()?;
            } else {
                quote.reject();
            }
        }
        self.status = RfqStatus::Awarded;
        self.awarded_to = Some(supplier_id.clone());
        self.awarded_quote = Some(quote_id);
        self.awarded_date = Some(now);
        Ok(self.record(
            now,
            actor,
            ActivityKind::RfqAwarded {
                quote_id,
                supplier_id: supplier_id.clone(),
                amount,
            },
        ))
    }
}

impl fmt::Display for Rfq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rfq({} {} {} v{})",
            self.number, self.title, self.status, self.version
        )
    }
}

/// Builder for a draft [`Rfq`].
///
/// # Examples
///
/// ```
/// use rfq_engine::domain::entities::rfq::{ItemRequirement, Rfq};
/// use rfq_engine::domain::value_objects::{
///     BuyerId, RfqNumber, SelectionCriteria, TenantId, Timestamp,
/// };
///
/// let now = Timestamp::now();
/// let rfq = Rfq::builder(
///     TenantId::new("acme"),
///     RfqNumber::format("RFQ", "2608", 1).unwrap(),
///     BuyerId::new("buyer-1"),
///     "Steel brackets Q3",
/// )
/// .item(ItemRequirement::new("M8 bracket", 500, "pcs"))
/// .criteria(SelectionCriteria::price_only())
/// .timeline(now, now.add_days(14), now.add_days(30))
/// .build(now)
/// .unwrap();
///
/// assert_eq!(rfq.version(), 1);
/// ```
#[derive(Debug)]
pub struct RfqBuilder {
    tenant_id: TenantId,
    number: RfqNumber,
    buyer_id: BuyerId,
    title: String,
    description: String,
    category: String,
    items: Vec<ItemRequirement>,
    delivery_location: String,
    delivery_terms: Option<String>,
    criteria: SelectionCriteria,
    issued_date: Timestamp,
    due_date: Timestamp,
    valid_until: Timestamp,
    visibility: Visibility,
    invited_suppliers: Vec<SupplierId>,
    excluded_suppliers: Vec<SupplierId>,
}

impl RfqBuilder {
    /// Starts a builder with a default 14-day due date and 30-day validity
    /// window from now.
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        number: RfqNumber,
        buyer_id: BuyerId,
        title: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            tenant_id,
            number,
            buyer_id,
            title: title.into(),
            description: String::new(),
            category: String::new(),
            items: Vec::new(),
            delivery_location: String::new(),
            delivery_terms: None,
            criteria: SelectionCriteria::default(),
            issued_date: now,
            due_date: now.add_days(14),
            valid_until: now.add_days(30),
            visibility: Visibility::Public,
            invited_suppliers: Vec::new(),
            excluded_suppliers: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Appends an item requirement.
    #[must_use]
    pub fn item(mut self, item: ItemRequirement) -> Self {
        self.items.push(item);
        self
    }

    /// Replaces the item list.
    #[must_use]
    pub fn items(mut self, items: Vec<ItemRequirement>) -> Self {
        self.items = items;
        self
    }

    /// Sets the delivery location and optional terms.
    #[must_use]
    pub fn delivery(mut self, location: impl Into<String>, terms: Option<String>) -> Self {
        self.delivery_location = location.into();
        self.delivery_terms = terms;
        self
    }

    /// Sets the selection-criteria weights.
    #[must_use]
    pub fn criteria(mut self, criteria: SelectionCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Sets the timeline (`issued < due <= valid_until`, checked at build).
    #[must_use]
    pub fn timeline(mut self, issued: Timestamp, due: Timestamp, valid_until: Timestamp) -> Self {
        self.issued_date = issued;
        self.due_date = due;
        self.valid_until = valid_until;
        self
    }

    /// Sets the visibility rule.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Sets the invitation list.
    #[must_use]
    pub fn invited(mut self, suppliers: Vec<SupplierId>) -> Self {
        self.invited_suppliers = suppliers;
        self
    }

    /// Sets the exclusion list.
    #[must_use]
    pub fn excluded(mut self, suppliers: Vec<SupplierId>) -> Self {
        self.excluded_suppliers = suppliers;
        self
    }

    /// Builds the draft, validating every standing invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`DomainError`]; nothing is
    /// created on failure.
    pub fn build(self, now: Timestamp) -> DomainResult<Rfq> {
        let mut rfq = Rfq {
            id: RfqId::new_v4(),
            tenant_id: self.tenant_id,
            number: self.number,
            buyer_id: self.buyer_id,
            title: self.title,
            description: self.description,
            category: self.category,
            items: self.items,
            delivery_location: self.delivery_location,
            delivery_terms: self.delivery_terms,
            criteria: self.criteria,
            issued_date: self.issued_date,
            due_date: self.due_date,
            valid_until: self.valid_until,
            status: RfqStatus::Draft,
            visibility: self.visibility,
            invited_suppliers: self.invited_suppliers,
            excluded_suppliers: self.excluded_suppliers,
            version: 0,
            quotes: Vec::new(),
            activity_log: Vec::new(),
            awarded_to: None,
            awarded_quote: None,
            awarded_date: None,
        };
        rfq.validate()?;
        for item in &rfq.items {
            if item.quantity == 0 {
                return Err(DomainError::Validation(format!(
                    "item '{}' must have quantity of at least 1",
                    item.name
                )));
            }
        }
        let buyer = rfq.buyer_id.to_string();
        rfq.record(now, buyer, ActivityKind::RfqCreated);
        Ok(rfq)
    }
}
