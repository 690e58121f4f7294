//! # RFQ Service
//!
//! The service facade orchestrating the RFQ lifecycle.
//!
//! Every mutation is an optimistic read-modify-write cycle: read the
//! aggregate, apply lazy expiry, re-run authorization and eligibility
//! against the fresh state, mutate a copy, validate the standing
//! invariants, and compare-and-swap on the aggregate version. A lost race
//! is retried under the configured [`RetryPolicy`]; exhaustion surfaces as
//! [`ApplicationError::ConcurrencyConflict`]. Preconditions are never
//! carried over from a failed attempt.

use crate::application::dto::{CreateRfqRequest, MutationReceipt, QuoteSubmission, RfqView};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::authorization::CallerContext;
use crate::application::services::retry::{execute_with_retry, RetryError, RetryPolicy};
use crate::config::EngineConfig;
use crate::domain::entities::quote::Quote;
use crate::domain::entities::rfq::Rfq;
use crate::domain::events::ActivityEntry;
use crate::domain::services::eligibility::EligibilityGate;
use crate::domain::services::evaluation::{EvaluationEngine, RankedQuote};
use crate::domain::value_objects::ids::{QuoteId, RfqId, SupplierId, TenantId};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::infrastructure::directory::{SupplierDirectory, SupplierStatus};
use crate::infrastructure::numbering::RfqNumberGenerator;
use crate::infrastructure::persistence::traits::RfqRepository;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The RFQ lifecycle service.
///
/// Collaborators are injected as trait objects so tests and embeddings can
/// swap storage, numbering, and the supplier directory freely.
#[derive(Debug)]
pub struct RfqService {
    repository: Arc<dyn RfqRepository>,
    numbers: Arc<dyn RfqNumberGenerator>,
    directory: Arc<dyn SupplierDirectory>,
    evaluator: EvaluationEngine,
    retry_policy: RetryPolicy,
    config: EngineConfig,
}

impl RfqService {
    /// Creates a service with the default evaluation engine (price
    /// normalized, other criteria neutral).
    #[must_use]
    pub fn new(
        repository: Arc<dyn RfqRepository>,
        numbers: Arc<dyn RfqNumberGenerator>,
        directory: Arc<dyn SupplierDirectory>,
        config: EngineConfig,
    ) -> Self {
        let retry_policy = config.retry_policy();
        Self {
            repository,
            numbers,
            directory,
            evaluator: EvaluationEngine::new(),
            retry_policy,
            config,
        }
    }

    /// Replaces the evaluation engine, e.g. to register criterion scorers.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: EvaluationEngine) -> Self {
        self.evaluator = evaluator;
        self
    }

    // ------------------------------------------------------------------
    // Buyer operations
    // ------------------------------------------------------------------

    /// Creates a draft RFQ with a freshly allocated number.
    ///
    /// # Errors
    ///
    /// Returns validation, authorization, numbering, or repository errors;
    /// nothing is stored on failure.
    #[instrument(skip(self, request), fields(caller = %caller.caller_id))]
    pub async fn create_rfq(
        &self,
        caller: &CallerContext,
        request: CreateRfqRequest,
    ) -> ApplicationResult<RfqView> {
        if caller.authorize_supplier().is_ok() {
            return Err(ApplicationError::Forbidden(
                "suppliers cannot create rfqs".to_owned(),
            ));
        }
        request.validate().map_err(ApplicationError::Validation)?;

        let now = Timestamp::now();
        let tenant_id = TenantId::new(caller.company_id.clone());
        let number = self
            .numbers
            .next_number(&tenant_id, &self.config.number_prefix, &now.yymm())
            .await?;

        let due_date = request
            .due_date
            .unwrap_or_else(|| now.add_days(self.config.default_due_days));
        let valid_until = request
            .valid_until
            .unwrap_or_else(|| now.add_days(self.config.default_validity_days));

        let rfq = Rfq::builder(
            tenant_id,
            number,
            crate::domain::value_objects::ids::BuyerId::new(caller.caller_id.clone()),
            request.title,
        )
        .description(request.description)
        .category(request.category)
        .items(request.items)
        .delivery(request.delivery_location, request.delivery_terms)
        .criteria(request.criteria)
        .timeline(now, due_date, valid_until)
        .visibility(request.visibility)
        .invited(request.invited_suppliers)
        .excluded(request.excluded_suppliers)
        .build(now)?;

        self.repository.insert(&rfq).await?;
        info!(number = %rfq.number(), "rfq created");
        Ok(RfqView::from(&rfq))
    }

    /// Publishes a draft, opening it for quoting.
    ///
    /// # Errors
    ///
    /// Returns authorization, state, or concurrency errors.
    #[instrument(skip(self), fields(caller = %caller.caller_id, rfq = %rfq_id))]
    pub async fn publish_rfq(
        &self,
        caller: &CallerContext,
        rfq_id: RfqId,
    ) -> ApplicationResult<MutationReceipt> {
        let (rfq, entry) = self
            .mutate(rfq_id, |rfq, now| {
                caller.authorize_buyer_of(rfq)?;
                Ok(rfq.publish(&caller.caller_id, now)?)
            })
            .await?;
        info!(number = %rfq.number(), "rfq published");
        Ok(Self::receipt(&rfq, entry, None))
    }

    /// Cancels an RFQ with a reason.
    ///
    /// # Errors
    ///
    /// Returns authorization, state, or concurrency errors.
    #[instrument(skip(self, reason), fields(caller = %caller.caller_id, rfq = %rfq_id))]
    pub async fn cancel_rfq(
        &self,
        caller: &CallerContext,
        rfq_id: RfqId,
        reason: impl Into<String> + Send,
    ) -> ApplicationResult<MutationReceipt> {
        let reason = reason.into();
        let (rfq, entry) = self
            .mutate(rfq_id, |rfq, now| {
                caller.authorize_buyer_of(rfq)?;
                Ok(rfq.cancel(&caller.caller_id, reason.clone(), now)?)
            })
            .await?;
        info!(number = %rfq.number(), "rfq cancelled");
        Ok(Self::receipt(&rfq, entry, None))
    }

    /// Closes quoting early without an award.
    ///
    /// # Errors
    ///
    /// Returns authorization, state, or concurrency errors.
    #[instrument(skip(self), fields(caller = %caller.caller_id, rfq = %rfq_id))]
    pub async fn close_rfq(
        &self,
        caller: &CallerContext,
        rfq_id: RfqId,
    ) -> ApplicationResult<MutationReceipt> {
        let (rfq, entry) = self
            .mutate(rfq_id, |rfq, now| {
                caller.authorize_buyer_of(rfq)?;
                Ok(rfq.close(&caller.caller_id, now)?)
            })
            .await?;
        Ok(Self::receipt(&rfq, entry, None))
    }

    /// Extends the quoting deadline, strictly forward.
    ///
    /// # Errors
    ///
    /// Returns authorization, state, or concurrency errors.
    #[instrument(skip(self), fields(caller = %caller.caller_id, rfq = %rfq_id))]
    pub async fn extend_deadline(
        &self,
        caller: &CallerContext,
        rfq_id: RfqId,
        new_date: Timestamp,
    ) -> ApplicationResult<MutationReceipt> {
        let (rfq, entry) = self
            .mutate(rfq_id, |rfq, now| {
                caller.authorize_buyer_of(rfq)?;
                Ok(rfq.extend_deadline(&caller.caller_id, new_date, now)?)
            })
            .await?;
        info!(number = %rfq.number(), due = %rfq.due_date(), "deadline extended");
        Ok(Self::receipt(&rfq, entry, None))
    }

    /// Evaluates the competing quotes and persists scores and ranks.
    ///
    /// Re-running is idempotent; with no competing quotes the operation is
    /// a no-op returning an empty ranking.
    ///
    /// # Errors
    ///
    /// Returns authorization or concurrency errors.
    #[instrument(skip(self), fields(caller = %caller.caller_id, rfq = %rfq_id))]
    pub async fn evaluate_quotes(
        &self,
        caller: &CallerContext,
        rfq_id: RfqId,
    ) -> ApplicationResult<Vec<RankedQuote>> {
        let (_, ranking) = self
            .mutate(rfq_id, |rfq, now| {
                caller.authorize_buyer_of(rfq)?;
                let ranking = self.evaluator.evaluate(rfq);
                rfq.apply_evaluation(&ranking, now);
                Ok(ranking)
            })
            .await?;
        info!(evaluated = ranking.len(), "quotes evaluated");
        Ok(ranking)
    }

    /// Computes the current ranking without persisting anything.
    ///
    /// # Errors
    ///
    /// Returns authorization or repository errors.
    #[instrument(skip(self), fields(caller = %caller.caller_id, rfq = %rfq_id))]
    pub async fn get_ranking(
        &self,
        caller: &CallerContext,
        rfq_id: RfqId,
    ) -> ApplicationResult<Vec<RankedQuote>> {
        let rfq = self.load(rfq_id).await?;
        caller.authorize_buyer_of(&rfq)?;
        Ok(self.evaluator.evaluate(&rfq))
    }

    /// Awards the RFQ to a supplier's quote.
    ///
    /// One atomic write: the RFQ becomes awarded, the winning quote
    /// accepted, every other competing quote rejected.
    ///
    /// # Errors
    ///
    /// Returns authorization, state, or concurrency errors.
    #[instrument(skip(self), fields(caller = %caller.caller_id, rfq = %rfq_id, quote = %quote_id))]
    pub async fn award(
        &self,
        caller: &CallerContext,
        rfq_id: RfqId,
        supplier_id: SupplierId,
        quote_id: QuoteId,
    ) -> ApplicationResult<MutationReceipt> {
        let (rfq, entry) = self
            .mutate(rfq_id, |rfq, now| {
                caller.authorize_buyer_of(rfq)?;
                Ok(rfq.award(&caller.caller_id, &supplier_id, quote_id, now)?)
            })
            .await?;
        info!(number = %rfq.number(), supplier = %supplier_id, "rfq awarded");
        Ok(Self::receipt(&rfq, entry, Some(quote_id)))
    }

    // ------------------------------------------------------------------
    // Supplier operations
    // ------------------------------------------------------------------

    /// Submits a new quote for the calling supplier.
    ///
    /// The eligibility gate runs inside the write cycle, so it is
    /// re-checked against fresh state after every retry; two concurrent
    /// first submissions from one supplier yield exactly one success.
    ///
    /// # Errors
    ///
    /// Returns eligibility, validation, or concurrency errors.
    #[instrument(skip(self, submission), fields(caller = %caller.caller_id, rfq = %rfq_id))]
    pub async fn submit_quote(
        &self,
        caller: &CallerContext,
        rfq_id: RfqId,
        submission: QuoteSubmission,
    ) -> ApplicationResult<MutationReceipt> {
        let supplier_id = caller.authorize_supplier()?;
        submission.validate().map_err(ApplicationError::Validation)?;
        self.require_admitted(&supplier_id).await?;

        let (rfq, (quote_id, entry)) = self
            .mutate(rfq_id, |rfq, now| {
                EligibilityGate::can_submit(rfq, &supplier_id, now)?;
                let quote = Quote::submitted(
                    supplier_id.clone(),
                    submission.total_amount.clone(),
                    submission.valid_until,
                    submission.line_items.clone(),
                    now,
                );
                let quote_id = quote.id();
                let entry = rfq.submit_quote(quote, now)?;
                Ok((quote_id, entry))
            })
            .await?;
        info!(number = %rfq.number(), supplier = %supplier_id, "quote submitted");
        Ok(Self::receipt(&rfq, entry, Some(quote_id)))
    }

    /// Revises the calling supplier's quote, superseding the prior one in
    /// the same write.
    ///
    /// # Errors
    ///
    /// Returns eligibility, validation, or concurrency errors.
    #[instrument(skip(self, submission), fields(caller = %caller.caller_id, rfq = %rfq_id))]
    pub async fn revise_quote(
        &self,
        caller: &CallerContext,
        rfq_id: RfqId,
        submission: QuoteSubmission,
    ) -> ApplicationResult<MutationReceipt> {
        let supplier_id = caller.authorize_supplier()?;
        submission.validate().map_err(ApplicationError::Validation)?;
        self.require_admitted(&supplier_id).await?;

        let (rfq, (quote_id, entry)) = self
            .mutate(rfq_id, |rfq, now| {
                EligibilityGate::can_revise(rfq, &supplier_id, now)?;
                let revision = Quote::revision(
                    supplier_id.clone(),
                    submission.total_amount.clone(),
                    submission.valid_until,
                    submission.line_items.clone(),
                    now,
                );
                let quote_id = revision.id();
                let entry = rfq.revise_quote(revision, now)?;
                Ok((quote_id, entry))
            })
            .await?;
        info!(number = %rfq.number(), supplier = %supplier_id, "quote revised");
        Ok(Self::receipt(&rfq, entry, Some(quote_id)))
    }

    /// Withdraws the calling supplier's competing quote. The record stays
    /// in the ledger.
    ///
    /// # Errors
    ///
    /// Returns not-found, state, or concurrency errors.
    #[instrument(skip(self), fields(caller = %caller.caller_id, rfq = %rfq_id))]
    pub async fn withdraw_quote(
        &self,
        caller: &CallerContext,
        rfq_id: RfqId,
    ) -> ApplicationResult<MutationReceipt> {
        let supplier_id = caller.authorize_supplier()?;
        let (rfq, entry) = self
            .mutate(rfq_id, |rfq, now| Ok(rfq.withdraw_quote(&supplier_id, now)?))
            .await?;
        info!(number = %rfq.number(), supplier = %supplier_id, "quote withdrawn");
        Ok(Self::receipt(&rfq, entry, None))
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Fetches one RFQ, applying (and persisting) lazy expiry.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::RfqNotFound`], authorization, or
    /// repository errors.
    #[instrument(skip(self), fields(caller = %caller.caller_id, rfq = %rfq_id))]
    pub async fn get_rfq(&self, caller: &CallerContext, rfq_id: RfqId) -> ApplicationResult<Rfq> {
        let rfq = self.load(rfq_id).await?;
        caller.authorize_view_of(&rfq)?;
        Ok(rfq)
    }

    /// Lists a tenant's RFQs as slim views, newest number last.
    ///
    /// Expiry is reflected in the returned views; persisting it is left to
    /// the next write or targeted read.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    #[instrument(skip(self), fields(caller = %caller.caller_id))]
    pub async fn list_rfqs(&self, caller: &CallerContext) -> ApplicationResult<Vec<RfqView>> {
        let tenant_id = TenantId::new(caller.company_id.clone());
        let now = Timestamp::now();
        let rfqs = self.repository.find_by_tenant(&tenant_id).await?;
        Ok(rfqs
            .into_iter()
            .map(|mut rfq| {
                rfq.expire_if_due(now);
                RfqView::from(&rfq)
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn receipt(rfq: &Rfq, entry: ActivityEntry, quote_id: Option<QuoteId>) -> MutationReceipt {
        MutationReceipt {
            rfq_id: rfq.id(),
            version: rfq.version(),
            status: rfq.status(),
            quote_id,
            entry,
        }
    }

    async fn require_admitted(&self, supplier_id: &SupplierId) -> ApplicationResult<()> {
        match self.directory.status_of(supplier_id).await? {
            SupplierStatus::Active => Ok(()),
            SupplierStatus::Inactive => Err(ApplicationError::SupplierNotAdmitted(format!(
                "supplier {supplier_id} is deactivated"
            ))),
            SupplierStatus::Unknown => Err(ApplicationError::SupplierNotAdmitted(format!(
                "supplier {supplier_id} is not registered"
            ))),
        }
    }

    /// Reads an aggregate, persisting lazy expiry when it applies.
    async fn load(&self, rfq_id: RfqId) -> ApplicationResult<Rfq> {
        let mut rfq = self
            .repository
            .get(rfq_id)
            .await?
            .ok_or_else(|| ApplicationError::RfqNotFound(rfq_id.to_string()))?;
        let read_version = rfq.version();
        if rfq.expire_if_due(Timestamp::now()).is_some() {
            // Best effort: a lost race means another writer already
            // observed the expiry.
            if let Err(error) = self.repository.update(&rfq, read_version).await {
                warn!(%rfq_id, %error, "could not persist lazy expiry");
            }
        }
        Ok(rfq)
    }

    /// The optimistic write cycle shared by every mutation.
    async fn mutate<R, F>(&self, rfq_id: RfqId, op: F) -> ApplicationResult<(Rfq, R)>
    where
        F: Fn(&mut Rfq, Timestamp) -> ApplicationResult<R>,
    {
        let op = &op;
        let result = execute_with_retry(&self.retry_policy, move || async move {
            let now = Timestamp::now();
            let mut rfq = self
                .repository
                .get(rfq_id)
                .await?
                .ok_or_else(|| ApplicationError::RfqNotFound(rfq_id.to_string()))?;
            let read_version = rfq.version();
            let expired = rfq.expire_if_due(now).is_some();

            match op(&mut rfq, now) {
                Ok(value) => {
                    rfq.validate()?;
                    self.repository.update(&rfq, read_version).await?;
                    Ok((rfq, value))
                }
                Err(error) => {
                    if expired {
                        // The operation was rejected but the expiry it
                        // observed is real; persist it best effort.
                        if let Err(persist_error) =
                            self.repository.update(&rfq, read_version).await
                        {
                            warn!(%rfq_id, %persist_error, "could not persist lazy expiry");
                        }
                    }
                    Err(error)
                }
            }
        })
        .await;
        result.map_err(Self::unwrap_retry)
    }

    fn unwrap_retry(error: RetryError<ApplicationError>) -> ApplicationError {
        let attempts = error.attempts();
        if error.is_max_retries_exceeded() {
            warn!(attempts, "write retries exhausted");
            ApplicationError::ConcurrencyConflict { attempts }
        } else {
            error.into_inner()
        }
    }
}
