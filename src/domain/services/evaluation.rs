//! # Evaluation Engine
//!
//! Scores and ranks the competing quotes of an RFQ.
//!
//! The engine is a pure function over the aggregate: it never mutates the
//! RFQ, so evaluation is idempotent and safe to recompute at any time. The
//! price sub-score comes from min/max normalization of quoted totals; the
//! other criteria are pluggable [`CriterionScorer`]s that default to a
//! neutral score when no signal is available. Each sub-score is weighted by
//! the RFQ's selection criteria, and the composite is guaranteed to stay in
//! `[0, 100]`.

use crate::domain::entities::quote::Quote;
use crate::domain::entities::rfq::Rfq;
use crate::domain::value_objects::criteria::{Criterion, WEIGHT_TOTAL};
use crate::domain::value_objects::ids::{QuoteId, SupplierId};
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Sub-score assigned to a criterion with no scorer signal.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// One criterion's contribution to a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    /// The criterion.
    pub criterion: Criterion,
    /// Sub-score in `[0, 100]`.
    pub score: f64,
    /// Weight applied, in percent.
    pub weight: u8,
}

/// A quote's evaluation result.
///
/// `score` is the unrounded composite the ranking was computed on; display
/// rounding happens when the result is written back onto the quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedQuote {
    /// The evaluated quote.
    pub quote_id: QuoteId,
    /// The quoting supplier.
    pub supplier_id: SupplierId,
    /// Unrounded composite score in `[0, 100]`.
    pub score: f64,
    /// Rank, 1 = best.
    pub rank: u32,
    /// Per-criterion breakdown.
    pub breakdown: Vec<CriterionScore>,
}

impl RankedQuote {
    /// Returns true if this quote won the evaluation.
    #[must_use]
    pub const fn is_best(&self) -> bool {
        self.rank == 1
    }
}

impl fmt::Display for RankedQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RankedQuote(#{} score={:.4} quote={} supplier={})",
            self.rank, self.score, self.quote_id, self.supplier_id
        )
    }
}

/// Pluggable sub-score source for one non-price criterion.
///
/// Returning `None` means the scorer has no signal for this quote; the
/// engine substitutes [`NEUTRAL_SCORE`]. Returned values are clamped to
/// `[0, 100]`.
pub trait CriterionScorer: Send + Sync + fmt::Debug {
    /// The criterion this scorer covers.
    fn criterion(&self) -> Criterion;

    /// Scores one quote in the context of its RFQ.
    fn score(&self, rfq: &Rfq, quote: &Quote) -> Option<f64>;
}

/// The quote evaluation engine.
///
/// Holds the registered non-price scorers; price is always computed
/// internally from the quoted totals. The default engine has no scorers,
/// so every non-price criterion scores neutral.
#[derive(Debug, Default)]
pub struct EvaluationEngine {
    scorers: Vec<Box<dyn CriterionScorer>>,
}

impl EvaluationEngine {
    /// Creates an engine with no registered scorers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scorer for a non-price criterion.
    ///
    /// A scorer registered for [`Criterion::Price`] is ignored; the price
    /// sub-score is always derived from the quoted totals.
    #[must_use]
    pub fn with_scorer(mut self, scorer: Box<dyn CriterionScorer>) -> Self {
        if scorer.criterion() != Criterion::Price {
            self.scorers.push(scorer);
        }
        self
    }

    /// Evaluates the RFQ's competing quotes, returning them ranked best
    /// first. Returns an empty vector when no quote is competing.
    #[must_use]
    pub fn evaluate(&self, rfq: &Rfq) -> Vec<RankedQuote> {
        let competing: Vec<&Quote> = rfq.competing_quotes().collect();
        if competing.is_empty() {
            return Vec::new();
        }

        let amounts: Vec<f64> = competing.iter().map(|q| Self::amount_of(q)).collect();
        let min = amounts.iter().copied().fold(f64::INFINITY, f64::min);
        let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut results: Vec<RankedQuote> = competing
            .iter()
            .zip(amounts.iter())
            .map(|(quote, &amount)| {
                let breakdown = self.breakdown_for(rfq, quote, amount, min, max);
                let score = breakdown
                    .iter()
                    .map(|c| c.score * f64::from(c.weight) / f64::from(WEIGHT_TOTAL))
                    .sum::<f64>()
                    .clamp(0.0, 100.0);
                RankedQuote {
                    quote_id: quote.id(),
                    supplier_id: quote.supplier_id().clone(),
                    score,
                    rank: 0,
                    breakdown,
                }
            })
            .collect();

        // Descending score; ties go to the earlier submission, then to the
        // lexicographically smaller supplier id so ordering is total.
        let order_key: Vec<(QuoteId, Timestamp)> = competing
            .iter()
            .map(|q| (q.id(), q.submitted_at()))
            .collect();
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    let at_a = order_key.iter().find(|(id, _)| *id == a.quote_id);
                    let at_b = order_key.iter().find(|(id, _)| *id == b.quote_id);
                    at_a.map(|(_, t)| t).cmp(&at_b.map(|(_, t)| t))
                })
                .then_with(|| a.supplier_id.cmp(&b.supplier_id))
        });
        for (index, ranked) in results.iter_mut().enumerate() {
            ranked.rank = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
        }
        results
    }

    /// Price sub-score: 100 when all totals are equal, otherwise the
    /// cheapest quote gets 100 and the dearest 0, linearly in between.
    fn price_score(amount: f64, min: f64, max: f64) -> f64 {
        if (max - min).abs() < f64::EPSILON {
            100.0
        } else {
            (100.0 * (max - amount) / (max - min)).clamp(0.0, 100.0)
        }
    }

    fn amount_of(quote: &Quote) -> f64 {
        quote.total_amount().to_f64()
    }

    fn breakdown_for(
        &self,
        rfq: &Rfq,
        quote: &Quote,
        amount: f64,
        min: f64,
        max: f64,
    ) -> Vec<CriterionScore> {
        Criterion::ALL
            .iter()
            .map(|&criterion| {
                let score = if criterion == Criterion::Price {
                    Self::price_score(amount, min, max)
                } else {
                    self.scorers
                        .iter()
                        .find(|s| s.criterion() == criterion)
                        .and_then(|s| s.score(rfq, quote))
                        .map_or(NEUTRAL_SCORE, |s| s.clamp(0.0, 100.0))
                };
                CriterionScore {
                    criterion,
                    score,
                    weight: rfq.criteria().weight(criterion),
                }
            })
            .collect()
    }
}
