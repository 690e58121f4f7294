//! # Domain Services
//!
//! Pure, stateless services over the RFQ aggregate: the eligibility gate
//! and the quote evaluation engine.

pub mod eligibility;
pub mod evaluation;

pub use eligibility::EligibilityGate;
pub use evaluation::{CriterionScore, CriterionScorer, EvaluationEngine, RankedQuote, NEUTRAL_SCORE};
