mod config;
pub(crate) mod policy;
pub(crate) mod scoring;

pub use config::PolicyConfig;
pub use policy::RejectionReason;
pub use scoring::ScoreBreakdown;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Customer, HistoricalLoan, LoanProposal};
use super::finance::{self, InvalidInput};

/// Stateless decision engine: a pure function of the customer snapshot, the
/// loan ledger, and the proposal, parameterized by [`PolicyConfig`].
pub struct DecisionEngine {
    config: PolicyConfig,
}

impl DecisionEngine {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Derive the four-component creditworthiness score from the ledger.
    /// `as_of` fixes the evaluation year so scoring stays deterministic.
    pub fn score(&self, history: &[HistoricalLoan], as_of: NaiveDate) -> ScoreBreakdown {
        scoring::score_history(history, &self.config, as_of)
    }

    /// Run the full pipeline: score, tiered policy, installment at the
    /// corrected rate, final payload. Side-effect free; persisting an
    /// approved loan (and the debt increment) is the caller's job.
    pub fn decide(
        &self,
        customer: &Customer,
        history: &[HistoricalLoan],
        proposal: &LoanProposal,
        as_of: NaiveDate,
    ) -> Result<LoanDecision, InvalidInput> {
        finance::validate_terms(proposal.amount, proposal.annual_rate, proposal.tenure_months)?;

        let breakdown = self.score(history, as_of);
        let score = breakdown.total();
        let outcome = policy::evaluate(customer, proposal, score, &self.config)?;

        Ok(LoanDecision {
            approved: outcome.approved,
            credit_score: score,
            score_breakdown: breakdown,
            requested_rate: proposal.annual_rate,
            corrected_rate: outcome.corrected_rate,
            tenure_months: proposal.tenure_months,
            monthly_installment: outcome.monthly_installment,
            rejection: outcome.rejection,
        })
    }
}

/// Final decision payload for one evaluation. Owned by the call that
/// produced it; becomes a persisted loan only if the caller materializes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDecision {
    pub approved: bool,
    pub credit_score: u8,
    pub score_breakdown: ScoreBreakdown,
    pub requested_rate: f64,
    pub corrected_rate: f64,
    pub tenure_months: u32,
    pub monthly_installment: f64,
    pub rejection: Option<RejectionReason>,
}

impl LoanDecision {
    pub fn summary(&self) -> String {
        match &self.rejection {
            None => format!(
                "approved at {:.2}% for {} months, installment {:.2}",
                self.corrected_rate, self.tenure_months, self.monthly_installment
            ),
            Some(reason) => reason.summary(),
        }
    }
}
