use serde::{Deserialize, Serialize};

use super::super::domain::{Customer, LoanProposal};
use super::super::finance::{self, InvalidInput};
use super::config::PolicyConfig;

/// Why a proposal was turned down. A rejection is a normal business outcome,
/// not a fault; faults surface as [`InvalidInput`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectionReason {
    CreditScoreTooLow {
        score: u8,
        minimum: u8,
    },
    ExceedsApprovedLimit {
        current_debt: f64,
        requested: f64,
        approved_limit: f64,
    },
    InstallmentUnaffordable {
        installment: f64,
        cap: f64,
    },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::CreditScoreTooLow { score, minimum } => {
                format!("credit score too low ({score} below minimum {minimum})")
            }
            RejectionReason::ExceedsApprovedLimit {
                current_debt,
                requested,
                approved_limit,
            } => format!(
                "exceeds approved credit limit ({current_debt:.2} outstanding + {requested:.2} requested > {approved_limit:.2})"
            ),
            RejectionReason::InstallmentUnaffordable { installment, cap } => {
                format!("EMI exceeds 50% of monthly salary ({installment:.2} > {cap:.2})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PolicyOutcome {
    pub approved: bool,
    pub corrected_rate: f64,
    pub monthly_installment: f64,
    pub rejection: Option<RejectionReason>,
}

/// Apply the tiered eligibility rules in precedence order.
///
/// The debt-limit and affordability checks are hard caps that override any
/// score-tier approval.
pub(crate) fn evaluate(
    customer: &Customer,
    proposal: &LoanProposal,
    score: u8,
    config: &PolicyConfig,
) -> Result<PolicyOutcome, InvalidInput> {
    if score < config.minimum_eligible_score {
        let installment =
            finance::monthly_installment(proposal.amount, proposal.annual_rate, proposal.tenure_months)?;
        return Ok(PolicyOutcome {
            approved: false,
            corrected_rate: proposal.annual_rate,
            monthly_installment: installment,
            rejection: Some(RejectionReason::CreditScoreTooLow {
                score,
                minimum: config.minimum_eligible_score,
            }),
        });
    }

    if customer.current_debt + proposal.amount > customer.approved_limit {
        let installment =
            finance::monthly_installment(proposal.amount, proposal.annual_rate, proposal.tenure_months)?;
        return Ok(PolicyOutcome {
            approved: false,
            corrected_rate: proposal.annual_rate,
            monthly_installment: installment,
            rejection: Some(RejectionReason::ExceedsApprovedLimit {
                current_debt: customer.current_debt,
                requested: proposal.amount,
                approved_limit: customer.approved_limit,
            }),
        });
    }

    let corrected_rate = corrected_rate(score, proposal.annual_rate, config);
    let installment =
        finance::monthly_installment(proposal.amount, corrected_rate, proposal.tenure_months)?;

    let cap = config.affordability_ratio * customer.monthly_salary;
    if installment > cap {
        return Ok(PolicyOutcome {
            approved: false,
            corrected_rate,
            monthly_installment: installment,
            rejection: Some(RejectionReason::InstallmentUnaffordable { installment, cap }),
        });
    }

    Ok(PolicyOutcome {
        approved: true,
        corrected_rate,
        monthly_installment: installment,
        rejection: None,
    })
}

/// Rate floor by score tier. Callers must have already rejected scores below
/// the eligibility minimum.
pub(crate) fn corrected_rate(score: u8, proposed_rate: f64, config: &PolicyConfig) -> f64 {
    if score > config.prime_score_cutoff {
        proposed_rate
    } else if score >= config.mid_tier_floor_score {
        proposed_rate.max(config.mid_tier_minimum_rate)
    } else {
        proposed_rate.max(config.entry_tier_minimum_rate)
    }
}
