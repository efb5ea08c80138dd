//! Present-value arithmetic shared by the decision engine and registration.

/// Longest tenure the amortization math is specified for.
pub const MAX_TENURE_MONTHS: u32 = 360;

/// One lakh, the rounding unit for approved credit limits.
pub const LAKH: f64 = 100_000.0;

/// Caller contract violations on the numeric inputs to the financial math.
///
/// These propagate immediately and abort the evaluation; they are never
/// clamped and never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("principal must be greater than 0, got {0}")]
    NonPositivePrincipal(f64),
    #[error("tenure must be at least one month")]
    ZeroTenure,
    #[error("tenure must not exceed {MAX_TENURE_MONTHS} months, got {0}")]
    TenureTooLong(u32),
    #[error("interest rate must not be negative, got {0}")]
    NegativeRate(f64),
    #[error("interest rate must not exceed 100 percent, got {0}")]
    RateAboveCeiling(f64),
}

/// Round to two decimal places, half-up, for currency display.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Equated monthly installment for an amortized loan.
///
/// `EMI = P * r * (1+r)^n / ((1+r)^n - 1)` with `r` the monthly compounding
/// rate derived from the annual percentage. A zero rate degenerates to
/// straight-line repayment.
pub fn monthly_installment(
    principal: f64,
    annual_rate_percent: f64,
    tenure_months: u32,
) -> Result<f64, InvalidInput> {
    validate_terms(principal, annual_rate_percent, tenure_months)?;

    if annual_rate_percent == 0.0 {
        return Ok(round_currency(principal / tenure_months as f64));
    }

    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    let growth = (1.0 + monthly_rate).powi(tenure_months as i32);
    let emi = principal * monthly_rate * growth / (growth - 1.0);

    Ok(round_currency(emi))
}

/// Validate the numeric terms of a proposal before any computation runs.
pub fn validate_terms(
    principal: f64,
    annual_rate_percent: f64,
    tenure_months: u32,
) -> Result<(), InvalidInput> {
    if !(principal > 0.0) {
        return Err(InvalidInput::NonPositivePrincipal(principal));
    }
    if tenure_months == 0 {
        return Err(InvalidInput::ZeroTenure);
    }
    if tenure_months > MAX_TENURE_MONTHS {
        return Err(InvalidInput::TenureTooLong(tenure_months));
    }
    if annual_rate_percent < 0.0 {
        return Err(InvalidInput::NegativeRate(annual_rate_percent));
    }
    if annual_rate_percent > 100.0 {
        return Err(InvalidInput::RateAboveCeiling(annual_rate_percent));
    }
    Ok(())
}

/// Approved credit limit assigned at registration: 36x monthly income,
/// rounded to the nearest lakh.
pub fn approved_limit(monthly_income: f64) -> f64 {
    (36.0 * monthly_income / LAKH).round() * LAKH
}
