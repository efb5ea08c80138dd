use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::super::domain::HistoricalLoan;
use super::config::PolicyConfig;

const ON_TIME_MAX_POINTS: f64 = 40.0;

/// The four bucketed sub-scores that sum to the 0-100 creditworthiness total.
///
/// Recomputed per request from the customer's full loan history; never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub on_time_payment: u8,
    pub loan_count: u8,
    pub current_year_activity: u8,
    pub approved_volume: u8,
}

impl ScoreBreakdown {
    /// Sum of the four components, clamped to 100.
    pub fn total(&self) -> u8 {
        let sum = self.on_time_payment as u16
            + self.loan_count as u16
            + self.current_year_activity as u16
            + self.approved_volume as u16;
        sum.min(100) as u8
    }
}

pub(crate) fn score_history(
    history: &[HistoricalLoan],
    config: &PolicyConfig,
    as_of: NaiveDate,
) -> ScoreBreakdown {
    ScoreBreakdown {
        on_time_payment: on_time_payment_points(history),
        loan_count: loan_count_points(history),
        current_year_activity: current_year_activity_points(history, as_of.year()),
        approved_volume: approved_volume_points(history, config),
    }
}

/// On-time repayment component, max 40: the ratio of EMIs paid on schedule
/// to total scheduled EMIs across the whole ledger. No history scores zero.
pub(crate) fn on_time_payment_points(history: &[HistoricalLoan]) -> u8 {
    let scheduled: u32 = history.iter().map(|loan| loan.tenure).sum();
    if scheduled == 0 {
        return 0;
    }

    let on_time: u32 = history.iter().map(|loan| loan.emis_paid_on_time).sum();
    let ratio = on_time as f64 / scheduled as f64;
    (ratio * ON_TIME_MAX_POINTS).round().min(ON_TIME_MAX_POINTS) as u8
}

/// Loan-count component, max 20, bucketed by how many loans were ever taken.
pub(crate) fn loan_count_points(history: &[HistoricalLoan]) -> u8 {
    match history.len() {
        0 => 10,
        1..=3 => 20,
        4..=5 => 15,
        _ => 10,
    }
}

/// Current-year-activity component, max 20, bucketed by the number of loans
/// started in the evaluation year.
pub(crate) fn current_year_activity_points(history: &[HistoricalLoan], year: i32) -> u8 {
    let started_this_year = history
        .iter()
        .filter(|loan| loan.start_date.year() == year)
        .count();

    match started_this_year {
        0 => 10,
        1 => 20,
        _ => 15,
    }
}

/// Approved-volume component, max 20, bucketed by total principal ever
/// approved. Boundaries are inclusive on the lower bound of each bucket.
pub(crate) fn approved_volume_points(history: &[HistoricalLoan], config: &PolicyConfig) -> u8 {
    let volume: f64 = history.iter().map(|loan| loan.amount).sum();

    if volume <= 0.0 {
        10
    } else if volume <= config.small_volume_ceiling {
        15
    } else if volume <= config.large_volume_ceiling {
        20
    } else {
        18
    }
}
