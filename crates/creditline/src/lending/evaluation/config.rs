use serde::{Deserialize, Serialize};

/// Policy dials for the eligibility rules, kept explicit so the tiers and
/// caps can change without code edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Scores strictly below this are rejected outright.
    pub minimum_eligible_score: u8,
    /// Lower bound (inclusive) of the middle tier.
    pub mid_tier_floor_score: u8,
    /// Scores strictly above this carry no rate floor.
    pub prime_score_cutoff: u8,
    /// Rate floor applied in the middle tier, percent per annum.
    pub mid_tier_minimum_rate: f64,
    /// Rate floor applied in the entry tier, percent per annum.
    pub entry_tier_minimum_rate: f64,
    /// Fraction of monthly salary the installment may not exceed.
    pub affordability_ratio: f64,
    /// Approved-volume bucket boundary awarding 15 points at or below it.
    pub small_volume_ceiling: f64,
    /// Approved-volume bucket boundary awarding 20 points at or below it.
    pub large_volume_ceiling: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            minimum_eligible_score: 10,
            mid_tier_floor_score: 30,
            prime_score_cutoff: 50,
            mid_tier_minimum_rate: 12.0,
            entry_tier_minimum_rate: 16.0,
            affordability_ratio: 0.5,
            small_volume_ceiling: 1_000_000.0,
            large_volume_ceiling: 5_000_000.0,
        }
    }
}
