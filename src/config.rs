//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::budget::AllocationPolicy;

/// Tunable defaults for the analytics engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Proportional markup applied to budget recommendations
    pub risk_buffer: f64,
    /// Lifecycle progress at which replacement scheduling starts
    pub replacement_threshold: f64,
    /// Monthly benefit heuristic as a share of the initial investment
    pub monthly_benefit_rate: f64,
    /// Annual declining-balance depreciation rate
    pub declining_balance_rate: f64,
    /// Salvage value as a share of purchase cost
    pub salvage_value_percent: f64,
    /// Cost-type to budget-category mapping
    pub allocation_policy: AllocationPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk_buffer: 0.10,
            replacement_threshold: 0.8,
            monthly_benefit_rate: 0.02,
            declining_balance_rate: 0.20,
            salvage_value_percent: 0.10,
            allocation_policy: AllocationPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_rates() {
        let config = EngineConfig::default();
        assert_eq!(config.risk_buffer, 0.10);
        assert_eq!(config.replacement_threshold, 0.8);
        assert_eq!(config.monthly_benefit_rate, 0.02);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.salvage_value_percent, config.salvage_value_percent);
    }
}
