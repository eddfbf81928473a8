//! Type definitions for lifecycle planning

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle stage of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    /// Early in its replacement cycle
    New,
    /// Well inside the cycle
    Mature,
    /// Approaching the end of the cycle
    Aging,
    /// At or past the end of the cycle, or past internal EOL
    Critical,
    /// No lifecycle record exists for the asset
    Unknown,
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleStage::New => write!(f, "new"),
            LifecycleStage::Mature => write!(f, "mature"),
            LifecycleStage::Aging => write!(f, "aging"),
            LifecycleStage::Critical => write!(f, "critical"),
            LifecycleStage::Unknown => write!(f, "unknown"),
        }
    }
}

/// Replacement urgency, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementPriority {
    /// No urgency
    Low,
    /// Worth tracking
    Medium,
    /// Replacement cycle nearly complete
    High,
    /// Cycle overrun
    Critical,
}

/// Per-asset lifecycle assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetLifecycle {
    /// Asset being assessed
    pub asset_id: Uuid,
    /// Age in whole months at the as-of date
    pub age_months: i64,
    /// Effective replacement cycle length
    pub cycle_months: u32,
    /// Age divided by cycle length
    pub progress: f64,
    /// Stage classification
    pub stage: LifecycleStage,
    /// Action the progress figure calls for
    pub recommended_action: String,
}

/// Replacement risk score for one asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacementRisk {
    /// Asset being scored
    pub asset_id: Uuid,
    /// Combined score, capped at 1.0
    pub risk_score: f64,
    /// Contribution from cycle progress (up to 0.4)
    pub age_risk: f64,
    /// Contribution from warranty expiry (up to 0.3)
    pub warranty_risk: f64,
    /// Contribution from manufacturer EOL (up to 0.4)
    pub eol_risk: f64,
}

/// One planned replacement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacementScheduleEntry {
    /// Asset to replace
    pub asset_id: Uuid,
    /// Age in whole months at the as-of date
    pub current_age_months: i64,
    /// Projected replacement date
    pub replacement_date: NaiveDate,
    /// Estimated replacement cost
    pub estimated_cost: f64,
    /// Urgency of the replacement
    pub priority: ReplacementPriority,
    /// Budget year the replacement date falls in
    pub budget_year: i32,
    /// Budget quarter the replacement date falls in (1-4)
    pub budget_quarter: u8,
}

/// Lifecycle planning request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecyclePlanRequest {
    /// How far ahead the schedule reaches
    pub planning_horizon_months: u32,
    /// Progress at which an asset enters the schedule
    pub replacement_threshold: f64,
    /// Include the per-asset risk section
    pub include_risk_assessment: bool,
}

impl Default for LifecyclePlanRequest {
    fn default() -> Self {
        Self {
            planning_horizon_months: 36,
            replacement_threshold: 0.8,
            include_risk_assessment: true,
        }
    }
}

/// Fleet lifecycle plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecyclePlan {
    /// Date the plan was computed against
    pub as_of: NaiveDate,
    /// Assessment for every asset with a lifecycle record
    pub assets: Vec<AssetLifecycle>,
    /// Assets whose risk score exceeds the reporting threshold
    pub risks: Vec<ReplacementRisk>,
    /// Replacements due within the planning horizon, most urgent first
    pub schedule: Vec<ReplacementScheduleEntry>,
}
