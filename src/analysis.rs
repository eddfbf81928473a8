//! Combined financial analysis: ROI, depreciation, TCO and a health score

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::depreciation::DepreciationResult;
use crate::roi::RoiResult;

/// Options for the combined financial analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Annual discount rate handed to the ROI side
    pub discount_rate: f64,
    /// Horizon the benefits accrue over
    pub time_horizon_months: u32,
    /// Declared monthly benefit; estimated heuristically when absent
    pub monthly_benefit: Option<f64>,
    /// Annual rate for the declining-balance view
    pub declining_balance_rate: f64,
    /// Salvage value as a share of purchase cost
    pub salvage_value_percent: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            discount_rate: 0.08,
            time_horizon_months: 36,
            monthly_benefit: None,
            declining_balance_rate: 0.20,
            salvage_value_percent: 0.10,
        }
    }
}

/// Combined financial report for one asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialAnalysisReport {
    /// Asset the report covers
    pub asset_id: Uuid,
    /// When the report was computed
    pub generated_at: DateTime<Utc>,
    /// Comprehensive return on investment
    pub roi: RoiResult,
    /// Straight-line depreciation view
    pub straight_line: DepreciationResult,
    /// Declining-balance depreciation view
    pub declining_balance: DepreciationResult,
    /// Sum of all booked cost records
    pub acquisition_cost: f64,
    /// Sum of operational ledger totals
    pub operational_cost: f64,
    /// Acquisition plus operational spend
    pub total_cost_of_ownership: f64,
    /// Useful life minus elapsed months; negative when overrun
    pub remaining_life_months: i64,
    /// Composite score in [0, 100]
    pub financial_health_score: f64,
    /// Strategic recommendations, empty when nothing stands out
    pub recommendations: Vec<String>,
}

/// Composite health score from ROI and remaining book value
///
/// Starts at 50, adds the ROI tier (up to +30, −20 for negative returns),
/// adjusts ±10 on the remaining book-value ratio and clamps to [0, 100].
pub fn health_score(roi_percent: f64, book_value_ratio: f64) -> f64 {
    let mut score: f64 = 50.0;

    score += if roi_percent > 20.0 {
        30.0
    } else if roi_percent > 10.0 {
        20.0
    } else if roi_percent > 0.0 {
        10.0
    } else {
        -20.0
    };

    if book_value_ratio > 0.5 {
        score += 10.0;
    } else if book_value_ratio < 0.2 {
        score -= 10.0;
    }

    score.clamp(0.0, 100.0)
}

/// Strategic recommendations from the combined figures
pub fn recommendations(roi_percent: f64, remaining_life_months: i64) -> Vec<String> {
    let mut out = Vec::new();
    if roi_percent < 0.0 {
        out.push(
            "Return on investment is negative; review whether the asset should be replaced or retired"
                .to_string(),
        );
    }
    if remaining_life_months < 12 {
        out.push(
            "Less than 12 months of useful life remain; budget the replacement into the next planning cycle"
                .to_string(),
        );
    }
    out
}
