//! Return-on-investment calculations

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::history::round_currency;

/// ROI methodology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoiMethod {
    /// Net benefit against the initial investment
    Simple,
    /// Return over all cost components with a monthly figure
    Comprehensive,
    /// Net present value at a stated discount rate
    Npv,
}

impl std::fmt::Display for RoiMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoiMethod::Simple => write!(f, "simple"),
            RoiMethod::Comprehensive => write!(f, "comprehensive"),
            RoiMethod::Npv => write!(f, "npv"),
        }
    }
}

/// ROI calculation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiRequest {
    /// Methodology to apply
    pub method: RoiMethod,
    /// Annual discount rate for the NPV method
    pub discount_rate: f64,
    /// Horizon the benefits accrue over
    pub time_horizon_months: u32,
    /// Declared monthly benefit; estimated heuristically when absent
    pub monthly_benefit: Option<f64>,
}

impl Default for RoiRequest {
    fn default() -> Self {
        Self {
            method: RoiMethod::Comprehensive,
            discount_rate: 0.08,
            time_horizon_months: 36,
            monthly_benefit: None,
        }
    }
}

/// Assembled inputs for a ROI calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoiInputs {
    /// Sum of purchase cost records
    pub initial_investment: f64,
    /// Sum of non-purchase cost records
    pub ongoing_costs: f64,
    /// Sum of operational ledger totals
    pub operational_costs: f64,
    /// Benefits over the horizon, declared or estimated
    pub total_benefits: f64,
    /// Expected useful life of the asset
    pub useful_life_months: u32,
    /// Whether the benefit figure came from the heuristic
    pub benefits_estimated: bool,
}

/// ROI calculation output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiResult {
    /// Methodology applied
    pub method: RoiMethod,
    /// Return as a percentage
    pub roi_percent: f64,
    /// Benefits minus all undiscounted costs
    pub net_benefit: f64,
    /// All undiscounted costs
    pub total_costs: f64,
    /// Months until benefits repay the initial investment (simple method)
    pub payback_months: Option<f64>,
    /// Return per month of useful life (comprehensive method)
    pub monthly_roi_percent: Option<f64>,
    /// Net present value (NPV method)
    pub npv: Option<f64>,
    /// Whether the benefit figure came from the heuristic
    pub benefits_estimated: bool,
    /// Assumptions the caller should know about
    pub assumptions: Vec<String>,
}

/// Compute ROI with the requested method
pub fn calculate(inputs: &RoiInputs, request: &RoiRequest) -> AnalyticsResult<RoiResult> {
    if inputs.initial_investment <= 0.0 {
        return Err(AnalyticsError::invalid(
            "initial_investment",
            "must be positive",
        ));
    }
    if inputs.useful_life_months == 0 {
        return Err(AnalyticsError::invalid(
            "useful_life_months",
            "must cover at least one month",
        ));
    }
    if request.time_horizon_months == 0 {
        return Err(AnalyticsError::invalid(
            "time_horizon_months",
            "must cover at least one month",
        ));
    }
    if !request.discount_rate.is_finite() || request.discount_rate < 0.0 {
        return Err(AnalyticsError::invalid(
            "discount_rate",
            "must be a non-negative decimal rate",
        ));
    }

    let mut result = match request.method {
        RoiMethod::Simple => simple(inputs),
        RoiMethod::Comprehensive => comprehensive(inputs),
        RoiMethod::Npv => npv(inputs, request),
    };

    if inputs.benefits_estimated {
        result.assumptions.push(
            "benefits estimated at 2% of the initial investment per month; supply a measured figure for high-stakes decisions"
                .to_string(),
        );
    }
    Ok(result)
}

fn simple(inputs: &RoiInputs) -> RoiResult {
    let net_benefit = inputs.total_benefits - inputs.ongoing_costs;
    let roi_percent =
        (net_benefit - inputs.initial_investment) / inputs.initial_investment * 100.0;
    let payback_months = if inputs.total_benefits > 0.0 {
        Some(inputs.initial_investment / (inputs.total_benefits / 12.0))
    } else {
        None
    };

    RoiResult {
        method: RoiMethod::Simple,
        roi_percent: round_currency(roi_percent),
        net_benefit: round_currency(net_benefit),
        total_costs: round_currency(inputs.initial_investment + inputs.ongoing_costs),
        payback_months: payback_months.map(round_currency),
        monthly_roi_percent: None,
        npv: None,
        benefits_estimated: inputs.benefits_estimated,
        assumptions: Vec::new(),
    }
}

fn comprehensive(inputs: &RoiInputs) -> RoiResult {
    let total_costs =
        inputs.initial_investment + inputs.ongoing_costs + inputs.operational_costs;
    let roi_percent = (inputs.total_benefits - total_costs) / total_costs * 100.0;
    let monthly_roi = roi_percent / inputs.useful_life_months as f64;

    RoiResult {
        method: RoiMethod::Comprehensive,
        roi_percent: round_currency(roi_percent),
        net_benefit: round_currency(inputs.total_benefits - total_costs),
        total_costs: round_currency(total_costs),
        payback_months: None,
        monthly_roi_percent: Some(round_currency(monthly_roi)),
        npv: None,
        benefits_estimated: inputs.benefits_estimated,
        assumptions: Vec::new(),
    }
}

fn npv(inputs: &RoiInputs, request: &RoiRequest) -> RoiResult {
    let horizon = request.time_horizon_months;
    let monthly_rate = request.discount_rate / 12.0;
    let monthly_benefit = inputs.total_benefits / horizon as f64;
    let monthly_cost = (inputs.ongoing_costs + inputs.operational_costs) / horizon as f64;

    let mut pv_benefits = 0.0;
    let mut pv_cost_stream = 0.0;
    for month in 1..=horizon {
        let discount = (1.0 + monthly_rate).powi(month as i32);
        pv_benefits += monthly_benefit / discount;
        pv_cost_stream += monthly_cost / discount;
    }

    let pv_costs = inputs.initial_investment + pv_cost_stream;
    let npv = pv_benefits - pv_costs;
    let roi_percent = npv / pv_costs * 100.0;
    let total_costs =
        inputs.initial_investment + inputs.ongoing_costs + inputs.operational_costs;

    RoiResult {
        method: RoiMethod::Npv,
        roi_percent: round_currency(roi_percent),
        net_benefit: round_currency(inputs.total_benefits - total_costs),
        total_costs: round_currency(total_costs),
        payback_months: None,
        monthly_roi_percent: None,
        npv: Some(round_currency(npv)),
        benefits_estimated: inputs.benefits_estimated,
        assumptions: Vec::new(),
    }
}
