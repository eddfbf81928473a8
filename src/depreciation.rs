//! Depreciation calculations: straight-line, declining-balance and
//! sum-of-years-digits, plus a forward schedule projector

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::history::{add_months, month_label, round_currency};

/// Depreciation methodology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    /// Equal monthly write-down of the depreciable amount
    StraightLine,
    /// Fixed rate applied to the declining book value
    DecliningBalance,
    /// Year weights proportional to remaining life
    SumOfYearsDigits,
}

impl std::fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepreciationMethod::StraightLine => write!(f, "straight-line"),
            DepreciationMethod::DecliningBalance => write!(f, "declining-balance"),
            DepreciationMethod::SumOfYearsDigits => write!(f, "sum-of-years-digits"),
        }
    }
}

/// Depreciation calculation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationRequest {
    /// Methods to compute, in the order the results are returned
    pub methods: Vec<DepreciationMethod>,
    /// Annual rate for the declining-balance method
    pub declining_balance_rate: f64,
    /// Salvage value as a share of purchase cost
    pub salvage_value_percent: f64,
}

impl Default for DepreciationRequest {
    fn default() -> Self {
        Self {
            methods: vec![DepreciationMethod::StraightLine],
            declining_balance_rate: 0.20,
            salvage_value_percent: 0.10,
        }
    }
}

/// Assembled inputs for a depreciation calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DepreciationInputs {
    /// Original purchase cost
    pub purchase_cost: f64,
    /// Residual value at end of life
    pub salvage_value: f64,
    /// Expected useful life
    pub useful_life_months: u32,
    /// Whole months since purchase
    pub months_elapsed: u32,
}

impl DepreciationInputs {
    /// Purchase cost minus salvage value
    pub fn depreciable_amount(&self) -> f64 {
        self.purchase_cost - self.salvage_value
    }
}

/// Result of one depreciation method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationResult {
    /// Methodology applied
    pub method: DepreciationMethod,
    /// Depreciation taken so far
    pub accumulated_depreciation: f64,
    /// Remaining book value
    pub book_value: f64,
    /// Monthly write-down (straight-line only)
    pub monthly_depreciation: Option<f64>,
    /// Annual rate applied (declining-balance only)
    pub annual_rate: Option<f64>,
    /// Whole months since purchase
    pub months_elapsed: u32,
    /// Expected useful life
    pub useful_life_months: u32,
}

/// One month of a forward depreciation schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationScheduleEntry {
    /// `YYYY-MM` label of the projected month
    pub month: String,
    /// Depreciation taken in the month
    pub depreciation: f64,
    /// Depreciation taken up to and including the month
    pub accumulated_depreciation: f64,
    /// Book value at the end of the month
    pub book_value: f64,
}

/// Validate request parameter ranges before any computation
pub fn validate_request(request: &DepreciationRequest) -> AnalyticsResult<()> {
    if request.methods.is_empty() {
        return Err(AnalyticsError::invalid(
            "methods",
            "at least one depreciation method is required",
        ));
    }
    if !(0.0..1.0).contains(&request.salvage_value_percent) {
        return Err(AnalyticsError::invalid(
            "salvage_value_percent",
            "must lie in [0, 1)",
        ));
    }
    if !request.declining_balance_rate.is_finite()
        || request.declining_balance_rate <= 0.0
        || request.declining_balance_rate > 1.0
    {
        return Err(AnalyticsError::invalid(
            "declining_balance_rate",
            "must lie in (0, 1]",
        ));
    }
    Ok(())
}

/// Compute one method over validated inputs
pub fn calculate(
    inputs: &DepreciationInputs,
    method: DepreciationMethod,
    annual_rate: f64,
) -> AnalyticsResult<DepreciationResult> {
    if inputs.purchase_cost <= 0.0 {
        return Err(AnalyticsError::invalid("purchase_cost", "must be positive"));
    }
    if inputs.useful_life_months == 0 {
        return Err(AnalyticsError::invalid(
            "useful_life_months",
            "must cover at least one month",
        ));
    }
    if inputs.salvage_value < 0.0 || inputs.salvage_value >= inputs.purchase_cost {
        return Err(AnalyticsError::invalid(
            "salvage_value",
            "must lie in [0, purchase_cost)",
        ));
    }

    Ok(match method {
        DepreciationMethod::StraightLine => straight_line(inputs),
        DepreciationMethod::DecliningBalance => declining_balance(inputs, annual_rate),
        DepreciationMethod::SumOfYearsDigits => sum_of_years_digits(inputs),
    })
}

fn straight_line(inputs: &DepreciationInputs) -> DepreciationResult {
    let monthly = inputs.depreciable_amount() / inputs.useful_life_months as f64;
    let accumulated =
        (monthly * inputs.months_elapsed as f64).min(inputs.depreciable_amount());
    let book_value = inputs.purchase_cost - accumulated;

    DepreciationResult {
        method: DepreciationMethod::StraightLine,
        accumulated_depreciation: round_currency(accumulated),
        book_value: round_currency(book_value),
        monthly_depreciation: Some(round_currency(monthly)),
        annual_rate: None,
        months_elapsed: inputs.months_elapsed,
        useful_life_months: inputs.useful_life_months,
    }
}

fn declining_balance(inputs: &DepreciationInputs, annual_rate: f64) -> DepreciationResult {
    let monthly_rate = annual_rate / 12.0;
    let mut book_value = inputs.purchase_cost;
    let mut accumulated = 0.0;
    for _ in 0..inputs.months_elapsed {
        let step = (book_value * monthly_rate)
            .min(book_value - inputs.salvage_value)
            .max(0.0);
        accumulated += step;
        book_value -= step;
    }

    DepreciationResult {
        method: DepreciationMethod::DecliningBalance,
        accumulated_depreciation: round_currency(accumulated),
        book_value: round_currency(book_value),
        monthly_depreciation: None,
        annual_rate: Some(annual_rate),
        months_elapsed: inputs.months_elapsed,
        useful_life_months: inputs.useful_life_months,
    }
}

fn sum_of_years_digits(inputs: &DepreciationInputs) -> DepreciationResult {
    let life_years = (inputs.useful_life_months / 12).max(1);
    let sum_of_years = (life_years * (life_years + 1) / 2) as f64;
    let depreciable = inputs.depreciable_amount();

    let full_years = (inputs.months_elapsed / 12).min(life_years);
    let mut accumulated = 0.0;
    for year in 0..full_years {
        accumulated += depreciable * (life_years - year) as f64 / sum_of_years;
    }
    if full_years < life_years {
        let fraction = (inputs.months_elapsed % 12) as f64 / 12.0;
        accumulated += depreciable * (life_years - full_years) as f64 / sum_of_years * fraction;
    }
    let accumulated = accumulated.min(depreciable);

    DepreciationResult {
        method: DepreciationMethod::SumOfYearsDigits,
        accumulated_depreciation: round_currency(accumulated),
        book_value: round_currency(inputs.purchase_cost - accumulated),
        monthly_depreciation: None,
        annual_rate: None,
        months_elapsed: inputs.months_elapsed,
        useful_life_months: inputs.useful_life_months,
    }
}

/// Forward schedule extending the straight-line monthly amount
///
/// Projection starts at the current elapsed position; book value floors at
/// the salvage value and never goes below zero.
pub fn straight_line_schedule(
    inputs: &DepreciationInputs,
    horizon_months: u32,
    as_of: NaiveDate,
) -> Vec<DepreciationScheduleEntry> {
    let monthly = inputs.depreciable_amount() / inputs.useful_life_months as f64;
    let mut accumulated =
        (monthly * inputs.months_elapsed as f64).min(inputs.depreciable_amount());

    let mut schedule = Vec::with_capacity(horizon_months as usize);
    for month in 1..=horizon_months {
        let step = monthly.min(inputs.depreciable_amount() - accumulated).max(0.0);
        accumulated += step;
        let book_value = (inputs.purchase_cost - accumulated).max(0.0);
        schedule.push(DepreciationScheduleEntry {
            month: month_label(add_months(as_of, month)),
            depreciation: round_currency(step),
            accumulated_depreciation: round_currency(accumulated),
            book_value: round_currency(book_value),
        });
    }
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(months_elapsed: u32) -> DepreciationInputs {
        DepreciationInputs {
            purchase_cost: 10_000.0,
            salvage_value: 1000.0,
            useful_life_months: 60,
            months_elapsed,
        }
    }

    #[test]
    fn straight_line_matches_the_reference_figures() {
        // 10000 cost, 10% salvage, 60 months, 12 elapsed
        let result = calculate(&inputs(12), DepreciationMethod::StraightLine, 0.2).unwrap();

        assert_eq!(result.monthly_depreciation, Some(150.0));
        assert_eq!(result.accumulated_depreciation, 1800.0);
        assert_eq!(result.book_value, 8200.0);
    }

    #[test]
    fn straight_line_book_value_starts_at_cost_and_never_increases() {
        let mut previous = f64::MAX;
        for elapsed in 0..=72 {
            let result =
                calculate(&inputs(elapsed), DepreciationMethod::StraightLine, 0.2).unwrap();
            if elapsed == 0 {
                assert_eq!(result.book_value, 10_000.0);
            }
            assert!(result.book_value <= previous);
            previous = result.book_value;
        }
    }

    #[test]
    fn straight_line_stops_at_the_depreciable_amount() {
        let result = calculate(&inputs(120), DepreciationMethod::StraightLine, 0.2).unwrap();
        assert_eq!(result.accumulated_depreciation, 9000.0);
        assert_eq!(result.book_value, 1000.0);
    }

    #[test]
    fn declining_balance_never_drops_below_salvage() {
        for elapsed in [0, 12, 60, 240] {
            let result =
                calculate(&inputs(elapsed), DepreciationMethod::DecliningBalance, 0.4).unwrap();
            assert!(result.book_value >= 1000.0);
            assert!(result.book_value <= 10_000.0);
        }
    }

    #[test]
    fn declining_balance_front_loads_depreciation() {
        let early = calculate(&inputs(12), DepreciationMethod::DecliningBalance, 0.2).unwrap();
        let late_window = calculate(&inputs(24), DepreciationMethod::DecliningBalance, 0.2)
            .unwrap()
            .accumulated_depreciation
            - early.accumulated_depreciation;
        assert!(early.accumulated_depreciation > late_window);
    }

    #[test]
    fn sum_of_years_digits_weights_early_years_heavier() {
        let year_one = calculate(&inputs(12), DepreciationMethod::SumOfYearsDigits, 0.2).unwrap();
        // first year weight 5/15 of 9000 = 3000
        assert_eq!(year_one.accumulated_depreciation, 3000.0);

        let year_two = calculate(&inputs(24), DepreciationMethod::SumOfYearsDigits, 0.2).unwrap();
        // second year adds 4/15 of 9000 = 2400
        assert_eq!(year_two.accumulated_depreciation, 5400.0);
    }

    #[test]
    fn sum_of_years_digits_fractional_year_prorates() {
        let result = calculate(&inputs(18), DepreciationMethod::SumOfYearsDigits, 0.2).unwrap();
        // 3000 for year one plus half of year two's 2400
        assert_eq!(result.accumulated_depreciation, 4200.0);
    }

    #[test]
    fn sum_of_years_digits_exhausts_to_salvage_at_end_of_life() {
        let result = calculate(&inputs(60), DepreciationMethod::SumOfYearsDigits, 0.2).unwrap();
        assert_eq!(result.accumulated_depreciation, 9000.0);
        assert_eq!(result.book_value, 1000.0);
    }

    #[test]
    fn invariants_hold_across_methods() {
        for method in [
            DepreciationMethod::StraightLine,
            DepreciationMethod::DecliningBalance,
            DepreciationMethod::SumOfYearsDigits,
        ] {
            for elapsed in [0, 7, 30, 59, 61, 100] {
                let result = calculate(&inputs(elapsed), method, 0.2).unwrap();
                assert!(result.book_value >= 0.0);
                assert!(result.book_value <= 10_000.0);
                assert!(result.accumulated_depreciation <= 9000.0 + 1e-9);
            }
        }
    }

    #[test]
    fn forward_schedule_extends_monthly_amount_and_floors() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let schedule = straight_line_schedule(&inputs(58), 6, as_of);

        assert_eq!(schedule.len(), 6);
        assert_eq!(schedule[0].month, "2025-07");
        // two months of 150 remain before the floor
        assert_eq!(schedule[0].depreciation, 150.0);
        assert_eq!(schedule[1].depreciation, 150.0);
        assert_eq!(schedule[2].depreciation, 0.0);
        assert_eq!(schedule[5].book_value, 1000.0);
    }

    #[test]
    fn empty_method_list_fails_validation() {
        let request = DepreciationRequest {
            methods: Vec::new(),
            ..DepreciationRequest::default()
        };
        assert!(matches!(
            validate_request(&request),
            Err(AnalyticsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn out_of_range_rates_fail_validation() {
        let request = DepreciationRequest {
            salvage_value_percent: 1.0,
            ..DepreciationRequest::default()
        };
        assert!(validate_request(&request).is_err());

        let request = DepreciationRequest {
            declining_balance_rate: 0.0,
            ..DepreciationRequest::default()
        };
        assert!(validate_request(&request).is_err());
    }
}
