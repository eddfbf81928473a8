//! Cost forecasting with seasonal, inflation and confidence adjustments

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::history::{add_months, month_label, round_currency};
use crate::trend::{CostTrend, SeasonalIndex};

/// Request for a cost forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Restrict history to one asset; `None` forecasts the fleet
    pub asset_id: Option<Uuid>,
    /// Number of future months to project
    pub months: u32,
    /// Apply a monthly compounding inflation factor
    pub include_inflation: bool,
    /// Annual inflation rate as a decimal (e.g. 0.03)
    pub inflation_rate: f64,
    /// Requested confidence level for the bounds
    pub confidence_level: f64,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            asset_id: None,
            months: 12,
            include_inflation: false,
            inflation_rate: 0.0,
            confidence_level: 0.95,
        }
    }
}

/// Multipliers applied to the series average for one projected month
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForecastFactors {
    /// Trend multiplier `1 + growthRate * i`
    pub trend: f64,
    /// Seasonal factor of the projected calendar month
    pub seasonal: f64,
    /// Compounded inflation multiplier, 1.0 when inflation is off
    pub inflation: f64,
}

/// One projected month with confidence bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// `YYYY-MM` label of the projected month
    pub month: String,
    /// Projected cost
    pub forecasted_cost: f64,
    /// Lower confidence bound, never above the forecast
    pub lower_bound: f64,
    /// Upper confidence bound, never below the forecast
    pub upper_bound: f64,
    /// Confidence level the bounds were computed for
    pub confidence: f64,
    /// Factor breakdown behind the projection
    pub factors: ForecastFactors,
}

/// z-score for a requested confidence level
///
/// Unknown levels are not an error; they fall back to the 95% score.
pub fn z_score(confidence_level: f64) -> f64 {
    match confidence_level {
        cl if (cl - 0.90).abs() < 1e-9 => 1.645,
        cl if (cl - 0.95).abs() < 1e-9 => 1.96,
        cl if (cl - 0.99).abs() < 1e-9 => 2.576,
        _ => 1.96,
    }
}

/// Project future monthly costs from fitted trend and seasonality
///
/// Pure function of its inputs: recomputing with the same trend, index and
/// request yields an identical sequence.
pub fn project(
    trend: &CostTrend,
    seasonal: &SeasonalIndex,
    request: &ForecastRequest,
    as_of: NaiveDate,
) -> AnalyticsResult<Vec<ForecastPoint>> {
    if request.months == 0 {
        return Err(AnalyticsError::invalid(
            "months",
            "forecast horizon must cover at least one month",
        ));
    }
    if request.include_inflation && !request.inflation_rate.is_finite() {
        return Err(AnalyticsError::invalid(
            "inflation_rate",
            "must be a finite decimal rate",
        ));
    }

    let margin = if trend.sample_count > 0 {
        z_score(request.confidence_level)
            * (trend.variance / trend.sample_count as f64).sqrt()
    } else {
        0.0
    };
    let monthly_inflation = request.inflation_rate / 12.0;

    let mut points = Vec::with_capacity(request.months as usize);
    for i in 1..=request.months {
        let date = add_months(as_of, i);
        let trend_factor = 1.0 + trend.growth_rate * i as f64;
        let seasonal_factor = seasonal.factor(date.month0() as usize);
        let inflation_factor = if request.include_inflation {
            (1.0 + monthly_inflation).powi(i as i32)
        } else {
            1.0
        };

        let forecast = trend.average * trend_factor * seasonal_factor * inflation_factor;
        let lower = (forecast - margin).max(0.0).min(forecast);
        let upper = forecast + margin;

        points.push(ForecastPoint {
            month: month_label(date),
            forecasted_cost: round_currency(forecast),
            lower_bound: round_currency(lower),
            upper_bound: round_currency(upper),
            confidence: request.confidence_level,
            factors: ForecastFactors {
                trend: trend_factor,
                seasonal: seasonal_factor,
                inflation: inflation_factor,
            },
        });
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::analyze_totals;
    use chrono::NaiveDate;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn z_scores_map_known_levels_and_default_otherwise() {
        assert_eq!(z_score(0.90), 1.645);
        assert_eq!(z_score(0.95), 1.96);
        assert_eq!(z_score(0.99), 2.576);
        assert_eq!(z_score(0.80), 1.96);
        assert_eq!(z_score(0.42), 1.96);
    }

    #[test]
    fn flat_trend_without_inflation_projects_the_average_exactly() {
        let trend = CostTrend::degenerate(1000.0, 1);
        let request = ForecastRequest {
            months: 6,
            ..ForecastRequest::default()
        };

        let points = project(&trend, &SeasonalIndex::default(), &request, as_of()).unwrap();
        assert_eq!(points.len(), 6);
        for point in &points {
            assert_eq!(point.forecasted_cost, 1000.0);
            assert_eq!(point.lower_bound, 1000.0);
            assert_eq!(point.upper_bound, 1000.0);
        }
    }

    #[test]
    fn bounds_bracket_the_forecast_for_every_point() {
        let trend = analyze_totals(&[900.0, 1100.0, 950.0, 1250.0, 1000.0, 1300.0]);
        let request = ForecastRequest {
            months: 24,
            include_inflation: true,
            inflation_rate: 0.04,
            confidence_level: 0.99,
            ..ForecastRequest::default()
        };

        let points = project(&trend, &SeasonalIndex::default(), &request, as_of()).unwrap();
        assert_eq!(points.len(), 24);
        for point in &points {
            assert!(point.lower_bound <= point.forecasted_cost);
            assert!(point.forecasted_cost <= point.upper_bound);
            assert!(point.lower_bound >= 0.0);
        }
    }

    #[test]
    fn inflation_compounds_monthly() {
        let trend = CostTrend::degenerate(1200.0, 1);
        let request = ForecastRequest {
            months: 12,
            include_inflation: true,
            inflation_rate: 0.06,
            ..ForecastRequest::default()
        };

        let points = project(&trend, &SeasonalIndex::default(), &request, as_of()).unwrap();
        let expected_last = 1200.0 * (1.0 + 0.06 / 12.0_f64).powi(12);
        assert_eq!(points[11].forecasted_cost, round_currency(expected_last));
        assert!(points[11].factors.inflation > points[0].factors.inflation);
    }

    #[test]
    fn month_labels_advance_from_the_as_of_date() {
        let trend = CostTrend::degenerate(100.0, 1);
        let request = ForecastRequest {
            months: 8,
            ..ForecastRequest::default()
        };

        let points = project(&trend, &SeasonalIndex::default(), &request, as_of()).unwrap();
        assert_eq!(points[0].month, "2025-07");
        assert_eq!(points[5].month, "2025-12");
        assert_eq!(points[6].month, "2026-01");
    }

    #[test]
    fn zero_month_horizon_is_rejected_before_computation() {
        let trend = CostTrend::degenerate(100.0, 1);
        let request = ForecastRequest {
            months: 0,
            ..ForecastRequest::default()
        };

        let result = project(&trend, &SeasonalIndex::default(), &request, as_of());
        assert!(matches!(
            result,
            Err(AnalyticsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn recomputation_is_identical() {
        let trend = analyze_totals(&[500.0, 520.0, 540.0, 610.0]);
        let request = ForecastRequest::default();

        let first = project(&trend, &SeasonalIndex::default(), &request, as_of()).unwrap();
        let second = project(&trend, &SeasonalIndex::default(), &request, as_of()).unwrap();
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.month, b.month);
            assert_eq!(a.forecasted_cost, b.forecasted_cost);
            assert_eq!(a.lower_bound, b.lower_bound);
            assert_eq!(a.upper_bound, b.upper_bound);
        }
    }
}
