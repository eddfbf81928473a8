//! Trend and seasonality analysis over operational cost history

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use statistical::mean;

use crate::history::OperationalCostRecord;

/// Band below which a fitted growth rate counts as stable
const STABLE_BAND: f64 = 0.05;

/// Direction of the fitted cost trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Costs are rising
    Increasing,
    /// Costs are falling
    Decreasing,
    /// No meaningful movement
    Stable,
}

/// Trend metrics fitted over a monthly cost series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostTrend {
    /// Arithmetic mean of monthly totals
    pub average: f64,
    /// OLS regression slope normalized by the average
    pub growth_rate: f64,
    /// Population variance of monthly totals
    pub variance: f64,
    /// Standard deviation relative to the average
    pub volatility: f64,
    /// Direction classification of the growth rate
    pub direction: TrendDirection,
    /// Number of observations behind the metrics
    pub sample_count: usize,
}

impl CostTrend {
    /// Degenerate trend for series with fewer than two observations
    ///
    /// This is a defined contract, not an error: the forecaster projects the
    /// average flat with zero-width behaviour from the trend side.
    pub fn degenerate(average: f64, sample_count: usize) -> Self {
        Self {
            average,
            growth_rate: 0.0,
            variance: 0.0,
            volatility: 0.0,
            direction: TrendDirection::Stable,
            sample_count,
        }
    }
}

/// Seasonal adjustment factors, one per calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalIndex {
    factors: [f64; 12],
}

impl Default for SeasonalIndex {
    fn default() -> Self {
        Self { factors: [1.0; 12] }
    }
}

impl SeasonalIndex {
    /// Factor for a zero-based calendar month (0 = January)
    pub fn factor(&self, month0: usize) -> f64 {
        self.factors[month0 % 12]
    }

    /// All twelve factors in calendar order
    pub fn factors(&self) -> &[f64; 12] {
        &self.factors
    }
}

/// Monthly totals of an ordered operational cost series
pub fn monthly_totals(records: &[OperationalCostRecord]) -> Vec<f64> {
    records.iter().map(|r| r.total()).collect()
}

/// Fit trend metrics over ordered monthly totals
pub fn analyze_totals(totals: &[f64]) -> CostTrend {
    if totals.len() < 2 {
        let average = totals.first().copied().unwrap_or(0.0);
        return CostTrend::degenerate(average, totals.len());
    }

    let n = totals.len();
    let average = mean(totals);

    // OLS slope of total versus month index, mean-centred accumulation
    let x_mean = (n - 1) as f64 / 2.0;
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, total) in totals.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (total - average);
        den += dx * dx;
    }
    let slope = if den != 0.0 { num / den } else { 0.0 };
    let growth_rate = if average != 0.0 { slope / average } else { 0.0 };

    let variance = totals.iter().map(|t| (t - average).powi(2)).sum::<f64>() / n as f64;
    let volatility = if average != 0.0 {
        variance.sqrt() / average
    } else {
        0.0
    };

    let direction = if growth_rate.abs() < STABLE_BAND {
        TrendDirection::Stable
    } else if growth_rate > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    CostTrend {
        average,
        growth_rate,
        variance,
        volatility,
        direction,
        sample_count: n,
    }
}

/// Seasonal index over an operational cost series
///
/// Totals are grouped by calendar month, averaged within each group and
/// divided by the overall average. Months with no observations keep factor
/// 1.0 (no adjustment), as does the whole index for degenerate series.
pub fn seasonal_index(records: &[OperationalCostRecord]) -> SeasonalIndex {
    if records.len() < 2 {
        return SeasonalIndex::default();
    }

    let totals = monthly_totals(records);
    let overall = mean(&totals);
    if overall == 0.0 {
        return SeasonalIndex::default();
    }

    let mut sums = [0.0; 12];
    let mut counts = [0usize; 12];
    for record in records {
        let month = record.period.month0() as usize;
        sums[month] += record.total();
        counts[month] += 1;
    }

    let mut factors = [1.0; 12];
    for month in 0..12 {
        if counts[month] > 0 {
            factors[month] = (sums[month] / counts[month] as f64) / overall;
        }
    }

    SeasonalIndex { factors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn record(year: i32, month: u32, total: f64) -> OperationalCostRecord {
        OperationalCostRecord {
            asset_id: Uuid::new_v4(),
            period: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            power_cost: total,
            space_cost: 0.0,
            network_cost: 0.0,
            storage_cost: 0.0,
            labor_cost: 0.0,
            other_cost: 0.0,
        }
    }

    #[test]
    fn fewer_than_two_points_yield_degenerate_trend() {
        let empty = analyze_totals(&[]);
        assert_eq!(empty.growth_rate, 0.0);
        assert_eq!(empty.volatility, 0.0);
        assert_eq!(empty.average, 0.0);

        let single = analyze_totals(&[500.0]);
        assert_eq!(single.growth_rate, 0.0);
        assert_eq!(single.variance, 0.0);
        assert_eq!(single.average, 500.0);
        assert_eq!(single.direction, TrendDirection::Stable);
    }

    #[test]
    fn linear_series_fits_its_slope() {
        // totals rise by 100 per month around a mean of 1250
        let totals = vec![1000.0, 1100.0, 1200.0, 1300.0, 1400.0, 1500.0];
        let trend = analyze_totals(&totals);

        assert!((trend.average - 1250.0).abs() < 1e-9);
        assert!((trend.growth_rate - 100.0 / 1250.0).abs() < 1e-9);
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.sample_count, 6);
    }

    #[test]
    fn flat_series_has_zero_variance_and_volatility() {
        let trend = analyze_totals(&[800.0, 800.0, 800.0, 800.0]);
        assert_eq!(trend.growth_rate, 0.0);
        assert_eq!(trend.variance, 0.0);
        assert_eq!(trend.volatility, 0.0);
        assert_eq!(trend.direction, TrendDirection::Stable);
    }

    #[test]
    fn variance_is_population_variance() {
        let trend = analyze_totals(&[10.0, 20.0]);
        // population variance of {10, 20} = 25, not the sample figure 50
        assert!((trend.variance - 25.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_series_keeps_unit_seasonal_factors() {
        assert_eq!(seasonal_index(&[]), SeasonalIndex::default());
        assert_eq!(seasonal_index(&[record(2025, 3, 900.0)]), SeasonalIndex::default());
    }

    #[test]
    fn seasonal_factors_scale_by_calendar_month() {
        // January runs double the June spend; overall average 1500
        let records = vec![
            record(2024, 1, 2000.0),
            record(2024, 6, 1000.0),
            record(2025, 1, 2000.0),
            record(2025, 6, 1000.0),
        ];
        let index = seasonal_index(&records);

        assert!((index.factor(0) - 2000.0 / 1500.0).abs() < 1e-9);
        assert!((index.factor(5) - 1000.0 / 1500.0).abs() < 1e-9);
        // months with no observations stay unadjusted
        assert_eq!(index.factor(2), 1.0);
        assert_eq!(index.factor(11), 1.0);
    }

    #[test]
    fn classification_is_deterministic() {
        let totals = vec![100.0, 140.0, 180.0, 220.0];
        let first = analyze_totals(&totals);
        let second = analyze_totals(&totals);
        assert_eq!(first.direction, second.direction);
        assert_eq!(first.growth_rate, second.growth_rate);
    }
}
