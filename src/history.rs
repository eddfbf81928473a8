//! Historical record types and the read-only data accessor boundary
//!
//! Every analytics operation starts from an immutable snapshot of the records
//! defined here. The engine never writes back through this boundary.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AnalyticsResult;

/// Replacement cycle assumed when a lifecycle record does not declare one
pub const DEFAULT_REPLACEMENT_CYCLE_MONTHS: u32 = 60;

/// Cost record category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostType {
    /// Initial acquisition
    Purchase,
    /// Hardware or capacity upgrade
    Upgrade,
    /// Repair and upkeep
    Maintenance,
    /// Vendor or internal support
    Support,
    /// Software licensing
    License,
    /// Anything uncategorized
    Other,
}

impl std::fmt::Display for CostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostType::Purchase => write!(f, "purchase"),
            CostType::Upgrade => write!(f, "upgrade"),
            CostType::Maintenance => write!(f, "maintenance"),
            CostType::Support => write!(f, "support"),
            CostType::License => write!(f, "license"),
            CostType::Other => write!(f, "other"),
        }
    }
}

/// One cost booked against an asset (append-only, created externally)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostRecord {
    /// Asset the cost was booked against
    pub asset_id: Uuid,
    /// Cost category
    pub cost_type: CostType,
    /// Amount in account currency, non-negative
    pub amount: f64,
    /// Cost center carrying the spend
    pub cost_center: String,
    /// Booking time
    pub timestamp: DateTime<Utc>,
}

/// One calendar month of operational spend for an asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalCostRecord {
    /// Asset the spend belongs to
    pub asset_id: Uuid,
    /// First day of the ledger month
    pub period: NaiveDate,
    /// Power draw cost
    pub power_cost: f64,
    /// Rack / floor space cost
    pub space_cost: f64,
    /// Network cost
    pub network_cost: f64,
    /// Storage cost
    pub storage_cost: f64,
    /// Operations labor cost
    pub labor_cost: f64,
    /// Anything uncategorized
    pub other_cost: f64,
}

impl OperationalCostRecord {
    /// Total monthly cost across all six components
    pub fn total(&self) -> f64 {
        self.power_cost
            + self.space_cost
            + self.network_cost
            + self.storage_cost
            + self.labor_cost
            + self.other_cost
    }
}

/// Lifecycle master data for an asset (at most one active record per asset)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleRecord {
    /// Asset this record describes
    pub asset_id: Uuid,
    /// Acquisition date
    pub purchase_date: NaiveDate,
    /// Warranty expiry, if known
    pub warranty_end_date: Option<NaiveDate>,
    /// Manufacturer end-of-life date, if announced
    pub manufacturer_eol_date: Option<NaiveDate>,
    /// Internally declared end-of-life date
    pub internal_eol_date: Option<NaiveDate>,
    /// Expected replacement cycle in months; defaults when absent
    pub replacement_cycle_months: Option<u32>,
    /// Estimated cost of the eventual replacement
    pub estimated_replacement_cost: f64,
    /// Budget year the replacement is planned for
    pub replacement_budget_year: Option<i32>,
    /// Budget quarter the replacement is planned for (1-4)
    pub replacement_budget_quarter: Option<u8>,
}

impl LifecycleRecord {
    /// Effective replacement cycle, falling back to the fleet default
    pub fn cycle_months(&self) -> u32 {
        self.replacement_cycle_months
            .unwrap_or(DEFAULT_REPLACEMENT_CYCLE_MONTHS)
    }
}

/// Record selection passed to the accessor boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Restrict to one asset; `None` selects the fleet
    pub asset_id: Option<Uuid>,
    /// Inclusive lower bound on record time
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on record time
    pub to: Option<DateTime<Utc>>,
}

impl RecordFilter {
    /// Filter selecting a single asset with no date bounds
    pub fn for_asset(asset_id: Uuid) -> Self {
        Self {
            asset_id: Some(asset_id),
            ..Self::default()
        }
    }

    fn matches_cost(&self, record: &CostRecord) -> bool {
        if let Some(id) = self.asset_id {
            if record.asset_id != id {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.timestamp > to {
                return false;
            }
        }
        true
    }

    fn matches_operational(&self, record: &OperationalCostRecord) -> bool {
        if let Some(id) = self.asset_id {
            if record.asset_id != id {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.period < from.date_naive() {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.period > to.date_naive() {
                return false;
            }
        }
        true
    }
}

/// Read-only source of historical records
///
/// The only part of the engine that may block or fail transiently. Everything
/// downstream is CPU-bound arithmetic over the returned snapshot.
pub trait HistoryStore: Send + Sync {
    /// Cost records matching the filter, ordered by booking time
    fn cost_records(&self, filter: &RecordFilter) -> AnalyticsResult<Vec<CostRecord>>;

    /// Operational ledger records matching the filter, ordered by period
    fn operational_costs(
        &self,
        filter: &RecordFilter,
    ) -> AnalyticsResult<Vec<OperationalCostRecord>>;

    /// Lifecycle record for one asset, if any exists
    fn lifecycle_record(&self, asset_id: Uuid) -> AnalyticsResult<Option<LifecycleRecord>>;

    /// All lifecycle records in the fleet
    fn lifecycle_records(&self) -> AnalyticsResult<Vec<LifecycleRecord>>;
}

/// In-memory history store for tests, benches and embedding callers
#[derive(Debug, Default, Clone)]
pub struct InMemoryHistory {
    costs: Vec<CostRecord>,
    operational: Vec<OperationalCostRecord>,
    lifecycles: Vec<LifecycleRecord>,
}

impl InMemoryHistory {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cost record
    pub fn push_cost(&mut self, record: CostRecord) {
        self.costs.push(record);
    }

    /// Add an operational ledger record
    pub fn push_operational(&mut self, record: OperationalCostRecord) {
        self.operational.push(record);
    }

    /// Add a lifecycle record
    pub fn push_lifecycle(&mut self, record: LifecycleRecord) {
        self.lifecycles.push(record);
    }
}

impl HistoryStore for InMemoryHistory {
    fn cost_records(&self, filter: &RecordFilter) -> AnalyticsResult<Vec<CostRecord>> {
        let mut records: Vec<CostRecord> = self
            .costs
            .iter()
            .filter(|r| filter.matches_cost(r))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.timestamp);
        Ok(records)
    }

    fn operational_costs(
        &self,
        filter: &RecordFilter,
    ) -> AnalyticsResult<Vec<OperationalCostRecord>> {
        let mut records: Vec<OperationalCostRecord> = self
            .operational
            .iter()
            .filter(|r| filter.matches_operational(r))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.period);
        Ok(records)
    }

    fn lifecycle_record(&self, asset_id: Uuid) -> AnalyticsResult<Option<LifecycleRecord>> {
        Ok(self
            .lifecycles
            .iter()
            .find(|r| r.asset_id == asset_id)
            .cloned())
    }

    fn lifecycle_records(&self) -> AnalyticsResult<Vec<LifecycleRecord>> {
        Ok(self.lifecycles.clone())
    }
}

/// Whole months elapsed between two dates, never negative
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    if end <= start {
        return 0;
    }
    let mut months = (end.year() as i64 - start.year() as i64) * 12
        + (end.month() as i64 - start.month() as i64);
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0)
}

/// Date shifted forward by whole months
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// `YYYY-MM` label for a date
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Round a monetary figure to two decimal places
///
/// Applied only at the output boundary; intermediate arithmetic keeps full
/// precision so chained calculations never compound rounding error.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn months_between_counts_whole_months() {
        assert_eq!(months_between(date(2024, 1, 15), date(2025, 1, 15)), 12);
        assert_eq!(months_between(date(2024, 1, 15), date(2025, 1, 14)), 11);
        assert_eq!(months_between(date(2024, 1, 1), date(2024, 1, 31)), 0);
    }

    #[test]
    fn months_between_never_goes_negative() {
        assert_eq!(months_between(date(2025, 6, 1), date(2024, 6, 1)), 0);
    }

    #[test]
    fn operational_total_sums_all_components() {
        let record = OperationalCostRecord {
            asset_id: Uuid::new_v4(),
            period: date(2025, 3, 1),
            power_cost: 10.0,
            space_cost: 20.0,
            network_cost: 30.0,
            storage_cost: 40.0,
            labor_cost: 50.0,
            other_cost: 60.0,
        };
        assert_eq!(record.total(), 210.0);
    }

    #[test]
    fn cycle_months_falls_back_to_default() {
        let record = LifecycleRecord {
            asset_id: Uuid::new_v4(),
            purchase_date: date(2023, 1, 1),
            warranty_end_date: None,
            manufacturer_eol_date: None,
            internal_eol_date: None,
            replacement_cycle_months: None,
            estimated_replacement_cost: 0.0,
            replacement_budget_year: None,
            replacement_budget_quarter: None,
        };
        assert_eq!(record.cycle_months(), DEFAULT_REPLACEMENT_CYCLE_MONTHS);
    }

    #[test]
    fn in_memory_store_filters_by_asset_and_orders_by_time() {
        let wanted = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut store = InMemoryHistory::new();
        for (asset_id, day) in [(wanted, 20), (other, 5), (wanted, 10)] {
            store.push_cost(CostRecord {
                asset_id,
                cost_type: CostType::Maintenance,
                amount: 100.0,
                cost_center: "IT-OPS".to_string(),
                timestamp: date(2025, 1, day).and_hms_opt(0, 0, 0).unwrap().and_utc(),
            });
        }

        let records = store.cost_records(&RecordFilter::for_asset(wanted)).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].timestamp < records[1].timestamp);
    }

    #[test]
    fn round_currency_rounds_to_cents() {
        assert_eq!(round_currency(1234.5678), 1234.57);
        assert_eq!(round_currency(10.014), 10.01);
        assert_eq!(round_currency(10.016), 10.02);
    }
}
