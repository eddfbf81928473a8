//! Asset financial analytics engine
//!
//! This crate turns historical IT-asset cost records into forward-looking
//! financial decisions:
//! - Trend and seasonality analysis over operational cost history
//! - Cost forecasting with inflation and confidence bounds
//! - Categorized budget recommendations with a risk buffer
//! - Lifecycle stage classification, replacement risk and scheduling
//! - Budget-constrained replacement schedule optimization
//! - Return on investment under three methodologies
//! - Depreciation under three methods plus a forward schedule
//! - A combined financial analysis report with a health score
//!
//! Every computation is a synchronous pure function over an immutable record
//! snapshot fetched once through the [`HistoryStore`] boundary.

#![warn(missing_docs)]

pub mod analysis;
pub mod budget;
pub mod config;
pub mod depreciation;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod history;
pub mod lifecycle;
pub mod roi;
pub mod trend;

pub use error::{AnalyticsError, AnalyticsResult};

// Engine facade
pub use config::EngineConfig;
pub use engine::AnalyticsEngine;

// History boundary
pub use history::{
    CostRecord, CostType, HistoryStore, InMemoryHistory, LifecycleRecord, OperationalCostRecord,
    RecordFilter, DEFAULT_REPLACEMENT_CYCLE_MONTHS,
};

// Trend and forecasting
pub use forecast::{ForecastFactors, ForecastPoint, ForecastRequest};
pub use trend::{CostTrend, SeasonalIndex, TrendDirection};

// Budget planning
pub use budget::{
    AllocationPolicy, BudgetCategory, BudgetPlan, BudgetRequest, CapexBreakdown, OpexBreakdown,
};

// Lifecycle planning and optimization
pub use lifecycle::{
    AssetLifecycle, LifecyclePlan, LifecyclePlanRequest, LifecycleStage, OptimizeScheduleRequest,
    OptimizedScheduleEntry, PrioritizeBy, ReplacementPriority, ReplacementRisk,
    ReplacementScheduleEntry,
};

// Financial calculations
pub use analysis::{AnalysisOptions, FinancialAnalysisReport};
pub use depreciation::{
    DepreciationInputs, DepreciationMethod, DepreciationRequest, DepreciationResult,
    DepreciationScheduleEntry,
};
pub use roi::{RoiInputs, RoiMethod, RoiRequest, RoiResult};
