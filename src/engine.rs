//! Engine facade exposing the analytics operations
//!
//! Each operation fetches an immutable record snapshot once, then runs pure
//! CPU-bound arithmetic. The engine holds no mutable state, so independent
//! analyses fan out safely without locking.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::{self, AnalysisOptions, FinancialAnalysisReport};
use crate::budget::{self, BudgetPlan, BudgetRequest};
use crate::config::EngineConfig;
use crate::depreciation::{self, DepreciationInputs, DepreciationRequest, DepreciationResult};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::forecast::{self, ForecastPoint, ForecastRequest};
use crate::history::{
    months_between, round_currency, CostRecord, CostType, HistoryStore, LifecycleRecord,
    OperationalCostRecord, RecordFilter,
};
use crate::lifecycle::{
    self, LifecyclePlan, LifecyclePlanRequest, OptimizeScheduleRequest, OptimizedScheduleEntry,
};
use crate::roi::{self, RoiInputs, RoiMethod, RoiRequest, RoiResult};
use crate::trend;

/// Stateless analytics engine over a history source
pub struct AnalyticsEngine {
    store: Arc<dyn HistoryStore>,
    config: EngineConfig,
}

impl AnalyticsEngine {
    /// Create an engine with default configuration
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with explicit configuration
    pub fn with_config(store: Arc<dyn HistoryStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Project future monthly costs with confidence bounds
    pub fn forecast_costs(&self, request: &ForecastRequest) -> AnalyticsResult<Vec<ForecastPoint>> {
        info!(months = request.months, asset = ?request.asset_id, "forecasting costs");

        let filter = RecordFilter {
            asset_id: request.asset_id,
            ..RecordFilter::default()
        };
        let history = self.store.operational_costs(&filter)?;
        let totals = trend::monthly_totals(&history);
        let cost_trend = trend::analyze_totals(&totals);
        let seasonal = trend::seasonal_index(&history);
        debug!(
            average = cost_trend.average,
            growth_rate = cost_trend.growth_rate,
            samples = cost_trend.sample_count,
            "fitted cost trend"
        );

        forecast::project(&cost_trend, &seasonal, request, Self::today())
    }

    /// Build a categorized budget recommendation for a year
    pub fn plan_budget(&self, request: &BudgetRequest) -> AnalyticsResult<BudgetPlan> {
        info!(year = request.budget_year, "planning budget");

        let costs = self.store.cost_records(&RecordFilter::default())?;
        let operational = self.store.operational_costs(&RecordFilter::default())?;
        let lifecycles = self.store.lifecycle_records()?;

        budget::build_plan(
            request,
            &costs,
            &operational,
            &lifecycles,
            &self.config.allocation_policy,
        )
    }

    /// Classify fleet lifecycle stages and derive a replacement schedule
    pub fn plan_lifecycle(&self, request: &LifecyclePlanRequest) -> AnalyticsResult<LifecyclePlan> {
        info!(
            horizon = request.planning_horizon_months,
            "planning lifecycle"
        );

        let records = self.store.lifecycle_records()?;
        lifecycle::build_plan(&records, request, Self::today())
    }

    /// Reorder and truncate the replacement schedule under a budget ceiling
    pub fn optimize_replacement_schedule(
        &self,
        request: &OptimizeScheduleRequest,
    ) -> AnalyticsResult<Vec<OptimizedScheduleEntry>> {
        info!(prioritize_by = ?request.prioritize_by, "optimizing replacement schedule");

        let plan_request = LifecyclePlanRequest {
            replacement_threshold: self.config.replacement_threshold,
            ..LifecyclePlanRequest::default()
        };
        let plan = self.plan_lifecycle(&plan_request)?;
        lifecycle::optimize(plan.schedule, request)
    }

    /// Compute return on investment for one asset
    pub fn calculate_roi(&self, asset_id: Uuid, request: &RoiRequest) -> AnalyticsResult<RoiResult> {
        info!(%asset_id, method = %request.method, "calculating ROI");

        let snapshot = self.asset_snapshot(asset_id)?;
        let inputs = self.roi_inputs(&snapshot, request);
        roi::calculate(&inputs, request)
    }

    /// Compute depreciation results for the requested methods
    pub fn calculate_depreciation(
        &self,
        asset_id: Uuid,
        request: &DepreciationRequest,
    ) -> AnalyticsResult<Vec<DepreciationResult>> {
        info!(%asset_id, methods = request.methods.len(), "calculating depreciation");

        depreciation::validate_request(request)?;
        let snapshot = self.asset_snapshot(asset_id)?;
        let inputs = self.depreciation_inputs(&snapshot, request.salvage_value_percent);

        request
            .methods
            .iter()
            .map(|method| depreciation::calculate(&inputs, *method, request.declining_balance_rate))
            .collect()
    }

    /// Combined ROI, depreciation and TCO report for one asset
    pub fn generate_financial_analysis(
        &self,
        asset_id: Uuid,
        options: &AnalysisOptions,
    ) -> AnalyticsResult<FinancialAnalysisReport> {
        info!(%asset_id, "generating financial analysis");

        let snapshot = self.asset_snapshot(asset_id)?;

        let roi_request = RoiRequest {
            method: RoiMethod::Comprehensive,
            discount_rate: options.discount_rate,
            time_horizon_months: options.time_horizon_months,
            monthly_benefit: options.monthly_benefit,
        };
        let roi_inputs = self.roi_inputs(&snapshot, &roi_request);
        let roi = roi::calculate(&roi_inputs, &roi_request)?;

        let dep_inputs = self.depreciation_inputs(&snapshot, options.salvage_value_percent);
        let straight_line = depreciation::calculate(
            &dep_inputs,
            depreciation::DepreciationMethod::StraightLine,
            options.declining_balance_rate,
        )?;
        let declining_balance = depreciation::calculate(
            &dep_inputs,
            depreciation::DepreciationMethod::DecliningBalance,
            options.declining_balance_rate,
        )?;

        let acquisition_cost: f64 = snapshot.costs.iter().map(|c| c.amount).sum();
        let operational_cost: f64 = snapshot.operational.iter().map(|o| o.total()).sum();
        let remaining_life_months =
            snapshot.lifecycle.cycle_months() as i64 - dep_inputs.months_elapsed as i64;

        let book_value_ratio = if dep_inputs.purchase_cost > 0.0 {
            straight_line.book_value / dep_inputs.purchase_cost
        } else {
            0.0
        };
        let financial_health_score = analysis::health_score(roi.roi_percent, book_value_ratio);
        let recommendations = analysis::recommendations(roi.roi_percent, remaining_life_months);
        if !recommendations.is_empty() {
            warn!(%asset_id, score = financial_health_score, "analysis raised recommendations");
        }

        Ok(FinancialAnalysisReport {
            asset_id,
            generated_at: Utc::now(),
            roi,
            straight_line,
            declining_balance,
            acquisition_cost: round_currency(acquisition_cost),
            operational_cost: round_currency(operational_cost),
            total_cost_of_ownership: round_currency(acquisition_cost + operational_cost),
            remaining_life_months,
            financial_health_score,
            recommendations,
        })
    }

    /// Analyze many assets concurrently, one task per asset
    ///
    /// Each task owns its own record snapshot; results are collected and
    /// returned in asset-id order. Per-asset failures surface in the pairs
    /// rather than aborting the fleet.
    pub async fn analyze_fleet(
        self: Arc<Self>,
        asset_ids: Vec<Uuid>,
        options: AnalysisOptions,
    ) -> Vec<(Uuid, AnalyticsResult<FinancialAnalysisReport>)> {
        let mut tasks = tokio::task::JoinSet::new();
        for asset_id in asset_ids {
            let engine = Arc::clone(&self);
            let options = options.clone();
            tasks.spawn_blocking(move || {
                (asset_id, engine.generate_financial_analysis(asset_id, &options))
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(pair) => results.push(pair),
                Err(e) => warn!("fleet analysis task failed: {e}"),
            }
        }
        results.sort_by_key(|(asset_id, _)| *asset_id);
        results
    }

    // Helper methods

    fn asset_snapshot(&self, asset_id: Uuid) -> AnalyticsResult<AssetSnapshot> {
        let filter = RecordFilter::for_asset(asset_id);
        let costs = self.store.cost_records(&filter)?;
        let operational = self.store.operational_costs(&filter)?;

        let purchase_cost: f64 = costs
            .iter()
            .filter(|c| c.cost_type == CostType::Purchase)
            .map(|c| c.amount)
            .sum();
        if purchase_cost <= 0.0 {
            return Err(AnalyticsError::missing(asset_id, "purchase cost record"));
        }

        let lifecycle = self
            .store
            .lifecycle_record(asset_id)?
            .ok_or_else(|| AnalyticsError::missing(asset_id, "lifecycle record"))?;

        Ok(AssetSnapshot {
            costs,
            operational,
            lifecycle,
            purchase_cost,
        })
    }

    fn roi_inputs(&self, snapshot: &AssetSnapshot, request: &RoiRequest) -> RoiInputs {
        let ongoing_costs: f64 = snapshot
            .costs
            .iter()
            .filter(|c| c.cost_type != CostType::Purchase)
            .map(|c| c.amount)
            .sum();
        let operational_costs: f64 = snapshot.operational.iter().map(|o| o.total()).sum();

        let (total_benefits, benefits_estimated) = match request.monthly_benefit {
            Some(monthly) => (monthly * request.time_horizon_months as f64, false),
            None => (
                self.config.monthly_benefit_rate
                    * snapshot.purchase_cost
                    * request.time_horizon_months as f64,
                true,
            ),
        };

        RoiInputs {
            initial_investment: snapshot.purchase_cost,
            ongoing_costs,
            operational_costs,
            total_benefits,
            useful_life_months: snapshot.lifecycle.cycle_months(),
            benefits_estimated,
        }
    }

    fn depreciation_inputs(
        &self,
        snapshot: &AssetSnapshot,
        salvage_value_percent: f64,
    ) -> DepreciationInputs {
        let months_elapsed =
            months_between(snapshot.lifecycle.purchase_date, Self::today()).max(0) as u32;

        DepreciationInputs {
            purchase_cost: snapshot.purchase_cost,
            salvage_value: salvage_value_percent * snapshot.purchase_cost,
            useful_life_months: snapshot.lifecycle.cycle_months(),
            months_elapsed,
        }
    }
}

struct AssetSnapshot {
    costs: Vec<CostRecord>,
    operational: Vec<OperationalCostRecord>,
    lifecycle: LifecycleRecord,
    purchase_cost: f64,
}
