//! Stage classification, risk scoring and replacement scheduling

use chrono::{Datelike, NaiveDate};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::history::{add_months, months_between, round_currency, LifecycleRecord};

use super::types::{
    AssetLifecycle, LifecyclePlan, LifecyclePlanRequest, LifecycleStage, ReplacementPriority,
    ReplacementRisk, ReplacementScheduleEntry,
};

/// Risk scores above this value appear in the plan's risk section
const RISK_REPORTING_THRESHOLD: f64 = 0.3;

/// Stage for a lifecycle progress figure
///
/// Boundaries are inclusive upward: a progress of exactly 0.90 is already
/// critical. Being past the internal EOL date is critical regardless of
/// progress.
pub fn classify_stage(progress: f64, past_internal_eol: bool) -> LifecycleStage {
    if past_internal_eol || progress >= 0.90 {
        LifecycleStage::Critical
    } else if progress >= 0.75 {
        LifecycleStage::Aging
    } else if progress >= 0.25 {
        LifecycleStage::Mature
    } else {
        LifecycleStage::New
    }
}

/// Stage for an asset, `Unknown` when it has no lifecycle record
pub fn stage_for(record: Option<&LifecycleRecord>, as_of: NaiveDate) -> LifecycleStage {
    match record {
        None => LifecycleStage::Unknown,
        Some(record) => {
            let age = months_between(record.purchase_date, as_of);
            let progress = age as f64 / record.cycle_months() as f64;
            let past_eol = record.internal_eol_date.is_some_and(|eol| eol < as_of);
            classify_stage(progress, past_eol)
        }
    }
}

/// Action a lifecycle progress figure calls for
pub fn recommended_action(progress: f64) -> &'static str {
    if progress > 1.0 {
        "Immediate replacement required"
    } else if progress >= 0.9 {
        "Plan replacement within 6 months"
    } else if progress >= 0.75 {
        "Begin replacement planning"
    } else if progress > 0.5 {
        "Monitor closely"
    } else {
        "Normal operations"
    }
}

/// Assess one asset's lifecycle position
pub fn assess(record: &LifecycleRecord, as_of: NaiveDate) -> AssetLifecycle {
    let age_months = months_between(record.purchase_date, as_of);
    let cycle_months = record.cycle_months();
    let progress = age_months as f64 / cycle_months as f64;
    let past_eol = record.internal_eol_date.is_some_and(|eol| eol < as_of);

    AssetLifecycle {
        asset_id: record.asset_id,
        age_months,
        cycle_months,
        progress,
        stage: classify_stage(progress, past_eol),
        recommended_action: recommended_action(progress).to_string(),
    }
}

/// Additive replacement risk for one asset
///
/// Age contributes up to 0.4, warranty expiry up to 0.3, manufacturer EOL up
/// to 0.4; the combined score is capped at 1.0.
pub fn replacement_risk(record: &LifecycleRecord, as_of: NaiveDate) -> ReplacementRisk {
    let age = months_between(record.purchase_date, as_of);
    let progress = age as f64 / record.cycle_months() as f64;

    let age_risk: f64 = if progress > 0.8 {
        0.4
    } else if progress > 0.6 {
        0.2
    } else {
        0.0
    };

    let warranty_risk = match record.warranty_end_date {
        Some(end) if end < as_of => 0.3,
        Some(end) if (end - as_of).num_days() < 90 => 0.1,
        _ => 0.0,
    };

    let eol_risk = match record.manufacturer_eol_date {
        Some(eol) if eol < as_of => 0.4,
        Some(eol) if (eol - as_of).num_days() < 180 => 0.2,
        _ => 0.0,
    };

    ReplacementRisk {
        asset_id: record.asset_id,
        risk_score: (age_risk + warranty_risk + eol_risk).min(1.0),
        age_risk,
        warranty_risk,
        eol_risk,
    }
}

/// Schedule entry for an asset, `None` while progress is below the threshold
pub fn schedule_entry(
    record: &LifecycleRecord,
    as_of: NaiveDate,
    replacement_threshold: f64,
) -> Option<ReplacementScheduleEntry> {
    let age = months_between(record.purchase_date, as_of);
    let cycle = record.cycle_months();
    let progress = age as f64 / cycle as f64;
    if progress < replacement_threshold {
        return None;
    }

    let months_left = (cycle as i64 - age).max(0) as u32;
    let replacement_date = add_months(as_of, months_left);
    let priority = if progress > 1.0 {
        ReplacementPriority::Critical
    } else {
        ReplacementPriority::High
    };

    Some(ReplacementScheduleEntry {
        asset_id: record.asset_id,
        current_age_months: age,
        replacement_date,
        estimated_cost: round_currency(record.estimated_replacement_cost),
        priority,
        budget_year: replacement_date.year(),
        budget_quarter: (replacement_date.month0() / 3 + 1) as u8,
    })
}

/// Build the fleet lifecycle plan
pub fn build_plan(
    records: &[LifecycleRecord],
    request: &LifecyclePlanRequest,
    as_of: NaiveDate,
) -> AnalyticsResult<LifecyclePlan> {
    if request.planning_horizon_months == 0 {
        return Err(AnalyticsError::invalid(
            "planning_horizon_months",
            "must cover at least one month",
        ));
    }
    if !request.replacement_threshold.is_finite() || request.replacement_threshold <= 0.0 {
        return Err(AnalyticsError::invalid(
            "replacement_threshold",
            "must be a positive progress ratio",
        ));
    }

    let assets: Vec<AssetLifecycle> = records.iter().map(|r| assess(r, as_of)).collect();

    let risks: Vec<ReplacementRisk> = if request.include_risk_assessment {
        records
            .iter()
            .map(|r| replacement_risk(r, as_of))
            .filter(|r| r.risk_score > RISK_REPORTING_THRESHOLD)
            .collect()
    } else {
        Vec::new()
    };

    let horizon_end = add_months(as_of, request.planning_horizon_months);
    let mut schedule: Vec<ReplacementScheduleEntry> = records
        .iter()
        .filter_map(|r| schedule_entry(r, as_of, request.replacement_threshold))
        .filter(|e| e.replacement_date <= horizon_end)
        .collect();
    schedule.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.replacement_date.cmp(&b.replacement_date))
    });

    Ok(LifecyclePlan {
        as_of,
        assets,
        risks,
        schedule,
    })
}
