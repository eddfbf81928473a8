//! Replacement schedule optimization under a budget ceiling

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::history::round_currency;

use super::types::ReplacementScheduleEntry;

/// Ordering key for the replacement schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrioritizeBy {
    /// Most urgent priority first, earliest replacement date on ties
    RiskPriority,
    /// Cheapest replacements first
    Cost,
    /// Oldest assets first
    Age,
}

/// Schedule optimization request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeScheduleRequest {
    /// Total budget available for replacements; `None` funds everything
    pub budget_constraint: Option<f64>,
    /// How the schedule is ordered before the budget walk
    pub prioritize_by: PrioritizeBy,
    /// Accepted for request compatibility; currently has no effect
    pub allow_budget_reallocation: bool,
}

impl Default for OptimizeScheduleRequest {
    fn default() -> Self {
        Self {
            budget_constraint: None,
            prioritize_by: PrioritizeBy::RiskPriority,
            allow_budget_reallocation: false,
        }
    }
}

/// A schedule entry with its funding outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedScheduleEntry {
    /// The underlying replacement
    pub entry: ReplacementScheduleEntry,
    /// Amount the budget walk assigned to this entry
    pub funded_amount: f64,
    /// Whether the assignment covers less than the estimated cost
    pub partially_funded: bool,
}

/// Reorder the schedule and truncate it under an optional budget ceiling
///
/// The greedy walk fully funds entries in order while budget remains, assigns
/// the remainder to at most one partially funded entry, and omits the rest.
pub fn optimize(
    schedule: Vec<ReplacementScheduleEntry>,
    request: &OptimizeScheduleRequest,
) -> AnalyticsResult<Vec<OptimizedScheduleEntry>> {
    if let Some(budget) = request.budget_constraint {
        if !budget.is_finite() || budget < 0.0 {
            return Err(AnalyticsError::invalid(
                "budget_constraint",
                "must be a non-negative amount",
            ));
        }
    }

    let mut ordered = schedule;
    match request.prioritize_by {
        PrioritizeBy::RiskPriority => ordered.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.replacement_date.cmp(&b.replacement_date))
        }),
        PrioritizeBy::Cost => ordered.sort_by(|a, b| a.estimated_cost.total_cmp(&b.estimated_cost)),
        PrioritizeBy::Age => ordered.sort_by(|a, b| b.current_age_months.cmp(&a.current_age_months)),
    }

    let Some(budget) = request.budget_constraint else {
        return Ok(ordered
            .into_iter()
            .map(|entry| OptimizedScheduleEntry {
                funded_amount: entry.estimated_cost,
                partially_funded: false,
                entry,
            })
            .collect());
    };

    let total = ordered.len();
    let mut remaining = budget;
    let mut funded = Vec::new();
    for entry in ordered {
        if remaining >= entry.estimated_cost {
            remaining -= entry.estimated_cost;
            funded.push(OptimizedScheduleEntry {
                funded_amount: entry.estimated_cost,
                partially_funded: false,
                entry,
            });
        } else {
            if remaining > 0.0 {
                funded.push(OptimizedScheduleEntry {
                    funded_amount: round_currency(remaining),
                    partially_funded: true,
                    entry,
                });
            }
            break;
        }
    }

    if funded.len() < total {
        warn!(
            funded = funded.len(),
            total, "replacement schedule truncated by budget ceiling"
        );
    }

    Ok(funded)
}
