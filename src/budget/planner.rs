//! Budget plan assembly

use tracing::debug;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::history::{round_currency, CostRecord, LifecycleRecord, OperationalCostRecord};

use super::types::{
    AllocationPolicy, BudgetCategory, BudgetPlan, BudgetRequest, CapexBreakdown, OpexBreakdown,
};

/// Build a categorized budget recommendation for the target year
pub fn build_plan(
    request: &BudgetRequest,
    cost_records: &[CostRecord],
    operational: &[OperationalCostRecord],
    lifecycles: &[LifecycleRecord],
    policy: &AllocationPolicy,
) -> AnalyticsResult<BudgetPlan> {
    if !request.risk_buffer.is_finite() || request.risk_buffer < 0.0 {
        return Err(AnalyticsError::invalid(
            "risk_buffer",
            "must be a non-negative decimal rate",
        ));
    }

    let mut capex = CapexBreakdown::default();
    let mut opex = OpexBreakdown::default();

    for record in cost_records {
        if let Some(center) = &request.cost_center {
            if &record.cost_center != center {
                continue;
            }
        }
        let categories = policy.categories_for(record.cost_type);
        if categories.is_empty() {
            continue;
        }
        let share = record.amount / categories.len() as f64;
        for category in categories {
            allocate(&mut capex, &mut opex, *category, share);
        }
    }

    // Recurring ledger spend lands on the operational opex line
    for record in operational {
        opex.operational += record.total();
    }

    // Replacements already scheduled into the target year
    let mut projected_replacements = 0.0;
    for lifecycle in lifecycles {
        if lifecycle.replacement_budget_year == Some(request.budget_year) {
            projected_replacements += lifecycle.estimated_replacement_cost;
        }
    }
    capex.replacements += projected_replacements;

    if !request.include_capex {
        capex = CapexBreakdown::default();
        projected_replacements = 0.0;
    }
    if !request.include_opex {
        opex = OpexBreakdown::default();
    }

    let subtotal = capex.total() + opex.total();
    let recommended_total = subtotal * (1.0 + request.risk_buffer);
    debug!(
        year = request.budget_year,
        subtotal, recommended_total, "assembled budget plan"
    );

    Ok(BudgetPlan {
        budget_year: request.budget_year,
        cost_center: request.cost_center.clone(),
        capex: CapexBreakdown {
            new_purchases: round_currency(capex.new_purchases),
            replacements: round_currency(capex.replacements),
            upgrades: round_currency(capex.upgrades),
        },
        opex: OpexBreakdown {
            maintenance: round_currency(opex.maintenance),
            support: round_currency(opex.support),
            licenses: round_currency(opex.licenses),
            operational: round_currency(opex.operational),
        },
        projected_replacements: round_currency(projected_replacements),
        subtotal: round_currency(subtotal),
        risk_buffer: request.risk_buffer,
        recommended_total: round_currency(recommended_total),
    })
}

fn allocate(
    capex: &mut CapexBreakdown,
    opex: &mut OpexBreakdown,
    category: BudgetCategory,
    share: f64,
) {
    match category {
        BudgetCategory::NewPurchases => capex.new_purchases += share,
        BudgetCategory::Replacements => capex.replacements += share,
        BudgetCategory::Upgrades => capex.upgrades += share,
        BudgetCategory::Maintenance => opex.maintenance += share,
        BudgetCategory::Support => opex.support += share,
        BudgetCategory::Licenses => opex.licenses += share,
        BudgetCategory::Operational => opex.operational += share,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::CostType;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn cost(cost_type: CostType, amount: f64, center: &str) -> CostRecord {
        CostRecord {
            asset_id: Uuid::new_v4(),
            cost_type,
            amount,
            cost_center: center.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
        }
    }

    fn lifecycle(year: Option<i32>, replacement_cost: f64) -> LifecycleRecord {
        LifecycleRecord {
            asset_id: Uuid::new_v4(),
            purchase_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            warranty_end_date: None,
            manufacturer_eol_date: None,
            internal_eol_date: None,
            replacement_cycle_months: None,
            estimated_replacement_cost: replacement_cost,
            replacement_budget_year: year,
            replacement_budget_quarter: year.map(|_| 2),
        }
    }

    #[test]
    fn purchase_amounts_split_evenly_across_capex_categories() {
        let records = vec![cost(CostType::Purchase, 10_000.0, "IT-OPS")];
        let plan = build_plan(
            &BudgetRequest::for_year(2026),
            &records,
            &[],
            &[],
            &AllocationPolicy::default(),
        )
        .unwrap();

        assert_eq!(plan.capex.new_purchases, 5000.0);
        assert_eq!(plan.capex.replacements, 5000.0);
        assert_eq!(plan.opex.total(), 0.0);
    }

    #[test]
    fn single_category_types_land_whole() {
        let records = vec![
            cost(CostType::Maintenance, 1200.0, "IT-OPS"),
            cost(CostType::License, 800.0, "IT-OPS"),
            cost(CostType::Other, 500.0, "IT-OPS"),
        ];
        let plan = build_plan(
            &BudgetRequest::for_year(2026),
            &records,
            &[],
            &[],
            &AllocationPolicy::default(),
        )
        .unwrap();

        assert_eq!(plan.opex.maintenance, 1200.0);
        assert_eq!(plan.opex.licenses, 800.0);
        assert_eq!(plan.opex.operational, 500.0);
        assert_eq!(plan.capex.total(), 0.0);
    }

    #[test]
    fn replacement_projections_match_only_the_target_year() {
        let lifecycles = vec![
            lifecycle(Some(2026), 4000.0),
            lifecycle(Some(2027), 9000.0),
            lifecycle(None, 2500.0),
        ];
        let plan = build_plan(
            &BudgetRequest::for_year(2026),
            &[],
            &[],
            &lifecycles,
            &AllocationPolicy::default(),
        )
        .unwrap();

        assert_eq!(plan.projected_replacements, 4000.0);
        assert_eq!(plan.capex.replacements, 4000.0);
    }

    #[test]
    fn risk_buffer_marks_up_the_subtotal() {
        let records = vec![cost(CostType::Maintenance, 1000.0, "IT-OPS")];
        let plan = build_plan(
            &BudgetRequest::for_year(2026),
            &records,
            &[],
            &[],
            &AllocationPolicy::default(),
        )
        .unwrap();

        assert_eq!(plan.subtotal, 1000.0);
        assert_eq!(plan.recommended_total, 1100.0);
    }

    #[test]
    fn cost_center_filter_excludes_other_centers() {
        let records = vec![
            cost(CostType::Maintenance, 1000.0, "IT-OPS"),
            cost(CostType::Maintenance, 700.0, "R-AND-D"),
        ];
        let request = BudgetRequest {
            cost_center: Some("IT-OPS".to_string()),
            ..BudgetRequest::for_year(2026)
        };
        let plan = build_plan(&request, &records, &[], &[], &AllocationPolicy::default()).unwrap();

        assert_eq!(plan.opex.maintenance, 1000.0);
    }

    #[test]
    fn excluded_sides_are_zeroed() {
        let records = vec![
            cost(CostType::Purchase, 6000.0, "IT-OPS"),
            cost(CostType::Support, 900.0, "IT-OPS"),
        ];
        let request = BudgetRequest {
            include_capex: false,
            ..BudgetRequest::for_year(2026)
        };
        let plan = build_plan(&request, &records, &[], &[], &AllocationPolicy::default()).unwrap();

        assert_eq!(plan.capex.total(), 0.0);
        assert_eq!(plan.opex.support, 900.0);
        assert_eq!(plan.subtotal, 900.0);
    }

    #[test]
    fn negative_risk_buffer_fails_fast() {
        let request = BudgetRequest {
            risk_buffer: -0.1,
            ..BudgetRequest::for_year(2026)
        };
        let result = build_plan(&request, &[], &[], &[], &AllocationPolicy::default());
        assert!(matches!(
            result,
            Err(AnalyticsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn overridden_policy_redirects_allocation() {
        let mut policy = AllocationPolicy::default();
        policy.set(CostType::Purchase, vec![BudgetCategory::NewPurchases]);

        let records = vec![cost(CostType::Purchase, 10_000.0, "IT-OPS")];
        let plan = build_plan(&BudgetRequest::for_year(2026), &records, &[], &[], &policy).unwrap();

        assert_eq!(plan.capex.new_purchases, 10_000.0);
        assert_eq!(plan.capex.replacements, 0.0);
    }
}
