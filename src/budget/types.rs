//! Type definitions for budget planning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::history::CostType;

/// Budget category a cost amount lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    /// Capex: first-time acquisitions
    NewPurchases,
    /// Capex: scheduled replacements
    Replacements,
    /// Capex: upgrades to existing assets
    Upgrades,
    /// Opex: repair and upkeep
    Maintenance,
    /// Opex: vendor and internal support
    Support,
    /// Opex: software licensing
    Licenses,
    /// Opex: recurring operational spend
    Operational,
}

impl BudgetCategory {
    /// Whether the category sits on the capital side of the plan
    pub fn is_capex(self) -> bool {
        matches!(
            self,
            BudgetCategory::NewPurchases | BudgetCategory::Replacements | BudgetCategory::Upgrades
        )
    }
}

/// Mapping from cost types to the budget categories they fund
///
/// When a cost type maps to more than one category the amount is split evenly
/// across them. The even split is a declared simplification; replace the
/// policy wholesale to substitute a weighted allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationPolicy {
    categories: HashMap<CostType, Vec<BudgetCategory>>,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        let mut categories = HashMap::new();
        categories.insert(
            CostType::Purchase,
            vec![BudgetCategory::NewPurchases, BudgetCategory::Replacements],
        );
        categories.insert(CostType::Upgrade, vec![BudgetCategory::Upgrades]);
        categories.insert(CostType::Maintenance, vec![BudgetCategory::Maintenance]);
        categories.insert(CostType::Support, vec![BudgetCategory::Support]);
        categories.insert(CostType::License, vec![BudgetCategory::Licenses]);
        categories.insert(CostType::Other, vec![BudgetCategory::Operational]);
        Self { categories }
    }
}

impl AllocationPolicy {
    /// Replace the categories a cost type allocates to
    pub fn set(&mut self, cost_type: CostType, categories: Vec<BudgetCategory>) {
        self.categories.insert(cost_type, categories);
    }

    /// Categories a cost type funds; empty when the type is unmapped
    pub fn categories_for(&self, cost_type: CostType) -> &[BudgetCategory] {
        self.categories
            .get(&cost_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Capital expenditure breakdown
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CapexBreakdown {
    /// First-time acquisitions
    pub new_purchases: f64,
    /// Scheduled and projected replacements
    pub replacements: f64,
    /// Upgrades to existing assets
    pub upgrades: f64,
}

impl CapexBreakdown {
    /// Sum across all capex categories
    pub fn total(&self) -> f64 {
        self.new_purchases + self.replacements + self.upgrades
    }
}

/// Operating expenditure breakdown
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OpexBreakdown {
    /// Repair and upkeep
    pub maintenance: f64,
    /// Vendor and internal support
    pub support: f64,
    /// Software licensing
    pub licenses: f64,
    /// Recurring operational spend
    pub operational: f64,
}

impl OpexBreakdown {
    /// Sum across all opex categories
    pub fn total(&self) -> f64 {
        self.maintenance + self.support + self.licenses + self.operational
    }
}

/// Budget planning request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRequest {
    /// Restrict cost records to one cost center
    pub cost_center: Option<String>,
    /// Year the plan targets
    pub budget_year: i32,
    /// Include the capital side
    pub include_capex: bool,
    /// Include the operating side
    pub include_opex: bool,
    /// Proportional markup absorbing forecast uncertainty
    pub risk_buffer: f64,
}

impl BudgetRequest {
    /// Request for a target year with both sides included and the default buffer
    pub fn for_year(budget_year: i32) -> Self {
        Self {
            cost_center: None,
            budget_year,
            include_capex: true,
            include_opex: true,
            risk_buffer: 0.10,
        }
    }
}

/// Categorized budget recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPlan {
    /// Year the plan targets
    pub budget_year: i32,
    /// Cost center the plan was restricted to, if any
    pub cost_center: Option<String>,
    /// Capital side; zeroed when excluded by the request
    pub capex: CapexBreakdown,
    /// Operating side; zeroed when excluded by the request
    pub opex: OpexBreakdown,
    /// Replacement costs projected into the target year
    pub projected_replacements: f64,
    /// Capex + opex before the buffer
    pub subtotal: f64,
    /// Buffer rate applied to the subtotal
    pub risk_buffer: f64,
    /// Final recommendation including the buffer
    pub recommended_total: f64,
}
