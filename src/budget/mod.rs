//! Budget planning: capex/opex categorization with a risk buffer
//!
//! Historical cost records are mapped into budget categories through an
//! overridable allocation policy, projected replacement costs for the target
//! year are added, and the final recommendation carries a proportional risk
//! buffer.

mod planner;
mod types;

pub use planner::build_plan;
pub use types::{
    AllocationPolicy, BudgetCategory, BudgetPlan, BudgetRequest, CapexBreakdown, OpexBreakdown,
};
