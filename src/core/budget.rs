use std::collections::BTreeMap;

use serde::Deserialize;

use crate::models::{
    BudgetProfile, BudgetRange, BudgetStatus, Category, Compilation, CompilationItem,
    CompilationSummary, PriceLevel,
};

/// Default unit cost per price level
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PriceCostTable {
    #[serde(default = "default_budget_cost")]
    pub budget: f64,
    #[serde(default = "default_moderate_cost")]
    pub moderate: f64,
    #[serde(default = "default_expensive_cost")]
    pub expensive: f64,
    #[serde(default = "default_luxury_cost")]
    pub luxury: f64,
    #[serde(default = "default_unknown_cost")]
    pub unknown: f64,
}

fn default_budget_cost() -> f64 { 25.0 }
fn default_moderate_cost() -> f64 { 75.0 }
fn default_expensive_cost() -> f64 { 150.0 }
fn default_luxury_cost() -> f64 { 300.0 }
fn default_unknown_cost() -> f64 { 50.0 }

impl Default for PriceCostTable {
    fn default() -> Self {
        Self {
            budget: default_budget_cost(),
            moderate: default_moderate_cost(),
            expensive: default_expensive_cost(),
            luxury: default_luxury_cost(),
            unknown: default_unknown_cost(),
        }
    }
}

impl PriceCostTable {
    #[inline]
    pub fn cost(&self, level: PriceLevel) -> f64 {
        match level {
            PriceLevel::Budget => self.budget,
            PriceLevel::Moderate => self.moderate,
            PriceLevel::Expensive => self.expensive,
            PriceLevel::Luxury => self.luxury,
            PriceLevel::None => self.unknown,
        }
    }
}

/// Budget ceiling per budget range
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BudgetRangeTable {
    #[serde(default = "default_low_ceiling")]
    pub low: f64,
    #[serde(default = "default_medium_ceiling")]
    pub medium: f64,
    #[serde(default = "default_high_ceiling")]
    pub high: f64,
}

fn default_low_ceiling() -> f64 { 100.0 }
fn default_medium_ceiling() -> f64 { 300.0 }
fn default_high_ceiling() -> f64 { 800.0 }

impl Default for BudgetRangeTable {
    fn default() -> Self {
        Self {
            low: default_low_ceiling(),
            medium: default_medium_ceiling(),
            high: default_high_ceiling(),
        }
    }
}

impl BudgetRangeTable {
    pub fn ceiling(&self, profile: &BudgetProfile) -> f64 {
        match profile {
            BudgetProfile::Amount(amount) => *amount,
            BudgetProfile::Range(BudgetRange::Low) => self.low,
            BudgetProfile::Range(BudgetRange::Medium) => self.medium,
            BudgetProfile::Range(BudgetRange::High) => self.high,
        }
    }
}

/// Read-only statistics over a compilation's active items
#[derive(Debug, Clone, Default)]
pub struct CompilationAggregator {
    costs: PriceCostTable,
    ranges: BudgetRangeTable,
}

impl CompilationAggregator {
    pub fn new(costs: PriceCostTable, ranges: BudgetRangeTable) -> Self {
        Self { costs, ranges }
    }

    /// Number of active items
    pub fn total_items(&self, compilation: &Compilation) -> usize {
        compilation.active_items().count()
    }

    /// Cost of one item: its override when set, else the price-level default.
    ///
    /// Negative or non-finite overrides are ignored.
    #[inline]
    pub fn effective_cost(&self, item: &CompilationItem) -> f64 {
        item.estimated_cost
            .filter(|cost| cost.is_finite() && *cost >= 0.0)
            .unwrap_or_else(|| self.costs.cost(item.attraction.price_level))
    }

    /// Sum of effective costs over active items
    pub fn estimated_budget(&self, compilation: &Compilation) -> f64 {
        compilation
            .active_items()
            .map(|item| self.effective_cost(item))
            .sum()
    }

    /// Classify an estimate against a ceiling.
    ///
    /// Up to and including 70% is under budget, up to and including 100% is
    /// on budget. Compared in scaled form so that exact boundaries are stable.
    pub fn status_for(&self, estimated: f64, ceiling: f64) -> BudgetStatus {
        if estimated * 10.0 <= ceiling * 7.0 {
            BudgetStatus::UnderBudget
        } else if estimated <= ceiling {
            BudgetStatus::OnBudget
        } else {
            BudgetStatus::OverBudget
        }
    }

    pub fn budget_status(&self, compilation: &Compilation, ceiling: f64) -> BudgetStatus {
        self.status_for(self.estimated_budget(compilation), ceiling)
    }

    /// Active items grouped by coarse category
    pub fn category_breakdown(&self, compilation: &Compilation) -> BTreeMap<Category, usize> {
        let mut breakdown = BTreeMap::new();
        for item in compilation.active_items() {
            *breakdown.entry(item.attraction.category).or_insert(0) += 1;
        }
        breakdown
    }

    /// Resolve a budget profile to its ceiling
    pub fn ceiling(&self, profile: &BudgetProfile) -> f64 {
        self.ranges.ceiling(profile)
    }

    /// All statistics in one pass-friendly call
    pub fn summarize(
        &self,
        compilation: &Compilation,
        profile: Option<&BudgetProfile>,
    ) -> CompilationSummary {
        let estimated_budget = self.estimated_budget(compilation);
        let budget_ceiling = profile.map(|p| self.ceiling(p));

        CompilationSummary {
            total_items: self.total_items(compilation),
            visited_items: compilation.active_items().filter(|i| i.is_visited).count(),
            estimated_budget,
            budget_ceiling,
            budget_status: budget_ceiling.map(|c| self.status_for(estimated_budget, c)),
            category_breakdown: self.category_breakdown(compilation),
        }
    }
}
