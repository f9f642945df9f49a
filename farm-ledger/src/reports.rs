//! Cost reporting over a date window
//!
//! Aggregates fuel, maintenance and purchase spending into one report.
//! Purchases only count once FULFILLED, dated by their fulfillment and
//! valued at current warehouse unit prices; they belong to the farm as a
//! whole, not to any machine.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{Farm, PurchaseOrderStatus};
use std::collections::{BTreeMap, BTreeSet};

/// Cost categories selectable in a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostCategory {
    Fuel,
    Maintenance,
    Purchases,
}

/// Report query: a closed date window plus optional filters
///
/// `machine_ids: None` means every machine; purchase costs are unaffected
/// by the machine filter since they are not machine-bound.
#[derive(Debug, Clone)]
pub struct CostQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub machine_ids: Option<BTreeSet<String>>,
    pub categories: BTreeSet<CostCategory>,
}

impl CostQuery {
    /// Query covering all categories and machines in the window
    pub fn for_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            machine_ids: None,
            categories: [
                CostCategory::Fuel,
                CostCategory::Maintenance,
                CostCategory::Purchases,
            ]
            .into_iter()
            .collect(),
        }
    }

    fn wants(&self, category: CostCategory) -> bool {
        self.categories.contains(&category)
    }

    fn in_window(&self, date: DateTime<Utc>) -> bool {
        date >= self.start && date <= self.end
    }

    fn machine_selected(&self, machine_id: &str) -> bool {
        match &self.machine_ids {
            Some(ids) => ids.contains(machine_id),
            None => true,
        }
    }
}

/// One point of the cumulative spending curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub cumulative_cost: f64,
}

/// Aggregated spending for one query window
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReport {
    pub total_cost: f64,
    pub fuel_cost: f64,
    pub maintenance_cost: f64,
    pub purchase_cost: f64,
    /// Per-machine spend; purchases are excluded (farm-wide)
    pub cost_by_machine: BTreeMap<String, f64>,
    /// Running total of every matched expense, ordered by date
    pub cost_trend: Vec<TrendPoint>,
}

struct Expense {
    date: DateTime<Utc>,
    cost: f64,
    category: CostCategory,
    machine_id: Option<String>,
}

/// Build a cost report from the current farm state
pub fn cost_report(farm: &Farm, query: &CostQuery) -> CostReport {
    let mut expenses: Vec<Expense> = Vec::new();

    if query.wants(CostCategory::Fuel) {
        for log in &farm.fuel_logs {
            if query.in_window(log.date) && query.machine_selected(&log.machine_id) {
                expenses.push(Expense {
                    date: log.date,
                    cost: log.total_value,
                    category: CostCategory::Fuel,
                    machine_id: Some(log.machine_id.clone()),
                });
            }
        }
    }
    if query.wants(CostCategory::Maintenance) {
        for log in &farm.maintenance_logs {
            if query.in_window(log.date) && query.machine_selected(&log.machine_id) {
                expenses.push(Expense {
                    date: log.date,
                    cost: log.total_cost,
                    category: CostCategory::Maintenance,
                    machine_id: Some(log.machine_id.clone()),
                });
            }
        }
    }
    if query.wants(CostCategory::Purchases) {
        for order in &farm.purchase_orders {
            if order.status != PurchaseOrderStatus::Fulfilled {
                continue;
            }
            let Some(fulfilled_date) = order.fulfilled_date else {
                continue;
            };
            if !query.in_window(fulfilled_date) {
                continue;
            }
            // An order line for a since-deleted item contributes zero.
            let cost: f64 = order
                .items
                .iter()
                .map(|line| {
                    farm.warehouse_item(&line.item_id)
                        .map(|item| item.unit_value * line.quantity)
                        .unwrap_or(0.0)
                })
                .sum();
            expenses.push(Expense {
                date: fulfilled_date,
                cost,
                category: CostCategory::Purchases,
                machine_id: None,
            });
        }
    }

    expenses.sort_by_key(|e| e.date);

    let mut report = CostReport::default();
    let mut cumulative = 0.0;
    for expense in &expenses {
        report.total_cost += expense.cost;
        match expense.category {
            CostCategory::Fuel => report.fuel_cost += expense.cost,
            CostCategory::Maintenance => report.maintenance_cost += expense.cost,
            CostCategory::Purchases => report.purchase_cost += expense.cost,
        }
        if let Some(machine_id) = &expense.machine_id {
            *report.cost_by_machine.entry(machine_id.clone()).or_default() += expense.cost;
        }
        cumulative += expense.cost;
        report.cost_trend.push(TrendPoint {
            date: expense.date,
            cumulative_cost: cumulative,
        });
    }
    report
}
