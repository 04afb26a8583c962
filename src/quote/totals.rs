//! Quote-level totals.

use rust_decimal::Decimal;
use serde::Serialize;

use super::accommodation::{summary_total, RoomTypeSummary};
use super::calculators::{self, items_total};
use super::models::{CategoryId, CostCategory};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub id: CategoryId,
    pub name: String,
    pub total: Decimal,
}

/// Per-category totals and the grand total
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuoteTotals {
    pub categories: Vec<CategoryTotal>,
    pub total_cost: Decimal,
}

impl QuoteTotals {
    pub fn category(&self, id: CategoryId) -> Decimal {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.total)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Category total. Accommodation comes from the room-type summary, every other
/// category is the sum of its item totals.
pub fn category_total(category: &CostCategory, room_types: &[RoomTypeSummary]) -> Decimal {
    match category.id {
        CategoryId::Accommodation => summary_total(room_types),
        _ => items_total(&category.items),
    }
}

/// Recompute every total from current item state.
pub fn aggregate(categories: &[CostCategory], room_types: &[RoomTypeSummary]) -> QuoteTotals {
    let categories: Vec<CategoryTotal> = categories
        .iter()
        .map(|category| CategoryTotal {
            id: category.id,
            name: category.name.clone(),
            total: category_total(category, room_types),
        })
        .collect();

    let total_cost = calculators::sum(categories.iter().map(|c| c.total));

    QuoteTotals {
        categories,
        total_cost,
    }
}
