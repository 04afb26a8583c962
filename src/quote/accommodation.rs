//! Room-type summary for the accommodation category.
//!
//! Rooms are grouped by day. Within a day the order of entry decides the slot,
//! and slot `k` is taken to be the same room type on every day.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{self, round_money};
use super::models::CostItem;

/// Totals for one room-type slot across all days
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomTypeSummary {
    pub name: String,
    /// Sum of the slot's item totals over every day that has the slot
    pub total_cost: Decimal,
    pub average_cost: Decimal,
    /// Number of days contributing to the slot
    pub days: u32,
}

/// Group dated accommodation items by day, ascending. Undated items are skipped.
pub fn group_by_day(items: &[CostItem]) -> BTreeMap<u32, Vec<&CostItem>> {
    let mut days: BTreeMap<u32, Vec<&CostItem>> = BTreeMap::new();
    for item in items {
        if let Some(day) = item.day {
            days.entry(day).or_default().push(item);
        }
    }
    days
}

pub fn fallback_label(slot: usize) -> String {
    format!("Room type {}", slot + 1)
}

/// Build the per-slot summary from the accommodation items.
pub fn summarize(items: &[CostItem]) -> Vec<RoomTypeSummary> {
    let days = group_by_day(items);
    let slots = days.values().map(Vec::len).max().unwrap_or(0);

    (0..slots)
        .map(|slot| {
            let in_slot: Vec<&CostItem> = days
                .values()
                .filter_map(|rooms| rooms.get(slot).copied())
                .collect();

            let total_cost = calculators::sum(in_slot.iter().map(|item| item.total()));
            let valid_days = in_slot.len() as u32;
            let average_cost = if valid_days > 0 {
                round_money(total_cost / Decimal::from(valid_days), 2)
            } else {
                Decimal::ZERO
            };

            let name = in_slot
                .iter()
                .map(|item| item.label().trim())
                .find(|label| !label.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| fallback_label(slot));

            RoomTypeSummary {
                name,
                total_cost,
                average_cost,
                days: valid_days,
            }
        })
        .collect()
}

/// Accommodation category total: the sum of the per-slot totals.
pub fn summary_total(summary: &[RoomTypeSummary]) -> Decimal {
    calculators::sum(summary.iter().map(|room| room.total_cost))
}
