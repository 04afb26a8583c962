//! Derived guide allocation.
//!
//! The tour leader's first-room-type bed and personal transport are paid for by
//! the group. The per-person share is pushed one way into the guide allocation
//! rows of group transport.

use rust_decimal::Decimal;
use serde::Serialize;

use super::accommodation::group_by_day;
use super::calculators::{self, ceil_total, item_total, mul};
use super::models::{CategoryId, CostCategory, CostItem, ItemRole};

/// Inputs and result of the guide cost derivation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GuideCost {
    /// Sum over days of the first room type's room price
    pub daily_first_room_cost: Decimal,
    /// Sum of non-group transport costs
    pub personal_transport_cost: Decimal,
    pub group_size: u32,
    pub per_person: Decimal,
}

/// Sum of the slot-0 room price (not its split total) over every day.
pub fn daily_first_room_cost(accommodation: &[CostItem]) -> Decimal {
    calculators::sum(
        group_by_day(accommodation)
            .values()
            .filter_map(|rooms| rooms.first())
            .map(|room| room.unit_price),
    )
}

/// Sum of `quantity * unit_price` over transport items not split across the group.
pub fn personal_transport_cost(transport: &[CostItem]) -> Decimal {
    calculators::sum(
        transport
            .iter()
            .filter(|item| !item.is_group_cost)
            .map(|item| mul(item.effective_quantity(), item.unit_price)),
    )
}

pub fn derive(accommodation: &[CostItem], transport: &[CostItem], group_size: u32) -> GuideCost {
    let daily_first_room_cost = daily_first_room_cost(accommodation);
    let personal_transport_cost = personal_transport_cost(transport);

    let per_person = if group_size > 0 {
        ceil_total(
            calculators::add(daily_first_room_cost, personal_transport_cost)
                / Decimal::from(group_size),
        )
    } else {
        Decimal::ZERO
    };

    GuideCost {
        daily_first_room_cost,
        personal_transport_cost,
        group_size,
        per_person,
    }
}

/// Write the per-person cost into every guide allocation row of the group
/// transport category and re-resolve those rows. Returns how many rows were written.
pub fn apply(group_transport: &mut CostCategory, per_person: Decimal, group_size: u32) -> usize {
    debug_assert_eq!(group_transport.id, CategoryId::GroupTransport);

    let mut written = 0;
    for item in group_transport
        .items
        .iter_mut()
        .filter(|item| item.role == ItemRole::GuideAllocation)
    {
        item.unit_price = per_person;
        let total = item_total(CategoryId::GroupTransport, item, group_size);
        item.set_total(total);
        written += 1;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn room(day: u32, price: Decimal) -> CostItem {
        CostItem {
            day: Some(day),
            quantity: 2,
            unit_price: price,
            ..CostItem::new("Twin")
        }
    }

    fn transport(quantity: u32, price: Decimal, is_group_cost: bool) -> CostItem {
        CostItem {
            quantity,
            unit_price: price,
            is_group_cost,
            ..CostItem::new("Transfer")
        }
    }

    #[test]
    fn test_first_room_cost_uses_slot_zero_price() {
        let rooms = vec![
            room(1, dec!(3000)),
            room(1, dec!(9000)),
            room(2, dec!(3200)),
            CostItem {
                day: None,
                ..room(3, dec!(5000))
            },
        ];
        assert_eq!(daily_first_room_cost(&rooms), dec!(6200));
    }

    #[test]
    fn test_personal_transport_skips_group_costs() {
        let items = vec![
            transport(0, dec!(250), false),
            transport(1, dec!(350), false),
            transport(1, dec!(40000), true),
        ];
        assert_eq!(personal_transport_cost(&items), dec!(600));
    }

    #[test]
    fn test_derive_per_person_share() {
        let rooms = vec![room(1, dec!(3000)), room(2, dec!(3200))];
        let items = vec![transport(2, dec!(300), false)];

        let cost = derive(&rooms, &items, 4);
        assert_eq!(cost.daily_first_room_cost, dec!(6200));
        assert_eq!(cost.personal_transport_cost, dec!(600));
        assert_eq!(cost.per_person, dec!(1700));
    }

    #[test]
    fn test_derive_rounds_up() {
        let rooms = vec![room(1, dec!(1000))];
        let cost = derive(&rooms, &[], 3);
        assert_eq!(cost.per_person, dec!(334));
    }

    #[test]
    fn test_derive_zero_group_yields_zero() {
        let rooms = vec![room(1, dec!(1000))];
        assert_eq!(derive(&rooms, &[], 0).per_person, Decimal::ZERO);
    }

    #[test]
    fn test_apply_writes_only_guide_rows() {
        let mut category = CostCategory::new(CategoryId::GroupTransport);
        category.items.push(CostItem {
            quantity: 1,
            unit_price: dec!(8000),
            is_group_cost: true,
            ..CostItem::new("Coach")
        });
        category
            .items
            .push(CostItem::new("Guide allocation").with_role(ItemRole::GuideAllocation));

        let written = apply(&mut category, dec!(1700), 4);
        assert_eq!(written, 1);
        assert_eq!(category.items[0].unit_price, dec!(8000));
        assert_eq!(category.items[1].unit_price, dec!(1700));
        assert_eq!(category.items[1].total(), dec!(1700));
    }

    #[test]
    fn test_apply_without_guide_rows_writes_nothing() {
        let mut category = CostCategory::new(CategoryId::GroupTransport);
        category.items.push(CostItem::new("Coach"));
        assert_eq!(apply(&mut category, dec!(1700), 4), 0);
        assert_eq!(category.items[0].unit_price, Decimal::ZERO);
    }
}
