//! Core pricing calculation functions.
//!
//! Pure functions for per-item cost math. Every item total is rounded up to
//! a whole amount.

use rust_decimal::prelude::*;

use super::models::{CategoryId, CostItem, ItemRole};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Used for display figures such as averages, never for item totals.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use quote_engine::quote::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Round a raw cost up to the next whole amount.
pub fn ceil_total(amount: Decimal) -> Decimal {
    amount.ceil()
}

/// Quantity used in arithmetic: an unset (zero) quantity counts as one.
pub fn effective_quantity(quantity: u32) -> Decimal {
    match quantity {
        0 => Decimal::ONE,
        n => Decimal::from(n),
    }
}

/// Divisor used for group splits: a group of zero counts as one.
pub fn effective_group_size(group_size: u32) -> Decimal {
    Decimal::from(group_size.max(1))
}

pub(crate) fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(Decimal::MAX)
}

pub(crate) fn add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| saturated(b.is_sign_negative()))
}

pub(crate) fn sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| saturated(!b.is_sign_negative()))
}

fn saturated(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

pub(crate) fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, add)
}

/// Calculate an item's total for the category it belongs to.
///
/// * meals, activities, others: `ceil(quantity * unit_price)`
/// * accommodation: `ceil(unit_price / occupants)`, the price being the whole room
/// * transport, guide and group transport: the plain product, or the product split
///   across the group when the item is a group cost and the group has more than one
///   person
/// * the guide allocation row on group transport: `ceil(unit_price)`, the price
///   already being per person
pub fn item_total(category: CategoryId, item: &CostItem, group_size: u32) -> Decimal {
    let quantity = item.effective_quantity();
    let price = item.unit_price.max(Decimal::ZERO);

    match category {
        CategoryId::Meals | CategoryId::Activities | CategoryId::Others => {
            ceil_total(mul(quantity, price))
        }
        CategoryId::Accommodation => ceil_total(price / quantity),
        CategoryId::GroupTransport if item.role == ItemRole::GuideAllocation => ceil_total(price),
        CategoryId::Transport | CategoryId::GroupTransport | CategoryId::Guide => {
            shared_total(item.is_group_cost, quantity, price, group_size)
        }
    }
}

fn shared_total(is_group_cost: bool, quantity: Decimal, price: Decimal, group_size: u32) -> Decimal {
    let amount = mul(quantity, price);
    if is_group_cost && group_size > 1 {
        ceil_total(amount / effective_group_size(group_size))
    } else {
        ceil_total(amount)
    }
}

/// Recompute and store the totals of every item in a category.
pub fn resolve_items(category: CategoryId, items: &mut [CostItem], group_size: u32) {
    for item in items.iter_mut() {
        let total = item_total(category, item, group_size);
        item.set_total(total);
    }
}

/// Sum of item totals
pub fn items_total(items: &[CostItem]) -> Decimal {
    sum(items.iter().map(CostItem::total))
}
