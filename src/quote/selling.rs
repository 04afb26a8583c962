//! Per-traveller costs, selling prices and profit.
//!
//! The base cost of every identity assumes the first room type. Other room
//! types are priced by swapping the first room's share for theirs.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::accommodation::RoomTypeSummary;
use super::calculators::{self, ceil_total, mul, sub};
use super::guide;
use super::input;
use super::models::{CategoryId, ItemRole, Quote};

/// Headcount per traveller type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantCounts {
    #[serde(default, deserialize_with = "input::deserialize_quantity")]
    pub adult: u32,
    #[serde(default, deserialize_with = "input::deserialize_quantity")]
    pub child_with_bed: u32,
    #[serde(default, deserialize_with = "input::deserialize_quantity")]
    pub child_no_bed: u32,
    #[serde(default, deserialize_with = "input::deserialize_quantity")]
    pub single_room: u32,
    #[serde(default, deserialize_with = "input::deserialize_quantity")]
    pub infant: u32,
}

impl ParticipantCounts {
    /// Travellers sharing group costs. Infants are not counted.
    pub fn group_size(&self) -> u32 {
        self.adult
            .saturating_add(self.child_with_bed)
            .saturating_add(self.child_no_bed)
            .saturating_add(self.single_room)
    }

    /// Everyone the guide accompanies, infants included
    pub fn guide_group_size(&self) -> u32 {
        self.group_size().saturating_add(self.infant)
    }
}

/// Selling prices for one extra room type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomTypePrices {
    #[serde(default, deserialize_with = "input::deserialize_price")]
    pub adult: Decimal,
    #[serde(default, deserialize_with = "input::deserialize_price")]
    pub child: Decimal,
}

/// Selling price per traveller identity, plus per room type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SellingPrices {
    #[serde(default, deserialize_with = "input::deserialize_price")]
    pub adult: Decimal,
    #[serde(default, deserialize_with = "input::deserialize_price")]
    pub child_with_bed: Decimal,
    #[serde(default, deserialize_with = "input::deserialize_price")]
    pub child_no_bed: Decimal,
    #[serde(default, deserialize_with = "input::deserialize_price")]
    pub single_room: Decimal,
    #[serde(default, deserialize_with = "input::deserialize_price")]
    pub infant: Decimal,
    /// Keyed by room-type summary name
    #[serde(default)]
    pub room_types: BTreeMap<String, RoomTypePrices>,
}

/// Cost per traveller identity
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdentityCosts {
    pub adult: Decimal,
    pub child_with_bed: Decimal,
    pub child_no_bed: Decimal,
    pub single_room: Decimal,
    pub infant: Decimal,
}

/// Selling price minus cost, per identity. May be negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdentityProfits {
    pub adult: Decimal,
    pub child_with_bed: Decimal,
    pub child_no_bed: Decimal,
    pub single_room: Decimal,
    pub infant: Decimal,
}

/// Headcount-weighted figures for the whole party
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfitSummary {
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomOccupant {
    Adult,
    Child,
}

/// Cost and profit of an alternative room type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomTypeProfit {
    pub name: String,
    pub adult_cost: Decimal,
    pub child_cost: Decimal,
    pub adult_price: Decimal,
    pub child_price: Decimal,
    pub adult_profit: Decimal,
    pub child_profit: Decimal,
}

fn first_room_cost(room_types: &[RoomTypeSummary]) -> Decimal {
    room_types
        .first()
        .map(|room| ceil_total(room.total_cost))
        .unwrap_or(Decimal::ZERO)
}

/// Costs per identity from the settled quote state.
///
/// Shared costs are every non-accommodation item that is not a ticket.
/// Travellers with a bed take the first room type's share; a single room pays
/// the whole first-room price each night.
pub fn identity_costs(quote: &Quote, room_types: &[RoomTypeSummary]) -> IdentityCosts {
    let mut shared = Decimal::ZERO;
    let mut adult_tickets = Decimal::ZERO;
    let mut child_tickets = Decimal::ZERO;
    let mut infant_tickets = Decimal::ZERO;

    for category in quote.categories() {
        if category.id == CategoryId::Accommodation {
            continue;
        }
        for item in &category.items {
            let bucket = match item.role {
                ItemRole::AdultTicket => &mut adult_tickets,
                ItemRole::ChildTicket => &mut child_tickets,
                ItemRole::InfantTicket => &mut infant_tickets,
                ItemRole::Standard | ItemRole::GuideAllocation => &mut shared,
            };
            *bucket = calculators::add(*bucket, item.total());
        }
    }

    let first_room = first_room_cost(room_types);
    let whole_room = ceil_total(guide::daily_first_room_cost(
        &quote.category(CategoryId::Accommodation).items,
    ));

    IdentityCosts {
        adult: calculators::sum([shared, adult_tickets, first_room]),
        child_with_bed: calculators::sum([shared, child_tickets, first_room]),
        child_no_bed: calculators::add(shared, child_tickets),
        single_room: calculators::sum([shared, adult_tickets, whole_room]),
        infant: infant_tickets,
    }
}

pub fn identity_profits(prices: &SellingPrices, costs: &IdentityCosts) -> IdentityProfits {
    IdentityProfits {
        adult: sub(prices.adult, costs.adult),
        child_with_bed: sub(prices.child_with_bed, costs.child_with_bed),
        child_no_bed: sub(prices.child_no_bed, costs.child_no_bed),
        single_room: sub(prices.single_room, costs.single_room),
        infant: sub(prices.infant, costs.infant),
    }
}

/// Revenue and cost of the whole party, each identity weighted by its headcount.
pub fn profit_summary(
    counts: &ParticipantCounts,
    prices: &SellingPrices,
    costs: &IdentityCosts,
) -> ProfitSummary {
    let rows = [
        (counts.adult, prices.adult, costs.adult),
        (counts.child_with_bed, prices.child_with_bed, costs.child_with_bed),
        (counts.child_no_bed, prices.child_no_bed, costs.child_no_bed),
        (counts.single_room, prices.single_room, costs.single_room),
        (counts.infant, prices.infant, costs.infant),
    ];

    let revenue = calculators::sum(rows.iter().map(|&(n, price, _)| mul(Decimal::from(n), price)));
    let cost = calculators::sum(rows.iter().map(|&(n, _, cost)| mul(Decimal::from(n), cost)));

    ProfitSummary {
        revenue,
        cost,
        profit: sub(revenue, cost),
    }
}

/// Cost of travelling in room type `name` instead of the first room type.
/// Unknown room types cost nothing.
pub fn room_type_cost(
    room_types: &[RoomTypeSummary],
    costs: &IdentityCosts,
    name: &str,
    occupant: RoomOccupant,
) -> Decimal {
    let Some(target) = room_types.iter().find(|room| room.name == name) else {
        return Decimal::ZERO;
    };

    let base = match occupant {
        RoomOccupant::Adult => costs.adult,
        RoomOccupant::Child => costs.child_with_bed,
    };

    calculators::add(
        sub(base, first_room_cost(room_types)),
        ceil_total(target.total_cost),
    )
}

/// Cost, price and profit for every room type after the first.
pub fn room_type_profits(
    prices: &SellingPrices,
    room_types: &[RoomTypeSummary],
    costs: &IdentityCosts,
) -> Vec<RoomTypeProfit> {
    room_types
        .iter()
        .skip(1)
        .map(|room| {
            let adult_cost = room_type_cost(room_types, costs, &room.name, RoomOccupant::Adult);
            let child_cost = room_type_cost(room_types, costs, &room.name, RoomOccupant::Child);
            let price = prices.room_types.get(&room.name).cloned().unwrap_or_default();

            RoomTypeProfit {
                name: room.name.clone(),
                adult_cost,
                child_cost,
                adult_price: price.adult,
                child_price: price.child,
                adult_profit: sub(price.adult, adult_cost),
                child_profit: sub(price.child, child_cost),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::accommodation::summarize;
    use crate::quote::calculators::resolve_items;
    use crate::quote::models::CostItem;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn priced(name: &str, quantity: u32, unit_price: Decimal) -> CostItem {
        CostItem {
            quantity,
            unit_price,
            ..CostItem::new(name)
        }
    }

    fn sample_quote() -> (Quote, Vec<RoomTypeSummary>) {
        let mut quote = Quote::new("Osaka", 10);

        let transport = &mut quote.category_mut(CategoryId::Transport).items;
        transport.push(priced("Adult ticket", 1, dec!(12000)).with_role(ItemRole::AdultTicket));
        transport.push(priced("Child ticket", 1, dec!(9000)).with_role(ItemRole::ChildTicket));
        transport.push(priced("Infant ticket", 1, dec!(1500)).with_role(ItemRole::InfantTicket));
        transport.push(priced("Rail pass", 1, dec!(500)));

        quote.category_mut(CategoryId::Meals).items.push(priced("Dinner", 2, dec!(750)));

        let rooms = &mut quote.category_mut(CategoryId::Accommodation).items;
        rooms.push(CostItem {
            day: Some(1),
            ..priced("Twin", 2, dec!(3000))
        });
        rooms.push(CostItem {
            day: Some(1),
            ..priced("Triple", 3, dec!(3000))
        });
        rooms.push(CostItem {
            day: Some(2),
            ..priced("Twin", 2, dec!(3200))
        });

        for category in quote.categories_mut() {
            resolve_items(category.id, &mut category.items, 10);
        }
        let room_types = summarize(&quote.category(CategoryId::Accommodation).items);
        (quote, room_types)
    }

    #[test]
    fn test_identity_costs() {
        let (quote, room_types) = sample_quote();
        let costs = identity_costs(&quote, &room_types);

        // shared = rail 500 + dinner 1500; first room = 1500 + 1600
        assert_eq!(costs.adult, dec!(17100));
        assert_eq!(costs.child_with_bed, dec!(14100));
        assert_eq!(costs.child_no_bed, dec!(11000));
        assert_eq!(costs.single_room, dec!(20200));
        assert_eq!(costs.infant, dec!(1500));
    }

    #[test]
    fn test_identity_profits_can_be_negative() {
        let (quote, room_types) = sample_quote();
        let costs = identity_costs(&quote, &room_types);
        let prices = SellingPrices {
            adult: dec!(20000),
            infant: dec!(1000),
            ..SellingPrices::default()
        };

        let profits = identity_profits(&prices, &costs);
        assert_eq!(profits.adult, dec!(2900));
        assert_eq!(profits.infant, dec!(-500));
        assert_eq!(profits.child_no_bed, dec!(-11000));
    }

    #[test]
    fn test_room_type_cost_swaps_first_room() {
        let (quote, room_types) = sample_quote();
        let costs = identity_costs(&quote, &room_types);

        assert_eq!(room_types[1].name, "Triple");
        assert_eq!(
            room_type_cost(&room_types, &costs, "Triple", RoomOccupant::Adult),
            dec!(15000)
        );
        assert_eq!(
            room_type_cost(&room_types, &costs, "Twin", RoomOccupant::Child),
            costs.child_with_bed
        );
        assert_eq!(
            room_type_cost(&room_types, &costs, "Suite", RoomOccupant::Adult),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_room_type_profits_skip_first_room() {
        let (quote, room_types) = sample_quote();
        let costs = identity_costs(&quote, &room_types);
        let mut prices = SellingPrices::default();
        prices.room_types.insert(
            "Triple".to_string(),
            RoomTypePrices {
                adult: dec!(16000),
                child: dec!(13000),
            },
        );

        let rows = room_type_profits(&prices, &room_types, &costs);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].adult_profit, dec!(1000));
        assert_eq!(rows[0].child_cost, dec!(12000));
        assert_eq!(rows[0].child_profit, dec!(1000));
    }

    #[test]
    fn test_profit_summary_weights_by_headcount() {
        let (quote, room_types) = sample_quote();
        let costs = identity_costs(&quote, &room_types);
        let counts = ParticipantCounts {
            adult: 2,
            child_no_bed: 1,
            infant: 1,
            ..ParticipantCounts::default()
        };
        let prices = SellingPrices {
            adult: dec!(20000),
            child_no_bed: dec!(12000),
            infant: dec!(1000),
            single_room: dec!(99999),
            ..SellingPrices::default()
        };

        let summary = profit_summary(&counts, &prices, &costs);
        assert_eq!(summary.revenue, dec!(53000));
        assert_eq!(summary.cost, dec!(46700));
        assert_eq!(summary.profit, dec!(6300));
    }

    #[test]
    fn test_participant_group_sizes() {
        let counts = ParticipantCounts {
            adult: 10,
            child_with_bed: 2,
            child_no_bed: 1,
            single_room: 1,
            infant: 2,
        };
        assert_eq!(counts.group_size(), 14);
        assert_eq!(counts.guide_group_size(), 16);

        let full = ParticipantCounts {
            adult: u32::MAX,
            infant: 1,
            ..ParticipantCounts::default()
        };
        assert_eq!(full.guide_group_size(), u32::MAX);
    }

    #[test]
    fn test_extreme_prices_saturate_profits() {
        let mut quote = Quote::new("Overflow", 1);
        quote
            .category_mut(CategoryId::Meals)
            .items
            .push(priced("Banquet", 1, Decimal::MAX));
        let rooms = &mut quote.category_mut(CategoryId::Accommodation).items;
        rooms.push(CostItem {
            day: Some(1),
            ..priced("A", 1, dec!(1))
        });
        rooms.push(CostItem {
            day: Some(1),
            ..priced("B", 1, Decimal::MAX)
        });
        for category in quote.categories_mut() {
            resolve_items(category.id, &mut category.items, 1);
        }
        let room_types = summarize(&quote.category(CategoryId::Accommodation).items);
        let costs = identity_costs(&quote, &room_types);
        assert_eq!(costs.adult, Decimal::MAX);

        let rows = room_type_profits(&SellingPrices::default(), &room_types, &costs);
        assert_eq!(rows[0].name, "B");
        assert_eq!(rows[0].adult_cost, Decimal::MAX);
        assert_eq!(rows[0].adult_profit, Decimal::MIN);
        assert_eq!(identity_profits(&SellingPrices::default(), &costs).adult, Decimal::MIN);
    }

    #[test]
    fn test_selling_prices_deserialize_leniently() {
        let prices: SellingPrices = serde_json::from_value(json!({
            "adult": "25,900",
            "infant": -5,
            "room_types": { "Triple": { "adult": 24000 } }
        }))
        .unwrap();

        assert_eq!(prices.adult, dec!(25900));
        assert_eq!(prices.infant, Decimal::ZERO);
        assert_eq!(prices.room_types["Triple"].adult, dec!(24000));
        assert_eq!(prices.room_types["Triple"].child, Decimal::ZERO);
    }
}
