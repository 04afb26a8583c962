//! Quote domain models: cost items, categories and the quote itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calculators;
use super::input;
use super::selling::{ParticipantCounts, SellingPrices};

/// The fixed set of cost categories on a quote, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryId {
    Transport,
    GroupTransport,
    Accommodation,
    Meals,
    Activities,
    Others,
    Guide,
}

impl CategoryId {
    pub const ALL: [CategoryId; 7] = [
        CategoryId::Transport,
        CategoryId::GroupTransport,
        CategoryId::Accommodation,
        CategoryId::Meals,
        CategoryId::Activities,
        CategoryId::Others,
        CategoryId::Guide,
    ];

    /// Position of the category within [`CategoryId::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryId::Transport => "transport",
            CategoryId::GroupTransport => "group-transport",
            CategoryId::Accommodation => "accommodation",
            CategoryId::Meals => "meals",
            CategoryId::Activities => "activities",
            CategoryId::Others => "others",
            CategoryId::Guide => "guide",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CategoryId::Transport => "Transport",
            CategoryId::GroupTransport => "Group transport",
            CategoryId::Accommodation => "Accommodation",
            CategoryId::Meals => "Meals",
            CategoryId::Activities => "Activities",
            CategoryId::Others => "Others",
            CategoryId::Guide => "Tour leader & guide",
        }
    }

    /// Whether items in this category may be split across the whole group
    pub fn supports_group_cost(self) -> bool {
        matches!(
            self,
            CategoryId::Transport | CategoryId::GroupTransport | CategoryId::Guide
        )
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid category: {}. Use transport, group-transport, accommodation, meals, activities, others, or guide",
                    s
                )
            })
    }
}

/// What an item stands for beyond its display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRole {
    #[default]
    Standard,
    /// Receives the derived per-person guide cost
    GuideAllocation,
    AdultTicket,
    ChildTicket,
    InfantTicket,
}

impl ItemRole {
    pub fn is_ticket(self) -> bool {
        matches!(
            self,
            ItemRole::AdultTicket | ItemRole::ChildTicket | ItemRole::InfantTicket
        )
    }
}

/// Ticket rows that can be added to the transport category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketKind {
    Adult,
    Child,
    Infant,
}

impl TicketKind {
    pub fn role(self) -> ItemRole {
        match self {
            TicketKind::Adult => ItemRole::AdultTicket,
            TicketKind::Child => ItemRole::ChildTicket,
            TicketKind::Infant => ItemRole::InfantTicket,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TicketKind::Adult => "Adult ticket",
            TicketKind::Child => "Child ticket",
            TicketKind::Infant => "Infant ticket",
        }
    }
}

/// A single line on the quote.
///
/// `total` is derived from the other fields and the quote's group size. It is
/// serialized for display but ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    /// Number of units, or occupants for accommodation. 0 means not entered.
    #[serde(default, deserialize_with = "input::deserialize_quantity")]
    pub quantity: u32,
    /// For accommodation this is the price of the whole room
    #[serde(default, deserialize_with = "input::deserialize_price")]
    pub unit_price: Decimal,
    #[serde(default, skip_deserializing)]
    pub(crate) total: Decimal,
    #[serde(default)]
    pub note: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "input::deserialize_day"
    )]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(default)]
    pub is_group_cost: bool,
    #[serde(default)]
    pub role: ItemRole,
}

impl CostItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quantity: 0,
            unit_price: Decimal::ZERO,
            total: Decimal::ZERO,
            note: String::new(),
            day: None,
            room_type: None,
            is_group_cost: false,
            role: ItemRole::Standard,
        }
    }

    /// A blank room row for the given day
    pub fn room(day: u32) -> Self {
        Self {
            day: Some(day),
            ..Self::new("")
        }
    }

    pub fn with_role(mut self, role: ItemRole) -> Self {
        self.role = role;
        self
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub(crate) fn set_total(&mut self, total: Decimal) {
        self.total = total;
    }

    /// Room-type label, falling back to the item name
    pub fn label(&self) -> &str {
        match self.room_type.as_deref() {
            Some(room_type) if !room_type.trim().is_empty() => room_type,
            _ => &self.name,
        }
    }

    pub fn effective_quantity(&self) -> Decimal {
        calculators::effective_quantity(self.quantity)
    }
}

/// One category of costs and its line items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostCategory {
    pub id: CategoryId,
    pub name: String,
    pub items: Vec<CostItem>,
    total: Decimal,
}

impl CostCategory {
    pub fn new(id: CategoryId) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
            items: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub(crate) fn set_total(&mut self, total: Decimal) {
        self.total = total;
    }

    pub fn item(&self, id: Uuid) -> Option<&CostItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: Uuid) -> Option<&mut CostItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn items_with_role(&self, role: ItemRole) -> impl Iterator<Item = &CostItem> {
        self.items.iter().filter(move |item| item.role == role)
    }
}

/// The quote being edited. Always holds all seven categories, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub name: String,
    /// Travelling party size used to split group costs
    pub group_size: u32,
    /// Headcount per traveller type. When set, `group_size` is derived from it.
    pub participant_counts: Option<ParticipantCounts>,
    pub accommodation_days: u32,
    categories: Vec<CostCategory>,
}

impl Quote {
    pub fn new(name: impl Into<String>, group_size: u32) -> Self {
        Self {
            name: name.into(),
            group_size,
            participant_counts: None,
            accommodation_days: 0,
            categories: CategoryId::ALL.into_iter().map(CostCategory::new).collect(),
        }
    }

    pub fn categories(&self) -> &[CostCategory] {
        &self.categories
    }

    pub fn category(&self, id: CategoryId) -> &CostCategory {
        &self.categories[id.index()]
    }

    pub fn category_mut(&mut self, id: CategoryId) -> &mut CostCategory {
        &mut self.categories[id.index()]
    }

    pub(crate) fn categories_mut(&mut self) -> impl Iterator<Item = &mut CostCategory> {
        self.categories.iter_mut()
    }

    /// Record the headcount and take the group size from it
    pub fn set_participant_counts(&mut self, counts: ParticipantCounts) {
        self.group_size = counts.group_size();
        self.participant_counts = Some(counts);
    }
}

fn default_group_size() -> u32 {
    1
}

/// Category payload as supplied when a quote is opened
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub id: CategoryId,
    #[serde(default)]
    pub items: Vec<CostItem>,
}

/// Everything needed to open a quote for editing.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteBootstrap {
    #[serde(default)]
    pub name: String,
    #[serde(
        default = "default_group_size",
        deserialize_with = "input::deserialize_quantity"
    )]
    pub group_size: u32,
    /// Overrides `group_size` when present
    #[serde(default)]
    pub participant_counts: Option<ParticipantCounts>,
    #[serde(default, deserialize_with = "input::deserialize_quantity")]
    pub accommodation_days: u32,
    #[serde(default)]
    pub categories: Vec<CategoryInput>,
    #[serde(default)]
    pub selling_prices: SellingPrices,
}

impl Default for QuoteBootstrap {
    fn default() -> Self {
        Self {
            name: String::new(),
            group_size: default_group_size(),
            participant_counts: None,
            accommodation_days: 0,
            categories: Vec::new(),
            selling_prices: SellingPrices::default(),
        }
    }
}

impl QuoteBootstrap {
    /// Build the quote with every category present. Items of repeated
    /// categories are appended in payload order.
    pub fn into_parts(self) -> (Quote, SellingPrices) {
        let mut quote = Quote::new(self.name, self.group_size);
        quote.accommodation_days = self.accommodation_days;
        if let Some(counts) = self.participant_counts {
            quote.set_participant_counts(counts);
        }

        for input in self.categories {
            quote.category_mut(input.id).items.extend(input.items);
        }

        (quote, self.selling_prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_category_id_round_trips_through_str() {
        for id in CategoryId::ALL {
            assert_eq!(id.as_str().parse::<CategoryId>().unwrap(), id);
        }
        assert!("hotel".parse::<CategoryId>().is_err());
    }

    #[test]
    fn test_category_index_matches_order() {
        for (position, id) in CategoryId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), position);
        }
    }

    #[test]
    fn test_category_serializes_kebab_case() {
        let value = serde_json::to_value(CategoryId::GroupTransport).unwrap();
        assert_eq!(value, json!("group-transport"));
    }

    #[test]
    fn test_new_quote_has_all_categories() {
        let quote = Quote::new("Kyoto", 20);
        let ids: Vec<CategoryId> = quote.categories().iter().map(|c| c.id).collect();
        assert_eq!(ids, CategoryId::ALL.to_vec());
        assert!(quote.categories().iter().all(|c| c.items.is_empty()));
    }

    #[test]
    fn test_item_deserialization_clamps_and_ignores_total() {
        let item: CostItem = serde_json::from_value(json!({
            "name": "Bus",
            "quantity": -2,
            "unit_price": "abc",
            "total": 9999,
            "day": 0
        }))
        .unwrap();

        assert_eq!(item.quantity, 0);
        assert_eq!(item.unit_price, Decimal::ZERO);
        assert_eq!(item.total(), Decimal::ZERO);
        assert_eq!(item.day, None);
        assert_eq!(item.role, ItemRole::Standard);
    }

    #[test]
    fn test_item_label_prefers_room_type() {
        let mut item = CostItem::new("Hotel Granvia");
        assert_eq!(item.label(), "Hotel Granvia");
        item.room_type = Some("Twin".to_string());
        assert_eq!(item.label(), "Twin");
        item.room_type = Some("  ".to_string());
        assert_eq!(item.label(), "Hotel Granvia");
    }

    #[test]
    fn test_bootstrap_fills_missing_and_merges_duplicate_categories() {
        let bootstrap: QuoteBootstrap = serde_json::from_value(json!({
            "name": "Hokkaido",
            "group_size": 16,
            "accommodation_days": 2,
            "categories": [
                { "id": "meals", "items": [{ "name": "Lunch", "unit_price": 800 }] },
                { "id": "meals", "items": [{ "name": "Dinner", "unit_price": "1200" }] }
            ]
        }))
        .unwrap();

        let (quote, _) = bootstrap.into_parts();
        assert_eq!(quote.group_size, 16);
        assert_eq!(quote.accommodation_days, 2);
        assert_eq!(quote.categories().len(), 7);

        let meals = quote.category(CategoryId::Meals);
        assert_eq!(meals.items.len(), 2);
        assert_eq!(meals.items[1].unit_price, dec!(1200));
        assert!(quote.category(CategoryId::Transport).items.is_empty());
    }

    #[test]
    fn test_bootstrap_rejects_unknown_category() {
        let result: Result<QuoteBootstrap, _> = serde_json::from_value(json!({
            "categories": [{ "id": "visa" }]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_bootstrap_participant_counts_set_group_size() {
        let bootstrap: QuoteBootstrap = serde_json::from_value(json!({
            "group_size": 40,
            "participant_counts": {
                "adult": 12,
                "child_with_bed": "2",
                "child_no_bed": 1,
                "single_room": 1,
                "infant": 3
            }
        }))
        .unwrap();

        let (quote, _) = bootstrap.into_parts();
        assert_eq!(quote.group_size, 16);
        let counts = quote.participant_counts.unwrap();
        assert_eq!(counts.infant, 3);
        assert_eq!(counts.guide_group_size(), 19);
    }

    #[test]
    fn test_bootstrap_defaults_group_size() {
        let bootstrap: QuoteBootstrap = serde_json::from_value(json!({})).unwrap();
        assert_eq!(bootstrap.group_size, 1);
    }
}
