//! Live quote editing.
//!
//! [`QuoteEditor`] owns the item store. Every [`Edit`] is applied as a single
//! transaction: mutate, re-resolve the touched items, re-derive the room-type
//! summary and guide allocation when accommodation or transport changed, then
//! recompute all totals. Callers only ever see settled state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::accommodation::{self, RoomTypeSummary};
use super::calculators::resolve_items;
use super::guide::{self, GuideCost};
use super::models::{CategoryId, CostCategory, CostItem, ItemRole, Quote, QuoteBootstrap, TicketKind};
use super::selling::{
    self, IdentityCosts, IdentityProfits, ParticipantCounts, ProfitSummary, RoomTypeProfit,
    SellingPrices,
};
use super::totals::{self, QuoteTotals};

pub const GUIDE_ROW_NAME: &str = "Guide allocation";

/// Errors from addressing the item store. State is left untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Item {item_id} not found in {category}")]
    ItemNotFound { category: CategoryId, item_id: Uuid },

    #[error("Field '{field}' does not apply to {category}")]
    FieldNotApplicable {
        field: &'static str,
        category: CategoryId,
    },

    #[error("Add an accommodation day before adding rooms")]
    NoAccommodationDays,

    #[error("Unknown item field '{0}'")]
    UnknownField(String),

    #[error("Field '{0}' is derived and cannot be edited")]
    ReadOnlyField(String),
}

/// A change to one editable field of an item. `total` is not editable.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemUpdate {
    Name(String),
    Note(String),
    RoomType(String),
    Day(Option<u32>),
    Quantity(u32),
    UnitPrice(Decimal),
    IsGroupCost(bool),
}

impl ItemUpdate {
    pub fn field(&self) -> &'static str {
        match self {
            ItemUpdate::Name(_) => "name",
            ItemUpdate::Note(_) => "note",
            ItemUpdate::RoomType(_) => "room_type",
            ItemUpdate::Day(_) => "day",
            ItemUpdate::Quantity(_) => "quantity",
            ItemUpdate::UnitPrice(_) => "unit_price",
            ItemUpdate::IsGroupCost(_) => "is_group_cost",
        }
    }

    fn applies_to(&self, category: CategoryId) -> bool {
        match self {
            ItemUpdate::RoomType(_) | ItemUpdate::Day(_) => category == CategoryId::Accommodation,
            ItemUpdate::IsGroupCost(_) => category.supports_group_cost(),
            _ => true,
        }
    }

    fn apply_to(self, item: &mut CostItem) {
        match self {
            ItemUpdate::Name(name) => item.name = name,
            ItemUpdate::Note(note) => item.note = note,
            ItemUpdate::RoomType(room_type) => item.room_type = Some(room_type),
            ItemUpdate::Day(day) => item.day = day,
            ItemUpdate::Quantity(quantity) => item.quantity = quantity,
            ItemUpdate::UnitPrice(price) => item.unit_price = price.max(Decimal::ZERO),
            ItemUpdate::IsGroupCost(flag) => item.is_group_cost = flag,
        }
    }
}

/// One user action on the quote
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    AddRow(CategoryId),
    AddAccommodationDay,
    AddGuideRow,
    AddTicket(TicketKind),
    UpdateItem {
        category: CategoryId,
        item_id: Uuid,
        update: ItemUpdate,
    },
    RemoveItem {
        category: CategoryId,
        item_id: Uuid,
    },
    /// Set the group size directly, dropping any participant counts
    SetGroupSize(u32),
    /// Set the headcount per traveller type; the group size follows
    SetParticipantCounts(ParticipantCounts),
    SetName(String),
    SetSellingPrices(SellingPrices),
}

/// What an edit produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditOutcome {
    /// Ids of items created by the edit
    pub created: Vec<Uuid>,
}

/// Settled quote state handed to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub name: String,
    pub group_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_counts: Option<ParticipantCounts>,
    pub accommodation_days: u32,
    pub categories: Vec<SnapshotCategory>,
    pub total_cost: Decimal,
    #[serde(default)]
    pub selling_prices: SellingPrices,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCategory {
    pub id: CategoryId,
    pub name: String,
    pub items: Vec<CostItem>,
    pub total: Decimal,
}

impl From<&CostCategory> for SnapshotCategory {
    fn from(category: &CostCategory) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            items: category.items.clone(),
            total: category.total(),
        }
    }
}

/// Which derived stages an edit must re-run
#[derive(Debug, Clone, Copy)]
enum Scope {
    /// Only the touched item's category
    Category(CategoryId),
    /// Every item, plus the guide allocation
    All,
}

#[derive(Debug, Clone)]
pub struct QuoteEditor {
    quote: Quote,
    selling_prices: SellingPrices,
    room_types: Vec<RoomTypeSummary>,
    guide_cost: GuideCost,
    totals: QuoteTotals,
}

impl QuoteEditor {
    /// Open a quote for editing and settle every derived value.
    pub fn open(bootstrap: QuoteBootstrap) -> Self {
        let (quote, selling_prices) = bootstrap.into_parts();
        let mut editor = Self {
            quote,
            selling_prices,
            room_types: Vec::new(),
            guide_cost: GuideCost::default(),
            totals: QuoteTotals::default(),
        };
        editor.recalculate(Scope::All);
        editor
    }

    /// Reopen a previously saved snapshot
    pub fn from_snapshot(snapshot: QuoteSnapshot) -> Self {
        let mut quote = Quote::new(snapshot.name, snapshot.group_size);
        quote.accommodation_days = snapshot.accommodation_days;
        if let Some(counts) = snapshot.participant_counts {
            quote.set_participant_counts(counts);
        }
        for category in snapshot.categories {
            quote.category_mut(category.id).items.extend(category.items);
        }

        let mut editor = Self {
            quote,
            selling_prices: snapshot.selling_prices,
            room_types: Vec::new(),
            guide_cost: GuideCost::default(),
            totals: QuoteTotals::default(),
        };
        editor.recalculate(Scope::All);
        editor
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn category(&self, id: CategoryId) -> &CostCategory {
        self.quote.category(id)
    }

    pub fn totals(&self) -> &QuoteTotals {
        &self.totals
    }

    pub fn total_cost(&self) -> Decimal {
        self.totals.total_cost
    }

    pub fn room_types(&self) -> &[RoomTypeSummary] {
        &self.room_types
    }

    pub fn guide_cost(&self) -> &GuideCost {
        &self.guide_cost
    }

    /// Per-person guide allocation, available whether or not a guide row exists
    pub fn guide_cost_per_person(&self) -> Decimal {
        self.guide_cost.per_person
    }

    pub fn selling_prices(&self) -> &SellingPrices {
        &self.selling_prices
    }

    pub fn identity_costs(&self) -> IdentityCosts {
        selling::identity_costs(&self.quote, &self.room_types)
    }

    pub fn identity_profits(&self) -> IdentityProfits {
        selling::identity_profits(&self.selling_prices, &self.identity_costs())
    }

    pub fn room_type_profits(&self) -> Vec<RoomTypeProfit> {
        selling::room_type_profits(&self.selling_prices, &self.room_types, &self.identity_costs())
    }

    /// Party-wide revenue and profit. Needs participant counts.
    pub fn profit_summary(&self) -> Option<ProfitSummary> {
        self.quote.participant_counts.as_ref().map(|counts| {
            selling::profit_summary(counts, &self.selling_prices, &self.identity_costs())
        })
    }

    pub fn snapshot(&self) -> QuoteSnapshot {
        QuoteSnapshot {
            name: self.quote.name.clone(),
            group_size: self.quote.group_size,
            participant_counts: self.quote.participant_counts,
            accommodation_days: self.quote.accommodation_days,
            categories: self.quote.categories().iter().map(SnapshotCategory::from).collect(),
            total_cost: self.totals.total_cost,
            selling_prices: self.selling_prices.clone(),
        }
    }

    /// Apply one edit and settle all derived state before returning.
    pub fn apply(&mut self, edit: Edit) -> Result<EditOutcome, EditError> {
        debug!(?edit, "applying quote edit");

        let (scope, created) = match edit {
            Edit::AddRow(category) => (Scope::Category(category), self.insert_row(category)?),
            Edit::AddAccommodationDay => (
                Scope::Category(CategoryId::Accommodation),
                self.insert_accommodation_day(),
            ),
            Edit::AddGuideRow => (Scope::All, vec![self.insert_guide_row()]),
            Edit::AddTicket(kind) => (
                Scope::Category(CategoryId::Transport),
                vec![self.insert_ticket(kind)],
            ),
            Edit::UpdateItem {
                category,
                item_id,
                update,
            } => {
                if !update.applies_to(category) {
                    return Err(EditError::FieldNotApplicable {
                        field: update.field(),
                        category,
                    });
                }
                let item = self
                    .quote
                    .category_mut(category)
                    .item_mut(item_id)
                    .ok_or(EditError::ItemNotFound { category, item_id })?;
                update.apply_to(item);
                (Scope::Category(category), Vec::new())
            }
            Edit::RemoveItem { category, item_id } => {
                let items = &mut self.quote.category_mut(category).items;
                let position = items
                    .iter()
                    .position(|item| item.id == item_id)
                    .ok_or(EditError::ItemNotFound { category, item_id })?;
                items.remove(position);
                (Scope::Category(category), Vec::new())
            }
            Edit::SetGroupSize(group_size) => {
                self.quote.group_size = group_size;
                self.quote.participant_counts = None;
                (Scope::All, Vec::new())
            }
            Edit::SetParticipantCounts(counts) => {
                self.quote.set_participant_counts(counts);
                (Scope::All, Vec::new())
            }
            Edit::SetName(name) => {
                self.quote.name = name;
                return Ok(EditOutcome::default());
            }
            Edit::SetSellingPrices(prices) => {
                self.selling_prices = prices;
                return Ok(EditOutcome::default());
            }
        };

        self.recalculate(scope);
        Ok(EditOutcome { created })
    }

    pub fn add_row(&mut self, category: CategoryId) -> Result<Vec<Uuid>, EditError> {
        self.apply(Edit::AddRow(category)).map(|outcome| outcome.created)
    }

    pub fn add_accommodation_day(&mut self) -> Vec<Uuid> {
        let created = self.insert_accommodation_day();
        self.recalculate(Scope::Category(CategoryId::Accommodation));
        created
    }

    pub fn add_guide_row(&mut self) -> Uuid {
        let id = self.insert_guide_row();
        self.recalculate(Scope::All);
        id
    }

    pub fn add_ticket(&mut self, kind: TicketKind) -> Uuid {
        let id = self.insert_ticket(kind);
        self.recalculate(Scope::Category(CategoryId::Transport));
        id
    }

    pub fn update_item(
        &mut self,
        category: CategoryId,
        item_id: Uuid,
        update: ItemUpdate,
    ) -> Result<(), EditError> {
        self.apply(Edit::UpdateItem {
            category,
            item_id,
            update,
        })
        .map(|_| ())
    }

    pub fn remove_item(&mut self, category: CategoryId, item_id: Uuid) -> Result<(), EditError> {
        self.apply(Edit::RemoveItem { category, item_id }).map(|_| ())
    }

    pub fn set_group_size(&mut self, group_size: u32) {
        self.quote.group_size = group_size;
        self.quote.participant_counts = None;
        self.recalculate(Scope::All);
    }

    pub fn set_participant_counts(&mut self, counts: ParticipantCounts) {
        self.quote.set_participant_counts(counts);
        self.recalculate(Scope::All);
    }

    fn insert_guide_row(&mut self) -> Uuid {
        let row = CostItem {
            quantity: 1,
            ..CostItem::new(GUIDE_ROW_NAME)
        }
        .with_role(ItemRole::GuideAllocation);
        let id = row.id;
        self.quote.category_mut(CategoryId::GroupTransport).items.push(row);
        id
    }

    fn insert_ticket(&mut self, kind: TicketKind) -> Uuid {
        let row = CostItem {
            quantity: 1,
            ..CostItem::new(kind.label())
        }
        .with_role(kind.role());
        let id = row.id;
        self.quote.category_mut(CategoryId::Transport).items.push(row);
        id
    }

    /// A blank row. Accommodation gets one peer room per existing day, appended
    /// after that day's rooms so it lands in the same new slot on every day.
    fn insert_row(&mut self, category: CategoryId) -> Result<Vec<Uuid>, EditError> {
        if category != CategoryId::Accommodation {
            let row = CostItem::new("");
            let id = row.id;
            self.quote.category_mut(category).items.push(row);
            return Ok(vec![id]);
        }

        let days = self.quote.accommodation_days;
        if days == 0 {
            return Err(EditError::NoAccommodationDays);
        }

        let items = &mut self.quote.category_mut(CategoryId::Accommodation).items;
        let mut created = Vec::with_capacity(days as usize);
        for day in 1..=days {
            let room = CostItem::room(day);
            created.push(room.id);
            insert_after_day(items, day, room);
        }
        Ok(created)
    }

    /// Extend the stay by a day, repeating the previous day's room types.
    fn insert_accommodation_day(&mut self) -> Vec<Uuid> {
        self.quote.accommodation_days += 1;
        let day = self.quote.accommodation_days;
        let items = &mut self.quote.category_mut(CategoryId::Accommodation).items;

        let mut rooms: Vec<CostItem> = items
            .iter()
            .filter(|item| item.day == Some(day - 1))
            .map(|previous| CostItem {
                name: previous.name.clone(),
                room_type: previous.room_type.clone(),
                quantity: previous.quantity,
                ..CostItem::room(day)
            })
            .collect();
        if rooms.is_empty() {
            rooms.push(CostItem::room(day));
        }

        let created = rooms.iter().map(|room| room.id).collect();
        for room in rooms {
            insert_after_day(items, day, room);
        }
        created
    }

    /// Re-resolve item totals in scope, re-derive the room-type summary and guide
    /// allocation when they can have changed, then recompute every total.
    fn recalculate(&mut self, scope: Scope) {
        let group_size = self.quote.group_size;

        let derive_guide = match scope {
            Scope::All => {
                for category in self.quote.categories_mut() {
                    resolve_items(category.id, &mut category.items, group_size);
                }
                true
            }
            Scope::Category(id) => {
                let category = self.quote.category_mut(id);
                resolve_items(id, &mut category.items, group_size);
                matches!(id, CategoryId::Accommodation | CategoryId::Transport)
            }
        };

        if derive_guide {
            let accommodation = &self.quote.category(CategoryId::Accommodation).items;
            self.room_types = accommodation::summarize(accommodation);
            self.guide_cost = guide::derive(
                accommodation,
                &self.quote.category(CategoryId::Transport).items,
                group_size,
            );

            let written = guide::apply(
                self.quote.category_mut(CategoryId::GroupTransport),
                self.guide_cost.per_person,
                group_size,
            );
            debug!(
                per_person = %self.guide_cost.per_person,
                rows = written,
                "guide allocation derived"
            );
        }

        self.totals = totals::aggregate(self.quote.categories(), &self.room_types);
        for category in self.quote.categories_mut() {
            category.set_total(self.totals.category(category.id));
        }
    }
}

fn insert_after_day(items: &mut Vec<CostItem>, day: u32, room: CostItem) {
    match items.iter().rposition(|item| item.day == Some(day)) {
        Some(last) => items.insert(last + 1, room),
        None => {
            // keep days in ascending order
            let before = items
                .iter()
                .position(|item| item.day.is_some_and(|d| d > day))
                .unwrap_or(items.len());
            items.insert(before, room);
        }
    }
}
