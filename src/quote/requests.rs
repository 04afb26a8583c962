//! Request DTOs for quote API endpoints.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::editor::{Edit, EditError, ItemUpdate};
use super::input;
use super::models::{CategoryId, TicketKind};
use super::selling::{ParticipantCounts, SellingPrices};

/// An edit as sent by the quote editor form
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditRequest {
    AddRow {
        category: CategoryId,
    },
    AddAccommodationDay,
    AddGuideRow,
    AddTicket {
        kind: TicketKind,
    },
    UpdateItem {
        category: CategoryId,
        item_id: Uuid,
        field: String,
        #[serde(default)]
        value: Value,
    },
    RemoveItem {
        category: CategoryId,
        item_id: Uuid,
    },
    SetGroupSize {
        #[serde(deserialize_with = "input::deserialize_quantity")]
        group_size: u32,
    },
    SetParticipantCounts {
        participant_counts: ParticipantCounts,
    },
    SetName {
        name: String,
    },
    SetSellingPrices {
        selling_prices: SellingPrices,
    },
}

impl EditRequest {
    pub fn into_edit(self) -> Result<Edit, EditError> {
        let edit = match self {
            EditRequest::AddRow { category } => Edit::AddRow(category),
            EditRequest::AddAccommodationDay => Edit::AddAccommodationDay,
            EditRequest::AddGuideRow => Edit::AddGuideRow,
            EditRequest::AddTicket { kind } => Edit::AddTicket(kind),
            EditRequest::UpdateItem {
                category,
                item_id,
                field,
                value,
            } => Edit::UpdateItem {
                category,
                item_id,
                update: item_update(&field, &value)?,
            },
            EditRequest::RemoveItem { category, item_id } => {
                Edit::RemoveItem { category, item_id }
            }
            EditRequest::SetGroupSize { group_size } => Edit::SetGroupSize(group_size),
            EditRequest::SetParticipantCounts { participant_counts } => {
                Edit::SetParticipantCounts(participant_counts)
            }
            EditRequest::SetName { name } => Edit::SetName(name),
            EditRequest::SetSellingPrices { selling_prices } => {
                Edit::SetSellingPrices(selling_prices)
            }
        };
        Ok(edit)
    }
}

/// Map a form field name and its raw value to a typed update.
pub fn item_update(field: &str, value: &Value) -> Result<ItemUpdate, EditError> {
    let update = match field {
        "name" => ItemUpdate::Name(text(value)),
        "note" => ItemUpdate::Note(text(value)),
        "room_type" => ItemUpdate::RoomType(text(value)),
        "day" => ItemUpdate::Day(input::day_from_value(value)),
        "quantity" => ItemUpdate::Quantity(input::quantity_from_value(value)),
        "unit_price" => ItemUpdate::UnitPrice(input::price_from_value(value)),
        "is_group_cost" => ItemUpdate::IsGroupCost(flag(value)),
        "total" | "id" | "role" => return Err(EditError::ReadOnlyField(field.to_string())),
        other => return Err(EditError::UnknownField(other.to_string())),
    };
    Ok(update)
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"),
        Value::Number(_) => input::price_from_value(value) > rust_decimal::Decimal::ZERO,
        _ => false,
    }
}
