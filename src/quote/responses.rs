//! Response DTOs for quote API endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::accommodation::RoomTypeSummary;
use super::editor::{QuoteEditor, QuoteSnapshot};
use super::guide::GuideCost;
use super::selling::{IdentityCosts, IdentityProfits, ProfitSummary, RoomTypeProfit};
use super::totals::QuoteTotals;

/// Everything the price overview and breakdown panels display
#[derive(Debug, Clone, Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    pub snapshot: QuoteSnapshot,
    pub totals: QuoteTotals,
    pub room_types: Vec<RoomTypeSummary>,
    pub guide_cost: GuideCost,
    pub identity_costs: IdentityCosts,
    pub identity_profits: IdentityProfits,
    pub room_type_profits: Vec<RoomTypeProfit>,
    /// Present when participant counts are known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_summary: Option<ProfitSummary>,
    /// Headcount including infants
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_group_size: Option<u32>,
}

impl From<&QuoteEditor> for QuoteView {
    fn from(editor: &QuoteEditor) -> Self {
        Self {
            snapshot: editor.snapshot(),
            totals: editor.totals().clone(),
            room_types: editor.room_types().to_vec(),
            guide_cost: editor.guide_cost().clone(),
            identity_costs: editor.identity_costs(),
            identity_profits: editor.identity_profits(),
            room_type_profits: editor.room_type_profits(),
            profit_summary: editor.profit_summary(),
            guide_group_size: editor
                .quote()
                .participant_counts
                .map(|counts| counts.guide_group_size()),
        }
    }
}

/// Response for opening an editing session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub opened_at: DateTime<Utc>,
    pub view: QuoteView,
}

/// Response for an applied edit
#[derive(Debug, Serialize)]
pub struct EditResponse {
    /// Items created by the edit, if any
    pub created: Vec<Uuid>,
    pub view: QuoteView,
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
