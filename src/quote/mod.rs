//! Quote cost-aggregation engine.
//!
//! Resolves item totals from their formulas, summarizes accommodation by room
//! type, derives the per-person guide cost and rolls everything up into the
//! category and grand totals shown on a quote.

pub mod accommodation;
pub mod calculators;
pub mod editor;
pub mod guide;
pub mod input;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod selling;
pub mod totals;

// Re-export commonly used items
pub use accommodation::RoomTypeSummary;
pub use calculators::round_money;
pub use editor::{Edit, EditError, ItemUpdate, QuoteEditor, QuoteSnapshot};
pub use models::{CategoryId, CostCategory, CostItem, ItemRole, Quote, QuoteBootstrap, TicketKind};
pub use routes::router;
pub use selling::{ParticipantCounts, SellingPrices};
