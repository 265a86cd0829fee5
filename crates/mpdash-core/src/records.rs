use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placeholder for any dimension value a marketplace record does not carry.
pub const UNKNOWN: &str = "Unknown";

/// One order line from either marketplace, normalized for aggregation.
///
/// Wildberries reports one row per unit sold, so every WB order row becomes a
/// record with `quantity == 1`. Ozon reports postings with nested line items;
/// each line item becomes its own record sharing the posting's `order_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Marketplace order identifier (WB `srid`, Ozon `posting_number`), used
    /// to count distinct orders across line items.
    pub order_id: String,
    /// Fulfilment warehouse the goods ship from.
    pub warehouse: String,
    /// Delivery region or cluster the goods ship to.
    pub region_hint: String,
    /// Seller article / offer id, e.g. `"SF0125"`.
    pub article: String,
    /// Price per unit after seller discount. Zero when the marketplace omits it.
    pub unit_price: Decimal,
    pub quantity: u64,
    /// Raw timestamp string as the marketplace sent it. Parsed lazily by the
    /// period filter; `None` or unparsable values fall out of every window.
    pub occurred_at: Option<String>,
}

impl NormalizedRecord {
    /// Line revenue, `unit_price × quantity`, or `None` when the product does
    /// not fit in a [`Decimal`].
    #[must_use]
    pub fn checked_revenue(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    /// Line revenue, `unit_price × quantity`. A line whose revenue overflows
    /// contributes zero.
    #[must_use]
    pub fn revenue(&self) -> Decimal {
        self.checked_revenue().unwrap_or(Decimal::ZERO)
    }
}

impl Default for NormalizedRecord {
    fn default() -> Self {
        Self {
            order_id: String::new(),
            warehouse: UNKNOWN.to_string(),
            region_hint: UNKNOWN.to_string(),
            article: UNKNOWN.to_string(),
            unit_price: Decimal::ZERO,
            quantity: 1,
            occurred_at: None,
        }
    }
}

/// Point-in-time quantity of one article in one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub warehouse: String,
    pub article: String,
    pub quantity: i64,
}

impl Default for StockRecord {
    fn default() -> Self {
        Self {
            warehouse: UNKNOWN.to_string(),
            article: UNKNOWN.to_string(),
            quantity: 0,
        }
    }
}

/// A completed (delivered / bought-out) sale, dated by its own completion time
/// rather than the order date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionRecord {
    pub amount: Decimal,
    pub occurred_at: Option<String>,
}
