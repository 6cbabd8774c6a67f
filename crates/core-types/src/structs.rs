use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single OHLCV price bar for one symbol at one point on the timeline.
///
/// Bars are immutable once constructed. A forward-filled bar carries the
/// prior bar's prices and volume under the grid timestamp it was filled at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Bar {
    /// Returns a copy of this bar restamped at a later grid timestamp,
    /// used when forward-filling a gap in a symbol's series.
    pub fn forward_filled_to(&self, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..self.clone()
        }
    }
}
