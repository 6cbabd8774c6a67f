use chrono::{DateTime, Utc};
use core_types::{OrderKind, SignalKind, TradeDirection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Announces that the data handler has revealed a new time step.
///
/// The bar data itself is not carried in the event; consumers pull it from
/// the data handler, exactly as they would against a live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub timestamp: DateTime<Utc>,
}

/// A strategy's trading advice for one symbol, to be sized by the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub kind: SignalKind,
    /// Relative conviction in the signal, used to scale position sizing.
    pub strength: Decimal,
}

/// A sized order the portfolio hands to the execution handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub symbol: String,
    pub kind: OrderKind,
    pub quantity: Decimal,
    pub direction: TradeDirection,
}

/// The receipt for an executed order, including simulated costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillEvent {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub exchange: String,
    pub quantity: Decimal,
    pub direction: TradeDirection,
    pub fill_cost: Decimal,
    pub commission: Decimal,
}

/// The top-level event enum routed by the dispatch loop.
///
/// Routing is an exhaustive `match` on this type, so adding a variant forces
/// every dispatch site to handle it at compile time. Events are immutable
/// once constructed; a popped event is consumed exactly once and is never
/// reinterpreted as a different variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A new time step is visible in the data handler.
    Market(MarketEvent),
    /// A strategy wants exposure changed for a symbol.
    Signal(SignalEvent),
    /// The portfolio has sized an order for execution.
    Order(OrderEvent),
    /// An order has been (simulated-)executed.
    Fill(FillEvent),
}
