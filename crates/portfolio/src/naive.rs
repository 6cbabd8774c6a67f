use crate::error::PortfolioError;
use crate::Portfolio;
use chrono::{DateTime, Utc};
use configuration::Sizing;
use core_types::{OrderKind, SignalKind, TradeDirection};
use events::{Event, EventQueue, FillEvent, MarketEvent, OrderEvent, SignalEvent};
use market_data::{DataError, DataHandler};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A deliberately naive portfolio: every accepted signal is sized to the
/// configured default quantity, scaled by signal strength, with no risk
/// overlay. It tracks signed per-symbol quantities and a cash balance, and
/// records an equity mark at every time step.
pub struct NaivePortfolio {
    sizing: Sizing,
    symbols: Vec<String>,
    cash: Decimal,
    /// Signed quantity per symbol; positive is long, negative is short.
    /// A symbol absent from the map is flat.
    positions: HashMap<String, Decimal>,
    equity_curve: Vec<(DateTime<Utc>, Decimal)>,
}

impl NaivePortfolio {
    /// Creates a new `NaivePortfolio` seeded with the run's initial capital.
    pub fn new(symbols: Vec<String>, initial_capital: Decimal, sizing: Sizing) -> Self {
        Self {
            sizing,
            symbols,
            cash: initial_capital,
            positions: HashMap::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    /// The signed quantity held for `symbol`; zero when flat.
    pub fn position(&self, symbol: &str) -> Decimal {
        self.positions.get(symbol).copied().unwrap_or(Decimal::ZERO)
    }

    /// The per-step equity marks recorded so far, oldest first.
    pub fn equity_curve(&self) -> &[(DateTime<Utc>, Decimal)] {
        &self.equity_curve
    }

    /// Equity = cash + the mark-to-market value of all open positions.
    fn marked_equity(&self, data: &dyn DataHandler) -> Result<Decimal, PortfolioError> {
        let mut equity = self.cash;
        for (symbol, quantity) in &self.positions {
            if quantity.is_zero() {
                continue;
            }
            // A position can only exist after a fill, which required a
            // revealed bar, so a latest bar is always available here.
            if let Some(bar) = data.latest_bar(symbol)? {
                equity += *quantity * bar.close;
            }
        }
        Ok(equity)
    }
}

impl Portfolio for NaivePortfolio {
    fn update_timeindex(
        &mut self,
        event: &MarketEvent,
        data: &dyn DataHandler,
    ) -> Result<(), PortfolioError> {
        let equity = self.marked_equity(data)?;
        tracing::debug!(timestamp = %event.timestamp, %equity, "marked portfolio equity");
        self.equity_curve.push((event.timestamp, equity));
        Ok(())
    }

    /// Naive sizing: a Long/Short signal on a flat symbol opens a position of
    /// `default_quantity * strength`; an Exit signal on an open symbol closes
    /// it entirely. Everything else is a no-op, so at most one order is
    /// enqueued per signal.
    fn update_signal(
        &mut self,
        event: &SignalEvent,
        data: &dyn DataHandler,
        queue: &EventQueue,
    ) -> Result<(), PortfolioError> {
        // Signals for symbols outside the data universe are skipped, same
        // recovery rule as every other consumer.
        match data.latest_bar(&event.symbol) {
            Err(DataError::UnknownSymbol(_)) => {
                tracing::warn!(symbol = %event.symbol, "signal for unknown symbol, ignoring");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
            Ok(_) => {}
        }

        let held = self.position(&event.symbol);
        let order = match event.kind {
            SignalKind::Long if held.is_zero() => Some(OrderEvent {
                symbol: event.symbol.clone(),
                kind: OrderKind::Market,
                quantity: self.sizing.default_quantity * event.strength,
                direction: TradeDirection::Buy,
            }),
            SignalKind::Short if held.is_zero() => Some(OrderEvent {
                symbol: event.symbol.clone(),
                kind: OrderKind::Market,
                quantity: self.sizing.default_quantity * event.strength,
                direction: TradeDirection::Sell,
            }),
            SignalKind::Exit if !held.is_zero() => Some(OrderEvent {
                symbol: event.symbol.clone(),
                kind: OrderKind::Market,
                quantity: held.abs(),
                direction: if held.is_sign_positive() {
                    TradeDirection::Sell
                } else {
                    TradeDirection::Buy
                },
            }),
            // Already positioned the way the signal asks, or asked to exit
            // while flat.
            _ => None,
        };

        if let Some(order) = order {
            tracing::debug!(symbol = %order.symbol, quantity = %order.quantity,
                direction = ?order.direction, "sized order from signal");
            queue.push(Event::Order(order));
        }
        Ok(())
    }

    fn update_fill(&mut self, event: &FillEvent) -> Result<(), PortfolioError> {
        // Cash moves by the fill cost plus commission; holdings move by the
        // signed fill quantity. The affordability check happens before any
        // state changes, so a rejected fill leaves the portfolio untouched.
        let net_debit = match event.direction {
            TradeDirection::Buy => event.fill_cost + event.commission,
            TradeDirection::Sell => event.commission - event.fill_cost,
        };
        if net_debit > self.cash {
            return Err(PortfolioError::InsufficientCash {
                required: net_debit.to_string(),
                available: self.cash.to_string(),
            });
        }

        self.cash -= net_debit;
        match event.direction {
            TradeDirection::Buy => {
                *self
                    .positions
                    .entry(event.symbol.clone())
                    .or_insert(Decimal::ZERO) += event.quantity;
            }
            TradeDirection::Sell => {
                *self
                    .positions
                    .entry(event.symbol.clone())
                    .or_insert(Decimal::ZERO) -= event.quantity;
            }
        }

        // Flat symbols drop out of the map so `positions` only holds open
        // exposure.
        if self.position(&event.symbol).is_zero() {
            self.positions.remove(&event.symbol);
        }

        tracing::debug!(symbol = %event.symbol, cash = %self.cash,
            position = %self.position(&event.symbol), "applied fill");
        Ok(())
    }
}
