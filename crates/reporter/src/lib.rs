//! # Marktide Reporter Crate
//!
//! This crate defines the `Reporter` contract, the observation-only sink the
//! dispatch loop feeds with Market and Fill events, plus a reference
//! implementation that collects kline rows and fill markpoints.
//!
//! ## Architectural Principles
//!
//! - **Strictly One-Way:** A reporter holds no handle to the event queue, so
//!   it is structurally incapable of feeding anything back into the
//!   simulation. Observation can never perturb the replay.
//! - **Infallible by Contract:** Reporting problems (e.g., a symbol it was
//!   asked to chart that the data handler doesn't know) are logged and
//!   skipped, never allowed to abort a run that is otherwise sound.
//!
//! Rendering (charts, tables) is out of scope; this crate only accumulates
//! the per-run data a rendering layer would consume.

use core_types::Bar;
use events::{FillEvent, MarketEvent};
use market_data::{DataError, DataHandler};
use std::collections::HashMap;

/// The observation-only contract the dispatch loop drives.
pub trait Reporter: Send + Sync {
    /// Observes a newly revealed time step; typically records the bars
    /// behind it.
    fn update_kline_data(&mut self, event: &MarketEvent, data: &dyn DataHandler);

    /// Observes an execution; typically records a trade marker.
    fn update_markpoint(&mut self, event: &FillEvent);

    /// End-of-run handoff, invoked exactly once when the replay finishes.
    fn summarize(&mut self, data: &dyn DataHandler);
}

/// Collects the full kline series per symbol and a markpoint per fill.
pub struct KlineReporter {
    symbols: Vec<String>,
    klines: HashMap<String, Vec<Bar>>,
    markpoints: Vec<FillEvent>,
}

impl KlineReporter {
    pub fn new(symbols: Vec<String>) -> Self {
        let klines = symbols.iter().map(|s| (s.clone(), Vec::new())).collect();
        Self {
            symbols,
            klines,
            markpoints: Vec::new(),
        }
    }

    pub fn klines(&self, symbol: &str) -> Option<&[Bar]> {
        self.klines.get(symbol).map(Vec::as_slice)
    }

    pub fn markpoints(&self) -> &[FillEvent] {
        &self.markpoints
    }
}

impl Reporter for KlineReporter {
    fn update_kline_data(&mut self, _event: &MarketEvent, data: &dyn DataHandler) {
        for symbol in &self.symbols {
            match data.latest_bar(symbol) {
                Ok(Some(bar)) => {
                    if let Some(series) = self.klines.get_mut(symbol) {
                        series.push(bar);
                    }
                }
                // Nothing revealed for this symbol at this step.
                Ok(None) => {}
                Err(DataError::UnknownSymbol(_)) => {
                    tracing::warn!(%symbol, "reporter symbol not in data universe, skipping");
                }
                Err(e) => {
                    tracing::warn!(%symbol, error = %e, "failed to pull bar for reporting");
                }
            }
        }
    }

    fn update_markpoint(&mut self, event: &FillEvent) {
        self.markpoints.push(event.clone());
    }

    fn summarize(&mut self, _data: &dyn DataHandler) {
        for symbol in &self.symbols {
            let bars = self.klines.get(symbol).map_or(0, Vec::len);
            tracing::info!(%symbol, bars, "collected kline series");
        }
        tracing::info!(fills = self.markpoints.len(), "run complete");
    }
}
