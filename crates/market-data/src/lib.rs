//! # Marktide Market Data Crate
//!
//! This crate defines the `DataHandler` contract that makes historic and live
//! price sources interchangeable, and provides `HistoricBars`, the replay
//! implementation every backtest runs against.
//!
//! ## Architectural Principles
//!
//! - **Pull, Never Push:** Consumers are told *that* a new step exists (via a
//!   `MarketEvent`) and then pull the bars they want with `latest_bars`. This
//!   replicates how a live strategy would see data arriving down the pipe, so
//!   a historic and a live source are treated identically by the rest of the
//!   system.
//! - **Eager Alignment:** The historic variant pays its whole cost at
//!   construction (one bulk load, one timeline union, one forward-fill pass)
//!   so that advancing a step during the replay is a trivial cursor bump.
//! - **No Synthetic Data:** `latest_bars` returns what has actually been
//!   revealed, or less. It never pads, and an unknown symbol is a typed error
//!   rather than a quietly empty result.
//!
//! ## Public API
//!
//! - `DataHandler`: The core trait over `{latest_bars, update_bars, continue_backtest}`.
//! - `HistoricBars`: The eager, forward-filled replay source.
//! - `DataError`: The specific error types that can be returned from this crate.

use async_trait::async_trait;
use core_types::Bar;
use events::EventQueue;

// Declare the modules that constitute this crate.
pub mod error;
pub mod historic;

// Re-export the key components to provide a clean, public-facing API.
pub use error::DataError;
pub use historic::HistoricBars;

/// The capability set every price source exposes to the rest of the system.
///
/// The dispatch loop owns the single implementation for a run; collaborators
/// receive it as `&dyn DataHandler` and can only pull. `update_bars` is async
/// so a live implementation may suspend until an external bar arrives, with
/// neither the loop nor any collaborator changing.
#[async_trait]
pub trait DataHandler: Send + Sync {
    /// Returns up to `n` of the most recently revealed bars for `symbol`,
    /// oldest first. Returns fewer when fewer have been revealed so far, and
    /// never pads with synthetic bars.
    ///
    /// A symbol outside the configured universe fails with
    /// `DataError::UnknownSymbol`; callers are expected to recover locally
    /// (skip the symbol), never to treat it as "no data yet".
    fn latest_bars(&self, symbol: &str, n: usize) -> Result<Vec<Bar>, DataError>;

    /// Convenience accessor for the single most recent bar, if any step has
    /// revealed one for this symbol yet.
    fn latest_bar(&self, symbol: &str) -> Result<Option<Bar>, DataError> {
        Ok(self.latest_bars(symbol, 1)?.pop())
    }

    /// Advances one step on the common timeline: reveals each symbol's bar
    /// for the step (if it has one), and enqueues exactly one `MarketEvent`.
    /// Once the source is exhausted it flips the continue flag instead, and
    /// enqueues nothing.
    async fn update_bars(&mut self, queue: &EventQueue) -> Result<(), DataError>;

    /// True until the underlying source is exhausted. Read by the dispatch
    /// loop to decide whether to keep pumping.
    fn continue_backtest(&self) -> bool;
}
