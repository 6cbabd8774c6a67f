//! # Marktide Strategy Library
//!
//! This crate defines the `Strategy` contract the dispatch loop invokes on
//! every Market event, and provides two reference implementations.
//!
//! ## Architectural Principles
//!
//! - **Pull-Only Data Access:** A strategy never receives bars directly. It
//!   is handed the data handler and pulls whatever history it needs with
//!   `latest_bars`, which by construction can only ever show bars already
//!   revealed; there is no way to peek at the future.
//! - **Signals, Not Orders:** Strategies express conviction (`SignalEvent`),
//!   never position sizes. Sizing and risk belong to the portfolio.
//! - **Local Recovery:** A symbol missing from the data handler's universe is
//!   skipped with a warning; it is never allowed to abort the run.
//!
//! ## Public API
//!
//! - `Strategy`: The core trait all strategies implement.
//! - `BuyAndHold`: Goes long each symbol once and holds.
//! - `MaCrossover`: Double moving-average crossover.

// Declare all the modules that constitute this crate.
pub mod buy_and_hold;
pub mod error;
pub mod ma_crossover;

// Re-export the key components to create a clean, public-facing API.
pub use buy_and_hold::BuyAndHold;
pub use error::StrategyError;
pub use ma_crossover::MaCrossover;

use events::{EventQueue, MarketEvent};
use market_data::DataHandler;

/// The core trait that all trading strategies must implement.
///
/// The `&mut self` is crucial, as most strategies maintain internal state
/// (e.g., the previous values of an indicator). The data handler reference is
/// read-only; any signals the strategy produces go onto the shared queue.
pub trait Strategy: Send + Sync {
    /// Reacts to a newly revealed time step.
    ///
    /// # Returns
    ///
    /// * `Ok(())` with zero or more `SignalEvent`s enqueued.
    /// * `Err(StrategyError)` if evaluation itself fails; this aborts the run.
    fn calculate_signals(
        &mut self,
        event: &MarketEvent,
        data: &dyn DataHandler,
        queue: &EventQueue,
    ) -> Result<(), StrategyError>;
}
