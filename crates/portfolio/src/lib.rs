//! # Marktide Portfolio Crate
//!
//! This crate defines the `Portfolio` contract the dispatch loop invokes for
//! Market, Signal, and Fill events, and provides `NaivePortfolio`, a
//! fixed-quantity reference implementation.
//!
//! ## Architectural Principles
//!
//! - **Signals In, Orders Out:** The portfolio is the only component allowed
//!   to turn trading advice into sized orders; position-sizing and risk rules
//!   live here and nowhere else.
//! - **Fills Are the Source of Truth:** Cash and holdings change only in
//!   response to `FillEvent`s. Emitting an order changes nothing until its
//!   fill comes back through the queue.
//!
//! ## Public API
//!
//! - `Portfolio`: The core trait the dispatch loop routes events to.
//! - `NaivePortfolio`: Fixed-quantity sizing, no risk overlay.
//! - `PortfolioError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod naive;

// Re-export the key components to provide a clean, public-facing API.
pub use error::PortfolioError;
pub use naive::NaivePortfolio;

use events::{EventQueue, FillEvent, MarketEvent, SignalEvent};
use market_data::DataHandler;

/// The contract between the dispatch loop and any portfolio implementation.
pub trait Portfolio: Send + Sync {
    /// Marks current holdings to market at the newly revealed time step.
    fn update_timeindex(
        &mut self,
        event: &MarketEvent,
        data: &dyn DataHandler,
    ) -> Result<(), PortfolioError>;

    /// Applies position-sizing rules to a strategy signal, enqueueing zero or
    /// one `OrderEvent`.
    fn update_signal(
        &mut self,
        event: &SignalEvent,
        data: &dyn DataHandler,
        queue: &EventQueue,
    ) -> Result<(), PortfolioError>;

    /// Updates cash and holdings from an execution receipt, using its
    /// fill cost and commission.
    fn update_fill(&mut self, event: &FillEvent) -> Result<(), PortfolioError>;
}
