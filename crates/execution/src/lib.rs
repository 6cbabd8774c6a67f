//! # Marktide Execution Crate
//!
//! This crate defines the `ExecutionHandler` contract for turning orders into
//! fills, and provides `SimulatedExecutionHandler`, the deterministic
//! "virtual exchange" every backtest runs against.
//!
//! ## Architectural Principles
//!
//! - **Exactly One Fill Per Order:** The dispatch loop hands an order in; one
//!   fill receipt comes back on the queue. The handler never mutates the
//!   portfolio itself; the fill flows back through the queue and the
//!   portfolio applies it.
//! - **Deterministic Simulation:** The simulated variant prices fills purely
//!   from the order and the latest visible bar, with no randomness and no
//!   I/O, so a replay produces identical results every time.
//!
//! ## Public API
//!
//! - `ExecutionHandler`: The core trait for all execution engines.
//! - `SimulatedExecutionHandler`: The virtual exchange for backtesting.
//! - `ExecutionError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod simulated;

// Re-export the key components to provide a clean, public-facing API.
pub use error::ExecutionError;
pub use simulated::SimulatedExecutionHandler;

use async_trait::async_trait;
use events::{EventQueue, OrderEvent};
use market_data::DataHandler;

/// A generic trait for an execution engine.
///
/// This trait allows the dispatch loop to be agnostic about whether it is
/// talking to a simulated exchange or a real one. The method is async so a
/// live implementation can perform network I/O behind the same contract.
#[async_trait]
pub trait ExecutionHandler: Send + Sync {
    /// Executes an `OrderEvent`, enqueueing exactly one `FillEvent`.
    async fn execute_order(
        &mut self,
        order: &OrderEvent,
        data: &dyn DataHandler,
        queue: &EventQueue,
    ) -> Result<(), ExecutionError>;
}
