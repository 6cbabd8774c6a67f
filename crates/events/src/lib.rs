//! # Marktide Events
//!
//! This crate defines the event records that flow between the data handler,
//! strategy, portfolio, and execution components, along with the FIFO queue
//! that carries them.
//!
//! As a Layer 0 crate, it depends only on `core-types` and provides the
//! definitive message language of the simulation: every component speaks in
//! these four event variants and nothing else.

// Declare the modules that make up this crate.
pub mod messages;
pub mod queue;

// Re-export the core types to provide a clean public API.
pub use messages::{Event, FillEvent, MarketEvent, OrderEvent, SignalEvent};
pub use queue::EventQueue;
