//! # Marktide Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL candle archive. It is the backing store every backtest replays
//! from.
//!
//! ## Architectural Principles
//!
//! - **Adapter Layer:** This crate encapsulates all database-specific logic.
//!   It hands rows to the rest of the system exactly as the store records
//!   them (timestamps included, as ISO-8601 strings); interpretation belongs
//!   to the `market-data` crate.
//! - **One Bulk Read:** A backtest run issues a single bulk query at
//!   construction and never touches the database again. There is no
//!   incremental fetching during the replay.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses
//!   a connection pool (`PgPool`) so the same adapter could serve concurrent
//!   runs.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `CandleRepository`: Holds the pool and provides the bulk candle query.
//! - `CandleRow`: One raw row of the candle table.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
pub use repository::{CandleRepository, CandleRow};
