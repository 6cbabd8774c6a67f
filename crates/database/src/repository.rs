use crate::DbError;
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::Row;

/// One raw row of the minute-candle table, exactly as the store records it.
///
/// The `timestamp` column is kept as the ISO-8601 string the store uses
/// (fractional seconds, trailing `Z`); parsing it into a typed timestamp is
/// the data handler's job, so this crate stays a thin adapter.
#[derive(Debug, Clone)]
pub struct CandleRow {
    pub id: i64,
    pub timestamp: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub instrument_id: String,
}

/// The `CandleRepository` provides a high-level, application-specific
/// interface to the candle archive. It encapsulates all SQL for this system.
#[derive(Debug, Clone)]
pub struct CandleRepository {
    pool: PgPool,
}

impl CandleRepository {
    /// Creates a new `CandleRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches every candle row in chronological order, for all instruments.
    ///
    /// A backtest loads its entire universe in this one query; per-symbol
    /// projection and timeline alignment happen in memory afterwards.
    pub async fn fetch_all_candles(&self) -> Result<Vec<CandleRow>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, timestamp, open, high, low, close, volume, instrument_id
            FROM candles_60s
            ORDER BY timestamp ASC, instrument_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let candles = rows
            .into_iter()
            .map(|row| CandleRow {
                id: row.get("id"),
                timestamp: row.get("timestamp"),
                open: row.get("open"),
                high: row.get("high"),
                low: row.get("low"),
                close: row.get("close"),
                volume: row.get("volume"),
                instrument_id: row.get("instrument_id"),
            })
            .collect();

        Ok(candles)
    }
}
