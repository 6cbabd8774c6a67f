use crate::error::DataError;
use crate::DataHandler;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::Bar;
use database::{CandleRepository, CandleRow};
use events::{Event, EventQueue, MarketEvent};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The historic replay source.
///
/// Construction does all the heavy lifting: the raw rows are projected per
/// symbol, the union of every symbol's timestamps becomes the common
/// timeline, and each series is reindexed onto that timeline with
/// forward-fill. After that, every symbol reports a bar at every timestamp
/// any symbol traded, so all strategies observe aligned time steps and the
/// replay itself is a single cursor walking the timeline.
pub struct HistoricBars {
    /// The union of all symbols' timestamps, strictly increasing.
    timeline: Vec<DateTime<Utc>>,
    /// Per-symbol series reindexed onto the timeline. `None` marks a slot
    /// before the symbol's first native bar, where there is nothing to
    /// forward-fill from.
    aligned: HashMap<String, Vec<Option<Bar>>>,
    /// Per-symbol append-only logs of bars already revealed to the system.
    seen: HashMap<String, Vec<Bar>>,
    /// The next step to reveal. One lockstep cursor stands in for the
    /// per-symbol cursors, since every aligned series has timeline length.
    step: usize,
    continue_backtest: bool,
}

impl HistoricBars {
    /// Loads the full candle archive through the repository and aligns it for
    /// the given symbol universe. This is the only database round-trip of a
    /// run.
    pub async fn load(
        repository: &CandleRepository,
        symbols: &[String],
    ) -> Result<Self, DataError> {
        let rows = repository.fetch_all_candles().await?;
        tracing::info!(rows = rows.len(), "loaded candle archive");
        Self::from_rows(symbols, rows)
    }

    /// Builds the aligned replay state from raw rows.
    ///
    /// Separated from `load` so the alignment logic is testable without a
    /// database, and so alternative stores can feed the same code path.
    pub fn from_rows(symbols: &[String], rows: Vec<CandleRow>) -> Result<Self, DataError> {
        // 1. Project the rows belonging to each requested symbol, parsing
        // the store's ISO-8601 timestamp strings as we go.
        let mut native: HashMap<&str, BTreeMap<DateTime<Utc>, Bar>> =
            symbols.iter().map(|s| (s.as_str(), BTreeMap::new())).collect();

        for row in &rows {
            let Some(series) = native.get_mut(row.instrument_id.as_str()) else {
                // Rows for instruments outside the universe are ignored.
                continue;
            };
            let timestamp = parse_store_timestamp(&row.timestamp)?;
            series.insert(timestamp, bar_from_row(row, timestamp));
        }

        // 2. A symbol with no rows must fail loudly now, not masquerade as
        // exhaustion on step one.
        for symbol in symbols {
            if native[symbol.as_str()].is_empty() {
                return Err(DataError::NoRows(symbol.clone()));
            }
        }

        // 3. The common timeline is the union of all symbols' indices.
        let timeline: Vec<DateTime<Utc>> = native
            .values()
            .flat_map(|series| series.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // 4. Reindex every series onto the timeline with forward-fill.
        let mut aligned = HashMap::new();
        let mut seen = HashMap::new();
        for symbol in symbols {
            let series = &native[symbol.as_str()];
            let mut filled: Vec<Option<Bar>> = Vec::with_capacity(timeline.len());
            let mut last: Option<&Bar> = None;
            for &timestamp in &timeline {
                if let Some(bar) = series.get(&timestamp) {
                    last = Some(bar);
                    filled.push(Some(bar.clone()));
                } else {
                    // A gap inherits the prior bar's values under the grid
                    // timestamp; a leading gap has nothing to inherit.
                    filled.push(last.map(|bar| bar.forward_filled_to(timestamp)));
                }
            }
            aligned.insert(symbol.clone(), filled);
            seen.insert(symbol.clone(), Vec::new());
        }

        tracing::debug!(
            symbols = symbols.len(),
            steps = timeline.len(),
            "aligned candle series onto common timeline"
        );

        Ok(Self {
            timeline,
            aligned,
            seen,
            step: 0,
            continue_backtest: true,
        })
    }

    /// The number of advancing steps a full replay will take.
    pub fn total_steps(&self) -> usize {
        self.timeline.len()
    }
}

#[async_trait]
impl DataHandler for HistoricBars {
    fn latest_bars(&self, symbol: &str, n: usize) -> Result<Vec<Bar>, DataError> {
        let log = self
            .seen
            .get(symbol)
            .ok_or_else(|| DataError::UnknownSymbol(symbol.to_string()))?;
        let start = log.len().saturating_sub(n);
        Ok(log[start..].to_vec())
    }

    async fn update_bars(&mut self, queue: &EventQueue) -> Result<(), DataError> {
        if self.step >= self.timeline.len() {
            // Terminal guard: exhausted sources flip the flag and never
            // enqueue another Market event.
            self.continue_backtest = false;
            return Ok(());
        }

        let timestamp = self.timeline[self.step];
        for (symbol, log) in self.seen.iter_mut() {
            // `aligned` and `seen` share one key set by construction.
            if let Some(Some(bar)) = self.aligned.get(symbol).map(|series| &series[self.step]) {
                log.push(bar.clone());
            }
        }
        self.step += 1;
        if self.step == self.timeline.len() {
            self.continue_backtest = false;
        }

        // Exactly one Market event per step, no matter how many symbols
        // advanced.
        tracing::debug!(%timestamp, step = self.step, "revealed time step");
        queue.push(Event::Market(MarketEvent { timestamp }));
        Ok(())
    }

    fn continue_backtest(&self) -> bool {
        self.continue_backtest
    }
}

/// Parses the store's timestamp format: ISO-8601 with fractional seconds and
/// a trailing `Z`, e.g. `2021-03-01T00:01:00.000Z`.
fn parse_store_timestamp(value: &str) -> Result<DateTime<Utc>, DataError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| DataError::Timestamp {
            value: value.to_string(),
            source,
        })
}

fn bar_from_row(row: &CandleRow, timestamp: DateTime<Utc>) -> Bar {
    Bar {
        symbol: row.instrument_id.clone(),
        timestamp,
        open: row.open,
        high: row.high,
        low: row.low,
        close: row.close,
        volume: row.volume,
    }
}
