use crate::error::StrategyError;
use crate::Strategy;
use core_types::SignalKind;
use events::{Event, EventQueue, MarketEvent, SignalEvent};
use market_data::{DataError, DataHandler};
use rust_decimal_macros::dec;
use std::collections::HashSet;

/// The simplest possible strategy: go long each symbol at its first visible
/// bar and never trade again. Useful as a baseline and as a smoke test of the
/// whole event pipeline.
pub struct BuyAndHold {
    symbols: Vec<String>,
    bought: HashSet<String>,
}

impl BuyAndHold {
    pub fn new(symbols: Vec<String>) -> Self {
        Self {
            symbols,
            bought: HashSet::new(),
        }
    }
}

impl Strategy for BuyAndHold {
    fn calculate_signals(
        &mut self,
        event: &MarketEvent,
        data: &dyn DataHandler,
        queue: &EventQueue,
    ) -> Result<(), StrategyError> {
        for symbol in &self.symbols {
            if self.bought.contains(symbol) {
                continue;
            }

            let bar = match data.latest_bar(symbol) {
                Ok(Some(bar)) => bar,
                // No bar revealed for this symbol yet; try again next step.
                Ok(None) => continue,
                Err(DataError::UnknownSymbol(_)) => {
                    tracing::warn!(%symbol, "symbol not in data universe, skipping");
                    continue;
                }
                Err(e) => return Err(StrategyError::IndicatorError(e.to_string())),
            };

            queue.push(Event::Signal(SignalEvent {
                symbol: symbol.clone(),
                timestamp: bar.timestamp,
                kind: SignalKind::Long,
                strength: dec!(1.0),
            }));
            self.bought.insert(symbol.clone());
            tracing::debug!(%symbol, timestamp = %event.timestamp, "buy-and-hold entry signal");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::CandleRow;
    use market_data::HistoricBars;
    use rust_decimal_macros::dec;

    fn rows() -> Vec<CandleRow> {
        ["2021-03-01T00:00:00.000Z", "2021-03-01T00:01:00.000Z"]
            .iter()
            .enumerate()
            .map(|(i, ts)| CandleRow {
                id: i as i64,
                timestamp: ts.to_string(),
                open: dec!(9),
                high: dec!(11),
                low: dec!(8),
                close: dec!(10),
                volume: dec!(1),
                instrument_id: "AAA".to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn signals_long_exactly_once_per_symbol() {
        let universe = vec!["AAA".to_string()];
        let mut data = HistoricBars::from_rows(&universe, rows()).unwrap();
        let mut strategy = BuyAndHold::new(universe);
        let queue = EventQueue::new();

        for _ in 0..2 {
            data.update_bars(&queue).await.unwrap();
            let Some(Event::Market(market)) = queue.pop() else {
                panic!("expected a market event");
            };
            strategy
                .calculate_signals(&market, &data, &queue)
                .unwrap();
        }

        // One Long signal from the first step, nothing from the second.
        match queue.pop() {
            Some(Event::Signal(signal)) => {
                assert_eq!(signal.kind, SignalKind::Long);
                assert_eq!(signal.symbol, "AAA");
            }
            other => panic!("expected a signal event, got {:?}", other),
        }
        assert!(queue.pop().is_none());
    }

    #[tokio::test]
    async fn unknown_symbols_are_skipped_without_aborting() {
        let universe = vec!["AAA".to_string()];
        let mut data = HistoricBars::from_rows(&universe, rows()).unwrap();
        // The strategy is configured with a symbol the data handler never
        // loaded; the run must continue regardless.
        let mut strategy = BuyAndHold::new(vec!["AAA".to_string(), "ZZZ".to_string()]);
        let queue = EventQueue::new();

        data.update_bars(&queue).await.unwrap();
        let Some(Event::Market(market)) = queue.pop() else {
            panic!("expected a market event");
        };
        strategy
            .calculate_signals(&market, &data, &queue)
            .unwrap();

        assert!(matches!(queue.pop(), Some(Event::Signal(s)) if s.symbol == "AAA"));
        assert!(queue.pop().is_none());
    }
}
