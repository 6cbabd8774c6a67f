use crate::error::StrategyError;
use crate::Strategy;
use configuration::MaCrossoverParams;
use core_types::SignalKind;
use events::{Event, EventQueue, MarketEvent, SignalEvent};
use market_data::{DataError, DataHandler};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use ta::indicators::SimpleMovingAverage as Sma;
use ta::Next;

/// Per-symbol indicator state.
///
/// The previous MA values are what let us detect the crossover *event*
/// rather than the crossed *state*.
struct SymbolState {
    ma_fast: Sma,
    ma_slow: Sma,
    prev_fast: Option<Decimal>,
    prev_slow: Option<Decimal>,
}

/// The Double Moving Average Crossover strategy, long-only.
///
/// A Long signal fires when the fast MA crosses above the slow MA; an Exit
/// signal fires when it crosses back below.
pub struct MaCrossover {
    params: MaCrossoverParams,
    states: Vec<(String, SymbolState)>,
}

impl MaCrossover {
    /// Creates a new `MaCrossover` over the given symbols.
    ///
    /// It performs validation to ensure the parameters are logical.
    pub fn new(params: MaCrossoverParams, symbols: Vec<String>) -> Result<Self, StrategyError> {
        if params.fast_period >= params.slow_period {
            return Err(StrategyError::InvalidParameters(
                "Fast MA period must be less than Slow MA period".to_string(),
            ));
        }

        let states = symbols
            .into_iter()
            .map(|symbol| {
                let state = SymbolState {
                    ma_fast: Sma::new(params.fast_period)
                        .map_err(|e| StrategyError::IndicatorError(e.to_string()))?,
                    ma_slow: Sma::new(params.slow_period)
                        .map_err(|e| StrategyError::IndicatorError(e.to_string()))?,
                    prev_fast: None,
                    prev_slow: None,
                };
                Ok((symbol, state))
            })
            .collect::<Result<_, StrategyError>>()?;

        Ok(Self { params, states })
    }
}

impl Strategy for MaCrossover {
    /// Feeds each symbol's newly revealed close into its moving averages and
    /// emits a signal when the fast MA crosses the slow MA.
    fn calculate_signals(
        &mut self,
        _event: &MarketEvent,
        data: &dyn DataHandler,
        queue: &EventQueue,
    ) -> Result<(), StrategyError> {
        for (symbol, state) in &mut self.states {
            let bar = match data.latest_bar(symbol) {
                Ok(Some(bar)) => bar,
                Ok(None) => continue,
                Err(DataError::UnknownSymbol(_)) => {
                    tracing::warn!(%symbol, "symbol not in data universe, skipping");
                    continue;
                }
                Err(e) => return Err(StrategyError::IndicatorError(e.to_string())),
            };

            // The `ta` crate uses `f64`. This is a controlled and accepted
            // precision trade-off for using the library.
            let close_f64 = bar.close.to_f64().ok_or_else(|| {
                StrategyError::IndicatorError(format!("close {} out of f64 range", bar.close))
            })?;

            let current_fast = Decimal::from_f64(state.ma_fast.next(close_f64))
                .ok_or_else(|| StrategyError::IndicatorError("fast MA not finite".to_string()))?;
            let current_slow = Decimal::from_f64(state.ma_slow.next(close_f64))
                .ok_or_else(|| StrategyError::IndicatorError("slow MA not finite".to_string()))?;

            // Ensure we have previous MA values to detect a crossover.
            // This implicitly handles the warm-up period for the indicators.
            if let (Some(prev_fast), Some(prev_slow)) = (state.prev_fast, state.prev_slow) {
                let is_bullish_cross = prev_fast <= prev_slow && current_fast > current_slow;
                let is_bearish_cross = prev_fast >= prev_slow && current_fast < current_slow;

                if is_bullish_cross {
                    tracing::debug!(%symbol, fast = %current_fast, slow = %current_slow,
                        periods = ?(self.params.fast_period, self.params.slow_period),
                        "bullish crossover");
                    queue.push(Event::Signal(SignalEvent {
                        symbol: symbol.clone(),
                        timestamp: bar.timestamp,
                        kind: SignalKind::Long,
                        strength: dec!(1.0),
                    }));
                } else if is_bearish_cross {
                    tracing::debug!(%symbol, fast = %current_fast, slow = %current_slow,
                        "bearish crossover");
                    queue.push(Event::Signal(SignalEvent {
                        symbol: symbol.clone(),
                        timestamp: bar.timestamp,
                        kind: SignalKind::Exit,
                        strength: dec!(1.0),
                    }));
                }
            }

            // Update state for the next evaluation.
            state.prev_fast = Some(current_fast);
            state.prev_slow = Some(current_slow);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::CandleRow;
    use market_data::HistoricBars;
    use rust_decimal::Decimal;

    fn rows_from_closes(closes: &[Decimal]) -> Vec<CandleRow> {
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| CandleRow {
                id: i as i64,
                timestamp: format!("2021-03-01T00:{:02}:00.000Z", i),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: dec!(1),
                instrument_id: "AAA".to_string(),
            })
            .collect()
    }

    async fn collect_signals(closes: &[Decimal]) -> Vec<SignalEvent> {
        let universe = vec!["AAA".to_string()];
        let mut data = HistoricBars::from_rows(&universe, rows_from_closes(closes)).unwrap();
        let params = MaCrossoverParams {
            fast_period: 2,
            slow_period: 3,
        };
        let mut strategy = MaCrossover::new(params, universe).unwrap();
        let queue = EventQueue::new();
        let mut signals = Vec::new();

        while data.continue_backtest() {
            data.update_bars(&queue).await.unwrap();
            while let Some(event) = queue.pop() {
                match event {
                    Event::Market(market) => {
                        strategy.calculate_signals(&market, &data, &queue).unwrap()
                    }
                    Event::Signal(signal) => signals.push(signal),
                    other => panic!("unexpected event {:?}", other),
                }
            }
        }
        signals
    }

    #[test]
    fn rejects_inverted_periods() {
        let params = MaCrossoverParams {
            fast_period: 13,
            slow_period: 5,
        };
        assert!(MaCrossover::new(params, vec!["AAA".to_string()]).is_err());
    }

    #[tokio::test]
    async fn emits_exit_then_long_across_a_v_shaped_series() {
        // Falling closes push the fast MA below the slow (bearish cross),
        // the rebound pushes it back above (bullish cross).
        let signals = collect_signals(&[
            dec!(10),
            dec!(9),
            dec!(8),
            dec!(9),
            dec!(12),
        ])
        .await;

        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].kind, SignalKind::Exit);
        assert_eq!(signals[1].kind, SignalKind::Long);
        assert_eq!(signals[1].symbol, "AAA");
    }

    #[tokio::test]
    async fn a_flat_series_never_crosses() {
        let signals =
            collect_signals(&[dec!(5), dec!(5), dec!(5), dec!(5), dec!(5)]).await;
        assert!(signals.is_empty());
    }
}
