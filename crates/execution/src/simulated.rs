use crate::error::ExecutionError;
use crate::ExecutionHandler;
use async_trait::async_trait;
use configuration::Simulation;
use events::{Event, EventQueue, FillEvent, OrderEvent};
use market_data::DataHandler;

/// The "virtual exchange" for backtesting.
///
/// Orders fill at the latest visible close for their symbol, in full, on the
/// same time step they were placed. Commission is a configured fraction of
/// the fill cost. Everything is derived from the order and the revealed data,
/// so execution is fully deterministic.
pub struct SimulatedExecutionHandler {
    params: Simulation,
}

impl SimulatedExecutionHandler {
    pub fn new(params: Simulation) -> Self {
        Self { params }
    }
}

#[async_trait]
impl ExecutionHandler for SimulatedExecutionHandler {
    /// Simulates the execution of an order against the latest bar.
    async fn execute_order(
        &mut self,
        order: &OrderEvent,
        data: &dyn DataHandler,
        queue: &EventQueue,
    ) -> Result<(), ExecutionError> {
        let bar = data
            .latest_bar(&order.symbol)?
            .ok_or_else(|| ExecutionError::NoMarketData(order.symbol.clone()))?;

        let fill_cost = bar.close * order.quantity;
        let commission = fill_cost * self.params.commission_pct;

        let fill = FillEvent {
            timestamp: bar.timestamp,
            symbol: order.symbol.clone(),
            exchange: self.params.exchange.clone(),
            quantity: order.quantity,
            direction: order.direction,
            fill_cost,
            commission,
        };
        tracing::debug!(symbol = %fill.symbol, cost = %fill.fill_cost,
            commission = %fill.commission, direction = ?fill.direction, "simulated fill");

        queue.push(Event::Fill(fill));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{OrderKind, TradeDirection};
    use database::CandleRow;
    use market_data::HistoricBars;
    use rust_decimal_macros::dec;

    fn simulation() -> Simulation {
        Simulation {
            commission_pct: dec!(0.001),
            exchange: "SIMULATED".to_string(),
        }
    }

    async fn revealed_data() -> HistoricBars {
        let universe = vec!["AAA".to_string()];
        let rows = vec![CandleRow {
            id: 1,
            timestamp: "2021-03-01T00:00:00.000Z".to_string(),
            open: dec!(9),
            high: dec!(11),
            low: dec!(8),
            close: dec!(10),
            volume: dec!(1),
            instrument_id: "AAA".to_string(),
        }];
        let mut data = HistoricBars::from_rows(&universe, rows).unwrap();
        data.update_bars(&EventQueue::new()).await.unwrap();
        data
    }

    #[tokio::test]
    async fn fills_at_the_latest_close_with_commission() {
        let data = revealed_data().await;
        let mut handler = SimulatedExecutionHandler::new(simulation());
        let queue = EventQueue::new();

        let order = OrderEvent {
            symbol: "AAA".to_string(),
            kind: OrderKind::Market,
            quantity: dec!(100),
            direction: TradeDirection::Buy,
        };
        handler.execute_order(&order, &data, &queue).await.unwrap();

        match queue.pop() {
            Some(Event::Fill(fill)) => {
                assert_eq!(fill.fill_cost, dec!(1000)); // 100 * close 10
                assert_eq!(fill.commission, dec!(1.000)); // 0.1% of cost
                assert_eq!(fill.direction, TradeDirection::Buy);
                assert_eq!(fill.exchange, "SIMULATED");
                assert_eq!(fill.quantity, dec!(100));
            }
            other => panic!("expected a fill event, got {:?}", other),
        }
        // Exactly one fill per order.
        assert!(queue.pop().is_none());
    }

    #[tokio::test]
    async fn an_order_before_any_revealed_bar_is_an_error() {
        let universe = vec!["AAA".to_string()];
        let rows = vec![CandleRow {
            id: 1,
            timestamp: "2021-03-01T00:00:00.000Z".to_string(),
            open: dec!(9),
            high: dec!(11),
            low: dec!(8),
            close: dec!(10),
            volume: dec!(1),
            instrument_id: "AAA".to_string(),
        }];
        // No update_bars call: nothing is visible yet.
        let data = HistoricBars::from_rows(&universe, rows).unwrap();
        let mut handler = SimulatedExecutionHandler::new(simulation());
        let queue = EventQueue::new();

        let order = OrderEvent {
            symbol: "AAA".to_string(),
            kind: OrderKind::Market,
            quantity: dec!(1),
            direction: TradeDirection::Sell,
        };
        let result = handler.execute_order(&order, &data, &queue).await;
        assert!(matches!(result, Err(ExecutionError::NoMarketData(_))));
        assert!(queue.is_empty());
    }
}
