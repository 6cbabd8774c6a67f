//! # Marktide Engine Crate
//!
//! This crate is the dispatch loop: the single-threaded driver that pumps the
//! data handler, drains the event queue, and routes each event to the right
//! collaborator. It is the only component that consumes from the queue, and
//! the only one that owns the data handler.
//!
//! ## Architectural Principles
//!
//! - **Drain Before Advancing:** The queue is emptied completely before the
//!   next `update_bars` call, so every downstream consequence of a Market
//!   event resolves before the next bar is revealed. This is what rules out
//!   look-ahead bias.
//! - **Exhaustive Routing:** Events are a sum type dispatched with `match`;
//!   adding a variant without a handler is a compile error, not a silently
//!   dropped message.
//! - **No Speculative Recovery:** Collaborator errors propagate out of `run`
//!   uncaught. A failed run produces no report; partial results are never
//!   presented as complete.

use events::{Event, EventQueue};
use execution::ExecutionHandler;
use market_data::DataHandler;
use portfolio::Portfolio;
use reporter::Reporter;
use strategies::Strategy;

pub mod error;

pub use error::EngineError;

/// Where the loop currently is in its pump/drain cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Pumping the data handler for the next time step.
    Running,
    /// Emptying the queue for the current time step.
    Draining,
    /// The data source is exhausted and the reporter hand-off has happened.
    Finished,
}

/// The backtest driver.
///
/// Owns the event queue and the data handler; collaborators are boxed trait
/// objects so simulated and live implementations are interchangeable without
/// touching this loop.
pub struct Backtest {
    queue: EventQueue,
    data: Box<dyn DataHandler>,
    strategy: Box<dyn Strategy>,
    portfolio: Box<dyn Portfolio>,
    execution: Box<dyn ExecutionHandler>,
    reporter: Box<dyn Reporter>,
    state: LoopState,
}

impl Backtest {
    pub fn new(
        queue: EventQueue,
        data: Box<dyn DataHandler>,
        strategy: Box<dyn Strategy>,
        portfolio: Box<dyn Portfolio>,
        execution: Box<dyn ExecutionHandler>,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        Self {
            queue,
            data,
            strategy,
            portfolio,
            execution,
            reporter,
            state: LoopState::Running,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Runs the replay to exhaustion.
    ///
    /// Each iteration advances simulated time by exactly one step and then
    /// resolves every event that step produced. Termination is deterministic:
    /// the loop finishes exactly when the data handler reports exhaustion
    /// after a drain cycle.
    pub async fn run(&mut self) -> Result<(), EngineError> {
        tracing::info!("starting replay");
        let mut steps: u64 = 0;

        loop {
            if !self.data.continue_backtest() {
                self.state = LoopState::Finished;
                tracing::info!(steps, "data exhausted, handing off to reporter");
                self.reporter.summarize(self.data.as_ref());
                return Ok(());
            }

            self.state = LoopState::Running;
            self.data.update_bars(&self.queue).await?;
            steps += 1;

            self.drain().await?;
        }
    }

    /// Empties the queue, routing each event by variant. Popping an empty
    /// queue ends the cycle; on an already-empty queue this is a no-op.
    async fn drain(&mut self) -> Result<(), EngineError> {
        self.state = LoopState::Draining;

        while let Some(event) = self.queue.pop() {
            tracing::debug!(?event, "dispatching");
            match event {
                Event::Market(e) => {
                    // Strategy first: the portfolio's time mark must not
                    // depend on this step's trading decision.
                    self.strategy
                        .calculate_signals(&e, self.data.as_ref(), &self.queue)?;
                    self.portfolio.update_timeindex(&e, self.data.as_ref())?;
                    self.reporter.update_kline_data(&e, self.data.as_ref());
                }
                Event::Signal(e) => {
                    self.portfolio
                        .update_signal(&e, self.data.as_ref(), &self.queue)?;
                }
                Event::Order(e) => {
                    self.execution
                        .execute_order(&e, self.data.as_ref(), &self.queue)
                        .await?;
                }
                Event::Fill(e) => {
                    self.portfolio.update_fill(&e)?;
                    self.reporter.update_markpoint(&e);
                }
            }
        }

        Ok(())
    }
}
