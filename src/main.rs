use configuration::load_config;
use database::{connect, CandleRepository};
use engine::Backtest;
use events::EventQueue;
use execution::SimulatedExecutionHandler;
use market_data::HistoricBars;
use portfolio::NaivePortfolio;
use reporter::KlineReporter;
use strategies::MaCrossover;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Marktide backtesting application.
///
/// Wiring order matters only at construction: the data handler is built
/// first because it is the fatal-error surface (a bad database or an empty
/// symbol universe must abort before any simulation state exists).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (DATABASE_URL lives there).
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = load_config()?;
    tracing::info!(
        symbols = ?config.backtest.symbols,
        start_time = %config.backtest.start_time,
        "starting backtest"
    );

    let db_pool = connect().await?;
    let repository = CandleRepository::new(db_pool);

    // The single bulk load; everything after this point is in-memory replay.
    let data = HistoricBars::load(&repository, &config.backtest.symbols).await?;
    tracing::info!(steps = data.total_steps(), "aligned replay timeline built");

    let strategy = MaCrossover::new(
        config.strategies.ma_crossover.clone(),
        config.backtest.symbols.clone(),
    )?;
    let portfolio = NaivePortfolio::new(
        config.backtest.symbols.clone(),
        config.backtest.initial_capital,
        config.sizing.clone(),
    );
    let execution = SimulatedExecutionHandler::new(config.simulation.clone());
    let reporter = KlineReporter::new(config.backtest.symbols.clone());

    let mut backtest = Backtest::new(
        EventQueue::new(),
        Box::new(data),
        Box::new(strategy),
        Box::new(portfolio),
        Box::new(execution),
        Box::new(reporter),
    );

    backtest.run().await?;

    Ok(())
}
