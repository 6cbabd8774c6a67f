use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Data handler error: {0}")]
    Data(#[from] market_data::DataError),

    #[error("Strategy execution error: {0}")]
    Strategy(#[from] strategies::StrategyError),

    #[error("Portfolio accounting error: {0}")]
    Portfolio(#[from] portfolio::PortfolioError),

    #[error("Execution simulation error: {0}")]
    Execution(#[from] execution::ExecutionError),
}
