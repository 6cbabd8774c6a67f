use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No market data visible for '{0}'; cannot price the order")]
    NoMarketData(String),

    #[error("Data handler error during execution: {0}")]
    Data(#[from] market_data::DataError),
}
