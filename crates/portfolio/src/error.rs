use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Not enough cash to honour fill. Required: {required}, Available: {available}")]
    InsufficientCash { required: String, available: String },

    #[error("Data handler error while marking portfolio: {0}")]
    Data(#[from] market_data::DataError),
}
