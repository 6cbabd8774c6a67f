use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Backing data query failed: {0}")]
    DataSource(#[from] database::DbError),

    #[error("The backing store returned no rows for requested symbol '{0}'")]
    NoRows(String),

    #[error("Symbol '{0}' is not in the configured universe")]
    UnknownSymbol(String),

    #[error("Malformed timestamp '{value}' in backing store: {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },
}
