use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database: {0}")]
    ConnectionError(sqlx::Error),

    #[error("Failed to query the database: {0}")]
    QueryError(#[from] sqlx::Error),
}
