use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    #[error("Connection error: {0}")]
    Connection(#[from] deadpool_postgres::PoolError),
    #[error("Record not found")]
    NotFound,
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl DaoError {
    pub fn is_not_found(&self) -> bool { matches!(self, DaoError::NotFound) }
}

pub trait DaoResultExt<T> {
    /// Maps an absent row to [`DaoError::NotFound`].
    fn or_not_found(self) -> Result<T, DaoError>;
}

impl<T> DaoResultExt<T> for Result<Option<T>, DaoError> {
    fn or_not_found(self) -> Result<T, DaoError> {
        self.and_then(|row| row.ok_or(DaoError::NotFound))
    }
}
