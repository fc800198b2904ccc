use thiserror::Error;

/// Failures of the menu store.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<models::errors::ModelError> for MenuError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => MenuError::Validation(msg),
            models::errors::ModelError::Db(msg) => MenuError::Storage(msg),
        }
    }
}

impl From<sea_orm::DbErr> for MenuError {
    fn from(e: sea_orm::DbErr) -> Self { MenuError::Storage(e.to_string()) }
}
