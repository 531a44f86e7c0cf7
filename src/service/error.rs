use crate::error::HttpError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Point category {0} not found")]
    CategoryNotFound(i32),

    #[error("Category item {0} not found")]
    ItemNotFound(i32),

    #[error("Category item {item_id} does not belong to category {category_id}")]
    ItemCategoryMismatch { item_id: i32, category_id: i32 },

    #[error("Category item {0} is not active")]
    ItemInactive(i32),

    #[error("Restriction {0} not found")]
    RestrictionNotFound(i32),

    #[error("Point value must be greater than zero")]
    NonPositivePoints,

    #[error("No valid user codes were provided")]
    NoRecipients,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::CategoryNotFound(_)
            | ServiceError::ItemNotFound(_)
            | ServiceError::RestrictionNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::ItemCategoryMismatch { .. }
            | ServiceError::ItemInactive(_)
            | ServiceError::NonPositivePoints
            | ServiceError::NoRecipients
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            _ => HttpError::server_error(error.to_string()),
        }
    }
}
