pub mod graphql;
pub mod health;

use crate::api::error::AppError;
use axum::http::Uri;

/// Fallback for routes the service does not serve.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
