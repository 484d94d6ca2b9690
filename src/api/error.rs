use async_graphql::ErrorExtensions;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Actuality preview is missing, set either an image or a video")]
    PreviewMissing,

    #[error("Actuality preview is ambiguous, set either an image or a video, not both")]
    PreviewAmbiguous,

    #[error("Video needs an id, a videoId or a link")]
    VideoKeyMissing,

    #[error("Actuality not found")]
    ActualityNotFound,

    #[error("Actuality with this slug already exists")]
    ActualityAlreadyExists,

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code exposed to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::PreviewMissing => "PREVIEW_MISSING",
            AppError::PreviewAmbiguous => "PREVIEW_AMBIGUOUS",
            AppError::VideoKeyMissing => "VIDEO_KEY_MISSING",
            AppError::ActualityNotFound => "ACTUALITY_NOT_FOUND",
            AppError::ActualityAlreadyExists => "ACTUALITY_ALREADY_EXISTS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidCursor(_) => "INVALID_CURSOR",
            AppError::InvalidId(_) => "INVALID_ID",
            AppError::Database(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Key of the user-facing message in the front-end translation catalogue.
    pub fn translation_key(&self) -> Option<&'static str> {
        match self {
            AppError::PreviewMissing => Some("previewImageOrVideoMissing"),
            AppError::PreviewAmbiguous => Some("eitherPreviewImageOrVideo"),
            AppError::VideoKeyMissing => Some("videoKeyMissing"),
            AppError::ActualityNotFound => Some("actualityNotFound"),
            AppError::ActualityAlreadyExists => Some("actualityAlreadyExists"),
            _ => None,
        }
    }

    /// Input field the error points at, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            AppError::Validation { field, .. } => Some(field),
            AppError::PreviewMissing | AppError::PreviewAmbiguous => Some("preview"),
            AppError::VideoKeyMissing => Some("preview.video"),
            _ => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ActualityNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ActualityAlreadyExists => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::Database(_))
    }

    /// Maps a store failure onto the nearest domain error. Unknown failures
    /// stay opaque.
    pub fn from_store(err: DbErr, on_unique: AppError) -> AppError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!("Unique constraint violated: {}", detail);
                on_unique
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                AppError::validation(
                    "input",
                    format!("Referenced record does not exist ({detail})"),
                )
            }
            _ => match err {
                DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => AppError::ActualityNotFound,
                other => AppError::Database(other),
            },
        }
    }

    fn public_message(&self) -> String {
        if self.is_internal() {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first failing field; clients fix inputs one at a time.
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_string());
                AppError::validation(field.to_string(), message)
            }
            None => AppError::validation("input", errors.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_internal() {
            tracing::error!("Internal error: {:?}", self);
        }

        let body = Json(json!({
            "error": self.public_message()
        }));

        (self.status(), body).into_response()
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        if self.is_internal() {
            tracing::error!("Internal error: {:?}", self);
        }

        async_graphql::Error::new(self.public_message()).extend_with(|_, e| {
            e.set("code", self.code());
            if let Some(key) = self.translation_key() {
                e.set("translationKey", key);
            }
            if let Some(field) = self.field() {
                e.set("field", field);
            }
        })
    }
}
