use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::domain::AvatarError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingFile,
    InvalidFileType,
    FileTooLarge,
    DecodeError,
    StorageUnavailable,
    FieldTooLong,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: Option<ErrorCode>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AvatarError> for ApiError {
    fn from(err: AvatarError) -> Self {
        match err {
            AvatarError::MissingFile => {
                Self::bad_request("No image file provided").with_code(ErrorCode::MissingFile)
            }
            AvatarError::InvalidFileType => {
                Self::bad_request("File must be an image").with_code(ErrorCode::InvalidFileType)
            }
            AvatarError::FileTooLarge => Self::bad_request("Image size must be at most 5MB")
                .with_code(ErrorCode::FileTooLarge),
            AvatarError::DecodeError => Self::bad_request("File could not be read as an image")
                .with_code(ErrorCode::DecodeError),
            AvatarError::UserNotFound => Self::not_found("user not found"),
            AvatarError::FieldTooLong(field) => {
                Self::bad_request(format!("{field} is too long")).with_code(ErrorCode::FieldTooLong)
            }
            AvatarError::StorageUnavailable => {
                tracing::error!("Avatar upload attempted without configured storage");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Avatar storage is unavailable",
                )
                .with_code(ErrorCode::StorageUnavailable)
            }
            AvatarError::StorageWriteFailed(_)
            | AvatarError::StorageDeleteFailed(_)
            | AvatarError::ProfileUpdateFailed(_)
            | AvatarError::Processing(_) => {
                tracing::error!("Avatar operation failed: {}", err);
                Self::internal("avatar operation failed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        for err in [
            AvatarError::MissingFile,
            AvatarError::InvalidFileType,
            AvatarError::FileTooLarge,
            AvatarError::DecodeError,
        ] {
            assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn infrastructure_errors_hide_details() {
        let err = ApiError::from(AvatarError::StorageWriteFailed("bucket exploded".into()));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("bucket exploded"));
    }

    #[test]
    fn unconfigured_storage_is_service_unavailable() {
        let err = ApiError::from(AvatarError::StorageUnavailable);

        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
