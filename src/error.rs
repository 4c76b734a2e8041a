//! Defines the app level error type and its conversion to JSON responses.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::{ErrorDetails, error_response};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For campaigns, this means no campaign exists with the given ID. Stores
    /// report absence with `None`, the services turn that into this error.
    ///
    /// Internally, this error may also occur when a query returns no rows.
    #[error("campaign not found")]
    NotFound,

    /// The authenticated user is not the owner of the resource they tried to
    /// view or change.
    #[error("not authorized")]
    Unauthorized,

    /// An empty string was used as a campaign name.
    #[error("campaign name cannot be empty")]
    EmptyCampaignName,

    /// The funding goal of a campaign must be a positive amount.
    #[error("goal amount must be greater than zero, got {0}")]
    InvalidGoalAmount(i64),

    /// The uploaded image is not a JPG, JPEG or PNG file.
    #[error("invalid file type, only JPG, JPEG, and PNG are allowed")]
    InvalidImageFileType,

    /// The uploaded image is larger than the upload limit.
    #[error("file size too large, the maximum is {0} bytes")]
    ImageTooLarge(usize),

    /// The multipart form did not contain a file.
    #[error("no file uploaded")]
    MissingImageFile,

    /// The multipart form could not be parsed, or a field had an invalid value.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// An uploaded file could not be written to, or removed from, disk.
    #[error("file error: {0}")]
    FileError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An auth token could not be serialized for the auth cookie.
    #[error("could not serialize JSON: {0}")]
    JSONSerializationError(String),
}

impl Error {
    /// Whether the error came from the storage layer rather than from a
    /// lookup or ownership check.
    pub fn is_repository_error(&self) -> bool {
        matches!(self, Error::SqlError(_) | Error::DatabaseLockError)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            Error::NotFound => (StatusCode::NOT_FOUND, "Not found"),
            Error::Unauthorized => (StatusCode::FORBIDDEN, "Forbidden"),
            Error::EmptyCampaignName | Error::InvalidGoalAmount(_) | Error::MultipartError(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Invalid input")
            }
            Error::InvalidImageFileType | Error::ImageTooLarge(_) | Error::MissingImageFile => {
                (StatusCode::BAD_REQUEST, "Invalid upload")
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    None::<ErrorDetails>,
                );
            }
        };

        error_response(status_code, message, Some(ErrorDetails::from(&self)))
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn other_sql_errors_are_repository_errors() {
        let error: Error = rusqlite::Error::InvalidQuery.into();

        assert_eq!(error, Error::SqlError(rusqlite::Error::InvalidQuery));
        assert!(error.is_repository_error());
        assert!(Error::DatabaseLockError.is_repository_error());
        assert!(!Error::NotFound.is_repository_error());
        assert!(!Error::Unauthorized.is_repository_error());
    }

    #[test]
    fn status_codes_follow_the_error_kind() {
        let cases = [
            (Error::NotFound, StatusCode::NOT_FOUND),
            (Error::Unauthorized, StatusCode::FORBIDDEN),
            (Error::EmptyCampaignName, StatusCode::UNPROCESSABLE_ENTITY),
            (Error::InvalidGoalAmount(0), StatusCode::UNPROCESSABLE_ENTITY),
            (
                Error::MultipartError("bad form".to_owned()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (Error::InvalidImageFileType, StatusCode::BAD_REQUEST),
            (Error::ImageTooLarge(10), StatusCode::BAD_REQUEST),
            (Error::MissingImageFile, StatusCode::BAD_REQUEST),
            (Error::DatabaseLockError, StatusCode::INTERNAL_SERVER_ERROR),
            (
                Error::SqlError(rusqlite::Error::InvalidQuery),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, want) in cases {
            let description = error.to_string();
            let got = error.into_response().status();

            assert_eq!(got, want, "wrong status for \"{description}\"");
        }
    }
}
