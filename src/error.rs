use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use strum_macros::IntoStaticStr;

use crate::model::overtime::FailureResponse;

/// Every way a submit or totals request can fail.
///
/// The variant name doubles as the machine-readable `error` field of the
/// JSON failure body, the `Display` text as its `message`.
#[derive(Debug, Display, IntoStaticStr, PartialEq)]
pub enum OvertimeError {
    /// Comma separated list of the required fields that were absent.
    #[display(fmt = "Incomplete data: missing {}", _0)]
    IncompleteInput(String),

    #[display(fmt = "Invalid value for {}: {}", field, reason)]
    InvalidField { field: &'static str, reason: String },

    #[display(fmt = "End time must be after start time")]
    InvalidRange,

    #[display(fmt = "Could not connect to the record store: {}", _0)]
    StoreUnavailable(String),

    #[display(fmt = "Stored total time {:?} could not be parsed", _0)]
    MalformedStoredDuration(String),
}

impl std::error::Error for OvertimeError {}

impl OvertimeError {
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl From<sqlx::Error> for OvertimeError {
    fn from(e: sqlx::Error) -> Self {
        OvertimeError::StoreUnavailable(e.to_string())
    }
}

impl From<reqwest::Error> for OvertimeError {
    fn from(e: reqwest::Error) -> Self {
        OvertimeError::StoreUnavailable(e.to_string())
    }
}

impl ResponseError for OvertimeError {
    fn status_code(&self) -> StatusCode {
        match self {
            OvertimeError::IncompleteInput(_)
            | OvertimeError::InvalidField { .. }
            | OvertimeError::InvalidRange => StatusCode::BAD_REQUEST,
            OvertimeError::StoreUnavailable(_) | OvertimeError::MalformedStoredDuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(FailureResponse {
            success: false,
            error: self.kind().to_string(),
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_variant_name() {
        assert_eq!(OvertimeError::InvalidRange.kind(), "InvalidRange");
        assert_eq!(
            OvertimeError::StoreUnavailable("down".into()).kind(),
            "StoreUnavailable"
        );
    }

    #[test]
    fn input_errors_are_bad_requests() {
        assert_eq!(
            OvertimeError::IncompleteInput("date".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(OvertimeError::InvalidRange.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            OvertimeError::MalformedStoredDuration("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            OvertimeError::IncompleteInput("agent, date".into()).to_string(),
            "Incomplete data: missing agent, date"
        );
        assert_eq!(
            OvertimeError::InvalidRange.to_string(),
            "End time must be after start time"
        );
    }
}
