// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::AccountAddress;

/// Longest asset name or unit name accepted in a start request.
pub const MAX_ASSET_TEXT_LEN: usize = 256;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, error = %self.message, "Request rejected");
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Parse a path address, trimming surrounding whitespace and rejecting blanks.
pub fn parse_address(raw: String) -> Result<AccountAddress, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request("Account address must not be empty"));
    }
    Ok(AccountAddress::from(trimmed))
}

/// Reject oversized free-text fields.
pub fn ensure_text_len(field: &str, value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some(text) if text.chars().count() > MAX_ASSET_TEXT_LEN => Err(ApiError::unprocessable(
            format!("{field} exceeds {MAX_ASSET_TEXT_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");

        let missing = ApiError::not_found("gone");
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let unp = ApiError::unprocessable("oops");
        assert_eq!(unp.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(unp.to_string(), "422 Unprocessable Entity: oops");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }

    #[test]
    fn blank_address_is_rejected() {
        let err = parse_address("  ".to_string()).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(parse_address("ADDR".to_string()).unwrap().as_str(), "ADDR");
    }

    #[test]
    fn address_is_trimmed() {
        assert_eq!(parse_address(" ALICE\t".to_string()).unwrap(), AccountAddress::from("ALICE"));
    }

    #[test]
    fn long_text_is_rejected() {
        let long = "x".repeat(MAX_ASSET_TEXT_LEN + 1);
        let err = ensure_text_len("name", Some(&long)).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(ensure_text_len("name", None).is_ok());
        assert!(ensure_text_len("name", Some("USDC")).is_ok());
    }
}
