// src/api/parser.rs
//! Response parsing: turns raw HTTP responses into typed results or
//! structured errors.
//!
//! All knowledge of the API's error body shape lives here, so the client
//! stays a thin transport layer.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionErrorCode};
use serde::de::DeserializeOwned;

use super::responses::RawApiError;

/// A response body captured with enough context to diagnose failures.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub body: String,
    pub status: reqwest::StatusCode,
    pub url: String,
}

impl ApiResponse {
    /// Parse a successful response into `T`, or classify the failure.
    ///
    /// Non-2xx statuses become `NotionService` with the typed error code
    /// vocabulary; bodies that fail to deserialize become
    /// `MalformedResponse` with a bounded preview.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, AppError> {
        if !self.status.is_success() {
            return Err(self.into_service_error());
        }
        serde_json::from_str(&self.body).map_err(|err| {
            AppError::MalformedResponse(format!(
                "{} from {}: {} (body: {})",
                self.status,
                self.url,
                err,
                preview(&self.body)
            ))
        })
    }

    fn into_service_error(self) -> AppError {
        match serde_json::from_str::<RawApiError>(&self.body) {
            Ok(parsed) => AppError::NotionService {
                code: NotionErrorCode::from_api_response(&parsed.code),
                message: parsed.message,
                status: self.status,
            },
            Err(_) => AppError::NotionService {
                code: NotionErrorCode::from_http_status(self.status.as_u16()),
                message: format!("{}: {}", self.url, preview(&self.body)),
                status: self.status,
            },
        }
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(ERROR_BODY_PREVIEW_LENGTH) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            body: body.to_string(),
            status: reqwest::StatusCode::from_u16(status).unwrap(),
            url: "https://api.notion.com/v1/pages/abc".to_string(),
        }
    }

    #[test]
    fn notion_error_body_maps_to_typed_code() {
        let err = response(
            404,
            r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find page."}"#,
        )
        .parse::<serde_json::Value>()
        .unwrap_err();

        match err {
            AppError::NotionService { code, message, .. } => {
                assert!(code.is_not_found());
                assert_eq!(message, "Could not find page.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparseable_error_body_falls_back_to_status() {
        let err = response(502, "<html>bad gateway</html>")
            .parse::<serde_json::Value>()
            .unwrap_err();

        match err {
            AppError::NotionService { code, .. } => {
                assert_eq!(code, NotionErrorCode::from_http_status(502));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn garbage_success_body_is_malformed_with_preview() {
        let err = response(200, "not json").parse::<serde_json::Value>().unwrap_err();
        match err {
            AppError::MalformedResponse(msg) => assert!(msg.contains("not json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
