use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::upstream::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Upstream call failed: {0}")]
    Upstream(#[from] UpstreamError),
}

/// JSON body returned for every failed relay
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upstream(UpstreamError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Upstream(UpstreamError::Timeout(_)) => "Upstream service timed out",
            AppError::Upstream(_) => "Upstream service unavailable",
        };

        tracing::warn!(error = %self, status = status.as_u16(), "Upstream call failed");

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = AppError::from(UpstreamError::Timeout(Duration::from_secs(30)));
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_upstream_failures_map_to_bad_gateway() {
        let unset = AppError::from(UpstreamError::HostUnset {
            var: "HOST".to_string(),
        });
        assert_eq!(unset.status(), StatusCode::BAD_GATEWAY);

        let status = AppError::from(UpstreamError::Status(StatusCode::NOT_FOUND));
        assert_eq!(status.status(), StatusCode::BAD_GATEWAY);

        let decode = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        assert_eq!(
            AppError::from(UpstreamError::Decode(decode)).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_response_has_json_body() {
        let response = AppError::from(UpstreamError::HostUnset {
            var: "HOST".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_error_body_names_failure_kind() {
        use axum::body::to_bytes;

        let response = AppError::from(UpstreamError::Timeout(Duration::from_secs(1))).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Upstream service timed out"}"#);

        let response = AppError::from(UpstreamError::Status(StatusCode::SERVICE_UNAVAILABLE)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Upstream service unavailable"}"#);
    }
}
