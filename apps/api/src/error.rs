//! # API エラー定義
//!
//! ハンドラで発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンス形状はフロントエンドのフォームが期待する `{ success, error }` に合わせる。
//! 内部エラーの詳細はログにのみ出力し、クライアントには固定文言を返す。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use savoro_domain::ValidationError;
use savoro_shared::event_log::error as error_log;
use serde::Serialize;
use thiserror::Error;

/// 内部エラー時にクライアントへ返す文言
pub const INTERNAL_ERROR_MESSAGE: &str =
    "Failed to send message. Please call us directly at +1 (555) 123-4567 or try again later.";

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success:   bool,
    pub error:     String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// API で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 入力検証エラー
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 想定外のエラー（リクエストボディの解釈失敗を含む）
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success:   false,
                    error:     e.to_string(),
                    timestamp: None,
                },
            ),
            ApiError::Internal(msg) => {
                tracing::error!(
                    error.category = error_log::category::INTERNAL,
                    error.kind = error_log::kind::REQUEST_BODY,
                    error.message = %msg,
                    "お問い合わせの処理に失敗"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        success:   false,
                        error:     INTERNAL_ERROR_MESSAGE.to_string(),
                        timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_検証エラーは400で理由を返す() {
        let response = ApiError::from(ValidationError::InvalidEmail).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "success": false,
                "error": "Please enter a valid email address"
            })
        );
    }

    #[tokio::test]
    async fn test_内部エラーは500で固定文言とタイムスタンプを返す() {
        let response = ApiError::Internal("EOF while parsing".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(timestamp.ends_with('Z'));
        assert!(!timestamp.contains("EOF"));
    }
}
