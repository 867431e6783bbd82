//! # お問い合わせハンドラ
//!
//! サイトのお問い合わせフォーム・予約フォームの送信を受け付ける。
//!
//! ## エンドポイント
//!
//! - `POST /api/contact` - 送信内容の受付
//!
//! ## レスポンス
//!
//! - `200 OK`: 受付完了（通知メールの配送結果にかかわらず）
//! - `400 Bad Request`: 入力検証エラー
//! - `500 Internal Server Error`: JSON として解釈できないボディなど

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
};
use chrono::SecondsFormat;
use savoro_domain::submission::{RequestMetadata, SubmissionInput};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    usecase::{ContactReceipt, ContactUseCase},
};

/// 予約受付時のメッセージ
pub const RESERVATION_MESSAGE: &str = "Thank you for your reservation request! We will contact you \
                                       within 2 hours to confirm availability and finalize your \
                                       booking.";

/// 一般のお問い合わせ受付時のメッセージ
pub const GENERAL_MESSAGE: &str =
    "Thank you for your message! We will get back to you within 24 hours.";

/// お問い合わせ API の共有状態
pub struct ContactState {
    pub usecase: ContactUseCase,
}

/// 受付完了レスポンス DTO
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success:        bool,
    pub message:        String,
    pub timestamp:      String,
    pub submission_id:  String,
    pub is_reservation: bool,
}

impl From<&ContactReceipt> for ContactResponse {
    fn from(receipt: &ContactReceipt) -> Self {
        let message = if receipt.is_reservation {
            RESERVATION_MESSAGE
        } else {
            GENERAL_MESSAGE
        };

        Self {
            success:        true,
            message:        message.to_string(),
            timestamp:      receipt
                .received_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            submission_id:  receipt.submission_id.to_string(),
            is_reservation: receipt.is_reservation,
        }
    }
}

/// POST /api/contact
///
/// 送信内容を検証し、通知メールの配送をバックグラウンドで開始して受付結果を返す。
///
/// フォームのスクリプトは `Content-Type` を付けずに送ってくることがあるため、
/// ヘッダーは見ずにボディを JSON としてパースする。
#[tracing::instrument(skip_all)]
pub async fn submit_contact(
    State(state): State<Arc<ContactState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ContactResponse>, ApiError> {
    let input: SubmissionInput = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Internal(format!("リクエストボディのパースに失敗: {e}")))?;

    let receipt = state.usecase.submit(&input, request_metadata(&headers))?;

    Ok(Json(ContactResponse::from(&receipt)))
}

/// リクエストヘッダーから User-Agent と送信元 IP を取り出す
///
/// IP は `x-forwarded-for`、なければ `x-real-ip` を使う。
fn request_metadata(headers: &HeaderMap) -> RequestMetadata {
    let text = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    RequestMetadata::new(
        text(header::USER_AGENT.as_str()),
        text("x-forwarded-for").or_else(|| text("x-real-ip")),
    )
}
