//! # アプリケーション構築
//!
//! ルーター定義とミドルウェアの組み立てを担当する。
//! `main.rs` は設定読み込みとサーバー起動・停止に集中する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use savoro_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handler::{
    AnalyticsState,
    ContactState,
    get_analytics,
    health_check,
    submit_contact,
};

/// ルーターを構築する
///
/// レイヤーは下から順に適用される（最後に追加したものが最外）:
///
/// 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
/// 2. TraceLayer: request_id を含むスパンを作成し、全ログに自動注入
/// 3. CanonicalLogLineLayer: リクエスト完了時に 1 行サマリログを出力（スパン内）
/// 4. PropagateRequestIdLayer: レスポンスヘッダーに `x-request-id` をコピー
pub fn build_app(contact_state: Arc<ContactState>, analytics_state: Arc<AnalyticsState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/contact", post(submit_contact))
        .with_state(contact_state)
        .route("/api/analytics", get(get_analytics))
        .with_state(analytics_state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
