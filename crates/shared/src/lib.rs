//! # Savoro 共有ユーティリティ
//!
//! ドメイン・インフラ・API の各クレートから使われる共通ユーティリティ。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - HTTP・トレーシング関連の依存は `observability` feature の背後に置く
//!
//! ## モジュール構成
//!
//! - [`event_log`]: ビジネスイベントログのマクロとフィールド定数
//! - [`health`]: ヘルスチェックレスポンス
//! - [`observability`]: トレーシング初期化とリクエスト ID
//! - `canonical_log`: リクエスト完了サマリログ（`observability` feature）

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod event_log;
pub mod health;
pub mod observability;

pub use health::HealthResponse;
