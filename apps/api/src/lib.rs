//! # Savoro API サーバー
//!
//! レストランサイトのお問い合わせ・予約フォームを受け付け、通知メールを配送する。
//!
//! ## 処理の流れ
//!
//! ```text
//! POST /api/contact
//!   → 入力検証（savoro_domain::submission）
//!   → 受付 ID 採番 + 通知配送の起動（usecase::contact、バックグラウンド）
//!   → 受付結果レスポンス（handler::contact）
//! ```
//!
//! 通知メールの配送結果はレスポンスに影響しない。配送に失敗しても送信者には
//! 受付完了が返り、失敗はログにのみ記録される。
//!
//! ## モジュール構成
//!
//! - [`app_builder`] - ルーターとミドルウェアの組み立て
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`shutdown`] - 停止シグナルの待機と配送中タスクの待ち合わせ
//! - [`usecase`] - 受付と通知配送のアプリケーションロジック

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod shutdown;
pub mod usecase;
