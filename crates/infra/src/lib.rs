//! # Savoro インフラ層
//!
//! 外部システムとの通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **メール送信**: SMTP サーバーへの接続確認と通知メールの送信
//! - **トランスポート選択**: 設定されたホスト名からプロバイダ別の接続設定を選ぶ
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`notification`] - メール送信トレイトと SMTP 実装、トランスポートプロファイル
//! - `mock` - テスト用のインメモリ実装（`test-utils` feature）

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
