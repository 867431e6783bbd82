//! # 通知ユースケース
//!
//! 受付内容のメール通知の生成・送信を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによるメール生成
//! - [`service`] - 資格情報確認 + トランスポート生成 + 送信の統合サービス

pub mod service;
pub mod template_renderer;

pub use service::NotificationDispatcher;
pub use template_renderer::TemplateRenderer;
