//! # ユースケース層
//!
//! お問い合わせ受付のアプリケーションロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: 時計とトランスポートファクトリを `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは HTTP との変換のみを行い、ロジックはユースケースに集約
//!
//! ## モジュール構成
//!
//! - [`contact`] - 送信内容の検証と通知配送の起動
//! - [`notification`] - 通知メールの生成と配送

pub mod contact;
pub mod notification;

pub use contact::{ContactReceipt, ContactUseCase};
pub use notification::{NotificationDispatcher, TemplateRenderer};
