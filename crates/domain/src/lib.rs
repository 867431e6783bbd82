//! # Savoro ドメイン層
//!
//! お問い合わせ・予約フォームの受付に関するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **値の検証は生成時に行う**: [`submission::ValidatedSubmission`] はバリデータ経由でしか
//!   構築できず、不正な状態のインスタンスは存在しない
//! - **純粋関数**: 時刻やリクエストメタデータは引数で受け取り、環境に依存しない
//! - **永続化なし**: すべてのエンティティのライフサイクルは 1 リクエスト内で完結する
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//!  ↘
//!   shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ
//! - [`submission`] - 送信内容の検証と受付 ID
//! - [`notification`] - 通知メールと配送結果
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::Utc;
//! use savoro_domain::submission::{RequestMetadata, SubmissionInput, validate};
//!
//! let input = SubmissionInput {
//!     first_name: Some("Jane".to_string()),
//!     last_name: Some("Doe".to_string()),
//!     email: Some("jane@example.com".to_string()),
//!     message: Some("Hello".to_string()),
//!     ..Default::default()
//! };
//!
//! let submission = validate(&input, RequestMetadata::default(), Utc::now()).unwrap();
//! assert_eq!(submission.name(), "Jane Doe");
//! assert!(!submission.is_reservation());
//! ```

pub mod clock;
pub mod notification;
pub mod submission;

pub use submission::ValidationError;
