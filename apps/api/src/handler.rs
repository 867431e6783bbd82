//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ロジックはユースケースに委譲
//!
//! ## モジュール構成
//!
//! ```text
//! handler.rs            # 親モジュール（re-export）
//! └── handler/
//!     ├── analytics.rs  # 集計データ（デモ用の固定値）
//!     ├── contact.rs    # お問い合わせ・予約の受付
//!     └── health.rs     # ヘルスチェック
//! ```

pub mod analytics;
pub mod contact;
pub mod health;

pub use analytics::{AnalyticsState, get_analytics};
pub use contact::{ContactState, submit_contact};
pub use health::health_check;
