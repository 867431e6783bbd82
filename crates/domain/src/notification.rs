//! # 通知
//!
//! 受付内容をレストランに知らせる通知メールのドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`EmailMessage`] | 通知メール | テンプレートレンダリングの出力 |
//! | [`DispatchOutcome`] | 配送結果 | 送信済み・スキップ・失敗のいずれか |
//! | [`DispatchError`] | 配送エラー | 接続確認・送信・レンダリングの失敗 |
//!
//! ## 設計方針
//!
//! - **fire-and-forget**: 配送結果は送信者への応答に影響しない
//! - **エラーは外に出さない**: [`DispatchError`] はログに記録されるだけで、呼び出し元に伝播しない

use strum::IntoStaticStr;
use thiserror::Error;

/// 配送エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// メールトランスポートの構築に失敗（ホスト名不正など）
    #[error("メールトランスポートの構築に失敗: {0}")]
    TransportBuildFailed(String),

    /// 送信前の接続確認に失敗
    #[error("メールサーバーへの接続確認に失敗: {0}")]
    TransportVerifyFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),
}

/// 配送をスキップした理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// ホスト・ユーザー・パスワードのいずれかが未設定
    NoCredentials,
}

/// 配送結果
///
/// ログにのみ使われ、HTTP レスポンスには反映されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 送信済み
    Sent,
    /// 送信を試みなかった
    Skipped(SkipReason),
    /// 送信を試みたが失敗した
    Failed(DispatchError),
}

impl DispatchOutcome {
    /// ログ出力用のラベル
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Skipped(_) => "skipped",
            Self::Failed(_) => "failed",
        }
    }
}

/// 通知メール
///
/// テンプレートレンダリングの出力。`NotificationSender` に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 返信先（送信者のメールアドレス）
    pub reply_to:  String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}
