//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait で接続確認とメール送信を抽象化
//! - **送信ごとに生成**: トランスポートはプールせず、`MailTransportFactory` が配送のたびに作る
//! - **プロファイル選択は純粋関数**: ホスト名の判定はネットワーククライアントから切り離す

mod profile;
mod smtp;

use async_trait::async_trait;
pub use profile::{
    DEFAULT_SMTP_PORT,
    MailConfig,
    TlsMode,
    TransportProfile,
    TransportSettings,
    has_mail_credentials,
    redact_user,
};
use savoro_domain::notification::{DispatchError, EmailMessage};
pub use smtp::{SENDER_NAME, SmtpNotificationSender, SmtpTransportFactory};

/// メール送信トレイト
///
/// 1 回の配送のために生成され、接続確認 → 送信の順に呼ばれる。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールサーバーへの接続を確認する
    async fn verify(&self) -> Result<(), DispatchError>;

    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), DispatchError>;
}

/// 配送ごとにメール送信インスタンスを生成するファクトリ
pub trait MailTransportFactory: Send + Sync {
    /// トランスポート設定から送信インスタンスを作成する
    fn create(
        &self,
        settings: &TransportSettings,
    ) -> Result<Box<dyn NotificationSender>, DispatchError>;
}
