//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 接続先と TLS の扱いは [`TransportProfile`](super::TransportProfile) に従う。

use async_trait::async_trait;
use lettre::{
    Address,
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use savoro_domain::notification::{DispatchError, EmailMessage};

use super::{MailTransportFactory, NotificationSender, TlsMode, TransportSettings};

/// 送信元の表示名
pub const SENDER_NAME: &str = "Savoro Restaurant";

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from:      Mailbox,
    /// ログ出力用の接続先（`host:port`）
    relay:     String,
}

impl SmtpNotificationSender {
    /// トランスポート設定から送信インスタンスを作成する
    ///
    /// 接続はまだ行わない。送信元は SMTP ユーザーのアドレスになる。
    pub fn new(settings: &TransportSettings) -> Result<Self, DispatchError> {
        let from_address: Address = settings.user.parse().map_err(|e| {
            DispatchError::TransportBuildFailed(format!("送信元アドレス不正: {e}"))
        })?;

        let host = settings.profile.relay_host();
        let builder = match settings.profile.tls_mode() {
            TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(host),
            TlsMode::RequiredStartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host),
            TlsMode::Opportunistic => TlsParameters::new(host.to_string()).map(|tls| {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                    .tls(Tls::Opportunistic(tls))
            }),
        }
        .map_err(|e| DispatchError::TransportBuildFailed(e.to_string()))?;

        let transport = builder
            .port(settings.profile.port())
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: Mailbox::new(Some(SENDER_NAME.to_string()), from_address),
            relay: format!("{host}:{}", settings.profile.port()),
        })
    }

    fn build_message(&self, email: &EmailMessage) -> Result<Message, DispatchError> {
        Message::builder()
            .from(self.from.clone())
            .to(email
                .to
                .parse()
                .map_err(|e| DispatchError::SendFailed(format!("宛先アドレス不正: {e}")))?)
            .reply_to(
                email
                    .reply_to
                    .parse()
                    .map_err(|e| DispatchError::SendFailed(format!("返信先アドレス不正: {e}")))?,
            )
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| DispatchError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn verify(&self) -> Result<(), DispatchError> {
        tracing::debug!(relay = %self.relay, "SMTP サーバーへの接続を確認");

        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DispatchError::TransportVerifyFailed(
                "SMTP サーバーが応答しません".to_string(),
            )),
            Err(e) => Err(DispatchError::TransportVerifyFailed(e.to_string())),
        }
    }

    async fn send_email(&self, email: &EmailMessage) -> Result<(), DispatchError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DispatchError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        tracing::debug!(relay = %self.relay, subject = %email.subject, "SMTP でメールを送信");
        Ok(())
    }
}

/// 配送のたびに [`SmtpNotificationSender`] を生成するファクトリ
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpTransportFactory;

impl MailTransportFactory for SmtpTransportFactory {
    fn create(
        &self,
        settings: &TransportSettings,
    ) -> Result<Box<dyn NotificationSender>, DispatchError> {
        Ok(Box::new(SmtpNotificationSender::new(settings)?))
    }
}
