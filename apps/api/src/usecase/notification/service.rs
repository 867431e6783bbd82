//! # 通知ディスパッチャ
//!
//! 資格情報の確認 → トランスポート生成 → 接続確認 → テンプレートレンダリング → 送信
//! を統合するサービス。
//!
//! ## 設計方針
//!
//! - **fire-and-forget**: `dispatch()` は失敗してもエラーを返さず、結果をログに残す
//! - **送信ごとにトランスポートを生成**: 接続は使い回さない
//! - **資格情報を伏せる**: ログに出すユーザー名は先頭 5 文字のみ

use std::sync::Arc;

use savoro_domain::{
    notification::{DispatchError, DispatchOutcome, SkipReason},
    submission::{SubmissionId, ValidatedSubmission},
};
use savoro_infra::notification::{
    MailConfig,
    MailTransportFactory,
    TransportSettings,
    redact_user,
};
use savoro_shared::{
    event_log::{error as error_log, event},
    log_business_event,
};

use super::TemplateRenderer;

/// 通知ディスパッチャ
///
/// 受付 1 件につき 1 回 `dispatch()` を呼ぶ。メール設定は起動時に読み込んだものを保持し、
/// トランスポートは呼び出しのたびに `MailTransportFactory` から作る。
pub struct NotificationDispatcher {
    mail:              MailConfig,
    transport_factory: Arc<dyn MailTransportFactory>,
    template_renderer: TemplateRenderer,
}

impl NotificationDispatcher {
    pub fn new(
        mail: MailConfig,
        transport_factory: Arc<dyn MailTransportFactory>,
        template_renderer: TemplateRenderer,
    ) -> Self {
        Self {
            mail,
            transport_factory,
            template_renderer,
        }
    }

    /// 通知メールを配送する（fire-and-forget）
    ///
    /// 資格情報が未設定なら接続を試みずに [`DispatchOutcome::Skipped`] を返す。
    /// 途中のどのステップで失敗しても [`DispatchOutcome::Failed`] に変換し、ログに記録する。
    pub async fn dispatch(
        &self,
        submission: &ValidatedSubmission,
        submission_id: &SubmissionId,
    ) -> DispatchOutcome {
        let Some(settings) = self.mail.transport_settings() else {
            tracing::warn!(
                submission_id = %submission_id,
                "メール資格情報が設定されていないため通知をスキップ"
            );
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.entity_type = event::entity_type::SUBMISSION,
                event.entity_id = %submission_id,
                event.result = event::result::SKIPPED,
                notification.skip_reason = %SkipReason::NoCredentials,
                "通知メール送信スキップ"
            );
            return DispatchOutcome::Skipped(SkipReason::NoCredentials);
        };

        let recipient = self.mail.recipient().unwrap_or(&settings.user);

        match self
            .deliver(&settings, recipient, submission, submission_id)
            .await
        {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = event::entity_type::SUBMISSION,
                    event.entity_id = %submission_id,
                    event.result = event::result::SUCCESS,
                    notification.profile = settings.profile.name(),
                    notification.is_reservation = submission.is_reservation(),
                    "通知メール送信成功"
                );
                DispatchOutcome::Sent
            }
            Err(e) => {
                let (category, kind) = error_context(&e);
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = event::entity_type::SUBMISSION,
                    event.entity_id = %submission_id,
                    event.result = event::result::FAILURE,
                    error.category = category,
                    error.kind = kind,
                    error.message = %e,
                    mail.host = self.mail.host.as_deref().unwrap_or_default(),
                    mail.user = %redact_user(&settings.user),
                    notification.profile = settings.profile.name(),
                    "通知メール送信失敗"
                );
                DispatchOutcome::Failed(e)
            }
        }
    }

    async fn deliver(
        &self,
        settings: &TransportSettings,
        recipient: &str,
        submission: &ValidatedSubmission,
        submission_id: &SubmissionId,
    ) -> Result<(), DispatchError> {
        let sender = self.transport_factory.create(settings)?;
        sender.verify().await?;

        let email = self
            .template_renderer
            .render(submission, submission_id, recipient)?;

        sender.send_email(&email).await
    }
}

/// 配送エラーのログ用分類（`error.category`, `error.kind`）
///
/// テンプレートの失敗はサーバー内部の問題、それ以外はメールサーバー側の問題として扱う。
fn error_context(error: &DispatchError) -> (&'static str, &'static str) {
    match error {
        DispatchError::TemplateFailed(_) => {
            (error_log::category::INTERNAL, error_log::kind::TEMPLATE)
        }
        DispatchError::SendFailed(_) => {
            (error_log::category::EXTERNAL_SERVICE, error_log::kind::MAIL_SEND)
        }
        DispatchError::TransportBuildFailed(_) | DispatchError::TransportVerifyFailed(_) => {
            (error_log::category::EXTERNAL_SERVICE, error_log::kind::MAIL_TRANSPORT)
        }
    }
}
