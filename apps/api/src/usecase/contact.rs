//! # お問い合わせ受付ユースケース
//!
//! 送信内容を検証し、受付 ID を採番して通知メールの配送を起動する。
//!
//! 送信内容は永続化しないため、受付時のビジネスイベントに全項目を載せる。
//! メール未設定や配送失敗のときは、このログが唯一の記録になる。
//!
//! 配送はレスポンスから切り離したタスクで行い、`TaskTracker` で追跡する。
//! サーバー停止時はトラッカーを閉じて、一定時間だけ配送の完了を待つ。

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use savoro_domain::{
    ValidationError,
    clock::Clock,
    submission::{RequestMetadata, Reservation, SubmissionId, SubmissionInput, validate},
};
use savoro_shared::{event_log::event, log_business_event};
use tokio_util::task::TaskTracker;
use tracing::Instrument;

use super::NotificationDispatcher;

/// 受付結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReceipt {
    pub submission_id:  SubmissionId,
    pub received_at:    DateTime<Utc>,
    pub is_reservation: bool,
}

/// お問い合わせ受付ユースケース
pub struct ContactUseCase {
    clock:      Arc<dyn Clock>,
    dispatcher: Arc<NotificationDispatcher>,
    tracker:    TaskTracker,
}

impl ContactUseCase {
    pub fn new(
        clock: Arc<dyn Clock>,
        dispatcher: Arc<NotificationDispatcher>,
        tracker: TaskTracker,
    ) -> Self {
        Self {
            clock,
            dispatcher,
            tracker,
        }
    }

    /// 送信内容を受け付ける
    ///
    /// 検証に成功したら通知メールの配送をバックグラウンドで開始し、配送の完了を待たずに
    /// 受付結果を返す。配送の成否は受付結果に影響しない。
    pub fn submit(
        &self,
        input: &SubmissionInput,
        metadata: RequestMetadata,
    ) -> Result<ContactReceipt, ValidationError> {
        let received_at = self.clock.now();

        let submission = validate(input, metadata, received_at).inspect_err(|e| {
            log_business_event!(
                event.category = event::category::CONTACT,
                event.action = event::action::CONTACT_REJECTED,
                event.entity_type = event::entity_type::SUBMISSION,
                event.result = event::result::FAILURE,
                validation.reason = %e,
                validation.missing = ?e.missing_fields(),
                "お問い合わせを受け付けなかった"
            );
        })?;

        let submission_id = SubmissionId::from_time(received_at);
        log_business_event!(
            event.category = event::category::CONTACT,
            event.action = event::action::CONTACT_RECEIVED,
            event.entity_type = event::entity_type::SUBMISSION,
            event.entity_id = %submission_id,
            event.result = event::result::SUCCESS,
            contact.is_reservation = submission.is_reservation(),
            contact.name = submission.name(),
            contact.email = submission.email(),
            contact.phone = submission.phone(),
            contact.subject = submission.subject(),
            contact.message = submission.message(),
            contact.reservation_date = submission.reservation().map(Reservation::date),
            contact.party_size = submission.reservation().map(Reservation::party_size),
            contact.received_at = %received_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            "お問い合わせを受け付けた"
        );

        let receipt = ContactReceipt {
            submission_id:  submission_id.clone(),
            received_at,
            is_reservation: submission.is_reservation(),
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        self.tracker.spawn(
            async move {
                let outcome = dispatcher.dispatch(&submission, &submission_id).await;
                tracing::debug!(
                    submission_id = %submission_id,
                    outcome = outcome.label(),
                    "通知配送が完了"
                );
            }
            .in_current_span(),
        );

        Ok(receipt)
    }
}
