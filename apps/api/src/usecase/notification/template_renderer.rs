//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名パターン**: 予約は `🍽️ New Reservation Request - {subject}`、
//!   それ以外は `📧 New Contact from Savoro Website - {subject}`
//! - **HTML は自動エスケープ**: 送信者の入力をそのまま HTML に埋め込まない

use chrono::{DateTime, NaiveDate, Utc};
use savoro_domain::{
    notification::{DispatchError, EmailMessage},
    submission::{SubmissionId, ValidatedSubmission},
};
use tera::{Context, Tera};

const HTML_TEMPLATE: &str = "contact_notification.html";
const TEXT_TEMPLATE: &str = "contact_notification.txt";

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`ValidatedSubmission` から
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, DispatchError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    HTML_TEMPLATE,
                    include_str!("../../../templates/notifications/contact_notification.html"),
                ),
                (
                    TEXT_TEMPLATE,
                    include_str!("../../../templates/notifications/contact_notification.txt"),
                ),
            ])
            .map_err(|e| DispatchError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 送信内容から通知メールを生成する
    ///
    /// # 引数
    ///
    /// - `submission`: 検証済みの送信内容
    /// - `submission_id`: 受付 ID
    /// - `to`: 通知先アドレス
    pub fn render(
        &self,
        submission: &ValidatedSubmission,
        submission_id: &SubmissionId,
        to: &str,
    ) -> Result<EmailMessage, DispatchError> {
        let context = build_context(submission, submission_id);

        let html_body = self
            .engine
            .render(HTML_TEMPLATE, &context)
            .map_err(|e| DispatchError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(TEXT_TEMPLATE, &context)
            .map_err(|e| DispatchError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: to.to_string(),
            reply_to: submission.email().to_string(),
            subject: subject_line(submission),
            html_body,
            text_body,
        })
    }
}

/// 通知メールの件名
pub fn subject_line(submission: &ValidatedSubmission) -> String {
    if submission.is_reservation() {
        format!("🍽️ New Reservation Request - {}", submission.subject())
    } else {
        format!("📧 New Contact from Savoro Website - {}", submission.subject())
    }
}

fn build_context(submission: &ValidatedSubmission, submission_id: &SubmissionId) -> Context {
    let mut context = Context::new();
    context.insert("is_reservation", &submission.is_reservation());
    context.insert("name", submission.name());
    context.insert("email", submission.email());
    context.insert("phone", submission.phone());
    context.insert("subject", submission.subject());
    context.insert("message", submission.message());
    context.insert("received_at", &format_received_at(submission.received_at()));
    context.insert("ip", submission.metadata().ip());
    context.insert("user_agent", &submission.metadata().truncated_user_agent());
    context.insert("submission_id", submission_id.as_str());

    if let Some(reservation) = submission.reservation() {
        context.insert("reservation_date", &format_reservation_date(reservation.date()));
        context.insert("party_size", &reservation.party_size_label());
        context.insert("response_goal", "Within 2 hours");
    } else {
        context.insert("response_goal", "Within 24 hours");
    }

    context
}

/// 予約日を `Thursday, December 25, 2025` の形式にする
///
/// 日付として解釈できなければ入力をそのまま返す。
fn format_reservation_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|at| at.with_timezone(&Utc).date_naive())
        })
        .map_or_else(
            || raw.to_string(),
            |date| date.format("%A, %B %-d, %Y").to_string(),
        )
}

/// 受付時刻を `Thursday, December 25, 2025 at 02:30 PM`（UTC）の形式にする
fn format_received_at(at: DateTime<Utc>) -> String {
    at.format("%A, %B %-d, %Y at %I:%M %p").to_string()
}
