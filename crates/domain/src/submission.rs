//! # 送信内容（お問い合わせ・予約リクエスト）
//!
//! Web サイトのフォームから届いた送信内容を検証し、
//! 検証済みの [`ValidatedSubmission`] を生成する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`SubmissionInput`] | 送信内容（未検証） | フォームから届いた JSON そのまま |
//! | [`ValidatedSubmission`] | 受付済み送信 | 必須項目とメール形式の検証を通過したもの |
//! | [`Reservation`] | 予約リクエスト | 予約日と人数の両方が指定された送信 |
//! | [`SubmissionId`] | 受付 ID | 応答時に時刻から採番する識別子 |
//!
//! ## 設計方針
//!
//! - **検証は純粋関数**: [`validate`] は時刻もメタデータも引数で受け取る
//! - **トリミングしない**: 前後の空白は呼び出し側の責務とし、値はそのまま扱う
//! - **メール形式は寛容に**: RFC 5322 準拠ではなく `local@domain.tld` の形だけを見る

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// 電話番号が未入力のときの既定値
pub const PHONE_NOT_PROVIDED: &str = "Not provided";

/// 件名が未入力のときの既定値
pub const DEFAULT_SUBJECT: &str = "General Inquiry";

/// リクエストメタデータが取得できなかったときの既定値
pub const UNKNOWN: &str = "Unknown";

/// 通知メールに載せる User-Agent の最大文字数
pub const USER_AGENT_MAX_CHARS: usize = 100;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("メールアドレスのパターンが不正")
});

/// 送信内容の検証エラー
///
/// メッセージはそのまま送信者に返される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 必須項目（名・姓・メール・メッセージ）のいずれかが未入力
    #[error("Please fill in all required fields: First Name, Last Name, Email, and Message")]
    MissingField {
        /// 未入力だった項目名（JSON のフィールド名）
        missing: Vec<&'static str>,
    },

    /// メールアドレスの形式が不正
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

impl ValidationError {
    /// 未入力だった必須項目（JSON のフィールド名）
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::MissingField { missing } => missing,
            Self::InvalidEmail => &[],
        }
    }
}

/// フォームから届いた未検証の送信内容
///
/// 必須項目も `Option` で受け取る。項目の欠落をボディのパースエラーではなく
/// [`ValidationError::MissingField`] として扱うため。
/// 各項目は文字列のほか数値・真偽値でも届きうるので、テキストに変換して保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    #[serde(default, deserialize_with = "text_like")]
    pub first_name:       Option<String>,
    #[serde(default, deserialize_with = "text_like")]
    pub last_name:        Option<String>,
    #[serde(default, deserialize_with = "text_like")]
    pub email:            Option<String>,
    #[serde(default, deserialize_with = "text_like")]
    pub phone:            Option<String>,
    #[serde(default, deserialize_with = "text_like")]
    pub message:          Option<String>,
    #[serde(default, deserialize_with = "text_like")]
    pub subject:          Option<String>,
    #[serde(default, deserialize_with = "text_like")]
    pub reservation_date: Option<String>,
    /// 人数。フォームによって `"4"` と `4` のどちらでも届く
    #[serde(default, deserialize_with = "text_like")]
    pub party_size:       Option<String>,
}

/// 文字列・数値・真偽値をテキストとして受け取る
///
/// `null` は未入力として扱う。配列やオブジェクトはパースエラーになる。
fn text_like<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextLike {
        Text(String),
        Number(serde_json::Number),
        Bool(bool),
    }

    Ok(
        Option::<TextLike>::deserialize(deserializer)?.map(|value| match value {
            TextLike::Text(text) => text,
            TextLike::Number(number) => number.to_string(),
            TextLike::Bool(flag) => flag.to_string(),
        }),
    )
}

/// リクエストのトランスポート層から取得したメタデータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    user_agent: String,
    ip:         String,
}

impl RequestMetadata {
    /// メタデータを作成する
    ///
    /// 未取得・空文字の値は `"Unknown"` になる。
    pub fn new(user_agent: Option<String>, ip: Option<String>) -> Self {
        Self {
            user_agent: non_empty(user_agent).unwrap_or_else(|| UNKNOWN.to_string()),
            ip:         non_empty(ip).unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// 先頭 100 文字に切り詰めた User-Agent
    ///
    /// 切り詰めた場合は末尾に `...` を付ける。
    pub fn truncated_user_agent(&self) -> String {
        if self.user_agent.chars().count() <= USER_AGENT_MAX_CHARS {
            return self.user_agent.clone();
        }
        let head: String = self.user_agent.chars().take(USER_AGENT_MAX_CHARS).collect();
        format!("{head}...")
    }
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// 予約リクエスト
///
/// 予約日と人数は検証せず、届いたテキストをそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    date:       String,
    party_size: String,
}

impl Reservation {
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn party_size(&self) -> &str {
        &self.party_size
    }

    /// 人数の表示用ラベル（`1 person` / `4 people`）
    pub fn party_size_label(&self) -> String {
        let unit = if self.party_size == "1" {
            "person"
        } else {
            "people"
        };
        format!("{} {unit}", self.party_size)
    }
}

/// 検証済みの送信
///
/// [`validate`] でのみ生成される。生成後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    name:        String,
    email:       String,
    phone:       String,
    subject:     String,
    message:     String,
    reservation: Option<Reservation>,
    received_at: DateTime<Utc>,
    metadata:    RequestMetadata,
}

impl ValidatedSubmission {
    /// 送信者名（`{名} {姓}`）
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn reservation(&self) -> Option<&Reservation> {
        self.reservation.as_ref()
    }

    /// 予約日と人数の両方が指定されているか
    pub fn is_reservation(&self) -> bool {
        self.reservation.is_some()
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

/// 受付 ID
///
/// `SAVORO_{UNIX ミリ秒}` の形式。乱数を含まないため、
/// 同一ミリ秒内の受付同士では衝突しうる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// 指定時刻から受付 ID を採番する
    pub fn from_time(at: DateTime<Utc>) -> Self {
        Self(format!("SAVORO_{}", at.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// メールアドレスが `local@domain.tld` の形をしているか
pub fn is_email_like(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// 送信内容を検証する
///
/// # エラー
///
/// - 名・姓・メール・メッセージのいずれかが未入力または空文字:
///   [`ValidationError::MissingField`]
/// - メールアドレスがパターンに一致しない: [`ValidationError::InvalidEmail`]
pub fn validate(
    input: &SubmissionInput,
    metadata: RequestMetadata,
    received_at: DateTime<Utc>,
) -> Result<ValidatedSubmission, ValidationError> {
    let first_name = required_text(&input.first_name);
    let last_name = required_text(&input.last_name);
    let email = required_text(&input.email);
    let message = required_text(&input.message);

    let (Some(first_name), Some(last_name), Some(email), Some(message)) =
        (first_name, last_name, email, message)
    else {
        let missing = [
            ("firstName", first_name),
            ("lastName", last_name),
            ("email", email),
            ("message", message),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| field)
        .collect();
        return Err(ValidationError::MissingField { missing });
    };

    if !is_email_like(email) {
        return Err(ValidationError::InvalidEmail);
    }

    let reservation = match (
        non_empty(input.reservation_date.clone()),
        non_empty(input.party_size.clone()),
    ) {
        (Some(date), Some(party_size)) => Some(Reservation { date, party_size }),
        _ => None,
    };

    Ok(ValidatedSubmission {
        name: format!("{first_name} {last_name}"),
        email: email.to_string(),
        phone: non_empty(input.phone.clone()).unwrap_or_else(|| PHONE_NOT_PROVIDED.to_string()),
        subject: non_empty(input.subject.clone()).unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
        message: message.to_string(),
        reservation,
        received_at,
        metadata,
    })
}

fn required_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
