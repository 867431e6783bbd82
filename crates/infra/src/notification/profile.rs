//! トランスポートプロファイル
//!
//! 環境変数で与えられたメール設定から、配送に使う接続設定を決める。
//! ネットワークには触れないので、実際のメールサーバーなしでテストできる。

use std::fmt;

use strum::IntoStaticStr;

/// `EMAIL_PORT` 未設定時のポート番号
pub const DEFAULT_SMTP_PORT: u16 = 587;

const GMAIL_HOST: &str = "smtp.gmail.com";
const GMAIL_PORT: u16 = 465;
const OUTLOOK_HOST: &str = "smtp-mail.outlook.com";
const OUTLOOK_PORT: u16 = 587;

/// メール送信の設定
///
/// すべて任意項目。ホスト・ユーザー・パスワードのいずれかが欠けると配送は行わない。
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MailConfig {
    /// SMTP ホスト（`EMAIL_HOST`）
    pub host:     Option<String>,
    /// SMTP ポート（`EMAIL_PORT`）。汎用 SMTP のときだけ使う
    pub port:     Option<u16>,
    /// SMTP ユーザー兼送信元アドレス（`EMAIL_USER`）
    pub user:     Option<String>,
    /// SMTP パスワード（`EMAIL_PASS`）
    pub password: Option<String>,
    /// 送信先の上書き（`EMAIL_TO`）。未設定ならユーザー宛て
    pub to:       Option<String>,
}

impl MailConfig {
    /// 通知メールの送信先
    pub fn recipient(&self) -> Option<&str> {
        non_empty(self.to.as_deref()).or_else(|| non_empty(self.user.as_deref()))
    }

    /// 配送に使うトランスポート設定を組み立てる
    ///
    /// 資格情報がそろっていない場合は `None`。
    pub fn transport_settings(&self) -> Option<TransportSettings> {
        let host = non_empty(self.host.as_deref())?;
        let user = non_empty(self.user.as_deref())?;
        let password = non_empty(self.password.as_deref())?;

        Some(TransportSettings {
            profile:  TransportProfile::classify(host, self.port),
            user:     user.to_string(),
            password: password.to_string(),
        })
    }
}

// パスワードをログに出さないよう Debug は手書きする
impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user.as_deref().map(redact_user))
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("to", &self.to)
            .finish()
    }
}

/// ホスト・ユーザー・パスワードがすべて設定されているか
pub fn has_mail_credentials(config: &MailConfig) -> bool {
    config.transport_settings().is_some()
}

/// ログ用にユーザー名を伏せる（先頭 5 文字 + `***`）
pub fn redact_user(user: &str) -> String {
    let head: String = user.chars().take(5).collect();
    format!("{head}***")
}

/// TLS の使い方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// 接続直後から TLS（SMTPS）
    Implicit,
    /// STARTTLS 必須
    RequiredStartTls,
    /// サーバーが対応していれば STARTTLS
    Opportunistic,
}

/// トランスポートプロファイル
///
/// ホスト名の判定結果。プロバイダ名を含むホストは、設定値ではなく
/// プロバイダ既定の接続先を使う。
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TransportProfile {
    /// 汎用 SMTP（設定されたホストとポート、暗黙 TLS なし）
    GenericSmtp { host: String, port: u16 },
    /// Gmail
    Gmail,
    /// Outlook / Hotmail
    Outlook,
}

impl TransportProfile {
    /// ホスト名からプロファイルを判定する
    ///
    /// 大文字小文字を区別せず、`gmail` を含めば Gmail、`outlook` か `hotmail` を
    /// 含めば Outlook、それ以外は汎用 SMTP（ポート既定値 587）とする。
    pub fn classify(host: &str, port: Option<u16>) -> Self {
        let lowered = host.to_lowercase();
        if lowered.contains("gmail") {
            Self::Gmail
        } else if lowered.contains("outlook") || lowered.contains("hotmail") {
            Self::Outlook
        } else {
            Self::GenericSmtp {
                host: host.to_string(),
                port: port.unwrap_or(DEFAULT_SMTP_PORT),
            }
        }
    }

    /// 接続先ホスト
    pub fn relay_host(&self) -> &str {
        match self {
            Self::GenericSmtp { host, .. } => host,
            Self::Gmail => GMAIL_HOST,
            Self::Outlook => OUTLOOK_HOST,
        }
    }

    /// 接続先ポート
    pub fn port(&self) -> u16 {
        match self {
            Self::GenericSmtp { port, .. } => *port,
            Self::Gmail => GMAIL_PORT,
            Self::Outlook => OUTLOOK_PORT,
        }
    }

    pub fn tls_mode(&self) -> TlsMode {
        match self {
            Self::GenericSmtp { .. } => TlsMode::Opportunistic,
            Self::Gmail => TlsMode::Implicit,
            Self::Outlook => TlsMode::RequiredStartTls,
        }
    }

    /// ログ出力用の名前
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// 1 回の配送に使うトランスポート設定
#[derive(Clone, PartialEq, Eq)]
pub struct TransportSettings {
    pub profile:  TransportProfile,
    /// SMTP ユーザー（送信元アドレスを兼ねる）
    pub user:     String,
    pub password: String,
}

impl fmt::Debug for TransportSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportSettings")
            .field("profile", &self.profile)
            .field("user", &redact_user(&self.user))
            .field("password", &"***")
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn full_config(host: &str) -> MailConfig {
        MailConfig {
            host:     Some(host.to_string()),
            port:     None,
            user:     Some("orders@savoro.restaurant".to_string()),
            password: Some("app-password".to_string()),
            to:       None,
        }
    }

    // ===== classify =====

    #[rstest]
    #[case("smtp.gmail.com")]
    #[case("SMTP.GMAIL.COM")]
    #[case("gmail")]
    fn test_gmailを含むホストはgmailプロファイルになる(#[case] host: &str) {
        assert_eq!(TransportProfile::classify(host, Some(2525)), TransportProfile::Gmail);
    }

    #[rstest]
    #[case("smtp-mail.outlook.com")]
    #[case("smtp.Office365.outlook.com")]
    #[case("smtp.hotmail.com")]
    #[case("HOTMAIL")]
    fn test_outlookかhotmailを含むホストはoutlookプロファイルになる(#[case] host: &str) {
        assert_eq!(TransportProfile::classify(host, None), TransportProfile::Outlook);
    }

    #[test]
    fn test_その他のホストは汎用smtpでポート既定値587になる() {
        assert_eq!(
            TransportProfile::classify("mail.savoro.restaurant", None),
            TransportProfile::GenericSmtp {
                host: "mail.savoro.restaurant".to_string(),
                port: 587,
            }
        );
    }

    #[test]
    fn test_汎用smtpは設定されたポートを使う() {
        let profile = TransportProfile::classify("smtp.sendgrid.net", Some(2525));

        assert_eq!(profile.relay_host(), "smtp.sendgrid.net");
        assert_eq!(profile.port(), 2525);
        assert_eq!(profile.tls_mode(), TlsMode::Opportunistic);
        assert_eq!(profile.name(), "generic_smtp");
    }

    #[test]
    fn test_プロバイダプロファイルはプロバイダ既定の接続先を使う() {
        assert_eq!(TransportProfile::Gmail.relay_host(), "smtp.gmail.com");
        assert_eq!(TransportProfile::Gmail.port(), 465);
        assert_eq!(TransportProfile::Gmail.tls_mode(), TlsMode::Implicit);

        assert_eq!(TransportProfile::Outlook.relay_host(), "smtp-mail.outlook.com");
        assert_eq!(TransportProfile::Outlook.port(), 587);
        assert_eq!(TransportProfile::Outlook.tls_mode(), TlsMode::RequiredStartTls);
    }

    // ===== has_mail_credentials =====

    #[test]
    fn test_ホストとユーザーとパスワードがそろえば資格情報ありと判定する() {
        assert!(has_mail_credentials(&full_config("smtp.gmail.com")));
    }

    #[rstest]
    #[case::ホストなし(MailConfig { host: None, ..full_config("x") })]
    #[case::ユーザーなし(MailConfig { user: None, ..full_config("x") })]
    #[case::パスワードなし(MailConfig { password: None, ..full_config("x") })]
    #[case::パスワードが空(MailConfig { password: Some(String::new()), ..full_config("x") })]
    fn test_資格情報が欠けていればfalseを返す(#[case] config: MailConfig) {
        assert!(!has_mail_credentials(&config));
    }

    #[test]
    fn test_既定値の設定は資格情報なし() {
        assert!(!has_mail_credentials(&MailConfig::default()));
    }

    // ===== transport_settings / recipient =====

    #[test]
    fn test_トランスポート設定に判定済みプロファイルと資格情報が入る() {
        let settings = full_config("smtp.gmail.com").transport_settings().unwrap();

        assert_eq!(settings.profile, TransportProfile::Gmail);
        assert_eq!(settings.user, "orders@savoro.restaurant");
        assert_eq!(settings.password, "app-password");
    }

    #[test]
    fn test_送信先はemail_toがあればそれを使う() {
        let config = MailConfig {
            to: Some("manager@savoro.restaurant".to_string()),
            ..full_config("smtp.gmail.com")
        };

        assert_eq!(config.recipient(), Some("manager@savoro.restaurant"));
    }

    #[test]
    fn test_送信先はemail_toがなければユーザーになる() {
        assert_eq!(
            full_config("smtp.gmail.com").recipient(),
            Some("orders@savoro.restaurant")
        );
    }

    // ===== redact_user / Debug =====

    #[rstest]
    #[case("orders@savoro.restaurant", "order***")]
    #[case("abc", "abc***")]
    #[case("", "***")]
    #[case("予約担当者さま", "予約担当者***")]
    fn test_ユーザー名は先頭5文字だけ残して伏せる(#[case] user: &str, #[case] expected: &str) {
        assert_eq!(redact_user(user), expected);
    }

    #[test]
    fn test_debug出力にパスワードが含まれない() {
        let config = full_config("smtp.gmail.com");
        let settings = config.transport_settings().unwrap();

        assert!(!format!("{config:?}").contains("app-password"));
        assert!(!format!("{settings:?}").contains("app-password"));
        assert!(!format!("{settings:?}").contains("orders@savoro.restaurant"));
    }
}
