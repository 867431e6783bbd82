//! # API サーバー設定
//!
//! 環境変数からサーバーとメール送信の設定を読み込む。
//!
//! 読み込みはキー検索関数に対する純粋関数（[`ApiConfig::from_lookup`]）として実装し、
//! テストで環境変数を書き換えずに済むようにしている。

use std::{env, time::Duration};

use savoro_infra::notification::MailConfig;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 数値として解釈できない値
    #[error("{key} は数値である必要があります: {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// バインドアドレス（`API_HOST`）
    pub host:             String,
    /// ポート番号（`API_PORT`）
    pub port:             u16,
    /// メール送信設定（`EMAIL_*`）
    pub mail:             MailConfig,
    /// 停止時に配送完了を待つ上限（`SHUTDOWN_TIMEOUT_SECS`）
    pub shutdown_timeout: Duration,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// キー検索関数から設定を読み込む
    ///
    /// 空文字列は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Ok(Self {
            host:             get("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port:             parse_number("API_PORT", get("API_PORT"))?.unwrap_or(DEFAULT_PORT),
            mail:             MailConfig {
                host:     get("EMAIL_HOST"),
                port:     parse_number("EMAIL_PORT", get("EMAIL_PORT"))?,
                user:     get("EMAIL_USER"),
                password: get("EMAIL_PASS"),
                to:       get("EMAIL_TO"),
            },
            shutdown_timeout: Duration::from_secs(
                parse_number("SHUTDOWN_TIMEOUT_SECS", get("SHUTDOWN_TIMEOUT_SECS"))?
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            ),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|raw| {
            raw.parse()
                .map_err(|_| ConfigError::InvalidNumber { key, value: raw })
        })
        .transpose()
}
