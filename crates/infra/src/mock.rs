//! # テスト用モックトランスポート
//!
//! ユースケース・ハンドラのテストで使用するインメモリのメール送信実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! savoro-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use savoro_domain::notification::{DispatchError, EmailMessage};

use crate::notification::{MailTransportFactory, NotificationSender, TransportSettings};

/// 失敗させる段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// トランスポートの構築
    Build,
    /// 接続確認
    Verify,
    /// 送信
    Send,
}

/// インメモリのトランスポートファクトリ
///
/// 生成したトランスポート設定と送信されたメールを記録する。
/// Clone しても記録は共有される。
#[derive(Clone, Default)]
pub struct MockTransportFactory {
    failure:  Option<MockFailure>,
    created:  Arc<Mutex<Vec<TransportSettings>>>,
    verified: Arc<Mutex<usize>>,
    sent:     Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockTransportFactory {
    /// 常に成功するファクトリ
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した段階で失敗するファクトリ
    pub fn failing_at(failure: MockFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    /// これまでに生成したトランスポートの設定
    pub fn created_settings(&self) -> Vec<TransportSettings> {
        self.created.lock().unwrap().clone()
    }

    /// 接続確認が成功した回数
    pub fn verified_count(&self) -> usize {
        *self.verified.lock().unwrap()
    }

    /// 送信に成功したメール
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailTransportFactory for MockTransportFactory {
    fn create(
        &self,
        settings: &TransportSettings,
    ) -> Result<Box<dyn NotificationSender>, DispatchError> {
        if self.failure == Some(MockFailure::Build) {
            return Err(DispatchError::TransportBuildFailed(
                "mock: build failure".to_string(),
            ));
        }
        self.created.lock().unwrap().push(settings.clone());

        Ok(Box::new(MockNotificationSender {
            failure:  self.failure,
            verified: self.verified.clone(),
            sent:     self.sent.clone(),
        }))
    }
}

struct MockNotificationSender {
    failure:  Option<MockFailure>,
    verified: Arc<Mutex<usize>>,
    sent:     Arc<Mutex<Vec<EmailMessage>>>,
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn verify(&self) -> Result<(), DispatchError> {
        if self.failure == Some(MockFailure::Verify) {
            return Err(DispatchError::TransportVerifyFailed(
                "mock: connection refused".to_string(),
            ));
        }
        *self.verified.lock().unwrap() += 1;
        Ok(())
    }

    async fn send_email(&self, email: &EmailMessage) -> Result<(), DispatchError> {
        if self.failure == Some(MockFailure::Send) {
            return Err(DispatchError::SendFailed(
                "mock: 550 mailbox unavailable".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
