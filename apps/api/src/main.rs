//! # Savoro API サーバー
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `EMAIL_HOST` | No | SMTP ホスト。未設定なら通知メールを送らない |
//! | `EMAIL_PORT` | No | SMTP ポート（汎用 SMTP のみ、デフォルト: `587`） |
//! | `EMAIL_USER` | No | SMTP ユーザー兼送信元アドレス |
//! | `EMAIL_PASS` | No | SMTP パスワード |
//! | `EMAIL_TO` | No | 通知先（デフォルト: `EMAIL_USER`） |
//! | `SHUTDOWN_TIMEOUT_SECS` | No | 停止時に配送完了を待つ秒数（デフォルト: `10`） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（メール送信なし）
//! cargo run -p savoro-api
//!
//! # Gmail で通知
//! EMAIL_HOST=smtp.gmail.com EMAIL_USER=... EMAIL_PASS=... cargo run -p savoro-api --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use savoro_api::{
    app_builder::build_app,
    config::ApiConfig,
    handler::{AnalyticsState, ContactState},
    shutdown::{drain_dispatches, shutdown_signal},
    usecase::{ContactUseCase, NotificationDispatcher, TemplateRenderer},
};
use savoro_domain::clock::{Clock, SystemClock};
use savoro_infra::notification::{SmtpTransportFactory, has_mail_credentials};
use savoro_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;
use tokio_util::task::TaskTracker;

/// API サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. ルーターの構築
/// 5. HTTP サーバーの起動
/// 6. 停止シグナル受信後、配送中の通知メールを待って終了
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let _tracing_guard = init_tracing(TracingConfig::from_env("savoro-api")).entered();

    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::debug!(mail = ?config.mail, "メール設定を読み込みました");
    if !has_mail_credentials(&config.mail) {
        tracing::warn!("EMAIL_HOST / EMAIL_USER / EMAIL_PASS が未設定のため、通知メールは送信されません");
    }

    // 依存コンポーネントを初期化
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let tracker = TaskTracker::new();
    let dispatcher = NotificationDispatcher::new(
        config.mail.clone(),
        Arc::new(SmtpTransportFactory),
        TemplateRenderer::new().context("メールテンプレートの読み込みに失敗しました")?,
    );
    let contact_state = Arc::new(ContactState {
        usecase: ContactUseCase::new(clock.clone(), Arc::new(dispatcher), tracker.clone()),
    });
    let analytics_state = Arc::new(AnalyticsState { clock });

    let app = build_app(contact_state, analytics_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "API サーバーを起動します");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 新しい配送の受け付けを止め、配送中のものだけ待つ
    drain_dispatches(&tracker, config.shutdown_timeout).await;

    tracing::info!("API サーバーを停止しました");
    Ok(())
}
