//! # グレースフルシャットダウン
//!
//! 停止シグナルの待機と、配送中の通知メールの待ち合わせを提供する。
//!
//! 停止シグナルを受けたら新しい接続の受け付けを止め、トラッカーを閉じて
//! 配送中のタスクを一定時間だけ待つ。時間内に終わらなかった配送は破棄する。

use std::time::Duration;

use tokio::signal;
use tokio_util::task::TaskTracker;

/// Ctrl+C または SIGTERM を待つ
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C ハンドラの登録に失敗");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラの登録に失敗");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("停止シグナルを受信しました");
}

/// 配送中の通知メールを待つ
///
/// トラッカーを閉じ、`timeout` までにすべての配送が終われば `true` を返す。
/// 時間切れの場合は警告を出して `false` を返す。残った配送は待たない。
pub async fn drain_dispatches(tracker: &TaskTracker, timeout: Duration) -> bool {
    tracker.close();
    tracing::info!(pending = tracker.len(), "配送中の通知メールを待機します");

    if tokio::time::timeout(timeout, tracker.wait()).await.is_ok() {
        return true;
    }

    tracing::warn!(
        pending = tracker.len(),
        timeout_secs = timeout.as_secs(),
        "配送の完了を待たずに停止します"
    );
    false
}
