//! # 期限スキャンジョブ
//!
//! 全ユーザーの商品を走査し、期限切れ間近（または期限切れ済み）の商品を持つ
//! ユーザーへメール通知を送る。
//!
//! ## アルゴリズム
//!
//! 1. 全ユーザーを所有商品付きで一括読み込み（LEFT JOIN 1 回、N+1 なし）
//! 2. 基準時刻 `now` を実行ごとに 1 回だけ取得し、全商品の判定に使う
//! 3. 残り日数（ゼロ方向切り捨て）が 3 以下の商品をユーザーごとに
//!    読み込み順で集約
//! 4. 対象商品が 1 件以上あるユーザーにつき、ちょうど 1 通の通知を送る
//!
//! ## エラー処理
//!
//! - 読み込み失敗は実行全体を中断する（部分的な通知は発生しない）
//! - 1 ユーザーへの送信失敗はそのユーザーに閉じ、他ユーザーの処理を継続する

use std::{sync::Arc, time::Duration};

use kigenwatch_domain::{
    clock::Clock,
    notification::{ExpiringItem, ExpiryNotification},
};
use kigenwatch_infra::{InfraError, repository::UserRepository};

use crate::usecase::notification::NotificationService;

/// 期限スキャン 1 回分の実行結果
#[derive(Debug, Default)]
pub struct ExpiryCheckRunResult {
    /// 走査したユーザー数
    pub users_scanned:  usize,
    /// 通知を送信したユーザー数
    pub users_notified: usize,
    /// 送信に失敗したユーザー数
    pub users_failed:   usize,
    /// 通知対象になった商品数
    pub products_due:   usize,
}

/// 期限スキャンジョブ
///
/// 依存（リポジトリ・通知サービス・時刻プロバイダ）はコンストラクタで
/// 注入し、テストではモックと固定時刻に差し替える。
pub struct ExpiryCheckJob {
    user_repository:      Arc<dyn UserRepository>,
    notification_service: Arc<NotificationService>,
    clock:                Arc<dyn Clock>,
}

impl ExpiryCheckJob {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        notification_service: Arc<NotificationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            notification_service,
            clock,
        }
    }

    /// 期限スキャンを 1 回実行する
    ///
    /// 読み込み失敗時は `Err` を返し、通知は一切送信しない。
    /// 送信失敗はユーザー単位で分離し、サマリの `users_failed` に計上する。
    #[tracing::instrument(skip_all)]
    pub async fn run(&self) -> Result<ExpiryCheckRunResult, InfraError> {
        let users = self.user_repository.find_all_with_products().await?;

        // 基準時刻は実行ごとに 1 回だけ取得し、全商品の判定に使う
        let now = self.clock.now();

        let mut result = ExpiryCheckRunResult {
            users_scanned: users.len(),
            ..ExpiryCheckRunResult::default()
        };

        for (user, products) in users {
            let items: Vec<ExpiringItem> = products
                .iter()
                .filter(|p| p.is_expiring(now))
                .map(|p| ExpiringItem {
                    product_name: p.name().as_str().to_string(),
                    days_left:    p.days_until_expiry(now),
                })
                .collect();

            if items.is_empty() {
                continue;
            }

            result.products_due += items.len();

            let notification = ExpiryNotification {
                recipient_user_id: user.id().clone(),
                recipient_email:   user.email().as_str().to_string(),
                user_name:         user.name().as_str().to_string(),
                items,
            };

            tracing::info!(
                recipient = %user.email(),
                products = notification.items.len(),
                "期限通知を送信します"
            );

            match self.notification_service.notify(&notification).await {
                Ok(()) => result.users_notified += 1,
                Err(e) => {
                    // 失敗はこのユーザーに閉じ、残りのユーザーの処理を継続する
                    tracing::error!(
                        error = %e,
                        recipient = %user.email(),
                        "期限通知の送信に失敗"
                    );
                    result.users_failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 期限スキャンワーカーを起動する
///
/// `run()` を `interval` 間隔で繰り返し実行する。ループは逐次実行
/// （シングルフライト）で、前回の実行が完了してから次の待機が始まる。
/// 実行失敗はログに記録し、次の周期で再実行する。
pub async fn start_expiry_check_worker(job: Arc<ExpiryCheckJob>, interval: Duration) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "期限スキャンワーカーを起動します"
    );

    loop {
        tracing::info!("期限スキャンを開始します");

        match job.run().await {
            Ok(result) => {
                tracing::info!(
                    users_scanned = result.users_scanned,
                    users_notified = result.users_notified,
                    users_failed = result.users_failed,
                    products_due = result.products_due,
                    "期限スキャン完了"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "期限スキャンに失敗しました（次の周期で再実行）");
            }
        }

        tokio::time::sleep(interval).await;
    }
}
