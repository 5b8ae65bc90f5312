//! # NotificationLogRepository
//!
//! 通知ログの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **fire-and-forget ログ**: 送信成功・失敗どちらも記録する
//! - **監査専用**: 送信抑止（重複通知の排除）には使用しない

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kigenwatch_domain::{notification::NotificationLogId, user::UserId};
use sqlx::PgPool;

use crate::error::InfraError;

/// 通知ログ（リポジトリ INSERT 用データ型）
#[derive(Debug, Clone)]
pub struct NotificationLog {
    pub id:                NotificationLogId,
    pub event_type:        String,
    pub recipient_user_id: UserId,
    pub recipient_email:   String,
    pub subject:           String,
    pub status:            String,
    pub error_message:     Option<String>,
    pub sent_at:           DateTime<Utc>,
}

/// 通知ログリポジトリトレイト
#[async_trait]
pub trait NotificationLogRepository: Send + Sync {
    /// 通知ログを挿入する
    async fn insert(&self, log: &NotificationLog) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の NotificationLogRepository
#[derive(Debug, Clone)]
pub struct PostgresNotificationLogRepository {
    pool: PgPool,
}

impl PostgresNotificationLogRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationLogRepository for PostgresNotificationLogRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, log: &NotificationLog) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO notification_logs (
                id, event_type,
                recipient_user_id, recipient_email,
                subject, status, error_message, sent_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(log.id.as_uuid())
        .bind(&log.event_type)
        .bind(log.recipient_user_id.as_uuid())
        .bind(&log.recipient_email)
        .bind(&log.subject)
        .bind(&log.status)
        .bind(&log.error_message)
        .bind(log.sent_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresNotificationLogRepository>();
    }
}
