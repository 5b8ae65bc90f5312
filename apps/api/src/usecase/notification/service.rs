//! # 通知サービス
//!
//! テンプレートレンダリング → メール送信 → ログ記録を統合するサービス。
//!
//! ## 設計方針
//!
//! - **結果を返す**: `notify()` はレンダリング・送信の失敗を `Err` で返す。
//!   呼び出し元（期限スキャンジョブ）がユーザー単位で失敗を分離する
//! - **ログ記録**: 送信の成功・失敗どちらも `notification_logs` テーブルに
//!   記録する。記録自体の失敗はログ出力のみ（通知結果には影響しない）
//! - **依存性注入**: `NotificationSender` と `NotificationLogRepository` は
//!   trait で抽象化

use std::sync::Arc;

use chrono::Utc;
use kigenwatch_domain::notification::{
    ExpiryNotification,
    NotificationError,
    NotificationLogId,
};
use kigenwatch_infra::{
    notification::NotificationSender,
    repository::{NotificationLog, NotificationLogRepository},
};
use kigenwatch_shared::{event_log::event, log_business_event};

use super::TemplateRenderer;

/// 通知サービス
///
/// 期限スキャンに伴うメール通知の全体フローを統合する。
pub struct NotificationService {
    sender:            Arc<dyn NotificationSender>,
    template_renderer: TemplateRenderer,
    log_repo:          Arc<dyn NotificationLogRepository>,
}

impl NotificationService {
    pub fn new(
        sender: Arc<dyn NotificationSender>,
        template_renderer: TemplateRenderer,
        log_repo: Arc<dyn NotificationLogRepository>,
    ) -> Self {
        Self {
            sender,
            template_renderer,
            log_repo,
        }
    }

    /// 通知を送信する
    ///
    /// テンプレートレンダリング → メール送信 → ログ記録を行う。
    /// レンダリング・送信の失敗は `Err` で返す（呼び出し元が分離する）。
    /// ログ記録の失敗はログ出力のみで、戻り値には影響しない。
    pub async fn notify(
        &self,
        notification: &ExpiryNotification,
    ) -> Result<(), NotificationError> {
        let event_type_str: &str = notification.event_type().into();

        // テンプレートレンダリング
        let email = match self.template_renderer.render(notification) {
            Ok(email) => email,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event_type = event_type_str,
                    "通知テンプレートのレンダリングに失敗"
                );
                return Err(e);
            }
        };

        // メール送信
        let send_result = self.sender.send_email(&email).await;
        let (status, error_message) = match &send_result {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = event::entity_type::NOTIFICATION_LOG,
                    event.result = event::result::SUCCESS,
                    notification.event_type = event_type_str,
                    notification.recipient = %email.to,
                    "通知メール送信成功"
                );
                ("sent".to_string(), None)
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = event::entity_type::NOTIFICATION_LOG,
                    event.result = event::result::FAILURE,
                    notification.event_type = event_type_str,
                    notification.recipient = %email.to,
                    error = %e,
                    "通知メール送信失敗"
                );
                ("failed".to_string(), Some(e.to_string()))
            }
        };

        // 通知ログ記録（監査用。送信抑止には使用しない）
        let log = NotificationLog {
            id: NotificationLogId::new(),
            event_type: event_type_str.to_string(),
            recipient_user_id: notification.recipient_user_id.clone(),
            recipient_email: notification.recipient_email.clone(),
            subject: email.subject.clone(),
            status,
            error_message,
            sent_at: Utc::now(),
        };

        if let Err(e) = self.log_repo.insert(&log).await {
            tracing::error!(
                error = %e,
                "通知ログの記録に失敗"
            );
        }

        send_result
    }
}

#[cfg(test)]
mod tests {
    use kigenwatch_domain::{notification::ExpiringItem, user::UserId};
    use kigenwatch_infra::mock::{MockNotificationLogRepository, MockNotificationSender};

    use super::*;

    fn make_service(
        sender: MockNotificationSender,
        log_repo: MockNotificationLogRepository,
    ) -> NotificationService {
        let template_renderer = TemplateRenderer::new().unwrap();
        NotificationService::new(Arc::new(sender), template_renderer, Arc::new(log_repo))
    }

    fn make_notification() -> ExpiryNotification {
        ExpiryNotification {
            recipient_user_id: UserId::new(),
            recipient_email:   "tanaka@example.com".to_string(),
            user_name:         "田中太郎".to_string(),
            items:             vec![ExpiringItem {
                product_name: "牛乳".to_string(),
                days_left:    2,
            }],
        }
    }

    #[tokio::test]
    async fn 送信成功時にlog_repoにstatus_sentで記録する() {
        let sender = MockNotificationSender::new();
        let log_repo = MockNotificationLogRepository::new();
        let service = make_service(sender.clone(), log_repo.clone());

        let result = service.notify(&make_notification()).await;

        assert!(result.is_ok());
        let logs = log_repo.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, "sent");
        assert!(logs[0].error_message.is_none());
        assert_eq!(logs[0].event_type, "expiry_warning");
        assert_eq!(logs[0].recipient_email, "tanaka@example.com");
    }

    #[tokio::test]
    async fn 送信失敗時にlog_repoにstatus_failedで記録しerrを返す() {
        let sender = MockNotificationSender::new();
        sender.fail_for("tanaka@example.com");
        let log_repo = MockNotificationLogRepository::new();
        let service = make_service(sender, log_repo.clone());

        let result = service.notify(&make_notification()).await;

        assert!(result.is_err());
        let logs = log_repo.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, "failed");
        assert!(logs[0].error_message.is_some());
    }

    #[tokio::test]
    async fn mock_notification_senderが送信メッセージを記録する() {
        let sender = MockNotificationSender::new();
        let log_repo = MockNotificationLogRepository::new();
        let service = make_service(sender.clone(), log_repo);

        service.notify(&make_notification()).await.unwrap();

        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "tanaka@example.com");
        assert_eq!(
            sent[0].subject,
            "[KigenWatch] 期限切れ間近の商品のお知らせ（1件）"
        );
        assert!(sent[0].text_body.contains("牛乳（残り 2 日）"));
    }
}
