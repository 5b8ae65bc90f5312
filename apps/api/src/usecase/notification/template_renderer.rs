//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで期限通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名パターン**: `[KigenWatch] 期限切れ間近の商品のお知らせ（{件数}件）`
//! - **本文の商品行**: `{商品名}（残り {日数} 日）`。期限切れ済みは負の日数で表示

use kigenwatch_domain::notification::{EmailMessage, ExpiryNotification, NotificationError};
use tera::{Context, Tera};

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`ExpiryNotification` から
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "expiry_warning.html",
                    include_str!("../../../templates/notifications/expiry_warning.html"),
                ),
                (
                    "expiry_warning.txt",
                    include_str!("../../../templates/notifications/expiry_warning.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 通知イベントからメールメッセージを生成する
    pub fn render(
        &self,
        notification: &ExpiryNotification,
    ) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        context.insert("user_name", &notification.user_name);
        context.insert("items", &notification.items);

        let subject = format!(
            "[KigenWatch] 期限切れ間近の商品のお知らせ（{}件）",
            notification.items.len()
        );

        let html_body = self
            .engine
            .render("expiry_warning.html", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render("expiry_warning.txt", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: notification.recipient_email.clone(),
            subject,
            html_body,
            text_body,
        })
    }
}
