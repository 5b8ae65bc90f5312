//! # 通知ユースケース
//!
//! テンプレートレンダリング → メール送信 → ログ記録の通知フローを提供する。

mod service;
mod template_renderer;

pub use service::NotificationService;
pub use template_renderer::TemplateRenderer;
