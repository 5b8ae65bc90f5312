//! # 通知
//!
//! 期限通知に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 役割 |
//! |---|------------|------|
//! | [`ExpiryNotification`] | 期限通知イベント | 1 ユーザー分の通知対象商品をまとめたもの |
//! | [`ExpiringItem`] | 通知対象商品 | 商品名と残り日数の組 |
//! | [`EmailMessage`] | メールメッセージ | テンプレートレンダリングの出力 |
//!
//! ## 設計方針
//!
//! - **1 ユーザー 1 通知**: スキャン 1 回の実行につき、通知対象商品を持つ
//!   ユーザーごとにちょうど 1 通のメールを送る
//! - **順序保持**: `items` は商品の読み込み順を保持する
//! - **テンプレート分離**: 通知イベントとメール生成は分離
//!   （TemplateRenderer は api クレート側）

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

use crate::user::UserId;

define_uuid_id! {
    /// 通知ログ ID（一意識別子）
    ///
    /// notification_logs テーブルの主キー。UUID v7 を使用。
    pub struct NotificationLogId;
}

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// 通知イベント種別
///
/// notification_logs テーブルの `event_type` カラムに格納される値。
/// snake_case でシリアライズされる。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationEventType {
    /// 期限警告: 残り日数がしきい値以下の商品を持つユーザーに送信
    ExpiryWarning,
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// 通知対象商品（商品名と残り日数の組）
///
/// テンプレートにそのまま渡せるよう `Serialize` を実装する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiringItem {
    /// 商品名
    pub product_name: String,
    /// 基準時刻からの残り日数（期限切れ済みは負の値）
    pub days_left:    i64,
}

/// 期限通知イベント
///
/// スキャン 1 回の実行で 1 ユーザーに送る通知の内容。
/// `items` には通知対象商品が読み込み順で 1 件以上入る。
#[derive(Debug, Clone)]
pub struct ExpiryNotification {
    /// 受信者のユーザー ID
    pub recipient_user_id: UserId,
    /// 受信者のメールアドレス
    pub recipient_email:   String,
    /// 受信者の表示名（メール本文の宛名に使用）
    pub user_name:         String,
    /// 通知対象商品（読み込み順、1 件以上）
    pub items:             Vec<ExpiringItem>,
}

impl ExpiryNotification {
    /// 通知イベント種別を返す
    pub fn event_type(&self) -> NotificationEventType {
        NotificationEventType::ExpiryWarning
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn notification_event_type_の文字列変換が正しい() {
        // Display (snake_case)
        assert_eq!(
            NotificationEventType::ExpiryWarning.to_string(),
            "expiry_warning"
        );

        // FromStr (snake_case)
        assert_eq!(
            NotificationEventType::from_str("expiry_warning").unwrap(),
            NotificationEventType::ExpiryWarning
        );
    }

    #[test]
    fn event_typeが期限警告を返す() {
        let notification = ExpiryNotification {
            recipient_user_id: UserId::new(),
            recipient_email:   "tanaka@example.com".to_string(),
            user_name:         "田中太郎".to_string(),
            items:             vec![ExpiringItem {
                product_name: "牛乳".to_string(),
                days_left:    2,
            }],
        };

        assert_eq!(
            notification.event_type(),
            NotificationEventType::ExpiryWarning
        );
    }

    #[test]
    fn expiring_itemのserialize結果が正しい() {
        let item = ExpiringItem {
            product_name: "牛乳".to_string(),
            days_left:    -1,
        };
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "product_name": "牛乳", "days_left": -1 })
        );
    }
}
