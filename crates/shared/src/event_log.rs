//! # ビジネスイベントログの構造化ヘルパー
//!
//! ログを `jq` で効率的に調査できるよう、ログフィールドの命名規約と
//! ヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"`
//! マーカーが自動付与され、
//! `jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`event.action`）を使用。tracing の
//! `$($field:ident).+` パターンでサポートされ、JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const USER: &str = "user";
        pub const PRODUCT: &str = "product";
        pub const NOTIFICATION: &str = "notification";
    }

    /// イベントアクション
    pub mod action {
        // ユーザー・商品
        pub const USER_CREATED: &str = "user.created";
        pub const PRODUCT_CREATED: &str = "product.created";

        // 通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const USER: &str = "user";
        pub const PRODUCT: &str = "product";
        pub const NOTIFICATION_LOG: &str = "notification_log";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}
