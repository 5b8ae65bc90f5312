//! # リポジトリ実装
//!
//! 永続化操作のトレイトと、その PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ユースケース層はトレイトにのみ依存
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod notification_log_repository;
pub mod product_repository;
pub mod user_repository;

pub use notification_log_repository::{
    NotificationLog,
    NotificationLogRepository,
    PostgresNotificationLogRepository,
};
pub use product_repository::{PostgresProductRepository, ProductRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
