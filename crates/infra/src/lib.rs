//! # KigenWatch インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはリポジトリトレイトと通知送信トレイトの具体的な実装を提供する。
//! 外部システムの詳細をカプセル化し、ドメイン層をインフラの変更から保護する。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理とマイグレーション
//! - **リポジトリ実装**: ユーザー・商品・通知ログの永続化
//! - **メール送信**: SMTP（lettre）による通知メール送信
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! インフラ層は `domain` に依存する。
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`notification`] - メール送信（SMTP / Noop）
//! - [`repository`] - リポジトリ実装

pub mod db;
pub mod error;
pub mod notification;
pub mod repository;

// テスト用モック（test-utils feature で他クレートからも利用可能）
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::InfraError;
