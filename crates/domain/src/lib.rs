//! # KigenWatch ドメイン層
//!
//! ビジネスロジックの中核を担うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! このクレートは DDD（ドメイン駆動設計）の原則に従い、以下を提供する:
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（例: User, Product）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（例: Email,
//!   ProductName）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、外部サービス）には一切依存しない。
//! これにより、期限判定などのビジネスロジックの純粋性が保たれる。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ（テストでの固定時刻注入）
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`notification`] - 期限通知のドメインモデル
//! - [`product`] - 商品エンティティと期限判定ロジック
//! - [`user`] - ユーザーエンティティと値オブジェクト
//!
//! ## 使用例
//!
//! ```rust
//! use kigenwatch_domain::{DomainError, user::UserId};
//!
//! // ユーザー ID の生成
//! let user_id = UserId::new();
//!
//! // ドメインエラーの生成
//! let error = DomainError::NotFound {
//!     entity_type: "User",
//!     id:          user_id.to_string(),
//! };
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod notification;
pub mod product;
pub mod user;

pub use error::DomainError;
