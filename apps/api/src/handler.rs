//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、期限判定などのビジネスロジックはドメイン層に委譲

pub mod health;
pub mod product;
pub mod user;

pub use health::{ReadinessState, health_check, readiness_check};
pub use product::{ProductState, create_product, list_user_products};
pub use user::{UserState, create_user, list_users};
