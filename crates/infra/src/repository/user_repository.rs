//! # UserRepository
//!
//! ユーザー情報の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **型安全な復元**: 行データはドメインの値オブジェクト経由で再構築
//! - **商品の一括取得**: N+1 問題を避けるため LEFT JOIN で取得

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kigenwatch_domain::{
    product::{Product, ProductId, ProductName},
    user::{Email, User, UserId, UserName},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
///
/// ユーザー情報の永続化操作を定義する。
/// インフラ層で具体的な実装を提供し、ハンドラ・ジョブから利用する。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを挿入する
    async fn insert(&self, user: &User) -> Result<(), InfraError>;

    /// ID でユーザーを検索する
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(user))`: ユーザーが見つかった場合
    /// - `Ok(None)`: ユーザーが見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;

    /// 全ユーザーを作成順で取得する
    async fn find_all(&self) -> Result<Vec<User>, InfraError>;

    /// 全ユーザーを所有商品付きで取得する
    ///
    /// 期限スキャンの読み込み操作。LEFT JOIN 1 回で取得し、
    /// ユーザーごとのクエリ（N+1）を発行しない。
    /// 商品を持たないユーザーも空の Vec 付きで含まれる。
    /// 商品はユーザー内で作成順に並ぶ。
    async fn find_all_with_products(&self) -> Result<Vec<(User, Vec<Product>)>, InfraError>;
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// users テーブルの行
#[derive(sqlx::FromRow)]
struct UserRow {
    id:         Uuid,
    email:      String,
    name:       String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    /// 行データからドメインエンティティを復元する
    fn into_user(self) -> Result<User, InfraError> {
        Ok(User::from_db(
            UserId::from_uuid(self.id),
            Email::new(&self.email).map_err(|e| InfraError::unexpected(e.to_string()))?,
            UserName::new(&self.name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            self.created_at,
        ))
    }
}

/// users LEFT JOIN products の行
///
/// 商品を持たないユーザーの行では商品カラムがすべて NULL になる。
#[derive(sqlx::FromRow)]
struct UserProductRow {
    id:                 Uuid,
    email:              String,
    name:               String,
    created_at:         DateTime<Utc>,
    product_id:         Option<Uuid>,
    product_name:       Option<String>,
    product_expiry_at:  Option<DateTime<Utc>>,
    product_created_at: Option<DateTime<Utc>>,
}

impl UserProductRow {
    fn user(&self) -> Result<User, InfraError> {
        Ok(User::from_db(
            UserId::from_uuid(self.id),
            Email::new(&self.email).map_err(|e| InfraError::unexpected(e.to_string()))?,
            UserName::new(&self.name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            self.created_at,
        ))
    }

    /// 商品カラムが NULL でなければ商品を復元する
    fn product(&self) -> Result<Option<Product>, InfraError> {
        let Some(product_id) = self.product_id else {
            return Ok(None);
        };

        let name = self
            .product_name
            .as_deref()
            .ok_or_else(|| InfraError::unexpected("products.name が NULL です"))?;
        let expiry_at = self
            .product_expiry_at
            .ok_or_else(|| InfraError::unexpected("products.expiry_at が NULL です"))?;
        let created_at = self
            .product_created_at
            .ok_or_else(|| InfraError::unexpected("products.created_at が NULL です"))?;

        Ok(Some(Product::from_db(
            ProductId::from_uuid(product_id),
            UserId::from_uuid(self.id),
            ProductName::new(name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            expiry_at,
            created_at,
        )))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, user: &User) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email().as_str())
        .bind(user.name().as_str())
        .bind(user.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<User>, InfraError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all_with_products(&self) -> Result<Vec<(User, Vec<Product>)>, InfraError> {
        let rows = sqlx::query_as::<_, UserProductRow>(
            r#"
            SELECT
                u.id,
                u.email,
                u.name,
                u.created_at,
                p.id         AS product_id,
                p.name       AS product_name,
                p.expiry_at  AS product_expiry_at,
                p.created_at AS product_created_at
            FROM users u
            LEFT JOIN products p ON p.user_id = u.id
            ORDER BY u.created_at, u.id, p.created_at, p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // 行はユーザー順に並んでいるため、ユーザー ID の変わり目で区切って集約する
        let mut result: Vec<(User, Vec<Product>)> = Vec::new();
        for row in rows {
            let is_same_user = result
                .last()
                .is_some_and(|(user, _)| user.id().as_uuid() == &row.id);
            if !is_same_user {
                result.push((row.user()?, Vec::new()));
            }
            if let Some(product) = row.product()? {
                if let Some((_, products)) = result.last_mut() {
                    products.push(product);
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresUserRepository>();
    }
}
