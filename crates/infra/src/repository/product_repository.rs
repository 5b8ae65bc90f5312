//! # ProductRepository
//!
//! 商品情報の永続化を担当するリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kigenwatch_domain::{
    product::{Product, ProductId, ProductName},
    user::UserId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// 商品リポジトリトレイト
///
/// 商品情報の永続化操作を定義する。
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 商品を挿入する
    ///
    /// 所有ユーザーの存在確認は呼び出し元の責務。
    /// 存在しないユーザー ID を渡した場合は外部キー制約違反で失敗する。
    async fn insert(&self, product: &Product) -> Result<(), InfraError>;

    /// ユーザーの所有する商品を作成順で取得する
    ///
    /// 商品を持たないユーザーの場合は空の Vec を返す（エラーにしない）。
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Product>, InfraError>;
}

/// PostgreSQL 実装の ProductRepository
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// products テーブルの行
#[derive(sqlx::FromRow)]
struct ProductRow {
    id:         Uuid,
    user_id:    Uuid,
    name:       String,
    expiry_at:  DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    /// 行データからドメインエンティティを復元する
    fn into_product(self) -> Result<Product, InfraError> {
        Ok(Product::from_db(
            ProductId::from_uuid(self.id),
            UserId::from_uuid(self.user_id),
            ProductName::new(&self.name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            self.expiry_at,
            self.created_at,
        ))
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, product: &Product) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, user_id, name, expiry_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(product.id().as_uuid())
        .bind(product.user_id().as_uuid())
        .bind(product.name().as_str())
        .bind(product.expiry_at())
        .bind(product.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Product>, InfraError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, user_id, name, expiry_at, created_at
            FROM products
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresProductRepository>();
    }
}
