//! # 商品ハンドラ
//!
//! ユーザーに紐づく商品関連 API を提供する。
//!
//! ## エンドポイント
//!
//! - `POST /users/{user_id}/products` - ユーザーに商品を追加
//! - `GET /users/{user_id}/products` - ユーザーの商品一覧を取得

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use kigenwatch_domain::{
    clock::Clock,
    product::{Product, ProductId, ProductName},
    user::UserId,
};
use kigenwatch_infra::repository::{ProductRepository, UserRepository};
use kigenwatch_shared::{ApiResponse, event_log::event, log_business_event};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// 商品 API の共有状態
pub struct ProductState {
    pub user_repository:    Arc<dyn UserRepository>,
    pub product_repository: Arc<dyn ProductRepository>,
    pub clock:              Arc<dyn Clock>,
}

// --- リクエスト/レスポンス型 ---

/// 商品作成リクエスト
///
/// `expiry` は ISO-8601 / RFC 3339 形式のタイムスタンプ
/// （例: `2025-10-08T15:04:05Z`）。
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name:   String,
    pub expiry: DateTime<Utc>,
}

/// 商品情報レスポンス
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id:         Uuid,
    pub user_id:    Uuid,
    pub name:       String,
    pub expiry:     DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id:         *product.id().as_uuid(),
            user_id:    *product.user_id().as_uuid(),
            name:       product.name().as_str().to_string(),
            expiry:     product.expiry_at(),
            created_at: product.created_at(),
        }
    }
}

// --- ハンドラ ---

/// POST /users/{user_id}/products
///
/// ユーザーに商品を追加する。
///
/// ## パスパラメータ
///
/// - `user_id`: 所有ユーザーの ID
///
/// ## リクエストボディ
///
/// - `name`: 商品名
/// - `expiry`: 期限日時（ISO-8601）
///
/// ## レスポンス
///
/// - `200 OK`: 作成された商品情報
/// - `400 Bad Request`: JSON 不正、またはバリデーションエラー
/// - `404 Not Found`: ユーザーが存在しない
#[tracing::instrument(skip_all, fields(%user_id))]
pub async fn create_product(
    State(state): State<Arc<ProductState>>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = UserId::from_uuid(user_id);

    // 所有ユーザーの存在確認（存在しない場合は行を作らず 404）
    let user = state
        .user_repository
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("ユーザーが見つかりません".to_string()))?;

    let name = ProductName::new(&req.name).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let product = Product::new(
        ProductId::new(),
        user.id().clone(),
        name,
        req.expiry,
        state.clock.now(),
    );
    state.product_repository.insert(&product).await?;

    log_business_event!(
        event.category = event::category::PRODUCT,
        event.action = event::action::PRODUCT_CREATED,
        event.entity_type = event::entity_type::PRODUCT,
        event.entity_id = %product.id(),
        event.result = event::result::SUCCESS,
        "商品を作成しました"
    );

    let response = ApiResponse::new(ProductResponse::from(&product));
    Ok((StatusCode::OK, Json(response)))
}

/// GET /users/{user_id}/products
///
/// ユーザーの商品一覧を作成順で取得する。
///
/// ## パスパラメータ
///
/// - `user_id`: 所有ユーザーの ID
///
/// ## レスポンス
///
/// - `200 OK`: 商品の配列（商品がない場合は空配列）
/// - `404 Not Found`: ユーザーが存在しない
#[tracing::instrument(skip_all, fields(%user_id))]
pub async fn list_user_products(
    State(state): State<Arc<ProductState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = UserId::from_uuid(user_id);

    if state.user_repository.find_by_id(&user_id).await?.is_none() {
        return Err(ApiError::NotFound("ユーザーが見つかりません".to_string()));
    }

    let products = state.product_repository.find_by_user(&user_id).await?;

    let items: Vec<ProductResponse> = products.iter().map(ProductResponse::from).collect();

    let response = ApiResponse::new(items);
    Ok((StatusCode::OK, Json(response)))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
        routing::get,
    };
    use kigenwatch_domain::{
        clock::FixedClock,
        user::{Email, User, UserName},
    };
    use kigenwatch_infra::mock::{MockProductRepository, MockUserRepository};
    use tower::ServiceExt;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn create_test_user() -> User {
        User::new(
            UserId::new(),
            Email::new("tanaka@example.com").unwrap(),
            UserName::new("田中").unwrap(),
            fixed_now(),
        )
    }

    fn create_test_app(
        user_repo: MockUserRepository,
        product_repo: MockProductRepository,
    ) -> Router {
        let state = Arc::new(ProductState {
            user_repository:    Arc::new(user_repo) as Arc<dyn UserRepository>,
            product_repository: Arc::new(product_repo) as Arc<dyn ProductRepository>,
            clock:              Arc::new(FixedClock::new(fixed_now())) as Arc<dyn Clock>,
        });

        Router::new()
            .route(
                "/users/{user_id}/products",
                get(list_user_products).post(create_product),
            )
            .with_state(state)
    }

    #[tokio::test]
    async fn test_create_product_正常系は200と作成結果を返す() {
        // Given
        let user = create_test_user();
        let user_repo = MockUserRepository::new();
        user_repo.add_user(user.clone());
        let product_repo = MockProductRepository::new();
        let sut = create_test_app(user_repo, product_repo.clone());

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/users/{}/products", user.id().as_uuid()))
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"name": "牛乳", "expiry": "2025-10-08T15:04:05Z"}"#,
            ))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["data"]["name"], "牛乳");
        assert_eq!(json["data"]["user_id"], user.id().as_uuid().to_string());

        // リポジトリに挿入されていること
        assert_eq!(product_repo.products().len(), 1);
    }

    #[tokio::test]
    async fn test_create_product_存在しないユーザーは404を返し行を作らない() {
        // Given
        let product_repo = MockProductRepository::new();
        let sut = create_test_app(MockUserRepository::new(), product_repo.clone());

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/users/{}/products", Uuid::now_v7()))
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"name": "牛乳", "expiry": "2025-10-08T15:04:05Z"}"#,
            ))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(product_repo.products().is_empty());
    }

    #[tokio::test]
    async fn test_create_product_不正な期限形式は400を返す() {
        // Given
        let user = create_test_user();
        let user_repo = MockUserRepository::new();
        user_repo.add_user(user.clone());
        let sut = create_test_app(user_repo, MockProductRepository::new());

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/users/{}/products", user.id().as_uuid()))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "牛乳", "expiry": "来週"}"#))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        // DateTime のパース失敗は Json 抽出時に拒否される
        assert_ne!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_user_products_商品がない場合は空配列を返す() {
        // Given
        let user = create_test_user();
        let user_repo = MockUserRepository::new();
        user_repo.add_user(user.clone());
        let sut = create_test_app(user_repo, MockProductRepository::new());

        let request = Request::builder()
            .method(Method::GET)
            .uri(format!("/users/{}/products", user.id().as_uuid()))
            .body(Body::empty())
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_list_user_products_存在しないユーザーは404を返す() {
        // Given
        let sut = create_test_app(MockUserRepository::new(), MockProductRepository::new());

        let request = Request::builder()
            .method(Method::GET)
            .uri(format!("/users/{}/products", Uuid::now_v7()))
            .body(Body::empty())
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_user_products_所有する商品のみを返す() {
        // Given
        let owner = create_test_user();
        let other = User::new(
            UserId::new(),
            Email::new("suzuki@example.com").unwrap(),
            UserName::new("鈴木").unwrap(),
            fixed_now(),
        );
        let user_repo = MockUserRepository::new();
        user_repo.add_user(owner.clone());
        user_repo.add_user(other.clone());

        let product_repo = MockProductRepository::new();
        product_repo
            .insert(&Product::new(
                ProductId::new(),
                owner.id().clone(),
                ProductName::new("牛乳").unwrap(),
                fixed_now(),
                fixed_now(),
            ))
            .await
            .unwrap();
        product_repo
            .insert(&Product::new(
                ProductId::new(),
                other.id().clone(),
                ProductName::new("卵").unwrap(),
                fixed_now(),
                fixed_now(),
            ))
            .await
            .unwrap();

        let sut = create_test_app(user_repo, product_repo);

        let request = Request::builder()
            .method(Method::GET)
            .uri(format!("/users/{}/products", owner.id().as_uuid()))
            .body(Body::empty())
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["name"], "牛乳");
    }
}
