//! # ユーザーハンドラ
//!
//! ユーザー関連 API を提供する。
//!
//! ## エンドポイント
//!
//! - `POST /users` - ユーザーを作成
//! - `GET /users` - ユーザー一覧を取得

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use kigenwatch_domain::{
    clock::Clock,
    user::{Email, User, UserId, UserName},
};
use kigenwatch_infra::repository::UserRepository;
use kigenwatch_shared::{ApiResponse, event_log::event, log_business_event};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::ApiError, handler::product::ProductResponse};

/// ユーザー API の共有状態
pub struct UserState {
    pub user_repository: Arc<dyn UserRepository>,
    pub clock:           Arc<dyn Clock>,
}

// --- リクエスト/レスポンス型 ---

/// ユーザー作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name:  String,
    pub email: String,
}

/// ユーザー情報レスポンス
///
/// `products` は作成直後・一覧取得時は空の配列
/// （商品は `GET /users/{user_id}/products` で取得する）。
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id:         Uuid,
    pub name:       String,
    pub email:      String,
    pub products:   Vec<ProductResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id:         *user.id().as_uuid(),
            name:       user.name().as_str().to_string(),
            email:      user.email().as_str().to_string(),
            products:   Vec::new(),
            created_at: user.created_at(),
        }
    }
}

// --- ハンドラ ---

/// POST /users
///
/// ユーザーを作成する。
///
/// ## リクエストボディ
///
/// - `name`: ユーザー名
/// - `email`: メールアドレス（期限通知の宛先）
///
/// ## レスポンス
///
/// - `200 OK`: 作成されたユーザー情報（products は空配列）
/// - `400 Bad Request`: JSON 不正、またはバリデーションエラー
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<Arc<UserState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = Email::new(&req.email).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let name = UserName::new(&req.name).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let user = User::new(UserId::new(), email, name, state.clock.now());
    state.user_repository.insert(&user).await?;

    log_business_event!(
        event.category = event::category::USER,
        event.action = event::action::USER_CREATED,
        event.entity_type = event::entity_type::USER,
        event.entity_id = %user.id(),
        event.result = event::result::SUCCESS,
        "ユーザーを作成しました"
    );

    let response = ApiResponse::new(UserResponse::from(&user));
    Ok((StatusCode::OK, Json(response)))
}

/// GET /users
///
/// ユーザー一覧を作成順で取得する。
///
/// ## レスポンス
///
/// - `200 OK`: ユーザーの配列（products は各要素とも空配列）
#[tracing::instrument(skip_all)]
pub async fn list_users(
    State(state): State<Arc<UserState>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.user_repository.find_all().await?;

    let items: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

    let response = ApiResponse::new(items);
    Ok((StatusCode::OK, Json(response)))
}
