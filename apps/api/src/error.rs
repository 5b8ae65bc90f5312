//! # API エラー定義
//!
//! API 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス |
//! |-----------|----------------|
//! | `BadRequest` | 400 Bad Request |
//! | `NotFound` | 404 Not Found |
//! | `Database` / `Internal` | 500 Internal Server Error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kigenwatch_infra::InfraError;
use kigenwatch_shared::ErrorResponse;
use thiserror::Error;

/// API で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg.clone()))
            }
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::validation_error(msg.clone()),
            ),
            ApiError::Database(e) => {
                tracing::error!(error = %e, "データベースエラー");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal_error(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("内部エラー: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal_error(),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_foundは404とproblem_detailsを返す() {
        let response = ApiError::NotFound("ユーザーが見つかりません".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            json["type"],
            "https://kigenwatch.example.com/errors/not-found"
        );
        assert_eq!(json["detail"], "ユーザーが見つかりません");
    }

    #[tokio::test]
    async fn test_databaseエラーは詳細を漏らさず500を返す() {
        let infra_err: InfraError = sqlx::Error::RowNotFound.into();
        let response = ApiError::Database(infra_err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        // 内部情報を漏らさない固定メッセージ
        assert_eq!(json["detail"], "内部エラーが発生しました");
    }
}
