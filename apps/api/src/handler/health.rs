//! # ヘルスチェックハンドラ
//!
//! API サーバーの稼働状態を確認するためのエンドポイント。
//!
//! ## 用途
//!
//! - **ロードバランサー**: ターゲットグループヘルスチェック
//! - **コンテナオーケストレーター**: liveness/readiness probe
//!
//! ## エンドポイント
//!
//! ```text
//! GET /health        -- liveness（依存サービスを確認しない）
//! GET /health/ready  -- readiness（データベース接続を確認する）
//! ```

use std::{collections::HashMap, sync::Arc};

use axum::{Json, extract::State, http::StatusCode};
use kigenwatch_shared::{
    HealthResponse,
    health::{CheckStatus, ReadinessResponse, ReadinessStatus},
};
use sqlx::PgPool;

/// Readiness チェックの共有状態
pub struct ReadinessState {
    pub pool: PgPool,
}

/// ヘルスチェックエンドポイント
///
/// サーバーが正常に稼働していることを確認するためのエンドポイント。
/// 依存サービスの状態は確認しない。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness チェックエンドポイント
///
/// データベースへの接続を確認し、リクエストを受け付けられる状態か返す。
/// データベースに到達できない場合は 503 Service Unavailable を返す。
pub async fn readiness_check(
    State(state): State<Arc<ReadinessState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let mut checks = HashMap::new();

    match sqlx::query("SELECT 1").fetch_one(&state.pool).await {
        Ok(_) => {
            checks.insert("database".to_string(), CheckStatus::Ok);
            (
                StatusCode::OK,
                Json(ReadinessResponse {
                    status: ReadinessStatus::Ready,
                    checks,
                }),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "readiness チェックでデータベースに到達できません");
            checks.insert("database".to_string(), CheckStatus::Error);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: ReadinessStatus::NotReady,
                    checks,
                }),
            )
        }
    }
}
