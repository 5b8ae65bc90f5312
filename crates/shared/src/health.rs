//! # ヘルスチェック共通型
//!
//! ヘルスチェックエンドポイントで使用される共通レスポンス型を提供する。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// `status` はサービスの稼働状態、`version` は Cargo.toml のバージョンを示す。
///
/// ## 使用例
///
/// ```
/// use kigenwatch_shared::HealthResponse;
///
/// let response = HealthResponse {
///     status:  "healthy".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(response.status, "healthy");
/// ```
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 稼働状態（`"healthy"` または `"unhealthy"`）
    pub status:  String,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version: String,
}

/// 個別チェックの結果ステータス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// チェック成功
    Ok,
    /// チェック失敗
    Error,
}

/// Readiness 全体のステータス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    /// 全依存サービスが利用可能
    Ready,
    /// 一部の依存サービスが利用不可
    NotReady,
}

/// Readiness Check レスポンス
///
/// 依存サービスへの接続状態を含むレスポンス型。
/// `status` は全体のステータス、`checks` は個別チェック結果を示す。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// 全体のステータス
    pub status: ReadinessStatus,
    /// 個別チェック結果（キー: チェック名、値: ステータス）
    pub checks: HashMap<String, CheckStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_responseのserializeで正しいjson形状にする() {
        let response = HealthResponse {
            status:  "healthy".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "healthy",
                "version": "0.1.0"
            })
        );
    }

    #[test]
    fn test_check_statusのserialize結果() {
        assert_eq!(
            serde_json::to_value(CheckStatus::Ok).unwrap(),
            serde_json::json!("ok")
        );
        assert_eq!(
            serde_json::to_value(CheckStatus::Error).unwrap(),
            serde_json::json!("error")
        );
    }

    #[test]
    fn test_readiness_responseのserialize結果() {
        let mut checks = HashMap::new();
        checks.insert("database".to_string(), CheckStatus::Ok);
        let response = ReadinessResponse {
            status: ReadinessStatus::Ready,
            checks,
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "ready");
        assert_eq!(json["checks"]["database"], "ok");
    }

    #[test]
    fn test_readiness_status_not_readyのserialize結果() {
        let json = serde_json::to_value(ReadinessStatus::NotReady).unwrap();
        assert_eq!(json, serde_json::json!("not_ready"));
    }
}
