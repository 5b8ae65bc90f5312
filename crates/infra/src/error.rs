//! # インフラ層エラー定義
//!
//! データベースや外部サービスとの通信で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **エラーの変換**: sqlx::Error などをラップ
//! - **ドメインエラーとの分離**: インフラ固有のエラーを明示
//! - **SpanTrace 自動捕捉**: `From` 実装や convenience constructor で
//!   エラー生成時の呼び出し経路を自動記録する
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Database, Unexpected）

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
/// `From<sqlx::Error>` の変換や convenience constructor でエラーを生成すると、
/// その時点のスパン情報が自動的にキャプチャされる。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
///
/// データベースクエリや外部サービス呼び出しで発生するエラーの具体的な種別。
/// API 層でこのエラー種別に応じて適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// データベースエラー
    ///
    /// SQL クエリの実行失敗、接続エラー、制約違反など。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// 予期しないエラー
    ///
    /// 上記に分類できない予期しないエラー
    /// （例: DB 上の値がドメインのバリデーションを通らない）。
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    // ===== Convenience constructors =====

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Database(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// テスト用に ErrorLayer 付き subscriber を設定する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    // ===== From 実装のテスト =====

    #[test]
    fn test_from_sqlx_errorでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_repo", user_id = "U-001");
            let _enter = span.enter();

            let sqlx_err = sqlx::Error::RowNotFound;
            let err: InfraError = sqlx_err.into();

            assert!(matches!(err.kind(), InfraErrorKind::Database(_)));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("test_repo"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    // ===== Convenience constructor のテスト =====

    #[test]
    fn test_unexpectedでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_mapping");
            let _enter = span.enter();

            let err = InfraError::unexpected("予期しないエラー");

            assert!(matches!(
                err.kind(),
                InfraErrorKind::Unexpected(msg) if msg == "予期しないエラー"
            ));
            let trace_str = format!("{}", err.span_trace());
            assert!(trace_str.contains("test_mapping"));
        });
    }

    // ===== Display / source のテスト =====

    #[test]
    fn test_displayがinfra_error_kindのメッセージを出力する() {
        let err = InfraError::unexpected("test");
        assert_eq!(format!("{err}"), "予期しないエラー: test");
    }

    #[test]
    fn test_sourceがinfra_error_kindに委譲する() {
        use std::error::Error;

        let sqlx_err = sqlx::Error::RowNotFound;
        let err: InfraError = sqlx_err.into();

        // Database variant は sqlx::Error を source として持つ
        assert!(err.source().is_some());
    }
}
