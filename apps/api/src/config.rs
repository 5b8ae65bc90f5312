//! # API サーバー設定
//!
//! 環境変数から API サーバーの設定を読み込む。
//! 認証情報を含むすべての外部接続情報はここで外部化し、
//! ソースコードに埋め込まない。

use std::env;

/// API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// データベース接続 URL
    pub database_url: String,
    /// 期限スキャン設定
    pub scan: ExpiryScanConfig,
    /// 通知設定
    pub notification: NotificationConfig,
}

/// 期限スキャンジョブの設定
#[derive(Debug, Clone)]
pub struct ExpiryScanConfig {
    /// スキャン間隔（秒）
    pub interval_secs: u64,
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `smtp`: Mailpit（開発）/ SMTP サーバー経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// 送信バックエンド（"smtp" | "noop"）
    pub backend:       String,
    /// SMTP ホスト（backend=smtp の場合に使用）
    pub smtp_host:     String,
    /// SMTP ポート（backend=smtp の場合に使用）
    pub smtp_port:     u16,
    /// SMTP 認証ユーザー名（認証不要なサーバーでは未設定）
    pub smtp_username: Option<String>,
    /// SMTP 認証パスワード（認証不要なサーバーでは未設定）
    pub smtp_password: Option<String>,
    /// 送信元メールアドレス
    pub from_address:  String,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("API_PORT")
                .unwrap_or_else(|_| "8081".to_string())
                .parse()
                .expect("API_PORT は有効なポート番号である必要があります"),
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL が設定されていません（.env を確認してください）"),
            scan: ExpiryScanConfig::from_env(),
            notification: NotificationConfig::from_env(),
        })
    }
}

impl ExpiryScanConfig {
    /// 環境変数から期限スキャン設定を読み込む
    fn from_env() -> Self {
        Self {
            interval_secs: env::var("EXPIRY_SCAN_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("EXPIRY_SCAN_INTERVAL_SECS は有効な秒数である必要があります"),
        }
    }
}

impl NotificationConfig {
    /// 環境変数から通知設定を読み込む
    fn from_env() -> Self {
        Self {
            backend:       env::var("NOTIFICATION_BACKEND").unwrap_or_else(|_| "noop".to_string()),
            smtp_host:     env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port:     env::var("SMTP_PORT")
                .unwrap_or_else(|_| "1025".to_string())
                .parse()
                .expect("SMTP_PORT は有効なポート番号である必要があります"),
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            from_address:  env::var("NOTIFICATION_FROM_ADDRESS")
                .unwrap_or_else(|_| "noreply@kigenwatch.example.com".to_string()),
        }
    }

    /// SMTP 認証情報を取得する
    ///
    /// ユーザー名とパスワードの両方が設定されている場合のみ Some を返す。
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.smtp_username, &self.smtp_password) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        }
    }
}
