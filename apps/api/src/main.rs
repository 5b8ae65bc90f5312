//! # KigenWatch API サーバー
//!
//! 期限付き商品を管理し、期限切れ間近の商品を所有ユーザーへメールで
//! 通知するサービス。
//!
//! ## 役割
//!
//! - **HTTP API**: ユーザー・商品の作成と一覧取得（JSON）
//! - **データ永続化**: PostgreSQL へのエンティティ保存（起動時マイグレーション）
//! - **期限スキャン**: 固定間隔のバックグラウンドジョブが全ユーザーの商品を
//!   走査し、期限切れ間近の商品を持つユーザーへ 1 通ずつメールを送る
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  HTTP Client │────→│   API サーバー │────→│   Database   │
//! └──────────────┘     └──────┬───────┘     └──────────────┘
//!                             │ 期限スキャン（定期実行）
//!                             ↓
//!                      ┌──────────────┐
//!                      │  SMTP サーバー │
//!                      └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | No | ポート番号（デフォルト: `8081`） |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `EXPIRY_SCAN_INTERVAL_SECS` | No | スキャン間隔秒（デフォルト: `60`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp` / `noop`（デフォルト: `noop`） |
//! | `SMTP_HOST` / `SMTP_PORT` | No | SMTP サーバー（デフォルト: `localhost:1025`） |
//! | `SMTP_USERNAME` / `SMTP_PASSWORD` | No | SMTP 認証情報（未設定で認証なし） |
//! | `NOTIFICATION_FROM_ADDRESS` | No | 送信元メールアドレス |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（Mailpit を localhost:1025 で起動しておく）
//! NOTIFICATION_BACKEND=smtp cargo run -p kigenwatch-api
//!
//! # 本番環境
//! DATABASE_URL=postgres://... cargo run -p kigenwatch-api --release
//! ```

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use kigenwatch_api::{
    config::ApiConfig,
    handler::{
        ProductState,
        ReadinessState,
        UserState,
        create_product,
        create_user,
        health_check,
        list_user_products,
        list_users,
        readiness_check,
    },
    job::{ExpiryCheckJob, start_expiry_check_worker},
    usecase::notification::{NotificationService, TemplateRenderer},
};
use kigenwatch_domain::clock::{Clock, SystemClock};
use kigenwatch_infra::{
    db,
    notification::{NoopNotificationSender, NotificationSender, SmtpNotificationSender},
    repository::{
        NotificationLogRepository,
        PostgresNotificationLogRepository,
        PostgresProductRepository,
        PostgresUserRepository,
        ProductRepository,
        UserRepository,
    },
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,kigenwatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 設定読み込み
    let config = ApiConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "KigenWatch API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成し、マイグレーションを適用
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("データベース接続に失敗しました");
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool)
        .await
        .expect("マイグレーションの適用に失敗しました");
    tracing::info!("マイグレーションを適用しました");

    // 依存コンポーネントを初期化
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let user_repository: Arc<dyn UserRepository> =
        Arc::new(PostgresUserRepository::new(pool.clone()));
    let product_repository: Arc<dyn ProductRepository> =
        Arc::new(PostgresProductRepository::new(pool.clone()));
    let notification_log_repository: Arc<dyn NotificationLogRepository> =
        Arc::new(PostgresNotificationLogRepository::new(pool.clone()));

    // 通知バックエンドの選択
    let sender: Arc<dyn NotificationSender> = match config.notification.backend.as_str() {
        "smtp" => Arc::new(SmtpNotificationSender::new(
            &config.notification.smtp_host,
            config.notification.smtp_port,
            config.notification.credentials(),
            config.notification.from_address.clone(),
        )),
        "noop" => Arc::new(NoopNotificationSender),
        other => {
            tracing::warn!(backend = other, "未知の NOTIFICATION_BACKEND、noop を使用します");
            Arc::new(NoopNotificationSender)
        }
    };

    let template_renderer =
        TemplateRenderer::new().expect("通知テンプレートの初期化に失敗しました");
    let notification_service = Arc::new(NotificationService::new(
        sender,
        template_renderer,
        notification_log_repository,
    ));

    // 期限スキャンワーカーを起動（逐次実行: 前回の完了後に次の待機が始まる）
    let job = Arc::new(ExpiryCheckJob::new(
        user_repository.clone(),
        notification_service,
        clock.clone(),
    ));
    tokio::spawn(start_expiry_check_worker(
        job,
        Duration::from_secs(config.scan.interval_secs),
    ));

    // ハンドラの共有状態
    let readiness_state = Arc::new(ReadinessState { pool: pool.clone() });
    let user_state = Arc::new(UserState {
        user_repository: user_repository.clone(),
        clock:           clock.clone(),
    });
    let product_state = Arc::new(ProductState {
        user_repository,
        product_repository,
        clock,
    });

    // ルーター構築
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .with_state(readiness_state)
        .route("/users", get(list_users).post(create_user))
        .with_state(user_state)
        .route(
            "/users/{user_id}/products",
            get(list_user_products).post(create_product),
        )
        .with_state(product_state)
        .layer(TraceLayer::new_for_http());

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("KigenWatch API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
