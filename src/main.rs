//! SSO 身份服务主入口

use sso_service::{
    auth::{Argon2Hasher, JwtService},
    config::{AppConfig, StorageBackend},
    db,
    handlers::health,
    middleware::AppState,
    repository::{CredentialStore, InMemoryCredentialStore, PgCredentialStore},
    routes,
    services::AuthService,
    telemetry,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("sso-service {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 按优先级加载：.env.local > .env.development > .env
    if let Ok(env) = std::env::var("SSO_ENV") {
        dotenv::from_filename(format!(".env.{}", env)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env.development").ok();
        dotenv::dotenv().ok();
    }

    health::set_start_time();

    // 1. 加载配置
    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.storage.backend,
        token_ttl_secs = config.security.token_ttl_secs,
        "SSO service starting..."
    );

    // 3. 凭据存储
    let (store, pool) = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = db::connect(&config.database).await?;
            tracing::info!("Database initialized");
            (
                Arc::new(PgCredentialStore::new(pool.clone())) as Arc<dyn CredentialStore>,
                Some(pool),
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory credential store, identities are not persisted");
            (Arc::new(InMemoryCredentialStore::new()) as Arc<dyn CredentialStore>, None)
        }
    };

    // 4. 哈希器与令牌签发器（密钥只在此处读取一次）
    let hasher = Arc::new(
        Argon2Hasher::from_config(&config.hashing)
            .map_err(|e| anyhow::anyhow!("Invalid hashing parameters: {}", e))?,
    );
    let token_issuer = Arc::new(JwtService::from_config(&config)?);

    let auth_service = AuthService::new(store, hasher, token_issuer, config.security.token_ttl())
        .with_deadline(config.server.request_timeout());

    let app_state = Arc::new(AppState {
        db: pool,
        auth_service: Arc::new(auth_service),
    });

    // 5. 构建路由
    let app = routes::create_router(app_state);

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 7. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
/// 收到信号后开始排空连接，超过宽限期则强制退出
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

/// 打印帮助信息
fn print_help() {
    println!("sso-service {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: sso-service [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量（前缀 SSO_，层级分隔符 __）:");
    println!("  SSO_SECURITY__JWT_SECRET      令牌签名密钥（必填，至少 32 字符）");
    println!("  SSO_SECURITY__TOKEN_TTL_SECS  令牌有效期，默认 3600");
    println!("  SSO_STORAGE__BACKEND          postgres | memory，默认 postgres");
    println!("  SSO_DATABASE__URL             PostgreSQL 连接串（postgres 后端必填）");
    println!("  SSO_SERVER__ADDR              监听地址，默认 0.0.0.0:3000");
}
