//! 优惠券发放服务
//!
//! 提供活动管理与高并发优惠券发放的 REST API。

use std::sync::Arc;

use axum::{Json, Router, extract::State, http::HeaderValue, middleware, routing::get};
use coupon_issuance_service::{routes, service::CouponService, state::AppState};
use coupon_shared::{
    config::AppConfig,
    observability::{self, middleware as obs_middleware},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：config/{env}.toml + 环境变量覆盖
    let config = AppConfig::load("coupon-issuance-service").unwrap_or_default();

    observability::init(&config.observability)?;

    info!("Starting coupon-issuance-service on {}", config.server_addr());

    // 全部状态驻留内存，进程重启即清空
    let service = Arc::new(CouponService::new());
    let state = AppState::new(service);

    // CORS 配置：通过 COUPON_CORS_ORIGINS 环境变量控制允许的来源
    // 默认放开全部来源，方便演示客户端与压测工具直连
    let allowed_origins =
        std::env::var("COUPON_CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = if allowed_origins == "*" {
        // 生产环境使用通配符 CORS 是安全隐患，可能导致跨站请求伪造
        if config.is_production() {
            warn!("COUPON_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .nest("/api", routes::api_routes())
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(cors)
        // 可观测性中间件：请求追踪和请求 ID
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 优雅关闭：收到 SIGTERM（K8s 停止 Pod）或 Ctrl+C 时，
    // 停止接收新连接并等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
///
/// K8s 通过 SIGTERM 通知 Pod 停止；本地开发通过 Ctrl+C。
/// 收到任一信号后返回，触发 axum 的优雅关闭流程。
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("注册 Ctrl+C 处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("注册 SIGTERM 处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// 存活探针：服务进程正常即返回 ok
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "coupon-issuance-service"
    }))
}

/// 就绪探针：内存存储无外部依赖，报告当前活动数量即可
async fn readiness_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "coupon-issuance-service",
        "campaigns": state.service.store().len()
    }))
}
