// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::estimate_service::EstimateService;
use crate::presentation::handlers::{estimate_handler, ui_handler};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// 处理器依赖的 `Arc<EstimateService>` 由调用方通过 `Extension` 层注入
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let estimate_routes = Router::new()
        .route(
            "/",
            get(ui_handler::upload_page).post(ui_handler::submit_upload),
        )
        .route(
            "/api/estimate",
            post(estimate_handler::create_estimate)
                .fallback(estimate_handler::method_not_allowed),
        );

    Router::new().merge(public_routes).merge(estimate_routes)
}

/// 创建带依赖和中间件的完整应用
///
/// # 参数
///
/// * `service` - 估价服务
/// * `max_body_bytes` - 请求体大小上限
pub fn app(service: Arc<EstimateService>, max_body_bytes: usize) -> Router {
    routes()
        .layer(Extension(service))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
