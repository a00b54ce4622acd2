// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use roof_estimator::config::settings::Settings;
use roof_estimator::domain::services::estimate_service::EstimateService;
use roof_estimator::domain::services::llm_service::LLMService;
use roof_estimator::presentation::routes;
use roof_estimator::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting roof-estimator...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    roof_estimator::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Initialize services
    if settings.llm.api_key.as_deref().unwrap_or_default().is_empty() {
        warn!("ANTHROPIC_API_KEY is not set; estimate requests will fail");
    }
    let llm = Arc::new(LLMService::new(&settings.llm));
    let service = Arc::new(EstimateService::new(
        llm,
        settings.estimate.max_duration(),
    ));
    info!(
        model = %settings.llm.model,
        max_duration_secs = settings.estimate.max_duration_secs,
        "Estimate service initialized"
    );

    // 4. Start HTTP server
    let app = routes::app(service, settings.server.max_body_bytes);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
