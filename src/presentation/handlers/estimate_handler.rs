// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::rejection::JsonRejection, Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::application::dto::estimate_request::{EstimateRequestDto, EstimateResponseDto};
use crate::domain::services::estimate_service::EstimateService;
use crate::presentation::errors::AppError;

/// 估价端点
///
/// 接收 base64 编码的 PDF，交给模型生成估价并原样返回 JSON。
/// 缺少 `pdf` 字段时返回 400，且不会调用外部 API
pub async fn create_estimate(
    Extension(service): Extension<Arc<EstimateService>>,
    payload: Result<Json<EstimateRequestDto>, JsonRejection>,
) -> Result<Json<EstimateResponseDto>, AppError> {
    let result = handle(service.as_ref(), payload).await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(AppError::MissingPdf | AppError::InvalidBody) => "rejected",
        Err(_) => "failed",
    };
    record_outcome(outcome);

    result.map(Json)
}

/// 记录一次估价请求的结果：`success`、`rejected` 或 `failed`
pub(crate) fn record_outcome(outcome: &'static str) {
    metrics::counter!("estimate_requests_total", "outcome" => outcome).increment(1);
}

async fn handle(
    service: &EstimateService,
    payload: Result<Json<EstimateRequestDto>, JsonRejection>,
) -> Result<EstimateResponseDto, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejected estimate request body");
        AppError::InvalidBody
    })?;

    payload.validate().map_err(|_| AppError::MissingPdf)?;
    let pdf = payload.pdf.ok_or(AppError::MissingPdf)?;

    info!(pdf_len = pdf.len(), "Estimate requested");
    let estimate = service.estimate(&pdf).await?;
    Ok(estimate)
}

/// 非 POST 方法统一返回 405
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
