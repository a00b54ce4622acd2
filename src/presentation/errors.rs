// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crate::application::dto::estimate_request::ErrorResponseDto;
use crate::domain::services::estimate_service::EstimateError;

/// 应用错误类型
///
/// 每个变体对应一个状态码和一条固定的错误消息。内部细节只进日志，
/// 不会出现在响应体中
#[derive(Debug)]
pub enum AppError {
    MethodNotAllowed,
    MissingPdf,
    InvalidBody,
    Estimate(EstimateError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingPdf | AppError::InvalidBody => StatusCode::BAD_REQUEST,
            AppError::Estimate(EstimateError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Estimate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AppError::MethodNotAllowed => "Method not allowed",
            AppError::MissingPdf => "No PDF provided",
            AppError::InvalidBody => "Invalid request body",
            AppError::Estimate(EstimateError::Upstream(_)) => "Failed to process PDF",
            AppError::Estimate(EstimateError::Parse { .. }) => "Failed to parse estimate data",
            AppError::Estimate(EstimateError::Timeout(_)) => "Estimate timed out",
            AppError::Estimate(EstimateError::Internal(_)) => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Estimate(err) = &self {
            err.log();
        }

        let body = Json(ErrorResponseDto::new(self.message()));
        (self.status(), body).into_response()
    }
}

impl From<EstimateError> for AppError {
    fn from(err: EstimateError) -> Self {
        AppError::Estimate(err)
    }
}
