// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// 估价请求DTO
///
/// `POST /api/estimate` 的请求体
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct EstimateRequestDto {
    /// base64 编码的 PDF，不带 data URL 前缀
    #[validate(required, length(min = 1))]
    pub pdf: Option<String>,
}

impl EstimateRequestDto {
    pub fn new(pdf: impl Into<String>) -> Self {
        Self {
            pdf: Some(pdf.into()),
        }
    }
}

/// 错误响应DTO，所有错误状态共用 `{"error": "..."}` 结构
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponseDto {
    pub error: String,
}

impl ErrorResponseDto {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// 估价响应即模型返回的 JSON 对象，代理不做任何改写
pub type EstimateResponseDto = Value;
