// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::application::dto::estimate_request::EstimateRequestDto;
use crate::domain::services::estimate_service::{EstimateError, EstimateService};

/// 客户端到估价端点的传输错误
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Estimate endpoint responded with status {0}")]
    Status(u16),

    #[error("Estimate request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Estimate response is not a valid estimate: {0}")]
    Decode(String),
}

/// 上传器发出唯一一次 POST 的接口
#[async_trait]
pub trait EstimateTransport: Send + Sync {
    async fn post_estimate(&self, request: &EstimateRequestDto) -> Result<Value, TransportError>;
}

/// 通过 HTTP 调用 `POST /api/estimate`
pub struct HttpEstimateClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEstimateClient {
    /// # 参数
    /// * `base_url` - 服务地址，例如 `http://localhost:3000`
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/estimate", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EstimateTransport for HttpEstimateClient {
    async fn post_estimate(&self, request: &EstimateRequestDto) -> Result<Value, TransportError> {
        debug!(endpoint = %self.endpoint, "Posting estimate request");
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// 同进程内直接调用估价服务，供服务端渲染的上传页面使用
pub struct InProcessTransport {
    service: Arc<EstimateService>,
}

impl InProcessTransport {
    pub fn new(service: Arc<EstimateService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl EstimateTransport for InProcessTransport {
    async fn post_estimate(&self, request: &EstimateRequestDto) -> Result<Value, TransportError> {
        let pdf = match request.pdf.as_deref() {
            Some(pdf) if !pdf.is_empty() => pdf,
            _ => return Err(TransportError::Status(400)),
        };

        self.service.estimate(pdf).await.map_err(|err| {
            err.log();
            match err {
                EstimateError::Timeout(_) => TransportError::Status(504),
                _ => TransportError::Status(500),
            }
        })
    }
}
