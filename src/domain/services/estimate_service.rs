// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::services::estimate_audit::audit_estimate;
use crate::domain::services::llm_service::{DocumentPrompt, LLMServiceTrait, LlmError};
use crate::domain::services::prompts::{EXTRACTION_INSTRUCTION, SYSTEM_PROMPT};
use crate::utils::code_fence::strip_code_fences;

/// 估价服务错误
#[derive(Error, Debug)]
pub enum EstimateError {
    /// 模型 API 返回非成功状态
    #[error("Upstream model rejected the request: {0}")]
    Upstream(LlmError),

    /// 去掉围栏后仍不是合法 JSON
    #[error("Model reply is not valid JSON: {source}")]
    Parse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// 超过执行时间上限
    #[error("Estimate exceeded {0:?}")]
    Timeout(Duration),

    /// 其他失败（网络、响应包格式、配置）
    #[error("Estimate failed: {0}")]
    Internal(LlmError),
}

impl From<LlmError> for EstimateError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Upstream { .. } => EstimateError::Upstream(err),
            other => EstimateError::Internal(other),
        }
    }
}

/// 估价服务
///
/// 将 PDF 交给模型，剥离代码围栏后解析 JSON 并原样返回。
/// 不做结构校验，也不修正模型的计算结果
pub struct EstimateService {
    llm: Arc<dyn LLMServiceTrait>,
    max_duration: Duration,
}

impl EstimateService {
    pub fn new(llm: Arc<dyn LLMServiceTrait>, max_duration: Duration) -> Self {
        Self { llm, max_duration }
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// 生成估价
    ///
    /// # 参数
    /// * `pdf_base64` - base64 编码的 PDF
    ///
    /// # 返回值
    /// * `Ok(Value)` - 模型返回的 JSON 对象
    /// * `Err(EstimateError)` - 上游失败、解析失败或超时，不会重试
    pub async fn estimate(&self, pdf_base64: &str) -> Result<Value, EstimateError> {
        match tokio::time::timeout(self.max_duration, self.run(pdf_base64)).await {
            Ok(result) => result,
            Err(_) => Err(EstimateError::Timeout(self.max_duration)),
        }
    }

    async fn run(&self, pdf_base64: &str) -> Result<Value, EstimateError> {
        let prompt = DocumentPrompt {
            system: SYSTEM_PROMPT.as_str(),
            instruction: EXTRACTION_INSTRUCTION,
        };

        let started = Instant::now();
        let completion = self.llm.complete_document(pdf_base64, prompt).await;
        metrics::histogram!("estimate_upstream_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        let completion = completion?;
        debug!(
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            "LLM completion received"
        );

        let json_text = strip_code_fences(&completion.text);
        let estimate: Value = serde_json::from_str(&json_text).map_err(|source| {
            EstimateError::Parse {
                raw: completion.text.clone(),
                source,
            }
        })?;

        let findings = audit_estimate(&estimate);
        if findings.is_empty() {
            info!("Estimate parsed; arithmetic matches pricing rules");
        } else {
            metrics::counter!("estimate_audit_discrepancies_total")
                .increment(findings.len() as u64);
            for finding in &findings {
                warn!(%finding, "Estimate audit discrepancy");
            }
        }

        Ok(estimate)
    }
}

impl EstimateError {
    /// 将完整细节写入服务端日志
    pub fn log(&self) {
        match self {
            EstimateError::Upstream(LlmError::Upstream { status, body }) => {
                error!(status, body = %body, "Anthropic API error");
            }
            EstimateError::Parse { raw, source } => {
                error!(error = %source, raw = %raw, "Failed to parse model response");
            }
            EstimateError::Timeout(limit) => {
                error!(limit_secs = limit.as_secs(), "Estimate timed out");
            }
            other => error!(error = %other, "Estimate failed"),
        }
    }
}
