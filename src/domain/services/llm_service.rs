// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::settings::LlmSettings;

/// LLM 调用错误
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM API key not configured")]
    NotConfigured,

    #[error("Failed to send request to LLM API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("LLM API returned error: {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response format from LLM API: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// 一次文档补全的结果：第一个文本块及令牌用量
#[derive(Debug, Clone)]
pub struct DocumentCompletion {
    pub text: String,
    pub usage: TokenUsage,
}

/// 发送给模型的固定指令
#[derive(Debug, Clone, Copy)]
pub struct DocumentPrompt<'a> {
    pub system: &'a str,
    pub instruction: &'a str,
}

#[async_trait]
pub trait LLMServiceTrait: Send + Sync {
    /// 将 base64 编码的 PDF 和指令一起发给模型，返回第一个文本块
    async fn complete_document(
        &self,
        pdf_base64: &str,
        prompt: DocumentPrompt<'_>,
    ) -> Result<DocumentCompletion, LlmError>;
}

/// LLM服务 - 处理与 Anthropic Messages API 的交互
///
/// # 功能
///
/// 以 `document` 内容块上传 PDF，附带文本指令，请求有限长度的文本补全
///
/// # 配置
///
/// 由 [`LlmSettings`] 提供：
/// - `api_key` - API 密钥（来自 `ANTHROPIC_API_KEY`）
/// - `model` - 模型名称
/// - `api_base_url` - API 基础 URL
/// - `api_version` - `anthropic-version` 请求头
/// - `max_tokens` - 最大输出令牌数
pub struct LLMService {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base_url: String,
    api_version: String,
    max_tokens: u32,
}

#[async_trait]
impl LLMServiceTrait for LLMService {
    async fn complete_document(
        &self,
        pdf_base64: &str,
        prompt: DocumentPrompt<'_>,
    ) -> Result<DocumentCompletion, LlmError> {
        LLMService::complete_document(self, pdf_base64, prompt).await
    }
}

impl LLMService {
    pub fn new(settings: &LlmSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: settings.api_key.clone().filter(|key| !key.is_empty()),
            model: settings.model.clone(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            api_version: settings.api_version.clone(),
            max_tokens: settings.max_tokens,
        }
    }

    pub fn new_with_config(api_key: String, model: String, api_base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: Some(api_key),
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_version: "2023-06-01".to_string(),
            max_tokens: 2048,
        }
    }

    /// 构造 Messages API 请求体
    pub fn build_request_body(&self, pdf_base64: &str, prompt: DocumentPrompt<'_>) -> Value {
        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": prompt.system,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "document",
                            "source": {
                                "type": "base64",
                                "media_type": "application/pdf",
                                "data": pdf_base64
                            }
                        },
                        {
                            "type": "text",
                            "text": prompt.instruction
                        }
                    ]
                }
            ]
        })
    }

    /// 调用模型处理 PDF 文档
    ///
    /// # 参数
    /// * `pdf_base64` - 不带 data URL 前缀的 base64 PDF
    /// * `prompt` - 系统提示词与用户指令
    ///
    /// # 返回值
    /// * `Result<DocumentCompletion, LlmError>` - 第一个文本块和令牌使用情况
    ///
    /// # 错误
    /// * 当 API 密钥未配置时返回 `LlmError::NotConfigured`
    /// * 当 API 返回非成功状态时返回 `LlmError::Upstream`，包含原始错误体
    /// * 当响应中没有文本块时返回 `LlmError::InvalidResponse`
    pub async fn complete_document(
        &self,
        pdf_base64: &str,
        prompt: DocumentPrompt<'_>,
    ) -> Result<DocumentCompletion, LlmError> {
        let api_key = self.api_key.as_ref().ok_or(LlmError::NotConfigured)?;

        let request_body = self.build_request_body(pdf_base64, prompt);

        let url = format!("{}/v1/messages", self.api_base_url);
        debug!(model = %self.model, pdf_len = pdf_base64.len(), "Sending document to LLM API");
        let response = self
            .client
            .post(url)
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Upstream { status, body });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        parse_completion(&body)
    }
}

/// 从 Messages API 响应中取出第一个文本块
pub fn parse_completion(body: &Value) -> Result<DocumentCompletion, LlmError> {
    let usage = if let Some(usage_val) = body.get("usage") {
        TokenUsage {
            input_tokens: usage_val["input_tokens"].as_u64().unwrap_or(0),
            output_tokens: usage_val["output_tokens"].as_u64().unwrap_or(0),
        }
    } else {
        TokenUsage::default()
    };

    let text = body["content"]
        .as_array()
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|block| block["type"] == "text")
                .and_then(|block| block["text"].as_str())
        })
        .ok_or_else(|| LlmError::InvalidResponse("no text block in content".to_string()))?;

    Ok(DocumentCompletion {
        text: text.to_string(),
        usage,
    })
}
