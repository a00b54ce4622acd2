// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum_test::TestServer;
use roof_estimator::domain::services::estimate_service::EstimateService;
use roof_estimator::domain::services::llm_service::{
    DocumentCompletion, DocumentPrompt, LLMService, LLMServiceTrait, LlmError, TokenUsage,
};
use roof_estimator::presentation::routes;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// 固定回复的模型替身，记录调用次数
pub struct ScriptedModel {
    reply: Result<String, (u16, String)>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err((status, body.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LLMServiceTrait for ScriptedModel {
    async fn complete_document(
        &self,
        _pdf_base64: &str,
        _prompt: DocumentPrompt<'_>,
    ) -> Result<DocumentCompletion, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(DocumentCompletion {
                text: text.clone(),
                usage: TokenUsage::default(),
            }),
            Err((status, body)) => Err(LlmError::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

pub fn service_with(model: Arc<dyn LLMServiceTrait>) -> Arc<EstimateService> {
    Arc::new(EstimateService::new(model, Duration::from_secs(60)))
}

/// 使用模型替身的测试服务器
pub fn test_server(model: Arc<dyn LLMServiceTrait>) -> TestServer {
    TestServer::new(routes::app(service_with(model), MAX_BODY_BYTES)).unwrap()
}

/// 指向 wiremock 上游的测试服务器
pub fn test_server_with_upstream(upstream: &MockServer) -> TestServer {
    let llm = Arc::new(LLMService::new_with_config(
        TEST_API_KEY.to_string(),
        "claude-sonnet-4-20250514".to_string(),
        upstream.uri(),
    ));
    TestServer::new(routes::app(service_with(llm), MAX_BODY_BYTES)).unwrap()
}

/// 在随机端口上启动真实的 HTTP 服务，返回基础 URL
#[allow(dead_code)]
pub async fn spawn_app(model: Arc<dyn LLMServiceTrait>) -> String {
    let app = routes::app(service_with(model), MAX_BODY_BYTES);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn sample_estimate() -> Value {
    json!({
        "address": "123 Main St",
        "totalArea": 2500,
        "baseSquares": 25,
        "wastePercent": 10,
        "wasteSource": "Suggested",
        "squaresWithWaste": 27.5,
        "pitchBreakdown": {
            "modBit": { "percent": 10, "squares": 2.66 },
            "threetwelve": { "percent": 20, "squares": 5.66 },
            "fourplus": { "percent": 70, "squares": 19.33 }
        },
        "pricing": {
            "hdz": { "systemsPlus": 12345.6, "silver": 12527.4, "gold": 13389.1 },
            "uhdz": { "systemsPlus": 13580.16, "silver": 13780.14, "gold": 14728.01 }
        },
        "flags": ["Multiple structures detected"]
    })
}

/// 模型用 markdown 围栏包裹的回复
pub fn fenced(value: &Value) -> String {
    format!("```json\n{}\n```", serde_json::to_string_pretty(value).unwrap())
}

/// Messages API 的成功响应
pub fn messages_response(text: &str) -> Value {
    json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "content": [ { "type": "text", "text": text } ],
        "usage": { "input_tokens": 1500, "output_tokens": 420 }
    })
}
