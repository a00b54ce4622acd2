// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、LLM、估价执行时限和指标导出等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// LLM 提供商配置
    pub llm: LlmSettings,
    /// 估价请求配置
    pub estimate: EstimateSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 请求体大小上限（字节），base64 编码后的 PDF 需要放得下
    pub max_body_bytes: usize,
}

/// LLM 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// API 密钥，优先读取 `ANTHROPIC_API_KEY`
    pub api_key: Option<String>,
    /// 模型名称
    pub model: String,
    /// API 基础 URL
    pub api_base_url: String,
    /// `anthropic-version` 请求头
    pub api_version: String,
    /// 单次补全的最大输出 token 数
    pub max_tokens: u32,
}

/// 估价请求配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct EstimateSettings {
    /// 外部调用加解析的执行时间上限（秒）
    pub max_duration_secs: u64,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启动 Prometheus 导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl EstimateSettings {
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 和 `ESTIMATOR__*` 环境变量；`ANTHROPIC_API_KEY` 最后覆盖密钥
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.max_body_bytes", 20 * 1024 * 1024)?
            // Default LLM settings
            .set_default("llm.model", "claude-sonnet-4-20250514")?
            .set_default("llm.api_base_url", "https://api.anthropic.com")?
            .set_default("llm.api_version", "2023-06-01")?
            .set_default("llm.max_tokens", 2048)?
            // Default estimate settings
            .set_default("estimate.max_duration_secs", 60)?
            // Default metrics settings
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("ESTIMATOR").separator("__"))
            .set_override_option("llm.api_key", std::env::var("ANTHROPIC_API_KEY").ok())?;

        builder.build()?.try_deserialize()
    }
}
