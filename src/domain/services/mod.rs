// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 报价规则（pricing）：单价、坡度系数、利润档位和取整规则
/// - 提示词（prompts）：由报价规则生成的系统提示词和提取指令
/// - LLM服务（llm_service）：调用 Messages API 分析 PDF 文档
/// - 估价服务（estimate_service）：超时控制、去围栏和 JSON 解析
/// - 估价核对（estimate_audit）：按报价规则复算模型结果，只记录差异
pub mod estimate_audit;
pub mod estimate_service;
pub mod llm_service;
pub mod pricing;
pub mod prompts;
