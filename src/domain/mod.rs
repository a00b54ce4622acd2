// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：模型返回的估价结构
/// - 服务（services）：报价规则、提示词、LLM 调用和估价流程
///
/// 领域层不依赖 HTTP 层，表示层和客户端都通过它完成估价。
pub mod models;
pub mod services;
