// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括模型回复的围栏剥离和日志初始化
pub mod code_fence;
pub mod telemetry;
