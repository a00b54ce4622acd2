// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 包含估价 API 和上传页面的处理逻辑
pub mod estimate_handler;
pub mod ui_handler;
