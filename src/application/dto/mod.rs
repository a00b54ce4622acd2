// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义 `POST /api/estimate` 的请求体和错误响应体
pub mod estimate_request;
