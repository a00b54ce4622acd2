// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 客户端上传器模块
///
/// 上传器状态机、到估价端点的传输以及结果渲染
pub mod render;
pub mod transport;
pub mod uploader;
