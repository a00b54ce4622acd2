// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 估价结果（estimate）：地址、面积、坡度分布和六档报价
pub mod estimate;
