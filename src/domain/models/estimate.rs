// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 估价结果
///
/// 模型按提示词约定返回的 JSON 对象。代理层只做语法校验并原样透传，
/// 客户端在渲染前反序列化为该结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    /// 物业地址，报告中缺失时为 "Not shown in report"
    pub address: String,
    /// 屋顶总面积（平方英尺）
    pub total_area: f64,
    /// 基础方数（面积 / 100）
    pub base_squares: f64,
    /// 损耗百分比
    pub waste_percent: f64,
    /// 损耗来源
    pub waste_source: WasteSource,
    /// 含损耗方数
    pub squares_with_waste: f64,
    /// 坡度分桶
    pub pitch_breakdown: PitchBreakdown,
    /// 六档报价
    pub pricing: Pricing,
    /// 警告信息，可能为空
    #[serde(default)]
    pub flags: Vec<String>,
}

/// 损耗来源
///
/// 模型返回约定之外的值时保留原始字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WasteSource {
    Suggested,
    Default,
    #[serde(untagged)]
    Other(String),
}

impl WasteSource {
    pub fn as_str(&self) -> &str {
        match self {
            WasteSource::Suggested => "Suggested",
            WasteSource::Default => "Default",
            WasteSource::Other(raw) => raw,
        }
    }
}

/// 三个固定坡度桶
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchBreakdown {
    /// 0/12 - 2/12
    pub mod_bit: PitchBucket,
    /// 3/12
    pub threetwelve: PitchBucket,
    /// 4/12 及以上
    pub fourplus: PitchBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchBucket {
    pub percent: f64,
    pub squares: f64,
}

/// 两条瓦片产品线的报价
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub hdz: TierPrices,
    pub uhdz: TierPrices,
}

/// 三个利润档位的金额
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierPrices {
    pub systems_plus: f64,
    pub silver: f64,
    pub gold: f64,
}

impl PitchBreakdown {
    /// 三个桶的百分比之和，预期为 100
    pub fn percent_total(&self) -> f64 {
        self.mod_bit.percent + self.threetwelve.percent + self.fourplus.percent
    }
}
