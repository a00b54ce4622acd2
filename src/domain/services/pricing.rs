// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 屋顶报价规则
//!
//! 提示词里交给模型执行的那套算法，在这里用 Rust 实现一遍：
//! 提示词中的费率与系数都从本模块的常量渲染，审计逻辑也用它复算模型的输出

use crate::domain::models::estimate::{PitchBreakdown, Pricing, TierPrices};

/// 每方材料成本（美元）
pub const MATERIAL_COST_PER_SQUARE: f64 = 252.0;
/// 每方人工成本（美元）
pub const LABOR_COST_PER_SQUARE: f64 = 135.0;
/// 每方基础费率 = 材料 + 人工
pub const BASE_RATE_PER_SQUARE: f64 = MATERIAL_COST_PER_SQUARE + LABOR_COST_PER_SQUARE;
/// 报告未标注 Suggested 时的默认损耗
pub const DEFAULT_WASTE_PERCENT: f64 = 10.0;
/// UHDZ 相对 HDZ 的溢价系数
pub const UHDZ_PREMIUM: f64 = 1.10;

/// 三分位取整的断点
pub const THIRDS_WHOLE_MAX: f64 = 0.165;
pub const THIRDS_ONE_THIRD_MAX: f64 = 0.495;
pub const THIRDS_TWO_THIRDS_MAX: f64 = 0.825;

/// 坡度分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchCategory {
    /// 0/12 到 2/12
    ModBit,
    /// 恰好 3/12，全铺防冰防水层
    ThreeTwelve,
    /// 4/12 及更陡
    FourPlus,
}

impl PitchCategory {
    pub const ALL: [PitchCategory; 3] = [
        PitchCategory::ModBit,
        PitchCategory::ThreeTwelve,
        PitchCategory::FourPlus,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            PitchCategory::ModBit => 1.10,
            PitchCategory::ThreeTwelve => 1.07,
            PitchCategory::FourPlus => 1.00,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PitchCategory::ModBit => "Mod Bit (0-2/12)",
            PitchCategory::ThreeTwelve => "3/12 Full I&W",
            PitchCategory::FourPlus => "4/12 & Up",
        }
    }
}

/// 利润档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarginTier {
    SystemsPlus,
    Silver,
    Gold,
}

impl MarginTier {
    pub const ALL: [MarginTier; 3] = [MarginTier::SystemsPlus, MarginTier::Silver, MarginTier::Gold];

    pub fn multiplier(&self) -> f64 {
        match self {
            MarginTier::SystemsPlus => 1.54,
            MarginTier::Silver => 1.5625,
            MarginTier::Gold => 1.67,
        }
    }

    /// 对应的目标利润率（百分比）
    pub fn margin_percent(&self) -> u32 {
        match self {
            MarginTier::SystemsPlus => 35,
            MarginTier::Silver => 36,
            MarginTier::Gold => 40,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarginTier::SystemsPlus => "Systems+",
            MarginTier::Silver => "Silver",
            MarginTier::Gold => "Gold",
        }
    }
}

/// 将小数方数取整到最近的 整数 / .33 / .66
///
/// 断点：小数部分 ≤0.165 取整数，≤0.495 取 .33，≤0.825 取 .66，否则进到下一个整数
pub fn round_to_thirds(squares: f64) -> f64 {
    let whole = squares.floor();
    // Snap to 1e-6 so 2.165 does not land just above the breakpoint.
    let fraction = ((squares - whole) * 1_000_000.0).round() / 1_000_000.0;

    if fraction <= THIRDS_WHOLE_MAX {
        whole
    } else if fraction <= THIRDS_ONE_THIRD_MAX {
        whole + 0.33
    } else if fraction <= THIRDS_TWO_THIRDS_MAX {
        whole + 0.66
    } else {
        whole + 1.0
    }
}

/// 单个坡度桶的方数计算过程
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketSquares {
    pub category: PitchCategory,
    /// 该桶占总面积的百分比
    pub percent: f64,
    /// 未含损耗的方数
    pub base: f64,
    /// 按比例分得的损耗方数
    pub waste_share: f64,
    /// base + waste_share
    pub raw_total: f64,
    /// 三分位取整后的方数
    pub rounded: f64,
}

/// 整份报告的方数分解
#[derive(Debug, Clone, PartialEq)]
pub struct SquaresBreakdown {
    pub base_squares: f64,
    pub squares_with_waste: f64,
    pub buckets: [BucketSquares; 3],
}

/// 由总面积、损耗比例和三个桶的百分比计算各桶方数
///
/// `percents` 依次对应 Mod Bit、3/12、4/12+
pub fn compute_squares(total_area: f64, waste_percent: f64, percents: [f64; 3]) -> SquaresBreakdown {
    let base_squares = total_area / 100.0;
    let squares_with_waste = base_squares * (1.0 + waste_percent / 100.0);
    let waste_squares = squares_with_waste - base_squares;

    let buckets = [0, 1, 2].map(|i| {
        let percent = percents[i];
        let base = base_squares * percent / 100.0;
        let waste_share = if base_squares > 0.0 {
            base / base_squares * waste_squares
        } else {
            0.0
        };
        let raw_total = base + waste_share;
        BucketSquares {
            category: PitchCategory::ALL[i],
            percent,
            base,
            waste_share,
            raw_total,
            rounded: round_to_thirds(raw_total),
        }
    });

    SquaresBreakdown {
        base_squares,
        squares_with_waste,
        buckets,
    }
}

/// 单桶价格 = 方数 × 基础费率 × 坡度系数 × 利润系数
pub fn price_bucket(squares: f64, category: PitchCategory, tier: MarginTier) -> f64 {
    squares * BASE_RATE_PER_SQUARE * category.multiplier() * tier.multiplier()
}

/// 按已取整的各桶方数计算 HDZ / UHDZ 六档报价
pub fn price_breakdown(breakdown: &PitchBreakdown) -> Pricing {
    let squares = [
        (PitchCategory::ModBit, breakdown.mod_bit.squares),
        (PitchCategory::ThreeTwelve, breakdown.threetwelve.squares),
        (PitchCategory::FourPlus, breakdown.fourplus.squares),
    ];

    let tier_total = |tier: MarginTier| -> f64 {
        squares
            .iter()
            .map(|(category, sq)| price_bucket(*sq, *category, tier))
            .sum()
    };

    let hdz = TierPrices {
        systems_plus: tier_total(MarginTier::SystemsPlus),
        silver: tier_total(MarginTier::Silver),
        gold: tier_total(MarginTier::Gold),
    };
    let uhdz = TierPrices {
        systems_plus: hdz.systems_plus * UHDZ_PREMIUM,
        silver: hdz.silver * UHDZ_PREMIUM,
        gold: hdz.gold * UHDZ_PREMIUM,
    };

    Pricing { hdz, uhdz }
}
