// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;

use crate::domain::models::estimate::{EstimateResult, TierPrices};
use crate::domain::services::pricing::{compute_squares, price_breakdown, round_to_thirds};

/// 三个桶百分比之和允许的偏差
pub const PERCENT_TOLERANCE: f64 = 0.5;
/// 方数复核允许的绝对偏差
pub const SQUARES_TOLERANCE: f64 = 0.01;
/// 报价复核允许的相对偏差
pub const PRICE_TOLERANCE: f64 = 0.01;

/// 复核模型输出时发现的问题
#[derive(Debug, Clone, PartialEq)]
pub enum AuditFinding {
    /// 输出不符合 EstimateResult 结构
    UnexpectedShape(String),
    /// 三个桶的百分比之和不是 100
    PercentTotal { total: f64 },
    /// baseSquares 与 totalArea / 100 不一致
    BaseSquares { expected: f64, reported: f64 },
    /// squaresWithWaste 与 baseSquares × (1 + wastePercent / 100) 不一致
    SquaresWithWaste { expected: f64, reported: f64 },
    /// 桶方数不是 整数 / .33 / .66
    NotThirds { bucket: &'static str, squares: f64 },
    /// 桶方数与按面积、损耗和百分比复算并取整的结果不一致
    BucketSquares {
        bucket: &'static str,
        expected: f64,
        reported: f64,
    },
    /// 某一档报价与按返回方数复算的结果不一致
    Price {
        line: &'static str,
        tier: &'static str,
        expected: f64,
        reported: f64,
    },
}

impl std::fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditFinding::UnexpectedShape(e) => write!(f, "unexpected estimate shape: {}", e),
            AuditFinding::PercentTotal { total } => {
                write!(f, "pitch percents sum to {:.2}, not 100", total)
            }
            AuditFinding::BaseSquares { expected, reported } => write!(
                f,
                "baseSquares {} differs from totalArea / 100 = {}",
                reported, expected
            ),
            AuditFinding::SquaresWithWaste { expected, reported } => write!(
                f,
                "squaresWithWaste {} differs from recomputed {:.3}",
                reported, expected
            ),
            AuditFinding::NotThirds { bucket, squares } => {
                write!(f, "{} squares {} is not a thirds value", bucket, squares)
            }
            AuditFinding::BucketSquares {
                bucket,
                expected,
                reported,
            } => write!(
                f,
                "{} squares {} differ from recomputed {}",
                bucket, reported, expected
            ),
            AuditFinding::Price {
                line,
                tier,
                expected,
                reported,
            } => write!(
                f,
                "{}.{} is {:.2}, recomputed {:.2}",
                line, tier, reported, expected
            ),
        }
    }
}

/// 复核模型返回的估价
///
/// 只用于日志和指标，不修改返回给调用方的数据
pub fn audit_estimate(value: &Value) -> Vec<AuditFinding> {
    let estimate: EstimateResult = match serde_json::from_value(value.clone()) {
        Ok(estimate) => estimate,
        Err(e) => return vec![AuditFinding::UnexpectedShape(e.to_string())],
    };

    let mut findings = Vec::new();

    let total = estimate.pitch_breakdown.percent_total();
    if (total - 100.0).abs() > PERCENT_TOLERANCE {
        findings.push(AuditFinding::PercentTotal { total });
    }

    let expected_base = estimate.total_area / 100.0;
    if (expected_base - estimate.base_squares).abs() > SQUARES_TOLERANCE {
        findings.push(AuditFinding::BaseSquares {
            expected: expected_base,
            reported: estimate.base_squares,
        });
    }

    let expected_with_waste = estimate.base_squares * (1.0 + estimate.waste_percent / 100.0);
    if (expected_with_waste - estimate.squares_with_waste).abs() > SQUARES_TOLERANCE {
        findings.push(AuditFinding::SquaresWithWaste {
            expected: expected_with_waste,
            reported: estimate.squares_with_waste,
        });
    }

    audit_buckets(&estimate, &mut findings);

    let expected = price_breakdown(&estimate.pitch_breakdown);
    compare_tiers("hdz", &expected.hdz, &estimate.pricing.hdz, &mut findings);
    compare_tiers("uhdz", &expected.uhdz, &estimate.pricing.uhdz, &mut findings);

    findings
}

/// 逐桶检查取整结果，并与按面积复算的方数比较
fn audit_buckets(estimate: &EstimateResult, findings: &mut Vec<AuditFinding>) {
    let breakdown = &estimate.pitch_breakdown;
    let buckets = [
        ("modBit", &breakdown.mod_bit),
        ("threetwelve", &breakdown.threetwelve),
        ("fourplus", &breakdown.fourplus),
    ];
    let recomputed = compute_squares(
        estimate.total_area,
        estimate.waste_percent,
        buckets.map(|(_, bucket)| bucket.percent),
    );

    for ((bucket, reported), expected) in buckets.into_iter().zip(recomputed.buckets) {
        if (round_to_thirds(reported.squares) - reported.squares).abs() > SQUARES_TOLERANCE {
            findings.push(AuditFinding::NotThirds {
                bucket,
                squares: reported.squares,
            });
        }
        if (expected.rounded - reported.squares).abs() > SQUARES_TOLERANCE {
            findings.push(AuditFinding::BucketSquares {
                bucket,
                expected: expected.rounded,
                reported: reported.squares,
            });
        }
    }
}

fn compare_tiers(
    line: &'static str,
    expected: &TierPrices,
    reported: &TierPrices,
    findings: &mut Vec<AuditFinding>,
) {
    let pairs = [
        ("systemsPlus", expected.systems_plus, reported.systems_plus),
        ("silver", expected.silver, reported.silver),
        ("gold", expected.gold, reported.gold),
    ];

    for (tier, expected, reported) in pairs {
        let allowed = (expected.abs() * PRICE_TOLERANCE).max(1.0);
        if (expected - reported).abs() > allowed {
            findings.push(AuditFinding::Price {
                line,
                tier,
                expected,
                reported,
            });
        }
    }
}
