// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 估价提示词
//!
//! 系统提示词描述了抽取规则、坡度分桶、三分位取整和报价公式，
//! 所有数值都取自 [`crate::domain::services::pricing`]

use once_cell::sync::Lazy;

use crate::domain::services::pricing::{
    MarginTier, PitchCategory, BASE_RATE_PER_SQUARE, DEFAULT_WASTE_PERCENT,
    LABOR_COST_PER_SQUARE, MATERIAL_COST_PER_SQUARE, THIRDS_ONE_THIRD_MAX,
    THIRDS_TWO_THIRDS_MAX, THIRDS_WHOLE_MAX, UHDZ_PREMIUM,
};

/// 随 PDF 一起发送的用户指令
pub const EXTRACTION_INSTRUCTION: &str = "Extract the data from this GAF QuickMeasure report and calculate the 6 prices. Return ONLY the JSON object, no other text.";

/// 要求模型输出的 JSON 结构
pub const OUTPUT_SCHEMA: &str = r#"{
    "address": "string - property address exactly as shown, or 'Not shown in report'",
    "totalArea": number,
    "baseSquares": number,
    "wastePercent": number,
    "wasteSource": "string - either 'Suggested' or 'Default'",
    "squaresWithWaste": number,
    "pitchBreakdown": {
        "modBit": { "percent": number, "squares": number },
        "threetwelve": { "percent": number, "squares": number },
        "fourplus": { "percent": number, "squares": number }
    },
    "pricing": {
        "hdz": {
            "systemsPlus": number,
            "silver": number,
            "gold": number
        },
        "uhdz": {
            "systemsPlus": number,
            "silver": number,
            "gold": number
        }
    },
    "flags": ["array of strings for any warnings like low-slope areas, multiple structures, etc."]
}"#;

/// 系统提示词（首次使用时渲染）
pub static SYSTEM_PROMPT: Lazy<String> = Lazy::new(render_system_prompt);

fn render_system_prompt() -> String {
    let pitch_multipliers = [
        ("Mod Bit (0-2/12)", PitchCategory::ModBit),
        ("3/12", PitchCategory::ThreeTwelve),
        ("4/12+", PitchCategory::FourPlus),
    ]
    .iter()
    .map(|(label, category)| format!("- {}: × {:.2}", label, category.multiplier()))
    .collect::<Vec<_>>()
    .join("\n");

    let margin_multipliers = MarginTier::ALL
        .iter()
        .map(|tier| {
            format!(
                "- {}: × {} ({}% margin)",
                tier.label(),
                tier.multiplier(),
                tier.margin_percent()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an estimating assistant for Patriots Roofing. Extract data from GAF QuickMeasure PDF reports and calculate 6 pricing options.

## EXTRACTION RULES

From the Summary page, capture:
- Property Address (exactly as shown)
- Total Roof Area (sq ft)
- Pitch breakdown (pitch values and their areas/percentages)
- Suggested Waste % (look for "Suggested" label above a waste column)

If no "Suggested" waste is marked, default to {default_waste}%.

## PITCH CATEGORIZATION

Map all pitches into three buckets:
- Mod Bit: 0/12 through 2/12
- 3/12 Full I&W: exactly 3/12
- 4/12 & Up: 4/12 and steeper

Calculate the percentage of total roof area for each bucket. These must sum to 100%.

## CALCULATION STEPS

1. Base Squares = Total Roof Area ÷ 100
2. Squares + Waste = Base Squares × (1 + Waste%)
3. Waste Squares = Squares + Waste - Base Squares

For each pitch bucket:
- Base squares for bucket = Base Squares × bucket percentage
- Waste share = (bucket base squares ÷ total base squares) × Waste Squares
- Raw total = base squares + waste share

## THIRDS ROUNDING (CRITICAL)

For each pitch bucket's raw total, round to nearest .33, .66, or whole number:
- If fractional part = 0 → keep as-is
- If fractional part ≤ {whole_max} → round to whole number
- If fractional part > {whole_max} and ≤ {third_max} → round to .33
- If fractional part > {third_max} and ≤ {two_thirds_max} → round to .66
- If fractional part > {two_thirds_max} → round up to next whole number

## PRICING CALCULATION

Base Costs:
- Material: ${material}/sq
- Labor: ${labor}/sq
- Base Rate: ${base_rate}/sq

Pitch Multipliers (applied to base rate):
{pitch_multipliers}

Margin Multipliers:
{margin_multipliers}

Formula per pitch bucket:
Price = Rounded Squares × Base Rate × Pitch Multiplier × Margin Multiplier

UHDZ Pricing:
UHDZ = HDZ × {uhdz:.2}

## OUTPUT FORMAT

You must respond with ONLY a valid JSON object, no other text. Use this exact structure:

{schema}"#,
        default_waste = DEFAULT_WASTE_PERCENT,
        whole_max = THIRDS_WHOLE_MAX,
        third_max = THIRDS_ONE_THIRD_MAX,
        two_thirds_max = THIRDS_TWO_THIRDS_MAX,
        material = MATERIAL_COST_PER_SQUARE,
        labor = LABOR_COST_PER_SQUARE,
        base_rate = BASE_RATE_PER_SQUARE,
        pitch_multipliers = pitch_multipliers,
        margin_multipliers = margin_multipliers,
        uhdz = UHDZ_PREMIUM,
        schema = OUTPUT_SCHEMA,
    )
}
