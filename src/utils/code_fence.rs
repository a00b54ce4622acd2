// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\n?|\n?```").expect("valid fence regex"));

/// 去掉模型回复中的 markdown 代码围栏标记
///
/// 所有 ```` ```json ```` 与 ```` ``` ```` 标记都会被移除，结果再去掉首尾空白
pub fn strip_code_fences(text: &str) -> String {
    FENCE_MARKER.replace_all(text, "").trim().to_string()
}
