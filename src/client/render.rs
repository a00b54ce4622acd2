// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 估价结果渲染
//!
//! 同一份 [`ResultsView`] 可渲染为带固定元素 id 的 HTML，或命令行文本

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

use crate::client::uploader::{Phase, UploaderView, PDF_MIME_TYPE};
use crate::domain::models::estimate::{EstimateResult, PitchBucket, TierPrices};
use crate::domain::services::pricing::{MarginTier, PitchCategory};

/// 整数加千分位
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// 金额：四舍五入到整数并加千分位，例如 `12345.6` → `$12,346`
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    if rounded < 0 {
        format!("-${}", format_thousands(-rounded))
    } else {
        format!("${}", format_thousands(rounded))
    }
}

/// 带千分位的数字，最多保留三位小数
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let whole = rounded.trunc() as i64;
    let fraction = format!("{:.3}", rounded.abs().fract());
    let fraction = fraction.trim_start_matches('0').trim_end_matches('0');

    let sign = if rounded < 0.0 && whole == 0 { "-" } else { "" };
    if fraction == "." || fraction.is_empty() {
        format!("{}{}", sign, format_thousands(whole))
    } else {
        format!("{}{}{}", sign, format_thousands(whole), fraction)
    }
}

/// 警告行：`flags` 为空时不显示
pub fn flags_line(flags: &[String]) -> Option<String> {
    if flags.is_empty() {
        None
    } else {
        Some(flags.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PitchRow {
    pub label: &'static str,
    pub percent: String,
    pub squares: String,
}

/// 一个价格单元格，`id` 与页面上的元素 id 对应
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCell {
    pub id: &'static str,
    pub line: &'static str,
    pub tier: &'static str,
    pub amount: String,
}

/// 结果区域的全部显示文本
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub property_address: String,
    pub total_area: String,
    pub base_squares: String,
    pub waste: String,
    pub squares_with_waste: String,
    pub pitch_rows: Vec<PitchRow>,
    pub prices: Vec<PriceCell>,
    pub flags: Option<String>,
}

fn pitch_row(category: PitchCategory, bucket: &PitchBucket) -> PitchRow {
    PitchRow {
        label: category.label(),
        percent: format!("{}%", bucket.percent),
        squares: format!("{} sq", bucket.squares),
    }
}

fn price_cells(line: &'static str, ids: [&'static str; 3], prices: &TierPrices) -> [PriceCell; 3] {
    let amounts = [prices.systems_plus, prices.silver, prices.gold];
    [0, 1, 2].map(|i| PriceCell {
        id: ids[i],
        line,
        tier: MarginTier::ALL[i].label(),
        amount: format_currency(amounts[i]),
    })
}

impl From<&EstimateResult> for ResultsView {
    fn from(result: &EstimateResult) -> Self {
        let breakdown = &result.pitch_breakdown;
        let pitch_rows = vec![
            pitch_row(PitchCategory::ModBit, &breakdown.mod_bit),
            pitch_row(PitchCategory::ThreeTwelve, &breakdown.threetwelve),
            pitch_row(PitchCategory::FourPlus, &breakdown.fourplus),
        ];

        let mut prices = Vec::with_capacity(6);
        prices.extend(price_cells(
            "HDZ",
            ["hdzSystemsPlus", "hdzSilver", "hdzGold"],
            &result.pricing.hdz,
        ));
        prices.extend(price_cells(
            "UHDZ",
            ["uhdzSystemsPlus", "uhdzSilver", "uhdzGold"],
            &result.pricing.uhdz,
        ));

        Self {
            property_address: result.address.clone(),
            total_area: format!("{} sq ft", format_number(result.total_area)),
            base_squares: result.base_squares.to_string(),
            waste: format!(
                "{}% ({})",
                result.waste_percent,
                result.waste_source.as_str()
            ),
            squares_with_waste: result.squares_with_waste.to_string(),
            pitch_rows,
            prices,
            flags: flags_line(&result.flags),
        }
    }
}

impl ResultsView {
    pub fn price(&self, id: &str) -> Option<&str> {
        self.prices
            .iter()
            .find(|cell| cell.id == id)
            .map(|cell| cell.amount.as_str())
    }

    /// 结果区域的 HTML 片段
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        let _ = writeln!(
            html,
            r#"<h2 id="propertyAddress">{}</h2>"#,
            encode_text(&self.property_address)
        );
        let _ = writeln!(
            html,
            r#"<div id="dataSummary"><strong>Total Area:</strong> {}<br><strong>Base Squares:</strong> {}<br><strong>Waste:</strong> {}<br><strong>Squares + Waste:</strong> {}</div>"#,
            encode_text(&self.total_area),
            encode_text(&self.base_squares),
            encode_text(&self.waste),
            encode_text(&self.squares_with_waste)
        );

        html.push_str(r#"<div id="pitchBreakdown"><table><thead><tr><th>Pitch Bucket</th><th>Percentage</th><th>Rounded Squares</th></tr></thead><tbody>"#);
        for row in &self.pitch_rows {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                encode_text(row.label),
                encode_text(&row.percent),
                encode_text(&row.squares)
            );
        }
        html.push_str("</tbody></table></div>\n");

        html.push_str(r#"<table class="pricing"><thead><tr><th></th>"#);
        for tier in MarginTier::ALL {
            let _ = write!(html, "<th>{}</th>", encode_text(tier.label()));
        }
        html.push_str("</tr></thead><tbody>");
        for line in self.prices.chunks(3) {
            let _ = write!(html, "<tr><th>{}</th>", line[0].line);
            for cell in line {
                let _ = write!(
                    html,
                    r#"<td id="{}">{}</td>"#,
                    cell.id,
                    encode_text(&cell.amount)
                );
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>\n");

        match &self.flags {
            Some(flags) => {
                let _ = writeln!(
                    html,
                    r#"<div id="flagsSection"><strong>⚠️ Flags:</strong> {}</div>"#,
                    encode_text(flags)
                );
            }
            None => html.push_str("<div id=\"flagsSection\"></div>\n"),
        }

        html
    }

    /// 命令行文本
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.property_address);
        let _ = writeln!(out);
        let _ = writeln!(out, "Total Area:      {}", self.total_area);
        let _ = writeln!(out, "Base Squares:    {}", self.base_squares);
        let _ = writeln!(out, "Waste:           {}", self.waste);
        let _ = writeln!(out, "Squares + Waste: {}", self.squares_with_waste);
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<18} {:>10} {:>16}", "Pitch Bucket", "Percentage", "Rounded Squares");
        for row in &self.pitch_rows {
            let _ = writeln!(out, "{:<18} {:>10} {:>16}", row.label, row.percent, row.squares);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<6} {:>12} {:>12} {:>12}", "", "Systems+", "Silver", "Gold");
        for line in self.prices.chunks(3) {
            let _ = writeln!(
                out,
                "{:<6} {:>12} {:>12} {:>12}",
                line[0].line, line[0].amount, line[1].amount, line[2].amount
            );
        }
        if let Some(flags) = &self.flags {
            let _ = writeln!(out);
            let _ = writeln!(out, "Flags: {}", flags);
        }
        out
    }
}

fn display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

/// 完整的上传页面
///
/// 上传、加载、结果三个区域都输出，按当前阶段切换显示
pub fn render_page(view: &UploaderView) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Roof Estimate</title>\n</head>\n<body>\n",
    );

    if let Some(notice) = &view.notice {
        let _ = writeln!(
            html,
            r#"<p id="notice" role="alert">{}</p>"#,
            encode_text(notice)
        );
    }

    let _ = writeln!(
        html,
        r#"<section id="uploadSection" style="display: {}">"#,
        display(view.phase == Phase::Upload)
    );
    html.push_str(r#"<form id="uploadBox" method="post" action="/" enctype="multipart/form-data">"#);
    let _ = write!(
        html,
        r#"<input id="fileInput" type="file" name="file" accept="{}">"#,
        encode_double_quoted_attribute(PDF_MIME_TYPE)
    );
    let _ = write!(
        html,
        r#"<span id="fileName">{}</span>"#,
        encode_text(view.file_name.as_deref().unwrap_or(""))
    );
    html.push_str(r#"<input id="pdfData" type="hidden" name="pdf">"#);
    let _ = write!(
        html,
        r#"<button id="estimateBtn" type="submit"{}>Generate Estimate</button>"#,
        if view.submit_enabled { "" } else { " disabled" }
    );
    html.push_str("</form>\n</section>\n");

    let _ = writeln!(
        html,
        r#"<section id="loadingSection" style="display: {}"><p>Analyzing report...</p></section>"#,
        display(view.phase == Phase::Loading)
    );

    let _ = writeln!(
        html,
        r#"<section id="resultsSection" style="display: {}">"#,
        display(view.phase == Phase::Results)
    );
    if let Some(results) = &view.results {
        html.push_str(&results.render_html());
    }
    html.push_str("<a id=\"newEstimateBtn\" href=\"/\">New Estimate</a>\n</section>\n");

    let _ = writeln!(html, "<script>{}</script>", UPLOAD_SCRIPT);
    html.push_str("</body>\n</html>\n");
    html
}

/// 浏览器端的选择、拖放和提交逻辑
///
/// 非 PDF 文件在本地拒绝，不发请求；提交时文件以 data URL 放入 `pdf` 字段
const UPLOAD_SCRIPT: &str = r#"
(function () {
  var box = document.getElementById('uploadBox');
  var input = document.getElementById('fileInput');
  var pdfData = document.getElementById('pdfData');
  var btn = document.getElementById('estimateBtn');
  var fileName = document.getElementById('fileName');
  var selected = null;

  function select(file) {
    if (!file) return false;
    if (file.type !== 'application/pdf') {
      alert('Please upload a PDF file');
      return false;
    }
    selected = file;
    fileName.textContent = file.name;
    btn.disabled = false;
    return true;
  }

  box.addEventListener('click', function (e) {
    if (e.target === btn || e.target === input) return;
    input.click();
  });
  box.addEventListener('dragover', function (e) {
    e.preventDefault();
    box.classList.add('dragover');
  });
  box.addEventListener('dragleave', function () {
    box.classList.remove('dragover');
  });
  box.addEventListener('drop', function (e) {
    e.preventDefault();
    box.classList.remove('dragover');
    select(e.dataTransfer.files[0]);
  });
  input.addEventListener('change', function () {
    if (!select(input.files[0])) input.value = '';
  });
  box.addEventListener('submit', function (e) {
    e.preventDefault();
    if (!selected) {
      alert('Please select a PDF file first');
      return;
    }
    var reader = new FileReader();
    reader.onload = function () {
      pdfData.value = reader.result;
      input.disabled = true;
      btn.disabled = true;
      document.getElementById('uploadSection').style.display = 'none';
      document.getElementById('loadingSection').style.display = 'block';
      box.submit();
    };
    reader.readAsDataURL(selected);
  });
})();
"#;
