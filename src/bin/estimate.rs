// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 命令行上传器
//!
//! 读取本地 PDF，提交到估价服务并在终端输出结果

use anyhow::{Context, Result};
use clap::Parser;
use roof_estimator::client::transport::HttpEstimateClient;
use roof_estimator::client::uploader::{SelectedFile, Uploader, PDF_MIME_TYPE};
use roof_estimator::utils::telemetry;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "estimate", version, about = "Generate a roofing estimate from a QuickMeasure PDF")]
struct Cli {
    /// Measurement report to upload
    file: PathBuf,

    /// Base URL of the estimate server
    #[arg(long, env = "ESTIMATE_SERVER_URL", default_value = "http://localhost:3000")]
    server: String,

    /// Print debug logs to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// 按扩展名推断声明的文件类型
fn declared_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MIME_TYPE,
        _ => "application/octet-stream",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_cli_telemetry(cli.verbose);

    let bytes = tokio::fs::read(&cli.file)
        .await
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    let name = cli
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.display().to_string());

    let mut uploader = Uploader::new();
    uploader.select_file(SelectedFile::new(name, declared_type(&cli.file), bytes))?;

    let transport = HttpEstimateClient::new(&cli.server);
    eprintln!("Analyzing report via {} ...", transport.endpoint());
    uploader.submit(&transport).await?;

    match uploader.view().results {
        Some(results) => print!("{}", results.render_text()),
        None => anyhow::bail!("no estimate returned"),
    }

    Ok(())
}
