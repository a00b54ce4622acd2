// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{multipart::MultipartError, Multipart},
    response::Html,
    Extension,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::render::render_page;
use crate::client::transport::InProcessTransport;
use crate::client::uploader::{SelectedFile, Uploader};
use crate::domain::services::estimate_service::EstimateService;
use crate::presentation::handlers::estimate_handler::record_outcome;

/// 上传页面
///
/// 渲染上传器的初始界面
pub async fn upload_page() -> Html<String> {
    Html(render_page(&Uploader::new().view()))
}

/// 处理上传表单
///
/// 每次提交都用新的上传器走完 选择 → 提交 流程，再渲染结果或带提示的初始界面
pub async fn submit_upload(
    Extension(service): Extension<Arc<EstimateService>>,
    multipart: Multipart,
) -> Html<String> {
    let mut uploader = Uploader::new();

    let outcome = match read_file_field(multipart).await {
        Ok(Some(file)) => match uploader.select_file(file) {
            Ok(()) => {
                let transport = InProcessTransport::new(service);
                match uploader.submit(&transport).await {
                    Ok(()) => "success",
                    Err(e) => {
                        debug!(error = %e, "Estimate not produced");
                        "failed"
                    }
                }
            }
            Err(e) => {
                debug!(error = %e, "Upload rejected");
                "rejected"
            }
        },
        Ok(None) => {
            debug!("Upload form submitted without a file");
            uploader.require_file();
            "rejected"
        }
        Err(e) => {
            warn!(error = %e, "Failed to read upload form");
            uploader.require_file();
            "rejected"
        }
    };
    record_outcome(outcome);

    Html(render_page(&uploader.view()))
}

/// 读取上传表单
///
/// `file` 字段是普通文件上传；`pdf` 字段是拖放脚本提交的 data URL
async fn read_file_field(mut multipart: Multipart) -> Result<Option<SelectedFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                if name.is_empty() {
                    return Ok(None);
                }
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;

                return Ok(Some(SelectedFile::new(name, content_type, bytes.to_vec())));
            }
            Some("pdf") => {
                let data_url = field.text().await?;
                if data_url.is_empty() {
                    return Ok(None);
                }
                return match SelectedFile::from_data_url("document.pdf", &data_url) {
                    Ok(file) => Ok(Some(file)),
                    Err(e) => {
                        debug!(error = %e, "Unreadable data URL");
                        Ok(None)
                    }
                };
            }
            _ => continue,
        }
    }

    Ok(None)
}
