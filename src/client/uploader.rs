// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use tracing::{info, warn};

use crate::application::dto::estimate_request::EstimateRequestDto;
use crate::client::render::ResultsView;
use crate::client::transport::{EstimateTransport, TransportError};
use crate::domain::models::estimate::EstimateResult;

/// 唯一接受的文件类型
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// 用户选择的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    /// 声明的 MIME 类型
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// 从 data URL（`data:<type>;base64,<payload>`）构造，声明类型取自前缀
    pub fn from_data_url(name: impl Into<String>, data_url: &str) -> Result<Self, UploadError> {
        let content_type = data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split([';', ',']).next())
            .unwrap_or_default()
            .to_string();
        let bytes = STANDARD
            .decode(strip_data_url_prefix(data_url).trim())
            .map_err(|_| UploadError::InvalidDataUrl)?;

        Ok(Self::new(name, content_type, bytes))
    }
}

/// 上传器状态
///
/// `Idle → FileSelected → Submitting → {Results | Idle}`，`Results → Idle` 只能通过重置
#[derive(Debug, Clone, PartialEq)]
pub enum UploaderState {
    Idle,
    FileSelected(SelectedFile),
    Submitting { file_name: String },
    Results(Box<EstimateResult>),
}

/// 上传器错误，`Display` 即展示给用户的提示
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Please upload a PDF file")]
    NotPdf { content_type: String },

    #[error("Could not read the selected file")]
    InvalidDataUrl,

    #[error("Please select a PDF file first")]
    NoFileSelected,

    #[error("Start a new estimate before selecting another file")]
    NotAccepting,

    #[error("Error generating estimate. Please try again.")]
    Failed(#[source] TransportError),
}

/// 页面当前显示的区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Upload,
    Loading,
    Results,
}

/// 渲染所需的全部界面状态
#[derive(Debug, Clone, PartialEq)]
pub struct UploaderView {
    pub phase: Phase,
    pub file_name: Option<String>,
    pub submit_enabled: bool,
    pub notice: Option<String>,
    pub results: Option<ResultsView>,
}

/// 上传器
///
/// 所有界面状态都保存在这一个对象里，事件处理即方法调用
#[derive(Debug)]
pub struct Uploader {
    state: UploaderState,
    notice: Option<String>,
}

impl Default for Uploader {
    fn default() -> Self {
        Self::new()
    }
}

impl Uploader {
    pub fn new() -> Self {
        Self {
            state: UploaderState::Idle,
            notice: None,
        }
    }

    pub fn state(&self) -> &UploaderState {
        &self.state
    }

    /// 最近一次给用户的提示（拒绝文件或请求失败）
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn results(&self) -> Option<&EstimateResult> {
        match &self.state {
            UploaderState::Results(result) => Some(result),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.state, UploaderState::FileSelected(_))
    }

    /// 选择文件（点击选择或拖放）
    ///
    /// 非 PDF 文件只产生提示，状态保持不变；已选文件会被新文件替换
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), UploadError> {
        if !matches!(
            self.state,
            UploaderState::Idle | UploaderState::FileSelected(_)
        ) {
            return Err(UploadError::NotAccepting);
        }

        if file.content_type != PDF_MIME_TYPE {
            let err = UploadError::NotPdf {
                content_type: file.content_type,
            };
            self.notice = Some(err.to_string());
            return Err(err);
        }

        info!(file_name = %file.name, size = file.bytes.len(), "PDF selected");
        self.notice = None;
        self.state = UploaderState::FileSelected(file);
        Ok(())
    }

    /// 提交已选文件，只发出一次请求
    ///
    /// 失败时回到初始状态并保留一条通用错误提示
    pub async fn submit<T>(&mut self, transport: &T) -> Result<(), UploadError>
    where
        T: EstimateTransport + ?Sized,
    {
        let file = match std::mem::replace(&mut self.state, UploaderState::Idle) {
            UploaderState::FileSelected(file) => file,
            other => {
                self.state = other;
                return Err(self.require_file());
            }
        };

        self.notice = None;
        self.state = UploaderState::Submitting {
            file_name: file.name.clone(),
        };

        let request = EstimateRequestDto::new(encode_document(&file.bytes));
        drop(file);

        let outcome = match transport.post_estimate(&request).await {
            Ok(body) => serde_json::from_value::<EstimateResult>(body)
                .map_err(|e| TransportError::Decode(e.to_string())),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => {
                self.state = UploaderState::Results(Box::new(result));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Estimate request failed");
                let err = UploadError::Failed(e);
                self.reset();
                self.notice = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// 在没有可提交文件时给出提示，状态不变
    pub fn require_file(&mut self) -> UploadError {
        let err = UploadError::NoFileSelected;
        self.notice = Some(err.to_string());
        err
    }

        /// 重置到初始上传界面，任何状态下都可调用
    pub fn reset(&mut self) {
        self.state = UploaderState::Idle;
        self.notice = None;
    }

    pub fn view(&self) -> UploaderView {
        let (phase, file_name, results) = match &self.state {
            UploaderState::Idle => (Phase::Upload, None, None),
            UploaderState::FileSelected(file) => (Phase::Upload, Some(file.name.clone()), None),
            UploaderState::Submitting { file_name } => {
                (Phase::Loading, Some(file_name.clone()), None)
            }
            UploaderState::Results(result) => {
                (Phase::Results, None, Some(ResultsView::from(result.as_ref())))
            }
        };

        UploaderView {
            phase,
            file_name,
            submit_enabled: self.can_submit(),
            notice: self.notice.clone(),
            results,
        }
    }
}

/// 将文件内容编码为不带前缀的 base64
pub fn encode_document(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// 去掉 data URL 前缀（第一个逗号及之前的部分）
pub fn strip_data_url_prefix(data: &str) -> &str {
    match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    }
}
