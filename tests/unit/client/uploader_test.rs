// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use roof_estimator::application::dto::estimate_request::EstimateRequestDto;
use roof_estimator::client::transport::{EstimateTransport, TransportError};
use roof_estimator::client::uploader::{
    Phase, SelectedFile, UploadError, Uploader, UploaderState, PDF_MIME_TYPE,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// 记录请求的传输替身
struct MockTransport {
    reply: Result<Value, u16>,
    calls: AtomicUsize,
    last_pdf: Mutex<Option<String>>,
}

impl MockTransport {
    fn ok(body: Value) -> Self {
        Self {
            reply: Ok(body),
            calls: AtomicUsize::new(0),
            last_pdf: Mutex::new(None),
        }
    }

    fn status(code: u16) -> Self {
        Self {
            reply: Err(code),
            calls: AtomicUsize::new(0),
            last_pdf: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EstimateTransport for MockTransport {
    async fn post_estimate(&self, request: &EstimateRequestDto) -> Result<Value, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_pdf.lock().unwrap() = request.pdf.clone();
        match &self.reply {
            Ok(body) => Ok(body.clone()),
            Err(code) => Err(TransportError::Status(*code)),
        }
    }
}

fn estimate(flags: Value) -> Value {
    json!({
        "address": "42 Shingle Way",
        "totalArea": 2534,
        "baseSquares": 25.34,
        "wastePercent": 10,
        "wasteSource": "Default",
        "squaresWithWaste": 27.874,
        "pitchBreakdown": {
            "modBit": { "percent": 0, "squares": 0 },
            "threetwelve": { "percent": 0, "squares": 0 },
            "fourplus": { "percent": 100, "squares": 28 }
        },
        "pricing": {
            "hdz": { "systemsPlus": 16690.32, "silver": 16934.06, "gold": 18099.4 },
            "uhdz": { "systemsPlus": 18359.35, "silver": 18627.47, "gold": 19909.34 }
        },
        "flags": flags
    })
}

fn pdf(name: &str) -> SelectedFile {
    SelectedFile::new(name, PDF_MIME_TYPE, b"%PDF-1.4".to_vec())
}

#[tokio::test]
async fn test_non_pdf_is_rejected_without_request() {
    let transport = MockTransport::ok(estimate(json!([])));
    let mut uploader = Uploader::new();

    let err = uploader
        .select_file(SelectedFile::new("roof.jpg", "image/jpeg", vec![0xff, 0xd8]))
        .unwrap_err();
    assert!(matches!(err, UploadError::NotPdf { .. }));
    assert_eq!(uploader.state(), &UploaderState::Idle);
    assert!(!uploader.can_submit());

    let err = uploader.submit(&transport).await.unwrap_err();
    assert!(matches!(err, UploadError::NoFileSelected));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_submit_without_file_sends_nothing() {
    let transport = MockTransport::ok(estimate(json!([])));
    let mut uploader = Uploader::new();

    assert!(uploader.submit(&transport).await.is_err());
    assert_eq!(transport.calls(), 0);
    assert_eq!(uploader.notice(), Some("Please select a PDF file first"));
    assert_eq!(uploader.view().phase, Phase::Upload);
}

/// 提交成功后进入结果界面，请求体是无前缀的 base64
#[tokio::test]
async fn test_successful_submit_shows_results() {
    let transport = MockTransport::ok(estimate(json!(["Low slope area", "Detached garage"])));
    let mut uploader = Uploader::new();
    uploader.select_file(pdf("report.pdf")).unwrap();

    uploader.submit(&transport).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(
        transport.last_pdf.lock().unwrap().as_deref(),
        Some("JVBERi0xLjQ=")
    );

    let view = uploader.view();
    assert_eq!(view.phase, Phase::Results);
    assert!(!view.submit_enabled);
    let results = view.results.expect("results view");
    assert_eq!(results.property_address, "42 Shingle Way");
    assert_eq!(results.total_area, "2,534 sq ft");
    assert_eq!(results.waste, "10% (Default)");
    assert_eq!(results.price("hdzSystemsPlus"), Some("$16,690"));
    assert_eq!(results.price("uhdzGold"), Some("$19,909"));
    assert_eq!(
        results.flags.as_deref(),
        Some("Low slope area, Detached garage")
    );
    assert!(results
        .render_html()
        .contains("Low slope area, Detached garage"));
}

#[tokio::test]
async fn test_empty_flags_hide_section() {
    let transport = MockTransport::ok(estimate(json!([])));
    let mut uploader = Uploader::new();
    uploader.select_file(pdf("report.pdf")).unwrap();
    uploader.submit(&transport).await.unwrap();

    let results = uploader.view().results.unwrap();
    assert!(results.flags.is_none());
    assert!(results
        .render_html()
        .contains("<div id=\"flagsSection\"></div>"));
}

/// 请求失败后回到初始界面并给出通用提示
#[tokio::test]
async fn test_failed_submit_resets_with_notice() {
    let transport = MockTransport::status(500);
    let mut uploader = Uploader::new();
    uploader.select_file(pdf("report.pdf")).unwrap();

    let err = uploader.submit(&transport).await.unwrap_err();

    assert!(matches!(
        err,
        UploadError::Failed(TransportError::Status(500))
    ));
    assert_eq!(transport.calls(), 1);

    let view = uploader.view();
    assert_eq!(view.phase, Phase::Upload);
    assert_eq!(view.file_name, None);
    assert!(!view.submit_enabled);
    assert_eq!(
        view.notice.as_deref(),
        Some("Error generating estimate. Please try again.")
    );
}

#[tokio::test]
async fn test_unexpected_body_is_a_failure() {
    let transport = MockTransport::ok(json!({ "address": "no numbers here" }));
    let mut uploader = Uploader::new();
    uploader.select_file(pdf("report.pdf")).unwrap();

    let err = uploader.submit(&transport).await.unwrap_err();

    assert!(matches!(err, UploadError::Failed(TransportError::Decode(_))));
    assert_eq!(uploader.view().phase, Phase::Upload);
}

#[tokio::test]
async fn test_reset_returns_to_initial_view() {
    let transport = MockTransport::ok(estimate(json!([])));
    let mut uploader = Uploader::new();
    uploader.select_file(pdf("report.pdf")).unwrap();
    uploader.submit(&transport).await.unwrap();

    let err = uploader.select_file(pdf("other.pdf")).unwrap_err();
    assert!(matches!(err, UploadError::NotAccepting));

    uploader.reset();
    assert_eq!(uploader.view(), Uploader::new().view());

    uploader.select_file(pdf("other.pdf")).unwrap();
    assert!(uploader.can_submit());
}

#[test]
fn test_require_file_sets_notice_without_state_change() {
    let mut uploader = Uploader::new();
    let err = uploader.require_file();

    assert!(matches!(err, UploadError::NoFileSelected));
    assert_eq!(uploader.state(), &UploaderState::Idle);
    assert_eq!(uploader.notice(), Some("Please select a PDF file first"));
}
