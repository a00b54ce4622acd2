// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{fenced, sample_estimate, spawn_app, ScriptedModel};
use roof_estimator::client::transport::{EstimateTransport, HttpEstimateClient, TransportError};
use roof_estimator::client::uploader::{Phase, SelectedFile, UploadError, Uploader, PDF_MIME_TYPE};
use roof_estimator::application::dto::estimate_request::EstimateRequestDto;

/// 上传器经真实 HTTP 走完整个流程
#[tokio::test]
async fn test_uploader_round_trip_over_http() {
    let model = ScriptedModel::replying(&fenced(&sample_estimate()));
    let base_url = spawn_app(model.clone()).await;
    let transport = HttpEstimateClient::new(&format!("{}/", base_url));
    assert_eq!(transport.endpoint(), format!("{}/api/estimate", base_url));

    let mut uploader = Uploader::new();
    uploader
        .select_file(SelectedFile::new("report.pdf", PDF_MIME_TYPE, b"%PDF-1.4".to_vec()))
        .unwrap();
    uploader.submit(&transport).await.unwrap();

    assert_eq!(model.calls(), 1);
    let view = uploader.view();
    assert_eq!(view.phase, Phase::Results);
    let results = view.results.unwrap();
    assert_eq!(results.property_address, "123 Main St");
    assert_eq!(results.price("hdzSystemsPlus"), Some("$12,346"));
    assert_eq!(results.flags.as_deref(), Some("Multiple structures detected"));

    let text = results.render_text();
    assert!(text.contains("Flags: Multiple structures detected"));
    assert!(text.contains("$12,346"));
}

#[tokio::test]
async fn test_server_error_surfaces_as_generic_notice() {
    let model = ScriptedModel::failing(529, "overloaded");
    let base_url = spawn_app(model.clone()).await;
    let transport = HttpEstimateClient::new(&base_url);

    let mut uploader = Uploader::new();
    uploader
        .select_file(SelectedFile::new("report.pdf", PDF_MIME_TYPE, b"%PDF-1.4".to_vec()))
        .unwrap();
    let err = uploader.submit(&transport).await.unwrap_err();

    assert!(matches!(err, UploadError::Failed(TransportError::Status(500))));
    assert_eq!(
        uploader.notice(),
        Some("Error generating estimate. Please try again.")
    );
    assert_eq!(uploader.view().phase, Phase::Upload);
}

#[tokio::test]
async fn test_http_client_reports_bad_request() {
    let model = ScriptedModel::replying("{}");
    let base_url = spawn_app(model.clone()).await;
    let transport = HttpEstimateClient::new(&base_url);

    let err = transport
        .post_estimate(&EstimateRequestDto::default())
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Status(400)));
    assert_eq!(model.calls(), 0);
}
