use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use vidscribe::domain::WordTiming;
use vidscribe::presentation::{AppState, create_router};

use crate::mocks::{MockAudioExtractor, MockBlobStore, MockSpeechClient, TestPipeline};

const BOUNDARY: &str = "vidscribe-test-boundary";

fn router(pipeline: &TestPipeline) -> Router {
    create_router(AppState::new(pipeline.service.clone()))
}

struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    data: &'a [u8],
}

fn file_part<'a>(name: &'a str, filename: &'a str, data: &'a [u8]) -> Part<'a> {
    Part {
        name,
        filename: Some(filename),
        data,
    }
}

fn text_part<'a>(name: &'a str, data: &'a [u8]) -> Part<'a> {
    Part {
        name,
        filename: None,
        data,
    }
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: video/mp4\r\n\r\n",
                part.name, filename
            ),
            None => format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                part.name
            ),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn transcribe_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/transcribe")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn given_health_request_when_routing_then_body_is_only_healthy_status() {
    let pipeline = TestPipeline::happy(&[]);

    let response = router(&pipeline)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn given_video_upload_when_transcribing_then_returns_transcript() {
    let pipeline = TestPipeline::happy(&["Hello", "world"]);
    let body = multipart_body(&[file_part("video", "talk.mp4", b"fake video")]);

    let response = router(&pipeline)
        .oneshot(transcribe_request(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["transcription"], "Hello world");
    assert!(pipeline.scratch_files().is_empty());
    assert_eq!(pipeline.blob_store.deletes(), 1);
}

#[tokio::test]
async fn given_other_fields_before_video_when_transcribing_then_video_part_is_found() {
    let pipeline = TestPipeline::happy(&["Hello"]);
    let body = multipart_body(&[
        text_part("title", b"Lecture 1"),
        text_part("video", b"not a file"),
        file_part("video", "talk.mp4", b"fake video"),
    ]);

    let response = router(&pipeline)
        .oneshot(transcribe_request(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["transcription"], "Hello");
}

#[tokio::test]
async fn given_failed_job_when_transcribing_then_failure_text_is_returned_with_ok() {
    let pipeline = TestPipeline::new(
        MockAudioExtractor::succeeding(),
        MockBlobStore::default(),
        MockSpeechClient::failing_job("bad audio"),
    );
    let body = multipart_body(&[file_part("video", "talk.mp4", b"fake video")]);

    let response = router(&pipeline)
        .oneshot(transcribe_request(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["transcription"],
        "Transcription Failed: bad audio"
    );
}

#[tokio::test]
async fn given_no_video_part_when_transcribing_then_returns_bad_request() {
    let pipeline = TestPipeline::happy(&[]);
    let body = multipart_body(&[file_part("file", "talk.mp4", b"fake video")]);

    let response = router(&pipeline)
        .oneshot(transcribe_request(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No video file part");
    assert_eq!(pipeline.extractor.calls(), 0);
}

#[tokio::test]
async fn given_empty_filename_when_transcribing_then_returns_bad_request() {
    let pipeline = TestPipeline::happy(&[]);
    let body = multipart_body(&[file_part("video", "", b"")]);

    let response = router(&pipeline)
        .oneshot(transcribe_request(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No selected file");
    assert_eq!(pipeline.extractor.calls(), 0);
}

#[tokio::test]
async fn given_conversion_failure_when_transcribing_then_returns_server_error() {
    let pipeline = TestPipeline::new(
        MockAudioExtractor::failing("moov atom not found"),
        MockBlobStore::default(),
        MockSpeechClient::succeeding(&[]),
    );
    let body = multipart_body(&[file_part("video", "broken.mp4", b"garbage")]);

    let response = router(&pipeline)
        .oneshot(transcribe_request(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = json_body(response).await["error"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(error.starts_with("FFmpeg failed:"));
    assert!(error.contains("moov atom not found"));
    assert_eq!(pipeline.blob_store.uploads(), 0);
    assert_eq!(pipeline.speech_client.submits(), 0);
}

#[tokio::test]
async fn given_rejected_status_requests_when_transcribing_then_returns_bad_gateway() {
    let pipeline = TestPipeline::new(
        MockAudioExtractor::succeeding(),
        MockBlobStore::default(),
        MockSpeechClient::failing_status_requests(),
    );
    let body = multipart_body(&[file_part("video", "talk.mp4", b"fake video")]);

    let response = router(&pipeline)
        .oneshot(transcribe_request(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(pipeline.blob_store.deletes(), 1);
}

#[tokio::test]
async fn given_request_id_header_when_routing_then_it_is_echoed() {
    let pipeline = TestPipeline::happy(&[]);

    let response = router(&pipeline)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn given_no_request_id_when_routing_then_one_is_assigned() {
    let pipeline = TestPipeline::happy(&[]);

    let response = router(&pipeline)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(!response.headers()["x-request-id"].is_empty());
}

#[tokio::test]
async fn given_upload_over_limit_when_transcribing_then_returns_payload_too_large() {
    let pipeline = TestPipeline::happy(&[]);
    let app = create_router(AppState::new(pipeline.service.clone()).with_max_upload_bytes(1024));
    let body = multipart_body(&[file_part("video", "talk.mp4", &[0u8; 4096])]);

    let response = app.oneshot(transcribe_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(pipeline.speech_client.submits(), 0);
}

#[tokio::test]
async fn given_transcript_with_word_timings_when_transcribing_then_words_accompany_text() {
    let pipeline = TestPipeline::new(
        MockAudioExtractor::succeeding(),
        MockBlobStore::default(),
        MockSpeechClient::succeeding(&["Hello world."]).with_words(vec![
            WordTiming::new("hello", 5_000_000, 3_000_000),
            WordTiming::new("world", 8_000_000, 4_000_000),
        ]),
    );
    let body = multipart_body(&[file_part("video", "talk.mp4", b"fake video")]);

    let response = router(&pipeline)
        .oneshot(transcribe_request(body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "transcription": "Hello world.",
            "words": [
                { "word": "hello", "offsetInTicks": 5000000, "durationInTicks": 3000000 },
                { "word": "world", "offsetInTicks": 8000000, "durationInTicks": 4000000 }
            ]
        })
    );
}

#[tokio::test]
async fn given_transcript_without_word_timings_when_transcribing_then_words_field_is_absent() {
    let pipeline = TestPipeline::happy(&["Hello"]);
    let body = multipart_body(&[file_part("video", "talk.mp4", b"fake video")]);

    let response = router(&pipeline)
        .oneshot(transcribe_request(body))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body, json!({ "transcription": "Hello" }));
}
