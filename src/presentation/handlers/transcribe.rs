use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Serialize;
use tracing::Instrument;

use crate::application::services::{TranscriptionServiceError, VideoUpload};
use crate::domain::{SanitizedFilename, WordTiming};
use crate::presentation::state::AppState;

pub const VIDEO_FIELD: &str = "video";

#[derive(Serialize)]
pub struct TranscriptionResponse {
    pub transcription: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<WordTimingResponse>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordTimingResponse {
    pub word: String,
    pub offset_in_ticks: u64,
    pub duration_in_ticks: u64,
}

impl From<&WordTiming> for WordTimingResponse {
    fn from(timing: &WordTiming) -> Self {
        Self {
            word: timing.word.clone(),
            offset_in_ticks: timing.offset_ticks,
            duration_in_ticks: timing.duration_ticks,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let upload = match read_video_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    tracing::info!(
        filename = %upload.filename,
        bytes = upload.data.len(),
        "Video received"
    );

    // Dropping this handler (client disconnect) cancels the spawned pipeline,
    // which still runs its cleanup.
    let cancel = state.shutdown.child_token();
    let _cancel_on_disconnect = cancel.clone().drop_guard();
    let service = Arc::clone(&state.transcription_service);
    let pipeline = tokio::spawn(
        async move { service.transcribe(upload, &cancel).await }.in_current_span(),
    );

    let result = match pipeline.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Transcription task aborted");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Transcription task aborted",
            );
        }
    };

    match result {
        Ok(outcome) => {
            let completed = outcome.is_completed();
            let words = outcome
                .words()
                .map(|words| words.iter().map(WordTimingResponse::from).collect());
            let transcription = outcome.into_text();
            tracing::info!(
                completed,
                chars = transcription.len(),
                "Transcription request finished"
            );
            (
                StatusCode::OK,
                Json(TranscriptionResponse {
                    transcription,
                    words,
                }),
            )
                .into_response()
        }
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!(error = %e, status = %status, "Transcription request failed");
            } else {
                tracing::warn!(error = %e, status = %status, "Transcription request rejected");
            }
            error_response(status, e.to_string())
        }
    }
}

/// Reads the `video` file part, answering with a ready 4xx response when the
/// request does not carry a usable one.
async fn read_video_upload(multipart: &mut Multipart) -> Result<VideoUpload, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                tracing::warn!("Transcribe request with no video part");
                return Err(error_response(StatusCode::BAD_REQUEST, "No video file part"));
            }
            Err(e) => return Err(multipart_error(e)),
        };

        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        // A part without a filename parameter is a plain form value, not a file.
        let Some(raw_filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let Some(filename) = SanitizedFilename::new(&raw_filename) else {
            tracing::warn!("Transcribe request with empty filename");
            return Err(error_response(StatusCode::BAD_REQUEST, "No selected file"));
        };

        let data: Bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(VideoUpload { filename, data });
    }
}

fn multipart_error(e: MultipartError) -> Response {
    tracing::error!(error = %e, "Failed to read multipart");
    error_response(e.status(), format!("Failed to read multipart: {}", e.body_text()))
}

fn status_for(error: &TranscriptionServiceError) -> StatusCode {
    match error {
        TranscriptionServiceError::Conversion(_) | TranscriptionServiceError::Scratch(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        TranscriptionServiceError::BlobStore(_) | TranscriptionServiceError::Speech(_) => {
            StatusCode::BAD_GATEWAY
        }
        TranscriptionServiceError::TimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
        TranscriptionServiceError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    }
}
