//! HTTP handlers for the UI routes.

use super::page;
use super::state::{Outcome, ViewState};
use super::AppState;
use crate::image::UploadedImage;
use crate::pipeline::Stage;
use crate::Error;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use serde::Serialize;
use tracing::{error, info, warn};

const IMAGE_FIELD: &str = "image";

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::UnsupportedFormat(_) | Error::Image(_) | Error::NoImage => StatusCode::BAD_REQUEST,
        Error::Busy => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Re-render the current page with an error banner.
fn page_with_notice(state: &AppState, status: StatusCode, notice: &str) -> Response {
    let html = page::render(&state.session(), Some(notice));
    (status, Html(html)).into_response()
}

fn error_page(state: &AppState, err: &Error) -> Response {
    warn!("Rejected request: {}", err);
    page_with_notice(state, status_for(err), &err.to_string())
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render(&state.session(), None))
}

pub async fn health() -> &'static str {
    "ok"
}

/// Accept a multipart upload and make it the current image.
pub async fn upload_image(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut upload = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read multipart upload: {}", e);
                return page_with_notice(&state, e.status(), &e.body_text());
            }
        };
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        match field.bytes().await {
            Ok(bytes) => upload = Some((file_name, bytes.to_vec())),
            Err(e) => {
                warn!("Failed to read uploaded file: {}", e);
                return page_with_notice(&state, e.status(), &e.body_text());
            }
        }
        break;
    }

    let Some((file_name, bytes)) = upload.filter(|(_, bytes)| !bytes.is_empty()) else {
        return page_with_notice(
            &state,
            StatusCode::BAD_REQUEST,
            "Choose a PNG or JPEG image to upload",
        );
    };

    let decoded = tokio::task::spawn_blocking(move || UploadedImage::decode(file_name, bytes))
        .await
        .unwrap_or_else(|e| Err(Error::Invariant(format!("Image decode task join error: {}", e))));

    let image = match decoded {
        Ok(image) => image,
        Err(e) => return error_page(&state, &e),
    };

    let (width, height) = image.dimensions();
    info!(
        "Loaded {} ({}x{}, {})",
        image.file_name().unwrap_or("upload"),
        width,
        height,
        image.kind().mime()
    );

    let loaded = state.session().load_image(image);
    match loaded {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => error_page(&state, &e),
    }
}

/// Serve the original bytes of the current image for the preview.
pub async fn preview(State(state): State<AppState>) -> Response {
    let image = state.session().image().cloned();

    match image {
        Some(image) => (
            [(header::CONTENT_TYPE, image.kind().mime())],
            image.bytes().to_vec(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "No image uploaded").into_response(),
    }
}

/// Run the pipeline for the current image and record its outcome.
pub async fn generate(State(state): State<AppState>) -> Response {
    let begun = state.session().begin();
    let image = match begun {
        Ok(image) => image,
        Err(e) => return error_page(&state, &e),
    };

    // The task owns the Processing -> ImageLoaded transition, so it completes
    // even if this handler future is dropped.
    let task_state = state.clone();
    let run = tokio::spawn(async move {
        let result = task_state.pipeline().run(image).await;
        if let Err(e) = task_state.session().finish(Outcome::from(result)) {
            error!("Failed to record pipeline outcome: {}", e);
        }
    });

    if let Err(e) = run.await {
        error!("Pipeline task failed: {}", e);
        let mut session = state.session();
        if session.is_processing() {
            let outcome = Outcome::Failure {
                stage: Stage::Generate,
                message: Error::Invariant(format!("Pipeline task join error: {}", e)).to_string(),
            };
            if let Err(e) = session.finish(outcome) {
                error!("Failed to record pipeline outcome: {}", e);
            }
        }
    }

    Redirect::to("/").into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum StateName {
    Idle,
    ImageLoaded,
    Processing,
}

#[derive(Debug, Serialize)]
pub struct FailureBody {
    stage: Stage,
    message: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    state: StateName,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<FailureBody>,
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let session = state.session();
    let file_name = session
        .image()
        .and_then(|image| image.file_name().map(str::to_string));

    let response = match session.state() {
        ViewState::Idle => StatusResponse {
            state: StateName::Idle,
            file_name,
            description: None,
            error: None,
        },
        ViewState::Processing { .. } => StatusResponse {
            state: StateName::Processing,
            file_name,
            description: None,
            error: None,
        },
        ViewState::ImageLoaded { outcome, .. } => {
            let (description, error) = match outcome {
                Some(Outcome::Success(text)) => (Some(text.as_str().to_string()), None),
                Some(Outcome::Failure { stage, message }) => (
                    None,
                    Some(FailureBody {
                        stage: *stage,
                        message: message.clone(),
                    }),
                ),
                None => (None, None),
            };
            StatusResponse {
                state: StateName::ImageLoaded,
                file_name,
                description,
                error,
            }
        }
    };

    Json(response)
}
