use crate::core::engine::FixEngine;
use crate::core::{FileSet, FixOptions, FixRequest, LanguageModel};
use crate::utils::error::{FixerError, Result};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

pub const ALLOWED_HEADERS: &str = "Content-Type,Baggage,Sentry-Trace";
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

const ATTACHMENT: &str = "attachment; filename=\"fixed_repo.zip\"";

fn multipart_error(err: MultipartError) -> FixerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        FixerError::UploadTooLarge {
            message: err.body_text(),
        }
    } else {
        FixerError::request(err.body_text())
    }
}

/// Collects the form into a [`FixRequest`].
///
/// Only parts named `files` that carry a filename count as uploads; the
/// filename is the project-relative path. `optLint` and `optComments` are on
/// only when their value is exactly `"1"`. For repeated text fields the first
/// occurrence wins.
async fn read_fix_request(mut multipart: Multipart) -> Result<FixRequest> {
    let mut files = FileSet::new();
    let mut saw_files = false;
    let mut instructions: Option<String> = None;
    let mut fix_lint: Option<bool> = None;
    let mut add_comments: Option<bool> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        match (name.as_str(), file_name) {
            ("files", Some(path)) => {
                saw_files = true;
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if path.is_empty() {
                    tracing::debug!("Ignoring upload with an empty filename");
                    continue;
                }
                let content = String::from_utf8(bytes.to_vec()).map_err(|_| {
                    FixerError::request(format!("File '{}' is not valid UTF-8 text", path))
                })?;
                files.insert(path, content);
            }
            ("instructions", None) => {
                let text = field.text().await.map_err(multipart_error)?;
                instructions.get_or_insert(text);
            }
            ("optLint", None) => {
                let value = field.text().await.map_err(multipart_error)?;
                fix_lint.get_or_insert(value == "1");
            }
            ("optComments", None) => {
                let value = field.text().await.map_err(multipart_error)?;
                add_comments.get_or_insert(value == "1");
            }
            _ => tracing::debug!("Ignoring form part {:?}", name),
        }
    }

    if !saw_files {
        return Err(FixerError::request("No files part"));
    }

    Ok(FixRequest {
        files,
        instructions: instructions.unwrap_or_default(),
        options: FixOptions {
            fix_lint: fix_lint.unwrap_or(false),
            add_comments: add_comments.unwrap_or(false),
        },
    })
}

pub async fn fix_code<M: LanguageModel + 'static>(
    State(engine): State<Arc<FixEngine<M>>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    // A body that is not multipart has no file parts at all.
    let multipart = multipart.map_err(|_| FixerError::request("No files part"))?;

    let request = read_fix_request(multipart).await?;
    tracing::info!(
        "Fix request: {} files, lint={}, comments={}",
        request.files.len(),
        request.options.fix_lint,
        request.options.add_comments
    );

    let outcome = engine.run(request).await?;
    tracing::info!(
        "Fix response: {} of {} files changed",
        outcome.files_changed,
        outcome.files_total
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip"),
            (header::CONTENT_DISPOSITION, ATTACHMENT),
        ],
        outcome.archive,
    )
        .into_response())
}

pub async fn preflight() -> impl IntoResponse {
    (
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
        ],
        Json(serde_json::json!({ "success": true })),
    )
}
