//! Route handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use exo_ingest::{parse_f64, read_csv_bytes, single_row_frame, table_frame};
use exo_model::Feature;
use exo_predict::predict_frame;
use tracing::{debug, info, warn};

use crate::config::{AppContext, SESSION_COOKIE};
use crate::render::{StatusMessage, home_page, index_page};

pub const NO_FILE_PART: &str = "Error: No file part in the request.";
pub const NO_SELECTED_FILE: &str = "Error: No selected file.";

fn page(message: &StatusMessage) -> Html<String> {
    Html(index_page(Some(message)))
}

/// `GET /`
pub async fn index() -> Html<String> {
    Html(index_page(None))
}

/// `GET /home`
pub async fn home() -> Html<String> {
    Html(home_page())
}

/// `GET /login`: there is no sign-in, so send the visitor to the main page.
pub async fn login() -> Redirect {
    Redirect::to("/")
}

/// `POST /logout`: expire the session cookie.
pub async fn logout() -> Response {
    let expired = format!("{SESSION_COOKIE}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax");
    ([(header::SET_COOKIE, expired)], Redirect::to("/")).into_response()
}

/// `POST /single`: classify one candidate from the form fields.
///
/// Blank or non-numeric fields are treated as missing.
pub async fn single(form: Result<Form<HashMap<String, String>>, FormRejection>) -> Html<String> {
    let fields = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable single-candidate form");
            return page(&StatusMessage::error(format!(
                "Error: Could not read the form: {}",
                rejection.body_text()
            )));
        }
    };
    let values: Vec<(Feature, Option<f64>)> = Feature::ALL
        .into_iter()
        .map(|feature| {
            let value = fields
                .iter()
                .find(|(name, _)| Feature::from_column_name(name) == Some(feature))
                .and_then(|(_, raw)| parse_f64(raw));
            (feature, value)
        })
        .collect();
    debug!(?values, "single candidate received");

    let frame = match single_row_frame(&values) {
        Ok(frame) => frame,
        Err(error) => {
            warn!(%error, "failed to build single-row frame");
            return page(&StatusMessage::error(format!("Error: {error}")));
        }
    };
    let Some(prediction) = predict_frame(&frame).predictions.first().copied() else {
        return page(&StatusMessage::error("Error: No prediction was produced."));
    };
    info!(
        label = %prediction.label,
        confidence = prediction.confidence,
        "single candidate classified"
    );
    page(&StatusMessage::success(format!(
        "Single candidate processed. Predicted class: {} (confidence {:.2}).",
        prediction.label.display_name(),
        prediction.confidence
    )))
}

/// `POST /upload`: classify every row of an uploaded CSV.
pub async fn upload(
    State(ctx): State<Arc<AppContext>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Html<String> {
    let Ok(mut multipart) = multipart else {
        return page(&StatusMessage::error(NO_FILE_PART));
    };

    let (file_name, bytes) = loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return page(&StatusMessage::error(NO_FILE_PART)),
            Err(error) => {
                warn!(%error, "malformed multipart body");
                return page(&StatusMessage::error(format!(
                    "Error: Could not read the upload: {}",
                    error.body_text()
                )));
            }
        };
        if field.name() != Some("file") {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if file_name.is_empty() {
            return page(&StatusMessage::error(NO_SELECTED_FILE));
        }
        match field.bytes().await {
            Ok(bytes) => break (file_name, bytes),
            Err(error) => {
                warn!(%error, file = %file_name, "failed to read uploaded file");
                return page(&StatusMessage::error(format!(
                    "Error: Could not read \"{file_name}\": {}",
                    error.body_text()
                )));
            }
        }
    };
    debug!(
        file = %file_name,
        bytes = bytes.len(),
        limit = ctx.config.max_upload_bytes,
        "batch file received"
    );

    let name = file_name.clone();
    let outcome = tokio::task::spawn_blocking(move || -> exo_ingest::Result<(usize, usize)> {
        let table = read_csv_bytes(&name, &bytes)?;
        let frame = table_frame(&name, &table)?;
        let result = predict_frame(&frame);
        Ok((result.len(), result.planet_count()))
    })
    .await;

    match outcome {
        Ok(Ok((rows, planets))) => {
            info!(file = %file_name, rows, planets, "batch file classified");
            page(&StatusMessage::success(format!(
                "Batch file \"{file_name}\" uploaded and predictions are ready for download. \
                 {planets} of {rows} rows classified as Exoplanet Candidate."
            )))
        }
        Ok(Err(error)) => {
            warn!(%error, file = %file_name, "failed to parse uploaded file");
            page(&StatusMessage::error(format!("Error: {error}")))
        }
        Err(error) => {
            warn!(%error, file = %file_name, "prediction task failed");
            page(&StatusMessage::error(format!(
                "Error: Could not process \"{file_name}\"."
            )))
        }
    }
}

/// Unknown paths render the main page with an error banner.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        page(&StatusMessage::error("Error: Page not found.")),
    )
}
