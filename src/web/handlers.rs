use crate::{
    predict::{PredictPipeline, Prediction},
    utils::{error::PredictError, spool::SpooledUpload},
    web::AppState,
    Result,
};
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    response::Json,
};
use serde_json::json;
use std::time::Instant;

/// Root route: static welcome message, no side effects.
pub async fn index_handler() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to the Plant Prediction API! Use /predict to classify images."
    }))
}

/// Classifies a multipart image upload and returns the top-1 species.
pub async fn predict_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Prediction>> {
    let start_time = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    let mut upload: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        PredictError::InvalidInput(format!("Failed to read multipart field: {}", e))
    })? {
        match field.name() {
            Some("file") => {
                // An empty filename is what browsers send when the form is
                // submitted with no file selected.
                let filename = field.file_name().unwrap_or("").to_string();
                if filename.is_empty() {
                    return Err(PredictError::InvalidInput("No selected file".to_string()));
                }

                if let Some(content_type) = field.content_type() {
                    if !content_type.starts_with("image/") {
                        return Err(PredictError::UnsupportedFormat(content_type.to_string()));
                    }
                }

                let data = field.bytes().await.map_err(|e| {
                    PredictError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;

                tracing::debug!(
                    "Received file '{}': {} bytes, request_id={}",
                    filename,
                    data.len(),
                    request_id
                );
                upload = Some(data);
            }
            other => {
                tracing::debug!("Ignoring unknown field: {:?}", other);
            }
        }
    }

    let data =
        upload.ok_or_else(|| PredictError::InvalidInput("No file provided".to_string()))?;

    // Spool to disk for the duration of this request only; the guard
    // removes the file on every exit path below.
    let spooled = SpooledUpload::write(&state.config.spool_dir, &data).await?;
    let prediction = PredictPipeline::process_path(state.model.as_ref(), spooled.path()).await?;

    tracing::info!(
        "Prediction completed: request_id={}, plant='{}', confidence={:.4}, time={:.3}s",
        request_id,
        prediction.plant,
        prediction.confidence,
        start_time.elapsed().as_secs_f32()
    );

    Ok(Json(prediction))
}
