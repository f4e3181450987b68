//! Data ingestion endpoint.
//!
//! Accepts one data file per request and replaces the profile store with its
//! contents. A failed upload clears the loaded flag: the store may be gone
//! mid-replace, and claiming otherwise would let queries run against it.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

use shared::UploadReply;

use crate::error::ApiError;
use crate::ingest;
use crate::AppState;

/// Maximum upload file size: 50 MB
pub const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

pub async fn upload_data(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadReply>, ApiError> {
    // Extract file from multipart
    let mut filename = String::new();
    let mut file_data: Vec<u8> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed form data".to_string()))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().unwrap_or("uploaded_file").to_string();
            file_data = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("Malformed form data".to_string()))?
                .to_vec();
            break;
        }
    }

    if filename.is_empty() || file_data.is_empty() {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    }
    if file_data.len() > MAX_UPLOAD_SIZE {
        return Err(ApiError::TooLarge(MAX_UPLOAD_SIZE));
    }

    let safe_filename = sanitize_filename(&filename);

    match ingest_and_store(&state, &file_data).await {
        Ok(count) => {
            state.data_loaded.store(true, Ordering::SeqCst);
            info!("Stored {count} profile rows from '{safe_filename}'");
            Ok(Json(UploadReply {
                message: format!("Data from '{safe_filename}' processed and stored successfully."),
            }))
        }
        Err(description) => {
            state.data_loaded.store(false, Ordering::SeqCst);
            Err(ApiError::Processing(description))
        }
    }
}

async fn ingest_and_store(state: &AppState, data: &[u8]) -> Result<usize, String> {
    let records = ingest::parse_records(data).map_err(|error| error.to_string())?;
    state
        .store
        .replace_profiles(&records)
        .await
        .map_err(|error| error.to_string())?;
    Ok(records.len())
}

fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit('/')
        .next()
        .or_else(|| name.rsplit('\\').next())
        .unwrap_or(name);

    let clean: String = base
        .chars()
        .filter(|c| *c != '/' && *c != '\\' && *c != '\0')
        .collect();

    if clean.is_empty() || clean == "." || clean == ".." {
        "uploaded_file".to_string()
    } else {
        clean
    }
}
