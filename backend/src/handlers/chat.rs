//! Conversational query endpoint.
//!
//! Multipart form in (`query` field), and either a JSON [`ChatReply`] or a
//! complete HTML map document out. The decision flow lives in
//! [`answer_query`] so it can be tested against a stub translator.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{info, warn};

use shared::ChatReply;

use crate::error::ApiError;
use crate::mapview;
use crate::AppState;

/// Rows included in the JSON preview block.
const PREVIEW_ROWS: usize = 5;

/// Metadata snippets retrieved into the prompt per query.
const RETRIEVAL_DEPTH: usize = 2;

/// Reply before any data has been uploaded.
const NOT_LOADED_MESSAGE: &str = "Please upload ARGO data first via the /upload-data endpoint.";

/// Reply when the generated query matched nothing.
const NO_RESULTS_MESSAGE: &str = "No data found for this query. Please try a broader request.";

/// What the endpoint decided to send back.
#[derive(Debug)]
pub enum ChatOutcome {
    Reply(ChatReply),
    MapDocument(String),
}

pub async fn chatbot_response(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let query = read_query_field(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::BadRequest("No query provided".to_string()))?;
    info!("Received query: {query}");

    match answer_query(&state, &query).await? {
        ChatOutcome::Reply(reply) => Ok(Json(reply).into_response()),
        ChatOutcome::MapDocument(document) => Ok(Html(document).into_response()),
    }
}

/// The full query flow: guard on uploaded data, retrieve context, translate
/// to SQL, execute, then shape the result as a map or a tabular reply.
pub async fn answer_query(state: &AppState, query: &str) -> Result<ChatOutcome, ApiError> {
    if !state.data_loaded.load(Ordering::SeqCst) {
        return Ok(ChatOutcome::Reply(message_reply(NOT_LOADED_MESSAGE)));
    }

    let context = state.catalog.retrieve_context(query, RETRIEVAL_DEPTH);
    let db_schema = state.catalog.first_text().unwrap_or_default();

    let sql = state
        .translator
        .to_sql(query, db_schema, &context)
        .await
        .map_err(|error| ApiError::Translation(error.to_string()))?;
    info!("Generated SQL: {sql}");

    // Generated SQL is allowed to be wrong; a failed query reads as an
    // empty result rather than a server error.
    let rows = match state.store.run_select(&sql).await {
        Ok(rows) => rows,
        Err(error) => {
            warn!("SQL execution error: {error}");
            Vec::new()
        }
    };

    if rows.is_empty() {
        return Ok(ChatOutcome::Reply(message_reply(NO_RESULTS_MESSAGE)));
    }

    if mapview::wants_map(query) {
        return Ok(ChatOutcome::MapDocument(mapview::map_html(&rows)));
    }

    let preview: Vec<Value> = rows
        .iter()
        .take(PREVIEW_ROWS)
        .cloned()
        .map(Value::Object)
        .collect();
    Ok(ChatOutcome::Reply(ChatReply {
        message: Some(format!(
            "Query processed successfully. Found {} records.",
            rows.len()
        )),
        sql_used: Some(sql),
        preview: Some(Value::Array(preview)),
    }))
}

fn message_reply(message: &str) -> ChatReply {
    ChatReply {
        message: Some(message.to_string()),
        ..ChatReply::default()
    }
}

/// Pull the `query` text field out of the multipart body.
async fn read_query_field(multipart: &mut Multipart) -> Result<Option<String>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed form data".to_string()))?
    {
        if field.name() == Some("query") {
            let value = field
                .text()
                .await
                .map_err(|_| ApiError::BadRequest("Malformed form data".to_string()))?;
            return Ok(Some(value));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    use async_trait::async_trait;

    use crate::ingest::ProfileRecord;
    use crate::retrieval::MetadataCatalog;
    use crate::store::ProfileStore;
    use crate::translate::{QueryTranslator, TranslateError};

    struct FixedTranslator(&'static str);

    #[async_trait]
    impl QueryTranslator for FixedTranslator {
        async fn to_sql(&self, _: &str, _: &str, _: &str) -> Result<String, TranslateError> {
            Ok(self.0.to_string())
        }
    }

    struct OfflineTranslator;

    #[async_trait]
    impl QueryTranslator for OfflineTranslator {
        async fn to_sql(&self, _: &str, _: &str, _: &str) -> Result<String, TranslateError> {
            Err(TranslateError::Provider("connection refused".to_string()))
        }
    }

    fn record(depth: f64) -> ProfileRecord {
        ProfileRecord {
            latitude: -12.5,
            longitude: 45.0,
            time: "2023-01-15 10:30:00".to_string(),
            depth,
            temperature: 20.0,
            salinity: Some(35.0),
            chla: None,
        }
    }

    async fn state_with(
        translator: Arc<dyn QueryTranslator>,
        records: &[ProfileRecord],
    ) -> AppState {
        let store = ProfileStore::open(":memory:").await.unwrap();
        if !records.is_empty() {
            store.replace_profiles(records).await.unwrap();
        }
        let mut catalog = MetadataCatalog::new();
        catalog.add_metadata("Table argo_data: latitude, longitude, time, depth", "DB_SCHEMA");
        AppState {
            store,
            translator,
            catalog,
            data_loaded: AtomicBool::new(!records.is_empty()),
        }
    }

    fn reply(outcome: ChatOutcome) -> ChatReply {
        match outcome {
            ChatOutcome::Reply(reply) => reply,
            ChatOutcome::MapDocument(_) => panic!("expected a JSON reply"),
        }
    }

    #[tokio::test]
    async fn asks_for_data_before_anything_is_uploaded() {
        let state = state_with(Arc::new(FixedTranslator("SELECT 1;")), &[]).await;
        let reply = reply(answer_query(&state, "average temperature").await.unwrap());
        assert_eq!(reply.message.as_deref(), Some(NOT_LOADED_MESSAGE));
        assert!(reply.sql_used.is_none());
    }

    #[tokio::test]
    async fn tabular_reply_carries_count_sql_and_preview() {
        let records: Vec<ProfileRecord> = (0..8).map(|i| record(i as f64 * 10.0)).collect();
        let state = state_with(
            Arc::new(FixedTranslator("SELECT * FROM argo_data ORDER BY depth;")),
            &records,
        )
        .await;

        let reply = reply(answer_query(&state, "list the profiles").await.unwrap());
        assert_eq!(
            reply.message.as_deref(),
            Some("Query processed successfully. Found 8 records.")
        );
        assert_eq!(
            reply.sql_used.as_deref(),
            Some("SELECT * FROM argo_data ORDER BY depth;")
        );
        // Preview is capped even when more rows matched.
        let preview = reply.preview.unwrap();
        assert_eq!(preview.as_array().unwrap().len(), PREVIEW_ROWS);
    }

    #[tokio::test]
    async fn empty_result_reads_as_no_data_found() {
        let state = state_with(
            Arc::new(FixedTranslator(
                "SELECT * FROM argo_data WHERE depth > 9000;",
            )),
            &[record(5.0)],
        )
        .await;

        let reply = reply(answer_query(&state, "deepest profiles").await.unwrap());
        assert_eq!(reply.message.as_deref(), Some(NO_RESULTS_MESSAGE));
    }

    #[tokio::test]
    async fn broken_generated_sql_degrades_to_no_data_found() {
        let state = state_with(
            Arc::new(FixedTranslator("SELECT no_such_column FROM argo_data;")),
            &[record(5.0)],
        )
        .await;

        let reply = reply(answer_query(&state, "anything").await.unwrap());
        assert_eq!(reply.message.as_deref(), Some(NO_RESULTS_MESSAGE));
    }

    #[tokio::test]
    async fn map_queries_come_back_as_html() {
        let state = state_with(
            Arc::new(FixedTranslator("SELECT * FROM argo_data;")),
            &[record(5.0)],
        )
        .await;

        match answer_query(&state, "show me a map of float locations")
            .await
            .unwrap()
        {
            ChatOutcome::MapDocument(document) => {
                assert!(document.starts_with("<!DOCTYPE html>"));
                assert!(document.contains("L.marker"));
            }
            ChatOutcome::Reply(_) => panic!("expected an HTML document"),
        }
    }

    #[tokio::test]
    async fn unreachable_model_surfaces_a_translation_error() {
        let state = state_with(Arc::new(OfflineTranslator), &[record(5.0)]).await;
        let error = answer_query(&state, "anything").await.unwrap_err();
        assert!(matches!(error, ApiError::Translation(_)));
    }
}
