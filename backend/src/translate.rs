//! Natural-language to SQL translation through a local Ollama server.

use async_trait::async_trait;
use ollama_rs::generation::chat::{request::ChatMessageRequest, ChatMessage, MessageRole};
use ollama_rs::models::ModelOptions;
use ollama_rs::Ollama;

/// Harmless diagnostic query substituted when the model output fails
/// validation. It runs cleanly and produces one self-describing row.
pub const INVALID_SQL_FALLBACK: &str = "SELECT 'Error: Could not generate a valid SQL query.';";

/// Token budget for the generated query.
const MAX_SQL_TOKENS: i32 = 150;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("language model request failed: {0}")]
    Provider(String),
}

/// Seam between the chat handler and the language model, so request handling
/// can be exercised without a model server.
#[async_trait]
pub trait QueryTranslator: Send + Sync {
    /// Produce a single SQLite SELECT answering `query` over the described
    /// schema. Implementations return validated SQL: a bare SELECT ending
    /// with a semicolon, or [`INVALID_SQL_FALLBACK`].
    async fn to_sql(&self, query: &str, db_schema: &str, context: &str)
        -> Result<String, TranslateError>;
}

/// Ollama-backed translator.
#[derive(Debug, Clone)]
pub struct OllamaTranslator {
    client: Ollama,
    model: String,
}

impl OllamaTranslator {
    pub fn new(host: impl Into<String>, port: u16, model: String) -> Self {
        let host = host.into();
        Self {
            client: Ollama::new(&host, port),
            model,
        }
    }

    /// Configuration from `OLLAMA_HOST` / `OLLAMA_PORT`, defaulting to the
    /// standard local install.
    pub fn from_env(model: String) -> Self {
        let host =
            std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost".to_string());
        let port = std::env::var("OLLAMA_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(11434);
        Self::new(host, port, model)
    }

    /// True when the Ollama server answers at all.
    pub async fn health_check(&self) -> bool {
        match self.client.list_local_models().await {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!("Ollama health check failed: {error}");
                false
            }
        }
    }
}

#[async_trait]
impl QueryTranslator for OllamaTranslator {
    async fn to_sql(
        &self,
        query: &str,
        db_schema: &str,
        context: &str,
    ) -> Result<String, TranslateError> {
        let messages = vec![
            ChatMessage::new(MessageRole::System, system_prompt(db_schema, context)),
            ChatMessage::new(MessageRole::User, query.to_string()),
        ];
        // Deterministic output; SQL generation has one right answer.
        let options = ModelOptions::default()
            .temperature(0.0)
            .num_predict(MAX_SQL_TOKENS);
        let request = ChatMessageRequest::new(self.model.clone(), messages).options(options);

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|error| TranslateError::Provider(error.to_string()))?;

        Ok(validate_sql(&response.message.content))
    }
}

fn system_prompt(db_schema: &str, context: &str) -> String {
    format!(
        "You are an expert SQLite assistant. Your task is to convert a user's question \
         into a precise SQLite query based on the provided schema and context. \
         You must only output a single SQLite query ending with a semicolon. \
         Do not add any explanation or markdown formatting like ```sql.\n\n\
         Database Schema:\n{db_schema}\n\nContext:\n{context}\n"
    )
}

/// Accept only a single bare SELECT ending with a semicolon; anything else,
/// mutations, prose, and statement sequences included, is replaced with
/// [`INVALID_SQL_FALLBACK`].
pub fn validate_sql(sql: &str) -> String {
    let trimmed = sql.trim();
    let single_statement = trimmed.find(';') == Some(trimmed.len() - 1);
    if trimmed.to_lowercase().starts_with("select") && single_statement {
        trimmed.to_string()
    } else {
        INVALID_SQL_FALLBACK.to_string()
    }
}
