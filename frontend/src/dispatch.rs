//! Message dispatch: one user query out, one assistant reply back.
//!
//! The backend answers with either JSON (informational or tabular replies)
//! or a complete HTML document (map views), distinguished by content type.
//! Formatting of the reply body lives in plain functions so it can be tested
//! without a browser.

use gloo_net::http::Request;
use shared::{ChatReply, ErrorBody, CHATBOT_RESPONSE_PATH};
use web_sys::FormData;

use crate::utils;

/// Fallback text when a JSON reply carries no message field.
pub const NO_DATA_MESSAGE: &str = "No data found for this query.";

/// Fallback description when an error response carries no detail field.
pub const REQUEST_FAILED: &str = "Failed to get AI response";

/// A successfully dispatched reply, ready to append to the transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Markdown text for the assistant bubble.
    Text(String),
    /// A complete HTML document to render verbatim.
    Html(String),
}

/// POST the query to the chatbot endpoint and classify the response.
///
/// Errors carry a human-readable description: the server's `detail` field
/// when present, otherwise a generic failure description.
pub async fn request_reply(query: &str) -> Result<DispatchOutcome, String> {
    let form = FormData::new().map_err(|_| "could not build form data".to_string())?;
    form.append_with_str("query", query)
        .map_err(|_| "could not build form data".to_string())?;

    let response = Request::post(&utils::api_url(CHATBOT_RESPONSE_PATH))
        .body(form)
        .map_err(|error| error.to_string())?
        .send()
        .await
        .map_err(|error| error.to_string())?;

    if !response.ok() {
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| REQUEST_FAILED.to_string());
        return Err(detail);
    }

    let content_type = response.headers().get("content-type");
    if is_html_content_type(content_type.as_deref()) {
        let document = response.text().await.map_err(|error| error.to_string())?;
        Ok(DispatchOutcome::Html(document))
    } else {
        let reply = response
            .json::<ChatReply>()
            .await
            .map_err(|error| error.to_string())?;
        Ok(DispatchOutcome::Text(reply_text(&reply)))
    }
}

/// Assemble the assistant bubble text for a JSON reply: the server message
/// (or the no-data fallback), plus a fenced preview block when rows came back.
pub fn reply_text(reply: &ChatReply) -> String {
    let message = reply.message.as_deref().unwrap_or(NO_DATA_MESSAGE);
    match &reply.preview {
        Some(preview) => {
            let pretty =
                serde_json::to_string_pretty(preview).unwrap_or_else(|_| preview.to_string());
            format!("{message}\n\n**Data Preview:**\n```json\n{pretty}\n```")
        }
        None => message.to_string(),
    }
}

/// Apology appended to the transcript when a dispatch fails.
pub fn apology(description: &str) -> String {
    format!(
        "I apologize, but an error occurred. Please ensure the backend is running \
         and data has been uploaded.\n\n**Error:** {description}"
    )
}

fn is_html_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| value.contains("text/html"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_text_uses_the_server_message_when_present() {
        let reply = ChatReply {
            message: Some("Query processed successfully. Found 3 records.".to_string()),
            ..ChatReply::default()
        };
        assert_eq!(
            reply_text(&reply),
            "Query processed successfully. Found 3 records."
        );
    }

    #[test]
    fn reply_text_falls_back_when_message_is_absent() {
        assert_eq!(reply_text(&ChatReply::default()), NO_DATA_MESSAGE);
    }

    #[test]
    fn reply_text_appends_a_pretty_printed_preview_block() {
        let reply = ChatReply {
            message: Some("Query processed successfully. Found 3 records.".to_string()),
            sql_used: Some("SELECT * FROM argo_data;".to_string()),
            preview: Some(json!([{"temperature": 12.5}])),
        };
        let text = reply_text(&reply);
        assert!(text.starts_with("Query processed successfully. Found 3 records."));
        assert!(text.contains("\n\n**Data Preview:**\n```json\n"));
        // Two-space indentation from the pretty printer.
        assert!(text.contains("  {\n    \"temperature\": 12.5\n  }"));
        assert!(text.ends_with("\n```"));
    }

    #[test]
    fn apology_embeds_the_failure_description() {
        let text = apology("No file uploaded");
        assert!(text.starts_with("I apologize, but an error occurred."));
        assert!(text.ends_with("**Error:** No file uploaded"));
    }

    #[test]
    fn html_detection_matches_on_content_type() {
        assert!(is_html_content_type(Some("text/html; charset=utf-8")));
        assert!(!is_html_content_type(Some("application/json")));
        assert!(!is_html_content_type(None));
    }
}
