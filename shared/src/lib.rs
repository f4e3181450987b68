use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Endpoint paths (shared between backend routing and frontend requests)
// ============================================================================

/// Conversational query endpoint. Accepts a multipart form with a `query`
/// field and answers with either a [`ChatReply`] JSON body or a complete
/// HTML document (map views).
pub const CHATBOT_RESPONSE_PATH: &str = "/chatbot-response";

/// Data ingestion endpoint. Accepts a multipart form with a `file` field.
pub const UPLOAD_DATA_PATH: &str = "/upload-data";

// ============================================================================
// Wire types
// ============================================================================

/// JSON reply from the chatbot endpoint.
///
/// All fields are optional on the wire: informational replies (no data yet,
/// empty result) carry only `message`, while successful query replies also
/// carry the SQL that ran and a preview of the result rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_used: Option<String>,
    /// First few result rows as JSON objects keyed by column name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Value>,
}

/// Error body carried by non-success responses: `{"detail": ...}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

/// Reply from the upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadReply {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_reply_absent_fields_deserialize_to_none() {
        let parsed: ChatReply = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert_eq!(parsed.message.as_deref(), Some("ok"));
        assert!(parsed.sql_used.is_none());
        assert!(parsed.preview.is_none());

        let parsed: ChatReply = serde_json::from_str("{}").unwrap();
        assert!(parsed.message.is_none());
    }

    #[test]
    fn chat_reply_skips_absent_fields_on_serialize() {
        let reply = ChatReply {
            message: Some("No data found for this query.".to_string()),
            ..ChatReply::default()
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(json, r#"{"message":"No data found for this query."}"#);
    }

    #[test]
    fn error_body_tolerates_null_detail() {
        let parsed: ErrorBody = serde_json::from_str(r#"{"detail": null}"#).unwrap();
        assert!(parsed.detail.is_none());

        let parsed: ErrorBody = serde_json::from_str(r#"{"detail": "No file uploaded"}"#).unwrap();
        assert_eq!(parsed.detail.as_deref(), Some("No file uploaded"));
    }
}
