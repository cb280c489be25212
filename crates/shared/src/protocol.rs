use serde::{Deserialize, Serialize};

pub const UPLOAD_ROUTE: &str = "upload";
pub const ASK_ROUTE: &str = "ask";

/// Multipart field carrying an uploaded file.
pub const DOCUMENT_FIELD: &str = "document";
/// Multipart field carrying a URL to ingest.
pub const URL_FIELD: &str = "url";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub source_context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}
