//! File attachment transfer shapes.

use serde::{Deserialize, Serialize};

/// Attach a file to one file-type field of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadAttachmentRequest {
    pub schema_code: String,
    /// Code of the file field on the form.
    pub file_property_name: String,
    pub biz_object_id: String,
    pub file_bytes: Vec<u8>,
    /// Must include the extension; the platform infers the type from it.
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UploadAttachmentResponse {
    pub success: bool,
    pub attachment_id: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadBizObjectFileRequest {
    pub attachment_id: String,
}

impl DownloadBizObjectFileRequest {
    pub fn new(attachment_id: impl Into<String>) -> Self {
        Self {
            attachment_id: attachment_id.into(),
        }
    }
}

/// Raw file plus the metadata recovered from the response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadBizObjectFileResponse {
    pub file_bytes: Vec<u8>,
    /// Empty when the response carried no `Content-Disposition` filename.
    pub file_name: String,
    pub content_type: String,
}
