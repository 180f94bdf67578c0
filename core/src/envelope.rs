//! Outbound request envelope and inbound `ApiResponse` wrapper.
//!
//! # Design
//! Every JSON action goes through one endpoint, discriminated by
//! `ActionName`. The outbound `Envelope` is the union of all action
//! parameters; it borrows from the caller's request and is only ever built
//! by `Action::envelope`, so the facade cannot populate a field an action
//! does not take. Unset fields are left out of the JSON entirely because the
//! platform treats a missing key differently from an explicit `null`.
//!
//! `encode` and `decode` are pure. `decode` distinguishes malformed JSON from
//! a body that parses to nothing (empty or `null`); both are errors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::types::{BizObject, Filter};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Envelope<'a> {
    pub action_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biz_object_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biz_object: Option<&'a BizObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biz_object_array: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biz_object_ids: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_submit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_string: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_action: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<&'a Value>,
}

/// Platform response wrapper shared by every action.
///
/// `successful == false` is a business-level outcome, not an error: check
/// it before trusting `return_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub successful: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful wrapper around locally produced data (file transfers).
    pub fn success(return_data: T) -> Self {
        Self {
            successful: true,
            error_message: None,
            return_data: Some(return_data),
        }
    }

    pub fn is_success(&self) -> bool {
        self.successful
    }

    /// `return_data` when the platform reported success, `None` otherwise.
    pub fn into_data(self) -> Option<T> {
        if self.successful {
            self.return_data
        } else {
            None
        }
    }
}

pub(crate) fn encode(envelope: &Envelope<'_>) -> Result<String> {
    serde_json::to_string(envelope).map_err(|e| ApiError::Unknown(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<ApiResponse<T>> {
    decode_value(body)
}

/// Decode any JSON body with the same empty/`null`/malformed rules as
/// `decode`. Used for endpoints that answer without the envelope.
pub(crate) fn decode_value<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::empty_payload(String::from_utf8_lossy(body)));
    }
    let parsed: Option<T> =
        serde_json::from_slice(body).map_err(|e| ApiError::malformed_json(&e))?;
    parsed.ok_or_else(|| ApiError::empty_payload(String::from_utf8_lossy(body)))
}
