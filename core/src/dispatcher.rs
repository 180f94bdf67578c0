//! Credentialed, time-bounded exchanges with the platform.
//!
//! # Design
//! `Dispatcher` owns the validated configuration and the transport. It turns
//! an `Action` (or a file transfer) into an `HttpRequest`, attaches the
//! tenant credential headers, runs the exchange under the configured timeout
//! and the caller's cancellation token, and classifies the outcome in this
//! order:
//!
//! 1. timeout or cancellation
//! 2. transport failure
//! 3. non-2xx status
//! 4. malformed JSON
//! 5. empty or `null` payload
//! 6. anything else
//!
//! It keeps no per-call state, so one instance serves concurrent calls.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::action::Action;
use crate::config::H3YunConfig;
use crate::envelope::{self, ApiResponse};
use crate::error::{ApiError, Result};
use crate::http::{HttpBody, HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::types::DownloadBizObjectFileResponse;

pub const INVOKE_PATH: &str = "/OpenApi/Invoke";
pub const UPLOAD_PATH: &str = "/OpenApi/UploadAttachment";
pub const DOWNLOAD_PATH: &str = "/Api/DownloadBizObjectFile";

pub const ENGINE_CODE_HEADER: &str = "EngineCode";
pub const ENGINE_SECRET_HEADER: &str = "EngineSecret";
/// Multipart field that carries the uploaded file.
pub const UPLOAD_FIELD: &str = "media";
pub const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Clone)]
pub(crate) struct Dispatcher {
    config: Arc<H3YunConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl Dispatcher {
    /// Validates `config`; an invalid configuration never yields a dispatcher.
    pub fn new(config: H3YunConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config, transport))
    }

    /// For callers that already ran `validate` on `config`.
    pub fn from_validated(config: H3YunConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &H3YunConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.trimmed_base_url())
    }

    fn request(&self, url: String, body: HttpBody) -> HttpRequest {
        HttpRequest {
            url,
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                (ENGINE_CODE_HEADER.to_string(), self.config.engine_code.clone()),
                (ENGINE_SECRET_HEADER.to_string(), self.config.engine_secret.clone()),
            ],
            body,
        }
    }

    /// Send one JSON action and decode the platform envelope.
    pub async fn send<T: DeserializeOwned>(
        &self,
        action: Action<'_>,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>> {
        let body = envelope::encode(&action.envelope())?;
        info!(action = action.name(), "invoking platform action");
        let request = self.request(self.url(INVOKE_PATH), HttpBody::Json(body));
        let response = self.exchange(request, cancel).await?;
        envelope::decode(&response.body).inspect_err(|err| {
            error!(action = action.name(), error = %err, body = %response.text(), "cannot decode response");
        })
    }

    pub fn upload_url(
        &self,
        schema_code: &str,
        file_property_name: &str,
        biz_object_id: &str,
    ) -> Result<String> {
        let url = url::Url::parse_with_params(
            &self.url(UPLOAD_PATH),
            &[
                ("SchemaCode", schema_code),
                ("FilePropertyName", file_property_name),
                ("BizObjectId", biz_object_id),
            ],
        )
        .map_err(|e| ApiError::Unknown(e.to_string()))?;
        Ok(url.into())
    }

    /// Upload one file as multipart and decode the JSON the endpoint answers with.
    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        url: String,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
        cancel: &CancellationToken,
    ) -> Result<T> {
        info!(url = %url, file_name, size = bytes.len(), "uploading attachment");
        let body = HttpBody::Multipart {
            field: UPLOAD_FIELD.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        };
        let response = self.exchange(self.request(url, body), cancel).await?;
        envelope::decode_value(&response.body).inspect_err(|err| {
            error!(error = %err, body = %response.text(), "cannot decode upload response");
        })
    }

    pub fn download_url(&self) -> String {
        self.url(DOWNLOAD_PATH)
    }

    /// Download one attachment; file name and type come from the headers.
    pub async fn send_download(
        &self,
        url: String,
        attachment_id: &str,
        cancel: &CancellationToken,
    ) -> Result<DownloadBizObjectFileResponse> {
        info!(url = %url, attachment_id, "downloading attachment");
        let body = HttpBody::Form(vec![
            ("attachmentId".to_string(), attachment_id.to_string()),
            (ENGINE_CODE_HEADER.to_string(), self.config.engine_code.clone()),
        ]);
        let response = self.exchange(self.request(url, body), cancel).await?;

        let content_type = response
            .header("content-type")
            .map(media_type)
            .filter(|t| !t.is_empty())
            .unwrap_or(OCTET_STREAM)
            .to_string();
        let file_name = response
            .header("content-disposition")
            .and_then(disposition_file_name)
            .unwrap_or_default();

        Ok(DownloadBizObjectFileResponse {
            file_bytes: response.body,
            file_name,
            content_type,
        })
    }

    /// Run the exchange and apply the transport and status rules.
    async fn exchange(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse> {
        debug!(
            url = %request.url,
            headers = ?redacted(&request.headers),
            body = %describe(&request.body),
            "sending request"
        );

        let timeout = self.config.timeout();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(url = %request.url, "request cancelled");
                return Err(ApiError::Timeout);
            }
            outcome = tokio::time::timeout(timeout, self.transport.execute(request.clone(), timeout)) => outcome,
        };

        let response = match outcome {
            Err(_) | Ok(Err(TransportError::Timeout)) => {
                error!(url = %request.url, timeout_secs = timeout.as_secs(), "request timed out");
                return Err(ApiError::Timeout);
            }
            Ok(Err(TransportError::Request(detail))) => {
                error!(url = %request.url, error = %detail, "HTTP request exception");
                return Err(ApiError::Transport(detail));
            }
            Ok(Err(TransportError::Other(detail))) => {
                error!(url = %request.url, error = %detail, "unknown exception");
                return Err(ApiError::Unknown(detail));
            }
            Ok(Ok(response)) => response,
        };

        debug!(status = response.status, body = %preview(&response), "received response");

        if !response.is_success() {
            let body = response.text();
            error!(status = response.status, body = %body, "HTTP request failed");
            return Err(ApiError::HttpFailure {
                status: response.status,
                body,
            });
        }
        Ok(response)
    }
}

/// `text/plain; charset=utf-8` -> `text/plain`.
fn media_type(header: &str) -> &str {
    header.split(';').next().unwrap_or_default().trim()
}

/// `filename` parameter of a `Content-Disposition` value, quotes trimmed.
fn disposition_file_name(header: &str) -> Option<String> {
    header.split(';').find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

fn redacted(headers: &[(String, String)]) -> Vec<(&str, &str)> {
    headers
        .iter()
        .map(|(k, v)| {
            if k.eq_ignore_ascii_case(ENGINE_SECRET_HEADER) {
                (k.as_str(), "<redacted>")
            } else {
                (k.as_str(), v.as_str())
            }
        })
        .collect()
}

fn describe(body: &HttpBody) -> String {
    match body {
        HttpBody::Json(json) => json.clone(),
        HttpBody::Form(pairs) => format!("form with {} field(s)", pairs.len()),
        HttpBody::Multipart {
            file_name, bytes, ..
        } => format!("multipart file {file_name:?} ({} bytes)", bytes.len()),
    }
}

fn preview(response: &HttpResponse) -> String {
    let is_json = response
        .header("content-type")
        .map(|t| media_type(t).ends_with("json") || media_type(t).starts_with("text/"))
        .unwrap_or(true);
    if is_json {
        response.text()
    } else {
        format!("<{} bytes>", response.body.len())
    }
}
