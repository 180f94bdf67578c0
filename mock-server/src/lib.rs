//! In-memory emulator of the H3Yun open API.
//!
//! # Design
//! Serves the three platform endpoints over one shared `Store`:
//! `POST /OpenApi/Invoke` dispatches on `ActionName` and always answers with
//! the `{Successful, ErrorMessage, ReturnData}` envelope,
//! `POST /OpenApi/UploadAttachment` takes one multipart file and
//! `POST /Api/DownloadBizObjectFile` streams a stored file back. Every route
//! requires the `EngineCode`/`EngineSecret` headers and answers 401 without
//! them, like the real platform.
//!
//! Request bodies are handled as loose JSON so a client that drifts from the
//! platform's field names gets a business failure instead of a 422.

pub mod store;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

use store::{Attachment, Record, Store};

pub const DEFAULT_ENGINE_CODE: &str = "mock-engine";
pub const DEFAULT_ENGINE_SECRET: &str = "mock-secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub engine_code: String,
    pub engine_secret: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            engine_code: DEFAULT_ENGINE_CODE.to_string(),
            engine_secret: DEFAULT_ENGINE_SECRET.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<Store>>,
    credentials: Arc<Credentials>,
}

pub fn app() -> Router {
    app_with(Credentials::default())
}

pub fn app_with(credentials: Credentials) -> Router {
    let state = AppState {
        store: Arc::new(RwLock::new(Store::default())),
        credentials: Arc::new(credentials),
    };
    Router::new()
        .route("/OpenApi/Invoke", post(invoke))
        .route("/OpenApi/UploadAttachment", post(upload))
        .route("/Api/DownloadBizObjectFile", post(download))
        .layer(middleware::from_fn_with_state(state.clone(), require_credentials))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, credentials: Credentials) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(credentials)).await
}

async fn require_credentials(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        header("EngineCode") == state.credentials.engine_code
            && header("EngineSecret") == state.credentials.engine_secret
    };
    if !authorized {
        warn!(uri = %request.uri(), "rejected request with bad credentials");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(request).await
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({"Successful": true, "ErrorMessage": null, "ReturnData": data}))
}

fn fail(message: impl Into<String>) -> Json<Value> {
    Json(json!({"Successful": false, "ErrorMessage": message.into(), "ReturnData": null}))
}

fn text<'a>(envelope: &'a Value, key: &str) -> Option<&'a str> {
    envelope.get(key).and_then(Value::as_str)
}

fn object(value: &Value) -> Option<Record> {
    value.as_object().cloned()
}

/// `BizObjectArray` carries each record as a JSON string.
fn object_array(envelope: &Value) -> Result<Vec<Record>, String> {
    envelope
        .get("BizObjectArray")
        .and_then(Value::as_array)
        .ok_or("BizObjectArray is required")?
        .iter()
        .map(|item| {
            let raw = item.as_str().ok_or("BizObjectArray items must be strings")?;
            serde_json::from_str::<Record>(raw).map_err(|e| format!("invalid BizObject: {e}"))
        })
        .collect()
}

fn string_list(envelope: &Value, key: &str) -> Vec<String> {
    envelope
        .get(key)
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

async fn invoke(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let envelope: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => return fail(format!("invalid request body: {e}")),
    };
    let action = text(&envelope, "ActionName").unwrap_or_default();
    let schema = text(&envelope, "SchemaCode").unwrap_or_default();
    info!(action, schema, "invoke");

    match dispatch(&state, action, schema, &envelope).await {
        Ok(data) => ok(data),
        Err(message) => {
            warn!(action, %message, "action failed");
            fail(message)
        }
    }
}

async fn dispatch(state: &AppState, action: &str, schema: &str, envelope: &Value) -> Result<Value, String> {
    let submit = envelope.get("IsSubmit").and_then(Value::as_bool).unwrap_or(false);
    match action {
        "CreateBizObject" => {
            let record = envelope.get("BizObject").and_then(object).ok_or("BizObject is required")?;
            let (id, instance) = state.store.write().await.create(schema, record, submit);
            Ok(json!({"ObjectId": id, "WorkflowInstanceId": instance}))
        }
        "CreateBizObjects" => {
            let records = object_array(envelope)?;
            let mut store = state.store.write().await;
            let (ids, instances): (Vec<String>, Vec<Option<String>>) = records
                .into_iter()
                .map(|record| store.create(schema, record, submit))
                .unzip();
            let instances: Vec<String> = instances.into_iter().flatten().collect();
            Ok(json!({"ObjectIds": ids, "WorkflowInstanceIds": instances}))
        }
        "LoadBizObject" => {
            let id = text(envelope, "BizObjectId").unwrap_or_default();
            let store = state.store.read().await;
            let record = store.load(schema, id).ok_or_else(|| format!("BizObject not found: {id}"))?;
            Ok(Value::Object(record.clone()))
        }
        "LoadBizObjects" => {
            let filter = match text(envelope, "FilterString") {
                Some(raw) if !raw.trim().is_empty() => {
                    serde_json::from_str(raw).map_err(|e| format!("invalid FilterString: {e}"))?
                }
                _ => json!({}),
            };
            let (records, total) = state.store.read().await.query(schema, &filter);
            Ok(json!({"BizObjectArray": records, "TotalCount": total}))
        }
        "ListBizObjects" => {
            let filter = envelope.get("Filter").cloned().unwrap_or_else(|| json!({}));
            let (records, total) = state.store.read().await.query(schema, &filter);
            Ok(json!({"BizObjects": records, "TotalCount": total}))
        }
        "UpdateBizObject" => {
            let record = envelope.get("BizObject").and_then(object).ok_or("BizObject is required")?;
            let id = record
                .get("ObjectId")
                .and_then(Value::as_str)
                .ok_or("BizObject.ObjectId is required")?
                .to_string();
            if !state.store.write().await.update(schema, &id, record) {
                return Err(format!("BizObject not found: {id}"));
            }
            Ok(json!({"ObjectId": id}))
        }
        "UpdateBizObjects" => {
            let records = object_array(envelope)?;
            let ids = string_list(envelope, "BizObjectIds");
            if ids.len() != records.len() {
                return Err("BizObjectIds and BizObjectArray differ in length".to_string());
            }
            let mut store = state.store.write().await;
            let updated: Vec<String> = ids
                .into_iter()
                .zip(records)
                .filter(|(id, record)| store.update(schema, id, record.clone()))
                .map(|(id, _)| id)
                .collect();
            Ok(json!({"ObjectIds": updated}))
        }
        "RemoveBizObject" => {
            let id = text(envelope, "BizObjectId").unwrap_or_default();
            if !state.store.write().await.remove(schema, id) {
                return Err(format!("BizObject not found: {id}"));
            }
            Ok(json!({"ObjectId": id}))
        }
        "RemoveBizObjects" => {
            let mut store = state.store.write().await;
            let removed: Vec<String> = string_list(envelope, "BizObjectIds")
                .into_iter()
                .filter(|id| store.remove(schema, id))
                .collect();
            Ok(json!({"ObjectIds": removed}))
        }
        "GetWorkflowInfo" => {
            let id = text(envelope, "InstanceId").unwrap_or_default();
            let store = state.store.read().await;
            let instance = store.instance(id).ok_or_else(|| format!("workflow instance not found: {id}"))?;
            Ok(instance.to_json())
        }
        "SubmitWorkflow" => {
            let id = text(envelope, "InstanceId").unwrap_or_default();
            let approval = text(envelope, "ApprovalAction").unwrap_or_default();
            let mut store = state.store.write().await;
            let instance = store.submit(id, approval, text(envelope, "Comment"), text(envelope, "UserId"))?;
            Ok(json!({"InstanceId": instance.id, "BizObjectId": instance.biz_object_id}))
        }
        other => Err(format!("unknown action: {other}")),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadQuery {
    pub schema_code: String,
    pub file_property_name: String,
    pub biz_object_id: String,
}

/// Answers the bare `{Success, AttachmentId, ErrorMessage}` shape, not the
/// action envelope.
async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Response {
    let mut file = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("media") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        file = Some(Attachment {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        })
                    }
                    Err(e) => return upload_failure(format!("cannot read file: {e}")),
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => return upload_failure(format!("invalid multipart body: {e}")),
        }
    }
    let Some(file) = file else {
        return upload_failure("multipart field 'media' is required");
    };

    info!(schema = %query.schema_code, id = %query.biz_object_id, file = %file.file_name, "upload");
    let result = state.store.write().await.attach(
        &query.schema_code,
        &query.file_property_name,
        &query.biz_object_id,
        file,
    );
    match result {
        Ok(id) => Json(json!({"Success": true, "AttachmentId": id})).into_response(),
        Err(message) => upload_failure(message),
    }
}

fn upload_failure(message: impl Into<String>) -> Response {
    Json(json!({"Success": false, "ErrorMessage": message.into()})).into_response()
}

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    #[serde(rename = "attachmentId")]
    pub attachment_id: String,
    #[serde(rename = "EngineCode", default)]
    pub engine_code: String,
}

async fn download(State(state): State<AppState>, Form(form): Form<DownloadForm>) -> Response {
    info!(attachment = %form.attachment_id, "download");
    if form.engine_code != state.credentials.engine_code {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    let store = state.store.read().await;
    let Some(file) = store.attachment(&form.attachment_id) else {
        return (StatusCode::NOT_FOUND, "attachment not found").into_response();
    };
    let mut response_headers = HeaderMap::new();
    if let Ok(value) = file.content_type.parse() {
        response_headers.insert(header::CONTENT_TYPE, value);
    }
    if !file.file_name.is_empty() {
        if let Ok(value) = format!("attachment; filename=\"{}\"", file.file_name).parse() {
            response_headers.insert(header::CONTENT_DISPOSITION, value);
        }
    }
    (StatusCode::OK, response_headers, file.bytes.clone()).into_response()
}
