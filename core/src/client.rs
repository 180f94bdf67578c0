//! Typed, one-method-per-action client for the H3Yun open API.
//!
//! # Design
//! `H3YunClient` is a thin dispatch table. Every method wraps its request in
//! an `Action`, hands it to the `Dispatcher` and returns the decoded
//! `ApiResponse` unchanged. Nothing here validates, retries or reshapes
//! results; `successful == false` comes back as data.
//!
//! The client is cheap to clone and safe to share across tasks. Tests swap
//! the network out through `with_transport`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::action::Action;
use crate::config::H3YunConfig;
use crate::dispatcher::Dispatcher;
use crate::envelope::ApiResponse;
use crate::error::{ApiError, Result};
use crate::http::HttpTransport;
use crate::reqwest_transport::ReqwestTransport;
use crate::types::{
    CreateBizObjectRequest, CreateBizObjectResponse, CreateBizObjectsRequest,
    CreateBizObjectsResponse, DownloadBizObjectFileRequest, DownloadBizObjectFileResponse,
    GetWorkflowInfoRequest, GetWorkflowInfoResponse, ListBizObjectsRequest, ListBizObjectsResponse,
    LoadBizObjectRequest, LoadBizObjectResponse, LoadBizObjectsRequest, LoadBizObjectsResponse,
    RemoveBizObjectRequest, RemoveBizObjectResponse, RemoveBizObjectsRequest,
    RemoveBizObjectsResponse, SubmitWorkflowRequest, SubmitWorkflowResponse,
    UpdateBizObjectRequest, UpdateBizObjectResponse, UpdateBizObjectsRequest,
    UpdateBizObjectsResponse, UploadAttachmentRequest, UploadAttachmentResponse,
};

#[derive(Clone)]
pub struct H3YunClient {
    dispatcher: Dispatcher,
}

impl std::fmt::Debug for H3YunClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("H3YunClient")
            .field("config", self.dispatcher.config())
            .finish_non_exhaustive()
    }
}

impl H3YunClient {
    /// Client over a default `reqwest` transport.
    ///
    /// Fails with `InvalidConfiguration` before any request is sent when
    /// `config` does not validate.
    pub fn new(config: H3YunConfig) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(ReqwestTransport::new()?);
        Ok(Self {
            dispatcher: Dispatcher::from_validated(config, transport),
        })
    }

    pub fn with_transport(config: H3YunConfig, transport: impl HttpTransport + 'static) -> Result<Self> {
        Self::with_shared_transport(config, Arc::new(transport))
    }

    pub fn with_shared_transport(
        config: H3YunConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(config, transport)?,
        })
    }

    /// `H3YunConfig::from_env` followed by `new`.
    pub fn from_env() -> Result<Self> {
        Self::new(H3YunConfig::from_env()?)
    }

    pub fn config(&self) -> &H3YunConfig {
        self.dispatcher.config()
    }

    #[instrument(skip_all, fields(schema = %request.schema_code))]
    pub async fn create_biz_object(
        &self,
        request: &CreateBizObjectRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<CreateBizObjectResponse>> {
        self.dispatcher.send(Action::CreateBizObject(request), cancel).await
    }

    #[instrument(skip_all, fields(schema = %request.schema_code, count = request.biz_object_array.len()))]
    pub async fn create_biz_objects(
        &self,
        request: &CreateBizObjectsRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<CreateBizObjectsResponse>> {
        self.dispatcher.send(Action::CreateBizObjects(request), cancel).await
    }

    #[instrument(skip_all, fields(schema = %request.schema_code, id = %request.biz_object_id))]
    pub async fn load_biz_object(
        &self,
        request: &LoadBizObjectRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<LoadBizObjectResponse>> {
        self.dispatcher.send(Action::LoadBizObject(request), cancel).await
    }

    #[instrument(skip_all, fields(schema = %request.schema_code))]
    pub async fn load_biz_objects(
        &self,
        request: &LoadBizObjectsRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<LoadBizObjectsResponse>> {
        self.dispatcher.send(Action::LoadBizObjects(request), cancel).await
    }

    #[instrument(skip_all, fields(schema = %request.schema_code, id = ?request.biz_object.object_id()))]
    pub async fn update_biz_object(
        &self,
        request: &UpdateBizObjectRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<UpdateBizObjectResponse>> {
        self.dispatcher.send(Action::UpdateBizObject(request), cancel).await
    }

    #[instrument(skip_all, fields(schema = %request.schema_code, count = request.biz_object_ids.len()))]
    pub async fn update_biz_objects(
        &self,
        request: &UpdateBizObjectsRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<UpdateBizObjectsResponse>> {
        self.dispatcher.send(Action::UpdateBizObjects(request), cancel).await
    }

    #[instrument(skip_all, fields(schema = %request.schema_code, id = %request.biz_object_id))]
    pub async fn remove_biz_object(
        &self,
        request: &RemoveBizObjectRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<RemoveBizObjectResponse>> {
        self.dispatcher.send(Action::RemoveBizObject(request), cancel).await
    }

    #[instrument(skip_all, fields(schema = %request.schema_code, count = request.biz_object_ids.len()))]
    pub async fn remove_biz_objects(
        &self,
        request: &RemoveBizObjectsRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<RemoveBizObjectsResponse>> {
        self.dispatcher.send(Action::RemoveBizObjects(request), cancel).await
    }

    #[instrument(skip_all, fields(schema = %request.schema_code))]
    pub async fn list_biz_objects(
        &self,
        request: &ListBizObjectsRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<ListBizObjectsResponse>> {
        self.dispatcher.send(Action::ListBizObjects(request), cancel).await
    }

    #[instrument(skip_all, fields(instance = %request.instance_id))]
    pub async fn get_workflow_info(
        &self,
        request: &GetWorkflowInfoRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<GetWorkflowInfoResponse>> {
        self.dispatcher.send(Action::GetWorkflowInfo(request), cancel).await
    }

    #[instrument(skip_all, fields(instance = %request.instance_id, approval = %request.approval_action))]
    pub async fn submit_workflow(
        &self,
        request: &SubmitWorkflowRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<SubmitWorkflowResponse>> {
        self.dispatcher.send(Action::SubmitWorkflow(request), cancel).await
    }

    /// Upload one file into a file field of an existing record.
    ///
    /// The wrapper is always `successful`; the platform's own verdict is in
    /// `UploadAttachmentResponse::success`.
    #[instrument(skip_all, fields(schema = %request.schema_code, id = %request.biz_object_id))]
    pub async fn upload_attachment(
        &self,
        request: &UploadAttachmentRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<UploadAttachmentResponse>> {
        let url = self.dispatcher.upload_url(
            &request.schema_code,
            &request.file_property_name,
            &request.biz_object_id,
        )?;
        let result = self
            .dispatcher
            .send_multipart(
                url,
                request.file_bytes.clone(),
                &request.file_name,
                &request.content_type,
                cancel,
            )
            .await?;
        Ok(ApiResponse::success(result))
    }

    #[instrument(skip_all, fields(attachment = %request.attachment_id))]
    pub async fn download_biz_object_file(
        &self,
        request: &DownloadBizObjectFileRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<DownloadBizObjectFileResponse>> {
        let file = self
            .dispatcher
            .send_download(self.dispatcher.download_url(), &request.attachment_id, cancel)
            .await?;
        Ok(ApiResponse::success(file))
    }

    /// Send any action by name. `payload` goes out as `CustomData`; a payload
    /// that serializes to `null` (e.g. `()` or `None`) sends no `CustomData`.
    #[instrument(skip_all, fields(action = action_name))]
    pub async fn invoke_custom_api<Req, Resp>(
        &self,
        action_name: &str,
        payload: &Req,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Resp>>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload).map_err(|e| ApiError::Unknown(e.to_string()))?;
        let payload = (!payload.is_null()).then_some(&payload);
        let action = Action::Custom {
            name: action_name,
            payload,
        };
        self.dispatcher.send(action, cancel).await
    }

    /// `invoke_custom_api` with untyped JSON on both sides.
    pub async fn invoke_json(
        &self,
        action_name: &str,
        payload: &Value,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Value>> {
        self.invoke_custom_api(action_name, payload, cancel).await
    }
}
