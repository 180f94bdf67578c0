//! Platform actions and the envelope each one produces.

use serde_json::Value;

use crate::envelope::Envelope;
use crate::types::{
    CreateBizObjectRequest, CreateBizObjectsRequest, GetWorkflowInfoRequest,
    ListBizObjectsRequest, LoadBizObjectRequest, LoadBizObjectsRequest, RemoveBizObjectRequest,
    RemoveBizObjectsRequest, SubmitWorkflowRequest, UpdateBizObjectRequest,
    UpdateBizObjectsRequest,
};

pub const CREATE_BIZ_OBJECT: &str = "CreateBizObject";
pub const CREATE_BIZ_OBJECTS: &str = "CreateBizObjects";
pub const LOAD_BIZ_OBJECT: &str = "LoadBizObject";
pub const LOAD_BIZ_OBJECTS: &str = "LoadBizObjects";
pub const UPDATE_BIZ_OBJECT: &str = "UpdateBizObject";
pub const UPDATE_BIZ_OBJECTS: &str = "UpdateBizObjects";
pub const REMOVE_BIZ_OBJECT: &str = "RemoveBizObject";
pub const REMOVE_BIZ_OBJECTS: &str = "RemoveBizObjects";
pub const LIST_BIZ_OBJECTS: &str = "ListBizObjects";
pub const GET_WORKFLOW_INFO: &str = "GetWorkflowInfo";
pub const SUBMIT_WORKFLOW: &str = "SubmitWorkflow";

/// One JSON action with the request it was built from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Action<'a> {
    CreateBizObject(&'a CreateBizObjectRequest),
    CreateBizObjects(&'a CreateBizObjectsRequest),
    LoadBizObject(&'a LoadBizObjectRequest),
    LoadBizObjects(&'a LoadBizObjectsRequest),
    UpdateBizObject(&'a UpdateBizObjectRequest),
    UpdateBizObjects(&'a UpdateBizObjectsRequest),
    RemoveBizObject(&'a RemoveBizObjectRequest),
    RemoveBizObjects(&'a RemoveBizObjectsRequest),
    ListBizObjects(&'a ListBizObjectsRequest),
    GetWorkflowInfo(&'a GetWorkflowInfoRequest),
    SubmitWorkflow(&'a SubmitWorkflowRequest),
    /// Any action without a typed wrapper. A `None` payload sends no
    /// `CustomData` key at all.
    Custom {
        name: &'a str,
        payload: Option<&'a Value>,
    },
}

impl<'a> Action<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Action::CreateBizObject(_) => CREATE_BIZ_OBJECT,
            Action::CreateBizObjects(_) => CREATE_BIZ_OBJECTS,
            Action::LoadBizObject(_) => LOAD_BIZ_OBJECT,
            Action::LoadBizObjects(_) => LOAD_BIZ_OBJECTS,
            Action::UpdateBizObject(_) => UPDATE_BIZ_OBJECT,
            Action::UpdateBizObjects(_) => UPDATE_BIZ_OBJECTS,
            Action::RemoveBizObject(_) => REMOVE_BIZ_OBJECT,
            Action::RemoveBizObjects(_) => REMOVE_BIZ_OBJECTS,
            Action::ListBizObjects(_) => LIST_BIZ_OBJECTS,
            Action::GetWorkflowInfo(_) => GET_WORKFLOW_INFO,
            Action::SubmitWorkflow(_) => SUBMIT_WORKFLOW,
            Action::Custom { name, .. } => *name,
        }
    }

    pub fn envelope(&self) -> Envelope<'a> {
        let base = Envelope {
            action_name: self.name(),
            ..Envelope::default()
        };
        match *self {
            Action::CreateBizObject(r) => Envelope {
                schema_code: Some(r.schema_code.as_str()),
                biz_object: Some(&r.biz_object),
                is_submit: Some(r.is_submit),
                ..base
            },
            Action::CreateBizObjects(r) => Envelope {
                schema_code: Some(r.schema_code.as_str()),
                biz_object_array: Some(r.biz_object_array.as_slice()),
                is_submit: Some(r.is_submit),
                ..base
            },
            Action::LoadBizObject(r) => Envelope {
                schema_code: Some(r.schema_code.as_str()),
                biz_object_id: Some(r.biz_object_id.as_str()),
                ..base
            },
            Action::LoadBizObjects(r) => Envelope {
                schema_code: Some(r.schema_code.as_str()),
                filter_string: Some(r.filter.as_str()),
                ..base
            },
            Action::UpdateBizObject(r) => Envelope {
                schema_code: Some(r.schema_code.as_str()),
                biz_object: Some(&r.biz_object),
                is_submit: Some(r.is_submit),
                ..base
            },
            Action::UpdateBizObjects(r) => Envelope {
                schema_code: Some(r.schema_code.as_str()),
                biz_object_array: Some(r.biz_object_array.as_slice()),
                biz_object_ids: Some(r.biz_object_ids.as_slice()),
                ..base
            },
            Action::RemoveBizObject(r) => Envelope {
                schema_code: Some(r.schema_code.as_str()),
                biz_object_id: Some(r.biz_object_id.as_str()),
                ..base
            },
            Action::RemoveBizObjects(r) => Envelope {
                schema_code: Some(r.schema_code.as_str()),
                biz_object_ids: Some(r.biz_object_ids.as_slice()),
                ..base
            },
            Action::ListBizObjects(r) => Envelope {
                schema_code: Some(r.schema_code.as_str()),
                filter: r.filter.as_ref(),
                ..base
            },
            Action::GetWorkflowInfo(r) => Envelope {
                instance_id: Some(r.instance_id.as_str()),
                ..base
            },
            Action::SubmitWorkflow(r) => Envelope {
                instance_id: Some(r.instance_id.as_str()),
                approval_action: Some(r.approval_action.as_str()),
                comment: r.comment.as_deref(),
                user_id: r.user_id.as_deref(),
                ..base
            },
            Action::Custom { payload, .. } => Envelope {
                custom_data: payload,
                ..base
            },
        }
    }
}
