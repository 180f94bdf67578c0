//! Workflow query and approval shapes.
//!
//! Result types are produced by decoding only; every field is optional
//! because the platform omits whatever does not apply to the instance.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetWorkflowInfoRequest {
    pub instance_id: String,
}

impl GetWorkflowInfoRequest {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetWorkflowInfoResponse {
    pub instance_id: Option<String>,
    pub workflow_code: Option<String>,
    pub workflow_name: Option<String>,
    pub schema_code: Option<String>,
    pub biz_object_id: Option<String>,
    pub originator: Option<String>,
    pub originator_name: Option<String>,
    pub start_time: Option<String>,
    pub finish_time: Option<String>,
    pub state: i32,
    pub activities: Option<Vec<ActivityInfo>>,
    pub approval_logs: Option<Vec<ApprovalLog>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ActivityInfo {
    pub activity_id: Option<String>,
    pub activity_code: Option<String>,
    pub activity_name: Option<String>,
    pub activity_type: Option<String>,
    pub participants: Option<Vec<Participant>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Participant {
    pub participant_id: Option<String>,
    pub participant_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ApprovalLog {
    pub activity_id: Option<String>,
    pub activity_code: Option<String>,
    pub activity_name: Option<String>,
    #[serde(rename = "ApproverID")]
    pub approver_id: Option<String>,
    pub approver_name: Option<String>,
    pub approval_time: Option<String>,
    pub approval_result: Option<String>,
    pub approval_comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitWorkflowRequest {
    pub instance_id: String,
    pub approval_action: String,
    pub comment: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SubmitWorkflowResponse {
    pub instance_id: Option<String>,
    pub biz_object_id: Option<String>,
}
