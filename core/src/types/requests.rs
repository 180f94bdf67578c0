//! Request and result shapes for the record actions.
//!
//! Requests are plain caller-side values; the facade copies the relevant
//! parts into the outbound envelope. Results mirror the `ReturnData` the
//! platform sends back and tolerate missing keys.

use serde::{Deserialize, Serialize};

use super::biz_object::BizObject;
use super::filter::Filter;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateBizObjectRequest {
    pub schema_code: String,
    pub biz_object: BizObject,
    /// Start the schema's workflow after saving.
    pub is_submit: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateBizObjectResponse {
    pub object_id: Option<String>,
    pub workflow_instance_id: Option<String>,
}

/// Batch create. Each array entry is one record encoded as a JSON string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBizObjectsRequest {
    pub schema_code: String,
    pub biz_object_array: Vec<String>,
    pub is_submit: bool,
}

impl CreateBizObjectsRequest {
    pub fn from_objects(
        schema_code: impl Into<String>,
        objects: &[BizObject],
        is_submit: bool,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            schema_code: schema_code.into(),
            biz_object_array: encode_objects(objects)?,
            is_submit,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateBizObjectsResponse {
    pub object_ids: Option<Vec<String>>,
    pub workflow_instance_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadBizObjectRequest {
    pub schema_code: String,
    pub biz_object_id: String,
}

impl LoadBizObjectRequest {
    pub fn new(schema_code: impl Into<String>, biz_object_id: impl Into<String>) -> Self {
        Self {
            schema_code: schema_code.into(),
            biz_object_id: biz_object_id.into(),
        }
    }
}

/// The loaded record is the whole `ReturnData` object.
pub type LoadBizObjectResponse = BizObject;

/// Batch load. The platform takes this action's filter as JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadBizObjectsRequest {
    pub schema_code: String,
    pub filter: String,
}

impl LoadBizObjectsRequest {
    pub fn from_filter(schema_code: impl Into<String>, filter: &Filter) -> serde_json::Result<Self> {
        Ok(Self {
            schema_code: schema_code.into(),
            filter: filter.to_json_string()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoadBizObjectsResponse {
    pub biz_object_array: Option<Vec<BizObject>>,
    pub total_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBizObjectRequest {
    pub schema_code: String,
    /// Must carry `system.object_id` of the record being updated.
    pub biz_object: BizObject,
    pub is_submit: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UpdateBizObjectResponse {
    pub object_id: Option<String>,
    pub workflow_instance_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBizObjectsRequest {
    pub schema_code: String,
    pub biz_object_array: Vec<String>,
    pub biz_object_ids: Vec<String>,
}

impl UpdateBizObjectsRequest {
    pub fn from_objects(
        schema_code: impl Into<String>,
        objects: &[BizObject],
        biz_object_ids: Vec<String>,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            schema_code: schema_code.into(),
            biz_object_array: encode_objects(objects)?,
            biz_object_ids,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UpdateBizObjectsResponse {
    pub object_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveBizObjectRequest {
    pub schema_code: String,
    pub biz_object_id: String,
}

impl RemoveBizObjectRequest {
    pub fn new(schema_code: impl Into<String>, biz_object_id: impl Into<String>) -> Self {
        Self {
            schema_code: schema_code.into(),
            biz_object_id: biz_object_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RemoveBizObjectResponse {
    pub object_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveBizObjectsRequest {
    pub schema_code: String,
    pub biz_object_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RemoveBizObjectsResponse {
    pub object_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListBizObjectsRequest {
    pub schema_code: String,
    pub filter: Option<Filter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListBizObjectsResponse {
    pub biz_objects: Option<Vec<BizObject>>,
    pub total_count: i64,
}

impl ListBizObjectsResponse {
    pub fn objects(&self) -> &[BizObject] {
        self.biz_objects.as_deref().unwrap_or_default()
    }
}

fn encode_objects(objects: &[BizObject]) -> serde_json::Result<Vec<String>> {
    objects.iter().map(serde_json::to_string).collect()
}
