//! Typed payloads for the platform actions.
//!
//! # Design
//! These types are defined independently of the mock server's own structs;
//! the integration tests catch any drift between the two.

pub mod attachment;
pub mod biz_object;
pub mod filter;
pub mod requests;
pub mod workflow;

pub use attachment::{
    DownloadBizObjectFileRequest, DownloadBizObjectFileResponse, UploadAttachmentRequest,
    UploadAttachmentResponse,
};
pub use biz_object::{BizObject, DepartmentRef, SystemFields, UserRef};
pub use filter::{CompareType, Filter, ItemMatcher, MatchType, Matcher, SortBy, SortDirection};
pub use requests::{
    CreateBizObjectRequest, CreateBizObjectResponse, CreateBizObjectsRequest,
    CreateBizObjectsResponse, ListBizObjectsRequest, ListBizObjectsResponse, LoadBizObjectRequest,
    LoadBizObjectResponse, LoadBizObjectsRequest, LoadBizObjectsResponse, RemoveBizObjectRequest,
    RemoveBizObjectResponse, RemoveBizObjectsRequest, RemoveBizObjectsResponse,
    UpdateBizObjectRequest, UpdateBizObjectResponse, UpdateBizObjectsRequest,
    UpdateBizObjectsResponse,
};
pub use workflow::{
    ActivityInfo, ApprovalLog, GetWorkflowInfoRequest, GetWorkflowInfoResponse, Participant,
    SubmitWorkflowRequest, SubmitWorkflowResponse,
};
