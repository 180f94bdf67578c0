//! Async typed client for the H3Yun business-object and workflow open API.
//!
//! # Overview
//! Every non-file action is a JSON `POST` to one endpoint, discriminated by
//! `ActionName` and authenticated with the `EngineCode`/`EngineSecret`
//! headers. `H3YunClient` exposes one method per action plus
//! `invoke_custom_api` for actions without a typed wrapper, and two file
//! transfer methods for attachments.
//!
//! # Design
//! - The network sits behind the `HttpTransport` trait. `ReqwestTransport` is
//!   the production implementation; tests plug in their own.
//! - Requests and responses cross that seam as plain data (`HttpRequest`,
//!   `HttpResponse`), so the encoding, credential and error rules are all
//!   testable without sockets.
//! - Failures are classified into one `ApiError`; a response that decodes
//!   with `Successful: false` is data, not an error.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

mod action;
pub mod client;
pub mod config;
mod dispatcher;
mod envelope;
pub mod error;
pub mod http;
pub mod reqwest_transport;
pub mod types;

pub use action::{
    CREATE_BIZ_OBJECT, CREATE_BIZ_OBJECTS, GET_WORKFLOW_INFO, LIST_BIZ_OBJECTS, LOAD_BIZ_OBJECT,
    LOAD_BIZ_OBJECTS, REMOVE_BIZ_OBJECT, REMOVE_BIZ_OBJECTS, SUBMIT_WORKFLOW, UPDATE_BIZ_OBJECT,
    UPDATE_BIZ_OBJECTS,
};
pub use client::H3YunClient;
pub use config::H3YunConfig;
pub use dispatcher::{
    DOWNLOAD_PATH, ENGINE_CODE_HEADER, ENGINE_SECRET_HEADER, INVOKE_PATH, UPLOAD_FIELD, UPLOAD_PATH,
};
pub use envelope::ApiResponse;
pub use error::{ApiError, ErrorKind, Result};
pub use http::{HttpBody, HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use reqwest_transport::ReqwestTransport;
pub use tokio_util::sync::CancellationToken;
pub use types::*;
