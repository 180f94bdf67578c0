//! Full record, workflow and attachment lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through `ReqwestTransport`. Validates that the
//! envelopes the client sends and the payloads it decodes agree with an
//! independent implementation of the platform.

use h3yun_core::{
    ApiResponse, BizObject, CancellationToken, CreateBizObjectRequest, CreateBizObjectsRequest,
    DownloadBizObjectFileRequest, ErrorKind, Filter, GetWorkflowInfoRequest, H3YunClient,
    H3YunConfig, ItemMatcher, ListBizObjectsRequest, LoadBizObjectRequest, LoadBizObjectsRequest,
    Matcher, RemoveBizObjectRequest, RemoveBizObjectsRequest, SortBy, SubmitWorkflowRequest,
    UpdateBizObjectRequest, UpdateBizObjectsRequest, UploadAttachmentRequest,
};
use mock_server::Credentials;
use serde_json::Value;

const SCHEMA: &str = "D000001Orders";

/// `RUST_LOG=h3yun_core=debug` shows the exchanges.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn start_server() -> String {
    init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let credentials = Credentials {
        engine_code: "it-engine".to_string(),
        engine_secret: "it-secret".to_string(),
    };
    tokio::spawn(mock_server::run_with(listener, credentials));
    format!("http://{addr}")
}

fn client(base_url: &str) -> H3YunClient {
    let config = H3YunConfig::new("it-engine", "it-secret")
        .with_base_url(base_url)
        .with_timeout_seconds(10);
    H3YunClient::new(config).unwrap()
}

fn data<T>(response: ApiResponse<T>) -> T {
    assert!(response.successful, "platform said: {:?}", response.error_message);
    response.return_data.unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn record_lifecycle() {
    let base_url = start_server().await;
    let client = client(&base_url);
    let cancel = CancellationToken::new();

    // create
    let create = CreateBizObjectRequest {
        schema_code: SCHEMA.to_string(),
        biz_object: BizObject::new()
            .with("Name", "first order")
            .with("F0000001", "pending")
            .with("F0000002", 120),
        is_submit: false,
    };
    let created = data(client.create_biz_object(&create, &cancel).await.unwrap());
    let id = created.object_id.unwrap();
    assert!(created.workflow_instance_id.is_none());

    // load
    let loaded = data(
        client
            .load_biz_object(&LoadBizObjectRequest::new(SCHEMA, &id), &cancel)
            .await
            .unwrap(),
    );
    assert_eq!(loaded.object_id(), Some(id.as_str()));
    assert_eq!(loaded.system.name.as_deref(), Some("first order"));
    assert_eq!(loaded.system.status, Some(0));
    assert_eq!(loaded.get("F0000001"), Some(&Value::from("pending")));
    assert_eq!(loaded.get_as::<i64>("F0000002"), Some(120));

    // update
    let update = UpdateBizObjectRequest {
        schema_code: SCHEMA.to_string(),
        biz_object: BizObject::with_id(&id).with("F0000001", "shipped"),
        is_submit: false,
    };
    let updated = data(client.update_biz_object(&update, &cancel).await.unwrap());
    assert_eq!(updated.object_id.as_deref(), Some(id.as_str()));

    // batch create
    let batch = CreateBizObjectsRequest::from_objects(
        SCHEMA,
        &[
            BizObject::new().with("Name", "second order").with("F0000002", 80),
            BizObject::new().with("Name", "third order").with("F0000002", 200),
        ],
        false,
    )
    .unwrap();
    let batch_ids = data(client.create_biz_objects(&batch, &cancel).await.unwrap())
        .object_ids
        .unwrap();
    assert_eq!(batch_ids.len(), 2);

    // list, sorted by amount descending
    let list = ListBizObjectsRequest {
        schema_code: SCHEMA.to_string(),
        filter: Some(Filter::rows(0, 10).sort_by(SortBy::descending("F0000002"))),
    };
    let listed = data(client.list_biz_objects(&list, &cancel).await.unwrap());
    assert_eq!(listed.total_count, 3);
    let names: Vec<&str> = listed
        .objects()
        .iter()
        .filter_map(|o| o.system.name.as_deref())
        .collect();
    assert_eq!(names, vec!["third order", "first order", "second order"]);
    let first = listed.objects().iter().find(|o| o.object_id() == Some(id.as_str())).unwrap();
    assert_eq!(first.get("F0000001"), Some(&Value::from("shipped")));

    // load many with a matcher
    let filter = Filter::rows(0, 10).matcher(Matcher::and(vec![ItemMatcher::equal("F0000002", 80)]));
    let matched = data(
        client
            .load_biz_objects(&LoadBizObjectsRequest::from_filter(SCHEMA, &filter).unwrap(), &cancel)
            .await
            .unwrap(),
    );
    assert_eq!(matched.total_count, 1);
    let matched = matched.biz_object_array.unwrap();
    assert_eq!(matched[0].system.name.as_deref(), Some("second order"));

    // batch update
    let batch_update = UpdateBizObjectsRequest::from_objects(
        SCHEMA,
        &[BizObject::new().with("F0000001", "archived"), BizObject::new().with("F0000001", "archived")],
        batch_ids.clone(),
    )
    .unwrap();
    let updated_ids = data(client.update_biz_objects(&batch_update, &cancel).await.unwrap())
        .object_ids
        .unwrap();
    assert_eq!(updated_ids, batch_ids);

    // remove one, then the batch
    let removed = data(
        client
            .remove_biz_object(&RemoveBizObjectRequest::new(SCHEMA, &id), &cancel)
            .await
            .unwrap(),
    );
    assert_eq!(removed.object_id.as_deref(), Some(id.as_str()));

    let remove_batch = RemoveBizObjectsRequest {
        schema_code: SCHEMA.to_string(),
        biz_object_ids: batch_ids.clone(),
    };
    let removed = data(client.remove_biz_objects(&remove_batch, &cancel).await.unwrap());
    assert_eq!(removed.object_ids.unwrap(), batch_ids);

    // gone: a business failure, not an error
    let missing = client
        .load_biz_object(&LoadBizObjectRequest::new(SCHEMA, &id), &cancel)
        .await
        .unwrap();
    assert!(!missing.successful);
    assert!(missing.error_message.unwrap().contains("not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn workflow_lifecycle() {
    let base_url = start_server().await;
    let client = client(&base_url);
    let cancel = CancellationToken::new();

    let create = CreateBizObjectRequest {
        schema_code: SCHEMA.to_string(),
        biz_object: BizObject::new().with("F0000001", "needs approval"),
        is_submit: true,
    };
    let created = data(client.create_biz_object(&create, &cancel).await.unwrap());
    let object_id = created.object_id.unwrap();
    let instance_id = created.workflow_instance_id.unwrap();

    let info = data(
        client
            .get_workflow_info(&GetWorkflowInfoRequest::new(&instance_id), &cancel)
            .await
            .unwrap(),
    );
    assert_eq!(info.biz_object_id.as_deref(), Some(object_id.as_str()));
    assert_eq!(info.state, 2);

    let submit = SubmitWorkflowRequest {
        instance_id: instance_id.clone(),
        approval_action: "Approve".to_string(),
        comment: Some("approved".to_string()),
        user_id: Some("U1".to_string()),
    };
    let submitted = data(client.submit_workflow(&submit, &cancel).await.unwrap());
    assert_eq!(submitted.biz_object_id.as_deref(), Some(object_id.as_str()));

    let info = data(
        client
            .get_workflow_info(&GetWorkflowInfoRequest::new(&instance_id), &cancel)
            .await
            .unwrap(),
    );
    assert_eq!(info.state, 4);
    let logs = info.approval_logs.unwrap();
    assert_eq!(logs[0].approver_id.as_deref(), Some("U1"));
    assert_eq!(logs[0].approval_comment.as_deref(), Some("approved"));

    let loaded = data(
        client
            .load_biz_object(&LoadBizObjectRequest::new(SCHEMA, &object_id), &cancel)
            .await
            .unwrap(),
    );
    assert_eq!(loaded.system.status, Some(1));
    assert_eq!(loaded.system.workflow_instance_id.as_deref(), Some(instance_id.as_str()));
}

#[tokio::test(flavor = "multi_thread")]
async fn attachment_roundtrip() {
    let base_url = start_server().await;
    let client = client(&base_url);
    let cancel = CancellationToken::new();

    let create = CreateBizObjectRequest {
        schema_code: SCHEMA.to_string(),
        biz_object: BizObject::new(),
        is_submit: false,
    };
    let id = data(client.create_biz_object(&create, &cancel).await.unwrap())
        .object_id
        .unwrap();

    let upload = UploadAttachmentRequest {
        schema_code: SCHEMA.to_string(),
        file_property_name: "F0000009".to_string(),
        biz_object_id: id.clone(),
        file_bytes: b"invoice body".to_vec(),
        file_name: "invoice-7.txt".to_string(),
        content_type: "text/plain".to_string(),
    };
    let uploaded = data(client.upload_attachment(&upload, &cancel).await.unwrap());
    assert!(uploaded.success, "upload failed: {:?}", uploaded.error_message);
    let attachment_id = uploaded.attachment_id.unwrap();

    let loaded = data(
        client
            .load_biz_object(&LoadBizObjectRequest::new(SCHEMA, &id), &cancel)
            .await
            .unwrap(),
    );
    assert_eq!(loaded.get_as::<Vec<String>>("F0000009"), Some(vec![attachment_id.clone()]));

    let file = data(
        client
            .download_biz_object_file(&DownloadBizObjectFileRequest::new(&attachment_id), &cancel)
            .await
            .unwrap(),
    );
    assert_eq!(file.file_bytes, b"invoice body".to_vec());
    assert_eq!(file.file_name, "invoice-7.txt");
    assert_eq!(file.content_type, "text/plain");

    // upload against a record that does not exist: platform verdict, not an error
    let orphan = UploadAttachmentRequest {
        biz_object_id: "missing".to_string(),
        ..upload
    };
    let response = client.upload_attachment(&orphan, &cancel).await.unwrap();
    assert!(response.successful);
    assert!(!response.return_data.unwrap().success);
}

#[tokio::test(flavor = "multi_thread")]
async fn custom_action_and_bad_credentials() {
    let base_url = start_server().await;
    let cancel = CancellationToken::new();

    let response = client(&base_url)
        .invoke_json("NotARealAction", &serde_json::json!({"Any": 1}), &cancel)
        .await
        .unwrap();
    assert!(!response.successful);
    assert!(response.error_message.unwrap().contains("NotARealAction"));

    let wrong = H3YunClient::new(H3YunConfig::new("it-engine", "wrong").with_base_url(&base_url)).unwrap();
    let err = wrong
        .load_biz_object(&LoadBizObjectRequest::new(SCHEMA, "x"), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpFailure);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.code(), "Unauthorized");
}
