//! Transport-level behaviour of `ReqwestTransport` against a scripted HTTP
//! server: credentials on the wire, status and body classification,
//! timeouts and the file transfer endpoints.

use std::time::Duration;

use h3yun_core::{
    CancellationToken, DownloadBizObjectFileRequest, ErrorKind, H3YunClient, H3YunConfig,
    LoadBizObjectRequest, UploadAttachmentRequest,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, timeout_seconds: i64) -> H3YunClient {
    let config = H3YunConfig::new("wire-engine", "wire-secret")
        .with_base_url(server.uri())
        .with_timeout_seconds(timeout_seconds);
    H3YunClient::new(config).unwrap()
}

fn load() -> LoadBizObjectRequest {
    LoadBizObjectRequest::new("S", "ID1")
}

async fn respond(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/OpenApi/Invoke"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn credentials_and_envelope_reach_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/OpenApi/Invoke"))
        .and(header("EngineCode", "wire-engine"))
        .and(header("EngineSecret", "wire-secret"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"ActionName": "LoadBizObject", "SchemaCode": "S", "BizObjectId": "ID1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Successful": true,
            "ReturnData": {"ObjectId": "ID1", "Name": "loaded", "F0000001": 5}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let object = client(&server, 5)
        .load_biz_object(&load(), &CancellationToken::new())
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert_eq!(object.object_id(), Some("ID1"));
    assert_eq!(object.get_as::<i64>("F0000001"), Some(5));
}

#[tokio::test]
async fn bad_request_status_keeps_body_as_code() {
    let server = MockServer::start().await;
    respond(&server, ResponseTemplate::new(400).set_body_string("Bad Request")).await;

    let err = client(&server, 5)
        .load_biz_object(&load(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpFailure);
    assert_eq!(err.code(), "Bad Request");
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("HTTP request failed"));
}

#[tokio::test]
async fn not_json_is_decode_failure() {
    let server = MockServer::start().await;
    respond(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

    let err = client(&server, 5)
        .load_biz_object(&load(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    assert!(err.to_string().contains("JSON"));
}

#[tokio::test]
async fn empty_body_cannot_be_parsed() {
    let server = MockServer::start().await;
    respond(&server, ResponseTemplate::new(200)).await;

    let err = client(&server, 5)
        .load_biz_object(&load(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "cannot parse API response");
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    respond(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"Successful": true}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let err = client(&server, 1)
        .load_biz_object(&load(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn cancellation_reports_timeout() {
    let server = MockServer::start().await;
    respond(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"Successful": true}))
            .set_delay(Duration::from_secs(10)),
    )
    .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let err = client(&server, 30)
        .load_biz_object(&load(), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = closed.local_addr().unwrap();
    drop(closed);

    let config = H3YunConfig::new("wire-engine", "wire-secret").with_base_url(format!("http://{addr}"));
    let err = H3YunClient::new(config)
        .unwrap()
        .load_biz_object(&load(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert!(err.to_string().starts_with("HTTP request exception"));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn upload_sends_media_part_with_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/OpenApi/UploadAttachment"))
        .and(query_param("SchemaCode", "S"))
        .and(query_param("FilePropertyName", "F0000003"))
        .and(query_param("BizObjectId", "ID1"))
        .and(header("EngineSecret", "wire-secret"))
        .and(body_string_contains("name=\"media\""))
        .and(body_string_contains("filename=\"report.txt\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Success": true, "AttachmentId": "ATT1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = UploadAttachmentRequest {
        schema_code: "S".to_string(),
        file_property_name: "F0000003".to_string(),
        biz_object_id: "ID1".to_string(),
        file_bytes: b"quarterly numbers".to_vec(),
        file_name: "report.txt".to_string(),
        content_type: "text/plain".to_string(),
    };
    let response = client(&server, 5)
        .upload_attachment(&request, &CancellationToken::new())
        .await
        .unwrap();
    assert!(response.successful);
    let result = response.return_data.unwrap();
    assert!(result.success);
    assert_eq!(result.attachment_id.as_deref(), Some("ATT1"));
}

#[tokio::test]
async fn download_reads_file_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Api/DownloadBizObjectFile"))
        .and(header("EngineCode", "wire-engine"))
        .and(body_string_contains("attachmentId=ATT1"))
        .and(body_string_contains("EngineCode=wire-engine"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(vec![0x25, 0x50, 0x44, 0x46], "application/pdf")
                .insert_header("Content-Disposition", "attachment; filename=\"report.pdf\""),
        )
        .expect(1)
        .mount(&server)
        .await;

    let file = client(&server, 5)
        .download_biz_object_file(&DownloadBizObjectFileRequest::new("ATT1"), &CancellationToken::new())
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert_eq!(file.file_bytes, vec![0x25, 0x50, 0x44, 0x46]);
    assert_eq!(file.file_name, "report.pdf");
    assert_eq!(file.content_type, "application/pdf");
}

#[tokio::test]
async fn download_missing_attachment_is_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Api/DownloadBizObjectFile"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client(&server, 5)
        .download_biz_object_file(&DownloadBizObjectFileRequest::new("nope"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpFailure);
    assert_eq!(err.code(), "not found");
}
