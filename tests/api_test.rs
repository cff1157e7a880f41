use std::sync::Arc;

use arrow::array::{Array, Int64Array, TimestampMillisecondArray};
use arrow::datatypes::{DataType, TimeUnit};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use tabchat::api::TabchatApi;
use tabchat::cache::{MemoryStore, UploadCache};
use tabchat::delegate::QueryDelegate;
use tabchat::service::TabchatService;
use tabchat::table::to_records;
use tabchat::testutil::{FailingDelegate, RecordingDelegate, multipart_body};

fn setup(delegate: Arc<dyn QueryDelegate>) -> (UploadCache, Router) {
    let cache = UploadCache::new(Arc::new(MemoryStore::new()), "df_cache");
    let service = TabchatService::new(cache.clone(), delegate);
    let router = TabchatApi::new(service).router();
    (cache, router)
}

async fn body_json(router: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn upload_request(filename: Option<&str>, content: &[u8]) -> Request<Body> {
    let (content_type, body) = multipart_body("file", filename, content);
    Request::post("/upload")
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

fn question_request(question: &str) -> Request<Body> {
    Request::post("/question")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "question": question }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_upload_csv_then_question() {
    let delegate = Arc::new(RecordingDelegate::new(json!(3.0)));
    let (cache, router) = setup(delegate.clone());

    let (status, json) =
        body_json(router.clone(), upload_request(Some("data.csv"), b"a,b\n1,2\n3,4")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": "Arquivo importado"}));

    let table = cache.get().await.unwrap().unwrap();
    assert_eq!(table.num_rows(), 2);
    let b = table
        .column_by_name("b")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(b.values().to_vec(), vec![2, 4]);

    let (status, json) = body_json(
        router,
        question_request("What is the average of column b?"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!(3.0));

    let calls = delegate.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, table);
    assert_eq!(calls[0].1, "What is the average of column b?");
}

#[tokio::test]
async fn test_structured_answer_forwarded_verbatim() {
    let answer = json!([{"a": 3, "b": 4}]);
    let (_cache, router) = setup(Arc::new(RecordingDelegate::new(answer.clone())));

    body_json(router.clone(), upload_request(Some("data.csv"), b"a,b\n1,2\n3,4")).await;
    let (_, json) = body_json(router, question_request("Which row has the largest b?")).await;
    assert_eq!(json, answer);
}

#[tokio::test]
async fn test_upload_xlsx_then_question() {
    let delegate = Arc::new(RecordingDelegate::new(json!(19)));
    let (cache, router) = setup(delegate.clone());

    let (status, json) = body_json(
        router.clone(),
        upload_request(Some("Vendas.XLSX"), include_bytes!("fixtures/sales.xlsx")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": "Arquivo importado"}));

    let table = cache.get().await.unwrap().unwrap();
    assert_eq!(table.num_rows(), 3);
    let units = table
        .column_by_name("units")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(units.value(0), 12);
    assert!(units.is_null(2));
    let sold_on = table.column_by_name("sold_on").unwrap();
    assert_eq!(
        sold_on.data_type(),
        &DataType::Timestamp(TimeUnit::Millisecond, None)
    );
    let sold_on = sold_on
        .as_any()
        .downcast_ref::<TimestampMillisecondArray>()
        .unwrap();
    assert_eq!(sold_on.value(0), 1_704_067_200_000);

    let (_, json) = body_json(router, question_request("How many units were sold?")).await;
    assert_eq!(json, json!(19));
    assert_eq!(delegate.calls()[0].0, table);
}

#[tokio::test]
async fn test_duplicate_headers_reach_delegate_intact() {
    let delegate = Arc::new(RecordingDelegate::new(json!(null)));
    let (_cache, router) = setup(delegate.clone());

    body_json(router.clone(), upload_request(Some("dup.csv"), b"a,a\n1,2\n3,4\n")).await;
    body_json(router, question_request("Sum of every column?")).await;

    let records = to_records(&delegate.calls()[0].0).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(json!(records[0]), json!({"a": 1, "a.1": 2}));
    assert_eq!(json!(records[1]), json!({"a": 3, "a.1": 4}));
}

#[tokio::test]
async fn test_txt_upload_is_not_sniffed() {
    let (cache, router) = setup(Arc::new(RecordingDelegate::new(json!(null))));

    let (_, json) = body_json(router, upload_request(Some("data.txt"), b"x;y\n5;6")).await;
    assert_eq!(json["success"], "Arquivo importado");

    let table = cache.get().await.unwrap().unwrap();
    assert_eq!(table.num_columns(), 1);
    assert_eq!(table.schema().field(0).name(), "x;y");
}

#[tokio::test]
async fn test_disallowed_extension_leaves_cache_untouched() {
    let (cache, router) = setup(Arc::new(RecordingDelegate::new(json!(null))));

    body_json(router.clone(), upload_request(Some("data.csv"), b"a,b\n1,2\n3,4")).await;
    let before = cache.get().await.unwrap();

    let (status, json) =
        body_json(router, upload_request(Some("image.png"), b"\x89PNG\r\n")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"error": "Tipo de arquivo não permitido"}));
    assert_eq!(cache.get().await.unwrap(), before);
}

#[tokio::test]
async fn test_empty_filename_rejected() {
    let (_cache, router) = setup(Arc::new(RecordingDelegate::new(json!(null))));
    let (_, json) = body_json(router, upload_request(Some(""), b"a,b\n1,2\n")).await;
    assert_eq!(json, json!({"error": "Nome de arquivo vazio"}));
}

#[tokio::test]
async fn test_missing_file_part_rejected() {
    let (_cache, router) = setup(Arc::new(RecordingDelegate::new(json!(null))));

    let (_, json) = body_json(router.clone(), upload_request(None, b"just a form value")).await;
    assert_eq!(json, json!({"error": "Nenhum arquivo encontrado"}));

    let req = Request::post("/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, json) = body_json(router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"error": "Nenhum arquivo encontrado"}));
}

#[tokio::test]
async fn test_declared_oversize_rejected_before_parsing() {
    let (cache, router) = setup(Arc::new(RecordingDelegate::new(json!(null))));

    let (content_type, body) = multipart_body("file", Some("data.csv"), b"a,b\n1,2\n");
    let req = Request::post("/upload")
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, 6 * 1024 * 1024)
        .body(Body::from(body))
        .unwrap();

    let (status, json) = body_json(router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"error": "O tamanho do arquivo excede 5 MB"}));
    assert!(cache.get().await.unwrap().is_none());
}

#[tokio::test]
async fn test_unsniffable_csv_reports_error() {
    let (cache, router) = setup(Arc::new(RecordingDelegate::new(json!(null))));

    let (status, json) =
        body_json(router, upload_request(Some("single.csv"), b"value\n1\n2\n")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("Could not determine delimiter")
    );
    assert!(cache.get().await.unwrap().is_none());
}

#[tokio::test]
async fn test_question_before_upload() {
    let delegate = Arc::new(RecordingDelegate::new(json!("unused")));
    let (_cache, router) = setup(delegate.clone());

    let (status, json) = body_json(router, question_request("How many rows?")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"error": "DataFrame não encontrado. Por favor, faça o upload do arquivo primeiro."})
    );
    assert!(delegate.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_question_body() {
    let (_cache, router) = setup(Arc::new(RecordingDelegate::new(json!(null))));

    let req = Request::post("/question")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"query": "wrong key"}"#))
        .unwrap();
    let (status, json) = body_json(router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_delegate_failure_reported_in_body() {
    let (_cache, router) = setup(Arc::new(FailingDelegate::new("rate limited")));

    body_json(router.clone(), upload_request(Some("data.csv"), b"a,b\n1,2\n3,4")).await;
    let (status, json) = body_json(router, question_request("Sum of a?")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"error": "Delegate error: rate limited"}));
}
