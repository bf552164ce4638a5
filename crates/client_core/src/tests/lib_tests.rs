use super::*;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{
    domain::{CouponId, CouponKind, DocumentId},
    protocol::{CreateCouponRequest, UpdateDocumentRequest},
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    query: Option<String>,
    body: Option<Value>,
    authorization: Option<String>,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    envelope_code: Arc<Mutex<Option<i32>>>,
    http_status: Arc<Mutex<Option<StatusCode>>>,
}

impl MockState {
    async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    async fn last(&self) -> RecordedRequest {
        self.requests
            .lock()
            .await
            .last()
            .cloned()
            .expect("a request was recorded")
    }
}

fn coupon_json() -> Value {
    json!({
        "id": 5,
        "name": "spring",
        "code": "SPRING24",
        "type": 1,
        "discount": 15,
        "count": 100,
        "used_count": 12,
        "enable": true
    })
}

async fn record(
    State(state): State<MockState>,
    method: axum::http::Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.requests.lock().await.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    });

    if let Some(status) = *state.http_status.lock().await {
        return (status, "unavailable").into_response();
    }
    if let Some(code) = *state.envelope_code.lock().await {
        return Json(json!({ "code": code, "msg": "coupon is in use", "data": null }))
            .into_response();
    }

    let data = match uri.path() {
        "/v1/admin/coupon/list" => json!({ "list": [coupon_json()], "total": 41 }),
        "/v1/admin/server/group/list" => json!({ "list": [{ "id": 3, "name": "Asia" }], "total": 1 }),
        "/v1/admin/subscribe/list" => json!({ "list": [{ "id": 1, "name": "Basic" }], "total": 1 }),
        "/v1/admin/user/list" => json!({}),
        _ => Value::Null,
    };
    Json(json!({ "code": 200, "msg": "success", "data": data })).into_response()
}

async fn spawn_admin_server() -> anyhow::Result<(String, MockState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MockState::default();
    let app = Router::new().fallback(record).with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[tokio::test]
async fn list_sends_pagination_and_filters_as_query() {
    let (server_url, state) = spawn_admin_server().await.expect("spawn server");
    let client = AdminClient::new(format!("{server_url}/")).expect("client");

    let mut filters = Filters::new();
    filters.insert("search".to_string(), "spring".to_string());
    filters.insert("subscribe".to_string(), "1".to_string());
    let page = client
        .resource::<Coupons>()
        .list(Pagination::new(2, 20), &filters)
        .await
        .expect("list");

    assert_eq!(page.total, 41);
    assert_eq!(page.list.len(), 1);
    assert_eq!(page.list[0].id, CouponId(5));
    assert_eq!(page.list[0].kind, CouponKind::Percentage);

    let request = state.last().await;
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/v1/admin/coupon/list");
    let query = request.query.expect("query string");
    for pair in ["page=2", "size=20", "search=spring", "subscribe=1"] {
        assert!(query.contains(pair), "missing {pair} in {query}");
    }
}

#[tokio::test]
async fn list_without_list_or_total_is_empty() {
    let (server_url, _state) = spawn_admin_server().await.expect("spawn server");
    let client = AdminClient::new(server_url).expect("client");

    let page = client
        .resource::<Users>()
        .list(Pagination::default(), &Filters::new())
        .await
        .expect("list");
    assert!(page.list.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn list_all_sends_no_paging_parameters() {
    let (server_url, state) = spawn_admin_server().await.expect("spawn server");
    let client = AdminClient::new(server_url).expect("client");

    client
        .resource::<SubscribeGroups>()
        .list_all()
        .await
        .expect("list");
    let request = state.last().await;
    assert_eq!(request.path, "/v1/admin/subscribe/group/list");
    assert_eq!(request.query, None);
}

#[tokio::test]
async fn mutations_use_expected_verbs_paths_and_bodies() {
    let (server_url, state) = spawn_admin_server().await.expect("spawn server");
    let client = AdminClient::new(server_url).expect("client");

    client
        .resource::<Coupons>()
        .create(&CreateCouponRequest {
            name: "spring".to_string(),
            code: "SPRING24".to_string(),
            kind: CouponKind::Amount,
            discount: 500,
            count: 0,
            start_time: 0,
            expire_time: 0,
            user_limit: 1,
            subscribe: Vec::new(),
            enable: false,
        })
        .await
        .expect("create");
    client
        .resource::<Documents>()
        .update(&UpdateDocumentRequest {
            id: DocumentId(9),
            title: "Getting started".to_string(),
            content: String::new(),
            tags: vec!["guide".to_string()],
            show: true,
        })
        .await
        .expect("update");
    client
        .resource::<Nodes>()
        .delete(shared::domain::NodeId(5))
        .await
        .expect("delete");
    client
        .resource::<SubscribeGroups>()
        .batch_delete(&[
            shared::domain::SubscribeGroupId(1),
            shared::domain::SubscribeGroupId(2),
            shared::domain::SubscribeGroupId(3),
        ])
        .await
        .expect("batch delete");

    let requests = state.requests().await;
    let summary: Vec<(&str, &str)> = requests
        .iter()
        .map(|r| (r.method.as_str(), r.path.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("POST", "/v1/admin/coupon/"),
            ("PUT", "/v1/admin/document/"),
            ("DELETE", "/v1/admin/server/"),
            ("DELETE", "/v1/admin/subscribe/group/batch"),
        ]
    );
    assert_eq!(requests[0].body.as_ref().expect("body")["type"], json!(2));
    assert_eq!(requests[1].body.as_ref().expect("body")["id"], json!(9));
    assert_eq!(requests[2].body, Some(json!({ "id": 5 })));
    assert_eq!(requests[3].body, Some(json!({ "ids": [1, 2, 3] })));
}

#[tokio::test]
async fn non_ok_envelope_code_surfaces_as_api_error() {
    let (server_url, state) = spawn_admin_server().await.expect("spawn server");
    *state.envelope_code.lock().await = Some(500);
    let client = AdminClient::new(server_url).expect("client");

    let err = client
        .resource::<Coupons>()
        .delete(CouponId(5))
        .await
        .expect_err("delete should fail");
    match err {
        ClientError::Api(api) => {
            assert_eq!(api.code, 500);
            assert_eq!(api.message, "coupon is in use");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn http_error_status_is_reported_with_url() {
    let (server_url, state) = spawn_admin_server().await.expect("spawn server");
    *state.http_status.lock().await = Some(StatusCode::UNAUTHORIZED);
    let client = AdminClient::new(server_url).expect("client");

    let err = client
        .resource::<Users>()
        .list(Pagination::default(), &Filters::new())
        .await
        .expect_err("list should fail");
    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("/v1/admin/user/list"));
}

#[tokio::test]
async fn bearer_token_is_attached_when_configured() {
    let (server_url, state) = spawn_admin_server().await.expect("spawn server");
    let client = AdminClient::with_options(
        server_url,
        ClientOptions {
            token: Some("secret-token".to_string()),
            timeout: Some(Duration::from_secs(5)),
        },
    )
    .expect("client");

    client.list_node_groups().await.expect("groups");
    assert_eq!(
        state.last().await.authorization.as_deref(),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn lookup_lists_decode_summaries() {
    let (server_url, state) = spawn_admin_server().await.expect("spawn server");
    let client = AdminClient::new(server_url).expect("client");

    let groups = client.list_node_groups().await.expect("groups");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "Asia");

    let plans = client
        .list_subscribes(Pagination::new(1, LOOKUP_PAGE_SIZE))
        .await
        .expect("plans");
    assert_eq!(plans.list[0].name, "Basic");
    let query = state.last().await.query.expect("query string");
    assert!(query.contains("size=9999"));
}

#[test]
fn rejects_unusable_base_urls() {
    assert!(matches!(
        AdminClient::new("not a url"),
        Err(ClientError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        AdminClient::new("ftp://files.example.com"),
        Err(ClientError::InvalidBaseUrl { .. })
    ));
    let client = AdminClient::new("https://admin.example.com///").expect("client");
    assert_eq!(client.base_url(), "https://admin.example.com");
}
