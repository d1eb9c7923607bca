// SPDX-License-Identifier: Apache-2.0

use catchdex_model::UserId;
use catchdex_server::{
    build_router, AppState, CatalogState, FakeProvider, IdentityProvider, ServerConfig,
    UnconfiguredProvider, GEN1_FILE,
};
use catchdex_store::LocalFsStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const GEN1_BODY: &str = r#"[
  {"id": 1, "name": "Bulbasaur", "types": ["Grass", "Poison"], "availability": {}},
  {"id": 25, "name": "Pikachu", "types": ["Electric"], "availability": {"yellow": {"catchable": false, "note": "Starter."}}}
]"#;

struct TestServer {
    addr: SocketAddr,
    _catalog_dir: TempDir,
    _data_dir: TempDir,
}

async fn spawn_server(bypass_auth: bool, provider: Arc<dyn IdentityProvider>) -> TestServer {
    let catalog_dir = TempDir::new().expect("catalog dir");
    std::fs::write(catalog_dir.path().join(GEN1_FILE), GEN1_BODY).expect("gen1 fixture");
    // No gen2 file: that partition is deliberately absent.
    let data_dir = TempDir::new().expect("data dir");

    let config = ServerConfig {
        data_root: data_dir.path().to_path_buf(),
        catalog_dir: catalog_dir.path().to_path_buf(),
        session_secret: "golden-test-secret".to_string(),
        bypass_auth,
        ..ServerConfig::default()
    };
    let state = AppState::new(
        Arc::new(LocalFsStore::new(config.data_root.clone())),
        Arc::new(CatalogState::load(&config.catalog_dir)),
        config,
        provider,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    TestServer {
        addr,
        _catalog_dir: catalog_dir,
        _data_dir: data_dir,
    }
}

async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    extra_headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (name, value) in extra_headers {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    if let Some(body) = body {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    req.push_str("\r\n");
    if let Some(body) = body {
        req.push_str(body);
    }
    stream.write_all(req.as_bytes()).await.expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), body.to_string())
}

fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.eq_ignore_ascii_case(name).then_some(value.trim())
    })
}

#[tokio::test]
async fn write_then_read_round_trips_and_retains_keys() {
    let server = spawn_server(true, Arc::new(UnconfiguredProvider)).await;

    let (status, _, body) = send_raw(
        server.addr,
        "POST",
        "/caught/red",
        &[],
        Some(r#"{"id":1,"caught":true}"#),
    )
    .await;
    assert_eq!(status, 200);
    let ack: serde_json::Value = serde_json::from_str(&body).expect("ack json");
    assert_eq!(ack["success"], true);
    assert_eq!(ack["game"], "red");

    let (status, _, body) = send_raw(server.addr, "GET", "/caught/red", &[], None).await;
    assert_eq!(status, 200);
    let record: serde_json::Value = serde_json::from_str(&body).expect("record json");
    assert_eq!(record, serde_json::json!({"1": true}));

    let (status, _, _) = send_raw(
        server.addr,
        "POST",
        "/caught/red",
        &[],
        Some(r#"{"id":1,"caught":false}"#),
    )
    .await;
    assert_eq!(status, 200);

    let (_, _, body) = send_raw(server.addr, "GET", "/caught/red", &[], None).await;
    let record: serde_json::Value = serde_json::from_str(&body).expect("record json");
    assert_eq!(record, serde_json::json!({"1": false}), "key retained");
}

#[tokio::test]
async fn read_before_any_write_is_an_empty_mapping() {
    let server = spawn_server(true, Arc::new(UnconfiguredProvider)).await;
    for game in ["red", "blue", "yellow", "gold", "silver", "crystal"] {
        let (status, _, body) =
            send_raw(server.addr, "GET", &format!("/caught/{game}"), &[], None).await;
        assert_eq!(status, 200, "missing record is success for {game}");
        let record: serde_json::Value = serde_json::from_str(&body).expect("record json");
        assert_eq!(record, serde_json::json!({}));
    }
}

#[tokio::test]
async fn unknown_game_key_is_outside_the_route_space() {
    let server = spawn_server(true, Arc::new(UnconfiguredProvider)).await;
    let (status, _, body) = send_raw(server.addr, "GET", "/caught/emerald", &[], None).await;
    assert_eq!(status, 404);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "not_found");
}

#[tokio::test]
async fn malformed_write_is_rejected_before_the_store() {
    let server = spawn_server(true, Arc::new(UnconfiguredProvider)).await;

    let (status, _, body) = send_raw(
        server.addr,
        "POST",
        "/caught/red",
        &[],
        Some(r#"{"caught":true}"#),
    )
    .await;
    assert_eq!(status, 422);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "malformed_input");
    assert_eq!(err["error"]["details"]["field"], "id");

    let (status, _, _) = send_raw(server.addr, "POST", "/caught/red", &[], Some("not json")).await;
    assert_eq!(status, 422);

    let (_, _, body) = send_raw(server.addr, "GET", "/caught/red", &[], None).await;
    let record: serde_json::Value = serde_json::from_str(&body).expect("record json");
    assert_eq!(record, serde_json::json!({}), "nothing reached the store");
}

#[tokio::test]
async fn unauthenticated_access_is_rejected_without_bypass() {
    let server = spawn_server(false, Arc::new(UnconfiguredProvider)).await;

    let (status, _, body) = send_raw(server.addr, "GET", "/caught/red", &[], None).await;
    assert_eq!(status, 401);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "unauthorized");

    let (status, _, _) = send_raw(
        server.addr,
        "POST",
        "/caught/red",
        &[],
        Some(r#"{"id":1,"caught":true}"#),
    )
    .await;
    assert_eq!(status, 401);

    let (status, _, _) = send_raw(server.addr, "GET", "/identity/current", &[], None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn catalog_partitions_fail_independently() {
    let server = spawn_server(true, Arc::new(UnconfiguredProvider)).await;

    let (status, _, body) = send_raw(server.addr, "GET", "/catalog/gen1", &[], None).await;
    assert_eq!(status, 200);
    assert_eq!(body, GEN1_BODY, "partition bytes served verbatim");

    let (status, _, body) = send_raw(server.addr, "GET", "/catalog/gen2", &[], None).await;
    assert_eq!(status, 404, "absent partition is its own failure");
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "not_found");
}

#[tokio::test]
async fn login_callback_logout_cycle_manages_the_session() {
    let provider = Arc::new(FakeProvider::new(
        UserId::parse("108234").expect("user id"),
        "Ash",
    ));
    let server = spawn_server(false, provider).await;

    let (status, head, _) = send_raw(server.addr, "GET", "/identity/login", &[], None).await;
    assert_eq!(status, 302);
    let location = header_value(&head, "location").expect("login redirects");
    assert!(location.contains("/identity/callback"));

    let (status, head, _) = send_raw(
        server.addr,
        "GET",
        "/identity/callback?code=fake",
        &[],
        None,
    )
    .await;
    assert_eq!(status, 302);
    let cookie = header_value(&head, "set-cookie").expect("callback sets session");
    let token = cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string();

    let (status, _, body) = send_raw(
        server.addr,
        "GET",
        "/identity/current",
        &[("Cookie", &token)],
        None,
    )
    .await;
    assert_eq!(status, 200);
    let profile: serde_json::Value = serde_json::from_str(&body).expect("profile json");
    assert_eq!(profile["user_id"], "108234");
    assert_eq!(profile["display_name"], "Ash");

    let (status, head, _) = send_raw(server.addr, "GET", "/identity/logout", &[], None).await;
    assert_eq!(status, 302, "logout always redirects");
    let cleared = header_value(&head, "set-cookie").expect("logout clears session");
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn authenticated_and_guest_storage_are_isolated() {
    let provider = Arc::new(FakeProvider::new(
        UserId::parse("108234").expect("user id"),
        "Ash",
    ));
    let server = spawn_server(true, provider).await;

    let (_, head, _) = send_raw(
        server.addr,
        "GET",
        "/identity/callback?code=fake",
        &[],
        None,
    )
    .await;
    let cookie = header_value(&head, "set-cookie").expect("session cookie");
    let token = cookie.split(';').next().expect("cookie pair").to_string();

    // Authenticated write.
    let (status, _, _) = send_raw(
        server.addr,
        "POST",
        "/caught/gold",
        &[("Cookie", &token)],
        Some(r#"{"id":"152","caught":true}"#),
    )
    .await;
    assert_eq!(status, 200);

    // Guest (bypass, no cookie) sees nothing.
    let (_, _, body) = send_raw(server.addr, "GET", "/caught/gold", &[], None).await;
    let record: serde_json::Value = serde_json::from_str(&body).expect("record json");
    assert_eq!(record, serde_json::json!({}));

    // The authenticated user still sees their record.
    let (_, _, body) = send_raw(
        server.addr,
        "GET",
        "/caught/gold",
        &[("Cookie", &token)],
        None,
    )
    .await;
    let record: serde_json::Value = serde_json::from_str(&body).expect("record json");
    assert_eq!(record, serde_json::json!({"152": true}));
}

#[tokio::test]
async fn health_and_version_report_the_service() {
    let server = spawn_server(true, Arc::new(UnconfiguredProvider)).await;

    let (status, _, body) = send_raw(server.addr, "GET", "/healthz", &[], None).await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");

    let (status, _, body) = send_raw(server.addr, "GET", "/readyz", &[], None).await;
    assert_eq!(status, 200);
    assert_eq!(body, "ready");

    let (status, _, body) = send_raw(server.addr, "GET", "/version", &[], None).await;
    assert_eq!(status, 200);
    let version: serde_json::Value = serde_json::from_str(&body).expect("version json");
    assert_eq!(version["name"], "catchdex-server");

    let (status, head, _) = send_raw(server.addr, "GET", "/healthz", &[], None).await;
    assert_eq!(status, 200);
    assert!(
        header_value(&head, "x-request-id").is_some(),
        "every response carries a request id"
    );
}

#[tokio::test]
async fn string_and_number_ids_write_the_same_key() {
    let server = spawn_server(true, Arc::new(UnconfiguredProvider)).await;

    let (status, _, _) = send_raw(
        server.addr,
        "POST",
        "/caught/blue",
        &[],
        Some(r#"{"id":"7","caught":true}"#),
    )
    .await;
    assert_eq!(status, 200);
    let (status, _, _) = send_raw(
        server.addr,
        "POST",
        "/caught/blue",
        &[],
        Some(r#"{"id":7,"caught":true}"#),
    )
    .await;
    assert_eq!(status, 200);

    let (_, _, body) = send_raw(server.addr, "GET", "/caught/blue", &[], None).await;
    let record: serde_json::Value = serde_json::from_str(&body).expect("record json");
    assert_eq!(record, serde_json::json!({"7": true}), "one key, not two");
}
