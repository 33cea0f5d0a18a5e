use httpmock::prelude::*;
use reqwest::multipart::Form;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use storefetch::{
    ClientConfig, ContentType, Headers, HttpClient, KnownHeader, Payload, RequestConfig,
    StoreFetchError,
};

#[tokio::test]
async fn test_get_sends_json_content_type() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/x")
            .header("content-type", "application/json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"ok": true}));
    });

    let client = HttpClient::new(ClientConfig::new(server.base_url()));
    let body: Value = assert_ok!(client.get("/x", None).await);

    api_mock.assert();
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_post_sends_serialized_body() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/x")
            .header("content-type", "application/json")
            .body(r#"{"a":1}"#);
        then.status(201).json_body(json!({"id": 7}));
    });

    let client = HttpClient::new(ClientConfig::new(server.base_url()));
    let body: Value = client.post("/x", json!({"a": 1}), None).await.unwrap();

    api_mock.assert();
    assert_eq!(body, json!({"id": 7}));
}

#[tokio::test]
async fn test_put_and_remove_use_their_methods() {
    let server = MockServer::start();
    let put_mock = server.mock(|when, then| {
        when.method(PUT).path("/items/1").body(r#"{"name":"renamed"}"#);
        then.status(200).json_body(json!({"updated": true}));
    });
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/items/1");
        then.status(200).json_body(json!({"deleted": true}));
    });

    let client = HttpClient::new(ClientConfig::new(server.base_url()));
    let updated: Value = client
        .put("/items/1", json!({"name": "renamed"}), None)
        .await
        .unwrap();
    let deleted: Value = client.remove("/items/1", None).await.unwrap();

    put_mock.assert();
    delete_mock.assert();
    assert_eq!(updated, json!({"updated": true}));
    assert_eq!(deleted, json!({"deleted": true}));
}

#[tokio::test]
async fn test_post_form_data_uses_multipart() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/upload")
            .header_exists("content-type")
            .body_contains("name=\"title\"")
            .body_contains("quarterly report");
        then.status(200).json_body(json!({"stored": true}));
    });

    let client = HttpClient::new(ClientConfig::new(server.base_url()).with_headers(
        Headers::new().with(KnownHeader::ContentType, ContentType::ApplicationJson),
    ));
    let form = Form::new().text("title", "quarterly report");
    let body: Value = client.post("/upload", form, None).await.unwrap();

    api_mock.assert();
    assert_eq!(body, json!({"stored": true}));
}

#[tokio::test]
async fn test_client_and_call_headers_are_both_sent() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/profile")
            .header("authorization", "Bearer per-call")
            .header("x-client", "storefetch")
            .header("x-trace", "true");
        then.status(200).json_body(json!({"name": "Ada"}));
    });

    let client = HttpClient::new(
        ClientConfig::new(server.base_url()).with_headers(
            Headers::new()
                .with(KnownHeader::Authorization, "Bearer default")
                .with("X-Client", "storefetch"),
        ),
    );
    let custom = RequestConfig::new().headers(
        Headers::new()
            .with(KnownHeader::Authorization, "Bearer per-call")
            .with("X-Trace", true),
    );

    let body: Value = client.get("/profile", Some(&custom)).await.unwrap();

    api_mock.assert();
    assert_eq!(body["name"], "Ada");
}

#[tokio::test]
async fn test_call_header_wins_over_client_header_of_other_case() {
    let server = MockServer::start();
    let call_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/who")
            .header("authorization", "Bearer call");
        then.status(200).json_body(json!({"who": "call"}));
    });

    let client = HttpClient::new(
        ClientConfig::new(server.base_url())
            .with_headers(Headers::new().with("authorization", "Bearer client")),
    );
    let custom = RequestConfig::new()
        .headers(Headers::new().with(KnownHeader::Authorization, "Bearer call"));

    let body: Value = client.get("/who", Some(&custom)).await.unwrap();

    assert_eq!(body, json!({"who": "call"}));
    call_mock.assert_hits(1);
}

#[tokio::test]
async fn test_form_data_with_lowercase_default_content_type() {
    let server = MockServer::start();
    let json_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/upload")
            .header("content-type", "application/json");
        then.status(400).json_body(json!({"error": "json content type sent"}));
    });
    let form_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/upload")
            .body_contains("name=\"file\"");
        then.status(200).json_body(json!({"stored": true}));
    });

    let client = HttpClient::new(
        ClientConfig::new(server.base_url())
            .with_headers(Headers::new().with("content-type", "application/json")),
    );
    let form = Form::new().text("file", "contents");
    let body: Value = client.post("/upload", form, None).await.unwrap();

    assert_eq!(body, json!({"stored": true}));
    json_mock.assert_hits(0);
    form_mock.assert_hits(1);
}

#[tokio::test]
async fn test_per_call_base_url_wins() {
    let configured = MockServer::start();
    let other = MockServer::start();
    let configured_mock = configured.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(json!({"from": "configured"}));
    });
    let other_mock = other.mock(|when, then| {
        when.method(GET).path("/ping");
        then.status(200).json_body(json!({"from": "other"}));
    });

    let client = HttpClient::new(ClientConfig::new(configured.base_url()));
    let custom = RequestConfig::new().base_url(other.base_url());
    let body: Value = client.get("/ping", Some(&custom)).await.unwrap();

    other_mock.assert();
    configured_mock.assert_hits(0);
    assert_eq!(body, json!({"from": "other"}));
}

#[tokio::test]
async fn test_typed_response() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
        name: String,
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/users/1");
        then.status(200).json_body(json!({"id": 1, "name": "Ada", "extra": "ignored"}));
    });

    let client = HttpClient::new(ClientConfig::new(server.base_url()));
    let user: User = client.get("/users/1", None).await.unwrap();

    assert_eq!(
        user,
        User {
            id: 1,
            name: "Ada".to_string()
        }
    );
}

#[tokio::test]
async fn test_error_status_rejects_with_response() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/x");
        then.status(422).json_body(json!({"error": "invalid"}));
    });

    let client = HttpClient::new(ClientConfig::new(server.base_url()));
    let payload = Payload::json(&json!({"a": 1})).unwrap();
    let err = client.post::<Value, _>("/x", payload, None).await.unwrap_err();

    api_mock.assert();
    assert!(matches!(err, StoreFetchError::StatusError(_)));
    assert_eq!(err.status(), Some(reqwest::StatusCode::UNPROCESSABLE_ENTITY));

    let response = err.into_response().unwrap();
    let detail: Value = response.json().await.unwrap();
    assert_eq!(detail, json!({"error": "invalid"}));
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/html");
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<html></html>");
    });

    let client = HttpClient::new(ClientConfig::new(server.base_url()));
    let err = assert_err!(client.get::<Value>("/html", None).await);

    assert!(matches!(err, StoreFetchError::DecodeError(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_api_error() {
    // grab a free port, then release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = HttpClient::new(ClientConfig::new(format!("http://127.0.0.1:{}", port)));
    let err = assert_err!(client.get::<Value>("/x", None).await);

    assert!(matches!(err, StoreFetchError::ApiError(_)));
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/count");
        then.status(200).json_body(json!({"ok": true}));
    });

    let client = HttpClient::new(ClientConfig::new(server.base_url()));
    let mut handles = Vec::new();
    for _ in 0..5 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.get::<Value>("/count", None).await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), json!({"ok": true}));
    }
    api_mock.assert_hits(5);
}
