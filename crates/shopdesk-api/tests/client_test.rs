#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopdesk_api::{
    ApiClient, Body, CustomerRecord, Error, ErrorDetail, FormPayload, OptionRecord,
    OrderDetailRecord, Resource, TokenCell, token_cell,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient, TokenCell) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let token = token_cell();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url, token.clone());
    (server, client, token)
}

fn set_token(cell: &TokenCell, value: &str) {
    cell.store(Some(Arc::new(SecretString::from(value.to_owned()))));
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_access_token() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": "12345678" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok1" })))
        .mount(&server)
        .await;

    let secret = SecretString::from("12345678".to_owned());
    let reply = client.login("a@b.com", &secret).await.unwrap();
    assert_eq!(reply.access_token, "tok1");
}

#[tokio::test]
async fn test_login_rejection_keeps_error_text() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Unauthorized",
            "message": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let secret = SecretString::from("nope".to_owned());
    let err = client.login("a@b.com", &secret).await.unwrap_err();
    let Error::Server(server_err) = err else {
        panic!("expected server error, got {err:?}");
    };
    assert_eq!(server_err.status, 401);
    assert_eq!(server_err.error.as_deref(), Some("Unauthorized"));
}

#[tokio::test]
async fn test_bearer_header_follows_token_cell() {
    let (server, client, token) = setup().await;
    set_token(&token, "tok1");

    Mock::given(method("GET"))
        .and(path("/api/v1/customers/list"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "data": { "customers": [{ "id": 1, "first_name": "Ann" }] }
        })))
        .mount(&server)
        .await;

    let rows: Vec<CustomerRecord> = client.list(&Resource::CUSTOMERS).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].first_name.as_deref(), Some("Ann"));
}

// ── Envelopes ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_flag_on_http_200_is_a_failure() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/customers/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": true,
            "message": "Database unavailable"
        })))
        .mount(&server)
        .await;

    let err = client
        .list::<CustomerRecord>(&Resource::CUSTOMERS)
        .await
        .unwrap_err();
    let Error::Server(server_err) = err else {
        panic!("expected server error, got {err:?}");
    };
    assert_eq!(server_err.status, 200);
    assert_eq!(server_err.message, "Database unavailable");
}

#[tokio::test]
async fn test_field_errors_are_collected() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/customers"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": true,
            "message": "Validation failed",
            "data": { "email": "taken" }
        })))
        .mount(&server)
        .await;

    let body = Body::json(&json!({ "email": "a@b.com" })).unwrap();
    let err = client.create(&Resource::CUSTOMERS, body).await.unwrap_err();
    let Error::Server(server_err) = err else {
        panic!("expected server error, got {err:?}");
    };
    assert_eq!(server_err.status, 422);
    assert_eq!(
        server_err.fields().unwrap().get("email").map(String::as_str),
        Some("taken")
    );
}

#[tokio::test]
async fn test_forbidden_is_flagged() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders/list"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": true,
            "message": "Unauthenticated"
        })))
        .mount(&server)
        .await;

    let err = client
        .list::<serde_json::Value>(&Resource::ORDERS)
        .await
        .unwrap_err();
    assert!(err.is_forbidden());
}

#[tokio::test]
async fn test_non_json_error_uses_status_reason() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/list"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client
        .list::<serde_json::Value>(&Resource::PRODUCTS)
        .await
        .unwrap_err();
    let Error::Server(server_err) = err else {
        panic!("expected server error, got {err:?}");
    };
    assert_eq!(server_err.message, "HTTP request failed: 502 Bad Gateway");
    assert_eq!(server_err.detail, ErrorDetail::None);
}

#[tokio::test]
async fn test_delete_returns_message() {
    let (server, client, _) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/customers/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "message": "Customer deleted"
        })))
        .mount(&server)
        .await;

    let reply = client.delete(&Resource::CUSTOMERS, "7").await.unwrap();
    assert_eq!(reply.message.as_deref(), Some("Customer deleted"));
}

// ── Search, detail, multipart ───────────────────────────────────────

#[tokio::test]
async fn test_search_sends_query_parameter() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/getList"))
        .and(query_param("search", "wid get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "products": [{ "id": 3, "label": "Widget", "price": "10.00" }] }
        })))
        .mount(&server)
        .await;

    let options: Vec<OptionRecord> = client
        .search(&Resource::PRODUCTS, "wid get")
        .await
        .unwrap();
    assert_eq!(options[0].label, "Widget");
    assert_eq!(options[0].price.unwrap().to_string(), "10.00");
}

#[tokio::test]
async fn test_get_order_reads_record_key() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "order": {
                "id": 42,
                "order_number": "ORD-42",
                "items": [
                    { "product_name": "Widget", "product_price": 10,
                      "product_discount": 0, "product_quantity": 2 }
                ]
            } }
        })))
        .mount(&server)
        .await;

    let order: OrderDetailRecord = client.get(&Resource::ORDERS, "42").await.unwrap();
    assert_eq!(order.order_number.as_deref(), Some("ORD-42"));
    assert_eq!(order.items.len(), 1);
}

#[tokio::test]
async fn test_missing_envelope_key_is_a_deserialization_error() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/customers/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;

    let err = client
        .get::<CustomerRecord>(&Resource::CUSTOMERS, "9")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_product_update_posts_multipart() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/products/5"))
        .and(body_string_contains("name=\"name\""))
        .and(body_string_contains("Desk Lamp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "message": "Product updated"
        })))
        .mount(&server)
        .await;

    let form = FormPayload::new().text("name", "Desk Lamp").text("stock", 4);
    let reply = client
        .update(&Resource::PRODUCTS, "5", Body::Form(form))
        .await
        .unwrap();
    assert_eq!(reply.message.as_deref(), Some("Product updated"));
}

#[tokio::test]
async fn test_categories_listing() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "categories": [{ "id": 1, "name": "Lighting" }] }
        })))
        .mount(&server)
        .await;

    let categories = client.list_categories().await.unwrap();
    assert_eq!(categories[0].name, "Lighting");
}
