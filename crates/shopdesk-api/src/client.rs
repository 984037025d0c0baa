// Back-office API HTTP client
//
// Wraps `reqwest::Client` with bearer-token injection, URL construction
// relative to the configured base, and `{ error, message, data }` envelope
// parsing. Entity endpoints are generic over a `Resource`; auth and
// category endpoints live in their own modules as inherent methods.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, ErrorDetail, ServerError};
use crate::models::Reply;
use crate::resource::{Body, Resource, UpdateMethod};
use crate::transport::TransportConfig;

/// Shared, swappable bearer token.
///
/// The session layer is the only writer; the client reads it on every
/// request so a login or logout takes effect without rebuilding anything.
pub type TokenCell = Arc<ArcSwapOption<SecretString>>;

/// Create an empty token cell.
pub fn token_cell() -> TokenCell {
    Arc::new(ArcSwapOption::empty())
}

/// Parsed response body plus the bits of the envelope callers care about.
#[derive(Debug)]
pub(crate) struct Envelope {
    pub message: Option<String>,
    pub body: Value,
}

impl Envelope {
    /// Move the value at `pointer` out of the body and deserialize it.
    pub(crate) fn take<T: DeserializeOwned>(&mut self, pointer: &str) -> Result<T, Error> {
        let value = self
            .body
            .pointer_mut(pointer)
            .map(Value::take)
            .ok_or_else(|| Error::Deserialization {
                message: format!("response is missing `{pointer}`"),
                body: preview(&self.body.to_string()),
            })?;
        serde_json::from_value(value).map_err(|e| Error::Deserialization {
            message: format!("{e} (at `{pointer}`)"),
            body: String::new(),
        })
    }

    /// Take the whole `data` member (or `null` if absent) with the message.
    pub(crate) fn into_reply(mut self) -> Reply<Value> {
        let data = self
            .body
            .get_mut("data")
            .map(Value::take)
            .unwrap_or(Value::Null);
        Reply {
            message: self.message,
            data,
        }
    }
}

/// HTTP client for the back-office REST API.
///
/// Every response goes through [`ApiClient::send`], which turns failure
/// envelopes and non-2xx statuses into [`Error::Server`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: TokenCell,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        transport: &TransportConfig,
        token: TokenCell,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, token))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, token: TokenCell) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            token,
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The token cell this client reads from.
    pub fn token(&self) -> &TokenCell {
        &self.token
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve a path relative to the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn record_url(&self, resource: &Resource, id: &str) -> Result<Url, Error> {
        let mut url = self.url(resource.path)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }

    // ── Resource operations ──────────────────────────────────────────

    /// `GET {path}/list` → `data.{collection_key}`.
    pub async fn list<T: DeserializeOwned>(&self, resource: &Resource) -> Result<Vec<T>, Error> {
        let url = self.url(&format!("{}/list", resource.path))?;
        let mut env = self.send(self.http.get(url.clone()), Method::GET, &url).await?;
        env.take(&resource.collection_pointer())
    }

    /// `GET {path}/{id}` → `data.{record_key}`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: &Resource,
        id: &str,
    ) -> Result<T, Error> {
        let url = self.record_url(resource, id)?;
        let mut env = self.send(self.http.get(url.clone()), Method::GET, &url).await?;
        env.take(&resource.record_pointer())
    }

    /// `POST {path}` with a JSON or multipart body.
    pub async fn create(&self, resource: &Resource, body: Body) -> Result<Reply<Value>, Error> {
        let url = self.url(resource.path)?;
        self.send_body(Method::POST, url, body)
            .await
            .map(Envelope::into_reply)
    }

    /// `PUT {path}/{id}` (or `POST` for multipart resources).
    pub async fn update(
        &self,
        resource: &Resource,
        id: &str,
        body: Body,
    ) -> Result<Reply<Value>, Error> {
        let url = self.record_url(resource, id)?;
        let method = match resource.update_method {
            UpdateMethod::Put => Method::PUT,
            UpdateMethod::Post => Method::POST,
        };
        self.send_body(method, url, body)
            .await
            .map(Envelope::into_reply)
    }

    /// `DELETE {path}/{id}`.
    pub async fn delete(&self, resource: &Resource, id: &str) -> Result<Reply<Value>, Error> {
        let url = self.record_url(resource, id)?;
        self.send(self.http.delete(url.clone()), Method::DELETE, &url)
            .await
            .map(Envelope::into_reply)
    }

    /// `GET {path}/getList?search={query}` → `data.{collection_key}`.
    pub async fn search<T: DeserializeOwned>(
        &self,
        resource: &Resource,
        query: &str,
    ) -> Result<Vec<T>, Error> {
        let mut url = self.url(&format!("{}/getList", resource.path))?;
        url.query_pairs_mut().append_pair("search", query);
        let mut env = self.send(self.http.get(url.clone()), Method::GET, &url).await?;
        env.take(&resource.collection_pointer())
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn send_body(
        &self,
        method: Method,
        url: Url,
        body: Body,
    ) -> Result<Envelope, Error> {
        let builder = self.http.request(method.clone(), url.clone());
        let builder = match body {
            Body::Json(value) => builder.json(&value),
            Body::Form(form) => builder.multipart(form.into_form()?),
        };
        self.send(builder, method, &url).await
    }

    /// Attach the bearer token, send, and parse the envelope.
    pub(crate) async fn send(
        &self,
        builder: RequestBuilder,
        method: Method,
        url: &Url,
    ) -> Result<Envelope, Error> {
        debug!("{method} {url}");

        let builder = match self.token.load_full() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        };
        let resp = builder
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_envelope(resp).await
    }
}

// ── Envelope parsing ────────────────────────────────────────────────

/// Parse `{ error, message, data }`, returning the body on success or
/// `Error::Server` when the error flag is truthy or the status is non-2xx.
async fn parse_envelope(resp: reqwest::Response) -> Result<Envelope, Error> {
    let status = resp.status();
    let text = resp.text().await.map_err(Error::Transport)?;
    trace!(status = status.as_u16(), body = %preview(&text), "response");

    let reason = status.canonical_reason().unwrap_or("Unknown").to_owned();

    let body: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(_) if !status.is_success() => {
                return Err(Error::Server(ServerError {
                    status: status.as_u16(),
                    message: format!("HTTP request failed: {} {reason}", status.as_u16()),
                    error: None,
                    detail: ErrorDetail::None,
                }));
            }
            Err(e) => {
                return Err(Error::Deserialization {
                    message: format!("{e} (body preview: {:?})", preview(&text)),
                    body: text,
                });
            }
        }
    };

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(String::from);
    let (flagged, error_text) = error_flag(body.get("error"));

    if flagged || !status.is_success() {
        return Err(Error::Server(ServerError {
            status: status.as_u16(),
            message: message
                .unwrap_or_else(|| format!("HTTP request failed: {} {reason}", status.as_u16())),
            error: error_text,
            detail: error_detail(body.get("data")),
        }));
    }

    Ok(Envelope { message, body })
}

/// Interpret the `error` member. Truthy values are `true`, non-empty
/// strings, non-zero numbers and non-null objects.
fn error_flag(value: Option<&Value>) -> (bool, Option<String>) {
    match value {
        None | Some(Value::Null) => (false, None),
        Some(Value::Bool(b)) => (*b, None),
        Some(Value::String(s)) => (!s.is_empty(), Some(s.clone()).filter(|s| !s.is_empty())),
        Some(Value::Number(n)) => (n.as_f64().is_some_and(|f| f != 0.0), None),
        Some(Value::Array(_) | Value::Object(_)) => (true, None),
    }
}

/// Turn the `data` member of a failure envelope into an `ErrorDetail`.
///
/// Validation maps may carry a string or a list of strings per field; the
/// list form is joined.
fn error_detail(value: Option<&Value>) -> ErrorDetail {
    match value {
        Some(Value::Object(map)) if !map.is_empty() => {
            let fields: BTreeMap<String, String> = map
                .iter()
                .map(|(k, v)| (k.clone(), field_text(v)))
                .collect();
            ErrorDetail::Fields(fields)
        }
        Some(Value::String(s)) if !s.is_empty() => ErrorDetail::Message(s.clone()),
        _ => ErrorDetail::None,
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(field_text)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_flag_truthiness() {
        assert_eq!(error_flag(Some(&json!(true))), (true, None));
        assert_eq!(error_flag(Some(&json!(false))), (false, None));
        assert_eq!(error_flag(Some(&json!(""))), (false, None));
        assert_eq!(
            error_flag(Some(&json!("Unauthorized"))),
            (true, Some("Unauthorized".into()))
        );
        assert_eq!(error_flag(None), (false, None));
    }

    #[test]
    fn field_lists_are_joined() {
        let detail = error_detail(Some(&json!({
            "email": ["The email has already been taken."],
            "zip_code": "Required"
        })));
        let ErrorDetail::Fields(fields) = detail else {
            panic!("expected field map");
        };
        assert_eq!(fields["email"], "The email has already been taken.");
        assert_eq!(fields["zip_code"], "Required");
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = normalize_base(Url::parse("http://localhost:8000/api").unwrap());
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
        assert_eq!(
            url.join("v1/customers").unwrap().as_str(),
            "http://localhost:8000/api/v1/customers"
        );
    }
}
