// Authentication endpoints
//
// Bearer-token login/logout. The login reply carries the token at the top
// level (`{ access_token }`), not inside `data`. Storing the token is the
// session layer's job; these calls only talk HTTP.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginRequest, LoginResponse, Reply};
use crate::resource::Body;

const LOGIN_PATH: &str = "auth/login";
const LOGOUT_PATH: &str = "auth/logout";

impl ApiClient {
    /// Exchange credentials for a bearer token.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let url = self.url(LOGIN_PATH)?;
        debug!(email, "logging in");

        let body = Body::json(&LoginRequest {
            email,
            password: password.expose_secret(),
        })?;
        let env = self.send_body(Method::POST, url, body).await?;

        serde_json::from_value(env.body).map_err(|e| Error::Deserialization {
            message: format!("login reply: {e}"),
            body: String::new(),
        })
    }

    /// Revoke the current bearer token on the server.
    pub async fn logout(&self) -> Result<Reply<Value>, Error> {
        let url = self.url(LOGOUT_PATH)?;
        self.send(self.http().post(url.clone()), Method::POST, &url)
            .await
            .map(|env| env.into_reply())
    }
}
