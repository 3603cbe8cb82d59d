//! StarLineID handshake: application code → application token → user token.
//!
//! Each step depends on the previous one and runs exactly once. Any non-success
//! response aborts the handshake; there is no retry or partial resume.

use serde_json::Value;
use sha1::{Digest, Sha1};

use super::{build_http_client, desc_field, mask};
use crate::errors::StarlineError;

/// Vendor-issued application identifier and secret (my.starline.ru).
#[derive(Debug, Clone)]
pub struct ApplicationCredential {
    pub app_id: String,
    pub app_secret: String,
}

/// Secret for the app-code request: MD5 of the app secret alone.
pub fn code_secret(app_secret: &str) -> String {
    format!("{:x}", md5::compute(app_secret.as_bytes()))
}

/// Secret for the app-token request: MD5 of `app_secret + code` hashed as a
/// single string. The vendor rejects any other combination.
pub fn token_secret(app_secret: &str, app_code: &str) -> String {
    let joined = format!("{}{}", app_secret, app_code);
    format!("{:x}", md5::compute(joined.as_bytes()))
}

/// Password digest sent to the login endpoint.
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha1::digest(password.as_bytes()))
}

pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
}

impl IdentityClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, StarlineError> {
        Ok(Self {
            http: build_http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Application code, valid for about one hour.
    pub async fn request_application_code(
        &self,
        app: &ApplicationCredential,
    ) -> Result<String, StarlineError> {
        let url = format!("{}/apiV3/application/getCode/", self.base_url);
        tracing::debug!("execute request: {}", url);

        let body: Value = self
            .http
            .get(&url)
            .query(&[
                ("appId", app.app_id.as_str()),
                ("secret", code_secret(&app.app_secret).as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;
        tracing::debug!(response = %body, "getCode response");

        desc_field(body, "code")
    }

    /// Application token, valid for about four hours.
    pub async fn request_application_token(
        &self,
        app: &ApplicationCredential,
        app_code: &str,
    ) -> Result<String, StarlineError> {
        let url = format!("{}/apiV3/application/getToken/", self.base_url);
        tracing::debug!("execute request: {}", url);

        let body: Value = self
            .http
            .get(&url)
            .query(&[
                ("appId", app.app_id.as_str()),
                ("secret", token_secret(&app.app_secret, app_code).as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;
        tracing::debug!(response = %body, "getToken response");

        desc_field(body, "token")
    }

    /// User session (slid) token, valid for about a year.
    ///
    /// Wrong credentials or frequent logins from one IP may make the vendor
    /// demand a captcha, which surfaces here as a vendor error.
    pub async fn request_user_token(
        &self,
        app_token: &str,
        login: &str,
        password: &str,
    ) -> Result<String, StarlineError> {
        let url = format!("{}/apiV3/user/login/", self.base_url);
        tracing::debug!("execute request: {}", url);

        let digest = password_digest(password);
        let body: Value = self
            .http
            .post(&url)
            .query(&[("token", app_token)])
            .form(&[("login", login), ("pass", digest.as_str())])
            .send()
            .await?
            .json()
            .await?;
        tracing::debug!(response = %body, "user login response");

        desc_field(body, "user_token")
    }

    /// Runs the full handshake and returns the user session token.
    pub async fn handshake(
        &self,
        app: &ApplicationCredential,
        login: &str,
        password: &str,
    ) -> Result<String, StarlineError> {
        let code = self.request_application_code(app).await?;
        tracing::debug!(code = %mask(&code), "application code received");

        let app_token = self.request_application_token(app, &code).await?;
        tracing::debug!(token = %mask(&app_token), "application token received");

        let user_token = self.request_user_token(&app_token, login, password).await?;
        tracing::info!(token = %mask(&user_token), "user session token minted");
        Ok(user_token)
    }
}
