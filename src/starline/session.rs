//! Vendor session client.
//!
//! Holds the long-lived slid token and, once authenticated, the short-lived
//! `slnet` cookie plus user id. The cookie pair lives only in memory and is
//! rebuilt lazily on first use in each process.

use reqwest::StatusCode;
use serde_json::{json, Value};

use super::{build_http_client, mask};
use crate::errors::StarlineError;

const SESSION_COOKIE: &str = "slnet";

/// Cookie / user id pair obtained from `auth.slid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSession {
    pub slnet: String,
    pub user_id: String,
}

pub struct SessionClient {
    http: reqwest::Client,
    api_url: String,
    slid_token: String,
    session: Option<VendorSession>,
}

impl SessionClient {
    pub fn new(api_url: impl Into<String>, slid_token: impl Into<String>) -> Result<Self, StarlineError> {
        Ok(Self {
            http: build_http_client()?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            slid_token: slid_token.into(),
            session: None,
        })
    }

    /// Current session, or `None` while unauthenticated.
    pub fn session(&self) -> Option<&VendorSession> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Exchanges the slid token for a fresh `slnet` cookie and user id.
    ///
    /// On failure the previously held session, if any, is left in place.
    /// The auth endpoint may start demanding a captcha if called too often.
    pub async fn authenticate(&mut self) -> Result<&VendorSession, StarlineError> {
        let url = format!("{}/json/v2/auth.slid", self.api_url);
        tracing::debug!("execute request: {}", url);

        let resp = self
            .http
            .post(&url)
            .json(&json!({ "slid_token": self.slid_token }))
            .send()
            .await
            .map_err(|e| StarlineError::Auth(e.to_string()))?
            .error_for_status()
            .map_err(|e| StarlineError::Auth(e.to_string()))?;

        let slnet = resp
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());

        let body: Value = resp
            .json()
            .await
            .map_err(|e| StarlineError::Auth(format!("invalid auth response: {}", e)))?;
        let user_id = match body.get("user_id") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let (slnet, user_id) = match (slnet, user_id) {
            (Some(slnet), Some(user_id)) => (slnet, user_id),
            _ => {
                return Err(StarlineError::Auth(
                    "failed to get slnet token or user_id".to_string(),
                ))
            }
        };

        tracing::debug!(user_id = %user_id, slnet = %mask(&slnet), "StarLine authentication was successful");
        let session = self.session.insert(VendorSession { slnet, user_id });
        Ok(&*session)
    }

    /// Fetches the full device state for the authenticated user.
    ///
    /// Authenticates first if needed. A 401 triggers exactly one
    /// re-authentication and one retry; a second failure is returned as is.
    pub async fn fetch_device_data(&mut self) -> Result<Value, StarlineError> {
        let session = match self.session.clone() {
            Some(session) => session,
            None => self.authenticate().await?.clone(),
        };

        let mut resp = self.get_device_data(&session).await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("slnet token expired, re-authenticating...");
            let session = self.authenticate().await?.clone();
            resp = self.get_device_data(&session).await?;
        }

        let status = resp.status();
        if !status.is_success() {
            return Err(StarlineError::Fetch(format!("device data returned {}", status)));
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| StarlineError::Fetch(format!("invalid device data: {}", e)))?;
        tracing::debug!("User data has been successfully received");
        Ok(data)
    }

    async fn get_device_data(&self, session: &VendorSession) -> Result<reqwest::Response, StarlineError> {
        let url = format!("{}/json/v3/user/{}/data", self.api_url, session.user_id);
        tracing::debug!("execute request: {}", url);

        self.http
            .get(&url)
            .header(reqwest::header::COOKIE, format!("{}={}", SESSION_COOKIE, session.slnet))
            .send()
            .await
            .map_err(|e| StarlineError::Fetch(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_is_unauthenticated() {
        let client = SessionClient::new("http://localhost/", "token:1").unwrap();
        assert!(!client.is_authenticated());
        assert!(client.session().is_none());
        assert_eq!(client.api_url, "http://localhost");
    }
}
