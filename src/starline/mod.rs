//! StarLine vendor API clients.
//!
//! - [`identity`]: one-shot handshake against StarLineID that mints the
//!   long-lived user session token (slid token).
//! - [`session`]: redeems the slid token for a short-lived `slnet` cookie and
//!   fetches device state, re-authenticating once on 401.
//!
//! Every identity response carries a `state` flag (`1` = success) with the
//! payload under `desc`. [`into_desc`] maps that convention onto a typed result.

use std::time::Duration;

use serde_json::Value;

use crate::errors::StarlineError;

pub mod identity;
pub mod session;

/// Per-request timeout for every vendor call.
pub const VENDOR_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_http_client() -> Result<reqwest::Client, StarlineError> {
    let client = reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(VENDOR_TIMEOUT)
        .connect_timeout(Duration::from_secs(5))
        .build()?;
    Ok(client)
}

/// Returns `desc` if `state == 1`, otherwise the whole body as a vendor error.
/// `state` may arrive as an integer, a float or a numeric string.
pub fn into_desc(body: Value) -> Result<Value, StarlineError> {
    let success = match body.get("state") {
        Some(Value::Number(n)) => n.as_i64() == Some(1) || n.as_f64() == Some(1.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().is_ok_and(|v| v == 1.0),
        _ => false,
    };

    if !success {
        return Err(StarlineError::Vendor(body));
    }

    match body.get("desc") {
        Some(desc) => Ok(desc.clone()),
        None => Err(StarlineError::Vendor(body)),
    }
}

/// Pulls a string field out of a successful `desc`. A missing field is a
/// vendor error carrying the raw body.
pub(crate) fn desc_field(body: Value, field: &str) -> Result<String, StarlineError> {
    let desc = into_desc(body.clone())?;
    match desc.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(StarlineError::Vendor(body)),
    }
}

/// Masks a secret for log output: first and last four characters only.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    } else {
        "****".to_string()
    }
}
