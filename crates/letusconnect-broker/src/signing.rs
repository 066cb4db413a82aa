// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request signing for the Pusher HTTP API.
//!
//! The signature is the hex HMAC-SHA256 of `METHOD\nPATH\nQUERY`, where QUERY
//! is the `auth_*` and `body_md5` parameters sorted by key and joined as
//! `k=v&k=v`. It is sent as the `auth_signature` query parameter.

use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;

use letusconnect_core::ConnectError;

const AUTH_VERSION: &str = "1.0";

/// Lowercase hex MD5 of the request body.
pub fn body_md5(body: &[u8]) -> String {
    hex::encode(Md5::digest(body))
}

/// Build the fully signed query parameter list for a request.
pub fn signed_query(
    key: &str,
    secret: &str,
    method: &str,
    path: &str,
    timestamp: i64,
    body: &[u8],
) -> Result<Vec<(String, String)>, ConnectError> {
    let mut params = vec![
        ("auth_key".to_string(), key.to_string()),
        ("auth_timestamp".to_string(), timestamp.to_string()),
        ("auth_version".to_string(), AUTH_VERSION.to_string()),
        ("body_md5".to_string(), body_md5(body)),
    ];
    params.sort();

    let query = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let signature = hmac_hex(secret, &format!("{method}\n{path}\n{query}"))?;

    params.push(("auth_signature".to_string(), signature));
    Ok(params)
}

fn hmac_hex(secret: &str, message: &str) -> Result<String, ConnectError> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|e| ConnectError::Broker {
            message: format!("invalid signing key: {e}"),
            source: None,
        })?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
