// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CORS policies for the REST and WebSocket route groups.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const REST_MAX_AGE: Duration = Duration::from_secs(86_400);
const WS_MAX_AGE: Duration = Duration::from_secs(300);

/// Policy for the REST routes: full CRUD method set, credentials allowed.
pub fn rest_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin_list(origins.iter().map(String::as_str)))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .allow_credentials(true)
        .max_age(REST_MAX_AGE)
}

/// Policy for the upgrade route. Also admits the `ws://`/`wss://` form of
/// each configured origin.
pub fn ws_layer(origins: &[String]) -> CorsLayer {
    let all = upgrade_origins(origins);
    CorsLayer::new()
        .allow_origin(origin_list(all.iter().map(String::as_str)))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::CONNECTION,
            header::UPGRADE,
            header::SEC_WEBSOCKET_KEY,
            header::SEC_WEBSOCKET_VERSION,
            header::SEC_WEBSOCKET_EXTENSIONS,
            header::SEC_WEBSOCKET_PROTOCOL,
        ])
        .expose_headers([header::SEC_WEBSOCKET_ACCEPT])
        .allow_credentials(true)
        .max_age(WS_MAX_AGE)
}

/// The configured origins followed by their WebSocket-scheme equivalents.
pub fn upgrade_origins(origins: &[String]) -> Vec<String> {
    let mut all = origins.to_vec();
    for origin in origins {
        let ws = if let Some(rest) = origin.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = origin.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            continue;
        };
        if !all.contains(&ws) {
            all.push(ws);
        }
    }
    all
}

fn origin_list<'a>(origins: impl Iterator<Item = &'a str>) -> AllowOrigin {
    let values: Vec<HeaderValue> = origins
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = o, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    fn origins() -> Vec<String> {
        vec![
            "http://localhost:3000".to_string(),
            "https://letusconnect.vercel.app".to_string(),
        ]
    }

    #[test]
    fn upgrade_origins_add_ws_schemes() {
        let all = upgrade_origins(&origins());
        assert_eq!(
            all,
            vec![
                "http://localhost:3000",
                "https://letusconnect.vercel.app",
                "ws://localhost:3000",
                "wss://letusconnect.vercel.app",
            ]
        );
    }

    #[test]
    fn upgrade_origins_skip_unknown_schemes() {
        let all = upgrade_origins(&["app://local".to_string()]);
        assert_eq!(all, vec!["app://local"]);
    }

    async fn preflight(layer: CorsLayer, origin: &str) -> axum::response::Response {
        let app = Router::new().route("/", get(|| async { "ok" })).layer(layer);
        app.oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/")
                .header("origin", origin)
                .header("access-control-request-method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn rest_preflight_allows_configured_origin() {
        let response = preflight(rest_layer(&origins()), "http://localhost:3000").await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(headers.get("access-control-max-age").unwrap(), "86400");
        assert_eq!(
            headers.get("access-control-allow-credentials").unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn rest_preflight_omits_unknown_origin() {
        let response = preflight(rest_layer(&origins()), "https://evil.example").await;
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn ws_preflight_uses_short_max_age() {
        let response = preflight(ws_layer(&origins()), "wss://letusconnect.vercel.app").await;
        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "wss://letusconnect.vercel.app"
        );
        assert_eq!(headers.get("access-control-max-age").unwrap(), "300");
    }
}
