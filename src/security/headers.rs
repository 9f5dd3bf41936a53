//! Security response headers.
//!
//! # Responsibilities
//! - Add `X-Content-Type-Options`, `X-Frame-Options`, `X-XSS-Protection`
//!   to every response
//!
//! # Design Decisions
//! - Installed as the outermost layer, so 401/404/405/408/413 carry them too
//! - Overriding: a handler cannot weaken them

use axum::{
    http::{
        header::{X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION},
        HeaderName, HeaderValue,
    },
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::SecurityConfig;

/// Header pairs applied to every response.
pub const SECURITY_HEADERS: [(HeaderName, &str); 3] = [
    (X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (X_FRAME_OPTIONS, "DENY"),
    (X_XSS_PROTECTION, "1; mode=block"),
];

/// Wrap a router with the security header layers when enabled.
pub fn apply(router: Router, config: &SecurityConfig) -> Router {
    if !config.enable_headers {
        return router;
    }

    SECURITY_HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(
                name,
                HeaderValue::from_static(value),
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    #[tokio::test]
    async fn headers_present_on_unmatched_routes() {
        let app = apply(
            Router::new().route("/ok", get(|| async { "ok" })),
            &SecurityConfig::default(),
        );

        let res = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers()[X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(res.headers()[X_FRAME_OPTIONS], "DENY");
        assert_eq!(res.headers()[X_XSS_PROTECTION], "1; mode=block");
    }

    #[tokio::test]
    async fn disabled_leaves_responses_untouched() {
        let config = SecurityConfig {
            enable_headers: false,
            ..SecurityConfig::default()
        };
        let app = apply(Router::new().route("/ok", get(|| async { "ok" })), &config);

        let res = app
            .oneshot(Request::get("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(res.headers().get(X_FRAME_OPTIONS).is_none());
    }
}
