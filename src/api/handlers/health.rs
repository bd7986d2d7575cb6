use crate::{api::state::ConsoleState, GIT_COMMIT_HASH};
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info_span, Instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    identity_provider: String,
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Identity provider realm is reachable", body = [Health]),
        (status = 503, description = "Identity provider realm is unreachable", body = [Health])
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(method: Method, state: Extension<Arc<ConsoleState>>) -> impl IntoResponse {
    let ping_span = info_span!("idp.ping", realm = state.provider().config().realm());
    let result = state.provider().ping().instrument(ping_span).await;

    if let Err(err) = &result {
        error!("Failed to reach identity provider: {}", err);
    }

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        identity_provider: if result.is_ok() {
            "ok".to_string()
        } else {
            "error".to_string()
        },
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();

            headers.insert("X-App", x_app_header_value);

            headers
        })
        .map_err(|err| {
            error!("Failed to parse X-App header: {}", err);
        });

    let headers = headers.unwrap_or_else(|()| HeaderMap::new());

    let status = if result.is_ok() {
        debug!("Identity provider is reachable");
        StatusCode::OK
    } else {
        debug!("Identity provider is unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, headers, body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        api::state::ConsoleConfig,
        idp::{ProviderClient, ProviderConfig},
    };
    use axum::body::to_bytes;
    use secrecy::SecretString;
    use std::net::TcpListener;
    use url::Url;
    use wiremock::matchers::{method as http_method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn state_for(base: &str) -> Extension<Arc<ConsoleState>> {
        let config = ProviderConfig::new(
            Url::parse(base).unwrap(),
            SecretString::from("secret".to_string()),
            "admin-cli".to_string(),
            SecretString::from("admin-secret".to_string()),
        );
        let provider = ProviderClient::new(config).unwrap();
        Extension(Arc::new(ConsoleState::new(provider, ConsoleConfig::new())))
    }

    #[tokio::test]
    async fn healthy_when_discovery_document_loads() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(http_method("GET"))
            .and(path("/realms/bhs-realm/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let response = health(Method::GET, state_for(&server.uri()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("X-App"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Health = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.identity_provider, "ok");
        assert_eq!(body.name, env!("CARGO_PKG_NAME"));
    }

    #[tokio::test]
    async fn unavailable_when_realm_is_missing() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(http_method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let response = health(Method::HEAD, state_for(&server.uri()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}
