use super::error::*;
use super::handler;
use crate::application_port::AuthService;
use crate::domain_model::Identity;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let reissue = warp::post()
        .and(warp::path("auth"))
        .and(warp::path("reissue"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::reissue);

    let logout = warp::get()
        .and(warp::path("auth"))
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.auth_service.clone()))
        .and_then(handler::logout);

    let me = warp::get()
        .and(warp::path("auth"))
        .and(warp::path("me"))
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and_then(handler::me);

    reissue.or(logout).or(me)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Extracts the caller's identity when a bearer token is present. A
/// missing header, or one without the `Bearer` scheme, passes through as
/// unauthenticated; each route decides whether that is acceptable.
fn with_authentication(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (Option<Identity>,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>(http::header::AUTHORIZATION.as_ref()).and_then(
        move |header: Option<String>| {
            let auth_service = auth_service.clone();
            async move {
                let token = header
                    .as_deref()
                    .and_then(|h| h.strip_prefix("Bearer "))
                    .filter(|t| !t.is_empty());
                match token {
                    Some(token) => {
                        let identity = auth_service
                            .verify_token(token)
                            .await
                            .map_err(ApiErrorCode::from)
                            .map_err(reject::custom)?;
                        Ok::<_, warp::Rejection>(Some(identity))
                    }
                    None => Ok(None),
                }
            }
        },
    )
}

fn with_verification(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (Identity,), Error = warp::Rejection> + Clone {
    with_authentication(auth_service).and_then(|identity: Option<Identity>| async move {
        identity.ok_or_else(|| reject::custom(ApiErrorCode::Unauthorized))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::{JwtConfig, JwtHs256Codec, RealAuthService};
    use crate::application_port::AuthTokens;
    use crate::infra_memory::{MemoryBlacklistStore, MemorySessionStore};
    use std::time::Duration;

    fn test_server() -> Arc<Server> {
        let codec = Arc::new(JwtHs256Codec::new(JwtConfig {
            access_ttl: Duration::from_secs(3 * 60),
            refresh_ttl: Duration::from_secs(3 * 24 * 60 * 60),
            signing_key: b"router-test-signing-key".to_vec(),
        }));
        let session_store = Arc::new(MemorySessionStore::new(Duration::from_secs(
            3 * 24 * 60 * 60,
        )));
        let blacklist_store = Arc::new(MemoryBlacklistStore::new());
        Arc::new(Server {
            auth_service: Arc::new(RealAuthService::new(codec, session_store, blacklist_store)),
        })
    }

    async fn login(server: &Arc<Server>) -> AuthTokens {
        server
            .auth_service
            .issue_session(Identity::new("42", "USER"))
            .await
            .unwrap()
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn me_requires_authentication() {
        let filter = routes(test_server()).recover(recover_error);

        let res = warp::test::request()
            .method("GET")
            .path("/auth/me")
            .reply(&filter)
            .await;

        assert_eq!(res.status(), 401);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["error"]["code"], "Unauthorized");
    }

    #[tokio::test]
    async fn non_bearer_header_is_unauthenticated() {
        let filter = routes(test_server()).recover(recover_error);

        let res = warp::test::request()
            .method("GET")
            .path("/auth/me")
            .header("authorization", "Basic dXNlcjpwdw==")
            .reply(&filter)
            .await;

        assert_eq!(res.status(), 401);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["error"]["code"], "Unauthorized");
    }

    #[tokio::test]
    async fn me_returns_the_identity_behind_the_token() {
        let server = test_server();
        let tokens = login(&server).await;
        let filter = routes(server).recover(recover_error);

        let res = warp::test::request()
            .method("GET")
            .path("/auth/me")
            .header("authorization", bearer(&tokens.access_token.0))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["subject"], "42");
        assert_eq!(body["data"]["role"], "USER");
    }

    #[tokio::test]
    async fn forged_token_is_rejected() {
        let server = test_server();
        let tokens = login(&server).await;
        // Flip the signature tail so it no longer verifies.
        let forged = format!("{}x", tokens.access_token.0);
        let filter = routes(server).recover(recover_error);

        let res = warp::test::request()
            .method("GET")
            .path("/auth/me")
            .header("authorization", bearer(&forged))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), 401);
    }

    #[tokio::test]
    async fn reissue_returns_a_new_access_token() {
        let server = test_server();
        let tokens = login(&server).await;
        let filter = routes(server).recover(recover_error);

        let res = warp::test::request()
            .method("POST")
            .path("/auth/reissue")
            .json(&serde_json::json!({ "refreshToken": tokens.refresh_token.0 }))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert!(body["data"]["accessToken"].is_string());
    }

    #[tokio::test]
    async fn reissue_rejects_an_unknown_token() {
        let filter = routes(test_server()).recover(recover_error);

        let res = warp::test::request()
            .method("POST")
            .path("/auth/reissue")
            .json(&serde_json::json!({ "refreshToken": "not-a-token" }))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), 401);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["error"]["code"], "InvalidToken");
    }

    #[tokio::test]
    async fn reissue_rejects_a_malformed_body() {
        let filter = routes(test_server()).recover(recover_error);

        let res = warp::test::request()
            .method("POST")
            .path("/auth/reissue")
            .json(&serde_json::json!({}))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), 400);
    }

    #[tokio::test]
    async fn logout_revokes_the_session() {
        let server = test_server();
        let tokens = login(&server).await;
        let filter = routes(server).recover(recover_error);

        let res = warp::test::request()
            .method("GET")
            .path("/auth/logout")
            .header("authorization", bearer(&tokens.access_token.0))
            .reply(&filter)
            .await;
        assert_eq!(res.status(), 200);
        assert!(res.body().is_empty());

        // Both halves of the pair are dead now.
        let res = warp::test::request()
            .method("GET")
            .path("/auth/me")
            .header("authorization", bearer(&tokens.access_token.0))
            .reply(&filter)
            .await;
        assert_eq!(res.status(), 401);

        let res = warp::test::request()
            .method("POST")
            .path("/auth/reissue")
            .json(&serde_json::json!({ "refreshToken": tokens.refresh_token.0 }))
            .reply(&filter)
            .await;
        assert_eq!(res.status(), 401);
    }
}
