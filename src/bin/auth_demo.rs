/// Example demonstrating the full session lifecycle against a live
/// redis: issue, verify, rotate, revoke.
///
/// ⚠️ Required for execution: redis reachable at the DSN below.
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use keepsake::application_impl::{JwtConfig, JwtHs256Codec, RealAuthService};
use keepsake::application_port::{AuthError, AuthService, TokenCodec};
use keepsake::domain_model::Identity;
use keepsake::domain_port::{BlacklistStore, SessionStore};
use keepsake::infra_redis::{RedisBlacklistStore, RedisSessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::new("auth_demo=debug,keepsake=debug");

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    // region prepare connection

    const REDIS_DSN: &str = "redis://127.0.0.1:6379";
    let redis_client = redis::Client::open(REDIS_DSN)?;
    let mut redis_manager = redis_client.get_connection_manager().await?;

    let pong: String = redis::cmd("PING").query_async(&mut redis_manager).await?;
    println!("PING -> {}", pong);

    // endregion

    // region initialization

    let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(JwtConfig {
        access_ttl: Duration::from_secs(3 * 60),            // 3 minutes
        refresh_ttl: Duration::from_secs(3 * 24 * 60 * 60), // 3 days
        signing_key: b"demo-signing-key-demo-signing-key".to_vec(),
    }));
    let session_store: Arc<dyn SessionStore> = Arc::new(RedisSessionStore::new(
        redis_manager.clone(),
        "session",
        3 * 24 * 60 * 60,
    ));
    let blacklist_store: Arc<dyn BlacklistStore> =
        Arc::new(RedisBlacklistStore::new(redis_manager, "blacklist"));

    let auth_service = RealAuthService::new(token_codec, session_store, blacklist_store);

    // endregion

    // use cases

    let identity = Identity::new("42", "USER");
    let tokens = auth_service.issue_session(identity.clone()).await?;
    tracing::debug!("issued: {:?}", tokens);

    let verified = auth_service.verify_token(&tokens.access_token.0).await?;
    tracing::debug!("verified subject: {}", verified.subject);

    // Wait a tick so the replacement token differs from the original.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let rotated = auth_service.reissue(&tokens.refresh_token.0).await?;
    tracing::debug!("rotated access token: {}", rotated.0);

    match auth_service.verify_token(&tokens.access_token.0).await {
        Err(AuthError::InvalidToken) => tracing::debug!("old access token is revoked"),
        other => tracing::warn!("unexpected result for the old token: {:?}", other),
    }
    let verified = auth_service.verify_token(&rotated.0).await?;
    tracing::debug!("rotated token verified for subject {}", verified.subject);

    auth_service.logout(&identity.subject).await?;
    match auth_service.verify_token(&rotated.0).await {
        Err(AuthError::InvalidToken) => tracing::debug!("logout revoked the access token"),
        other => tracing::warn!("unexpected result after logout: {:?}", other),
    }
    match auth_service.reissue(&tokens.refresh_token.0).await {
        Err(AuthError::InvalidToken) => tracing::debug!("logout revoked the refresh token"),
        other => tracing::warn!("unexpected result after logout: {:?}", other),
    }

    println!("session lifecycle complete");

    Ok(())
}
