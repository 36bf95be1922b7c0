use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::sync::Arc;
use std::time::Duration;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let auth_service: Arc<dyn AuthService> = match settings.auth.backend.as_str() {
            "fake" => Arc::new(FakeAuthService::new()),
            "memory" => {
                let session_store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(
                    Duration::from_secs(settings.auth.session_ttl_secs),
                ));
                let blacklist_store: Arc<dyn BlacklistStore> =
                    Arc::new(MemoryBlacklistStore::new());
                Arc::new(RealAuthService::new(
                    token_codec(settings)?,
                    session_store,
                    blacklist_store,
                ))
            }
            "redis" => {
                let redis_client = redis::Client::open(settings.redis.url.as_str())?;
                let redis_manager = redis_client.get_connection_manager().await?;
                let session_store: Arc<dyn SessionStore> = Arc::new(RedisSessionStore::new(
                    redis_manager.clone(),
                    settings.redis.session_prefix.clone(),
                    settings.auth.session_ttl_secs,
                ));
                let blacklist_store: Arc<dyn BlacklistStore> = Arc::new(RedisBlacklistStore::new(
                    redis_manager,
                    settings.redis.blacklist_prefix.clone(),
                ));
                Arc::new(RealAuthService::new(
                    token_codec(settings)?,
                    session_store,
                    blacklist_store,
                ))
            }
            other => return Err(anyhow::anyhow!("Unknown auth backend: {}", other)),
        };

        info!("server started");

        Ok(Self { auth_service })
    }
}

// The signing secret is base64; decode it once at startup. It is never
// reloaded while the process runs.
fn token_codec(settings: &Settings) -> anyhow::Result<Arc<dyn TokenCodec>> {
    let secret = std::env::var("JWT_SIGNING_KEY").unwrap_or_else(|_| settings.auth.secret.clone());
    let signing_key = BASE64
        .decode(secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("JWT signing secret is not valid base64: {}", e))?;
    Ok(Arc::new(JwtHs256Codec::new(JwtConfig {
        access_ttl: Duration::from_secs(settings.auth.access_ttl_secs),
        refresh_ttl: Duration::from_secs(settings.auth.refresh_ttl_secs),
        signing_key,
    })))
}
