use crate::application_port::*;
use crate::domain_model::Identity;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub signing_key: Vec<u8>,
}

pub struct JwtHs256Codec {
    cfg: JwtConfig,
}

impl JwtHs256Codec {
    pub fn new(cfg: JwtConfig) -> Self {
        JwtHs256Codec { cfg }
    }
}

pub(crate) fn claims_for(
    identity: &Identity,
    iat: DateTime<Utc>,
    exp: DateTime<Utc>,
) -> TokenClaims {
    TokenClaims {
        sub: identity.subject.clone(),
        role: identity.role.clone(),
        iat: iat.timestamp(),
        exp: exp.timestamp(),
    }
}

pub(crate) fn encode_claims(claims: &TokenClaims, signing_key: &[u8]) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| AuthError::InternalError(e.to_string()))
}

// Signature check only. Expiry is the caller's business, so an expired
// token still yields its claims.
fn decode_claims(token: &str, signing_key: &[u8]) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(signing_key), &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::MalformedToken,
        })?;
    Ok(data.claims)
}

#[async_trait::async_trait]
impl TokenCodec for JwtHs256Codec {
    async fn issue_access_token(
        &self,
        identity: &Identity,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError> {
        let iat = Utc::now();
        let exp = iat + self.cfg.access_ttl;
        let token = encode_claims(&claims_for(identity, iat, exp), &self.cfg.signing_key)?;
        Ok((AccessToken(token), exp))
    }

    async fn issue_refresh_token(
        &self,
        identity: &Identity,
    ) -> Result<(RefreshToken, DateTime<Utc>), AuthError> {
        let iat = Utc::now();
        let exp = iat + self.cfg.refresh_ttl;
        let token = encode_claims(&claims_for(identity, iat, exp), &self.cfg.signing_key)?;
        Ok((RefreshToken(token), exp))
    }

    async fn parse(&self, token: &str) -> Result<ParsedToken, AuthError> {
        let claims = decode_claims(token, &self.cfg.signing_key)?;
        let expired = claims.expires_at() <= Utc::now();
        Ok(ParsedToken { claims, expired })
    }

    async fn is_valid(&self, token: &str) -> Result<bool, AuthError> {
        if token.is_empty() {
            return Ok(false);
        }
        let parsed = self.parse(token).await?;
        Ok(!parsed.expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as TimeDelta;

    const KEY: &[u8] = b"codec-test-signing-key";

    fn test_codec() -> JwtHs256Codec {
        JwtHs256Codec::new(JwtConfig {
            access_ttl: Duration::from_secs(3 * 60),
            refresh_ttl: Duration::from_secs(3 * 24 * 60 * 60),
            signing_key: KEY.to_vec(),
        })
    }

    fn identity() -> Identity {
        Identity::new("42", "USER")
    }

    #[tokio::test]
    async fn issued_tokens_validate_immediately() {
        let codec = test_codec();
        let (access, _) = codec.issue_access_token(&identity()).await.unwrap();
        let (refresh, _) = codec.issue_refresh_token(&identity()).await.unwrap();

        assert!(codec.is_valid(&access.0).await.unwrap());
        assert!(codec.is_valid(&refresh.0).await.unwrap());
    }

    #[tokio::test]
    async fn expired_token_still_parses() {
        let codec = test_codec();
        let iat = Utc::now() - TimeDelta::minutes(10);
        let exp = iat + TimeDelta::minutes(3);
        let token = encode_claims(&claims_for(&identity(), iat, exp), KEY).unwrap();

        assert!(!codec.is_valid(&token).await.unwrap());

        let parsed = codec.parse(&token).await.unwrap();
        assert!(parsed.expired);
        assert_eq!(parsed.claims.sub, "42");
        assert_eq!(parsed.claims.role, "USER");
    }

    #[tokio::test]
    async fn empty_token_is_invalid() {
        let codec = test_codec();
        assert!(!codec.is_valid("").await.unwrap());
    }

    #[tokio::test]
    async fn undecodable_token_is_malformed() {
        let codec = test_codec();
        assert!(matches!(
            codec.parse("not-a-token").await,
            Err(AuthError::MalformedToken)
        ));
        assert!(matches!(
            codec.is_valid("not-a-token").await,
            Err(AuthError::MalformedToken)
        ));
    }

    #[tokio::test]
    async fn foreign_signature_is_rejected() {
        let codec = test_codec();
        let iat = Utc::now();
        let claims = claims_for(&identity(), iat, iat + TimeDelta::minutes(3));
        let forged = encode_claims(&claims, b"some-other-key").unwrap();

        assert!(matches!(
            codec.parse(&forged).await,
            Err(AuthError::InvalidSignature)
        ));
    }

    #[tokio::test]
    async fn claims_carry_the_identity_and_expiry() {
        let codec = test_codec();
        let (access, exp) = codec.issue_access_token(&identity()).await.unwrap();

        let parsed = codec.parse(&access.0).await.unwrap();
        assert!(!parsed.expired);
        assert_eq!(parsed.claims.identity(), identity());
        assert_eq!(parsed.claims.exp, exp.timestamp());
    }
}
