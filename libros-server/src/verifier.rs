use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use libros_policy::ClaimSet;
use log::debug;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("token rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("failed to fetch signing keys: {0}")]
    Jwks(#[from] reqwest::Error),

    #[error("no published signing key matches key id {0:?}")]
    UnknownKeyId(Option<String>),
}

/// Validates a bearer token and hands back its claim set.
///
/// This is the only place signature, issuer and expiry are checked; every
/// component downstream trusts the claim set it receives.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<ClaimSet, VerifyError>;
}

/// Verifier backed by the authorization server's published JWK set.
///
/// Keys are fetched lazily from `{base}/oauth2/jwks` and cached for the
/// process lifetime; an unknown key id triggers one refetch to pick up
/// rotated keys before the token is rejected.
pub struct RemoteJwksVerifier {
    client: reqwest::Client,
    jwks_url: String,
    issuer: String,
    keys: RwLock<Option<JwkSet>>,
}

impl RemoteJwksVerifier {
    pub fn new(client: reqwest::Client, authorization_server: &str) -> Self {
        let base = authorization_server.trim_end_matches('/');
        Self {
            client,
            jwks_url: format!("{base}/oauth2/jwks"),
            issuer: base.to_owned(),
            keys: RwLock::new(None),
        }
    }

    async fn fetch_keys(&self) -> Result<JwkSet, VerifyError> {
        debug!("Fetching signing keys from {}", self.jwks_url);
        let keys = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        *self.keys.write().await = Some(keys.clone());
        Ok(keys)
    }

    async fn decoding_key_for(&self, kid: Option<&str>) -> Result<DecodingKey, VerifyError> {
        if let Some(keys) = self.keys.read().await.clone() {
            if let Some(jwk) = select_key(&keys, kid) {
                return Ok(DecodingKey::from_jwk(jwk)?);
            }
        }

        // Cache miss or rotated key: refetch once before rejecting.
        let keys = self.fetch_keys().await?;
        match select_key(&keys, kid) {
            Some(jwk) => Ok(DecodingKey::from_jwk(jwk)?),
            None => Err(VerifyError::UnknownKeyId(kid.map(str::to_owned))),
        }
    }
}

fn select_key<'a>(keys: &'a JwkSet, kid: Option<&str>) -> Option<&'a Jwk> {
    match kid {
        Some(kid) => keys.find(kid),
        None => keys.keys.first(),
    }
}

#[async_trait]
impl TokenVerifier for RemoteJwksVerifier {
    async fn verify(&self, token: &str) -> Result<ClaimSet, VerifyError> {
        let header = decode_header(token)?;
        let key = self.decoding_key_for(header.kid.as_deref()).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_aud = false;

        let data = decode::<ClaimSet>(token, &key, &validation)?;
        Ok(data.claims)
    }
}
