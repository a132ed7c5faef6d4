use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::config::AppConfig;
use crate::exchange::TokenExchangeMediator;
use crate::gateway::ResourceGateway;
use crate::store::BookStore;
use crate::verifier::{RemoteJwksVerifier, TokenVerifier};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<ResourceGateway>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub exchange: Arc<TokenExchangeMediator>,
}

impl AppState {
    fn create_auth_server_client() -> Client {
        Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .expect("failed to build authorization server client")
    }

    pub fn new(config: AppConfig) -> Result<Self, std::io::Error> {
        let exchange = TokenExchangeMediator::new(&config.oauth).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid authorization server URL: {e}"),
            )
        })?;
        let verifier = RemoteJwksVerifier::new(
            Self::create_auth_server_client(),
            &config.oauth.authorization_server,
        );

        Ok(Self {
            config: Arc::new(config),
            gateway: Arc::new(ResourceGateway::new(Arc::new(
                BookStore::with_sample_catalog(),
            ))),
            verifier: Arc::new(verifier),
            exchange: Arc::new(exchange),
        })
    }

    #[cfg(test)]
    pub fn for_testing(
        config: AppConfig,
        store: Arc<BookStore>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        let exchange = TokenExchangeMediator::new(&config.oauth)
            .expect("test configuration carries a valid authorization server URL");
        Self {
            config: Arc::new(config),
            gateway: Arc::new(ResourceGateway::new(store)),
            verifier,
            exchange: Arc::new(exchange),
        }
    }
}
