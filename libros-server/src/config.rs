//! Server configuration, loaded from `LIBROS_*` environment variables.

use confique::Config;

#[derive(Debug, Config, Clone)]
pub struct AppConfig {
    /// Port the HTTP server listens on (default: 8080)
    #[config(env = "LIBROS_PORT", default = 8080)]
    pub port: u16,

    /// Confidential-client registration used for token mediation
    #[config(nested)]
    pub oauth: OAuthClientConfig,
}

/// Registration of this backend as a confidential OAuth2 client.
#[derive(Debug, Config, Clone)]
pub struct OAuthClientConfig {
    /// Client id registered at the authorization server
    #[config(env = "LIBROS_OAUTH_CLIENT_ID", default = "web-client")]
    pub client_id: String,

    /// Client secret. Held only here and inside the exchange mediator;
    /// never logged and never serialized into a response.
    #[config(env = "LIBROS_OAUTH_CLIENT_SECRET", default = "web-secret")]
    pub client_secret: String,

    /// Base URL of the authorization server (default: http://localhost:9000)
    #[config(
        env = "LIBROS_OAUTH_AUTHORIZATION_SERVER",
        default = "http://localhost:9000"
    )]
    pub authorization_server: String,
}

impl AppConfig {
    /// Loads configuration from the environment; every field has a default.
    pub fn new() -> Result<Self, confique::Error> {
        Self::builder().env().load()
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(auth_server: &wiremock::MockServer) -> Self {
        Self {
            port: 0,
            oauth: OAuthClientConfig {
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string(),
                authorization_server: auth_server.uri(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One combined test: parallel tests mutating the process environment
    // would race each other.
    #[test]
    fn defaults_apply_and_env_overrides_them() {
        for (name, _value) in std::env::vars() {
            if name.starts_with("LIBROS_") {
                std::env::remove_var(name);
            }
        }

        let config = AppConfig::new().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.oauth.client_id, "web-client");
        assert_eq!(config.oauth.client_secret, "web-secret");
        assert_eq!(config.oauth.authorization_server, "http://localhost:9000");

        std::env::set_var("LIBROS_PORT", "9090");
        std::env::set_var("LIBROS_OAUTH_CLIENT_ID", "spa-client");
        let config = AppConfig::new().unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.oauth.client_id, "spa-client");

        std::env::remove_var("LIBROS_PORT");
        std::env::remove_var("LIBROS_OAUTH_CLIENT_ID");
    }
}
