//! Gateway configuration.
//! The backend base URL comes from the `TRIGON_BACKEND_URL` environment
//! variable (a `.env` file is honoured). An unset or unparsable value is
//! logged at construction time but is not fatal: every request then fails
//! with a configuration error instead.

use tracing::error;
use url::Url;

use trigon_common::{Error, Result};

pub const BACKEND_URL_ENV: &str = "TRIGON_BACKEND_URL";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    base_url: Option<Url>,
}

impl GatewayConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: Some(base_url),
        }
    }

    /// A config with no base URL; every request fails with a configuration
    /// error at call time.
    pub fn unconfigured() -> Self {
        Self { base_url: None }
    }

    /// Read the base URL from the environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = match std::env::var(BACKEND_URL_ENV) {
            Ok(raw) => match Url::parse(&raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    error!(value = %raw, error = %e, "{BACKEND_URL_ENV} is not a valid URL");
                    None
                }
            },
            Err(_) => {
                error!("{BACKEND_URL_ENV} not set; backend requests will fail");
                None
            }
        };
        Self { base_url }
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Resolve an endpoint path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| Error::Config(format!("{BACKEND_URL_ENV} not set")))?;
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| Error::Config(format!("bad endpoint URL {joined}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let cfg = GatewayConfig::new(Url::parse("http://backend.local/api/").unwrap());
        let url = cfg.endpoint("/evidence/triples").unwrap();
        assert_eq!(url.as_str(), "http://backend.local/api/evidence/triples");
    }

    #[test]
    fn test_missing_base_url_is_config_error() {
        let cfg = GatewayConfig::unconfigured();
        let err = cfg.endpoint("evidence/triples").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
