//! Configuration module
//!
//! Configuration is read once at process start and passed by reference into the
//! storage backend and the tool handlers. Every required value is checked up front
//! so a misconfigured process fails at startup instead of on the first request.

use std::env;
use std::fmt;

use crate::constants::DEFAULT_HTTP_PORT;

/// Credentials and addressing for the R2 bucket
#[derive(Clone)]
pub struct R2Config {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    /// Public base URL, without trailing slash
    pub public_url: String,
    /// Custom endpoint for S3-compatible providers (MinIO, local R2 emulators)
    pub endpoint: Option<String>,
}

impl fmt::Debug for R2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("R2Config")
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .field("public_url", &self.public_url)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl R2Config {
    /// Endpoint URL for the S3 API: the override when set, the account endpoint otherwise.
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.r2.cloudflarestorage.com", self.account_id),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub r2: R2Config,
    pub server_port: u16,
    pub domain: String,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, anyhow::Error> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} must be set", key))
        };

        let r2 = R2Config {
            account_id: required("R2_ACCOUNT_ID")?,
            access_key_id: required("R2_ACCESS_KEY_ID")?,
            secret_access_key: required("R2_SECRET_ACCESS_KEY")?,
            bucket_name: required("R2_BUCKET_NAME")?,
            public_url: required("R2_PUBLIC_URL")?
                .trim_end_matches('/')
                .to_string(),
            endpoint: lookup("R2_ENDPOINT").filter(|v| !v.trim().is_empty()),
        };

        let server_port = lookup("PORT")
            .map(|p| p.parse::<u16>())
            .transpose()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?
            .unwrap_or(DEFAULT_HTTP_PORT);

        let config = Config {
            r2,
            server_port,
            domain: lookup("MCP_DOMAIN").unwrap_or_else(|| "localhost".to_string()),
            environment: lookup("ENVIRONMENT")
                .or_else(|| lookup("NODE_ENV"))
                .unwrap_or_else(|| "development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let public_url = url::Url::parse(&self.r2.public_url)
            .map_err(|e| anyhow::anyhow!("R2_PUBLIC_URL must be a valid URL: {}", e))?;
        if public_url.scheme() != "http" && public_url.scheme() != "https" {
            return Err(anyhow::anyhow!(
                "R2_PUBLIC_URL must use http or https, got {}",
                public_url.scheme()
            ));
        }

        if let Some(ref endpoint) = self.r2.endpoint {
            url::Url::parse(endpoint)
                .map_err(|e| anyhow::anyhow!("R2_ENDPOINT must be a valid URL: {}", e))?;
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
