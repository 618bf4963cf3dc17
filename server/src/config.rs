//! Process configuration, read once from the environment at start-up.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URI: &str = "memory://";
const DEFAULT_FOLDER: &str = "wardrobe";
const DEFAULT_IMAGE_API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("HOST must be an IP address, got {0:?}")]
    InvalidHost(String),
}

/// Image host credentials and target folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHostConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub api_base: String,
}

impl ImageHostConfig {
    pub fn has_credentials(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_uri: String,
    pub image_host: ImageHostConfig,
    /// Base URL clients use to reach `/api/`, always ending in a slash.
    pub public_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let host: IpAddr = match get("HOST") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidHost(raw))?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        let bind_addr = SocketAddr::new(host, port);

        let mut public_api_url = get("API_URL").unwrap_or_else(|| format!("http://{bind_addr}/api/"));
        if !public_api_url.ends_with('/') {
            public_api_url.push('/');
        }

        Ok(Self {
            bind_addr,
            database_uri: get("DATABASE_URI").unwrap_or_else(|| DEFAULT_DATABASE_URI.to_string()),
            image_host: ImageHostConfig {
                cloud_name: get("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
                api_key: get("CLOUDINARY_API_KEY").unwrap_or_default(),
                api_secret: get("CLOUDINARY_API_SECRET").unwrap_or_default(),
                folder: get("CLOUDINARY_FOLDER").unwrap_or_else(|| DEFAULT_FOLDER.to_string()),
                api_base: get("CLOUDINARY_API_BASE").unwrap_or_else(|| DEFAULT_IMAGE_API_BASE.to_string()),
            },
            public_api_url,
        })
    }
}
