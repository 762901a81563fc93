//! Runtime configuration for the bridge server.
//!
//! Host and port may come from `server.toml` or the environment; the three
//! secrets are environment-only and required. A missing secret fails startup
//! before the listener binds — running unauthenticated is not an option.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Shared secret callers must present as a bearer token.
    pub auth_token: String,
    /// Base URL of the CMS, also used for admin deep links in tool output.
    pub cms_base_url: String,
    /// Bearer token the bridge presents to the CMS external API.
    pub cms_token: String,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

impl ServerConfig {
    pub fn load() -> anyhow::Result<Self> {
        let (host, port) = match load_from_file()? {
            Some(file) => (file.server.host, file.server.port),
            None => (
                env::var("DRAFTFLOW_SERVER_HOST").unwrap_or_else(|_| default_host()),
                env::var("DRAFTFLOW_SERVER_PORT")
                    .ok()
                    .and_then(|value| value.parse::<u16>().ok())
                    .unwrap_or_else(default_port),
            ),
        };

        Ok(Self {
            host,
            port,
            auth_token: require_env("DRAFTFLOW_AUTH_TOKEN")?,
            cms_base_url: require_env("DRAFTFLOW_CMS_BASE_URL")?,
            cms_token: require_env("DRAFTFLOW_CMS_TOKEN")?,
        })
    }
}

fn require_env(name: &str) -> anyhow::Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => anyhow::bail!("{} environment variable is required", name),
    }
}

fn load_from_file() -> anyhow::Result<Option<FileConfig>> {
    let config_path = env::var("DRAFTFLOW_SERVER_CONFIG").ok();
    let path = if let Some(path) = config_path {
        Some(path)
    } else if Path::new("server.toml").exists() {
        Some("server.toml".to_string())
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(None);
    };

    let contents = fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("Failed to read config {}: {}", path, err))?;
    let parsed: FileConfig = toml::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("Failed to parse config {}: {}", path, err))?;
    Ok(Some(parsed))
}
