//! Application configuration.
//!
//! Loaded once at startup from a TOML file (every field optional), then
//! overridden by `SITEKIT_*` environment variables.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;
use sitekit_toolbox::{DEFAULT_USER_AGENT, ToolboxOptions};

pub const CONFIG_PATH_ENV: &str = "SITEKIT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub toolbox: ToolboxConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads; `0` means one per CPU.
    pub workers: usize,
    /// Upper bound for JSON and form bodies.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            workers: 0,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// The single origin allowed cross-origin access; `"*"` allows any.
    pub allow_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "https://www.codersikarwar.site".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolboxConfig {
    pub dns_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub manifest_timeout_secs: u64,
    pub whois_timeout_secs: u64,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Upstream DNS servers; empty uses the system resolver configuration.
    pub nameservers: Vec<IpAddr>,
    /// JSON TLD → server map replacing the embedded one.
    pub whois_servers_file: Option<PathBuf>,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            dns_timeout_secs: 5,
            http_timeout_secs: 10,
            manifest_timeout_secs: 5,
            whois_timeout_secs: 10,
            max_redirects: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            nameservers: Vec::new(),
            whois_servers_file: None,
        }
    }
}

impl ToolboxConfig {
    /// Convert into service options, reading the WHOIS server file if set.
    pub fn to_options(&self) -> anyhow::Result<ToolboxOptions> {
        let whois_servers = match &self.whois_servers_file {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("reading WHOIS server map {}", path.display()))?,
            ),
            None => None,
        };
        Ok(ToolboxOptions {
            dns_timeout: Duration::from_secs(self.dns_timeout_secs),
            http_timeout: Duration::from_secs(self.http_timeout_secs),
            manifest_timeout: Duration::from_secs(self.manifest_timeout_secs),
            whois_timeout: Duration::from_secs(self.whois_timeout_secs),
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.clone(),
            nameservers: self.nameservers.clone(),
            whois_servers,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    /// Directory for daily-rotated log files; stdout only when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            directory: None,
        }
    }
}

impl AppConfig {
    /// Load from `$SITEKIT_CONFIG` (must exist) or `./config.toml` (optional),
    /// apply environment overrides and validate.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `SITEKIT_HOST`, `SITEKIT_PORT`, `SITEKIT_CORS_ORIGIN` and
    /// `SITEKIT_LOG_LEVEL` from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(host) = lookup("SITEKIT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SITEKIT_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("SITEKIT_PORT is not a valid port: {port}"))?;
        }
        if let Some(origin) = lookup("SITEKIT_CORS_ORIGIN") {
            self.cors.allow_origin = origin;
        }
        if let Some(level) = lookup("SITEKIT_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            bail!("server.port cannot be 0");
        }
        if self.server.max_body_bytes == 0 {
            bail!("server.max_body_bytes cannot be 0");
        }
        let t = &self.toolbox;
        for (name, secs) in [
            ("dns_timeout_secs", t.dns_timeout_secs),
            ("http_timeout_secs", t.http_timeout_secs),
            ("manifest_timeout_secs", t.manifest_timeout_secs),
            ("whois_timeout_secs", t.whois_timeout_secs),
        ] {
            if secs == 0 {
                bail!("toolbox.{name} must be at least 1");
            }
        }

        let origin = self.cors.allow_origin.trim();
        if origin != "*" {
            let parsed = url::Url::parse(origin)
                .with_context(|| format!("cors.allow_origin is not a valid origin: {origin}"))?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
                bail!("cors.allow_origin must be an http(s) origin or \"*\": {origin}");
            }
        }
        Ok(())
    }
}
