use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MODEL: &str = "doubao-seed-1-8-251228";
const DEFAULT_BASE_URL: &str = "https://ark.cn-beijing.volces.com/api/v3";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_PUBLIC_DIR: &str = "public";

/// Process-wide settings, loaded once at startup and handed to the router.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// `None` when `ARK_API_KEY` is unset or blank; `/api/analyze` then answers 500.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// `None` disables the upstream timeout (`ARK_TIMEOUT_SECS=0`).
    pub upstream_timeout: Option<Duration>,
    /// Directory holding `index.html`. A relative path resolves against the
    /// working directory of the process, not the binary's location; set
    /// `PUBLIC_DIR` when starting from elsewhere.
    pub public_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        let api_key = lookup("ARK_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let model = lookup("ARK_MODEL")
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = lookup("ARK_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match lookup("ARK_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("ARK_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw)
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let upstream_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let public_dir = lookup("PUBLIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR));

        Ok(Self {
            port,
            api_key,
            model,
            base_url,
            upstream_timeout,
            public_dir,
        })
    }

    pub fn index_path(&self) -> PathBuf {
        self.public_dir.join("index.html")
    }

    pub fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}
