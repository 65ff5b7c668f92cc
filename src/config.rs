use crate::error::{RelayError, Result};
use std::collections::HashSet;
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_KREA_API_BASE: &str = "https://api.krea.ai";
pub const DEFAULT_KREA_MODEL_PATH: &str = "/generate/image/bfl/flux-1-dev";
pub const DEFAULT_ALLOWED_IMAGE_HOSTS: [&str; 3] = ["gen.krea.ai", "krea.ai", "cdn.krea.ai"];
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.trim().parse().ok())
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[derive(Debug, Clone)]
pub struct KreaConfig {
    pub base_url: String,
    pub model_path: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for KreaConfig {
    fn default() -> Self {
        KreaConfig {
            base_url: DEFAULT_KREA_API_BASE.to_string(),
            model_path: DEFAULT_KREA_MODEL_PATH.to_string(),
            api_token: None,
            request_timeout_secs: 60,
        }
    }
}

impl KreaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        KreaConfig {
            base_url: env_non_empty("KREA_API_BASE")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model_path: env_non_empty("KREA_MODEL_PATH").unwrap_or(defaults.model_path),
            api_token: env_non_empty("KREA_API_TOKEN"),
            request_timeout_secs: env_parsed("KREA_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn create_url(&self) -> String {
        format!("{}{}", self.base_url, self.model_path)
    }

    /// `{base}/jobs/{job_id}`, with the id encoded as a single path segment.
    pub fn job_url(&self, job_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            RelayError::ConfigError(format!("Invalid Krea base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                RelayError::ConfigError(format!(
                    "Krea base URL cannot take a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["jobs", job_id]);
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            max_attempts: 50,
            interval_ms: 2000,
        }
    }
}

impl PollConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        PollConfig {
            max_attempts: env_parsed("POLL_MAX_ATTEMPTS")
                .filter(|attempts| *attempts > 0)
                .unwrap_or(defaults.max_attempts),
            interval_ms: env_parsed("POLL_INTERVAL_MS").unwrap_or(defaults.interval_ms),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub allowed_hosts: HashSet<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        ProxyConfig {
            allowed_hosts: DEFAULT_ALLOWED_IMAGE_HOSTS
                .iter()
                .map(|host| host.to_string())
                .collect(),
        }
    }
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        match env_non_empty("ALLOWED_IMAGE_HOSTS") {
            Some(list) => Self::default().with_hosts(list.split(',')),
            None => Self::default(),
        }
    }

    /// Replaces the allow-list. Blank entries are ignored and hosts are lowercased.
    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts: HashSet<String> = hosts
            .into_iter()
            .map(|host| host.as_ref().trim().to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();
        if !hosts.is_empty() {
            self.allowed_hosts = hosts;
        }
        self
    }

    pub fn is_allowed(&self, host: &str) -> bool {
        self.allowed_hosts.contains(host)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub body_limit: usize,
    pub krea: KreaConfig,
    pub poll: PollConfig,
    pub proxy: ProxyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 3000,
            body_limit: DEFAULT_BODY_LIMIT,
            krea: KreaConfig::default(),
            poll: PollConfig::default(),
            proxy: ProxyConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        Config {
            host: env_non_empty("HOST").unwrap_or(defaults.host),
            port: env_parsed("PORT").unwrap_or(defaults.port),
            body_limit: env_parsed("BODY_LIMIT_BYTES").unwrap_or(defaults.body_limit),
            krea: KreaConfig::from_env(),
            poll: PollConfig::from_env(),
            proxy: ProxyConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_krea(mut self, config: KreaConfig) -> Self {
        self.krea = config;
        self
    }

    pub fn with_poll(mut self, config: PollConfig) -> Self {
        self.poll = config;
        self
    }

    pub fn with_proxy(mut self, config: ProxyConfig) -> Self {
        self.proxy = config;
        self
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
