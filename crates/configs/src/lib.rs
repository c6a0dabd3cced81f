use anyhow::anyhow;
use anyhow::Result;
use common::LogFormat;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Which key-value backend the repository talks to.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    /// Process-local maps; nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_response_timeout")]
    pub response_timeout_secs: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            backend: StoreBackend::default(),
            connect_timeout_secs: default_connect_timeout(),
            response_timeout_secs: default_response_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_connect_timeout() -> u64 { 5 }
fn default_response_timeout() -> u64 { 5 }

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// Like [`load_from_file`], but a config file that does not exist yields defaults.
/// Unreadable or malformed files are still errors.
pub fn load_from_file_or_default(path: &str) -> Result<AppConfig> {
    match load_from_file(path) {
        Ok(cfg) => Ok(cfg),
        Err(e) if is_not_found(&e) => Ok(AppConfig::default()),
        Err(e) => Err(e.context(format!("invalid config file {path}"))),
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl AppConfig {
    /// Load `CONFIG_PATH` (default `config.toml`), falling back to defaults plus
    /// environment variables when the file is absent.
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = load_from_file_or_default(&path)?;
        cfg.server.fill_from_env();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.redis.normalize_from_env();
        self.redis.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn fill_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl RedisConfig {
    /// Fill an empty URL from `REDIS_URL`, then from Cloud Foundry's `VCAP_SERVICES`.
    pub fn normalize_from_env(&mut self) {
        let redis_url = std::env::var("REDIS_URL").ok();
        let vcap = std::env::var("VCAP_SERVICES").ok();
        self.fill_url(redis_url, vcap.as_deref());
    }

    pub fn fill_url(&mut self, redis_url: Option<String>, vcap_services: Option<&str>) {
        if !self.url.trim().is_empty() {
            return;
        }
        if let Some(url) = redis_url.filter(|u| !u.trim().is_empty()) {
            self.url = url;
            return;
        }
        if let Some(url) = vcap_services.and_then(url_from_vcap_services) {
            self.url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend == StoreBackend::Memory {
            return Ok(());
        }
        if self.url.trim().is_empty() {
            return Err(anyhow!(
                "redis.url is empty; set it in config.toml, REDIS_URL or bind a redis service (VCAP_SERVICES)"
            ));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("redis://") || lower.starts_with("rediss://") || lower.starts_with("unix://")) {
            return Err(anyhow!("redis.url must start with redis://, rediss:// or unix://"));
        }
        if self.connect_timeout_secs == 0 || self.response_timeout_secs == 0 {
            return Err(anyhow!("redis timeouts must be positive seconds"));
        }
        Ok(())
    }

    /// URL with the password replaced, safe for logs.
    pub fn redacted_url(&self) -> String {
        redact_url(&self.url)
    }
}

/// Extract a connection URL from a `VCAP_SERVICES` JSON document.
///
/// Picks the first service instance whose label, name or tags mention redis.
/// Credentials may carry a ready-made `uri`, otherwise the URL is assembled
/// from `host`, `port`/`tls_port` and `password`.
pub fn url_from_vcap_services(vcap: &str) -> Option<String> {
    let root: Value = serde_json::from_str(vcap).ok()?;
    let services = root.as_object()?;
    services
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .find(|svc| is_redis_service(svc))
        .and_then(|svc| url_from_credentials(svc.get("credentials")?))
}

fn is_redis_service(svc: &Value) -> bool {
    let mentions = |v: Option<&Value>| {
        v.and_then(Value::as_str).is_some_and(|s| s.to_lowercase().contains("redis"))
    };
    let tagged = svc
        .get("tags")
        .and_then(Value::as_array)
        .is_some_and(|tags| tags.iter().any(|t| mentions(Some(t))));
    tagged || mentions(svc.get("label")) || mentions(svc.get("name"))
}

fn url_from_credentials(creds: &Value) -> Option<String> {
    if let Some(uri) = creds.get("uri").and_then(Value::as_str) {
        return Some(uri.to_string());
    }
    let host = creds.get("host").and_then(Value::as_str)?;
    let port_of = |key: &str| match creds.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    };
    let (scheme, port) = match port_of("tls_port") {
        Some(p) => ("rediss", p),
        None => ("redis", port_of("port").unwrap_or(6379)),
    };
    let auth = match creds.get("password").and_then(Value::as_str) {
        Some(pw) if !pw.is_empty() => format!(":{}@", urlencoding::encode(pw)),
        _ => String::new(),
    };
    Some(format!("{scheme}://{auth}{host}:{port}"))
}

fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.rsplit_once('@') {
        Some((userinfo, host)) => {
            let user = userinfo.split(':').next().unwrap_or_default();
            format!("{scheme}://{user}:***REDACTED***@{host}")
        }
        None => url.to_string(),
    }
}
