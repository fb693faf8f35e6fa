use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: DEFAULT_PORT, worker_threads: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Snapshot file holding every record plus the id high-water mark.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Source read by `POST /import-json` when the request names no file.
    #[serde(default = "default_import_file")]
    pub import_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file(), import_file: default_import_file() }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_data_file() -> PathBuf { PathBuf::from("data/actresses.json") }
fn default_import_file() -> PathBuf { PathBuf::from("actresses.json") }

/// Read `config.toml` (or `CONFIG_PATH`). A missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !std::path::Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let cfg: AppConfig = toml::from_str(&content).with_context(|| format!("parsing {path}"))?;
    Ok(cfg)
}

impl AppConfig {
    /// File, then process environment, then validation.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay env values: `HOST`, `PORT`, `DATA_FILE`, `IMPORT_FILE`, `TOKIO_WORKER_THREADS`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("PORT must be an integer in 1..=65535, got {port:?}"))?;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            self.server.worker_threads = threads.trim().parse().ok();
        }
        if let Some(file) = lookup("DATA_FILE") {
            self.storage.data_file = PathBuf::from(file);
        }
        if let Some(file) = lookup("IMPORT_FILE") {
            self.storage.import_file = PathBuf::from(file);
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_file must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_listen_on_5000() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[])).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.storage.data_file, PathBuf::from("data/actresses.json"));
    }

    #[test]
    fn port_env_overrides_file() {
        let mut cfg: AppConfig = toml::from_str("[server]\nport = 8080\n").unwrap();
        cfg.apply_env(env(&[("PORT", "9090")])).unwrap();
        assert_eq!(cfg.server.port, 9090);
    }

    #[test]
    fn bad_port_env_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(env(&[("PORT", "not-a-port")])).is_err());
        assert!(cfg.apply_env(env(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn port_zero_fails_validation() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[("PORT", "0")])).unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: AppConfig = toml::from_str("[storage]\nimport_file = \"seed.json\"\n").unwrap();
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert_eq!(cfg.storage.import_file, PathBuf::from("seed.json"));
        assert_eq!(cfg.storage.data_file, PathBuf::from("data/actresses.json"));
    }

    #[test]
    fn load_from_file_reads_toml() {
        let path = std::env::temp_dir().join(format!("configs_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 5001\n").unwrap();
        let cfg = load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 5001);
        let _ = std::fs::remove_file(&path);
    }
}
