use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::ParticleOptions;
use crate::infrastructure::ethereum::ProviderConfig;

pub const CONFIG_ENV: &str = "KEYWORDCHAIN_CONFIG";
pub const PRIVATE_KEY_ENV: &str = "KEYWORDCHAIN_PRIVATE_KEY";

const DEFAULT_ENDPOINT: &str = "localhost:8545";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid contract address {0:?}")]
    InvalidAddress(String),
    #[error("private key must be 32 bytes of hex")]
    InvalidPrivateKey,
    #[error("IPC is not supported on this platform")]
    IpcUnsupported,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointConfig {
    pub name: Option<String>,
    pub rpc: Option<String>,
    pub ws: Option<String>,
    pub ipc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Newest entries kept by the message chain view
    pub max_entries: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self { max_entries: 50 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// KeywordChain contract address
    pub contract: Option<String>,

    /// Hex private key; `KEYWORDCHAIN_PRIVATE_KEY` wins when set
    pub private_key: Option<String>,

    /// Filter used when `RUST_LOG` is unset
    pub log_level: Option<String>,

    pub log_dir: Option<String>,

    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,

    #[serde(default)]
    pub particles: ParticleOptions,

    #[serde(default)]
    pub chain: ChainConfig,
}

/// Endpoint overrides from the command line
#[derive(Debug, Clone, Default)]
pub struct EndpointArgs {
    pub rpc: Option<String>,
    pub ws: Option<String>,
    pub ipc: Option<PathBuf>,
}

/// A resolved endpoint with its display label
#[derive(Debug, Clone)]
pub struct EndpointOption {
    pub label: String,
    pub provider: ProviderConfig,
}

impl Config {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str::<Config>(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn contract_address(&self) -> Result<Option<Address>, ConfigError> {
        self.contract
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|raw| {
                raw.parse::<Address>()
                    .map_err(|_| ConfigError::InvalidAddress(raw.to_string()))
            })
            .transpose()
    }

    /// Signing key, environment first; validated but left as text for the signer
    pub fn private_key(&self) -> Result<Option<String>, ConfigError> {
        let raw = std::env::var(PRIVATE_KEY_ENV)
            .ok()
            .or_else(|| self.private_key.clone());
        let Some(raw) = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let payload = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(&raw);
        match hex::decode(payload) {
            Ok(bytes) if bytes.len() == 32 => Ok(Some(format!("0x{payload}"))),
            _ => Err(ConfigError::InvalidPrivateKey),
        }
    }

    pub fn log_filter(&self) -> String {
        self.log_level
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "keywordchain=info".to_string())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .as_deref()
            .and_then(expand_path)
            .or_else(|| data_dir().map(|dir| dir.join("logs")))
            .unwrap_or_else(|| PathBuf::from(".keywordchain").join("logs"))
    }

    /// CLI endpoint first, then config entries, then localhost
    pub fn endpoints(&self, args: &EndpointArgs) -> Result<Vec<EndpointOption>, ConfigError> {
        let mut out = Vec::new();
        let mut seen = BTreeSet::<String>::new();

        if let Some(ipc) = args.ipc.clone() {
            push_endpoint(&mut out, &mut seen, ipc_provider(ipc)?, Some("cli"));
        } else if let Some(ws) = args.ws.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            push_endpoint(
                &mut out,
                &mut seen,
                ProviderConfig::WebSocket(ws.to_string()),
                Some("cli"),
            );
        } else if let Some(rpc) = args.rpc.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            push_endpoint(
                &mut out,
                &mut seen,
                ProviderConfig::Http(normalize_http_endpoint(rpc)),
                Some("cli"),
            );
        }

        for (idx, entry) in self.endpoints.iter().enumerate() {
            let name = entry.name.as_deref().filter(|value| !value.trim().is_empty());
            if let Some(rpc) = entry.rpc.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                push_endpoint(
                    &mut out,
                    &mut seen,
                    ProviderConfig::Http(normalize_http_endpoint(rpc)),
                    name,
                );
            } else if let Some(ws) = entry.ws.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                push_endpoint(&mut out, &mut seen, ProviderConfig::WebSocket(ws.to_string()), name);
            } else if let Some(ipc) = entry.ipc.as_deref().and_then(expand_path) {
                let fallback = format!("ipc-{idx}");
                push_endpoint(
                    &mut out,
                    &mut seen,
                    ipc_provider(ipc)?,
                    Some(name.unwrap_or(&fallback)),
                );
            }
        }

        if out.is_empty() {
            push_endpoint(
                &mut out,
                &mut seen,
                ProviderConfig::Http(normalize_http_endpoint(DEFAULT_ENDPOINT)),
                Some("local"),
            );
        }

        Ok(out)
    }
}

fn push_endpoint(
    out: &mut Vec<EndpointOption>,
    seen: &mut BTreeSet<String>,
    provider: ProviderConfig,
    name: Option<&str>,
) {
    let display = provider.display();
    if !seen.insert(display.to_lowercase()) {
        return;
    }
    let label = name
        .map(|name| format!("{name} ({display})"))
        .unwrap_or(display);
    out.push(EndpointOption { label, provider });
}

#[cfg(unix)]
fn ipc_provider(path: PathBuf) -> Result<ProviderConfig, ConfigError> {
    Ok(ProviderConfig::Ipc(path))
}

#[cfg(not(unix))]
fn ipc_provider(_path: PathBuf) -> Result<ProviderConfig, ConfigError> {
    Err(ConfigError::IpcUnsupported)
}

/// Load the config file
///
/// A missing or unreadable file yields defaults. The error, if any, is handed
/// back so it can be reported once logging is up.
pub fn load(explicit: Option<&Path>) -> (Config, Option<ConfigError>) {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(config_path) else {
        return (Config::default(), None);
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
            return (Config::default(), None)
        }
        Err(source) => return (Config::default(), Some(ConfigError::Read { path, source })),
    };
    match Config::parse(&content, &path) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("keywordchain").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("keywordchain").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "keywordchain", "keywordchain")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("keywordchain"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("keywordchain"));
    }
    directories::ProjectDirs::from("io", "keywordchain", "keywordchain")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn export_dir() -> PathBuf {
    data_dir()
        .map(|dir| dir.join("exports"))
        .unwrap_or_else(|| PathBuf::from(".keywordchain").join("exports"))
}

pub fn normalize_http_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

pub fn expand_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            return Some(home.join(rest));
        }
    }

    let mut buf = PathBuf::from(trimmed);
    if buf.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            buf = cwd.join(buf);
        }
    }
    Some(buf)
}

/// `0x1234..abcd` style shortening for addresses and hashes
pub fn short_addr(value: &str) -> String {
    let value = value.trim();
    if value.len() <= 12 {
        return value.to_string();
    }
    let start: String = value.chars().take(6).collect();
    let end: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    format!("{}..{}", start, end)
}
