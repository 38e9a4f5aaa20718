//! Engine construction settings.

use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache directory created under the application cache root.
pub const CACHE_DIR_NAME: &str = "engine-cache";

/// How the engine caches responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HttpCacheMode {
    Disabled,
    InMemory,
    DiskNoHttp,
    #[default]
    Disk,
}

/// Settings consumed once when the engine is built.
///
/// None of these affect per-request behavior of the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory the engine keeps its disk cache and state in.
    pub storage_path: Option<PathBuf>,
    pub cache_mode: HttpCacheMode,
    /// Disk cache budget in bytes.
    pub cache_max_bytes: u64,
    pub enable_brotli: bool,
    pub enable_http2: bool,
    pub enable_quic: bool,
    /// User-Agent the engine sends when a request sets none.
    pub user_agent: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            cache_mode: HttpCacheMode::Disk,
            cache_max_bytes: 10 * 1024 * 1024, // 10 MB
            enable_brotli: true,
            enable_http2: true,
            enable_quic: true,
            user_agent: None,
        }
    }
}

impl EngineConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Keep engine storage in `<cache_root>/engine-cache`.
    pub fn storage_under(mut self, cache_root: impl AsRef<Path>) -> Self {
        self.storage_path = Some(cache_root.as_ref().join(CACHE_DIR_NAME));
        self
    }

    /// Set the cache mode.
    pub fn cache_mode(mut self, mode: HttpCacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Set the disk cache budget.
    pub fn cache_max_bytes(mut self, bytes: u64) -> Self {
        self.cache_max_bytes = bytes;
        self
    }

    /// Enable or disable brotli decoding.
    pub fn enable_brotli(mut self, enable: bool) -> Self {
        self.enable_brotli = enable;
        self
    }

    /// Enable or disable HTTP/2.
    pub fn enable_http2(mut self, enable: bool) -> Self {
        self.enable_http2 = enable;
        self
    }

    /// Enable or disable QUIC.
    pub fn enable_quic(mut self, enable: bool) -> Self {
        self.enable_quic = enable;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Create the storage directory if disk caching needs one.
    ///
    /// Falls back to an in-memory cache when no storage path is configured.
    pub fn prepare_storage(&mut self) -> io::Result<()> {
        let uses_disk = matches!(
            self.cache_mode,
            HttpCacheMode::Disk | HttpCacheMode::DiskNoHttp
        );
        match (&self.storage_path, uses_disk) {
            (Some(path), _) => {
                std::fs::create_dir_all(path)?;
                tracing::debug!(path = %path.display(), "engine storage ready");
            }
            (None, true) => {
                tracing::warn!("disk cache requested without storage path, using memory cache");
                self.cache_mode = HttpCacheMode::InMemory;
            }
            (None, false) => {}
        }
        Ok(())
    }
}
