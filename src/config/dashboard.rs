// src/config/dashboard.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";
pub const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
pub const ENV_RESULTS_PATH: &str = "DASHBOARD_RESULTS_PATH";
pub const ENV_PREDICT_DELAY_MS: &str = "DASHBOARD_PREDICT_DELAY_MS";
pub const ENV_STRICT_FEATURES: &str = "DASHBOARD_STRICT_FEATURES";
pub const ENV_STATIC_DIR: &str = "DASHBOARD_STATIC_DIR";
pub const ENV_RNG_SEED: &str = "DASHBOARD_RNG_SEED";

fn default_results_path() -> PathBuf {
    PathBuf::from("data/model_results.json")
}
fn default_predict_delay_ms() -> u64 {
    1500
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("ui")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pre-computed evaluation results document, read once at startup.
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,
    /// Artificial latency before a mock prediction completes.
    #[serde(default = "default_predict_delay_ms")]
    pub predict_delay_ms: u64,
    /// Reject incomplete or inconsistent feature records instead of
    /// defaulting absent fields to 0.
    #[serde(default)]
    pub strict_features: bool,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Pins confidence draws; OS entropy when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
            predict_delay_ms: default_predict_delay_ms(),
            strict_features: false,
            static_dir: default_static_dir(),
            rng_seed: None,
        }
    }
}

impl AppConfig {
    pub fn predict_delay(&self) -> Duration {
        Duration::from_millis(self.predict_delay_ms)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        toml::from_str(&data)
            .with_context(|| format!("parsing dashboard config {}", path.display()))
    }

    /// Resolve config the way the service boots:
    /// 1) $DASHBOARD_CONFIG_PATH (must exist)
    /// 2) config/dashboard.toml (if present)
    /// 3) built-in defaults
    ///
    /// then apply `DASHBOARD_*` env overrides on top.
    pub fn from_env() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => Self::load_from_file(&p)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    /// Apply overrides from a key lookup. Unparsable values are ignored.
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(p) = get(ENV_RESULTS_PATH).filter(|s| !s.trim().is_empty()) {
            self.results_path = PathBuf::from(p.trim());
        }
        if let Some(ms) = get(ENV_PREDICT_DELAY_MS).and_then(|s| s.trim().parse().ok()) {
            self.predict_delay_ms = ms;
        }
        if let Some(flag) = get(ENV_STRICT_FEATURES).and_then(|s| parse_flag(&s)) {
            self.strict_features = flag;
        }
        if let Some(d) = get(ENV_STATIC_DIR).filter(|s| !s.trim().is_empty()) {
            self.static_dir = PathBuf::from(d.trim());
        }
        if let Some(seed) = get(ENV_RNG_SEED).and_then(|s| s.trim().parse().ok()) {
            self.rng_seed = Some(seed);
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
