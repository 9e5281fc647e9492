use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "carefinder.toml",
    "config/carefinder.toml",
    "crates/config/carefinder.toml",
    "../carefinder.toml",
    "../config/carefinder.toml",
    "../crates/config/carefinder.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub search: SearchConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
        }
    }
}

/// Provider search settings.
///
/// ```
/// use carefinder_config::SearchConfig;
///
/// let search = SearchConfig::default();
/// assert_eq!(search.latency_ms, 500);
/// assert!(search.catalog_path.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "SearchConfig::default_latency")]
    pub latency_ms: u64,
    /// JSON file holding the provider catalog. The built-in catalog is used when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl SearchConfig {
    const fn default_latency() -> u64 {
        500
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            latency_ms: Self::default_latency(),
            catalog_path: None,
        }
    }
}

/// Session store settings.
///
/// ```
/// use carefinder_config::SessionConfig;
///
/// let session = SessionConfig::default();
/// assert_eq!(session.latency_ms, 1000);
/// assert_eq!(session.namespace, "healthcare_user");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_latency")]
    pub latency_ms: u64,
    #[serde(default = "SessionConfig::default_storage_dir")]
    pub storage_dir: PathBuf,
    #[serde(default = "SessionConfig::default_namespace")]
    pub namespace: String,
}

impl SessionConfig {
    const fn default_latency() -> u64 {
        1000
    }

    fn default_storage_dir() -> PathBuf {
        PathBuf::from(".carefinder")
    }

    fn default_namespace() -> String {
        "healthcare_user".to_string()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            latency_ms: Self::default_latency(),
            storage_dir: Self::default_storage_dir(),
            namespace: Self::default_namespace(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use carefinder_config::load;
///
/// std::env::remove_var("CAREFINDER_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default(
            "search.latency_ms",
            i64::try_from(defaults.search.latency_ms).unwrap_or(i64::MAX),
        )?
        .set_default(
            "session.latency_ms",
            i64::try_from(defaults.session.latency_ms).unwrap_or(i64::MAX),
        )?
        .set_default(
            "session.storage_dir",
            defaults.session.storage_dir.to_string_lossy().into_owned(),
        )?
        .set_default("session.namespace", defaults.session.namespace.clone())?;

    let environment_overrides = config::Environment::with_prefix("CAREFINDER").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("CAREFINDER_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via CAREFINDER_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.session.namespace.trim().is_empty() {
        anyhow::bail!("session.namespace must not be empty");
    }

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
