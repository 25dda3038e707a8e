use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "parley.toml",
    "config/parley.toml",
    "crates/config/parley.toml",
    "../parley.toml",
    "../config/parley.toml",
    "../crates/config/parley.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub relay: RelayConfig,
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
            port: 5000,
        }
    }
}

/// Tuning knobs for the relay core.
///
/// `send_buffer` is the per-connection outbound queue depth; a connection
/// that cannot drain its queue loses events rather than stalling the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "RelayConfig::default_send_buffer")]
    pub send_buffer: usize,
}

impl RelayConfig {
    const fn default_send_buffer() -> usize {
        100
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            send_buffer: Self::default_send_buffer(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use parley_config::load;
///
/// std::env::remove_var("PARLEY_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder();
    builder = builder
        .set_default("http.address", defaults.http.address.clone())
        .unwrap()
        .set_default("http.port", i64::from(defaults.http.port))
        .unwrap()
        .set_default(
            "relay.send_buffer",
            i64::try_from(defaults.relay.send_buffer).unwrap_or(i64::MAX),
        )
        .unwrap();

    let environment_overrides = config::Environment::with_prefix("PARLEY").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("PARLEY_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via PARLEY_CONFIG");
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

    debug!(?config, "loaded relay configuration");
    Ok(config)
}
