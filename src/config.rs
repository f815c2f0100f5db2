//! Process configuration, loaded once at startup.
//!
//! All site-specific knobs live here: the fleet host table, service ports,
//! remote binary paths, the reserved tmux session name, logging, and the
//! location of the persisted run manifest. A missing config file yields the
//! defaults, so the tool works out of the box on the stock lab fleet.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};
use crate::fleet::{Host, HostTable};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub fleet: FleetConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub state: StateConfig,
}

/// Fleet-wide cluster settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FleetConfig {
    #[serde(default = "default_coordinator_port")]
    pub coordinator_port: u16,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_coordinator_bin")]
    pub coordinator_bin: String,
    #[serde(default = "default_server_bin")]
    pub server_bin: String,
    /// Argument telling each server where to store segment replicas.
    #[serde(default = "default_disk_arg")]
    pub disk_arg: String,
    /// Remote directory capturing each process's stdout/stderr.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// Explicit host table; empty means the stock lab fleet.
    #[serde(default)]
    pub hosts: Vec<Host>,
}

fn default_coordinator_port() -> u16 {
    12246
}

fn default_server_port() -> u16 {
    12247
}

fn default_coordinator_bin() -> String {
    "coordinator".into()
}

fn default_server_bin() -> String {
    "server".into()
}

fn default_disk_arg() -> String {
    "-f /dev/sda2".into()
}

fn default_log_dir() -> String {
    "/tmp/fleetmux".into()
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            coordinator_port: default_coordinator_port(),
            server_port: default_server_port(),
            coordinator_bin: default_coordinator_bin(),
            server_bin: default_server_bin(),
            disk_arg: default_disk_arg(),
            log_dir: default_log_dir(),
            hosts: Vec::new(),
        }
    }
}

/// Console session settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default = "default_session_name")]
    pub name: String,
}

fn default_session_name() -> String {
    "fleetmux".into()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: default_session_name(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

/// Where the run manifest lives between invocations.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateConfig {
    pub dir: Option<PathBuf>,
}

impl StateConfig {
    /// Directory holding cross-invocation state. Falls back to the platform
    /// state dir, then the system temp dir.
    pub fn state_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::state_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("fleetmux")
        })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.state_dir().join("manifest.json")
    }
}

impl Config {
    /// Load configuration from `path`. A missing file is not an error; it
    /// yields the defaults so the stock fleet works with no setup.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// The effective host table: configured hosts, or the stock fleet.
    pub fn hosts(&self) -> HostTable {
        if self.fleet.hosts.is_empty() {
            HostTable::default_fleet()
        } else {
            HostTable::new(self.fleet.hosts.clone())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.fleet.coordinator_port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fleet.coordinator_port",
                reason: "port must be non-zero".into(),
            }
            .into());
        }
        if self.fleet.server_port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fleet.server_port",
                reason: "port must be non-zero".into(),
            }
            .into());
        }
        if self.fleet.coordinator_port == self.fleet.server_port {
            return Err(ConfigError::InvalidValue {
                field: "fleet.server_port",
                reason: "coordinator and server ports must differ".into(),
            }
            .into());
        }
        if self.fleet.coordinator_bin.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "fleet.coordinator_bin",
            }
            .into());
        }
        if self.fleet.server_bin.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "fleet.server_bin",
            }
            .into());
        }
        if self.session.name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "session.name",
            }
            .into());
        }
        Ok(())
    }
}
