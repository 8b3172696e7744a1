//! Daemon configuration: every compile-time constant of the classic
//! openwheel daemon (device path, sentinel bytes, bus names) as a TOML
//! file with documented defaults.
//!
//! Loaded from `$XDG_CONFIG_HOME/openwheel/config.toml` (falling back to
//! `~/.config/openwheel/config.toml`). A missing file means defaults; a
//! present file only needs the fields it wants to override.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors loading or rendering the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Device-specific report bytes the state machine matches against.
///
/// Defaults are for the ASUS dial: direction in the rotation high byte
/// (`0x01` clockwise, `0xFF` counter-clockwise), button byte `0x01` while
/// pressed and `0x00` otherwise. `button_up = 0x00` means every idle
/// report matches the release rule; the state machine's held gate is
/// what keeps those silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sentinels {
    pub rotate_plus: u8,
    pub rotate_minus: u8,
    pub button_down: u8,
    pub button_up: u8,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            rotate_plus: 0x01,
            rotate_minus: 0xFF,
            button_down: 0x01,
            button_up: 0x00,
        }
    }
}

/// HID device settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// hidraw node of the dial. Fixed and pre-known; there is no
    /// enumeration or hot-plug handling.
    pub path: String,
    /// Poll interval for the reader thread. Only affects how quickly a
    /// shutdown request is observed while the dial is idle.
    pub read_timeout_ms: i32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: "/dev/hidraw0".to_string(),
            read_timeout_ms: 250,
        }
    }
}

/// D-Bus identity and signal naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Well-known name claimed on the session bus.
    pub service_name: String,
    /// Object path signals are emitted from.
    pub object_path: String,
    /// Interface the signals belong to.
    pub interface: String,
    /// Member name of the rotation signal (body: i32 delta, +1/-1).
    pub rotate_member: String,
    /// Member name of the press signal (body: i32, 1 = down, 0 = up).
    pub press_member: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            service_name: "org.asus.dial".to_string(),
            object_path: "/org/asus/dial".to_string(),
            interface: "org.asus.dial".to_string(),
            rotate_member: "Rotate".to_string(),
            press_member: "Press".to_string(),
        }
    }
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub device: DeviceConfig,
    pub sentinels: Sentinels,
    pub bus: BusConfig,
}

impl DaemonConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string. Absent fields keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load the config from the default location, falling back to the
    /// built-in defaults when no file exists.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Path to the default config TOML file.
pub fn default_config_path() -> PathBuf {
    dirs_path().join("config.toml")
}

fn dirs_path() -> PathBuf {
    if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(config).join("openwheel")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".config/openwheel")
    } else {
        PathBuf::from("/tmp/openwheel")
    }
}
