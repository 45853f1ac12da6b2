//! Application settings and paths.
//!
//! Settings live in a JSON file under the XDG config directory. A missing
//! file means defaults; unknown fields are rejected so typos surface early.

use crate::discovery::{ProbeKind, DEFAULT_CONCURRENCY};
use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{DEFAULT_MAX_HOSTS, DEFAULT_PORT_CONCURRENCY};
use crate::types::{validate_cidr, Port, PortSpec};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/netsweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Resolve paths using XDG directories.
    pub fn new() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "netsweep", "netsweep").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppSettings {
    /// Subnet scanned when none is given.
    pub default_subnet: String,
    /// Ports probed on each live host.
    pub default_ports: String,
    /// Liveness probe mechanism.
    pub probe: ProbeKind,
    /// Liveness probes in flight at once.
    pub discovery_concurrency: usize,
    /// Timeout per liveness probe in milliseconds.
    pub ping_timeout_ms: u64,
    /// Timeout per port connect in milliseconds.
    pub connect_timeout_ms: u64,
    /// Ports probed at once on a single host.
    pub port_concurrency: usize,
    /// Ports used by the TCP liveness probe.
    pub tcp_probe_ports: String,
    /// Largest subnet (in hosts) a scan accepts, 0 for unlimited.
    pub max_hosts: u64,
    /// Address the HTTP server binds to.
    pub bind_address: IpAddr,
    /// Port the HTTP server listens on.
    pub port: u16,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_subnet: "192.168.0.0/24".to_string(),
            default_ports: "22,80,443,502".to_string(),
            probe: ProbeKind::Ping,
            discovery_concurrency: DEFAULT_CONCURRENCY,
            ping_timeout_ms: 200,
            connect_timeout_ms: 500,
            port_concurrency: DEFAULT_PORT_CONCURRENCY,
            tcp_probe_ports: "80,443,22,445".to_string(),
            max_hosts: DEFAULT_MAX_HOSTS,
            bind_address: IpAddr::from([0, 0, 0, 0]),
            port: 5000,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::new()?.settings_file();
        if !file.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&file)
    }

    /// Load settings from `path` if given, otherwise from the default location.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Reject values that would make scanning impossible.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.discovery_concurrency == 0 || self.port_concurrency == 0 {
            return Err(ConfigError::InvalidFormat(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.ping_timeout_ms == 0 || self.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidFormat(
                "timeouts must be at least 1 ms".to_string(),
            ));
        }
        validate_cidr(&self.default_subnet)
            .map_err(|e| ConfigError::InvalidFormat(format!("default_subnet: {}", e)))?;
        self.ports()?;
        self.tcp_ports()?;
        Ok(())
    }

    pub fn ports(&self) -> ConfigResult<Vec<Port>> {
        parse_ports("default_ports", &self.default_ports)
    }

    pub fn tcp_ports(&self) -> ConfigResult<Vec<Port>> {
        parse_ports("tcp_probe_ports", &self.tcp_probe_ports)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

fn parse_ports(field: &str, spec: &str) -> ConfigResult<Vec<Port>> {
    spec.parse::<PortSpec>()
        .map(PortSpec::into_ports)
        .map_err(|e| ConfigError::InvalidFormat(format!("{}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.discovery_concurrency, 50);
        assert_eq!(settings.ping_timeout(), Duration::from_millis(200));
        assert_eq!(settings.connect_timeout(), Duration::from_millis(500));
        assert_eq!(settings.port, 5000);
        assert!(settings.validate().is_ok());
        let ports: Vec<u16> = settings.ports().unwrap().iter().map(|p| p.as_u16()).collect();
        assert_eq!(ports, vec![22, 80, 443, 502]);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = AppSettings {
            probe: ProbeKind::Tcp,
            port: 8080,
            ..AppSettings::default()
        };
        settings.save_to(&path).unwrap();

        let loaded = AppSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "default_subnet": "10.0.0.0/24", "probe": "icmp" }"#).unwrap();

        let loaded = AppSettings::load_from(&path).unwrap();
        assert_eq!(loaded.default_subnet, "10.0.0.0/24");
        assert_eq!(loaded.probe, ProbeKind::Icmp);
        assert_eq!(loaded.connect_timeout_ms, 500);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        fs::write(&path, r#"{ "discovery_concurrency": 0 }"#).unwrap();
        assert!(matches!(
            AppSettings::load_from(&path),
            Err(ConfigError::InvalidFormat(_))
        ));

        fs::write(&path, r#"{ "default_subnet": "10.0.0.0/40" }"#).unwrap();
        assert!(AppSettings::load_from(&path).is_err());

        fs::write(&path, r#"{ "unknown_field": true }"#).unwrap();
        assert!(AppSettings::load_from(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppSettings::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }
}
