//! Runtime configuration from environment variables

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Profile JSON to load at startup; the built-in sample is used if unset
    pub profile_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            profile_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back
    /// to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind: lookup("CALLSIM_BIND")
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.bind),
            port: lookup("CALLSIM_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            profile_path: lookup("CALLSIM_PROFILE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
