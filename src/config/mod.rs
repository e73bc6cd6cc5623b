//! Configuration management.
//!
//! Configuration is read from a JSON file (default `config.json`) at startup.
//! A missing or unreadable file is not an error: built-in defaults apply, and
//! any field absent from the file keeps its default. After the session is
//! established the file is rewritten in full so a freshly minted device id or
//! token survives a restart.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::warn;

use crate::app::Result;
use crate::domain::{Coordinates, Location};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub access_token: Option<String>,
    pub device_uid: Option<String>,
    pub location: Location,
    pub key_config: KeyConfig,
    pub printer_path: Option<String>,
}

/// Backend signing material: API key plus the client/API versions the key is
/// registered for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyConfig {
    pub key: String,
    pub client_version: String,
    pub api_version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            device_uid: None,
            location: Location {
                city: "Kassel".to_string(),
                country: "DE".to_string(),
                coordinates: Coordinates {
                    lat: 51.335,
                    lng: 9.4947,
                },
                accuracy: 19.0,
            },
            key_config: KeyConfig::default(),
            printer_path: Some("/dev/usb/lp0".to_string()),
        }
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            key: "KZmLMUggDeMzQfqMNYFLWNyttEmQgClvlPyACVlH".to_string(),
            client_version: "4.38.3".to_string(),
            api_version: "0.2".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`. Missing or malformed files fall back to defaults.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Rewrite the whole file, 4-space indented.
    pub fn store(&self, path: &Path) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        buf.push(b'\n');
        fs::write(path, buf)?;
        Ok(())
    }

    /// Configured printer device path. An empty string counts as unset.
    pub fn printer_path(&self) -> Option<&str> {
        self.printer_path.as_deref().filter(|p| !p.is_empty())
    }
}
