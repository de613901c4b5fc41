//! CHF Configuration
//!
//! YAML local configuration of the charging function:
//!
//! ```yaml
//! info:
//!   version: 1.0.3
//! configuration:
//!   chfName: CHF
//!   sbi:
//!     scheme: https
//!     registerIPv4: 127.0.0.113
//!     bindingIPv4: 127.0.0.113
//!     port: 8000
//!   nrfUri: https://127.0.0.10:8000
//!   serviceList:
//!     - serviceName: nchf-convergedcharging
//! ```

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::path::Path;

use ogs_sbi::{SbiServiceType, UriScheme};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default SBI address
pub const DEFAULT_SBI_IPV4: &str = "127.0.0.113";
/// Default SBI port
pub const DEFAULT_SBI_PORT: u16 = 8000;
/// Default NRF URI
pub const DEFAULT_NRF_URI: &str = "https://127.0.0.10:8000";
/// Default API version advertised to the NRF
pub const DEFAULT_API_VERSION: &str = "1.0.3";
/// Default maximum number of UEs
pub const MAX_NUM_OF_UE: usize = 1024;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Top-level CHF configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChfConfig {
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub configuration: Configuration,
}

/// Document information; `version` is the advertised API version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            version: DEFAULT_API_VERSION.to_string(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default = "default_chf_name")]
    pub chf_name: String,
    /// Fixed NF instance id; a random one is generated when absent
    #[serde(default)]
    pub nf_instance_id: Option<String>,
    #[serde(default)]
    pub sbi: SbiConf,
    #[serde(default = "default_nrf_uri")]
    pub nrf_uri: String,
    #[serde(default = "default_service_list")]
    pub service_list: Vec<ServiceConf>,
    #[serde(default = "default_max_ue")]
    pub max_ue: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            chf_name: default_chf_name(),
            nf_instance_id: None,
            sbi: SbiConf::default(),
            nrf_uri: default_nrf_uri(),
            service_list: default_service_list(),
            max_ue: default_max_ue(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SbiConf {
    #[serde(default)]
    pub scheme: UriScheme,
    #[serde(rename = "registerIPv4", default = "default_sbi_ipv4")]
    pub register_ipv4: String,
    #[serde(rename = "bindingIPv4", default = "default_sbi_ipv4")]
    pub binding_ipv4: String,
    #[serde(default = "default_sbi_port")]
    pub port: u16,
}

impl Default for SbiConf {
    fn default() -> Self {
        Self {
            scheme: UriScheme::default(),
            register_ipv4: default_sbi_ipv4(),
            binding_ipv4: default_sbi_ipv4(),
            port: default_sbi_port(),
        }
    }
}

/// One supported service with its feature flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConf {
    pub service_name: String,
    #[serde(default)]
    pub supp_feat: Option<String>,
}

impl ServiceConf {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            supp_feat: None,
        }
    }

    pub fn with_supp_feat(mut self, supp_feat: impl Into<String>) -> Self {
        self.supp_feat = Some(supp_feat.into());
        self
    }
}

fn default_chf_name() -> String {
    "CHF".to_string()
}

fn default_nrf_uri() -> String {
    DEFAULT_NRF_URI.to_string()
}

fn default_sbi_ipv4() -> String {
    DEFAULT_SBI_IPV4.to_string()
}

fn default_sbi_port() -> u16 {
    DEFAULT_SBI_PORT
}

fn default_max_ue() -> usize {
    MAX_NUM_OF_UE
}

fn default_service_list() -> Vec<ServiceConf> {
    vec![ServiceConf::new(SbiServiceType::NchfConvergedcharging.to_name())]
}

impl ChfConfig {
    /// Parse and validate a configuration from YAML text
    pub fn from_str(yaml_str: &str) -> Result<Self, ConfigError> {
        let config: ChfConfig = serde_yaml::from_str(yaml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("Configuration file loaded ({} bytes)", content.len());
        Self::from_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let conf = &self.configuration;

        if conf.sbi.port == 0 {
            return Err(ConfigError::ValidationError("sbi.port must be non-zero".into()));
        }
        for (field, addr) in [
            ("registerIPv4", &conf.sbi.register_ipv4),
            ("bindingIPv4", &conf.sbi.binding_ipv4),
        ] {
            if addr.parse::<Ipv4Addr>().is_err() {
                return Err(ConfigError::ValidationError(format!(
                    "sbi.{field} is not an IPv4 address: {addr}"
                )));
            }
        }
        if conf.max_ue == 0 {
            return Err(ConfigError::ValidationError("maxUe must be non-zero".into()));
        }
        if conf.service_list.is_empty() {
            return Err(ConfigError::ValidationError("serviceList is empty".into()));
        }

        let mut seen = HashSet::new();
        for service in &conf.service_list {
            if service.service_name.is_empty() {
                return Err(ConfigError::ValidationError("empty serviceName".into()));
            }
            if !seen.insert(service.service_name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate serviceName: {}",
                    service.service_name
                )));
            }
            if SbiServiceType::from_name(&service.service_name).map_or(true, |t| !t.is_nchf()) {
                log::warn!("Unknown Nchf service configured: {}", service.service_name);
            }
        }

        Ok(())
    }
}
