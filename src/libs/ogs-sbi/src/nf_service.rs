//! NF Service and Profile Model
//!
//! Descriptors an NF advertises to the NRF in its NFProfile
//! (TS 29.510 NFService, NFServiceVersion, IpEndPoint).

use serde::{Deserialize, Serialize};

use crate::types::{NfServiceStatus, NfType, TransportProtocol, UriScheme};

/// API version entry of an NF service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfServiceVersion {
    /// Full semantic version, e.g. "1.0.3"
    pub api_full_version: String,
    /// Version token used in resource URIs, e.g. "v1"
    pub api_version_in_uri: String,
}

/// IP endpoint on which a service is reachable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpEndPoint {
    pub ipv4_address: String,
    pub transport: TransportProtocol,
    pub port: u16,
}

/// NF Service information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfService {
    pub service_instance_id: String,
    pub service_name: String,
    pub versions: Vec<NfServiceVersion>,
    pub scheme: UriScheme,
    pub nf_service_status: NfServiceStatus,
    pub api_prefix: String,
    pub ip_end_points: Vec<IpEndPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_features: Option<String>,
}

impl NfService {
    pub fn new(service_instance_id: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            service_name: service_name.into(),
            versions: Vec::new(),
            scheme: UriScheme::default(),
            nf_service_status: NfServiceStatus::Registered,
            api_prefix: String::new(),
            ip_end_points: Vec::new(),
            supported_features: None,
        }
    }

    /// URI version tokens this service answers on
    pub fn uri_versions(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(|v| v.api_version_in_uri.as_str())
    }
}

/// NF profile as handed to the NRF client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfProfile {
    pub nf_instance_id: String,
    pub nf_type: NfType,
    pub nf_status: NfServiceStatus,
    pub ipv4_addresses: Vec<String>,
    pub nf_services: Vec<NfService>,
}

impl NfProfile {
    /// Find a service by name
    pub fn find_service(&self, service_name: &str) -> Option<&NfService> {
        self.nf_services.iter().find(|s| s.service_name == service_name)
    }
}
