//! CHF NF Service Registry
//!
//! Builds the NF service descriptors the CHF advertises to the NRF. The
//! service map is swapped as a whole, so readers see either the previous or
//! the new set of services.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use ogs_sbi::{IpEndPoint, NfService, NfServiceStatus, NfServiceVersion, TransportProtocol};

use crate::config::ServiceConf;
use crate::context::ChfIdentity;
use crate::error::{ChfError, ChfResult};

/// Service name -> NF service descriptor
pub type NfServiceMap = HashMap<String, NfService>;

/// Derive the URI version token ("v1") from a full API version ("1.0.3")
pub fn api_version_in_uri(api_full_version: &str) -> ChfResult<String> {
    let major = api_full_version.split('.').next().unwrap_or_default();
    if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChfError::MalformedVersion(api_full_version.to_string()));
    }
    Ok(format!("v{major}"))
}

/// Build the descriptor of one configured service
pub fn build_nf_service(
    identity: &ChfIdentity,
    index: usize,
    service: &ServiceConf,
    version: &NfServiceVersion,
) -> NfService {
    NfService {
        service_instance_id: index.to_string(),
        service_name: service.service_name.clone(),
        versions: vec![version.clone()],
        scheme: identity.uri_scheme,
        nf_service_status: NfServiceStatus::Registered,
        api_prefix: identity.ipv4_uri(),
        ip_end_points: vec![IpEndPoint {
            ipv4_address: identity.register_ipv4.clone(),
            transport: TransportProtocol::Tcp,
            port: identity.sbi_port,
        }],
        supported_features: service.supp_feat.clone(),
    }
}

/// Registry of the services this CHF instance provides
#[derive(Debug)]
pub struct NfServiceRegistry {
    services: ArcSwap<NfServiceMap>,
}

impl NfServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Replace all services with those built from `service_list`
    ///
    /// Instance ids follow the position in `service_list`. On error the
    /// current services are kept.
    pub fn init(
        &self,
        identity: &ChfIdentity,
        service_list: &[ServiceConf],
        version: &str,
    ) -> ChfResult<()> {
        let version = NfServiceVersion {
            api_full_version: version.to_string(),
            api_version_in_uri: api_version_in_uri(version)?,
        };

        let services: NfServiceMap = service_list
            .iter()
            .enumerate()
            .map(|(index, service)| {
                (
                    service.service_name.clone(),
                    build_nf_service(identity, index, service, &version),
                )
            })
            .collect();

        log::debug!(
            "NF services initialized ({} services, version {})",
            services.len(),
            version.api_full_version
        );
        self.services.store(Arc::new(services));
        Ok(())
    }

    /// Current service map
    pub fn snapshot(&self) -> Arc<NfServiceMap> {
        self.services.load_full()
    }

    pub fn get(&self, service_name: &str) -> Option<NfService> {
        self.services.load().get(service_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.services.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.load().is_empty()
    }
}

impl Default for NfServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
