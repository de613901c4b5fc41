//! CHF Context Management
//!
//! The CHF context bundles the NF identity, the advertised NF services, the
//! UE pool and the CDR ledger. The daemon builds one at startup and shares it
//! by `Arc`; tests build their own with [`ChfContext::new`].

use std::sync::{Arc, OnceLock};

use ogs_sbi::{NfProfile, NfServiceStatus, NfType, UriScheme};

use crate::cdr::CdrLedger;
use crate::config::{ChfConfig, ServiceConf};
use crate::error::{ChfError, ChfResult};
use crate::nf_service::NfServiceRegistry;
use crate::ue::{ChfUe, UePool};

/// Identity of this CHF instance, fixed after initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChfIdentity {
    pub nf_id: String,
    pub name: String,
    pub uri_scheme: UriScheme,
    pub binding_ipv4: String,
    pub register_ipv4: String,
    pub sbi_port: u16,
    pub nrf_uri: String,
}

impl ChfIdentity {
    pub fn from_config(config: &ChfConfig) -> Self {
        let conf = &config.configuration;
        let nf_id = conf
            .nf_instance_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Self {
            nf_id,
            name: conf.chf_name.clone(),
            uri_scheme: conf.sbi.scheme,
            binding_ipv4: conf.sbi.binding_ipv4.clone(),
            register_ipv4: conf.sbi.register_ipv4.clone(),
            sbi_port: conf.sbi.port,
            nrf_uri: conf.nrf_uri.clone(),
        }
    }

    /// Base URI of the SBI server, "<scheme>://<registerIPv4>:<port>"
    pub fn ipv4_uri(&self) -> String {
        format!("{}://{}:{}", self.uri_scheme, self.register_ipv4, self.sbi_port)
    }
}

impl Default for ChfIdentity {
    fn default() -> Self {
        Self::from_config(&ChfConfig::default())
    }
}

/// CHF Context - main context structure for CHF
#[derive(Debug)]
pub struct ChfContext {
    identity: ChfIdentity,
    nf_services: NfServiceRegistry,
    ue_pool: UePool,
    cdr_ledger: CdrLedger,
    max_num_of_ue: usize,
}

impl ChfContext {
    pub fn new(identity: ChfIdentity, max_num_of_ue: usize) -> Self {
        Self {
            identity,
            nf_services: NfServiceRegistry::new(),
            ue_pool: UePool::new(),
            cdr_ledger: CdrLedger::new(),
            max_num_of_ue,
        }
    }

    /// Build a context from configuration and initialize its NF services
    pub fn from_config(config: &ChfConfig) -> ChfResult<Self> {
        let ctx = Self::new(ChfIdentity::from_config(config), config.configuration.max_ue);
        ctx.init_nf_service(&config.configuration.service_list, &config.info.version)?;
        log::info!(
            "CHF context initialized (nf_id={}, uri={})",
            ctx.identity.nf_id,
            ctx.identity.ipv4_uri()
        );
        Ok(ctx)
    }

    pub fn identity(&self) -> &ChfIdentity {
        &self.identity
    }

    pub fn ipv4_uri(&self) -> String {
        self.identity.ipv4_uri()
    }

    pub fn nf_services(&self) -> &NfServiceRegistry {
        &self.nf_services
    }

    pub fn ue_pool(&self) -> &UePool {
        &self.ue_pool
    }

    pub fn cdr_ledger(&self) -> &CdrLedger {
        &self.cdr_ledger
    }

    /// Init NF services from the supported service list and API version
    pub fn init_nf_service(&self, service_list: &[ServiceConf], version: &str) -> ChfResult<()> {
        self.nf_services.init(&self.identity, service_list, version)
    }

    /// Allocate a UE context for an IMSI-based SUPI
    pub fn ue_add(&self, supi: &str) -> ChfResult<Arc<ChfUe>> {
        let ue = self.ue_pool.add(supi)?;
        log::info!("[{supi}] CHF UE context added (total={})", self.ue_pool.count());
        Ok(ue)
    }

    pub fn ue_find_by_supi(&self, supi: &str) -> Option<Arc<ChfUe>> {
        self.ue_pool.find_by_supi(supi)
    }

    pub fn allocate_sequence_number(&self) -> u64 {
        self.cdr_ledger.allocate_sequence_number()
    }

    /// UE load percentage for NRF heartbeats
    pub fn get_ue_load(&self) -> i32 {
        if self.max_num_of_ue == 0 {
            return 0;
        }
        ((self.ue_pool.count() * 100) / self.max_num_of_ue) as i32
    }

    /// NF profile for NRF registration
    pub fn nf_profile(&self) -> NfProfile {
        let mut nf_services: Vec<_> = self.nf_services.snapshot().values().cloned().collect();
        nf_services.sort_by_key(|s| s.service_instance_id.parse::<usize>().unwrap_or(usize::MAX));

        NfProfile {
            nf_instance_id: self.identity.nf_id.clone(),
            nf_type: NfType::Chf,
            nf_status: NfServiceStatus::Registered,
            ipv4_addresses: vec![self.identity.register_ipv4.clone()],
            nf_services,
        }
    }
}

/// Global CHF context
static GLOBAL_CHF_CONTEXT: OnceLock<Arc<ChfContext>> = OnceLock::new();

/// Install `ctx` as the process-wide CHF context
pub fn chf_context_init(ctx: ChfContext) -> ChfResult<Arc<ChfContext>> {
    let ctx = Arc::new(ctx);
    GLOBAL_CHF_CONTEXT
        .set(Arc::clone(&ctx))
        .map_err(|_| ChfError::AlreadyInitialized)?;
    Ok(ctx)
}

/// Get the global CHF context
///
/// Falls back to a context built from default configuration when none was
/// installed.
pub fn chf_self() -> Arc<ChfContext> {
    GLOBAL_CHF_CONTEXT
        .get_or_init(|| {
            Arc::new(ChfContext::new(ChfIdentity::default(), crate::config::MAX_NUM_OF_UE))
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> ChfContext {
        let identity = ChfIdentity {
            nf_id: "5b5b4ad4-0000-4000-8000-000000000001".to_string(),
            uri_scheme: UriScheme::Https,
            register_ipv4: "10.0.0.1".to_string(),
            sbi_port: 29508,
            ..ChfIdentity::default()
        };
        ChfContext::new(identity, 100)
    }

    #[test]
    fn test_ipv4_uri() {
        let ctx = test_context();
        assert_eq!(ctx.ipv4_uri(), "https://10.0.0.1:29508");

        let identity = ChfIdentity {
            uri_scheme: UriScheme::Http,
            register_ipv4: "127.0.0.113".to_string(),
            sbi_port: 8000,
            ..ChfIdentity::default()
        };
        assert_eq!(identity.ipv4_uri(), "http://127.0.0.113:8000");
    }

    #[test]
    fn test_identity_from_config() {
        let mut config = ChfConfig::default();
        config.configuration.nf_instance_id = Some("chf-1".to_string());
        let identity = ChfIdentity::from_config(&config);
        assert_eq!(identity.nf_id, "chf-1");
        assert_eq!(identity.name, "CHF");
        assert_eq!(identity.uri_scheme, UriScheme::Https);
        assert_eq!(identity.ipv4_uri(), "https://127.0.0.113:8000");
    }

    #[test]
    fn test_generated_nf_id() {
        let a = ChfIdentity::from_config(&ChfConfig::default());
        let b = ChfIdentity::from_config(&ChfConfig::default());
        assert!(uuid::Uuid::parse_str(&a.nf_id).is_ok());
        assert_ne!(a.nf_id, b.nf_id);
    }

    #[test]
    fn test_from_config_inits_services() {
        let ctx = ChfContext::from_config(&ChfConfig::default()).unwrap();
        let service = ctx.nf_services().get("nchf-convergedcharging").unwrap();
        assert_eq!(service.service_instance_id, "0");
        assert_eq!(service.versions[0].api_version_in_uri, "v1");
    }

    #[test]
    fn test_from_config_malformed_version() {
        let mut config = ChfConfig::default();
        config.info.version = String::new();
        assert_eq!(
            ChfContext::from_config(&config).unwrap_err(),
            ChfError::MalformedVersion(String::new())
        );
    }

    #[test]
    fn test_ue_add_find() {
        let ctx = test_context();
        let ue = ctx.ue_add("imsi-001").unwrap();
        let found = ctx.ue_find_by_supi("imsi-001").unwrap();
        assert!(Arc::ptr_eq(&ue, &found));

        assert!(matches!(ctx.ue_add("notimsi-1"), Err(ChfError::InvalidIdentifier(_))));
        assert!(ctx.ue_find_by_supi("notimsi-1").is_none());
    }

    #[test]
    fn test_get_ue_load() {
        let ctx = test_context();
        assert_eq!(ctx.get_ue_load(), 0);
        for i in 0..10 {
            ctx.ue_add(&format!("imsi-00{i}")).unwrap();
        }
        assert_eq!(ctx.get_ue_load(), 10);

        let unbounded = ChfContext::new(ChfIdentity::default(), 0);
        assert_eq!(unbounded.get_ue_load(), 0);
    }

    #[test]
    fn test_nf_profile() {
        let ctx = test_context();
        let list: Vec<ServiceConf> = [
            "nchf-convergedcharging",
            "nchf-spendinglimitcontrol",
            "nchf-offlineonlycharging",
        ]
        .into_iter()
        .map(ServiceConf::new)
        .collect();
        ctx.init_nf_service(&list, "1.0.3").unwrap();

        let profile = ctx.nf_profile();
        assert_eq!(profile.nf_instance_id, ctx.identity().nf_id);
        assert_eq!(profile.nf_type, NfType::Chf);
        assert_eq!(profile.ipv4_addresses, vec!["10.0.0.1".to_string()]);
        let names: Vec<_> = profile.nf_services.iter().map(|s| s.service_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "nchf-convergedcharging",
                "nchf-spendinglimitcontrol",
                "nchf-offlineonlycharging"
            ]
        );
    }

    #[test]
    fn test_allocate_sequence_number() {
        let ctx = test_context();
        let a = ctx.allocate_sequence_number();
        let b = ctx.allocate_sequence_number();
        assert!(b > a);
    }

    #[test]
    fn test_global_context() {
        let installed = chf_context_init(test_context()).unwrap();
        assert!(Arc::ptr_eq(&installed, &chf_self()));
        assert!(Arc::ptr_eq(&chf_self(), &chf_self()));
        assert_eq!(
            chf_context_init(test_context()).unwrap_err(),
            ChfError::AlreadyInitialized
        );
    }
}
