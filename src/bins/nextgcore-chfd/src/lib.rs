//! NextGCore CHF (Charging Function) Library
//!
//! Runtime state of the 5G charging function (Nchf service producer):
//! the NF identity and the NF services advertised to the NRF, the UE
//! contexts keyed by SUPI, and the CDR ledger with its local record
//! sequence numbers.

pub mod cdr;
pub mod config;
pub mod context;
pub mod error;
pub mod nf_service;
pub mod ue;

#[cfg(test)]
mod property_tests;

// Re-export commonly used types
pub use cdr::{CdrLedger, ChfRecord, MultipleUnitUsage, UsedUnitContainer};
pub use config::{ChfConfig, ConfigError, ServiceConf};
pub use context::{chf_context_init, chf_self, ChfContext, ChfIdentity};
pub use error::{ChfError, ChfResult};
pub use nf_service::{api_version_in_uri, NfServiceMap, NfServiceRegistry};
pub use ue::{ChfUe, ChfUeState, UePool, SUPI_IMSI_PREFIX};
