//! NextGCore SBI (Service Based Interface) Library
//!
//! Service types and NF service descriptor models shared by the network
//! functions. The HTTP/2 transport lives with the daemons that need it.
//!
//! # Modules
//!
//! - [`types`] - Service types, NF types, and enumerations
//! - [`nf_service`] - NF service, version, endpoint and profile descriptors

pub mod nf_service;
pub mod types;

// Re-export commonly used types
pub use nf_service::{IpEndPoint, NfProfile, NfService, NfServiceVersion};
pub use types::{
    NfServiceStatus, NfType, SbiAppError, SbiServiceType, TransportProtocol, UriScheme,
};
