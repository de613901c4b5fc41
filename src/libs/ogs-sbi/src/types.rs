//! SBI Types and Constants
//!
//! Service names, NF types and the enumerations used by NF service
//! descriptors, matching the OpenAPI definitions of TS 29.510 / TS 29.594.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SBI Service Types handled by the charging function and its NRF peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum SbiServiceType {
    Null = 0,
    NnrfNfm,
    NnrfDisc,
    NchfSpendinglimitcontrol,
    NchfConvergedcharging,
    NchfOfflineonlycharging,
}

impl SbiServiceType {
    /// Convert service type to service name string
    pub fn to_name(&self) -> &'static str {
        match self {
            Self::Null => "",
            Self::NnrfNfm => "nnrf-nfm",
            Self::NnrfDisc => "nnrf-disc",
            Self::NchfSpendinglimitcontrol => "nchf-spendinglimitcontrol",
            Self::NchfConvergedcharging => "nchf-convergedcharging",
            Self::NchfOfflineonlycharging => "nchf-offlineonlycharging",
        }
    }

    /// Convert service name string to service type
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "nnrf-nfm" => Some(Self::NnrfNfm),
            "nnrf-disc" => Some(Self::NnrfDisc),
            "nchf-spendinglimitcontrol" => Some(Self::NchfSpendinglimitcontrol),
            "nchf-convergedcharging" => Some(Self::NchfConvergedcharging),
            "nchf-offlineonlycharging" => Some(Self::NchfOfflineonlycharging),
            _ => None,
        }
    }

    /// True for the services a CHF produces
    pub fn is_nchf(&self) -> bool {
        matches!(
            self,
            Self::NchfSpendinglimitcontrol
                | Self::NchfConvergedcharging
                | Self::NchfOfflineonlycharging
        )
    }
}

impl fmt::Display for SbiServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_name())
    }
}

/// NF Type enumeration - matches OpenAPI_nf_type_e
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NfType {
    Nrf,
    Smf,
    Pcf,
    Chf,
}

impl NfType {
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Nrf => "NRF",
            Self::Smf => "SMF",
            Self::Pcf => "PCF",
            Self::Chf => "CHF",
        }
    }
}

impl fmt::Display for NfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// URI Scheme - matches OpenAPI_uri_scheme_e
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UriScheme {
    Http,
    #[default]
    Https,
}

impl UriScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }
}

impl fmt::Display for UriScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// NF service status - matches OpenAPI_nf_service_status_e
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NfServiceStatus {
    #[default]
    Registered,
    Suspended,
    Undiscoverable,
}

impl NfServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "REGISTERED",
            Self::Suspended => "SUSPENDED",
            Self::Undiscoverable => "UNDISCOVERABLE",
        }
    }
}

impl fmt::Display for NfServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transport protocol of an IP endpoint - matches OpenAPI_transport_protocol_e
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportProtocol {
    #[default]
    Tcp,
}

impl TransportProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "TCP",
        }
    }
}

/// Nchf application errors (TS 29.594 table 6.1.7.3-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SbiAppError {
    ChargingFailed,
    ChargingNotApplicable,
    UserUnknown,
    MandatoryIeIncorrect,
    ContextAlreadyExists,
}

impl SbiAppError {
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::ChargingFailed => "CHARGING_FAILED",
            Self::ChargingNotApplicable => "CHARGING_NOT_APPLICABLE",
            Self::UserUnknown => "USER_UNKNOWN",
            Self::MandatoryIeIncorrect => "MANDATORY_IE_INCORRECT",
            Self::ContextAlreadyExists => "CONTEXT_ALREADY_EXISTS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "CHARGING_FAILED" => Some(Self::ChargingFailed),
            "CHARGING_NOT_APPLICABLE" => Some(Self::ChargingNotApplicable),
            "USER_UNKNOWN" => Some(Self::UserUnknown),
            "MANDATORY_IE_INCORRECT" => Some(Self::MandatoryIeIncorrect),
            "CONTEXT_ALREADY_EXISTS" => Some(Self::ContextAlreadyExists),
            _ => None,
        }
    }

    /// HTTP status code the SBI layer answers with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ChargingFailed => 500,
            Self::ChargingNotApplicable => 403,
            Self::UserUnknown => 404,
            Self::MandatoryIeIncorrect => 400,
            Self::ContextAlreadyExists => 409,
        }
    }
}

impl fmt::Display for SbiAppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}
