//! CHF Error Types

use ogs_sbi::SbiAppError;
use thiserror::Error;

/// CHF context error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChfError {
    /// SUPI is empty or not in "imsi-" form
    #[error("Invalid subscriber identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A UE context already exists for this SUPI
    #[error("Subscriber context already exists: {0}")]
    DuplicateSubscriber(String),

    /// API version string yields no major version token
    #[error("Malformed API version: {0:?}")]
    MalformedVersion(String),

    /// The process-wide context was installed twice
    #[error("CHF context already initialized")]
    AlreadyInitialized,
}

impl ChfError {
    /// Nchf application error the SBI layer reports for this failure
    pub fn app_error(&self) -> SbiAppError {
        match self {
            Self::InvalidIdentifier(_) => SbiAppError::MandatoryIeIncorrect,
            Self::DuplicateSubscriber(_) => SbiAppError::ContextAlreadyExists,
            Self::MalformedVersion(_) | Self::AlreadyInitialized => SbiAppError::ChargingFailed,
        }
    }

    /// HTTP status code for this failure
    pub fn status_code(&self) -> u16 {
        self.app_error().status_code()
    }
}

/// Result type for CHF context operations
pub type ChfResult<T> = Result<T, ChfError>;
