//! Error handling for registry check operations.
//!
//! Every failure on the check path is a [`CheckError`]. The variants fall
//! into three kinds, reported by [`CheckError::kind`], and the error
//! classifier switches on that kind alone.

use crate::protocols::EngineError;
use std::fmt;

/// Reason returned for every input that fails normalization or zone lookup.
pub const INVALID_DOMAIN_REASON: &str = "Must supply a valid domain name on an authoritative TLD";

/// Reason returned for every failure that is neither validation nor protocol.
pub const GENERIC_FAILURE_REASON: &str = "Invalid request";

/// Coarse failure category used to decide what a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Bad or unmanaged domain, detected before any protocol call
    Validation,
    /// Declared failure from the protocol engine; message is caller-safe
    Protocol,
    /// Anything else; detail stays server-side
    Unexpected,
}

/// Main error type for registry check operations.
///
/// Covers the check path (validation, protocol, rendering, engine contract)
/// as well as configuration loading for the binaries built on this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// Input is empty, malformed, or not on a managed zone.
    ///
    /// `detail` is for server-side logs only and never names the raw input.
    InvalidDomain { detail: String },

    /// Declared protocol failure (EPP result code plus caller-safe message)
    Protocol { code: u16, message: String },

    /// Template rendering fault
    Render { template: String, message: String },

    /// Engine failure that was not a declared protocol error
    Engine { message: String },

    /// Engine response did not have the shape a single-domain check promises
    ContractViolation { message: String },

    /// Configuration errors (invalid settings, unparsable files)
    ConfigError { message: String },

    /// File I/O errors when reading configuration
    FileError { path: String, message: String },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl CheckError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>>(detail: D) -> Self {
        Self::InvalidDomain {
            detail: detail.into(),
        }
    }

    /// Create a new protocol error.
    pub fn protocol<M: Into<String>>(code: u16, message: M) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
        }
    }

    /// Create a new rendering error.
    pub fn render<T: Into<String>, M: Into<String>>(template: T, message: M) -> Self {
        Self::Render {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create a new engine error.
    pub fn engine<M: Into<String>>(message: M) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }

    /// Create a new contract violation error.
    pub fn contract<M: Into<String>>(message: M) -> Self {
        Self::ContractViolation {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Which of the three failure kinds this error belongs to.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidDomain { .. } => FailureKind::Validation,
            Self::Protocol { .. } => FailureKind::Protocol,
            Self::Render { .. }
            | Self::Engine { .. }
            | Self::ContractViolation { .. }
            | Self::ConfigError { .. }
            | Self::FileError { .. }
            | Self::Internal { .. } => FailureKind::Unexpected,
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { detail } => write!(f, "Invalid domain: {}", detail),
            Self::Protocol { code, message } => {
                write!(f, "Protocol error {}: {}", code, message)
            }
            Self::Render { template, message } => {
                write!(f, "Failed to render template '{}': {}", template, message)
            }
            Self::Engine { message } => write!(f, "Engine error: {}", message),
            Self::ContractViolation { message } => {
                write!(f, "Engine contract violation: {}", message)
            }
            Self::ConfigError { message } => write!(f, "Configuration error: {}", message),
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for CheckError {}

impl From<EngineError> for CheckError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Protocol { code, message } => Self::Protocol { code, message },
            EngineError::Internal { message } => Self::Engine { message },
        }
    }
}

impl From<std::io::Error> for CheckError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<toml::de::Error> for CheckError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}
