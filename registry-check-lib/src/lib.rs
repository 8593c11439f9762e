//! # Registry Check Library
//!
//! Bridges a public "is this domain available?" query onto a registry's
//! protocol execution engine and answers with a minimal JSON envelope.
//!
//! One check runs through these stages:
//!
//! 1. Normalize the raw name (IDNA/UTS-46) and resolve its managed zone
//! 2. Render an EPP domain check request with a fee extension
//! 3. Run the check flow on a [`FlowEngine`] with a stateless session
//! 4. Translate the engine's response into a [`CheckResponse`]
//!
//! Any failure along the way is classified into an error envelope; engine
//! internals and the caller's raw input never reach the response.
//!
//! ## Quick Start
//!
//! ```rust
//! use registry_check_lib::{CheckConfig, DomainChecker, TableEngine};
//! use std::sync::Arc;
//!
//! let engine = TableEngine::new().with_premium("rich.app", "premium");
//! let checker = DomainChecker::new(CheckConfig::default(), Arc::new(engine));
//!
//! let json = checker.check(Some("rich.app")).to_json().unwrap();
//! assert_eq!(json, r#"{"status":"success","available":true,"tier":"premium"}"#);
//! ```

// Re-export main public API types and functions
// This makes them available as registry_check_lib::TypeName
pub use bridge::ProtocolBridge;
pub use checker::DomainChecker;
pub use classify::classify;
pub use config::{
    env_config_from, load_env_config, validate_zones, CheckSection, ConfigManager, EngineConfig,
    EnvConfig, FileConfig, ServerSection,
};
pub use domain::{canonicalize_domain_name, normalize, NormalizedDomain};
pub use error::{CheckError, FailureKind, GENERIC_FAILURE_REASON, INVALID_DOMAIN_REASON};
pub use protocols::{
    Clock, DomainCheck, DomainCheckData, EngineError, EppInput, EppResponse, FeeCheck,
    FeeCheckCommand, FeeCheckResponse, FlowEngine, FlowKind, ResponseData, ResponseExtension,
    SessionMetadata, SessionSource, SystemClock, TableEngine, Trid, FEE_0_6_URI,
};
pub use request::{RequestBuilder, RequestPayload};
pub use template::{CachedTemplates, TemplateData, TemplateKey, TemplateRenderer};
pub use translate::translate;
pub use types::{CheckConfig, CheckResponse, STANDARD_TIER};
pub use zones::{ManagedZones, Zone, ZoneRegistry};

// Public modules
pub mod protocols;

// Internal modules - these are not part of the public API
mod bridge;
mod checker;
mod classify;
mod config;
mod domain;
mod error;
mod request;
mod template;
mod translate;
mod types;
mod zones;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, CheckError>;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
