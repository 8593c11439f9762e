//! Protocol model and execution engine interface.
//!
//! This module contains the EPP-style types the bridge exchanges with a
//! protocol execution engine, the engine trait itself, and a table-driven
//! reference engine.

/// Request/response model for a domain check
pub mod epp;

/// Engine trait, engine errors and the time source
pub mod engine;

/// Table-driven reference engine
pub mod table;

// Re-export commonly used types
pub use engine::{Clock, EngineError, FlowEngine, SystemClock};
pub use epp::{
    DomainCheck, DomainCheckData, EppInput, EppResponse, FeeCheck, FeeCheckCommand,
    FeeCheckResponse, FlowKind, ResponseData, ResponseExtension, SessionMetadata, SessionSource,
    Trid, FEE_0_6_URI,
};
pub use table::TableEngine;
