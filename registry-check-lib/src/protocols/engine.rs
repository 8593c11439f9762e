//! The protocol execution engine seam.
//!
//! The engine owns all domain semantics (registration state, reserved lists,
//! pricing). The bridge only hands it a request and reads back a response.

use super::epp::{EppInput, EppResponse, FlowKind, SessionMetadata, Trid};
use std::fmt;
use std::time::SystemTime;

/// EPP result code for a command the server does not implement.
pub const UNIMPLEMENTED_COMMAND: u16 = 2101;

/// EPP result code for a missing required parameter.
pub const REQUIRED_PARAMETER_MISSING: u16 = 2003;

/// Source of the current time, shared by all calls.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Failure reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Declared protocol failure. `message` is vetted as safe to show callers.
    Protocol { code: u16, message: String },
    /// Anything else (storage, I/O, bugs). Never shown to callers.
    Internal { message: String },
}

impl EngineError {
    pub fn protocol<M: Into<String>>(code: u16, message: M) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
        }
    }

    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The standard "Command is not implemented" failure.
    pub fn unimplemented() -> Self {
        Self::protocol(UNIMPLEMENTED_COMMAND, "Command is not implemented")
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol { code, message } => write!(f, "{} ({})", message, code),
            Self::Internal { message } => write!(f, "internal engine failure: {}", message),
        }
    }
}

impl std::error::Error for EngineError {}

/// Executes protocol flows.
///
/// Calls are synchronous and may block for as long as the engine needs;
/// callers on an async runtime should run them on a blocking thread.
pub trait FlowEngine: Send + Sync {
    /// Run one flow to completion.
    ///
    /// # Arguments
    ///
    /// * `flow` - Which flow to run
    /// * `input` - Typed request
    /// * `trid` - Client transaction id for correlation
    /// * `session` - Per-call session metadata
    /// * `raw_payload` - The rendered request bytes `input` was built alongside
    /// * `response_hint` - Optional hint for response formatting
    /// * `clock` - Time source
    #[allow(clippy::too_many_arguments)]
    fn run(
        &self,
        flow: FlowKind,
        input: &EppInput,
        trid: &Trid,
        session: &SessionMetadata,
        raw_payload: &[u8],
        response_hint: Option<&str>,
        clock: &dyn Clock,
    ) -> Result<EppResponse, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unimplemented_message() {
        assert_eq!(
            EngineError::unimplemented(),
            EngineError::Protocol {
                code: 2101,
                message: "Command is not implemented".to_string()
            }
        );
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
