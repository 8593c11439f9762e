//! Protocol bridge: one synchronous engine call per check.

use crate::error::CheckError;
use crate::protocols::{
    Clock, EppResponse, FlowEngine, FlowKind, SessionMetadata, SessionSource, Trid, FEE_0_6_URI,
};
use crate::request::RequestPayload;
use crate::types::CheckConfig;
use std::sync::Arc;
use tracing::debug;

/// Invokes the protocol engine on behalf of the unauthenticated endpoint.
///
/// Holds only read-only state. Session metadata is built fresh for every
/// call; nothing is retried and no timeout is imposed here.
#[derive(Clone)]
pub struct ProtocolBridge {
    engine: Arc<dyn FlowEngine>,
    clock: Arc<dyn Clock>,
    client_id: String,
    trid_label: String,
}

impl ProtocolBridge {
    pub fn new(engine: Arc<dyn FlowEngine>, clock: Arc<dyn Clock>, config: &CheckConfig) -> Self {
        Self {
            engine,
            clock,
            client_id: config.client_id.clone(),
            trid_label: config.trid_label.clone(),
        }
    }

    /// Session for one endpoint call: configured client id, no superuser,
    /// no dry run, fee extension declared, plain HTTP source.
    pub fn session_metadata(&self) -> SessionMetadata {
        SessionMetadata::stateless(
            self.client_id.as_str(),
            false,
            false,
            [FEE_0_6_URI],
            SessionSource::Http,
        )
    }

    /// Run the domain check flow for `payload`.
    ///
    /// # Errors
    ///
    /// Declared engine failures come back as `CheckError::Protocol` with the
    /// engine's message; every other engine failure as `CheckError::Engine`.
    pub fn execute(&self, payload: &RequestPayload) -> Result<EppResponse, CheckError> {
        let session = self.session_metadata();
        let trid = Trid::create(self.trid_label.as_str());

        debug!(
            flow = %FlowKind::DomainCheck,
            trid = %trid,
            names = ?payload.input().domain_names,
            "Executing check flow"
        );

        let response = self.engine.run(
            FlowKind::DomainCheck,
            payload.input(),
            &trid,
            &session,
            payload.bytes(),
            None,
            self.clock.as_ref(),
        )?;

        Ok(response)
    }
}

impl std::fmt::Debug for ProtocolBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolBridge")
            .field("client_id", &self.client_id)
            .field("trid_label", &self.trid_label)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize;
    use crate::protocols::{EngineError, EppInput, SystemClock};
    use crate::request::RequestBuilder;
    use crate::template::CachedTemplates;
    use crate::zones::ManagedZones;
    use std::sync::Mutex;

    /// Records what the bridge passed in and replies with a fixed result.
    struct RecordingEngine {
        seen: Mutex<Vec<(FlowKind, Trid, SessionMetadata, usize, bool)>>,
        reply: Result<EppResponse, EngineError>,
    }

    impl FlowEngine for RecordingEngine {
        fn run(
            &self,
            flow: FlowKind,
            _input: &EppInput,
            trid: &Trid,
            session: &SessionMetadata,
            raw_payload: &[u8],
            response_hint: Option<&str>,
            _clock: &dyn Clock,
        ) -> Result<EppResponse, EngineError> {
            self.seen.lock().unwrap().push((
                flow,
                trid.clone(),
                session.clone(),
                raw_payload.len(),
                response_hint.is_none(),
            ));
            self.reply.clone()
        }
    }

    fn payload() -> RequestPayload {
        let domain = normalize(Some("example.app"), &ManagedZones::new(["app"])).unwrap();
        RequestBuilder::new(Arc::new(CachedTemplates))
            .build(&domain)
            .unwrap()
    }

    #[test]
    fn test_execute_passes_fixed_session() {
        let engine = Arc::new(RecordingEngine {
            seen: Mutex::new(Vec::new()),
            reply: Ok(EppResponse::default()),
        });
        let config = CheckConfig::default().with_client_id("NewRegistrar");
        let bridge = ProtocolBridge::new(engine.clone(), Arc::new(SystemClock), &config);

        let payload = payload();
        bridge.execute(&payload).unwrap();
        bridge.execute(&payload).unwrap();

        let seen = engine.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        let (flow, trid, session, payload_len, no_hint) = &seen[0];
        assert_eq!(*flow, FlowKind::DomainCheck);
        assert_eq!(trid.client_transaction_id(), "CheckApiAction");
        assert_eq!(session.client_id(), "NewRegistrar");
        assert!(!session.is_superuser());
        assert!(!session.is_dry_run());
        assert!(session.declares_extension(FEE_0_6_URI));
        assert_eq!(session.source(), SessionSource::Http);
        assert_eq!(*payload_len, payload.bytes().len());
        assert!(*no_hint);

        // Same label on every call
        assert_eq!(seen[0].1, seen[1].1);
    }

    #[test]
    fn test_execute_maps_engine_errors() {
        let protocol = ProtocolBridge::new(
            Arc::new(RecordingEngine {
                seen: Mutex::new(Vec::new()),
                reply: Err(EngineError::unimplemented()),
            }),
            Arc::new(SystemClock),
            &CheckConfig::default(),
        );
        assert_eq!(
            protocol.execute(&payload()).unwrap_err(),
            CheckError::protocol(2101, "Command is not implemented")
        );

        let internal = ProtocolBridge::new(
            Arc::new(RecordingEngine {
                seen: Mutex::new(Vec::new()),
                reply: Err(EngineError::internal("datastore unavailable")),
            }),
            Arc::new(SystemClock),
            &CheckConfig::default(),
        );
        assert_eq!(
            internal.execute(&payload()).unwrap_err(),
            CheckError::engine("datastore unavailable")
        );
    }
}
