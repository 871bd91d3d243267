//! tests/common/harness.rs
use std::{sync::{Arc, Once}, time::Duration};
use tokio::sync::mpsc;
use wimax_session::{
    Config, SessionEvent, SessionHandle, WimaxState,
    driver::{DriverCallbacks, mock::ScriptedBackend},
};

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "wimax_session=debug".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// A running session over a scripted backend, with its event stream.
pub struct SessionHarness {
    pub handle: SessionHandle,
    pub callbacks: DriverCallbacks,
    pub backend: ScriptedBackend,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionHarness {
    pub fn spawn() -> Self {
        Self::spawn_with(Config::default(), ScriptedBackend::new())
    }

    pub fn spawn_with(config: Config, backend: ScriptedBackend) -> Self {
        init_tracing();
        let (tx, events) = mpsc::unbounded_channel();
        let (handle, callbacks) = SessionHandle::spawn(config, backend.clone(), Arc::new(tx));
        Self {
            handle,
            callbacks,
            backend,
            events,
        }
    }

    /// Waits for the next event matching `predicate`, skipping the others.
    pub async fn wait_for(
        &mut self,
        predicate: impl Fn(&SessionEvent) -> bool,
    ) -> SessionEvent {
        tokio::time::timeout(Duration::from_secs(60), async {
            loop {
                let event = self.events.recv().await.expect("event stream closed");
                if predicate(&event) {
                    return event;
                }
            }
        })
        .await
        .expect("timed out waiting for session event")
    }

    /// Waits until `state` is reported.
    pub async fn wait_for_state(&mut self, state: WimaxState) -> SessionEvent {
        self.wait_for(|event| {
            matches!(event, SessionEvent::StateChanged { state: reported, .. } if *reported == state)
        })
        .await
    }

    /// Collects the reported states until `last` is reported, inclusive.
    pub async fn states_until(&mut self, last: WimaxState) -> Vec<WimaxState> {
        let mut states = Vec::new();
        tokio::time::timeout(Duration::from_secs(60), async {
            loop {
                let event = self.events.recv().await.expect("event stream closed");
                if let SessionEvent::StateChanged { state, .. } = event {
                    states.push(state);
                    if state == last {
                        return;
                    }
                }
            }
        })
        .await
        .expect("timed out collecting session states");
        states
    }
}
