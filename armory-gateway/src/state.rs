//! Shared application state handed to every handler.

use std::sync::Arc;

use armory_veil::PayloadGenerator;

use crate::store::{PayloadStore, SessionStore, UserStore};

/// Everything a request handler can reach: the registries and the generator
/// backend. Cheap to clone; all fields are shared.
#[derive(Clone)]
pub struct AppState {
    /// Payload record registry.
    pub payloads: Arc<PayloadStore>,
    /// User registry.
    pub users: Arc<UserStore>,
    /// Session-token registry.
    pub sessions: Arc<SessionStore>,
    /// The payload generation backend.
    pub generator: Arc<dyn PayloadGenerator>,
}

impl AppState {
    /// Assemble state around a generator backend, with empty registries.
    #[must_use]
    pub fn new(generator: Arc<dyn PayloadGenerator>) -> Self {
        Self {
            payloads: Arc::new(PayloadStore::new()),
            users: Arc::new(UserStore::new()),
            sessions: Arc::new(SessionStore::new()),
            generator,
        }
    }
}
