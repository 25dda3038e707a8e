//! Shared application state for the gateway.

use std::sync::Arc;

use parley_relay::Relay;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(relay: Arc<Relay>) -> Self {
        Self { relay }
    }
}
