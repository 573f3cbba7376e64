//! HTTP API for the call simulator
//!
//! Thin presentation surface over the call controller: snapshots out,
//! start/submit/reset in, plus profile editing.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::dialogue::Receptionist;
use crate::profile::ProfileStore;
use crate::session::{CallController, CallSnapshot};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

/// Controller type served by the API
pub type Controller = CallController<Receptionist>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Held across the collaborator call so turns never interleave
    pub call: Arc<Mutex<Controller>>,
    pub profiles: ProfileStore,
    pub updates: broadcast::Sender<CallSnapshot>,
}

impl AppState {
    pub fn new(controller: Controller, profiles: ProfileStore) -> Self {
        let (updates, _) = broadcast::channel(64);
        Self {
            call: Arc::new(Mutex::new(controller)),
            profiles,
            updates,
        }
    }

    /// Send a snapshot to stream subscribers
    pub fn publish(&self, snapshot: &CallSnapshot) {
        // No subscribers is fine
        let _ = self.updates.send(snapshot.clone());
    }
}
