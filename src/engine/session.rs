use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::{model::Profile, storage::Snapshot};

use super::{AppState, Command, Engine};

/// Owns the current [AppState] and is the only place commands get applied. Callers receive the
/// session explicitly; nothing reaches it through globals.
///
/// Whenever a dispatch produces a different profile the new snapshot is pushed to `snapshots`
/// without waiting for it to be stored.
pub struct Session {
    engine: Engine,
    state: AppState,
    snapshots: Option<UnboundedSender<Snapshot>>,
}

impl Session {
    pub fn new(engine: Engine, state: AppState, snapshots: Option<UnboundedSender<Snapshot>>) -> Self {
        Self {
            engine,
            state,
            snapshots,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.state.profile.as_deref()
    }

    pub fn dispatch(&mut self, command: Command) {
        let next = self.engine.apply(&self.state, command);
        let changed = !same_profile(&self.state.profile, &next.profile);
        self.state = next;
        if changed {
            self.publish();
        }
    }

    fn publish(&self) {
        let Some(sender) = &self.snapshots else {
            return;
        };
        debug!("Publishing profile snapshot");
        if let Err(e) = sender.send(self.state.profile.clone()) {
            warn!("Snapshot dropped, persistence is gone: {e}");
        }
    }
}

fn same_profile(a: &Option<Arc<Profile>>, b: &Option<Arc<Profile>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
