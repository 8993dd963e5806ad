use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use super::{save_profile, ProfileStore, Snapshot};

/// Background saver. Receives snapshots published by the
/// [Session](crate::engine::session::Session) and writes them to a [ProfileStore]. Only the
/// newest snapshot waiting in the channel gets written; older ones are skipped.
pub struct PersistenceModule<S> {
    receiver: UnboundedReceiver<Snapshot>,
    store: S,
}

impl<S: ProfileStore> PersistenceModule<S> {
    pub fn new(receiver: UnboundedReceiver<Snapshot>, store: S) -> Self {
        Self { receiver, store }
    }

    /// Runs until every sender is dropped.
    pub async fn run(mut self) {
        while let Some(mut snapshot) = self.receiver.recv().await {
            let mut skipped = 0;
            while let Ok(newer) = self.receiver.try_recv() {
                snapshot = newer;
                skipped += 1;
            }
            debug!("Saving snapshot, {skipped} older ones skipped");
            save_profile(&self.store, snapshot).await;
        }

        self.receiver.close();
        info!("Persistence finished");
    }
}
