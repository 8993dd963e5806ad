use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of opaque identifiers for projects and entries.
pub trait IdGenerator: Sync + Send + 'static {
    fn next_id(&self) -> String;
}

/// Random v4 uuids, the default outside of tests.
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Produces `<prefix>-1`, `<prefix>-2`, ... Useful whenever ids have to be predictable.
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{IdGenerator, SequentialIds, UuidGenerator};

    #[test]
    fn test_sequential_ids_are_ordered() {
        let ids = SequentialIds::new("entry");
        assert_eq!(ids.next_id(), "entry-1");
        assert_eq!(ids.next_id(), "entry-2");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = UuidGenerator;
        let generated = (0..100).map(|_| ids.next_id()).collect::<HashSet<_>>();
        assert_eq!(generated.len(), 100);
    }
}
