use tracing::{debug, warn};

use crate::record::UserRecord;

/// Working list plus the snapshot it can be reset to.
///
/// The snapshot is written exactly once, by the first `load`, and never
/// mutated afterward. Every effective mutation bumps `revision`, which the
/// session layer uses as its change-detection key.
#[derive(Debug, Default)]
pub struct RecordStore {
    working: Vec<UserRecord>,
    original: Option<Vec<UserRecord>>,
    revision: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the fetched batch as the working list and captures the
    /// original snapshot. A second load is ignored; the session only issues
    /// one fetch, so a duplicate call is a caller bug worth logging. Returns
    /// whether the batch was accepted.
    pub fn load(&mut self, records: Vec<UserRecord>) -> bool {
        if self.original.is_some() {
            warn!(
                incoming = records.len(),
                "record store already loaded, ignoring duplicate load"
            );
            return false;
        }
        self.original = Some(records.clone());
        self.working = records;
        self.bump();
        true
    }

    /// Removes the record with the given email, if present. Unknown emails
    /// are a no-op, not an error.
    pub fn delete(&mut self, email: &str) -> bool {
        let before = self.working.len();
        self.working.retain(|record| record.email != email);
        let removed = self.working.len() != before;
        if removed {
            self.bump();
        }
        removed
    }

    /// Replaces the working list with a fresh copy of the original snapshot.
    /// Silently does nothing until the first successful load.
    pub fn reset(&mut self) -> bool {
        match &self.original {
            Some(original) => {
                self.working = original.clone();
                self.bump();
                true
            }
            None => {
                debug!("reset requested before any load, ignoring");
                false
            }
        }
    }

    pub fn working(&self) -> &[UserRecord] {
        &self.working
    }

    pub fn is_loaded(&self) -> bool {
        self.original.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
