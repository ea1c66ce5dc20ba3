// Sheet persistence: MessagePack + LZ4 with versioning and integrity checks.

pub mod error;
pub mod file;
pub mod format;

use std::collections::BTreeMap;

use crate::models::MatchId;
use crate::sheet::MatchSheet;

pub use error::StoreError;
pub use file::FileStore;
pub use format::{decompress_and_deserialize, serialize_and_compress};

pub const SHEET_FORMAT_VERSION: u32 = 1;

/// The authoritative store behind the engine.
///
/// `commit` persists one whole sheet as a single atomic unit; a partially
/// applied mutation must never be observable. A commit whose revision is
/// not the direct successor of the stored one is rejected as stale, so a
/// second writer cannot silently overwrite a sheet it has not seen.
pub trait SheetStore {
    fn commit(&mut self, sheet: &MatchSheet) -> Result<(), StoreError>;
    fn load(&self, match_id: MatchId) -> Result<MatchSheet, StoreError>;
    fn remove(&mut self, match_id: MatchId) -> Result<(), StoreError>;
    fn list_matches(&self) -> Result<Vec<MatchId>, StoreError>;
}

/// In-memory store, the default for tests and single-session use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sheets: BTreeMap<MatchId, MatchSheet>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SheetStore for MemoryStore {
    fn commit(&mut self, sheet: &MatchSheet) -> Result<(), StoreError> {
        sheet.check_invariants().map_err(StoreError::InvariantViolation)?;
        check_revision(self.sheets.get(&sheet.info.id), sheet)?;
        self.sheets.insert(sheet.info.id, sheet.clone());
        Ok(())
    }

    fn load(&self, match_id: MatchId) -> Result<MatchSheet, StoreError> {
        self.sheets
            .get(&match_id)
            .cloned()
            .ok_or(StoreError::SheetNotFound { match_id: match_id.0 })
    }

    fn remove(&mut self, match_id: MatchId) -> Result<(), StoreError> {
        self.sheets
            .remove(&match_id)
            .map(|_| ())
            .ok_or(StoreError::SheetNotFound { match_id: match_id.0 })
    }

    fn list_matches(&self) -> Result<Vec<MatchId>, StoreError> {
        Ok(self.sheets.keys().copied().collect())
    }
}

/// Stale-write gate shared by the store implementations. The first commit
/// of a match is accepted at any revision; afterwards each commit must
/// carry exactly the successor revision.
pub(crate) fn check_revision(
    current: Option<&MatchSheet>,
    committed: &MatchSheet,
) -> Result<(), StoreError> {
    if let Some(current) = current {
        if committed.revision != current.revision + 1 {
            return Err(StoreError::StaleRevision {
                current: current.revision,
                committed: committed.revision,
            });
        }
    }
    Ok(())
}
