//! One encoded sheet file per match under a base directory.

use std::fs::{remove_file, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::error::StoreError;
use super::format::{decompress_and_deserialize, serialize_and_compress};
use super::{check_revision, SheetStore};
use crate::models::MatchId;
use crate::sheet::MatchSheet;

const SHEET_EXT: &str = "qbs";

pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn sheet_path(&self, match_id: MatchId) -> PathBuf {
        self.base_dir.join(format!("match_{}.{SHEET_EXT}", match_id.0))
    }

    fn save_to_path(path: &Path, sheet: &MatchSheet) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serialize_and_compress(sheet)?;

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    fn load_from_path(path: &Path, match_id: MatchId) -> Result<MatchSheet, StoreError> {
        if !path.exists() {
            return Err(StoreError::SheetNotFound { match_id: match_id.0 });
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let sheet = decompress_and_deserialize(&data)?;
        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(sheet)
    }
}

impl SheetStore for FileStore {
    fn commit(&mut self, sheet: &MatchSheet) -> Result<(), StoreError> {
        let path = self.sheet_path(sheet.info.id);
        let current = match Self::load_from_path(&path, sheet.info.id) {
            Ok(existing) => Some(existing),
            Err(StoreError::SheetNotFound { .. }) => None,
            Err(e) => return Err(e),
        };
        check_revision(current.as_ref(), sheet)?;

        Self::save_to_path(&path, sheet)?;
        log::info!("Committed match {} at revision {}", sheet.info.id, sheet.revision);
        Ok(())
    }

    fn load(&self, match_id: MatchId) -> Result<MatchSheet, StoreError> {
        Self::load_from_path(&self.sheet_path(match_id), match_id)
    }

    fn remove(&mut self, match_id: MatchId) -> Result<(), StoreError> {
        let path = self.sheet_path(match_id);
        if !path.exists() {
            return Err(StoreError::SheetNotFound { match_id: match_id.0 });
        }
        remove_file(&path)?;
        log::info!("Deleted sheet file for match {}", match_id);
        Ok(())
    }

    fn list_matches(&self) -> Result<Vec<MatchId>, StoreError> {
        let mut ids = Vec::new();
        if !self.base_dir.exists() {
            return Ok(ids);
        }
        for entry in std::fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SHEET_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Some(id) = stem.strip_prefix("match_").and_then(|n| n.parse().ok()) {
                    ids.push(MatchId(id));
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}
