//! Checksummed binary snapshots of engine state.

use crate::character::user::User;
use crate::combat::session::CombatSession;
use crate::core::constants::SNAPSHOT_VERSION_MAGIC;
use crate::service::store::{StoreError, StoreResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Everything needed to bring an engine back after a restart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub saved_at_ms: i64,
    pub users: Vec<User>,
    pub sessions: Vec<CombatSession>,
}

/// A snapshot file on disk.
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `snapshot.dat` in the platform data directory, created if missing.
    pub fn default_location() -> StoreResult<Self> {
        let project_dirs = ProjectDirs::from("", "", "solo-ascent").ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine data directory",
            ))
        })?;
        let data_dir = project_dirs.data_dir();
        fs::create_dir_all(data_dir)?;
        Ok(Self::new(data_dir.join("snapshot.dat")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// File format:
    /// - Version magic (8 bytes)
    /// - Payload length (4 bytes)
    /// - bincode payload
    /// - SHA256 over everything before it (32 bytes)
    pub fn save(&self, snapshot: &EngineSnapshot) -> StoreResult<()> {
        let data =
            bincode::serialize(snapshot).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let data_len = u32::try_from(data.len())
            .map_err(|_| StoreError::Serialization("snapshot too large".to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(SNAPSHOT_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        // Written to a sibling temp file, then renamed into place
        let tmp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&SNAPSHOT_VERSION_MAGIC.to_le_bytes())?;
        file.write_all(&data_len.to_le_bytes())?;
        file.write_all(&data)?;
        file.write_all(&checksum)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Loads and verifies a snapshot. Fails on a wrong magic, a checksum
    /// mismatch, or a payload that does not decode.
    pub fn load(&self) -> StoreResult<EngineSnapshot> {
        let mut file = fs::File::open(&self.path)?;

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);
        if version != SNAPSHOT_VERSION_MAGIC {
            return Err(StoreError::CorruptedData(format!(
                "invalid snapshot version: expected 0x{:016X}, got 0x{:016X}",
                SNAPSHOT_VERSION_MAGIC, version
            )));
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        let computed_checksum = hasher.finalize();
        if stored_checksum != computed_checksum.as_slice() {
            return Err(StoreError::CorruptedData(
                "checksum verification failed".to_string(),
            ));
        }

        bincode::deserialize(&data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
