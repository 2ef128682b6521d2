// crates/geopolitical-core/src/loader/mod.rs

//! # Snapshot Loader
//!
//! Handles the physical layer (files, compression) and the payload codec
//! (bincode or JSON) for whole-database snapshots. Only documents are
//! persisted; the slug and spatial indexes are rebuilt on load.

use crate::db::GeoDb;
use crate::error::Result;
use crate::store::MemoryStore;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub mod common_io;

pub use common_io::SnapshotFormat;

impl GeoDb<MemoryStore> {
    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    pub fn default_dataset_filename() -> &'static str {
        "geopolitical.bin"
    }

    /// Loads a snapshot written by [`save_to_path`](Self::save_to_path).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = SnapshotFormat::for_path(path);
        let reader = common_io::open_stream(path, format)?;
        let mut store = decode(reader, format)?;
        store.reindex()?;
        let db = Self::with_store(store);
        info!(path = %path.display(), ?format, stats = ?db.stats(), "snapshot loaded");
        Ok(db)
    }

    /// Like [`load_from_path`](Self::load_from_path), but a missing file
    /// yields an empty database.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no snapshot yet, starting empty");
            return Ok(Self::new());
        }
        Self::load_from_path(path)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = SnapshotFormat::for_path(path);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let payload = encode(&self.store, format)?;
        common_io::write_stream(path, format, &payload)?;
        info!(path = %path.display(), ?format, bytes = payload.len(), "snapshot saved");
        Ok(())
    }
}

fn decode(mut reader: Box<dyn Read>, format: SnapshotFormat) -> Result<MemoryStore> {
    match format {
        #[cfg(feature = "json")]
        SnapshotFormat::Json => Ok(serde_json::from_reader(&mut reader)?),
        SnapshotFormat::Binary => Ok(bincode::deserialize_from(&mut reader)?),
    }
}

fn encode(store: &MemoryStore, format: SnapshotFormat) -> Result<Vec<u8>> {
    match format {
        #[cfg(feature = "json")]
        SnapshotFormat::Json => Ok(serde_json::to_vec_pretty(store)?),
        SnapshotFormat::Binary => Ok(bincode::serialize(store)?),
    }
}
