// crates/geopolitical-core/src/loader/common_io.rs
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

/// Snapshot encoding, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// `bincode`, gzip-wrapped when the `compact` feature is on.
    Binary,
    #[cfg(feature = "json")]
    Json,
}

impl SnapshotFormat {
    pub fn for_path(path: &Path) -> Self {
        #[cfg(feature = "json")]
        {
            if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            {
                return SnapshotFormat::Json;
            }
        }
        let _ = path;
        SnapshotFormat::Binary
    }
}

/// Opens a snapshot, buffers it and, for compressed binary snapshots,
/// wraps it in a gzip decoder.
pub fn open_stream(path: &Path, format: SnapshotFormat) -> Result<Box<dyn Read>> {
    let reader = BufReader::new(File::open(path)?);
    match format {
        #[cfg(feature = "compact")]
        SnapshotFormat::Binary => Ok(Box::new(GzDecoder::new(reader))),
        #[allow(unreachable_patterns)]
        _ => Ok(Box::new(reader)),
    }
}

/// Writes `payload` through the matching encoder to a sibling temp file,
/// then renames it over `path`, so readers never see half a snapshot.
pub fn write_stream(path: &Path, format: SnapshotFormat, payload: &[u8]) -> Result<()> {
    let tmp = sibling_path(path, "tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        match format {
            #[cfg(feature = "compact")]
            SnapshotFormat::Binary => {
                let mut gz = GzEncoder::new(&mut writer, Compression::default());
                gz.write_all(payload)?;
                gz.finish()?;
            }
            #[allow(unreachable_patterns)]
            _ => writer.write_all(payload)?,
        }
        writer.flush()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// `dir/name.ext` → `dir/name.ext.<suffix>`.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{filename}.{suffix}"))
}
