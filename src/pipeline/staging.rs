//! Staging spool
//!
//! Buffers per-file compressed payloads between the decode workers and the
//! final store transaction. With fast staging enabled the spool lives in a
//! memory-backed directory (`/dev/shm` by default) so large batches do not
//! pile up in process memory; any staging failure degrades to plain
//! in-memory buffering, never to a failed ingestion.
//!
//! ## Spill Frame Format
//!
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Len (4)  │ CRC32(4) │     bincode(StagedEntry)    │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! Frames are flushed individually, so every fully pushed entry is readable
//! even when a later push fails.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{Mol2DbError, Result};

/// Frame header size: 4 bytes length + 4 bytes CRC32
const FRAME_HEADER_SIZE: usize = 8;

/// Upper bound for one spill frame (1 GB); anything larger is corruption
const MAX_FRAME_SIZE: u32 = 1 << 30;

/// Spool file name inside the staging directory
const SPOOL_FILENAME: &str = "spool.bin";

/// One staged record: a compressed payload plus its tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StagedEntry {
    /// Position of the source file in the input list, for re-ordering
    pub index: u32,

    /// Source path, for the ingest report
    pub source: String,

    pub desc: String,
    pub comment: String,

    /// Number of molecules in the payload
    pub molecule_count: u32,

    /// Framed, compressed payload ready for the store
    pub payload: Vec<u8>,
}

enum Backend {
    Memory(Vec<StagedEntry>),
    Disk {
        file: File,
        /// Owns the staging directory; dropped on finish
        dir: TempDir,
        frames: usize,
    },
}

/// Spool of staged entries, disk-backed when fast staging is available
pub(crate) struct Spool {
    backend: Backend,
}

impl Spool {
    /// Create a spool, preferring the staging directory when requested
    ///
    /// Falls back to in-memory buffering when the staging directory cannot
    /// be used; fallback is logged, not surfaced.
    pub fn create(use_fast_staging: bool, staging_dir: &Path) -> Spool {
        if use_fast_staging {
            match Self::open_disk(staging_dir) {
                Ok(backend) => {
                    debug!(dir = %staging_dir.display(), "staging spool ready");
                    return Spool { backend };
                }
                Err(e) => {
                    warn!(
                        dir = %staging_dir.display(),
                        error = %e,
                        "fast staging unavailable, buffering in memory"
                    );
                }
            }
        }
        Spool {
            backend: Backend::Memory(Vec::new()),
        }
    }

    fn open_disk(staging_dir: &Path) -> std::io::Result<Backend> {
        let dir = tempfile::Builder::new()
            .prefix("mol2db-staging-")
            .tempdir_in(staging_dir)?;
        let file = File::create(dir.path().join(SPOOL_FILENAME))?;
        Ok(Backend::Disk {
            file,
            dir,
            frames: 0,
        })
    }

    /// Add an entry to the spool
    ///
    /// A disk write failure (staging area full, for instance) drains the
    /// already-spooled entries back into memory and continues there.
    pub fn push(&mut self, entry: StagedEntry) {
        match &mut self.backend {
            Backend::Memory(entries) => {
                entries.push(entry);
                return;
            }
            Backend::Disk { file, frames, .. } => match write_frame(file, &entry) {
                Ok(()) => {
                    *frames += 1;
                    return;
                }
                Err(e) => warn!(error = %e, "staging write failed, falling back to memory"),
            },
        }

        // Frames already flushed to the spool are still readable; recover
        // them before abandoning the disk backend.
        let old = std::mem::replace(&mut self.backend, Backend::Memory(Vec::new()));
        let mut recovered = match old {
            Backend::Disk { file, dir, frames } => {
                drop(file);
                read_spool(&dir.path().join(SPOOL_FILENAME), frames).unwrap_or_else(|e| {
                    warn!(error = %e, "could not recover spooled entries");
                    Vec::new()
                })
            }
            Backend::Memory(entries) => entries,
        };
        recovered.push(entry);
        self.backend = Backend::Memory(recovered);
    }

    /// Drain the spool, returning every staged entry
    pub fn finish(self) -> Result<Vec<StagedEntry>> {
        match self.backend {
            Backend::Memory(entries) => Ok(entries),
            Backend::Disk { file, dir, frames } => {
                drop(file);
                read_spool(&dir.path().join(SPOOL_FILENAME), frames)
            }
        }
    }
}

/// Serialize and append one frame, flushing so the entry is durable in the
/// staging file before the next push.
fn write_frame(file: &mut File, entry: &StagedEntry) -> Result<()> {
    let encoded = bincode::serialize(entry)
        .map_err(|e| Mol2DbError::Serialization(format!("staging frame encode: {}", e)))?;
    if encoded.len() as u64 > MAX_FRAME_SIZE as u64 {
        return Err(Mol2DbError::Serialization(format!(
            "staging frame too large: {} bytes",
            encoded.len()
        )));
    }

    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + encoded.len());
    frame.extend_from_slice(&(encoded.len() as u32).to_le_bytes());
    frame.extend_from_slice(&crc32fast::hash(&encoded).to_le_bytes());
    frame.extend_from_slice(&encoded);

    file.write_all(&frame)?;
    file.flush()?;
    Ok(())
}

/// Read back `expected` frames, validating each checksum
fn read_spool(path: &Path, expected: usize) -> Result<Vec<StagedEntry>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::with_capacity(expected);

    for _ in 0..expected {
        let mut header = [0u8; FRAME_HEADER_SIZE];
        reader.read_exact(&mut header)?;

        let len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        if len > MAX_FRAME_SIZE {
            return Err(Mol2DbError::Serialization(format!(
                "staging frame length {} exceeds limit",
                len
            )));
        }

        let mut encoded = vec![0u8; len as usize];
        reader.read_exact(&mut encoded)?;

        let actual_crc = crc32fast::hash(&encoded);
        if actual_crc != expected_crc {
            return Err(Mol2DbError::Serialization(format!(
                "staging frame checksum mismatch: expected {:08x}, got {:08x}",
                expected_crc, actual_crc
            )));
        }

        entries.push(
            bincode::deserialize(&encoded)
                .map_err(|e| Mol2DbError::Serialization(format!("staging frame decode: {}", e)))?,
        );
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: u32, payload: &[u8]) -> StagedEntry {
        StagedEntry {
            index,
            source: format!("file{}.mol2", index),
            desc: "d".to_string(),
            comment: "c".to_string(),
            molecule_count: 1,
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn test_memory_spool_roundtrip() {
        let mut spool = Spool::create(false, Path::new("/nonexistent"));
        spool.push(entry(0, b"abc"));
        spool.push(entry(1, b"def"));

        let entries = spool.finish().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].payload, b"abc");
        assert_eq!(entries[1].source, "file1.mol2");
    }

    #[test]
    fn test_disk_spool_roundtrip() {
        let staging = tempfile::tempdir().unwrap();
        let mut spool = Spool::create(true, staging.path());
        assert!(matches!(spool.backend, Backend::Disk { .. }));

        for i in 0..10 {
            spool.push(entry(i, &vec![i as u8; 512]));
        }

        let entries = spool.finish().unwrap();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[7].payload, vec![7u8; 512]);
    }

    #[test]
    fn test_unusable_staging_dir_falls_back_to_memory() {
        let mut spool = Spool::create(true, Path::new("/nonexistent/staging/dir"));
        assert!(matches!(spool.backend, Backend::Memory(_)));

        spool.push(entry(0, b"still works"));
        assert_eq!(spool.finish().unwrap().len(), 1);
    }
}
