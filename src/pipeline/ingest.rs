//! Batch ingestion
//!
//! Reads many mol2 files, compresses each file's molecules into one payload
//! on a rayon worker pool, and commits every successful file as one store
//! row inside a single transaction.
//!
//! A malformed file is recorded in the report and skipped; it never aborts
//! the rest of the batch. The store write at the end is all-or-nothing.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::codec;
use crate::compress;
use crate::config::IngestConfig;
use crate::error::Result;
use crate::store::{CompressedRow, Store};

use super::staging::{Spool, StagedEntry};

/// One file that failed to ingest, with the reason
#[derive(Debug, Clone)]
pub struct IngestFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of one ingestion run
///
/// Partial success is first class: `failures` lists the files that were
/// skipped while the rest of the batch was committed.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Store ids assigned to the committed records, in input-file order
    pub ids: Vec<i64>,

    /// Number of records created (one per successfully ingested file)
    pub records_inserted: usize,

    /// Total molecules across the committed records
    pub molecules_read: usize,

    /// Files that could not be ingested
    pub failures: Vec<IngestFailure>,
}

/// Ingest mol2 files into the store at `store_path`
///
/// Every successfully decoded file becomes exactly one store record tagged
/// with the configured desc/comment; all records commit in one transaction.
pub fn ingest(paths: &[PathBuf], store_path: &Path, config: &IngestConfig) -> Result<IngestReport> {
    let spool = Mutex::new(Spool::create(config.use_fast_staging, &config.staging_dir));
    let failures = Mutex::new(Vec::<(usize, IngestFailure)>::new());

    // Decode and compress files in parallel; the spool is the only shared
    // state, so memory stays bounded to in-flight files.
    paths.par_iter().enumerate().for_each(|(index, path)| {
        match stage_file(index, path, config) {
            Ok(entry) => {
                debug!(path = %path.display(), molecules = entry.molecule_count, "staged");
                spool.lock().expect("spool lock poisoned").push(entry);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping file");
                failures.lock().expect("failure lock poisoned").push((
                    index,
                    IngestFailure {
                        path: path.clone(),
                        reason: e.to_string(),
                    },
                ));
            }
        }
    });

    let mut entries = spool
        .into_inner()
        .map_err(|e| crate::error::Mol2DbError::Store(format!("spool lock poisoned: {}", e)))?
        .finish()?;
    entries.sort_by_key(|entry| entry.index);

    let mut failures = failures
        .into_inner()
        .map_err(|e| crate::error::Mol2DbError::Store(format!("failure lock poisoned: {}", e)))?;
    failures.sort_by_key(|(index, _)| *index);
    let failures: Vec<IngestFailure> = failures.into_iter().map(|(_, f)| f).collect();

    let molecules_read = entries.iter().map(|e| e.molecule_count as usize).sum();
    let rows: Vec<CompressedRow> = entries
        .into_iter()
        .map(|entry| CompressedRow {
            desc: entry.desc,
            comment: entry.comment,
            payload: entry.payload,
            level: config.compression,
        })
        .collect();

    let ids = if rows.is_empty() {
        // Still open the store so an all-failures run creates the schema
        Store::open(store_path)?;
        Vec::new()
    } else {
        Store::open(store_path)?.insert_compressed(rows)?
    };

    info!(
        inserted = ids.len(),
        molecules = molecules_read,
        failed = failures.len(),
        "ingestion finished"
    );

    Ok(IngestReport {
        records_inserted: ids.len(),
        ids,
        molecules_read,
        failures,
    })
}

/// Decode one file and prepare its staged, compressed payload
fn stage_file(index: usize, path: &Path, config: &IngestConfig) -> Result<StagedEntry> {
    let molecules = codec::read_mol2_file(path)?;
    let text = codec::encode(&molecules);
    let payload = compress::compress(text.as_bytes(), config.compression)?;

    let desc = if config.filename_desc {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if config.desc.is_empty() {
            filename
        } else {
            format!("{} {}", config.desc, filename)
        }
    } else {
        config.desc.clone()
    };

    Ok(StagedEntry {
        index: index as u32,
        source: path.display().to_string(),
        desc,
        comment: config.comment.clone(),
        molecule_count: molecules.len() as u32,
        payload,
    })
}
