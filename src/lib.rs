//! # mol2db
//!
//! Batch ingestion of TRIPOS MOL2 files into a compressed single-file
//! SQLite store, with:
//! - A strict, deterministic mol2 codec
//! - Self-describing payload compression (raw or zstd, levels 0-9)
//! - Transactional batch inserts (all-or-nothing)
//! - A memory-backed staging spool with in-memory fallback
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Ingestion Pipeline                        │
//! │          (parallel decode/compress, staging spool)           │
//! └─────────┬──────────────────────────────────────┬────────────┘
//!           │                                      │
//!           ▼                                      ▼
//!    ┌─────────────┐                        ┌─────────────┐
//!    │ Format Codec│                        │ Compression │
//!    │ (mol2 text) │                        │ (raw/zstd)  │
//!    └─────────────┘                        └──────┬──────┘
//!                                                  │
//!                                                  ▼
//!                                           ┌─────────────┐
//!                                           │    Store    │
//!                                           │  (SQLite)   │
//!                                           └─────────────┘
//! ```
//!
//! The export path runs the same stack in reverse: filtered select →
//! decompress → decode → re-encode → output file.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod codec;
pub mod compress;
pub mod store;
pub mod pipeline;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Mol2DbError, Result};
pub use config::IngestConfig;
pub use model::{Atom, Bond, Molecule, Substructure};
pub use codec::{decode, encode, read_mol2_file, write_mol2_file};
pub use compress::CompressionLevel;
pub use store::{BatchEntry, Store};
pub use pipeline::{export, ingest, IngestFailure, IngestReport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of mol2db
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
