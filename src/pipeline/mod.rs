//! Pipeline module
//!
//! Batch ingestion (files → store) and export (store → file).
//!
//! ## Ingestion Flow
//!
//! ```text
//! ┌─────────┐   rayon    ┌──────────────────────┐      ┌────────────┐
//! │  files  │ ─────────▶ │ decode → encode →    │ ───▶ │  staging   │
//! │         │  workers   │ compress (per file)  │      │   spool    │
//! └─────────┘            └──────────────────────┘      └─────┬──────┘
//!                                                            │ one
//!                                                            ▼ transaction
//!                                                      ┌────────────┐
//!                                                      │   Store    │
//!                                                      └────────────┘
//! ```

mod export;
mod ingest;
mod staging;

pub use export::export;
pub use ingest::{ingest, IngestFailure, IngestReport};
