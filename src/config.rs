//! Ingestion configuration
//!
//! Centralized configuration with sensible defaults. The original call
//! sites passed loosely-typed keyword arguments (`shm=`, `desc=`,
//! `comment=`, `compression=`); here they are named, typed fields fixed
//! once at the ingestion boundary.

use std::path::PathBuf;

use crate::compress::CompressionLevel;

/// Configuration for one batch ingestion run
#[derive(Debug, Clone)]
pub struct IngestConfig {
    // -------------------------------------------------------------------------
    // Tagging
    // -------------------------------------------------------------------------
    /// Description tag written on every record of the run (empty = untagged)
    pub desc: String,

    /// Comment tag written on every record of the run (empty = untagged)
    pub comment: String,

    /// Append each source filename to `desc` on its record
    pub filename_desc: bool,

    // -------------------------------------------------------------------------
    // Payload handling
    // -------------------------------------------------------------------------
    /// Compression level for stored payloads
    pub compression: CompressionLevel,

    // -------------------------------------------------------------------------
    // Staging
    // -------------------------------------------------------------------------
    /// Spool compressed payloads through the memory-backed staging area
    /// instead of holding every payload in process memory
    pub use_fast_staging: bool,

    /// Where the staging spool lives; expected to be a memory-backed
    /// filesystem. Unusable staging falls back to in-memory buffering.
    pub staging_dir: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            desc: String::new(),
            comment: String::new(),
            filename_desc: false,
            compression: CompressionLevel::DEFAULT,
            use_fast_staging: true,
            staging_dir: PathBuf::from("/dev/shm"),
        }
    }
}

impl IngestConfig {
    /// Create a new config builder
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::default()
    }
}

/// Builder for IngestConfig
#[derive(Default)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    /// Set the description tag
    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.config.desc = desc.into();
        self
    }

    /// Set the comment tag
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.config.comment = comment.into();
        self
    }

    /// Append each source filename to the description tag
    pub fn filename_desc(mut self, enabled: bool) -> Self {
        self.config.filename_desc = enabled;
        self
    }

    /// Set the compression level (clamped into 0..=9)
    pub fn compression(mut self, level: i32) -> Self {
        self.config.compression = CompressionLevel::new(level);
        self
    }

    /// Enable or disable the fast staging spool
    pub fn use_fast_staging(mut self, enabled: bool) -> Self {
        self.config.use_fast_staging = enabled;
        self
    }

    /// Set the staging directory
    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.staging_dir = dir.into();
        self
    }

    pub fn build(self) -> IngestConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.desc, "");
        assert_eq!(config.comment, "");
        assert!(!config.filename_desc);
        assert_eq!(config.compression, CompressionLevel::DEFAULT);
        assert!(config.use_fast_staging);
        assert_eq!(config.staging_dir, PathBuf::from("/dev/shm"));
    }

    #[test]
    fn test_builder() {
        let config = IngestConfig::builder()
            .desc("run-1")
            .comment("nightly")
            .compression(42)
            .use_fast_staging(false)
            .build();
        assert_eq!(config.desc, "run-1");
        assert_eq!(config.comment, "nightly");
        assert_eq!(config.compression.get(), 9);
        assert!(!config.use_fast_staging);
    }
}
