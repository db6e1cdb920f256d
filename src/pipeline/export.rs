//! Export path
//!
//! Straight read-decode-reencode-write: select matching records, decode
//! their molecules, and write one mol2 file. No molecule contents are
//! transformed on the way out.

use std::path::Path;

use tracing::info;

use crate::codec;
use crate::error::{Mol2DbError, Result};
use crate::store::Store;

/// Export molecules matching the filters to a mol2 file
///
/// `None` or empty filters match everything. A non-empty filter that
/// matches zero records fails with `NotFound`, so "no such description" is
/// distinguishable from records that merely hold no molecules. Returns the
/// number of molecules written.
pub fn export(
    store_path: &Path,
    desc: Option<&str>,
    comment: Option<&str>,
    output_path: &Path,
    append: bool,
) -> Result<usize> {
    let store = Store::open(store_path)?;

    let filtered = desc.map_or(false, |d| !d.is_empty())
        || comment.map_or(false, |c| !c.is_empty());
    if filtered && store.count_matching(desc, comment)? == 0 {
        return Err(Mol2DbError::NotFound(format!(
            "desc={:?} comment={:?}",
            desc.unwrap_or(""),
            comment.unwrap_or("")
        )));
    }

    let molecules = store.select_all(desc, comment)?;
    codec::write_mol2_file(output_path, &molecules, append)?;

    info!(
        molecules = molecules.len(),
        output = %output_path.display(),
        "export finished"
    );
    Ok(molecules.len())
}
