//! Format codec
//!
//! Parser and writer for the TRIPOS MOL2 text format.
//!
//! ## Section Layout
//!
//! ```text
//! @<TRIPOS>MOLECULE
//! name
//! n_atoms n_bonds n_subst n_feat n_sets
//! mol_type
//! charge_type
//! [status_bits]
//! [comment]
//! @<TRIPOS>ATOM
//! atom_id name x y z type [subst_id [subst_name [charge [status]]]]
//! @<TRIPOS>BOND
//! bond_id origin target type [status]
//! @<TRIPOS>SUBSTRUCTURE
//! subst_id name root_atom [type [dict [chain [sub [inter [status [comment]]]]]]]
//! ```
//!
//! A file may concatenate any number of molecule blocks. `decode` enforces
//! that declared header counts match the records actually present and that
//! every bond references a known atom id; `encode` is the deterministic
//! inverse, recomputing counts from the live sequences and emitting fixed
//! 4-decimal numeric columns so re-encoding is byte-identical.
//!
//! The mol2 `****` placeholder maps to `None` on read and back to `****` on
//! write, so optional trailing columns survive a round trip exactly.

mod parser;
mod writer;

pub use parser::decode;
pub use writer::encode;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::model::Molecule;

/// Read and decode all molecules from a mol2 file
pub fn read_mol2_file(path: &Path) -> Result<Vec<Molecule>> {
    let text = fs::read_to_string(path)?;
    decode(&text)
}

/// Encode molecules and write them to a mol2 file
///
/// With `append` set the blocks are added after any existing content,
/// otherwise the file is truncated first.
pub fn write_mol2_file(path: &Path, molecules: &[Molecule], append: bool) -> Result<()> {
    let text = encode(molecules);
    let mut file = if append {
        OpenOptions::new().create(true).append(true).open(path)?
    } else {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?
    };
    file.write_all(text.as_bytes())?;
    Ok(())
}
