//! MOL2 writer
//!
//! Deterministic encoder: header counts are recomputed from the live
//! sequences, numeric columns use fixed 4-decimal precision, and trailing
//! whitespace is trimmed, so encoding the same molecule twice yields
//! byte-identical output. Optional columns are emitted only as far as the
//! rightmost populated one, with `****` filling interior gaps.

use std::fmt::Write;

use crate::model::{Atom, Bond, Molecule, Substructure};

/// Placeholder mol2 uses for an empty optional column
const EMPTY: &str = "****";

/// Encode molecules as concatenated mol2 blocks
///
/// The exact structural inverse of [`decode`](super::decode): every block is
/// written in input order and re-decodes to the same molecule.
pub fn encode(molecules: &[Molecule]) -> String {
    let mut out = String::new();
    for molecule in molecules {
        write_molecule(&mut out, molecule).expect("formatting into a String is infallible");
    }
    out
}

fn write_molecule(out: &mut String, molecule: &Molecule) -> std::fmt::Result {
    writeln!(out, "@<TRIPOS>MOLECULE")?;
    if molecule.name.is_empty() {
        writeln!(out, "{}", EMPTY)?;
    } else {
        writeln!(out, "{}", molecule.name)?;
    }
    writeln!(
        out,
        "{:>5} {:>5} {:>5} {:>5} {:>5}",
        molecule.atoms.len(),
        molecule.bonds.len(),
        molecule.substructures.len(),
        0,
        0
    )?;
    write_header_tail(out, molecule)?;

    writeln!(out, "@<TRIPOS>ATOM")?;
    for atom in &molecule.atoms {
        write_atom(out, atom)?;
    }

    if !molecule.bonds.is_empty() {
        writeln!(out, "@<TRIPOS>BOND")?;
        for bond in &molecule.bonds {
            write_bond(out, bond)?;
        }
    }

    if !molecule.substructures.is_empty() {
        writeln!(out, "@<TRIPOS>SUBSTRUCTURE")?;
        for subst in &molecule.substructures {
            write_substructure(out, subst)?;
        }
    }

    writeln!(out)
}

/// Header lines 4-7 are positional, so interior gaps before the rightmost
/// populated line must be filled with the placeholder.
fn write_header_tail(out: &mut String, molecule: &Molecule) -> std::fmt::Result {
    let tail = [
        molecule.mol_type.as_deref(),
        molecule.charge_type.as_deref(),
        molecule.status_bits.as_deref(),
        molecule.comment.as_deref(),
    ];
    let populated = match tail.iter().rposition(|field| field.is_some()) {
        Some(last) => last + 1,
        None => return Ok(()),
    };
    for field in &tail[..populated] {
        writeln!(out, "{}", field.unwrap_or(EMPTY))?;
    }
    Ok(())
}

fn write_atom(out: &mut String, atom: &Atom) -> std::fmt::Result {
    let mut line = String::new();
    write!(
        line,
        "{:>7} {:<8} {:>9.4} {:>9.4} {:>9.4} {:<8}",
        atom.id, atom.name, atom.x, atom.y, atom.z, atom.atom_type
    )?;

    let tail = [
        atom.subst_id.map(|id| format!("{:>4}", id)),
        atom.subst_name.as_ref().map(|name| format!("{:<8}", name)),
        atom.charge.map(|charge| format!("{:>9.4}", charge)),
        atom.status_bit.clone(),
    ];
    write_tail_columns(&mut line, &tail)?;

    writeln!(out, "{}", line.trim_end())
}

fn write_bond(out: &mut String, bond: &Bond) -> std::fmt::Result {
    let mut line = String::new();
    write!(
        line,
        "{:>6} {:>5} {:>5} {:<4}",
        bond.id, bond.origin, bond.target, bond.bond_type
    )?;
    if let Some(status) = &bond.status_bit {
        write!(line, " {}", status)?;
    }
    writeln!(out, "{}", line.trim_end())
}

fn write_substructure(out: &mut String, subst: &Substructure) -> std::fmt::Result {
    let mut line = String::new();
    write!(line, "{:>6} {:<8} {:>6}", subst.id, subst.name, subst.root_atom)?;

    let tail = [
        subst.subst_type.as_ref().map(|t| format!("{:<8}", t)),
        subst.dict_type.map(|d| d.to_string()),
        subst.chain.clone(),
        subst.sub_type.clone(),
        subst.inter_bonds.map(|b| b.to_string()),
        subst.status.clone(),
        subst.comment.clone(),
    ];
    write_tail_columns(&mut line, &tail)?;

    writeln!(out, "{}", line.trim_end())
}

/// Emit optional columns up to the rightmost populated one, placeholder for
/// interior gaps.
fn write_tail_columns(line: &mut String, tail: &[Option<String>]) -> std::fmt::Result {
    let populated = match tail.iter().rposition(|column| column.is_some()) {
        Some(last) => last + 1,
        None => return Ok(()),
    };
    for column in &tail[..populated] {
        match column {
            Some(value) => write!(line, " {}", value)?,
            None => write!(line, " {}", EMPTY)?,
        }
    }
    Ok(())
}
