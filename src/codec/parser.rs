//! MOL2 parser
//!
//! Section-driven line parser. The input is first split into `@<TRIPOS>`
//! sections, then each MOLECULE section and the sections following it are
//! assembled into one [`Molecule`] with strict count and bond-reference
//! validation.

use std::collections::HashSet;
use std::str::FromStr;

use crate::error::{Mol2DbError, Result};
use crate::model::{Atom, Bond, Molecule, Substructure};

/// Section marker prefix
const MARKER: &str = "@<TRIPOS>";

/// Placeholder mol2 uses for an empty optional column
const EMPTY: &str = "****";

/// One `@<TRIPOS>` section with its non-blank data lines
struct Section<'a> {
    name: &'a str,
    /// Line number of the marker itself (1-based)
    marker_line: usize,
    lines: Vec<(usize, &'a str)>,
}

/// Decode a concatenation of mol2 molecule blocks
///
/// Returns one [`Molecule`] per `@<TRIPOS>MOLECULE` section in file order.
/// Whitespace-only input decodes to an empty list; any data outside a
/// MOLECULE block is a format error.
pub fn decode(input: &str) -> Result<Vec<Molecule>> {
    let sections = split_sections(input)?;

    let mut molecules = Vec::new();
    let mut i = 0;
    while i < sections.len() {
        let section = &sections[i];
        if !section.name.eq_ignore_ascii_case("MOLECULE") {
            return Err(Mol2DbError::format(
                section.marker_line,
                format!(
                    "section @<TRIPOS>{} before any @<TRIPOS>MOLECULE section",
                    section.name
                ),
            ));
        }

        // The molecule owns every section up to the next MOLECULE marker
        let mut end = i + 1;
        while end < sections.len() && !sections[end].name.eq_ignore_ascii_case("MOLECULE") {
            end += 1;
        }
        molecules.push(build_molecule(section, &sections[i + 1..end])?);
        i = end;
    }

    Ok(molecules)
}

/// Split raw input into sections, dropping blank and `#` comment lines
fn split_sections(input: &str) -> Result<Vec<Section<'_>>> {
    let mut sections: Vec<Section> = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();

        if let Some(name) = trimmed.strip_prefix(MARKER) {
            sections.push(Section {
                name: name.trim(),
                marker_line: line_no,
                lines: Vec::new(),
            });
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match sections.last_mut() {
            Some(section) => section.lines.push((line_no, raw)),
            None => {
                return Err(Mol2DbError::format(
                    line_no,
                    "data before the first @<TRIPOS>MOLECULE marker",
                ))
            }
        }
    }

    Ok(sections)
}

fn build_molecule(header: &Section, body: &[Section]) -> Result<Molecule> {
    if header.lines.len() < 2 {
        return Err(Mol2DbError::format(
            header.marker_line,
            "truncated MOLECULE section: expected name and counts lines",
        ));
    }

    let name = match header.lines[0].1.trim() {
        EMPTY => String::new(),
        other => other.to_string(),
    };
    let (counts_line, declared) = {
        let (line_no, raw) = header.lines[1];
        (line_no, parse_counts(line_no, raw)?)
    };

    let mut molecule = Molecule::new(name);
    let mut bond_lines = Vec::new();
    molecule.mol_type = header_token(header.lines.get(2));
    molecule.charge_type = header_token(header.lines.get(3));
    molecule.status_bits = header_token(header.lines.get(4));
    molecule.comment = header.lines.get(5).and_then(|(_, raw)| {
        let trimmed = raw.trim();
        (trimmed != EMPTY).then(|| trimmed.to_string())
    });

    for section in body {
        match section.name.to_ascii_uppercase().as_str() {
            "ATOM" => {
                for (line_no, raw) in &section.lines {
                    molecule.atoms.push(parse_atom_line(*line_no, raw)?);
                }
            }
            "BOND" => {
                for (line_no, raw) in &section.lines {
                    molecule.bonds.push(parse_bond_line(*line_no, raw)?);
                    bond_lines.push(*line_no);
                }
            }
            "SUBSTRUCTURE" => {
                for (line_no, raw) in &section.lines {
                    molecule.substructures.push(parse_subst_line(*line_no, raw)?);
                }
            }
            // FEATURE, SET, CRYSIN, ... are carried by real files but not
            // modeled; their records are skipped.
            _ => {}
        }
    }

    validate_counts(counts_line, &declared, &molecule)?;
    validate_bond_refs(&molecule, &bond_lines)?;

    Ok(molecule)
}

/// Declared record counts from the second MOLECULE header line
struct DeclaredCounts {
    atoms: usize,
    bonds: Option<usize>,
    substructures: Option<usize>,
}

fn parse_counts(line_no: usize, raw: &str) -> Result<DeclaredCounts> {
    let mut numbers = Vec::with_capacity(3);
    for token in raw.split_whitespace().take(3) {
        let value = token.parse::<usize>().map_err(|_| {
            Mol2DbError::format(line_no, format!("invalid count '{}' in counts line", token))
        })?;
        numbers.push(value);
    }
    match numbers.first() {
        Some(&atoms) => Ok(DeclaredCounts {
            atoms,
            bonds: numbers.get(1).copied(),
            substructures: numbers.get(2).copied(),
        }),
        None => Err(Mol2DbError::format(line_no, "empty counts line")),
    }
}

fn validate_counts(line_no: usize, declared: &DeclaredCounts, molecule: &Molecule) -> Result<()> {
    if declared.atoms != molecule.atoms.len() {
        return Err(Mol2DbError::format(
            line_no,
            format!(
                "header declares {} atoms, found {}",
                declared.atoms,
                molecule.atoms.len()
            ),
        ));
    }
    if let Some(bonds) = declared.bonds {
        if bonds != molecule.bonds.len() {
            return Err(Mol2DbError::format(
                line_no,
                format!(
                    "header declares {} bonds, found {}",
                    bonds,
                    molecule.bonds.len()
                ),
            ));
        }
    }
    if let Some(substructures) = declared.substructures {
        if substructures != molecule.substructures.len() {
            return Err(Mol2DbError::format(
                line_no,
                format!(
                    "header declares {} substructures, found {}",
                    substructures,
                    molecule.substructures.len()
                ),
            ));
        }
    }
    Ok(())
}

fn validate_bond_refs(molecule: &Molecule, bond_lines: &[usize]) -> Result<()> {
    let ids: HashSet<u16> = molecule.atoms.iter().map(|a| a.id).collect();
    for (bond, &line_no) in molecule.bonds.iter().zip(bond_lines) {
        for atom_id in [bond.origin, bond.target] {
            if !ids.contains(&atom_id) {
                return Err(Mol2DbError::format(
                    line_no,
                    format!(
                        "bond {} in molecule '{}' references unknown atom id {}",
                        bond.id, molecule.name, atom_id
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn parse_atom_line(line_no: usize, raw: &str) -> Result<Atom> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() < 6 {
        return Err(Mol2DbError::format(
            line_no,
            format!("atom record has {} columns, expected at least 6", parts.len()),
        ));
    }

    Ok(Atom {
        id: parse_field(line_no, parts[0], "atom id")?,
        name: parts[1].to_string(),
        x: parse_field(line_no, parts[2], "x coordinate")?,
        y: parse_field(line_no, parts[3], "y coordinate")?,
        z: parse_field(line_no, parts[4], "z coordinate")?,
        atom_type: parts[5].to_string(),
        subst_id: parse_optional(line_no, parts.get(6), "substructure id")?,
        subst_name: optional_token(parts.get(7)),
        charge: parse_optional(line_no, parts.get(8), "partial charge")?,
        status_bit: optional_token(parts.get(9)),
    })
}

fn parse_bond_line(line_no: usize, raw: &str) -> Result<Bond> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(Mol2DbError::format(
            line_no,
            format!("bond record has {} columns, expected at least 4", parts.len()),
        ));
    }

    Ok(Bond {
        id: parse_field(line_no, parts[0], "bond id")?,
        origin: parse_field(line_no, parts[1], "origin atom id")?,
        target: parse_field(line_no, parts[2], "target atom id")?,
        bond_type: parts[3].to_string(),
        status_bit: optional_token(parts.get(4)),
    })
}

fn parse_subst_line(line_no: usize, raw: &str) -> Result<Substructure> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(Mol2DbError::format(
            line_no,
            format!(
                "substructure record has {} columns, expected at least 3",
                parts.len()
            ),
        ));
    }

    // Everything past the status column is a free-text comment
    let comment = if parts.len() > 9 {
        Some(parts[9..].join(" "))
    } else {
        None
    };

    Ok(Substructure {
        id: parse_field(line_no, parts[0], "substructure id")?,
        name: parts[1].to_string(),
        root_atom: parse_field(line_no, parts[2], "root atom id")?,
        subst_type: optional_token(parts.get(3)),
        dict_type: parse_optional(line_no, parts.get(4), "dictionary type")?,
        chain: optional_token(parts.get(5)),
        sub_type: optional_token(parts.get(6)),
        inter_bonds: parse_optional(line_no, parts.get(7), "inter bonds")?,
        status: optional_token(parts.get(8)),
        comment,
    })
}

/// Parse a required numeric column
fn parse_field<T: FromStr>(line_no: usize, token: &str, what: &str) -> Result<T> {
    token
        .parse::<T>()
        .map_err(|_| Mol2DbError::format(line_no, format!("invalid {}: '{}'", what, token)))
}

/// Parse an optional numeric column; `****` and absence both map to `None`
fn parse_optional<T: FromStr>(
    line_no: usize,
    token: Option<&&str>,
    what: &str,
) -> Result<Option<T>> {
    match token {
        None => Ok(None),
        Some(&tok) if tok == EMPTY => Ok(None),
        Some(&tok) => parse_field(line_no, tok, what).map(Some),
    }
}

/// An optional text column; `****` and absence both map to `None`
fn optional_token(token: Option<&&str>) -> Option<String> {
    token.filter(|&&tok| tok != EMPTY).map(|tok| tok.to_string())
}

/// First whitespace token of an optional header line
fn header_token(line: Option<&(usize, &str)>) -> Option<String> {
    line.and_then(|(_, raw)| raw.split_whitespace().next())
        .filter(|&tok| tok != EMPTY)
        .map(|tok| tok.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = "@<TRIPOS>MOLECULE\n\
        Water\n\
        3 2 1 0 0\n\
        SMALL\n\
        NO_CHARGES\n\
        @<TRIPOS>ATOM\n\
        1 O 0.0000 0.0000 0.0000 O.3 1 WAT1 0.0000\n\
        2 H1 0.9572 0.0000 0.0000 H 1 WAT1 0.0000\n\
        3 H2 -0.2400 0.9266 0.0000 H 1 WAT1 0.0000\n\
        @<TRIPOS>BOND\n\
        1 1 2 1\n\
        2 1 3 1\n\
        @<TRIPOS>SUBSTRUCTURE\n\
        1 WAT1 1 RESIDUE\n";

    #[test]
    fn test_decode_single_molecule() {
        let molecules = decode(WATER).unwrap();
        assert_eq!(molecules.len(), 1);

        let mol = &molecules[0];
        assert_eq!(mol.name, "Water");
        assert_eq!(mol.mol_type.as_deref(), Some("SMALL"));
        assert_eq!(mol.charge_type.as_deref(), Some("NO_CHARGES"));
        assert_eq!(mol.atoms.len(), 3);
        assert_eq!(mol.bonds.len(), 2);
        assert_eq!(mol.substructures.len(), 1);

        assert_eq!(mol.atoms[1].name, "H1");
        assert!((mol.atoms[1].x - 0.9572).abs() < 1e-9);
        assert_eq!(mol.atoms[1].subst_name.as_deref(), Some("WAT1"));
        assert_eq!(mol.bonds[1].origin, 1);
        assert_eq!(mol.bonds[1].target, 3);
        assert_eq!(mol.substructures[0].subst_type.as_deref(), Some("RESIDUE"));
    }

    #[test]
    fn test_decode_empty_input() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("\n  \n# just a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_atom_count_mismatch_fails() {
        let text = WATER.replace("3 2 1 0 0", "4 2 1 0 0");
        let err = decode(&text).unwrap_err();
        assert!(matches!(err, Mol2DbError::Format { .. }));
        assert!(err.to_string().contains("4 atoms"));
    }

    #[test]
    fn test_bond_count_mismatch_fails() {
        let text = WATER.replace("3 2 1 0 0", "3 1 1 0 0");
        assert!(decode(&text).is_err());
    }

    #[test]
    fn test_unknown_bond_reference_fails() {
        let text = WATER.replace("2 1 3 1", "2 1 9 1");
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("unknown atom id 9"));
    }

    #[test]
    fn test_data_before_marker_fails() {
        assert!(decode("1 O 0.0 0.0 0.0 O.3\n").is_err());
    }

    #[test]
    fn test_star_placeholder_maps_to_none() {
        let text = "@<TRIPOS>MOLECULE\nM\n1 0 0\n****\nGASTEIGER\n\
            @<TRIPOS>ATOM\n1 C 0.0000 0.0000 0.0000 C.3 **** **** 0.1000\n";
        let mol = &decode(text).unwrap()[0];
        assert_eq!(mol.mol_type, None);
        assert_eq!(mol.charge_type.as_deref(), Some("GASTEIGER"));
        assert_eq!(mol.atoms[0].subst_id, None);
        assert_eq!(mol.atoms[0].subst_name, None);
        assert!((mol.atoms[0].charge.unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_truncated_molecule_section_fails() {
        assert!(decode("@<TRIPOS>MOLECULE\nOnlyName\n").is_err());
    }
}
