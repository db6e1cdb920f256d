//! Tests for the mol2 codec
//!
//! These tests verify:
//! - Decoding multi-molecule files
//! - Strict count and bond-reference validation
//! - Exact round-trips with byte-identical re-encoding
//! - File helpers (truncate vs append)

use mol2db::{codec, decode, encode, Molecule};
use tempfile::TempDir;

// =============================================================================
// Fixtures
// =============================================================================

const TWO_MOLECULES: &str = "\
@<TRIPOS>MOLECULE
ethanol
 3 2 1 0 0
SMALL
GASTEIGER

@<TRIPOS>ATOM
      1 C1          0.0010   -0.5000    1.2500 C.3        1 ETH1        0.0310
      2 C2          1.4510    0.0000    1.2500 C.3        1 ETH1        0.0310
      3 O1          2.2000    0.9950    0.5250 O.3        1 ETH1       -0.3980
@<TRIPOS>BOND
     1     1     2 1
     2     2     3 1
@<TRIPOS>SUBSTRUCTURE
     1 ETH1        1 RESIDUE
@<TRIPOS>MOLECULE
water
 2 1 0 0 0
SMALL
NO_CHARGES
@<TRIPOS>ATOM
      1 O           0.0000    0.0000    0.0000 O.3
      2 H           0.9572    0.0000    0.0000 H
@<TRIPOS>BOND
     1     1     2 1
";

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_multiple_molecules_in_order() {
    let molecules = decode(TWO_MOLECULES).unwrap();
    assert_eq!(molecules.len(), 2);
    assert_eq!(molecules[0].name, "ethanol");
    assert_eq!(molecules[1].name, "water");

    assert_eq!(molecules[0].atoms.len(), 3);
    assert_eq!(molecules[0].bonds.len(), 2);
    assert_eq!(molecules[0].substructures.len(), 1);
    assert_eq!(molecules[1].atoms.len(), 2);
    assert_eq!(molecules[1].bonds.len(), 1);
}

#[test]
fn test_decode_preserves_field_detail() {
    let molecules = decode(TWO_MOLECULES).unwrap();
    let ethanol = &molecules[0];

    assert_eq!(ethanol.charge_type.as_deref(), Some("GASTEIGER"));
    assert_eq!(ethanol.atoms[2].name, "O1");
    assert_eq!(ethanol.atoms[2].atom_type, "O.3");
    assert_eq!(ethanol.atoms[2].subst_id, Some(1));
    assert!((ethanol.atoms[2].charge.unwrap() - (-0.398)).abs() < 1e-6);
    assert_eq!(ethanol.bonds[1].origin, 2);
    assert_eq!(ethanol.bonds[1].target, 3);
    assert_eq!(ethanol.substructures[0].name, "ETH1");
    assert_eq!(ethanol.substructures[0].root_atom, 1);

    // Water's atoms carry no optional columns at all
    assert_eq!(molecules[1].atoms[0].subst_id, None);
    assert_eq!(molecules[1].atoms[0].charge, None);
}

#[test]
fn test_declared_count_mismatch_is_an_error() {
    let text = TWO_MOLECULES.replace(" 3 2 1 0 0", " 3 2 2 0 0");
    let err = decode(&text).unwrap_err();
    assert!(err.to_string().contains("substructures"));
}

#[test]
fn test_truncated_atom_section_is_an_error() {
    // Drop the last atom line but keep the declared count
    let text = TWO_MOLECULES.replace(
        "      3 O1          2.2000    0.9950    0.5250 O.3        1 ETH1       -0.3980\n",
        "",
    );
    let err = decode(&text).unwrap_err();
    assert!(err.to_string().contains("3 atoms"));
}

#[test]
fn test_bond_to_missing_atom_is_an_error() {
    let text = TWO_MOLECULES.replace("     2     2     3 1", "     2     2     7 1");
    let err = decode(&text).unwrap_err();
    assert!(err.to_string().contains("unknown atom id 7"));
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_roundtrip_field_for_field() {
    let molecules = decode(TWO_MOLECULES).unwrap();
    let redecoded = decode(&encode(&molecules)).unwrap();
    assert_eq!(molecules, redecoded);
}

#[test]
fn test_reencode_is_byte_identical() {
    let molecules = decode(TWO_MOLECULES).unwrap();
    let first = encode(&molecules);
    let second = encode(&decode(&first).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_header_counts_are_recomputed() {
    let mut molecules = decode(TWO_MOLECULES).unwrap();

    // Mutate the live sequences; the writer must not trust anything stale
    molecules[1].bonds.clear();
    let text = encode(&[molecules[1].clone()]);
    assert!(text.contains("    2     0     0     0     0"));
    assert!(!text.contains("@<TRIPOS>BOND"));
    assert_eq!(decode(&text).unwrap()[0].bonds.len(), 0);
}

// =============================================================================
// File Helper Tests
// =============================================================================

#[test]
fn test_write_then_read_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.mol2");
    let molecules = decode(TWO_MOLECULES).unwrap();

    codec::write_mol2_file(&path, &molecules, false).unwrap();
    let read_back = codec::read_mol2_file(&path).unwrap();
    assert_eq!(molecules, read_back);
}

#[test]
fn test_write_truncates_by_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.mol2");
    let molecules = decode(TWO_MOLECULES).unwrap();

    codec::write_mol2_file(&path, &molecules, false).unwrap();
    codec::write_mol2_file(&path, &molecules[..1].to_vec(), false).unwrap();

    assert_eq!(codec::read_mol2_file(&path).unwrap().len(), 1);
}

#[test]
fn test_write_append_concatenates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.mol2");
    let molecules = decode(TWO_MOLECULES).unwrap();

    codec::write_mol2_file(&path, &molecules, false).unwrap();
    codec::write_mol2_file(&path, &molecules, true).unwrap();

    let read_back = codec::read_mol2_file(&path).unwrap();
    assert_eq!(read_back.len(), 4);
    assert_eq!(read_back[2].name, "ethanol");
}

#[test]
fn test_empty_molecule_list_roundtrip() {
    let empty: Vec<Molecule> = Vec::new();
    assert_eq!(encode(&empty), "");
    assert!(decode("").unwrap().is_empty());
}
