//! Molecule model
//!
//! In-memory representation of one parsed mol2 structure. Record ids are
//! `u16` and coordinates `f64`/charges `f32`, matching the widths the mol2
//! column layout actually carries.
//!
//! Declared header counts are never stored: the writer recomputes them from
//! the live sequences, so a `Molecule` cannot go stale against its own
//! header.

/// One record from the `@<TRIPOS>ATOM` section
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom id as written in the file (1-based, referenced by bonds)
    pub id: u16,

    /// Atom name (e.g. `CA`, `H1`)
    pub name: String,

    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// SYBYL atom type (e.g. `C.3`, `N.ar`)
    pub atom_type: String,

    /// Substructure id this atom belongs to, if present
    pub subst_id: Option<u16>,

    /// Substructure name, if present
    pub subst_name: Option<String>,

    /// Partial charge, if present
    pub charge: Option<f32>,

    /// Trailing status bit column, if present
    pub status_bit: Option<String>,
}

/// One record from the `@<TRIPOS>BOND` section
#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    /// Bond id as written in the file
    pub id: u16,

    /// Origin atom id (must exist in the atom list)
    pub origin: u16,

    /// Target atom id (must exist in the atom list)
    pub target: u16,

    /// Bond type tag (`1`, `2`, `3`, `ar`, `am`, ...)
    pub bond_type: String,

    /// Trailing status bit column, if present
    pub status_bit: Option<String>,
}

/// One record from the `@<TRIPOS>SUBSTRUCTURE` section
#[derive(Debug, Clone, PartialEq)]
pub struct Substructure {
    pub id: u16,
    pub name: String,

    /// Id of the root atom of this substructure
    pub root_atom: u16,

    pub subst_type: Option<String>,
    pub dict_type: Option<i64>,
    pub chain: Option<String>,
    pub sub_type: Option<String>,
    pub inter_bonds: Option<u16>,
    pub status: Option<String>,
    pub comment: Option<String>,
}

/// One parsed chemical structure: the `@<TRIPOS>MOLECULE` header plus its
/// atom, bond and substructure records in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Molecule {
    /// Molecule name from the header (may be empty)
    pub name: String,

    /// Molecule type classification (`SMALL`, `PROTEIN`, ...)
    pub mol_type: Option<String>,

    /// Charge type classification (`NO_CHARGES`, `GASTEIGER`, ...)
    pub charge_type: Option<String>,

    /// Internal SYBYL status bits line, if present
    pub status_bits: Option<String>,

    /// Free-text molecule comment line, if present
    pub comment: Option<String>,

    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub substructures: Vec<Substructure>,
}

impl Molecule {
    /// Create an empty molecule with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Molecule {
            name: name.into(),
            ..Molecule::default()
        }
    }
}
