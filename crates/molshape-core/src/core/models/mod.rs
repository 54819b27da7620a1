//! # Core Models Module
//!
//! Data structures that represent a parsed molecule.
//!
//! ## Key Components
//!
//! - [`element`] - Static periodic-table data (symbols, atomic numbers, default valences)
//! - [`atom`] - A single atom as written in a structure identifier
//! - [`topology`] - Bonds and bond orders
//! - [`molecule`] - The molecular graph with connectivity, fragment and ring queries
//! - [`ids`] - Stable atom identifiers
//! - [`identifier`] - Canonical structure identifiers returned by name lookups
//!
//! ## Usage
//!
//! ```ignore
//! use molshape::core::models::{atom::Atom, element::Element, molecule::Molecule};
//! use molshape::core::models::topology::BondOrder;
//!
//! let mut molecule = Molecule::new();
//! let c = molecule.add_atom(Atom::new(Element::from_symbol("C").unwrap(), false));
//! let o = molecule.add_atom(Atom::new(Element::from_symbol("O").unwrap(), false));
//! molecule.add_bond(c, o, BondOrder::Single)?;
//! ```

pub mod atom;
pub mod element;
pub mod identifier;
pub mod ids;
pub mod molecule;
pub mod topology;
