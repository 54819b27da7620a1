//! # Core Module
//!
//! Stateless building blocks of MolShape: the molecular graph, the SMILES
//! reader and the shape classifier.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms, bonds and the molecule graph
//! - **Structure I/O** ([`io`]) - The [`io::traits::StructureParser`] seam and the SMILES reader
//! - **Shape Analysis** ([`shape`]) - Descriptor computation and shape classification
//!
//! Nothing in this module performs I/O or holds state between calls, so every
//! function here is safe to call from any thread.

pub mod io;
pub mod models;
pub mod shape;
