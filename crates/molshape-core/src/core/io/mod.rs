//! Provides readers for molecular structure identifiers.
//!
//! The pipeline consumes structures through the [`traits::StructureParser`]
//! interface; [`smiles`] implements it for SMILES line notation, which is the
//! canonical identifier returned by the name-resolution service.

pub mod smiles;
pub mod traits;
