use crate::core::models::molecule::Molecule;
use std::error::Error;

/// Defines the interface for turning a structure identifier into a molecule.
///
/// Implementors handle one line notation each (SMILES for
/// [`SmilesParser`](super::smiles::SmilesParser)). The pipeline only needs
/// the parsed graph, so no format metadata is carried alongside it.
pub trait StructureParser: Send + Sync {
    /// The error type describing why an identifier was rejected.
    type Error: Error + Send + Sync + 'static;

    /// Parses a structure identifier.
    ///
    /// # Arguments
    ///
    /// * `identifier` - The textual structure encoding to parse.
    ///
    /// # Return
    ///
    /// Returns the parsed molecular graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is not valid in this notation.
    fn parse(&self, identifier: &str) -> Result<Molecule, Self::Error>;
}
