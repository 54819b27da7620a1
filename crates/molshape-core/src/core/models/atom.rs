use super::element::Element;

/// Represents a single atom parsed from a structure identifier.
///
/// Atoms written in the SMILES organic subset carry no explicit hydrogen
/// count; bracket atoms always do (an omitted `H` means zero).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Static element data (symbol, atomic number, valences).
    pub element: &'static Element,
    /// Whether the atom was written in lowercase aromatic form.
    pub aromatic: bool,
    /// Formal charge in elementary charge units.
    pub charge: i8,
    /// Mass number, when an isotope was specified.
    pub isotope: Option<u16>,
    /// Hydrogen count from a bracket atom; `None` for organic-subset atoms.
    pub explicit_hydrogens: Option<u8>,
    /// Atom-class annotation (`[CH3:1]`), carried through unchanged.
    pub atom_class: Option<u32>,
}

impl Atom {
    /// Creates a neutral organic-subset atom.
    pub fn new(element: &'static Element, aromatic: bool) -> Self {
        Self {
            element,
            aromatic,
            charge: 0,
            isotope: None,
            explicit_hydrogens: None,
            atom_class: None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.element.symbol
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element.is_hydrogen()
    }

    /// Whether this atom is an ordinary hydrogen that a hydrogen-suppressed
    /// depiction would fold into its neighbor.
    pub fn is_plain_hydrogen(&self) -> bool {
        self.is_hydrogen() && self.charge == 0 && self.isotope.is_none()
    }

    /// Whether the atom was written inside square brackets.
    pub fn is_bracket(&self) -> bool {
        self.explicit_hydrogens.is_some()
    }
}
