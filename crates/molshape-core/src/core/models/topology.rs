use super::ids::AtomId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    /// Maps an explicit SMILES bond symbol to a bond order.
    ///
    /// The directional symbols `/` and `\` only carry stereo information and
    /// are read as single bonds.
    pub fn from_smiles_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '-' | '/' | '\\' => Some(Self::Single),
            '=' => Some(Self::Double),
            '#' => Some(Self::Triple),
            '$' => Some(Self::Quadruple),
            ':' => Some(Self::Aromatic),
            _ => None,
        }
    }

    /// Valence units the bond consumes on each end.
    /// Aromatic bonds count as one; the extra aromatic electron is handled by
    /// the valence check itself.
    pub fn valence_contribution(self) -> u8 {
        match self {
            Self::Single | Self::Aromatic => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Quadruple => 4,
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Quadruple => "Quadruple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1_id: AtomId,
    pub atom2_id: AtomId,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Self {
        Self {
            atom1_id,
            atom2_id,
            order,
        }
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atom1_id == atom_id || self.atom2_id == atom_id
    }

    /// Returns the atom on the other end of the bond, if `atom_id` is one end.
    pub fn partner(&self, atom_id: AtomId) -> Option<AtomId> {
        if self.atom1_id == atom_id {
            Some(self.atom2_id)
        } else if self.atom2_id == atom_id {
            Some(self.atom1_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn from_smiles_symbol_maps_all_bond_symbols() {
        assert_eq!(BondOrder::from_smiles_symbol('-'), Some(BondOrder::Single));
        assert_eq!(BondOrder::from_smiles_symbol('/'), Some(BondOrder::Single));
        assert_eq!(BondOrder::from_smiles_symbol('\\'), Some(BondOrder::Single));
        assert_eq!(BondOrder::from_smiles_symbol('='), Some(BondOrder::Double));
        assert_eq!(BondOrder::from_smiles_symbol('#'), Some(BondOrder::Triple));
        assert_eq!(
            BondOrder::from_smiles_symbol('$'),
            Some(BondOrder::Quadruple)
        );
        assert_eq!(
            BondOrder::from_smiles_symbol(':'),
            Some(BondOrder::Aromatic)
        );
        assert_eq!(BondOrder::from_smiles_symbol('C'), None);
    }

    #[test]
    fn bond_order_display_outputs_expected_strings() {
        assert_eq!(BondOrder::Single.to_string(), "Single");
        assert_eq!(BondOrder::Double.to_string(), "Double");
        assert_eq!(BondOrder::Triple.to_string(), "Triple");
        assert_eq!(BondOrder::Aromatic.to_string(), "Aromatic");
    }

    #[test]
    fn bond_order_default_is_single() {
        assert_eq!(BondOrder::default(), BondOrder::Single);
    }

    #[test]
    fn bond_contains_returns_true_for_both_atoms() {
        let a1 = dummy_atom_id(10);
        let a2 = dummy_atom_id(20);
        let bond = Bond::new(a1, a2, BondOrder::Single);
        assert!(bond.contains(a1));
        assert!(bond.contains(a2));
    }

    #[test]
    fn partner_returns_opposite_end() {
        let a1 = dummy_atom_id(1);
        let a2 = dummy_atom_id(2);
        let unrelated = dummy_atom_id(3);
        let bond = Bond::new(a1, a2, BondOrder::Double);
        assert_eq!(bond.partner(a1), Some(a2));
        assert_eq!(bond.partner(a2), Some(a1));
        assert_eq!(bond.partner(unrelated), None);
    }
}
