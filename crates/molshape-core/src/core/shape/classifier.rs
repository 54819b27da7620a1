use super::descriptors::MolecularStructure;
use std::fmt;

/// Highest rotatable-bond count an acyclic structure may have and still be
/// called flexible.
pub const FLEXIBLE_ROTATABLE_BOND_LIMIT: usize = 3;

/// Coarse structural bucket assigned to a molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeCategory {
    LinearFlexible,
    LinearRigid,
    Monocyclic,
    Bicyclic,
    Polycyclic,
    Unknown,
}

impl ShapeCategory {
    pub const ALL: [ShapeCategory; 6] = [
        Self::LinearFlexible,
        Self::LinearRigid,
        Self::Monocyclic,
        Self::Bicyclic,
        Self::Polycyclic,
        Self::Unknown,
    ];

    /// Human-readable label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Self::LinearFlexible => "Linear and Flexible",
            Self::LinearRigid => "Linear and Rigid",
            Self::Monocyclic => "Monocyclic",
            Self::Bicyclic => "Bicyclic",
            Self::Polycyclic => "Polycyclic",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assigns a shape category to any structure exposing ring and rotatable-bond
/// counts.
///
/// The atom count is not consulted.
pub fn classify<S: MolecularStructure + ?Sized>(structure: &S) -> ShapeCategory {
    classify_counts(structure.ring_count(), structure.rotatable_bond_count())
}

/// The first-match rule table behind [`classify`].
pub fn classify_counts(ring_count: usize, rotatable_bonds: usize) -> ShapeCategory {
    match (ring_count, rotatable_bonds) {
        (0, bonds) if bonds <= FLEXIBLE_ROTATABLE_BOND_LIMIT => ShapeCategory::LinearFlexible,
        (0, _) => ShapeCategory::LinearRigid,
        (1, _) => ShapeCategory::Monocyclic,
        (2, _) => ShapeCategory::Bicyclic,
        (rings, _) if rings > 2 => ShapeCategory::Polycyclic,
        // Unreachable for unsigned counts.
        _ => ShapeCategory::Unknown,
    }
}
