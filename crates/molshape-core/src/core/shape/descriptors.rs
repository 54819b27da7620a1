use super::rings::relevant_rings;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::{Bond, BondOrder};
use serde::Serialize;

const CARBON: u8 = 6;
const NITROGEN: u8 = 7;
const OXYGEN: u8 = 8;
const FLUORINE: u8 = 9;
const SULFUR: u8 = 16;
const CHLORINE: u8 = 17;
const BROMINE: u8 = 35;

/// Structural quantities the shape classifier reads.
///
/// Implementors must return non-negative counts; every count is a `usize`, so
/// the classifier's rule table is total.
pub trait MolecularStructure {
    /// Number of rings, counting every face of bridged and cage systems.
    fn ring_count(&self) -> usize;

    /// Number of rotatable bonds under the strict definition.
    fn rotatable_bond_count(&self) -> usize;

    /// Number of atoms once ordinary hydrogens are folded into their neighbors.
    fn atom_count(&self) -> usize;

    /// Collects the three counts into a [`Descriptors`] value.
    fn descriptors(&self) -> Descriptors {
        Descriptors {
            ring_count: self.ring_count(),
            rotatable_bonds: self.rotatable_bond_count(),
            atom_count: self.atom_count(),
        }
    }
}

/// The descriptor values reported alongside every classified structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Descriptors {
    pub ring_count: usize,
    pub rotatable_bonds: usize,
    pub atom_count: usize,
}

impl MolecularStructure for Descriptors {
    fn ring_count(&self) -> usize {
        self.ring_count
    }

    fn rotatable_bond_count(&self) -> usize {
        self.rotatable_bonds
    }

    fn atom_count(&self) -> usize {
        self.atom_count
    }

    fn descriptors(&self) -> Descriptors {
        *self
    }
}

impl MolecularStructure for Molecule {
    /// Size of the relevant ring set. For fused and spiro systems this is the
    /// cyclomatic number; cages such as bicyclo[2.2.2]octane count one ring
    /// per face.
    fn ring_count(&self) -> usize {
        relevant_rings(self).len()
    }

    fn rotatable_bond_count(&self) -> usize {
        let ring_bonds = self.ring_bond_flags();
        self.bonds()
            .iter()
            .zip(&ring_bonds)
            .filter(|&(bond, &in_ring)| !in_ring && is_rotatable(self, bond, &ring_bonds))
            .count()
    }

    fn atom_count(&self) -> usize {
        self.atoms_iter()
            .filter(|&(id, _)| !self.is_suppressible_hydrogen(id))
            .count()
    }
}

fn atomic_number(molecule: &Molecule, id: AtomId) -> u8 {
    molecule
        .atom(id)
        .map_or(0, |atom| atom.element.atomic_number)
}

fn is_aliphatic(molecule: &Molecule, id: AtomId, number: u8) -> bool {
    molecule
        .atom(id)
        .is_some_and(|atom| !atom.aromatic && atom.element.atomic_number == number)
}

/// Tests a non-ring bond against the strict rotatable-bond pattern.
///
/// The amide exclusion applies to atoms, not to the bond: a bond is dropped
/// only when both of its ends are amide-like. This removes the C-N bond of an
/// amide and also the N-N bond of a diacylhydrazine or the C-C bond of
/// oxamide, while keeping the O-C bond on the alkyl side of an ester.
fn is_rotatable(molecule: &Molecule, bond: &Bond, ring_bonds: &[bool]) -> bool {
    if !matches!(bond.order, BondOrder::Single | BondOrder::Aromatic) {
        return false;
    }
    let (a, b) = (bond.atom1_id, bond.atom2_id);

    rotatable_end(molecule, a, b)
        && rotatable_end(molecule, b, a)
        && !(is_amide_like(molecule, a, ring_bonds) && is_amide_like(molecule, b, ring_bonds))
}

fn rotatable_end(molecule: &Molecule, id: AtomId, partner: AtomId) -> bool {
    if molecule.atom(id).is_none_or(|atom| atom.is_hydrogen()) {
        return false;
    }
    molecule.heavy_degree(id) > 1
        && !in_triple_bond(molecule, id)
        && !is_trihalomethyl(molecule, id)
        && !is_tert_butyl_center(molecule, id, partner)
}

fn in_triple_bond(molecule: &Molecule, id: AtomId) -> bool {
    molecule
        .bonds_of(id)
        .any(|(_, bond)| bond.order == BondOrder::Triple)
}

fn is_trihalomethyl(molecule: &Molecule, id: AtomId) -> bool {
    if !is_aliphatic(molecule, id, CARBON) {
        return false;
    }
    [FLUORINE, CHLORINE, BROMINE].iter().any(|&halogen| {
        molecule
            .neighbors(id)
            .filter(|&n| atomic_number(molecule, n) == halogen)
            .count()
            >= 3
    })
}

/// A carbon carrying three methyl groups besides the bond being tested.
fn is_tert_butyl_center(molecule: &Molecule, id: AtomId, partner: AtomId) -> bool {
    if !is_aliphatic(molecule, id, CARBON) {
        return false;
    }
    molecule
        .neighbors(id)
        .filter(|&n| n != partner)
        .filter(|&n| is_aliphatic(molecule, n, CARBON) && molecule.hydrogen_count(n) == 3)
        .count()
        >= 3
}

/// Neighbors reached over single bonds that are not in a ring.
fn chain_neighbors<'a>(
    molecule: &'a Molecule,
    id: AtomId,
    ring_bonds: &'a [bool],
) -> impl Iterator<Item = AtomId> + 'a {
    molecule
        .bonds_of(id)
        .filter(move |&(index, bond)| bond.order == BondOrder::Single && !ring_bonds[index])
        .filter_map(move |(_, bond)| bond.partner(id))
}

fn has_double_bond_to(molecule: &Molecule, id: AtomId, accept: impl Fn(AtomId) -> bool) -> bool {
    molecule.bonds_of(id).any(|(_, bond)| {
        bond.order == BondOrder::Double && bond.partner(id).is_some_and(&accept)
    })
}

fn is_three_connected_carbon(molecule: &Molecule, id: AtomId) -> bool {
    is_aliphatic(molecule, id, CARBON) && molecule.heavy_degree(id) == 3
}

fn is_aliphatic_heteroatom(molecule: &Molecule, id: AtomId) -> bool {
    [NITROGEN, OXYGEN, SULFUR]
        .iter()
        .any(|&number| is_aliphatic(molecule, id, number))
}

/// Any nitrogen, an aliphatic oxygen, or an aliphatic sulfur with more than
/// one heavy neighbor.
fn is_acyl_partner(molecule: &Molecule, id: AtomId) -> bool {
    atomic_number(molecule, id) == NITROGEN
        || is_aliphatic(molecule, id, OXYGEN)
        || (is_aliphatic(molecule, id, SULFUR) && molecule.heavy_degree(id) != 1)
}

fn is_branched_nitrogen(molecule: &Molecule, id: AtomId) -> bool {
    atomic_number(molecule, id) == NITROGEN && molecule.heavy_degree(id) != 1
}

fn is_iminium(molecule: &Molecule, id: AtomId) -> bool {
    is_aliphatic(molecule, id, NITROGEN) && molecule.atom(id).is_some_and(|atom| atom.charge == 1)
}

/// A carbonyl-type carbon: three-connected, double-bonded to N, O or S.
fn is_acyl_carbon(molecule: &Molecule, id: AtomId) -> bool {
    is_three_connected_carbon(molecule, id)
        && has_double_bond_to(molecule, id, |n| is_aliphatic_heteroatom(molecule, n))
}

fn is_amidinium_carbon(molecule: &Molecule, id: AtomId) -> bool {
    is_three_connected_carbon(molecule, id)
        && has_double_bond_to(molecule, id, |n| is_iminium(molecule, n))
}

/// Whether `id` belongs to an amide, ester, thioester or amidinium linkage
/// made of chain single bonds, on either the carbon or the heteroatom side.
fn is_amide_like(molecule: &Molecule, id: AtomId, ring_bonds: &[bool]) -> bool {
    if is_acyl_carbon(molecule, id)
        && chain_neighbors(molecule, id, ring_bonds).any(|n| is_acyl_partner(molecule, n))
    {
        return true;
    }
    if is_amidinium_carbon(molecule, id)
        && chain_neighbors(molecule, id, ring_bonds).any(|n| is_branched_nitrogen(molecule, n))
    {
        return true;
    }
    if is_acyl_partner(molecule, id)
        && chain_neighbors(molecule, id, ring_bonds).any(|c| is_acyl_carbon(molecule, c))
    {
        return true;
    }
    is_branched_nitrogen(molecule, id)
        && chain_neighbors(molecule, id, ring_bonds).any(|c| is_amidinium_carbon(molecule, c))
}
