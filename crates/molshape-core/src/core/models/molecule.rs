use super::atom::Atom;
use super::ids::AtomId;
use super::topology::{Bond, BondOrder};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Atom not found in molecule")]
    AtomNotFound,
    #[error("An atom cannot be bonded to itself")]
    SelfBond,
    #[error("Atoms are already bonded to each other")]
    DuplicateBond,
}

/// A molecular graph: atoms connected by bonds of a given order.
///
/// Atoms are stored in a slot map so that ids stay stable; iteration order
/// matches insertion order as long as no atom is removed (the type exposes no
/// removal).
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// All bonds, addressed by their index.
    bonds: Vec<Bond>,
    /// Bond indices incident to each atom.
    adjacency: SecondaryMap<AtomId, Vec<usize>>,
}

impl Molecule {
    /// Creates a new, empty molecule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an atom and returns its id.
    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let id = self.atoms.insert(atom);
        self.adjacency.insert(id, Vec::new());
        id
    }

    /// Connects two existing atoms.
    ///
    /// # Arguments
    ///
    /// * `atom1_id` - First atom of the bond.
    /// * `atom2_id` - Second atom of the bond.
    /// * `order` - The bond order.
    ///
    /// # Return
    ///
    /// Returns the index of the new bond.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError`] if either atom is missing, if both ids refer
    /// to the same atom, or if the atoms are already bonded.
    pub fn add_bond(
        &mut self,
        atom1_id: AtomId,
        atom2_id: AtomId,
        order: BondOrder,
    ) -> Result<usize, MoleculeError> {
        if !self.atoms.contains_key(atom1_id) || !self.atoms.contains_key(atom2_id) {
            return Err(MoleculeError::AtomNotFound);
        }
        if atom1_id == atom2_id {
            return Err(MoleculeError::SelfBond);
        }
        if self.bond_between(atom1_id, atom2_id).is_some() {
            return Err(MoleculeError::DuplicateBond);
        }

        let index = self.bonds.len();
        self.bonds.push(Bond::new(atom1_id, atom2_id, order));
        self.adjacency[atom1_id].push(index);
        self.adjacency[atom2_id].push(index);
        Ok(index)
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Returns an iterator over all atoms in insertion order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Total number of atoms, hydrogens included.
    pub fn total_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Finds the bond connecting two atoms, if any.
    pub fn bond_between(&self, atom1_id: AtomId, atom2_id: AtomId) -> Option<&Bond> {
        self.adjacency
            .get(atom1_id)?
            .iter()
            .map(|&index| &self.bonds[index])
            .find(|bond| bond.contains(atom2_id) && bond.contains(atom1_id))
    }

    /// Returns `(bond index, bond)` pairs for every bond touching `id`.
    pub fn bonds_of(&self, id: AtomId) -> impl Iterator<Item = (usize, &Bond)> + '_ {
        self.adjacency
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&index| (index, &self.bonds[index]))
    }

    pub fn neighbors(&self, id: AtomId) -> impl Iterator<Item = AtomId> + '_ {
        self.bonds_of(id).filter_map(move |(_, bond)| bond.partner(id))
    }

    pub fn degree(&self, id: AtomId) -> usize {
        self.adjacency.get(id).map_or(0, Vec::len)
    }

    /// Number of neighbors that are not hydrogen.
    pub fn heavy_degree(&self, id: AtomId) -> usize {
        self.neighbors(id)
            .filter(|&n| self.atoms.get(n).is_some_and(|atom| !atom.is_hydrogen()))
            .count()
    }

    /// Sum of bond valence contributions on `id`.
    pub fn bond_order_sum(&self, id: AtomId) -> u16 {
        self.bonds_of(id)
            .map(|(_, bond)| bond.order.valence_contribution() as u16)
            .sum()
    }

    /// Hydrogens carried by the atom itself: the bracket count as written, or
    /// for organic-subset atoms the implicit count that fills the lowest
    /// default valence. Aromatic atoms reserve one valence unit for the
    /// aromatic system and only consider their lowest valence.
    pub fn implicit_hydrogens(&self, id: AtomId) -> u8 {
        let Some(atom) = self.atoms.get(id) else {
            return 0;
        };
        if let Some(count) = atom.explicit_hydrogens {
            return count;
        }

        let valences = atom.element.default_valences;
        let mut used = self.bond_order_sum(id);
        if atom.aromatic {
            used += 1;
            return valences
                .first()
                .map(|&v| v as u16)
                .filter(|&v| v >= used)
                .map_or(0, |v| (v - used) as u8);
        }
        valences
            .iter()
            .map(|&v| v as u16)
            .find(|&v| v >= used)
            .map_or(0, |v| (v - used) as u8)
    }

    /// Total hydrogens on an atom: implicit plus explicit hydrogen neighbors.
    pub fn hydrogen_count(&self, id: AtomId) -> u8 {
        let neighbors = self
            .neighbors(id)
            .filter(|&n| self.atoms.get(n).is_some_and(Atom::is_hydrogen))
            .count() as u8;
        self.implicit_hydrogens(id) + neighbors
    }

    /// Whether `id` is an ordinary hydrogen hanging off a single heavy atom,
    /// the kind a hydrogen-suppressed view folds into its neighbor.
    pub fn is_suppressible_hydrogen(&self, id: AtomId) -> bool {
        self.atoms.get(id).is_some_and(Atom::is_plain_hydrogen)
            && self.degree(id) == 1
            && self.heavy_degree(id) == 1
    }

    /// Groups atom ids by connected fragment, in order of first appearance.
    pub fn components(&self) -> Vec<Vec<AtomId>> {
        let mut seen: SecondaryMap<AtomId, ()> = SecondaryMap::new();
        let mut components = Vec::new();

        for root in self.atoms.keys() {
            if seen.contains_key(root) {
                continue;
            }
            seen.insert(root, ());
            let mut members = Vec::new();
            let mut queue = VecDeque::from([root]);
            while let Some(current) = queue.pop_front() {
                members.push(current);
                for next in self.neighbors(current) {
                    if seen.insert(next, ()).is_none() {
                        queue.push_back(next);
                    }
                }
            }
            components.push(members);
        }
        components
    }

    /// Flags each bond (by index) that lies on at least one ring.
    ///
    /// A bond is a ring bond exactly when it is not a bridge of the graph.
    /// Bridges are found with an iterative Tarjan low-link walk so that long
    /// chains cannot overflow the stack.
    pub fn ring_bond_flags(&self) -> Vec<bool> {
        let mut order: SecondaryMap<AtomId, usize> = SecondaryMap::new();
        let mut low: SecondaryMap<AtomId, usize> = SecondaryMap::new();
        let mut is_bridge = vec![false; self.bonds.len()];
        let mut counter = 0usize;

        for root in self.atoms.keys() {
            if order.contains_key(root) {
                continue;
            }
            order.insert(root, counter);
            low.insert(root, counter);
            counter += 1;

            // (atom, bond used to reach it, next adjacency slot to visit)
            let mut stack: Vec<(AtomId, Option<usize>, usize)> = vec![(root, None, 0)];

            while let Some(frame) = stack.last_mut() {
                let (atom, parent_bond, slot) = *frame;
                let incident = &self.adjacency[atom];

                if slot < incident.len() {
                    frame.2 += 1;
                    let bond_index = incident[slot];
                    if Some(bond_index) == parent_bond {
                        continue;
                    }
                    let Some(next) = self.bonds[bond_index].partner(atom) else {
                        continue;
                    };
                    if let Some(&next_order) = order.get(next) {
                        low[atom] = low[atom].min(next_order);
                    } else {
                        order.insert(next, counter);
                        low.insert(next, counter);
                        counter += 1;
                        stack.push((next, Some(bond_index), 0));
                    }
                } else {
                    stack.pop();
                    if let (Some(bond_index), Some(&(parent, _, _))) = (parent_bond, stack.last()) {
                        low[parent] = low[parent].min(low[atom]);
                        if low[atom] > order[parent] {
                            is_bridge[bond_index] = true;
                        }
                    }
                }
            }
        }

        is_bridge.into_iter().map(|bridge| !bridge).collect()
    }

    /// Flags each atom that lies on at least one ring.
    pub fn ring_atoms(&self) -> SecondaryMap<AtomId, bool> {
        let ring_bonds = self.ring_bond_flags();
        let mut flags: SecondaryMap<AtomId, bool> =
            self.atoms.keys().map(|id| (id, false)).collect();
        for (bond, in_ring) in self.bonds.iter().zip(ring_bonds) {
            if in_ring {
                flags[bond.atom1_id] = true;
                flags[bond.atom2_id] = true;
            }
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::Element;

    fn carbon() -> Atom {
        Atom::new(Element::from_symbol("C").unwrap(), false)
    }

    fn chain(molecule: &mut Molecule, length: usize) -> Vec<AtomId> {
        let ids: Vec<AtomId> = (0..length).map(|_| molecule.add_atom(carbon())).collect();
        for pair in ids.windows(2) {
            molecule
                .add_bond(pair[0], pair[1], BondOrder::Single)
                .unwrap();
        }
        ids
    }

    #[test]
    fn add_bond_rejects_self_and_duplicate_bonds() {
        let mut molecule = Molecule::new();
        let ids = chain(&mut molecule, 2);

        assert_eq!(
            molecule.add_bond(ids[0], ids[0], BondOrder::Single),
            Err(MoleculeError::SelfBond)
        );
        assert_eq!(
            molecule.add_bond(ids[1], ids[0], BondOrder::Double),
            Err(MoleculeError::DuplicateBond)
        );
        assert_eq!(molecule.bond_count(), 1);
    }

    #[test]
    fn add_bond_rejects_unknown_atoms() {
        let mut molecule = Molecule::new();
        let a = molecule.add_atom(carbon());
        let mut other = Molecule::new();
        other.add_atom(carbon());
        let foreign = other.add_atom(carbon());

        assert_eq!(
            molecule.add_bond(a, foreign, BondOrder::Single),
            Err(MoleculeError::AtomNotFound)
        );
    }

    #[test]
    fn neighbors_and_degrees_follow_bonds() {
        let mut molecule = Molecule::new();
        let ids = chain(&mut molecule, 3);
        let h = molecule.add_atom(Atom::new(Element::from_symbol("H").unwrap(), false));
        molecule.add_bond(ids[1], h, BondOrder::Single).unwrap();

        let mut neighbors: Vec<AtomId> = molecule.neighbors(ids[1]).collect();
        neighbors.sort();
        let mut expected = vec![ids[0], ids[2], h];
        expected.sort();

        assert_eq!(neighbors, expected);
        assert_eq!(molecule.degree(ids[1]), 3);
        assert_eq!(molecule.heavy_degree(ids[1]), 2);
        assert_eq!(molecule.bond_order_sum(ids[1]), 3);
    }

    #[test]
    fn implicit_hydrogens_fill_lowest_valence() {
        let mut molecule = Molecule::new();
        let ids = chain(&mut molecule, 2);
        let o = molecule.add_atom(Atom::new(Element::from_symbol("O").unwrap(), false));
        molecule.add_bond(ids[1], o, BondOrder::Double).unwrap();

        assert_eq!(molecule.implicit_hydrogens(ids[0]), 3);
        assert_eq!(molecule.implicit_hydrogens(ids[1]), 1);
        assert_eq!(molecule.implicit_hydrogens(o), 0);
    }

    #[test]
    fn bracket_atoms_report_their_written_hydrogens() {
        let mut molecule = Molecule::new();
        let mut atom = carbon();
        atom.explicit_hydrogens = Some(0);
        let id = molecule.add_atom(atom);
        let h = molecule.add_atom(Atom::new(Element::from_symbol("H").unwrap(), false));
        molecule.add_bond(id, h, BondOrder::Single).unwrap();

        assert_eq!(molecule.implicit_hydrogens(id), 0);
        assert_eq!(molecule.hydrogen_count(id), 1);
    }

    #[test]
    fn chain_has_no_ring_bonds() {
        let mut molecule = Molecule::new();
        chain(&mut molecule, 5);
        assert!(molecule.ring_bond_flags().iter().all(|&flag| !flag));
    }

    #[test]
    fn ring_with_tail_flags_only_ring_bonds() {
        let mut molecule = Molecule::new();
        let ring = chain(&mut molecule, 6);
        molecule
            .add_bond(ring[5], ring[0], BondOrder::Single)
            .unwrap();
        let tail = molecule.add_atom(carbon());
        molecule.add_bond(ring[0], tail, BondOrder::Single).unwrap();

        let flags = molecule.ring_bond_flags();
        assert_eq!(flags.iter().filter(|&&flag| flag).count(), 6);
        assert!(!flags[6]);

        let ring_atoms = molecule.ring_atoms();
        assert!(ring.iter().all(|&id| ring_atoms[id]));
        assert!(!ring_atoms[tail]);
    }

    #[test]
    fn bond_linking_two_rings_is_not_a_ring_bond() {
        let mut molecule = Molecule::new();
        let first = chain(&mut molecule, 3);
        molecule
            .add_bond(first[2], first[0], BondOrder::Single)
            .unwrap();
        let second = chain(&mut molecule, 3);
        molecule
            .add_bond(second[2], second[0], BondOrder::Single)
            .unwrap();
        let link = molecule
            .add_bond(first[0], second[0], BondOrder::Single)
            .unwrap();

        let flags = molecule.ring_bond_flags();
        assert!(!flags[link]);
        assert_eq!(flags.iter().filter(|&&flag| flag).count(), 6);
    }

    #[test]
    fn components_are_counted_per_fragment() {
        let mut molecule = Molecule::new();
        chain(&mut molecule, 2);
        chain(&mut molecule, 3);
        molecule.add_atom(carbon());

        let components = molecule.components();
        assert_eq!(molecule.components().len(), 3);
        assert_eq!(components[0].len(), 2);
        assert_eq!(components[1].len(), 3);
        assert_eq!(components[2].len(), 1);
    }
}
