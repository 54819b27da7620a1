use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use slotmap::SecondaryMap;
use std::collections::HashSet;

/// A ring, as the sorted indices of its bonds in [`Molecule::bonds`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ring {
    pub bonds: Vec<usize>,
}

impl Ring {
    pub fn size(&self) -> usize {
        self.bonds.len()
    }
}

/// Edge set over the ring subgraph, one bit per ring bond.
type EdgeSet = Vec<u64>;

/// The ring bonds of a molecule, re-indexed as a compact graph.
struct RingGraph {
    /// Bond index in the molecule for each local edge.
    bond_of_edge: Vec<usize>,
    /// `(neighbor, edge)` pairs per local vertex.
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl RingGraph {
    fn new(molecule: &Molecule) -> Self {
        let mut vertex_of: SecondaryMap<AtomId, usize> = SecondaryMap::new();
        let mut adjacency: Vec<Vec<(usize, usize)>> = Vec::new();
        let mut bond_of_edge = Vec::new();

        let mut vertex = |id: AtomId, adjacency: &mut Vec<Vec<(usize, usize)>>| {
            if let Some(&v) = vertex_of.get(id) {
                return v;
            }
            let v = adjacency.len();
            adjacency.push(Vec::new());
            vertex_of.insert(id, v);
            v
        };

        let flags = molecule.ring_bond_flags();
        for (index, (bond, in_ring)) in molecule.bonds().iter().zip(flags).enumerate() {
            if !in_ring {
                continue;
            }
            let a = vertex(bond.atom1_id, &mut adjacency);
            let b = vertex(bond.atom2_id, &mut adjacency);
            let edge = bond_of_edge.len();
            bond_of_edge.push(index);
            adjacency[a].push((b, edge));
            adjacency[b].push((a, edge));
        }

        Self {
            bond_of_edge,
            adjacency,
        }
    }

    fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    fn edge_count(&self) -> usize {
        self.bond_of_edge.len()
    }

    fn empty_set(&self) -> EdgeSet {
        vec![0; self.edge_count().div_ceil(64)]
    }

    /// Number of independent cycles: `edges - vertices + components`.
    fn cycle_rank(&self) -> usize {
        let mut seen = vec![false; self.vertex_count()];
        let mut components = 0;
        for start in 0..self.vertex_count() {
            if seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            let mut stack = vec![start];
            while let Some(v) = stack.pop() {
                for &(next, _) in &self.adjacency[v] {
                    if !seen[next] {
                        seen[next] = true;
                        stack.push(next);
                    }
                }
            }
        }
        (self.edge_count() + components).saturating_sub(self.vertex_count())
    }

    /// Shortest-path cycles through every vertex, one BFS tree per root.
    ///
    /// Odd cycles close over an edge between two vertices at equal distance
    /// from the root, even cycles over a vertex with two predecessors. Only
    /// cycles whose two tree paths meet at the root alone are kept.
    fn candidate_cycles(&self) -> Vec<(usize, EdgeSet)> {
        let mut seen: HashSet<EdgeSet> = HashSet::new();
        let mut candidates = Vec::new();

        for root in 0..self.vertex_count() {
            let tree = ShortestPathTree::grow(self, root);

            for (y, neighbors) in self.adjacency.iter().enumerate() {
                let Some(dy) = tree.dist[y] else {
                    continue;
                };
                for &(z, edge) in neighbors {
                    if y < z && tree.dist[z] == Some(dy) {
                        if let Some(mut cycle) = tree.join(self, y, z) {
                            set_bit(&mut cycle, edge);
                            if seen.insert(cycle.clone()) {
                                candidates.push((2 * dy + 1, cycle));
                            }
                        }
                    }
                }
            }

            for (p, neighbors) in self.adjacency.iter().enumerate() {
                let Some(dp) = tree.dist[p] else {
                    continue;
                };
                if dp < 2 {
                    continue;
                }
                let below: Vec<(usize, usize)> = neighbors
                    .iter()
                    .copied()
                    .filter(|&(n, _)| tree.dist[n] == Some(dp - 1))
                    .collect();
                for (i, &(y, edge_y)) in below.iter().enumerate() {
                    for &(z, edge_z) in &below[i + 1..] {
                        if let Some(mut cycle) = tree.join(self, y, z) {
                            set_bit(&mut cycle, edge_y);
                            set_bit(&mut cycle, edge_z);
                            if seen.insert(cycle.clone()) {
                                candidates.push((2 * dp, cycle));
                            }
                        }
                    }
                }
            }
        }

        candidates.sort();
        candidates
    }
}

struct ShortestPathTree {
    root: usize,
    dist: Vec<Option<usize>>,
    /// `(parent vertex, edge to parent)`; `None` for the root and unreached vertices.
    parent: Vec<Option<(usize, usize)>>,
}

impl ShortestPathTree {
    fn grow(graph: &RingGraph, root: usize) -> Self {
        let n = graph.vertex_count();
        let mut dist = vec![None; n];
        let mut parent = vec![None; n];
        dist[root] = Some(0);

        let mut frontier = std::collections::VecDeque::from([root]);
        while let Some(v) = frontier.pop_front() {
            let next_dist = dist[v].map(|d| d + 1);
            for &(w, edge) in &graph.adjacency[v] {
                if dist[w].is_none() {
                    dist[w] = next_dist;
                    parent[w] = Some((v, edge));
                    frontier.push_back(w);
                }
            }
        }

        Self { root, dist, parent }
    }

    /// Vertices (root excluded) and edges on the tree path from `v` up to the root.
    fn path(&self, mut v: usize) -> (Vec<usize>, Vec<usize>) {
        let mut vertices = Vec::new();
        let mut edges = Vec::new();
        while v != self.root {
            let Some((up, edge)) = self.parent[v] else {
                break;
            };
            vertices.push(v);
            edges.push(edge);
            v = up;
        }
        (vertices, edges)
    }

    /// Edge set of the two tree paths from `y` and `z`, or `None` when they
    /// share any vertex besides the root.
    fn join(&self, graph: &RingGraph, y: usize, z: usize) -> Option<EdgeSet> {
        let (vertices_y, edges_y) = self.path(y);
        let (vertices_z, edges_z) = self.path(z);
        if vertices_y.iter().any(|v| vertices_z.contains(v)) {
            return None;
        }
        let mut set = graph.empty_set();
        for edge in edges_y.into_iter().chain(edges_z) {
            set_bit(&mut set, edge);
        }
        Some(set)
    }
}

fn set_bit(set: &mut EdgeSet, bit: usize) {
    set[bit / 64] |= 1 << (bit % 64);
}

fn lowest_bit(set: &EdgeSet) -> Option<usize> {
    set.iter()
        .enumerate()
        .find(|(_, word)| **word != 0)
        .map(|(i, word)| i * 64 + word.trailing_zeros() as usize)
}

fn has_bit(set: &EdgeSet, bit: usize) -> bool {
    set[bit / 64] & (1 << (bit % 64)) != 0
}

/// Reduces `set` against a GF(2) basis kept in insertion order.
fn reduce(basis: &[(usize, EdgeSet)], mut set: EdgeSet) -> EdgeSet {
    for (pivot, row) in basis {
        if has_bit(&set, *pivot) {
            for (word, other) in set.iter_mut().zip(row) {
                *word ^= other;
            }
        }
    }
    set
}

/// The relevant cycles of a molecule: every cycle that is not a sum of
/// strictly smaller cycles.
///
/// This is the union of all minimum cycle bases. It matches the usual
/// symmetrized ring set: one ring per face for cage compounds (three for
/// bicyclo\[2.2.2\]octane, six for cubane) and the smallest set of smallest
/// rings for fused and spiro systems.
pub fn relevant_rings(molecule: &Molecule) -> Vec<Ring> {
    let graph = RingGraph::new(molecule);
    let rank = graph.cycle_rank();
    if rank == 0 {
        return Vec::new();
    }

    let candidates = graph.candidate_cycles();
    let mut basis: Vec<(usize, EdgeSet)> = Vec::new();
    let mut relevant = Vec::new();

    let mut start = 0;
    while start < candidates.len() && basis.len() < rank {
        let size = candidates[start].0;
        let end = candidates[start..]
            .iter()
            .position(|(s, _)| *s != size)
            .map_or(candidates.len(), |offset| start + offset);
        let smaller = basis.len();

        for (_, cycle) in &candidates[start..end] {
            if lowest_bit(&reduce(&basis[..smaller], cycle.clone())).is_some() {
                relevant.push(cycle);
            }
        }
        for (_, cycle) in &candidates[start..end] {
            let reduced = reduce(&basis, cycle.clone());
            if let Some(pivot) = lowest_bit(&reduced) {
                basis.push((pivot, reduced));
            }
        }
        start = end;
    }

    relevant
        .into_iter()
        .map(|cycle| {
            let bonds = (0..graph.edge_count())
                .filter(|&edge| has_bit(cycle, edge))
                .map(|edge| graph.bond_of_edge[edge])
                .collect();
            Ring { bonds }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::parse_smiles;

    fn ring_sizes(smiles: &str) -> Vec<usize> {
        let mut sizes: Vec<usize> = relevant_rings(&parse_smiles(smiles).unwrap())
            .iter()
            .map(Ring::size)
            .collect();
        sizes.sort();
        sizes
    }

    #[test]
    fn acyclic_molecules_have_no_rings() {
        assert!(ring_sizes("CCCCO").is_empty());
        assert!(ring_sizes("[Na+].[Cl-]").is_empty());
    }

    #[test]
    fn simple_and_fused_rings_match_the_smallest_set() {
        assert_eq!(ring_sizes("C1CC1"), vec![3]);
        assert_eq!(ring_sizes("c1ccccc1"), vec![6]);
        assert_eq!(ring_sizes("c1ccc2ccccc2c1"), vec![6, 6]);
        assert_eq!(ring_sizes("c1ccc2cc3ccccc3cc2c1"), vec![6, 6, 6]);
        assert_eq!(ring_sizes("C1CCC2(CC1)CCCC2"), vec![5, 6]);
    }

    #[test]
    fn envelope_ring_of_bridged_system_is_not_relevant() {
        // norbornane: two five-membered rings, the six-ring is their sum
        assert_eq!(ring_sizes("C1CC2CCC1C2"), vec![5, 5]);
    }

    #[test]
    fn cage_compounds_count_every_face() {
        assert_eq!(ring_sizes("C1CC2CCC1CC2"), vec![6, 6, 6]);
        assert_eq!(ring_sizes("C1C2CC3CC1CC(C2)C3"), vec![6, 6, 6, 6]);
        assert_eq!(ring_sizes("C12C3C4C1C5C2C3C45"), vec![4; 6]);
    }

    #[test]
    fn rings_reference_ring_bonds_only() {
        let molecule = parse_smiles("CCc1ccccc1").unwrap();
        let rings = relevant_rings(&molecule);
        assert_eq!(rings.len(), 1);
        let flags = molecule.ring_bond_flags();
        assert!(rings[0].bonds.iter().all(|&bond| flags[bond]));
        assert!(!rings[0].bonds.contains(&0));
    }
}
