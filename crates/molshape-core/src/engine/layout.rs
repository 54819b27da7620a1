use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use nalgebra::{Point2, Vector2};
use slotmap::SecondaryMap;

/// Target distance between bonded atoms, in layout units.
pub const BOND_LENGTH: f64 = 1.0;

const ITERATIONS: usize = 300;
const FRAGMENT_GAP: f64 = 1.5 * BOND_LENGTH;
const MIN_DISTANCE: f64 = 1e-3;
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBond {
    pub from: usize,
    pub to: usize,
    pub order: BondOrder,
}

/// 2D coordinates for the atoms of a hydrogen-suppressed molecule.
///
/// `atoms[i]` sits at `positions[i]`; bonds refer to those indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub atoms: Vec<AtomId>,
    pub positions: Vec<Point2<f64>>,
    pub bonds: Vec<LayoutBond>,
}

impl Layout {
    /// Computes a deterministic force-directed layout.
    ///
    /// Each fragment is relaxed on its own with a Fruchterman-Reingold
    /// scheme, rescaled to a mean bond length of [`BOND_LENGTH`], and the
    /// fragments are then placed left to right.
    pub fn compute(molecule: &Molecule) -> Self {
        let mut atoms = Vec::new();
        let mut index_of: SecondaryMap<AtomId, usize> = SecondaryMap::new();
        let mut fragments = Vec::new();

        for component in molecule.components() {
            let start = atoms.len();
            for id in component {
                if molecule.is_suppressible_hydrogen(id) {
                    continue;
                }
                index_of.insert(id, atoms.len());
                atoms.push(id);
            }
            if atoms.len() > start {
                fragments.push(start..atoms.len());
            }
        }

        let bonds: Vec<LayoutBond> = molecule
            .bonds()
            .iter()
            .filter_map(|bond| {
                Some(LayoutBond {
                    from: *index_of.get(bond.atom1_id)?,
                    to: *index_of.get(bond.atom2_id)?,
                    order: bond.order,
                })
            })
            .collect();

        let mut positions = vec![Point2::origin(); atoms.len()];
        let mut cursor = 0.0;
        for range in fragments {
            let fragment_bonds: Vec<(usize, usize)> = bonds
                .iter()
                .filter(|bond| range.contains(&bond.from))
                .map(|bond| (bond.from - range.start, bond.to - range.start))
                .collect();
            let mut local = relax(range.len(), &fragment_bonds);

            let min_x = local.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
            let max_x = local.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
            let shift = Vector2::new(cursor - min_x, 0.0);
            for point in &mut local {
                *point += shift;
            }
            cursor += max_x - min_x + FRAGMENT_GAP;
            positions[range].copy_from_slice(&local);
        }

        Self {
            atoms,
            positions,
            bonds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Lower-left and upper-right corners of the bounding box.
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

/// Relaxes one connected fragment and returns it centered on the origin.
fn relax(count: usize, bonds: &[(usize, usize)]) -> Vec<Point2<f64>> {
    let mut positions: Vec<Point2<f64>> = (0..count)
        .map(|i| {
            let angle = i as f64 * GOLDEN_ANGLE;
            let radius = 0.6 * BOND_LENGTH * (i as f64).sqrt();
            Point2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();
    if count < 2 {
        return positions;
    }

    let k = BOND_LENGTH;
    let start_temperature = 0.5 * BOND_LENGTH * (count as f64).sqrt();
    let mut displacement = vec![Vector2::zeros(); count];

    for step in 0..ITERATIONS {
        displacement.iter_mut().for_each(|d| *d = Vector2::zeros());

        for i in 0..count {
            for j in (i + 1)..count {
                let (direction, distance) = separation(&positions, i, j);
                let push = direction * (k * k / distance);
                displacement[i] += push;
                displacement[j] -= push;
            }
        }
        for &(i, j) in bonds {
            let (direction, distance) = separation(&positions, i, j);
            let pull = direction * (distance * distance / k);
            displacement[i] -= pull;
            displacement[j] += pull;
        }

        let temperature = start_temperature * (1.0 - step as f64 / ITERATIONS as f64) + 1e-3;
        for (point, delta) in positions.iter_mut().zip(&displacement) {
            let length = delta.norm();
            if length > 0.0 {
                *point += delta * (length.min(temperature) / length);
            }
        }
    }

    normalize(&mut positions, bonds);
    positions
}

/// Unit vector from `j` to `i` and their distance. Coincident atoms get a
/// fixed, index-dependent direction so that they separate.
fn separation(positions: &[Point2<f64>], i: usize, j: usize) -> (Vector2<f64>, f64) {
    let delta = positions[i] - positions[j];
    let distance = delta.norm();
    if distance < MIN_DISTANCE {
        let angle = (i * 31 + j * 17) as f64;
        return (Vector2::new(angle.cos(), angle.sin()), MIN_DISTANCE);
    }
    (delta / distance, distance)
}

fn normalize(positions: &mut [Point2<f64>], bonds: &[(usize, usize)]) {
    let count = positions.len() as f64;
    let centroid = positions.iter().map(|p| p.coords).sum::<Vector2<f64>>() / count;

    let mean_bond = if bonds.is_empty() {
        BOND_LENGTH
    } else {
        bonds
            .iter()
            .map(|&(i, j)| (positions[i] - positions[j]).norm())
            .sum::<f64>()
            / bonds.len() as f64
    };
    let scale = if mean_bond > MIN_DISTANCE {
        BOND_LENGTH / mean_bond
    } else {
        1.0
    };

    for point in positions.iter_mut() {
        *point = Point2::from((point.coords - centroid) * scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::parse_smiles;

    fn layout(smiles: &str) -> Layout {
        Layout::compute(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn single_atom_sits_at_origin() {
        let layout = layout("C");
        assert_eq!(layout.positions, vec![Point2::origin()]);
        assert!(layout.bonds.is_empty());
    }

    #[test]
    fn mean_bond_length_is_normalized() {
        let layout = layout("c1ccccc1CCO");
        let mean = layout
            .bonds
            .iter()
            .map(|b| (layout.positions[b.from] - layout.positions[b.to]).norm())
            .sum::<f64>()
            / layout.bonds.len() as f64;
        assert!((mean - BOND_LENGTH).abs() < 1e-9);
        assert!(layout.positions.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn atoms_do_not_collapse_onto_each_other() {
        let layout = layout("C1CCCCC1");
        for i in 0..layout.positions.len() {
            for j in (i + 1)..layout.positions.len() {
                let distance = (layout.positions[i] - layout.positions[j]).norm();
                assert!(distance > 0.3 * BOND_LENGTH, "atoms {i} and {j} overlap");
            }
        }
    }

    #[test]
    fn layout_is_deterministic() {
        assert_eq!(layout("CC(C)Cc1ccccc1"), layout("CC(C)Cc1ccccc1"));
    }

    #[test]
    fn fragments_are_placed_side_by_side() {
        let layout = layout("CCO.c1ccccc1");
        let first_max = layout.positions[..3].iter().map(|p| p.x).fold(f64::MIN, f64::max);
        let second_min = layout.positions[3..].iter().map(|p| p.x).fold(f64::MAX, f64::min);
        assert!(second_min - first_max >= FRAGMENT_GAP - 1e-9);
    }

    #[test]
    fn ordinary_hydrogens_are_suppressed() {
        let layout = layout("[H]C([H])([H])O");
        assert_eq!(layout.atoms.len(), 2);
        assert_eq!(layout.bonds.len(), 1);
    }

    #[test]
    fn bounds_cover_all_positions() {
        let layout = layout("CCCC");
        let (lo, hi) = layout.bounds().unwrap();
        assert!(
            layout
                .positions
                .iter()
                .all(|p| p.x >= lo.x && p.x <= hi.x && p.y >= lo.y && p.y <= hi.y)
        );
        assert!(Layout::compute(&Molecule::new()).bounds().is_none());
    }
}
