use super::traits::StructureParser;
use crate::core::models::atom::Atom;
use crate::core::models::element::{Element, ORGANIC_SUBSET, WILDCARD};
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::{Molecule, MoleculeError};
use crate::core::models::topology::BondOrder;
use slotmap::SecondaryMap;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmilesError {
    #[error("SMILES string is empty")]
    Empty,
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("Unknown element '{symbol}' at position {position}")]
    UnknownElement { symbol: String, position: usize },
    #[error("Invalid bracket atom at position {position}: {reason}")]
    InvalidBracketAtom { position: usize, reason: String },
    #[error("Bracket atom starting at position {position} is never closed")]
    UnterminatedBracket { position: usize },
    #[error("Unmatched ')' at position {position}")]
    UnmatchedCloseParen { position: usize },
    #[error("Branch opened at position {position} is never closed")]
    UnclosedBranch { position: usize },
    #[error("Empty branch at position {position}")]
    EmptyBranch { position: usize },
    #[error("Bond symbol at position {position} is not between two atoms")]
    DanglingBond { position: usize },
    #[error("Ring closure {label} opened at position {position} is never closed")]
    UnclosedRing { label: u16, position: usize },
    #[error("Ring closure {label} at position {position} has conflicting bond symbols")]
    RingBondConflict { label: u16, position: usize },
    #[error("Invalid bond at position {position}: {source}")]
    Bond {
        position: usize,
        #[source]
        source: MoleculeError,
    },
    #[error("Aromatic atom '{symbol}' at position {position} is not in a ring")]
    AromaticOutsideRing { symbol: String, position: usize },
    #[error(
        "Atom '{symbol}' at position {position} has valence {valence}, more than the allowed {max}"
    )]
    ValenceExceeded {
        symbol: String,
        position: usize,
        valence: i16,
        max: i16,
    },
}

/// Reads SMILES line notation into a [`Molecule`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SmilesParser;

impl StructureParser for SmilesParser {
    type Error = SmilesError;

    fn parse(&self, identifier: &str) -> Result<Molecule, Self::Error> {
        parse_smiles(identifier)
    }
}

/// Parses a SMILES string.
///
/// Parsing stops at the first whitespace character, which by convention separates
/// the structure from a trailing title. The resulting graph is checked for
/// aromatic atoms outside rings and for aliphatic atoms exceeding their
/// default valence.
///
/// # Errors
///
/// Returns a [`SmilesError`] describing the first syntax or chemistry problem,
/// with the byte position it was found at.
pub fn parse_smiles(text: &str) -> Result<Molecule, SmilesError> {
    let (molecule, positions) = Reader::new(text).read()?;
    validate(&molecule, &positions)?;
    Ok(molecule)
}

#[derive(Debug, Clone, Copy)]
struct RingOpening {
    atom: AtomId,
    bond: Option<BondOrder>,
    position: usize,
}

#[derive(Debug, Clone, Copy)]
struct BranchOpening {
    atom: AtomId,
    position: usize,
    atoms_before: usize,
}

struct Reader<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    molecule: Molecule,
    positions: SecondaryMap<AtomId, usize>,
    previous: Option<AtomId>,
    pending_bond: Option<(BondOrder, usize)>,
    branches: Vec<BranchOpening>,
    rings: BTreeMap<u16, RingOpening>,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            molecule: Molecule::new(),
            positions: SecondaryMap::new(),
            previous: None,
            pending_bond: None,
            branches: Vec::new(),
            rings: BTreeMap::new(),
        }
    }

    fn read(mut self) -> Result<(Molecule, SecondaryMap<AtomId, usize>), SmilesError> {
        while let Some(byte) = self.peek() {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' => break,
                b'(' => self.open_branch()?,
                b')' => self.close_branch()?,
                b'.' => self.disconnect()?,
                b'-' | b'=' | b'#' | b'$' | b':' | b'/' | b'\\' => self.read_bond()?,
                b'0'..=b'9' | b'%' => self.read_ring_closure()?,
                b'[' => self.read_bracket_atom()?,
                _ => self.read_organic_atom()?,
            }
        }
        self.finish()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn unexpected(&self, position: usize) -> SmilesError {
        let character = self.text[position..].chars().next().unwrap_or('\0');
        SmilesError::UnexpectedCharacter {
            character,
            position,
        }
    }

    fn open_branch(&mut self) -> Result<(), SmilesError> {
        let position = self.pos;
        let Some(atom) = self.previous else {
            return Err(self.unexpected(position));
        };
        if let Some((_, bond_position)) = self.pending_bond {
            return Err(SmilesError::DanglingBond {
                position: bond_position,
            });
        }
        self.branches.push(BranchOpening {
            atom,
            position,
            atoms_before: self.molecule.total_atoms(),
        });
        self.pos += 1;
        Ok(())
    }

    fn close_branch(&mut self) -> Result<(), SmilesError> {
        let position = self.pos;
        let Some(branch) = self.branches.pop() else {
            return Err(SmilesError::UnmatchedCloseParen { position });
        };
        if let Some((_, bond_position)) = self.pending_bond {
            return Err(SmilesError::DanglingBond {
                position: bond_position,
            });
        }
        if self.molecule.total_atoms() == branch.atoms_before {
            return Err(SmilesError::EmptyBranch {
                position: branch.position,
            });
        }
        self.previous = Some(branch.atom);
        self.pos += 1;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), SmilesError> {
        let position = self.pos;
        if self.previous.is_none() {
            return Err(self.unexpected(position));
        }
        if let Some((_, bond_position)) = self.pending_bond {
            return Err(SmilesError::DanglingBond {
                position: bond_position,
            });
        }
        self.previous = None;
        self.pos += 1;
        Ok(())
    }

    fn read_bond(&mut self) -> Result<(), SmilesError> {
        let position = self.pos;
        if self.previous.is_none() {
            return Err(SmilesError::DanglingBond { position });
        }
        if self.pending_bond.is_some() {
            return Err(self.unexpected(position));
        }
        let order = BondOrder::from_smiles_symbol(self.bytes[position] as char)
            .ok_or_else(|| self.unexpected(position))?;
        self.pending_bond = Some((order, position));
        self.pos += 1;
        Ok(())
    }

    fn read_ring_closure(&mut self) -> Result<(), SmilesError> {
        let position = self.pos;
        let Some(atom) = self.previous else {
            return Err(self.unexpected(position));
        };

        let label = if self.bytes[position] == b'%' {
            match (self.peek_at(1), self.peek_at(2)) {
                (Some(tens @ b'0'..=b'9'), Some(units @ b'0'..=b'9')) => {
                    self.pos += 3;
                    (tens - b'0') as u16 * 10 + (units - b'0') as u16
                }
                _ => return Err(self.unexpected(position)),
            }
        } else {
            self.pos += 1;
            (self.bytes[position] - b'0') as u16
        };

        let bond = self.pending_bond.take().map(|(order, _)| order);

        match self.rings.remove(&label) {
            Some(opening) => {
                let order = match (opening.bond, bond) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(SmilesError::RingBondConflict { label, position });
                    }
                    (Some(order), _) | (None, Some(order)) => order,
                    (None, None) => self.implicit_bond(opening.atom, atom),
                };
                self.molecule
                    .add_bond(opening.atom, atom, order)
                    .map_err(|source| SmilesError::Bond { position, source })?;
            }
            None => {
                self.rings.insert(
                    label,
                    RingOpening {
                        atom,
                        bond,
                        position,
                    },
                );
            }
        }
        Ok(())
    }

    fn read_organic_atom(&mut self) -> Result<(), SmilesError> {
        let position = self.pos;
        let first = self.bytes[position];

        let (atom, width) = match first {
            b'*' => (Atom::new(&WILDCARD, false), 1),
            b'b' | b'c' | b'n' | b'o' | b'p' | b's' => {
                let symbol = (first as char).to_string();
                let element = Element::from_aromatic_symbol(&symbol).ok_or_else(|| {
                    SmilesError::UnknownElement {
                        symbol: symbol.clone(),
                        position,
                    }
                })?;
                (Atom::new(element, true), 1)
            }
            b'A'..=b'Z' => {
                let two_letter = match (first, self.peek_at(1)) {
                    (b'C', Some(b'l')) => Some("Cl"),
                    (b'B', Some(b'r')) => Some("Br"),
                    _ => None,
                };
                let (symbol, width) = match two_letter {
                    Some(symbol) => (symbol.to_string(), 2),
                    None => ((first as char).to_string(), 1),
                };
                if !ORGANIC_SUBSET.contains(&symbol.as_str()) {
                    return Err(SmilesError::UnknownElement { symbol, position });
                }
                let element = Element::from_symbol(&symbol)
                    .ok_or(SmilesError::UnknownElement { symbol, position })?;
                (Atom::new(element, false), width)
            }
            b'a'..=b'z' => {
                return Err(SmilesError::UnknownElement {
                    symbol: (first as char).to_string(),
                    position,
                });
            }
            _ => return Err(self.unexpected(position)),
        };

        self.pos += width;
        self.attach(atom, position)
    }

    fn read_bracket_atom(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let close = self.text[start..]
            .find(']')
            .map(|offset| start + offset)
            .ok_or(SmilesError::UnterminatedBracket { position: start })?;
        let body = &self.text[start + 1..close];
        let atom = parse_bracket_body(body, start)?;
        self.pos = close + 1;
        self.attach(atom, start)
    }

    fn attach(&mut self, atom: Atom, position: usize) -> Result<(), SmilesError> {
        let id = self.molecule.add_atom(atom);
        self.positions.insert(id, position);

        if let Some(previous) = self.previous {
            let (order, bond_position) = match self.pending_bond.take() {
                Some((order, bond_position)) => (order, bond_position),
                None => (self.implicit_bond(previous, id), position),
            };
            self.molecule
                .add_bond(previous, id, order)
                .map_err(|source| SmilesError::Bond {
                    position: bond_position,
                    source,
                })?;
        }

        self.previous = Some(id);
        Ok(())
    }

    fn implicit_bond(&self, a: AtomId, b: AtomId) -> BondOrder {
        let aromatic = |id| self.molecule.atom(id).is_some_and(|atom| atom.aromatic);
        if aromatic(a) && aromatic(b) {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn finish(self) -> Result<(Molecule, SecondaryMap<AtomId, usize>), SmilesError> {
        if let Some((_, position)) = self.pending_bond {
            return Err(SmilesError::DanglingBond { position });
        }
        if let Some(branch) = self.branches.first() {
            return Err(SmilesError::UnclosedBranch {
                position: branch.position,
            });
        }
        if let Some((&label, opening)) = self.rings.iter().min_by_key(|(_, o)| o.position) {
            return Err(SmilesError::UnclosedRing {
                label,
                position: opening.position,
            });
        }
        if self.molecule.is_empty() {
            return Err(SmilesError::Empty);
        }
        Ok((self.molecule, self.positions))
    }
}

/// Parses the inside of a bracket atom: `isotope? symbol chiral? hcount? charge? class?`.
fn parse_bracket_body(body: &str, start: usize) -> Result<Atom, SmilesError> {
    let bytes = body.as_bytes();
    let mut i = 0usize;
    let invalid = |reason: &str| SmilesError::InvalidBracketAtom {
        position: start,
        reason: reason.to_string(),
    };

    let digits_end = |from: usize| {
        let mut end = from;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        end
    };

    let isotope_end = digits_end(i);
    let isotope = if isotope_end > i {
        let value: u16 = body[i..isotope_end]
            .parse()
            .map_err(|_| invalid("isotope out of range"))?;
        i = isotope_end;
        Some(value)
    } else {
        None
    };

    let (element, aromatic, width) = read_bracket_symbol(&body[i..])
        .ok_or_else(|| invalid("missing or unknown element symbol"))?;
    i += width;

    if bytes.get(i) == Some(&b'@') {
        i += 1;
        if bytes.get(i) == Some(&b'@') {
            i += 1;
        } else if let Some(class) = body.get(i..i + 2) {
            if ["TH", "AL", "SP", "TB", "OH"].contains(&class) {
                i = digits_end(i + 2);
            }
        }
    }

    let explicit_hydrogens = if bytes.get(i) == Some(&b'H') {
        i += 1;
        let end = digits_end(i);
        let count: u8 = if end > i {
            body[i..end]
                .parse()
                .map_err(|_| invalid("hydrogen count out of range"))?
        } else {
            1
        };
        i = end;
        count
    } else {
        0
    };

    let mut charge: i8 = 0;
    if let Some(&sign @ (b'+' | b'-')) = bytes.get(i) {
        let unit: i8 = if sign == b'+' { 1 } else { -1 };
        i += 1;
        let end = digits_end(i);
        if end > i {
            let magnitude: i8 = body[i..end]
                .parse()
                .map_err(|_| invalid("charge out of range"))?;
            charge = unit * magnitude;
            i = end;
        } else {
            charge = unit;
            while bytes.get(i) == Some(&sign) {
                charge = charge
                    .checked_add(unit)
                    .ok_or_else(|| invalid("charge out of range"))?;
                i += 1;
            }
        }
    }

    let atom_class = if bytes.get(i) == Some(&b':') {
        let end = digits_end(i + 1);
        if end == i + 1 {
            return Err(invalid("atom class requires a number"));
        }
        let class: u32 = body[i + 1..end]
            .parse()
            .map_err(|_| invalid("atom class out of range"))?;
        i = end;
        Some(class)
    } else {
        None
    };

    if i != bytes.len() {
        return Err(invalid(&format!("unexpected '{}'", &body[i..])));
    }

    Ok(Atom {
        element,
        aromatic,
        charge,
        isotope,
        explicit_hydrogens: Some(explicit_hydrogens),
        atom_class,
    })
}

/// Reads the element symbol at the start of a bracket body, preferring
/// two-letter symbols. Returns the element, its aromaticity and the number of
/// bytes consumed.
fn read_bracket_symbol(rest: &str) -> Option<(&'static Element, bool, usize)> {
    let bytes = rest.as_bytes();
    let first = *bytes.first()?;

    match first {
        b'*' => Some((&WILDCARD, false, 1)),
        b'A'..=b'Z' => {
            if let Some(two) = rest.get(..2) {
                if bytes[1].is_ascii_lowercase() {
                    if let Some(element) = Element::from_symbol(two) {
                        return Some((element, false, 2));
                    }
                }
            }
            Element::from_symbol(rest.get(..1)?).map(|element| (element, false, 1))
        }
        b'a'..=b'z' => {
            if let Some(element) = rest.get(..2).and_then(Element::from_aromatic_symbol) {
                return Some((element, true, 2));
            }
            Element::from_aromatic_symbol(rest.get(..1)?).map(|element| (element, true, 1))
        }
        _ => None,
    }
}

fn validate(
    molecule: &Molecule,
    positions: &SecondaryMap<AtomId, usize>,
) -> Result<(), SmilesError> {
    let ring_atoms = molecule.ring_atoms();

    for (id, atom) in molecule.atoms_iter() {
        let position = positions.get(id).copied().unwrap_or(0);

        if atom.aromatic {
            if !ring_atoms.get(id).copied().unwrap_or(false) {
                return Err(SmilesError::AromaticOutsideRing {
                    symbol: atom.symbol().to_lowercase(),
                    position,
                });
            }
            continue;
        }

        if let Some(max) = atom.element.max_valence(atom.charge) {
            let valence = molecule.bond_order_sum(id) as i16
                + atom.explicit_hydrogens.unwrap_or(0) as i16;
            if valence > max {
                return Err(SmilesError::ValenceExceeded {
                    symbol: atom.symbol().to_string(),
                    position,
                    valence,
                    max,
                });
            }
        }
    }
    Ok(())
}
