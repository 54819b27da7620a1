use phf::phf_map;
use std::fmt;

/// Static per-element data used by the SMILES reader and the descriptor code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    /// Canonical symbol with the usual capitalization (e.g. "Cl").
    pub symbol: &'static str,
    /// Atomic number; `0` is reserved for the `*` wildcard atom.
    pub atomic_number: u8,
    /// Allowed neutral valences in ascending order. Empty when the element
    /// has no well-defined default valence (metals, most heavy elements).
    pub default_valences: &'static [u8],
}

/// The `*` wildcard atom. It accepts any valence.
pub const WILDCARD: Element = Element {
    symbol: "*",
    atomic_number: 0,
    default_valences: &[],
};

static ELEMENTS: phf::Map<&'static str, Element> = phf_map! {
    "H" => Element { symbol: "H", atomic_number: 1, default_valences: &[1] },
    "He" => Element { symbol: "He", atomic_number: 2, default_valences: &[0] },
    "Li" => Element { symbol: "Li", atomic_number: 3, default_valences: &[1] },
    "Be" => Element { symbol: "Be", atomic_number: 4, default_valences: &[2] },
    "B" => Element { symbol: "B", atomic_number: 5, default_valences: &[3] },
    "C" => Element { symbol: "C", atomic_number: 6, default_valences: &[4] },
    "N" => Element { symbol: "N", atomic_number: 7, default_valences: &[3] },
    "O" => Element { symbol: "O", atomic_number: 8, default_valences: &[2] },
    "F" => Element { symbol: "F", atomic_number: 9, default_valences: &[1] },
    "Ne" => Element { symbol: "Ne", atomic_number: 10, default_valences: &[0] },
    "Na" => Element { symbol: "Na", atomic_number: 11, default_valences: &[1] },
    "Mg" => Element { symbol: "Mg", atomic_number: 12, default_valences: &[2] },
    "Al" => Element { symbol: "Al", atomic_number: 13, default_valences: &[3] },
    "Si" => Element { symbol: "Si", atomic_number: 14, default_valences: &[4] },
    "P" => Element { symbol: "P", atomic_number: 15, default_valences: &[3, 5] },
    "S" => Element { symbol: "S", atomic_number: 16, default_valences: &[2, 4, 6] },
    "Cl" => Element { symbol: "Cl", atomic_number: 17, default_valences: &[1] },
    "Ar" => Element { symbol: "Ar", atomic_number: 18, default_valences: &[0] },
    "K" => Element { symbol: "K", atomic_number: 19, default_valences: &[1] },
    "Ca" => Element { symbol: "Ca", atomic_number: 20, default_valences: &[2] },
    "Sc" => Element { symbol: "Sc", atomic_number: 21, default_valences: &[] },
    "Ti" => Element { symbol: "Ti", atomic_number: 22, default_valences: &[] },
    "V" => Element { symbol: "V", atomic_number: 23, default_valences: &[] },
    "Cr" => Element { symbol: "Cr", atomic_number: 24, default_valences: &[] },
    "Mn" => Element { symbol: "Mn", atomic_number: 25, default_valences: &[] },
    "Fe" => Element { symbol: "Fe", atomic_number: 26, default_valences: &[] },
    "Co" => Element { symbol: "Co", atomic_number: 27, default_valences: &[] },
    "Ni" => Element { symbol: "Ni", atomic_number: 28, default_valences: &[] },
    "Cu" => Element { symbol: "Cu", atomic_number: 29, default_valences: &[] },
    "Zn" => Element { symbol: "Zn", atomic_number: 30, default_valences: &[] },
    "Ga" => Element { symbol: "Ga", atomic_number: 31, default_valences: &[] },
    "Ge" => Element { symbol: "Ge", atomic_number: 32, default_valences: &[4] },
    "As" => Element { symbol: "As", atomic_number: 33, default_valences: &[3, 5] },
    "Se" => Element { symbol: "Se", atomic_number: 34, default_valences: &[2, 4, 6] },
    "Br" => Element { symbol: "Br", atomic_number: 35, default_valences: &[1] },
    "Kr" => Element { symbol: "Kr", atomic_number: 36, default_valences: &[0] },
    "Rb" => Element { symbol: "Rb", atomic_number: 37, default_valences: &[1] },
    "Sr" => Element { symbol: "Sr", atomic_number: 38, default_valences: &[2] },
    "Y" => Element { symbol: "Y", atomic_number: 39, default_valences: &[] },
    "Zr" => Element { symbol: "Zr", atomic_number: 40, default_valences: &[] },
    "Nb" => Element { symbol: "Nb", atomic_number: 41, default_valences: &[] },
    "Mo" => Element { symbol: "Mo", atomic_number: 42, default_valences: &[] },
    "Tc" => Element { symbol: "Tc", atomic_number: 43, default_valences: &[] },
    "Ru" => Element { symbol: "Ru", atomic_number: 44, default_valences: &[] },
    "Rh" => Element { symbol: "Rh", atomic_number: 45, default_valences: &[] },
    "Pd" => Element { symbol: "Pd", atomic_number: 46, default_valences: &[] },
    "Ag" => Element { symbol: "Ag", atomic_number: 47, default_valences: &[] },
    "Cd" => Element { symbol: "Cd", atomic_number: 48, default_valences: &[] },
    "In" => Element { symbol: "In", atomic_number: 49, default_valences: &[] },
    "Sn" => Element { symbol: "Sn", atomic_number: 50, default_valences: &[2, 4] },
    "Sb" => Element { symbol: "Sb", atomic_number: 51, default_valences: &[3, 5] },
    "Te" => Element { symbol: "Te", atomic_number: 52, default_valences: &[2, 4, 6] },
    "I" => Element { symbol: "I", atomic_number: 53, default_valences: &[1, 3, 5] },
    "Xe" => Element { symbol: "Xe", atomic_number: 54, default_valences: &[0] },
    "Cs" => Element { symbol: "Cs", atomic_number: 55, default_valences: &[1] },
    "Ba" => Element { symbol: "Ba", atomic_number: 56, default_valences: &[2] },
    "La" => Element { symbol: "La", atomic_number: 57, default_valences: &[] },
    "Ce" => Element { symbol: "Ce", atomic_number: 58, default_valences: &[] },
    "Pr" => Element { symbol: "Pr", atomic_number: 59, default_valences: &[] },
    "Nd" => Element { symbol: "Nd", atomic_number: 60, default_valences: &[] },
    "Pm" => Element { symbol: "Pm", atomic_number: 61, default_valences: &[] },
    "Sm" => Element { symbol: "Sm", atomic_number: 62, default_valences: &[] },
    "Eu" => Element { symbol: "Eu", atomic_number: 63, default_valences: &[] },
    "Gd" => Element { symbol: "Gd", atomic_number: 64, default_valences: &[] },
    "Tb" => Element { symbol: "Tb", atomic_number: 65, default_valences: &[] },
    "Dy" => Element { symbol: "Dy", atomic_number: 66, default_valences: &[] },
    "Ho" => Element { symbol: "Ho", atomic_number: 67, default_valences: &[] },
    "Er" => Element { symbol: "Er", atomic_number: 68, default_valences: &[] },
    "Tm" => Element { symbol: "Tm", atomic_number: 69, default_valences: &[] },
    "Yb" => Element { symbol: "Yb", atomic_number: 70, default_valences: &[] },
    "Lu" => Element { symbol: "Lu", atomic_number: 71, default_valences: &[] },
    "Hf" => Element { symbol: "Hf", atomic_number: 72, default_valences: &[] },
    "Ta" => Element { symbol: "Ta", atomic_number: 73, default_valences: &[] },
    "W" => Element { symbol: "W", atomic_number: 74, default_valences: &[] },
    "Re" => Element { symbol: "Re", atomic_number: 75, default_valences: &[] },
    "Os" => Element { symbol: "Os", atomic_number: 76, default_valences: &[] },
    "Ir" => Element { symbol: "Ir", atomic_number: 77, default_valences: &[] },
    "Pt" => Element { symbol: "Pt", atomic_number: 78, default_valences: &[] },
    "Au" => Element { symbol: "Au", atomic_number: 79, default_valences: &[] },
    "Hg" => Element { symbol: "Hg", atomic_number: 80, default_valences: &[] },
    "Tl" => Element { symbol: "Tl", atomic_number: 81, default_valences: &[] },
    "Pb" => Element { symbol: "Pb", atomic_number: 82, default_valences: &[] },
    "Bi" => Element { symbol: "Bi", atomic_number: 83, default_valences: &[] },
    "Po" => Element { symbol: "Po", atomic_number: 84, default_valences: &[] },
    "At" => Element { symbol: "At", atomic_number: 85, default_valences: &[] },
    "Rn" => Element { symbol: "Rn", atomic_number: 86, default_valences: &[0] },
    "Fr" => Element { symbol: "Fr", atomic_number: 87, default_valences: &[] },
    "Ra" => Element { symbol: "Ra", atomic_number: 88, default_valences: &[] },
    "Ac" => Element { symbol: "Ac", atomic_number: 89, default_valences: &[] },
    "Th" => Element { symbol: "Th", atomic_number: 90, default_valences: &[] },
    "Pa" => Element { symbol: "Pa", atomic_number: 91, default_valences: &[] },
    "U" => Element { symbol: "U", atomic_number: 92, default_valences: &[] },
    "Np" => Element { symbol: "Np", atomic_number: 93, default_valences: &[] },
    "Pu" => Element { symbol: "Pu", atomic_number: 94, default_valences: &[] },
    "Am" => Element { symbol: "Am", atomic_number: 95, default_valences: &[] },
    "Cm" => Element { symbol: "Cm", atomic_number: 96, default_valences: &[] },
    "Bk" => Element { symbol: "Bk", atomic_number: 97, default_valences: &[] },
    "Cf" => Element { symbol: "Cf", atomic_number: 98, default_valences: &[] },
    "Es" => Element { symbol: "Es", atomic_number: 99, default_valences: &[] },
    "Fm" => Element { symbol: "Fm", atomic_number: 100, default_valences: &[] },
    "Md" => Element { symbol: "Md", atomic_number: 101, default_valences: &[] },
    "No" => Element { symbol: "No", atomic_number: 102, default_valences: &[] },
    "Lr" => Element { symbol: "Lr", atomic_number: 103, default_valences: &[] },
    "Rf" => Element { symbol: "Rf", atomic_number: 104, default_valences: &[] },
    "Db" => Element { symbol: "Db", atomic_number: 105, default_valences: &[] },
    "Sg" => Element { symbol: "Sg", atomic_number: 106, default_valences: &[] },
    "Bh" => Element { symbol: "Bh", atomic_number: 107, default_valences: &[] },
    "Hs" => Element { symbol: "Hs", atomic_number: 108, default_valences: &[] },
    "Mt" => Element { symbol: "Mt", atomic_number: 109, default_valences: &[] },
    "Ds" => Element { symbol: "Ds", atomic_number: 110, default_valences: &[] },
    "Rg" => Element { symbol: "Rg", atomic_number: 111, default_valences: &[] },
    "Cn" => Element { symbol: "Cn", atomic_number: 112, default_valences: &[] },
    "Nh" => Element { symbol: "Nh", atomic_number: 113, default_valences: &[] },
    "Fl" => Element { symbol: "Fl", atomic_number: 114, default_valences: &[] },
    "Mc" => Element { symbol: "Mc", atomic_number: 115, default_valences: &[] },
    "Lv" => Element { symbol: "Lv", atomic_number: 116, default_valences: &[] },
    "Ts" => Element { symbol: "Ts", atomic_number: 117, default_valences: &[] },
    "Og" => Element { symbol: "Og", atomic_number: 118, default_valences: &[] },
};

/// Symbols that may be written without brackets (the SMILES organic subset).
pub const ORGANIC_SUBSET: [&str; 10] = ["B", "C", "N", "O", "P", "S", "F", "Cl", "Br", "I"];

/// Lowercase symbols permitted for aromatic atoms inside brackets.
pub const AROMATIC_BRACKET_SYMBOLS: [&str; 9] = ["b", "c", "n", "o", "p", "s", "se", "as", "te"];

impl Element {
    /// Looks up an element by its canonical symbol. Case-sensitive.
    pub fn from_symbol(symbol: &str) -> Option<&'static Element> {
        if symbol == "*" {
            return Some(&WILDCARD);
        }
        ELEMENTS.get(symbol)
    }

    /// Looks up an element from a lowercase aromatic symbol (`c`, `se`, ...).
    pub fn from_aromatic_symbol(symbol: &str) -> Option<&'static Element> {
        if !AROMATIC_BRACKET_SYMBOLS.contains(&symbol) {
            return None;
        }
        let mut chars = symbol.chars();
        let first = chars.next()?.to_ascii_uppercase();
        let canonical: String = std::iter::once(first).chain(chars).collect();
        ELEMENTS.get(canonical.as_str())
    }

    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == 1
    }

    pub fn is_wildcard(&self) -> bool {
        self.atomic_number == 0
    }

    /// Largest allowed valence for an atom of this element carrying `charge`.
    ///
    /// Returns `None` when the element has no default valence, in which case
    /// no valence check is applied. Group 15-17 elements gain a bond per
    /// positive charge (N+ is tetravalent) and lose one per negative charge;
    /// boron and carbon lose one bond per unit of charge of either sign.
    pub fn max_valence(&self, charge: i8) -> Option<i16> {
        let max = *self.default_valences.last()? as i16;
        let adjusted = match self.atomic_number {
            5 | 6 | 14 | 32 => max - (charge as i16).abs(),
            _ => max + charge as i16,
        };
        Some(adjusted.max(0))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_symbol_finds_common_elements() {
        assert_eq!(Element::from_symbol("C").unwrap().atomic_number, 6);
        assert_eq!(Element::from_symbol("Cl").unwrap().atomic_number, 17);
        assert_eq!(Element::from_symbol("Og").unwrap().atomic_number, 118);
    }

    #[test]
    fn from_symbol_is_case_sensitive() {
        assert!(Element::from_symbol("cl").is_none());
        assert!(Element::from_symbol("CL").is_none());
        assert!(Element::from_symbol("Xx").is_none());
    }

    #[test]
    fn wildcard_has_atomic_number_zero() {
        let star = Element::from_symbol("*").unwrap();
        assert!(star.is_wildcard());
        assert_eq!(star.max_valence(0), None);
    }

    #[test]
    fn from_aromatic_symbol_maps_to_canonical_element() {
        assert_eq!(Element::from_aromatic_symbol("c").unwrap().symbol, "C");
        assert_eq!(Element::from_aromatic_symbol("se").unwrap().symbol, "Se");
        assert!(Element::from_aromatic_symbol("f").is_none());
        assert!(Element::from_aromatic_symbol("C").is_none());
    }

    #[test]
    fn max_valence_accounts_for_charge() {
        let n = Element::from_symbol("N").unwrap();
        let o = Element::from_symbol("O").unwrap();
        let c = Element::from_symbol("C").unwrap();
        assert_eq!(n.max_valence(0), Some(3));
        assert_eq!(n.max_valence(1), Some(4));
        assert_eq!(o.max_valence(-1), Some(1));
        assert_eq!(c.max_valence(-1), Some(3));
        assert_eq!(c.max_valence(1), Some(3));
        assert_eq!(Element::from_symbol("S").unwrap().max_valence(0), Some(6));
    }

    #[test]
    fn transition_metals_have_no_default_valence() {
        assert_eq!(Element::from_symbol("Fe").unwrap().max_valence(2), None);
    }
}
