use std::fmt;

/// Canonical structure identifier (SMILES text) as returned by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructureIdentifier(String);

impl StructureIdentifier {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StructureIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StructureIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
