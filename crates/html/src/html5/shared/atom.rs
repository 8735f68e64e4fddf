//! Atom table for canonicalized HTML tag/attribute names.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Interned, immutable tag or attribute name.
///
/// Atoms are cheap to clone and safe to hand across the lexer/parser thread
/// boundary. Two atoms produced by the same table compare by pointer first.
#[derive(Clone, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(Arc<str>);

impl Atom {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Clone the canonical name without reallocating.
    pub fn to_arc(&self) -> Arc<str> {
        Arc::clone(&self.0)
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl PartialEq<str> for Atom {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Atom {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({:?})", &*self.0)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tokenizer-owned atom table.
///
/// Invariant: ASCII letters are stored in canonical lowercase form for
/// HTML-namespace matching. Non-ASCII code points are preserved as-is.
#[derive(Debug, Default)]
pub struct AtomTable {
    map: HashMap<Box<str>, Atom>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a name, applying ASCII-lowercase folding for HTML matching.
    pub fn intern_ascii_folded(&mut self, name: &str) -> Atom {
        if !name.bytes().any(|b| b.is_ascii_uppercase()) {
            return self.intern_exact(name);
        }
        let folded = name.to_ascii_lowercase();
        self.intern_exact(&folded)
    }

    /// Intern a name verbatim (XML-style case-sensitive matching).
    pub fn intern_exact(&mut self, name: &str) -> Atom {
        if let Some(atom) = self.map.get(name) {
            return atom.clone();
        }
        let atom = Atom(Arc::<str>::from(name));
        self.map.insert(name.into(), atom.clone());
        atom
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
