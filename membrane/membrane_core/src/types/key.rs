//! Property keys and symbols.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::Value;

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

struct SymbolData {
    id: u64,
    description: Option<String>,
}

/// A unique, primitive symbol.
///
/// Symbols compare by identity: two symbols with the same description are
/// still distinct. They are primitives, so they cross membranes unchanged.
#[derive(Clone)]
pub struct Symbol(Arc<SymbolData>);

impl Symbol {
    /// Create a new symbol with an optional description.
    pub fn new(description: Option<&str>) -> Self {
        Self(Arc::new(SymbolData {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: description.map(str::to_string),
        }))
    }

    /// The description given at creation, if any.
    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

/// The key of a property: a string or a symbol.
///
/// Array indices are ordinary string keys in canonical numeric form
/// (`"0"`, `"17"`), recognized by [`PropertyKey::as_array_index`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// A string key.
    String(Arc<str>),
    /// A symbol key.
    Symbol(Symbol),
}

impl PropertyKey {
    /// The array index this key denotes, if it is a canonical index string.
    pub fn as_array_index(&self) -> Option<u32> {
        let Self::String(s) = self else {
            return None;
        };
        if s.is_empty() || (s.len() > 1 && s.starts_with('0')) {
            return None;
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // 2^32 - 1 is not a valid index
        s.parse::<u32>().ok().filter(|index| *index != u32::MAX)
    }

    /// The key as a string slice, if it is a string key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Symbol(_) => None,
        }
    }

    /// Whether this key is a symbol.
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// The key as a primitive value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Symbol(sym) => Value::Symbol(sym.clone()),
        }
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{:?}", s),
            Self::Symbol(sym) => write!(f, "{}", sym),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Symbol(sym) => write!(f, "{}", sym),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(key: &str) -> Self {
        Self::String(Arc::from(key))
    }
}

impl From<String> for PropertyKey {
    fn from(key: String) -> Self {
        Self::String(Arc::from(key))
    }
}

impl From<u32> for PropertyKey {
    fn from(index: u32) -> Self {
        Self::from(index.to_string())
    }
}

impl From<usize> for PropertyKey {
    fn from(index: usize) -> Self {
        Self::from(index.to_string())
    }
}

impl From<Symbol> for PropertyKey {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl From<&PropertyKey> for PropertyKey {
    fn from(key: &PropertyKey) -> Self {
        key.clone()
    }
}
