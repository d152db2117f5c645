//! Identity of a class-like type: namespace segments plus simple name.

use std::fmt;

use smol_str::SmolStr;

/// Namespace separator.
pub const SEPARATOR: char = '\\';

/// The fully-qualified name of a type, split into namespace and simple name.
///
/// This stands in for runtime reflection: the only things the resolver ever
/// needs to know about a type are its name and where its source lives, and
/// the latter is the [`SourceLocator`](super::SourceLocator)'s business.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity {
    namespace: Vec<SmolStr>,
    name: SmolStr,
}

impl TypeIdentity {
    /// Build an identity from namespace segments and a simple name.
    pub fn new<I, S>(namespace: I, name: impl Into<SmolStr>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            namespace: namespace.into_iter().map(Into::into).collect(),
            name: name.into(),
        }
    }

    /// Parse `Foo\Bar\Baz` (one leading separator allowed).
    ///
    /// Returns `None` for an empty name or an empty segment (`Foo\\Bar`).
    pub fn parse(qualified_name: &str) -> Option<Self> {
        let trimmed = qualified_name
            .strip_prefix(SEPARATOR)
            .unwrap_or(qualified_name);
        let mut segments: Vec<SmolStr> = trimmed.split(SEPARATOR).map(SmolStr::new).collect();
        if segments.iter().any(SmolStr::is_empty) {
            return None;
        }
        let name = segments.pop()?;
        Some(Self {
            namespace: segments,
            name,
        })
    }

    /// Namespace segments, outermost first.
    pub fn namespace(&self) -> &[SmolStr] {
        &self.namespace
    }

    /// The namespace joined with separators; empty in the global namespace.
    pub fn namespace_name(&self) -> String {
        self.namespace.join("\\")
    }

    /// Simple name without the namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// False for types in the global namespace.
    pub fn in_namespace(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// `Namespace\Name`, without a leading separator.
    pub fn qualified_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.namespace {
            write!(f, "{segment}{SEPARATOR}")?;
        }
        f.write_str(&self.name)
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentity({self})")
    }
}
