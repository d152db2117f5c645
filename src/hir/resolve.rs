//! Name expansion: turning a type reference into its fully-qualified name.
//!
//! Rules, first match wins:
//!
//! 1. built-in type keywords come back lowercased (`String` → `string`)
//! 2. `self`, `static` and `$this` name the declaring type
//! 3. `\Absolute\Name` loses its one leading separator
//! 4. a first segment that is an import alias is replaced by its target
//! 5. anything else is relative to the declaring type's namespace
//!
//! Nothing is checked against declared types; this is purely syntactic.

use std::ops::Deref;

use tracing::trace;

use super::ids::{TypeIdentity, SEPARATOR};
use super::imports::ImportTable;

/// Built-in type keywords, which never take part in namespace resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    String,
    Int,
    Float,
    Bool,
    Array,
    Callable,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 6] = [
        BuiltinType::String,
        BuiltinType::Int,
        BuiltinType::Float,
        BuiltinType::Bool,
        BuiltinType::Array,
        BuiltinType::Callable,
    ];

    /// The lowercase keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinType::String => "string",
            BuiltinType::Int => "int",
            BuiltinType::Float => "float",
            BuiltinType::Bool => "bool",
            BuiltinType::Array => "array",
            BuiltinType::Callable => "callable",
        }
    }
}

/// A reference that is answered without looking at imports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReservedName {
    Builtin(BuiltinType),
    /// `self`, `static` or `$this`.
    DeclaringType,
}

impl ReservedName {
    /// Classify `reference`, ignoring ASCII case.
    pub fn classify(reference: &str) -> Option<Self> {
        let reserved = match reference.to_ascii_lowercase().as_str() {
            "string" => ReservedName::Builtin(BuiltinType::String),
            "int" => ReservedName::Builtin(BuiltinType::Int),
            "float" => ReservedName::Builtin(BuiltinType::Float),
            "bool" => ReservedName::Builtin(BuiltinType::Bool),
            "array" => ReservedName::Builtin(BuiltinType::Array),
            "callable" => ReservedName::Builtin(BuiltinType::Callable),
            "self" | "static" | "$this" => ReservedName::DeclaringType,
            _ => return None,
        };
        Some(reserved)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExpandError {
    #[error("class name must not be empty")]
    EmptyName,
}

/// Expand `reference` as written inside the declaration of `ty`.
pub fn expand(
    reference: &str,
    ty: &TypeIdentity,
    imports: &ImportTable,
) -> Result<String, ExpandError> {
    expand_with(reference, ty, || imports)
}

/// Like [`expand`], but only asks for the import table when rule 4 needs it.
pub fn expand_with<F, T>(
    reference: &str,
    ty: &TypeIdentity,
    imports: F,
) -> Result<String, ExpandError>
where
    F: FnOnce() -> T,
    T: Deref<Target = ImportTable>,
{
    if reference.is_empty() {
        return Err(ExpandError::EmptyName);
    }

    match ReservedName::classify(reference) {
        Some(ReservedName::Builtin(builtin)) => {
            trace!(reference, "built-in type");
            return Ok(builtin.as_str().to_owned());
        }
        Some(ReservedName::DeclaringType) => {
            trace!(reference, ty = %ty, "declaring type");
            return Ok(ty.qualified_name());
        }
        None => {}
    }

    if let Some(absolute) = reference.strip_prefix(SEPARATOR) {
        if absolute.is_empty() {
            return Err(ExpandError::EmptyName);
        }
        trace!(reference, "already fully qualified");
        return Ok(absolute.to_owned());
    }

    let (first, rest) = match reference.split_once(SEPARATOR) {
        Some((first, rest)) => (first, Some(rest)),
        None => (reference, None),
    };

    let imports = imports();
    if let Some(target) = imports.get(first) {
        trace!(reference, alias = first, target, "expanded through import");
        return Ok(match rest {
            Some(rest) if !rest.is_empty() => format!("{target}{SEPARATOR}{rest}"),
            _ => target.to_owned(),
        });
    }

    trace!(reference, ty = %ty, "namespace-relative");
    if ty.in_namespace() {
        Ok(format!("{}{SEPARATOR}{reference}", ty.namespace_name()))
    } else {
        Ok(reference.to_owned())
    }
}
