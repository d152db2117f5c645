//! Syntax layer: PHP tokenizer and the import scanner built on it.

pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, Lexeme, Token};
pub use parser::{
    parse_use_statements, parse_use_statements_until, DeclaredType, ParsedUnit, SyntaxError,
    TypeKind, UseClause,
};
