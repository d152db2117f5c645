//! Import scanner: finds namespaces, `use` imports and class-like declarations.
//!
//! This is not a PHP parser. It walks the token stream once, keeping the
//! current namespace, the brace depth and the type imports seen so far, and
//! snapshots those imports at every `class`, `interface`, `trait` or `enum`
//! declaration. Everything else in the unit is skipped.

use smol_str::SmolStr;
use tracing::debug;

use super::lexer::{tokenize, Lexeme, Token};
use crate::base::TextRange;

/// One alias introduced by a type import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseClause {
    /// Local name visible in the unit.
    pub alias: SmolStr,
    /// Imported name without a leading separator.
    pub target: SmolStr,
    /// Range of the clause as written (for group members, the member only).
    pub range: TextRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Trait,
    Enum,
}

impl TypeKind {
    fn from_token(token: Token) -> Option<Self> {
        match token {
            Token::Class => Some(TypeKind::Class),
            Token::Interface => Some(TypeKind::Interface),
            Token::Trait => Some(TypeKind::Trait),
            Token::Enum => Some(TypeKind::Enum),
            _ => None,
        }
    }
}

/// A class-like declaration and the imports visible to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclaredType {
    pub qualified_name: SmolStr,
    pub kind: TypeKind,
    pub name_range: TextRange,
    /// Type imports in declaration order, duplicates included.
    pub imports: Vec<UseClause>,
}

/// A `use` statement the scanner could not make sense of.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed import declaration: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

/// Result of scanning one source unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedUnit {
    pub declarations: Vec<DeclaredType>,
    pub errors: Vec<SyntaxError>,
}

impl ParsedUnit {
    /// The first declaration named `qualified_name`.
    pub fn declaration(&self, qualified_name: &str) -> Option<&DeclaredType> {
        self.declarations
            .iter()
            .find(|decl| decl.qualified_name == qualified_name)
    }
}

/// Scan the whole unit.
pub fn parse_use_statements(source: &str) -> ParsedUnit {
    Parser::new(source).run(None)
}

/// Scan the unit up to and including the declaration of `qualified_name`.
///
/// Imports after that declaration are never looked at.
pub fn parse_use_statements_until(source: &str, qualified_name: &str) -> ParsedUnit {
    Parser::new(source).run(Some(qualified_name))
}

struct QualifiedName {
    text: String,
    range: TextRange,
}

impl QualifiedName {
    fn last_segment(&self) -> SmolStr {
        SmolStr::new(self.text.rsplit('\\').next().unwrap_or(&self.text))
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Lexeme>,
    pos: usize,
    namespace: String,
    imports: Vec<UseClause>,
    /// Brace depth at the current token.
    depth: u32,
    /// Depths of the class-like bodies enclosing the cursor, innermost last.
    bodies: Vec<u32>,
    /// Set while the cursor is between the braces of a group import.
    in_group: bool,
    unit: ParsedUnit,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        let tokens = tokenize(source)
            .into_iter()
            .filter(|lexeme| !lexeme.kind.is_trivia())
            .collect();
        Self {
            source,
            tokens,
            pos: 0,
            namespace: String::new(),
            imports: Vec::new(),
            depth: 0,
            bodies: Vec::new(),
            in_group: false,
            unit: ParsedUnit::default(),
        }
    }

    fn run(mut self, stop_at: Option<&str>) -> ParsedUnit {
        while let Some(lexeme) = self.bump() {
            match lexeme.kind {
                Token::Namespace if !self.is_member_name() => self.namespace_decl(),
                Token::Use if self.bodies.is_empty() => self.use_decl(lexeme),
                Token::LBrace => self.depth += 1,
                Token::RBrace => {
                    if self.bodies.last() == Some(&self.depth) {
                        self.bodies.pop();
                    }
                    self.depth = self.depth.saturating_sub(1);
                }
                kind => {
                    let Some(kind) = TypeKind::from_token(kind) else {
                        continue;
                    };
                    if self.is_member_name() {
                        continue;
                    }
                    if let Some(name) = self.type_decl(kind) {
                        if stop_at == Some(name.as_str()) {
                            break;
                        }
                    }
                }
            }
        }
        self.unit
    }

    // ------------------------------------------------------------------
    // cursor

    fn peek(&self) -> Option<Token> {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> Option<Token> {
        self.tokens.get(self.pos + n).map(|lexeme| lexeme.kind)
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lexeme = self.tokens.get(self.pos).copied()?;
        self.pos += 1;
        Some(lexeme)
    }

    fn eat(&mut self, kind: Token) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: Token, what: &str) -> Result<(), SyntaxError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn error(&self, message: String) -> SyntaxError {
        let range = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or_else(TextRange::default, |lexeme| lexeme.range);
        SyntaxError { message, range }
    }

    /// The lexeme `n` places before the one just bumped.
    fn before(&self, n: usize) -> Option<Lexeme> {
        self.pos
            .checked_sub(n + 2)
            .and_then(|i| self.tokens.get(i))
            .copied()
    }

    /// `Foo::class`, `$x->namespace` and friends name members, not declarations.
    fn is_member_name(&self) -> bool {
        matches!(
            self.before(0).map(|lexeme| lexeme.kind),
            Some(Token::DoubleColon | Token::Arrow | Token::NullsafeArrow | Token::Function)
        )
    }

    /// `new class`, optionally `new readonly class`.
    fn follows_new(&self) -> bool {
        let word_at = |n: usize, word: &str| {
            self.before(n).is_some_and(|lexeme| {
                lexeme.kind == Token::Ident && lexeme.text(self.source).eq_ignore_ascii_case(word)
            })
        };
        word_at(0, "new") || (word_at(0, "readonly") && word_at(1, "new"))
    }

    /// `function` or `const` marking a non-type import. `Function\Foo` is a
    /// qualified class name instead.
    fn at_non_type_marker(&self) -> bool {
        matches!(self.peek(), Some(Token::Function | Token::Const))
            && self.nth(1) != Some(Token::Backslash)
    }

    // ------------------------------------------------------------------
    // names

    /// `Segment(\Segment)*`, with an optional leading separator that is dropped.
    ///
    /// Stops before a separator that is not followed by a segment, which is
    /// how a group prefix `A\B\{` ends.
    fn qualified_name(&mut self) -> Result<QualifiedName, SyntaxError> {
        let start = self.tokens.get(self.pos).map(|lexeme| lexeme.range.start());
        if self.peek() == Some(Token::Backslash) && self.nth(1).is_some_and(Token::is_word) {
            self.pos += 1;
        }
        let Some(first) = self.tokens.get(self.pos).copied().filter(|l| l.kind.is_word()) else {
            return Err(self.error("expected a name".to_owned()));
        };
        self.pos += 1;

        let mut text = first.text(self.source).to_owned();
        let mut end = first.range.end();
        while self.peek() == Some(Token::Backslash) && self.nth(1).is_some_and(Token::is_word) {
            let segment = self.tokens[self.pos + 1];
            text.push('\\');
            text.push_str(segment.text(self.source));
            end = segment.range.end();
            self.pos += 2;
        }

        let start = start.unwrap_or(first.range.start());
        Ok(QualifiedName {
            text,
            range: TextRange::new(start, end),
        })
    }

    fn alias(&mut self) -> Result<SmolStr, SyntaxError> {
        match self.tokens.get(self.pos).copied() {
            Some(lexeme) if lexeme.kind.is_word() => {
                self.pos += 1;
                Ok(SmolStr::new(lexeme.text(self.source)))
            }
            _ => Err(self.error("expected an alias after `as`".to_owned())),
        }
    }

    // ------------------------------------------------------------------
    // declarations

    fn namespace_decl(&mut self) {
        match self.peek() {
            // `namespace\Foo` is a relative name, not a declaration.
            Some(Token::Backslash) => {}
            Some(Token::LBrace) => self.enter_namespace(String::new()),
            Some(kind) if kind.is_word() => {
                if let Ok(name) = self.qualified_name() {
                    self.enter_namespace(name.text);
                }
            }
            _ => {}
        }
    }

    fn enter_namespace(&mut self, name: String) {
        self.namespace = name;
        self.imports.clear();
    }

    /// Records a declaration and returns its qualified name.
    ///
    /// An anonymous class (`new class`, or `class` with no name) records
    /// nothing, but its body still hides trait imports from the scan.
    fn type_decl(&mut self, kind: TypeKind) -> Option<SmolStr> {
        let anonymous = kind == TypeKind::Class && self.follows_new();
        let name = self
            .tokens
            .get(self.pos)
            .copied()
            .filter(|lexeme| matches!(lexeme.kind, Token::Ident | Token::Enum))
            .filter(|lexeme| {
                let text = lexeme.text(self.source);
                !text.eq_ignore_ascii_case("extends") && !text.eq_ignore_ascii_case("implements")
            });

        let Some(name) = name.filter(|_| !anonymous) else {
            if kind == TypeKind::Class {
                self.bodies.push(self.depth + 1);
            }
            return None;
        };
        self.pos += 1;

        let simple = name.text(self.source);
        let qualified_name = if self.namespace.is_empty() {
            SmolStr::new(simple)
        } else {
            SmolStr::from(format!("{}\\{}", self.namespace, simple))
        };
        self.bodies.push(self.depth + 1);

        if self.unit.declaration(&qualified_name).is_none() {
            self.unit.declarations.push(DeclaredType {
                qualified_name: qualified_name.clone(),
                kind,
                name_range: name.range,
                imports: self.imports.clone(),
            });
        }
        Some(qualified_name)
    }

    // ------------------------------------------------------------------
    // imports

    fn use_decl(&mut self, keyword: Lexeme) {
        // closure variable binding: `function () use ($x)`
        if self.peek() == Some(Token::LParen) {
            return;
        }
        if self.at_non_type_marker() {
            self.recover();
            return;
        }

        let mut clauses = Vec::new();
        match self.use_clauses(&mut clauses) {
            Ok(()) => self.imports.extend(clauses),
            Err(mut err) => {
                err.range = TextRange::new(keyword.range.start(), err.range.end());
                debug!(
                    message = %err.message,
                    offset = u32::from(keyword.range.start()),
                    "skipping malformed import"
                );
                self.recover();
                self.unit.errors.push(err);
            }
        }
    }

    fn use_clauses(&mut self, out: &mut Vec<UseClause>) -> Result<(), SyntaxError> {
        loop {
            let name = self.qualified_name()?;
            if self.peek() == Some(Token::Backslash) && self.nth(1) == Some(Token::LBrace) {
                self.pos += 2;
                self.in_group = true;
                self.group_members(&name.text, out)?;
                self.in_group = false;
            } else {
                let alias = if self.eat(Token::As) {
                    self.alias()?
                } else {
                    name.last_segment()
                };
                out.push(UseClause {
                    alias,
                    target: SmolStr::from(name.text),
                    range: name.range,
                });
            }
            if !self.eat(Token::Comma) {
                break;
            }
        }
        self.expect(Token::Semicolon, "`;` after import")
    }

    fn group_members(
        &mut self,
        prefix: &str,
        out: &mut Vec<UseClause>,
    ) -> Result<(), SyntaxError> {
        loop {
            // empty group or trailing comma
            if self.eat(Token::RBrace) {
                return Ok(());
            }
            let non_type = self.at_non_type_marker();
            if non_type {
                self.pos += 1;
            }
            let member = self.qualified_name()?;
            let alias = if self.eat(Token::As) {
                self.alias()?
            } else {
                member.last_segment()
            };
            if !non_type {
                out.push(UseClause {
                    alias,
                    target: SmolStr::from(format!("{prefix}\\{}", member.text)),
                    range: member.range,
                });
            }
            if !self.eat(Token::Comma) {
                return self.expect(Token::RBrace, "`}` closing group import");
            }
        }
    }

    /// Skip to the end of the current statement without unbalancing braces.
    fn recover(&mut self) {
        let mut open = u32::from(std::mem::take(&mut self.in_group));
        while let Some(kind) = self.peek() {
            match kind {
                Token::Semicolon => {
                    self.pos += 1;
                    return;
                }
                Token::LBrace => open += 1,
                Token::RBrace if open == 0 => return,
                Token::RBrace => open -= 1,
                _ => {}
            }
            self.pos += 1;
        }
    }
}
