//! Tokenizer for PHP source units.
//!
//! Only the tokens the import scanner cares about get their own kinds:
//! declaration keywords, name pieces, braces and statement punctuation.
//! Strings, comments and heredocs are lexed as single opaque tokens so that
//! braces and keywords inside them never leak into the scan. Text outside
//! `<?php … ?>` regions is inline HTML and produces no tokens at all.

use logos::{Lexer, Logos};

use crate::base::{TextRange, TextSize};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("namespace", ignore(ascii_case))]
    Namespace,
    #[token("use", ignore(ascii_case))]
    Use,
    #[token("as", ignore(ascii_case))]
    As,
    #[token("class", ignore(ascii_case))]
    Class,
    #[token("interface", ignore(ascii_case))]
    Interface,
    #[token("trait", ignore(ascii_case))]
    Trait,
    #[token("enum", ignore(ascii_case))]
    Enum,
    #[token("function", ignore(ascii_case))]
    Function,
    #[token("const", ignore(ascii_case))]
    Const,

    #[regex(r"[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*")]
    Ident,
    #[regex(r"\$[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*")]
    Variable,
    #[regex(r"[0-9][0-9a-zA-Z_]*")]
    Number,

    #[token("\\")]
    Backslash,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("::")]
    DoubleColon,
    #[token("->")]
    Arrow,
    #[token("?->")]
    NullsafeArrow,
    #[token("#[")]
    AttributeOpen,
    #[token("?>")]
    CloseTag,

    #[token("'", quoted)]
    #[token("\"", quoted)]
    #[token("`", quoted)]
    StringLiteral,
    #[token("<<<", heredoc)]
    Heredoc,
    #[token("//", line_comment)]
    #[token("#", line_comment)]
    #[token("/*", block_comment)]
    Comment,
}

impl Token {
    /// Whether the token can stand as one segment of a qualified name.
    ///
    /// Reserved words are legal segments after a separator (`App\List\Item`).
    pub fn is_word(self) -> bool {
        matches!(
            self,
            Token::Ident
                | Token::Namespace
                | Token::Use
                | Token::As
                | Token::Class
                | Token::Interface
                | Token::Trait
                | Token::Enum
                | Token::Function
                | Token::Const
        )
    }

    /// Comments, which the scanner filters out.
    pub fn is_trivia(self) -> bool {
        self == Token::Comment
    }
}

/// A token together with its byte range in the whole source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: Token,
    pub range: TextRange,
}

impl Lexeme {
    /// The slice of `source` this lexeme covers.
    pub fn text(self, source: &str) -> &str {
        &source[self.range]
    }
}

/// Tokenize every PHP code region of `source`.
///
/// Bytes the lexer cannot classify (operators, brackets and the like) are
/// dropped; the scanner never needs them.
pub fn tokenize(source: &str) -> Vec<Lexeme> {
    let mut lexemes = Vec::new();
    let mut offset = 0;

    while let Some(open) = code_start(&source[offset..]) {
        let start = offset + open;
        offset = source.len();

        let mut lexer = Token::lexer(&source[start..]);
        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let Ok(kind) = result else { continue };
            if kind == Token::CloseTag {
                offset = start + span.end;
                break;
            }
            lexemes.push(Lexeme {
                kind,
                range: TextRange::new(
                    TextSize::from((start + span.start) as u32),
                    TextSize::from((start + span.end) as u32),
                ),
            });
        }
    }

    lexemes
}

/// Offset just past the next `<?php` or `<?=` open tag in inline HTML.
fn code_start(html: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = html[from..].find("<?") {
        let after = from + found + 2;
        let rest = &html[after..];
        if rest.starts_with('=') {
            return Some(after + 1);
        }
        let is_php = rest.get(..3).is_some_and(|tag| tag.eq_ignore_ascii_case("php"));
        if is_php && rest[3..].chars().next().is_none_or(char::is_whitespace) {
            return Some(after + 3);
        }
        from = after;
    }
    None
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

fn quoted(lex: &mut Lexer<'_, Token>) -> bool {
    let quote = lex.slice().as_bytes()[0];
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => {
                lex.bump(i + 1);
                return true;
            }
            _ => i += 1,
        }
    }
    // Unterminated: the string runs to the end of the unit.
    lex.bump(bytes.len());
    true
}

fn line_comment(lex: &mut Lexer<'_, Token>) -> bool {
    let rest = lex.remainder();
    let line_end = rest.find('\n').unwrap_or(rest.len());
    // `?>` closes the code region even inside a line comment.
    let end = rest[..line_end].find("?>").unwrap_or(line_end);
    lex.bump(end);
    true
}

fn block_comment(lex: &mut Lexer<'_, Token>) -> bool {
    let rest = lex.remainder();
    let end = rest.find("*/").map_or(rest.len(), |i| i + 2);
    lex.bump(end);
    true
}

/// Heredoc and nowdoc bodies, up to and including the closing label.
fn heredoc(lex: &mut Lexer<'_, Token>) -> bool {
    let rest = lex.remainder();
    let header = rest.trim_start_matches([' ', '\t']);
    let indent = rest.len() - header.len();

    let (label, header_len) = match header.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = &header[1..];
            let Some(close) = inner.find(quote) else {
                return false;
            };
            (&inner[..close], close + 2)
        }
        _ => {
            let end = header
                .find(|c: char| !is_ident_char(c))
                .unwrap_or(header.len());
            (&header[..end], end)
        }
    };
    if label.is_empty() || label.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }

    let opening_line = indent + header_len;
    let Some(newline) = rest[opening_line..].find('\n') else {
        return false;
    };
    let mut line_start = opening_line + newline + 1;

    loop {
        let line = &rest[line_start..];
        let trimmed = line.trim_start_matches([' ', '\t']);
        if let Some(tail) = trimmed.strip_prefix(label) {
            if !tail.starts_with(is_ident_char) {
                lex.bump(line_start + (line.len() - trimmed.len()) + label.len());
                return true;
            }
        }
        match line.find('\n') {
            Some(next) => line_start += next + 1,
            None => {
                lex.bump(rest.len());
                return true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .into_iter()
            .map(|lexeme| lexeme.kind)
            .filter(|kind| !kind.is_trivia())
            .collect()
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("<?php USE Foo AS Bar; Class X {}"),
            [
                Token::Use,
                Token::Ident,
                Token::As,
                Token::Ident,
                Token::Semicolon,
                Token::Class,
                Token::Ident,
                Token::LBrace,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("<?php User Classes"), [Token::Ident, Token::Ident]);
    }

    #[test]
    fn test_qualified_name_pieces() {
        let source = "<?php use \\A\\B\\{C};";
        let lexemes = tokenize(source);
        let texts: Vec<_> = lexemes.iter().map(|l| l.text(source)).collect();
        assert_eq!(texts, ["use", "\\", "A", "\\", "B", "\\", "{", "C", "}", ";"]);
    }

    #[test]
    fn test_inline_html_is_skipped() {
        let source = "<p class=\"x\">use</p>\n<?php class A {} ?>\n<b>class B</b><?= $x ?>";
        assert_eq!(
            kinds(source),
            [
                Token::Class,
                Token::Ident,
                Token::LBrace,
                Token::RBrace,
                Token::Variable,
            ]
        );
    }

    #[test]
    fn test_source_without_open_tag_has_no_tokens() {
        assert!(tokenize("use A\\B; class C {}").is_empty());
    }

    #[test]
    fn test_strings_hide_braces_and_keywords() {
        let source = r#"<?php $a = "use {$x} class"; $b = 'it\'s }'; `ls {`;"#;
        assert_eq!(
            kinds(source),
            [
                Token::Variable,
                Token::StringLiteral,
                Token::Semicolon,
                Token::Variable,
                Token::StringLiteral,
                Token::Semicolon,
                Token::StringLiteral,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_comments() {
        let source = "<?php\n// use A;\n# class B\n/* { */\n/** @var C */\n#[Attr]\nclass D {}";
        let all: Vec<_> = tokenize(source).into_iter().map(|l| l.kind).collect();
        assert_eq!(
            all,
            [
                Token::Comment,
                Token::Comment,
                Token::Comment,
                Token::Comment,
                Token::AttributeOpen,
                Token::Ident,
                Token::Class,
                Token::Ident,
                Token::LBrace,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_line_comment_stops_at_close_tag() {
        let source = "<?php // note ?> class Html <?php class Code {}";
        assert_eq!(
            kinds(source),
            [Token::Class, Token::Ident, Token::LBrace, Token::RBrace]
        );
    }

    #[test]
    fn test_heredoc_and_nowdoc() {
        let source = concat!(
            "<?php\n",
            "$a = <<<EOT\n  use X; {\n  EOT;\n",
            "$b = <<<'RAW'\nclass Y {\nRAW;\n",
            "class Z {}",
        );
        assert_eq!(
            kinds(source),
            [
                Token::Variable,
                Token::Heredoc,
                Token::Semicolon,
                Token::Variable,
                Token::Heredoc,
                Token::Semicolon,
                Token::Class,
                Token::Ident,
                Token::LBrace,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_heredoc_label_must_end_at_word_boundary() {
        let source = "<?php\n$a = <<<EOT\nEOTX {\nEOT;\n";
        assert_eq!(
            kinds(source),
            [Token::Variable, Token::Heredoc, Token::Semicolon]
        );
    }

    #[test]
    fn test_member_access_tokens() {
        assert_eq!(
            kinds("<?php Foo::class; $a?->b->c;"),
            [
                Token::Ident,
                Token::DoubleColon,
                Token::Class,
                Token::Semicolon,
                Token::Variable,
                Token::NullsafeArrow,
                Token::Ident,
                Token::Arrow,
                Token::Ident,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_ranges_are_absolute() {
        let source = "<h1>x</h1><?php use A;";
        let lexemes = tokenize(source);
        assert_eq!(lexemes[0].text(source), "use");
        assert_eq!(u32::from(lexemes[0].range.start()), 16);
    }
}
