// src/processing/lexer.rs

//! A table-driven lexer that splits source text into code, string and
//! comment tokens.
//!
//! It knows nothing about keywords or syntax trees. Each grammar supplies a
//! [`Syntax`] describing where comments and string literals start and end,
//! which is all the comment remover needs.

use thiserror::Error;

/// How a comment token was classified by its grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentClass {
    Single,
    Multi,
    Doc,
    /// The grammar does not distinguish; the surface form decides.
    Generic,
}

/// Category of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Code,
    String,
    /// A triple-quoted string standing on its own, as docstrings do.
    DocString,
    Comment(CommentClass),
}

/// A slice of the input with its category. Concatenating every token's text
/// reproduces the input exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated {what} starting at byte {offset}")]
    Unterminated { what: &'static str, offset: usize },
}

/// A comment that runs to the end of the line.
#[derive(Debug)]
pub(crate) struct LineRule {
    pub marker: &'static str,
    pub class: CommentClass,
    /// Characters that, directly after the marker, cancel the match.
    pub unless_next: &'static [char],
    /// Only a comment at line start or after whitespace (shell `#`).
    pub needs_boundary: bool,
}

/// A delimited comment.
#[derive(Debug)]
pub(crate) struct BlockRule {
    pub open: &'static str,
    pub close: &'static str,
    pub class: CommentClass,
    pub unless_next: &'static [char],
    /// The opener counted for nesting, if the grammar nests block comments.
    pub nests: Option<&'static str>,
}

#[derive(Debug)]
pub(crate) struct StringRule {
    pub delim: char,
    pub multiline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TripleQuotes {
    None,
    /// `"""` / `'''` are plain multi-line strings.
    Strings,
    /// Standalone triple-quoted strings are docstrings.
    Docstrings,
}

/// Lexical description of a grammar. Rules are tried in declaration order.
#[derive(Debug)]
pub(crate) struct Syntax {
    pub lines: &'static [LineRule],
    pub blocks: &'static [BlockRule],
    pub strings: &'static [StringRule],
    pub triple_quotes: TripleQuotes,
    /// Rust-style `r#"..."#` literals.
    pub raw_strings: bool,
    /// `'x'` is a character literal; any other `'` is plain code (lifetimes, labels).
    pub char_literals: bool,
    /// A `'` right after an operand is a transpose operator (MATLAB).
    pub transpose_quote: bool,
}

#[derive(Clone, Copy)]
enum Opener {
    Line(&'static LineRule),
    Block(&'static BlockRule),
    Str { delim: char, multiline: bool },
    Triple { quote: &'static str, doc: bool },
    Raw { body_offset: usize, hashes: usize },
    Char { len: usize },
}

/// Lazy token stream over `src`. Stops after the first error.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    syntax: &'static Syntax,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(src: &'a str, syntax: &'static Syntax) -> Self {
        Self {
            src,
            pos: 0,
            syntax,
            failed: false,
        }
    }

    fn opener_at(&self, pos: usize) -> Option<Opener> {
        let rest = &self.src[pos..];
        let prev = self.src[..pos].chars().next_back();
        let syntax = self.syntax;

        if syntax.raw_strings && !prev.is_some_and(is_ident_char) {
            if let Some(opener) = raw_string_opener(rest) {
                return Some(opener);
            }
        }

        if syntax.triple_quotes != TripleQuotes::None {
            for quote in ["\"\"\"", "'''"] {
                if rest.starts_with(quote) {
                    return Some(Opener::Triple {
                        quote,
                        doc: syntax.triple_quotes == TripleQuotes::Docstrings,
                    });
                }
            }
        }

        for rule in syntax.blocks {
            if rest.starts_with(rule.open) && !next_is_one_of(rest, rule.open.len(), rule.unless_next)
            {
                return Some(Opener::Block(rule));
            }
        }

        for rule in syntax.lines {
            if rest.starts_with(rule.marker)
                && !next_is_one_of(rest, rule.marker.len(), rule.unless_next)
                && (!rule.needs_boundary || prev.map_or(true, is_comment_boundary))
            {
                return Some(Opener::Line(rule));
            }
        }

        let first = rest.chars().next()?;
        if first == '\'' {
            if syntax.char_literals {
                return char_literal_len(rest).map(|len| Opener::Char { len });
            }
            if syntax.transpose_quote && prev.is_some_and(ends_operand) {
                return None;
            }
        }

        syntax
            .strings
            .iter()
            .find(|rule| rule.delim == first)
            .map(|rule| Opener::Str {
                delim: rule.delim,
                multiline: rule.multiline,
            })
    }

    /// Returns the token kind and the byte offset just past the token.
    fn scan_token(&self, opener: Opener, start: usize) -> Result<(TokenKind, usize), LexError> {
        let src = self.src;
        match opener {
            Opener::Line(rule) => {
                let body = start + rule.marker.len();
                let end = src[body..]
                    .find(['\n', '\r'])
                    .map_or(src.len(), |i| body + i);
                Ok((TokenKind::Comment(rule.class), end))
            }
            Opener::Block(rule) => {
                let end = match rule.nests {
                    Some(nest) => find_nested_close(src, start + rule.open.len(), nest, rule.close),
                    None => src[start + rule.open.len()..]
                        .find(rule.close)
                        .map(|i| start + rule.open.len() + i + rule.close.len()),
                };
                end.map(|end| (TokenKind::Comment(rule.class), end))
                    .ok_or(LexError::Unterminated {
                        what: "block comment",
                        offset: start,
                    })
            }
            Opener::Str { delim, multiline } => scan_string(src, start, delim, multiline),
            Opener::Triple { quote, doc } => {
                let end = find_unescaped(src, start + quote.len(), quote).ok_or(
                    LexError::Unterminated {
                        what: "triple-quoted string",
                        offset: start,
                    },
                )?;
                let kind = if doc && starts_statement(src, start) {
                    TokenKind::DocString
                } else {
                    TokenKind::String
                };
                Ok((kind, end))
            }
            Opener::Raw { body_offset, hashes } => {
                let body_start = start + body_offset;
                let closing = format!("\"{}", "#".repeat(hashes));
                src[body_start..]
                    .find(&closing)
                    .map(|i| (TokenKind::String, body_start + i + closing.len()))
                    .ok_or(LexError::Unterminated {
                        what: "raw string",
                        offset: start,
                    })
            }
            Opener::Char { len } => Ok((TokenKind::String, start + len)),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.src.len() {
            return None;
        }
        let start = self.pos;
        let mut cursor = start;
        while cursor < self.src.len() {
            if let Some(opener) = self.opener_at(cursor) {
                if cursor > start {
                    self.pos = cursor;
                    return Some(Ok(token(TokenKind::Code, &self.src[start..cursor])));
                }
                return Some(match self.scan_token(opener, cursor) {
                    Ok((kind, end)) => {
                        self.pos = end;
                        Ok(token(kind, &self.src[cursor..end]))
                    }
                    Err(err) => {
                        self.failed = true;
                        Err(err)
                    }
                });
            }
            cursor += self.src[cursor..].chars().next().map_or(1, char::len_utf8);
        }
        self.pos = cursor;
        Some(Ok(token(TokenKind::Code, &self.src[start..cursor])))
    }
}

fn token(kind: TokenKind, text: &str) -> Token<'_> {
    Token { kind, text }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_comment_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, ';' | '(' | '|' | '&')
}

fn ends_operand(c: char) -> bool {
    is_ident_char(c) || matches!(c, ')' | ']' | '}' | '.' | '\'')
}

fn next_is_one_of(rest: &str, offset: usize, chars: &[char]) -> bool {
    rest[offset..].chars().next().is_some_and(|c| chars.contains(&c))
}

/// `r"`, `r#"`, `br##"` and friends.
fn raw_string_opener(rest: &str) -> Option<Opener> {
    let after_prefix = if rest.starts_with("br") {
        2
    } else if rest.starts_with('r') {
        1
    } else {
        return None;
    };
    let hashes = rest[after_prefix..].chars().take_while(|c| *c == '#').count();
    let quote = after_prefix + hashes;
    rest[quote..].starts_with('"').then_some(Opener::Raw {
        body_offset: quote + 1,
        hashes,
    })
}

/// Length of a character literal starting at `rest`, or `None` if the quote is
/// a lifetime, label or symbol.
fn char_literal_len(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices();
    chars.next();
    let (_, first) = chars.next()?;
    match first {
        '\n' | '\'' => None,
        '\\' => {
            chars.next()?;
            for (i, c) in chars.take(10) {
                match c {
                    '\'' => return Some(i + 1),
                    '\n' => return None,
                    _ => {}
                }
            }
            None
        }
        _ => {
            let (i, c) = chars.next()?;
            (c == '\'').then_some(i + 1)
        }
    }
}

fn scan_string(
    src: &str,
    start: usize,
    delim: char,
    multiline: bool,
) -> Result<(TokenKind, usize), LexError> {
    let body = start + delim.len_utf8();
    let mut chars = src[body..].char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' if !multiline => return Ok((TokenKind::String, body + i)),
            c if c == delim => return Ok((TokenKind::String, body + i + c.len_utf8())),
            _ => {}
        }
    }
    if multiline {
        Err(LexError::Unterminated {
            what: "string",
            offset: start,
        })
    } else {
        Ok((TokenKind::String, src.len()))
    }
}

/// Offset just past the first unescaped `needle` at or after `from`.
fn find_unescaped(src: &str, from: usize, needle: &str) -> Option<usize> {
    let mut chars = src[from..].char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if src[from + i..].starts_with(needle) {
            return Some(from + i + needle.len());
        }
    }
    None
}

fn find_nested_close(src: &str, from: usize, open: &str, close: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = from;
    while i < src.len() {
        let rest = &src[i..];
        if rest.starts_with(close) {
            depth -= 1;
            i += close.len();
            if depth == 0 {
                return Some(i);
            }
        } else if rest.starts_with(open) {
            depth += 1;
            i += open.len();
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    None
}

/// True if only indentation (and string prefixes like `r` or `b`) precede
/// `pos` on its line.
fn starts_statement(src: &str, pos: usize) -> bool {
    let line_start = src[..pos].rfind('\n').map_or(0, |i| i + 1);
    let lead = src[line_start..pos].trim_start();
    lead.len() <= 2 && lead.chars().all(|c| matches!(c, 'r' | 'R' | 'u' | 'U' | 'b' | 'B' | 'f' | 'F'))
}
