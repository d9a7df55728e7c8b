//! Default [`TokenResolver`] for Python-like source.
//!
//! Reads the name an inspection request is about: the dotted name under
//! the cursor, or the function being called when the cursor sits inside
//! a call's parentheses.

use crate::message::ports::TokenResolver;

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

const THREE_CHAR_OPS: &[&str] = &["**=", "//=", ">>=", "<<=", "..."];
const TWO_CHAR_OPS: &[&str] = &[
    "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=", "->", "**",
    "//", "<<", ">>", ":=",
];
const STRING_PREFIXES: &[&str] = &["r", "u", "b", "f", "br", "rb", "fr", "rf"];

/// Resolves the identifier at a cursor by lexing the code up to it.
///
/// # Examples
///
/// ```
/// use msgspec_adapter::message::adapters::IdentifierTokenResolver;
/// use msgspec_adapter::message::ports::TokenResolver;
///
/// let resolver = IdentifierTokenResolver::new();
/// assert_eq!(resolver.token_at_cursor("os.path.join", 4), "os.path");
/// assert_eq!(resolver.token_at_cursor("print(x, ", 9), "print");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierTokenResolver;

impl IdentifierTokenResolver {
    /// Creates a resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TokenResolver for IdentifierTokenResolver {
    fn token_at_cursor(&self, code: &str, cursor_pos: usize) -> String {
        let chars: Vec<char> = code.chars().collect();
        let mut names: Vec<String> = Vec::new();
        let mut call_names: Vec<String> = Vec::new();
        let mut previous: Option<Token> = None;
        let mut line_start = 0;

        for token in Lexer::new(&chars) {
            // allow '|foo' to find 'foo' at the beginning of a line
            let boundary = if token.start == line_start {
                cursor_pos + 1
            } else {
                cursor_pos
            };
            if token.start >= boundary {
                break;
            }

            match &token.kind {
                TokenKind::Name(name) if !KEYWORDS.contains(&name.as_str()) => {
                    let after_dot = previous
                        .as_ref()
                        .is_some_and(|prev| prev.kind == TokenKind::Op(".".to_owned()));
                    match names.last_mut() {
                        Some(last) if after_dot => {
                            last.push('.');
                            last.push_str(name);
                        }
                        _ => names.push(name.clone()),
                    }
                }
                TokenKind::Op(op) => match op.as_str() {
                    // don't inspect the left-hand side of an assignment
                    "=" => {
                        names.pop();
                    }
                    "(" => {
                        if let Some(last) = names.last() {
                            call_names.push(last.clone());
                        }
                    }
                    ")" => {
                        call_names.pop();
                    }
                    _ => {}
                },
                _ => {}
            }

            if token.end > cursor_pos {
                break;
            }
            if token.kind == TokenKind::Newline {
                line_start = token.end;
            }
            previous = Some(token);
        }

        call_names
            .pop()
            .or_else(|| names.pop())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Name(String),
    Op(String),
    Newline,
    Other,
}

/// A token with character offsets `[start, end)` into the whole code.
#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

struct Lexer<'a> {
    chars: &'a [char],
    pos: usize,
}

impl<'a> Lexer<'a> {
    const fn new(chars: &'a [char]) -> Self {
        Self { chars, pos: 0 }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.chars.get(start..end).unwrap_or_default().iter().collect()
    }

    fn consume_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek(0).is_some_and(&predicate) {
            self.pos += 1;
        }
    }

    /// Consumes a string literal starting at the current quote.
    fn consume_string(&mut self) {
        let Some(quote) = self.peek(0) else {
            return;
        };
        let triple = self.peek(1) == Some(quote) && self.peek(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };
        while let Some(c) = self.peek(0) {
            if c == '\\' {
                self.pos += 2;
                continue;
            }
            if c == '\n' && !triple {
                return;
            }
            if c == quote
                && (!triple || (self.peek(1) == Some(quote) && self.peek(2) == Some(quote)))
            {
                self.pos += if triple { 3 } else { 1 };
                return;
            }
            self.pos += 1;
        }
        self.pos = self.pos.min(self.chars.len());
    }

    fn operator_len(&self) -> usize {
        let ahead = |len: usize| self.text(self.pos, (self.pos + len).min(self.chars.len()));
        if THREE_CHAR_OPS.contains(&ahead(3).as_str()) {
            3
        } else if TWO_CHAR_OPS.contains(&ahead(2).as_str()) {
            2
        } else {
            1
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.consume_while(|ch| ch == ' ' || ch == '\t' || ch == '\x0c');
        let start = self.pos;
        let c = self.peek(0)?;

        let kind = if c == '\n' || c == '\r' {
            self.pos += if c == '\r' && self.peek(1) == Some('\n') { 2 } else { 1 };
            TokenKind::Newline
        } else if c == '#' {
            self.consume_while(|ch| ch != '\n' && ch != '\r');
            TokenKind::Other
        } else if c == '"' || c == '\'' {
            self.consume_string();
            TokenKind::Other
        } else if c.is_alphabetic() || c == '_' {
            self.consume_while(|ch| ch.is_alphanumeric() || ch == '_');
            let name = self.text(start, self.pos);
            let is_prefix = STRING_PREFIXES.contains(&name.to_ascii_lowercase().as_str());
            if is_prefix && matches!(self.peek(0), Some('"' | '\'')) {
                self.consume_string();
                TokenKind::Other
            } else {
                TokenKind::Name(name)
            }
        } else if c.is_ascii_digit() {
            self.consume_while(|ch| ch.is_alphanumeric() || ch == '_' || ch == '.');
            TokenKind::Other
        } else {
            self.pos += self.operator_len();
            TokenKind::Op(self.text(start, self.pos))
        };

        Some(Token {
            kind,
            start,
            end: self.pos,
        })
    }
}
