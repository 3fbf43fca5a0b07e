//! Lazy tokenizer for C function bodies
//!
//! Only the shapes the call-graph analyzer needs are produced: words,
//! the punctuation `( ) { } , ;`, and the member-access operators `->` and
//! `.`. Comments, string and character literals, numeric literals and every
//! other operator are skipped without producing a token.

use std::iter::FusedIterator;

/// Words that look like calls when followed by `(` but never are
pub const CONTROL_KEYWORDS: &[&str] = &["if", "while", "for", "switch", "return"];

pub fn is_control_keyword(word: &str) -> bool {
    CONTROL_KEYWORDS.contains(&word)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    /// One of [`CONTROL_KEYWORDS`]
    Keyword,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    /// `->`
    Arrow,
    /// `.`
    Dot,
}

impl TokenKind {
    pub fn is_word(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::Keyword)
    }
}

/// A token borrowing its text from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the first character
    pub offset: usize,
}

/// Iterator over the tokens of a source string, in source order
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
}

/// Tokenize `source` lazily
pub fn tokenize(source: &str) -> Tokenizer<'_> {
    Tokenizer { source, pos: 0 }
}

impl<'a> Tokenizer<'a> {
    /// End of the run of word characters starting at `start`
    fn word_end(&self, start: usize) -> usize {
        self.source[start..]
            .char_indices()
            .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
            .map_or(self.source.len(), |(i, _)| start + i)
    }

    /// End of a numeric literal starting at `start`: digits, suffixes, a
    /// fraction and a signed exponent (`0x1F`, `42u`, `1.0e-3f`, `.5`)
    fn number_end(&self, start: usize) -> usize {
        let bytes = self.source.as_bytes();
        let mut end = start;
        while let Some(&b) = bytes.get(end) {
            let signed_exponent = matches!(b, b'+' | b'-')
                && end > start
                && matches!(bytes[end - 1], b'e' | b'E' | b'p' | b'P');
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || signed_exponent {
                end += 1;
            } else {
                break;
            }
        }
        end
    }

    /// Position just past a string or character literal opened at `start`.
    /// An unterminated literal stops at the end of its line.
    fn literal_end(&self, start: usize, quote: char) -> usize {
        let mut chars = self.source[start + 1..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '\n' => return start + 1 + i,
                c if c == quote => return start + 1 + i + 1,
                _ => {}
            }
        }
        self.source.len()
    }

    fn punctuation(rest: &str, c: char) -> Option<(TokenKind, usize)> {
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '-' if rest.starts_with("->") => return Some((TokenKind::Arrow, 2)),
            _ => return None,
        };
        Some((kind, 1))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        while self.pos < self.source.len() {
            let start = self.pos;
            let rest = &self.source[start..];
            let c = rest.chars().next()?;

            if c.is_whitespace() {
                self.pos += c.len_utf8();
                continue;
            }

            if rest.starts_with("//") {
                self.pos = rest.find('\n').map_or(self.source.len(), |i| start + i);
                continue;
            }

            // Unterminated block comments run to end of input
            if rest.starts_with("/*") {
                self.pos = rest[2..]
                    .find("*/")
                    .map_or(self.source.len(), |i| start + 2 + i + 2);
                continue;
            }

            if c == '"' || c == '\'' {
                self.pos = self.literal_end(start, c);
                continue;
            }

            if c.is_alphabetic() || c == '_' {
                let end = self.word_end(start);
                self.pos = end;
                let text = &self.source[start..end];
                let kind = if is_control_keyword(text) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                return Some(Token {
                    kind,
                    text,
                    offset: start,
                });
            }

            let leading_dot_number =
                c == '.' && rest.as_bytes().get(1).is_some_and(u8::is_ascii_digit);
            if c.is_ascii_digit() || leading_dot_number {
                self.pos = self.number_end(start);
                continue;
            }

            match Self::punctuation(rest, c) {
                Some((kind, len)) => {
                    self.pos = start + len;
                    return Some(Token {
                        kind,
                        text: &self.source[start..start + len],
                        offset: start,
                    });
                }
                None => self.pos += c.len_utf8(),
            }
        }
        None
    }
}

impl FusedIterator for Tokenizer<'_> {}
