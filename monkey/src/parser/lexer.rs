use crate::span::Span;

use super::token::{Token, TokenKind, lookup_ident};

/// Byte cursor over the source. Produces one token per `next_token` call and
/// never moves backwards.
pub struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    /// Index of `ch`.
    position: usize,
    /// Index of the byte after `ch`.
    read_position: usize,
    /// Current byte, 0 once past the end.
    ch: u8,
    line: usize,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let input = source.as_bytes();
        Self {
            source,
            input,
            position: 0,
            read_position: 1,
            ch: input.first().copied().unwrap_or(0),
            line: 1,
            line_start: 0,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        if self.at_end() {
            return Token::new(TokenKind::Eof, "", self.span_from(start));
        }

        let kind = match self.ch {
            b'=' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            b'!' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Asterisk,
            b'/' => TokenKind::Slash,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            ch if is_letter(ch) => {
                // the scan loop already leaves us one past the token
                let ident = self.read_while(is_letter);
                return Token::new(lookup_ident(ident), ident, self.span_from(start));
            }
            ch if ch.is_ascii_digit() => {
                let number = self.read_while(|ch| ch.is_ascii_digit());
                return Token::new(TokenKind::Int, number, self.span_from(start));
            }
            _ => return self.read_illegal(),
        };

        self.read_char();
        let literal = &self.source[start..self.position];
        Token::new(kind, literal, self.span_from(start))
    }

    fn read_char(&mut self) {
        if self.at_end() {
            return;
        }
        if self.ch == b'\n' {
            self.line += 1;
            self.line_start = self.read_position;
        }
        self.position = self.read_position;
        self.read_position += 1;
        self.ch = self.input.get(self.position).copied().unwrap_or(0);
    }

    fn peek_char(&self) -> u8 {
        self.input.get(self.read_position).copied().unwrap_or(0)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn read_while(&mut self, accept: fn(u8) -> bool) -> &'a str {
        let start = self.position;
        while !self.at_end() && accept(self.ch) {
            self.read_char();
        }
        let source = self.source;
        &source[start..self.position]
    }

    /// Consumes one whole character, so non-ASCII input never splits a
    /// UTF-8 sequence.
    fn read_illegal(&mut self) -> Token {
        let start = self.position;
        let width = self.source[start..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        for _ in 0..width {
            self.read_char();
        }
        let literal = &self.source[start..self.position];
        Token::new(TokenKind::Illegal, literal, self.span_from(start))
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() && matches!(self.ch, b' ' | b'\t' | b'\n' | b'\r') {
            self.read_char();
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span {
            line: self.line,
            column: start - self.line_start + 1,
            start,
            end: self.position,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.is(TokenKind::Eof) { None } else { Some(token) }
    }
}

/// Scans the whole source; the last token is always `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.is(TokenKind::Eof);
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}
