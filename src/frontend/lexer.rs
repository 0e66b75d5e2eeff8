use std::{
    collections::{BTreeMap, VecDeque},
    str::Chars,
};

use itertools::{PeekNth, peek_nth};
use once_cell::sync::Lazy;
use strum::EnumString;

use crate::{
    error::{CompileError, raised_at},
    frontend::SourceFile,
};

#[derive(Debug)]
pub struct Lexer<'source> {
    source: &'source SourceFile,
    position: usize,
    chars: PeekNth<Chars<'source>>,
    peek_buffer: VecDeque<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /* Words */
    Keyword(Keyword), // return
    Identifier,       // main

    /* Literals */
    IntegerLiteral, // 1, 017, 0x1f

    /* Delimiters */
    OpenParen,  // (
    CloseParen, // )
    OpenBrace,  // {
    CloseBrace, // }
    Semicolon,  // ;

    /* Unary Ops */
    Bang, // !

    /* Unary + Binary Ops */
    Plus,  // +
    Minus, // -

    /* Binary Ops */
    Asterisk,             // *
    Divide,               // /
    Modulus,              // %
    LogicalAnd,           // &&
    LogicalOr,            // ||
    DoubleEquals,         // ==
    NotEquals,            // !=
    LessThan,             // <
    LessThanOrEqualTo,    // <=
    GreaterThan,          // >
    GreaterThanOrEqualTo, // >=
}

impl TokenKind {
    pub fn is_equality_operator(&self) -> bool {
        matches!(self, Self::DoubleEquals | Self::NotEquals)
    }

    pub fn is_relational_operator(&self) -> bool {
        matches!(
            self,
            Self::LessThan
                | Self::LessThanOrEqualTo
                | Self::GreaterThan
                | Self::GreaterThanOrEqualTo
        )
    }

    pub fn is_term_operator(&self) -> bool {
        matches!(self, Self::Plus | Self::Minus)
    }

    pub fn is_factor_operator(&self) -> bool {
        matches!(self, Self::Asterisk | Self::Divide | Self::Modulus)
    }

    pub fn is_unary_operator(&self) -> bool {
        matches!(self, Self::Plus | Self::Minus | Self::Bang)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Keyword {
    Int,
    Return,
}

/// Table of single char tokens (matched after longer sequences are checked for)
static SINGLE_TOKENS: Lazy<BTreeMap<char, TokenKind>> = Lazy::new(|| {
    BTreeMap::from([
        ('(', TokenKind::OpenParen),
        (')', TokenKind::CloseParen),
        ('{', TokenKind::OpenBrace),
        ('}', TokenKind::CloseBrace),
        (';', TokenKind::Semicolon),
        ('!', TokenKind::Bang),
        ('+', TokenKind::Plus),
        ('-', TokenKind::Minus),
        ('*', TokenKind::Asterisk),
        ('/', TokenKind::Divide),
        ('%', TokenKind::Modulus),
        ('<', TokenKind::LessThan),
        ('>', TokenKind::GreaterThan),
    ])
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source SourceFile) -> Self {
        Self {
            source,
            chars: peek_nth(source.contents.chars()),
            position: 0,
            peek_buffer: VecDeque::new(),
        }
    }

    pub fn source(&self) -> &'source SourceFile {
        self.source
    }

    /// Span of the end of input, used to report unexpected EOF
    pub fn eof_span(&self) -> Span {
        let end = self.source.contents.len();
        Span::new(end, end)
    }

    fn error(&self, span: Span, message: String) -> CompileError {
        CompileError::Lex {
            span,
            message,
            raised_at: raised_at!(),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn next_is(&mut self, offset: usize, expected: char) -> bool {
        self.chars.peek_nth(offset).is_some_and(|c| *c == expected)
    }

    fn ignore_whitespace(&mut self) {
        while let Some(c) = self.chars.peek().copied() {
            if !c.is_ascii_whitespace() {
                break;
            }

            self.advance();
        }
    }

    fn ignore_line(&mut self) {
        while let Some(c) = self.chars.peek().copied() {
            if c == '\n' {
                break;
            }

            self.advance();
        }
    }

    fn ignore_block_comment(&mut self) -> Result<(), CompileError> {
        let start_position = self.position;

        // Consume the opening `/*`
        self.advance();
        self.advance();

        while self.chars.peek().is_some() {
            if self.next_is(0, '*') && self.next_is(1, '/') {
                self.advance();
                self.advance();
                return Ok(());
            }

            self.advance();
        }

        Err(self.error(
            Span::new(start_position, start_position + 2),
            "Reached end of file while reading block comment".to_string(),
        ))
    }

    // Keyword or identifier
    fn read_word(&mut self) -> Token {
        let start_position = self.position;

        while let Some(c) = self.chars.peek().copied() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }

            self.advance();
        }

        let span = self.new_span(start_position);
        let value = self.source.value_of_span(span);

        let kind = match value.parse() {
            Ok(keyword) => TokenKind::Keyword(keyword),
            Err(_) => TokenKind::Identifier,
        };

        Token { kind, span }
    }

    fn read_number(&mut self) -> Result<Token, CompileError> {
        let start_position = self.position;

        assert!(self.chars.peek().is_some());

        // Alphanumerics are consumed greedily so `12ab` or `0x` are reported
        // as one malformed literal instead of two tokens
        while let Some(c) = self.chars.peek().copied() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }

            self.advance();
        }

        let span = self.new_span(start_position);

        if parse_integer_literal(self.source.value_of_span(span)).is_none() {
            return Err(self.error(
                span,
                format!(
                    "Malformed integer literal `{}`",
                    self.source.value_of_span(span)
                ),
            ));
        }

        Ok(Token {
            kind: TokenKind::IntegerLiteral,
            span,
        })
    }

    fn read_single(&mut self, kind: TokenKind) -> Token {
        let start_position = self.position;

        self.advance();

        Token {
            kind,
            span: self.new_span(start_position),
        }
    }

    fn read_double(&mut self, kind: TokenKind) -> Token {
        let start_position = self.position;

        self.advance();
        self.advance();

        Token {
            kind,
            span: self.new_span(start_position),
        }
    }

    fn new_span(&self, start: usize) -> Span {
        Span {
            start,
            end: self.position,
        }
    }

    pub fn peek(&mut self) -> Result<Option<Token>, CompileError> {
        if let Some(token) = self.peek_buffer.front() {
            return Ok(Some(*token));
        }

        if let Some(token) = self.lex_token()? {
            self.peek_buffer.push_back(token);
        }

        Ok(self.peek_buffer.front().copied())
    }

    pub fn next(&mut self) -> Result<Option<Token>, CompileError> {
        if let Some(token) = self.peek_buffer.pop_front() {
            return Ok(Some(token));
        }

        self.lex_token()
    }

    fn lex_token(&mut self) -> Result<Option<Token>, CompileError> {
        while let Some(c) = self.chars.peek().copied() {
            if !c.is_ascii() {
                let span = Span::new(self.position, self.position + c.len_utf8());
                return Err(self.error(
                    span,
                    format!("Unexpected non-ascii character in stream: `{c}`"),
                ));
            }

            let token = match c {
                // Ignore whitespace
                c if c.is_ascii_whitespace() => {
                    self.ignore_whitespace();
                    continue;
                }
                // Ignore comments
                '/' if self.next_is(1, '/') => {
                    self.ignore_line();
                    continue;
                }
                '/' if self.next_is(1, '*') => {
                    self.ignore_block_comment()?;
                    continue;
                }

                // Integer literals
                n if n.is_ascii_digit() => self.read_number()?,

                // Identifiers and keywords
                a if a.is_ascii_alphabetic() || a == '_' => self.read_word(),

                // Double Equals (==)
                '=' if self.next_is(1, '=') => self.read_double(TokenKind::DoubleEquals),
                // Not Equals (!=)
                '!' if self.next_is(1, '=') => self.read_double(TokenKind::NotEquals),
                // Less than or equal (<=)
                '<' if self.next_is(1, '=') => self.read_double(TokenKind::LessThanOrEqualTo),
                // Greater than or equal (>=)
                '>' if self.next_is(1, '=') => {
                    self.read_double(TokenKind::GreaterThanOrEqualTo)
                }
                // Logical And (&&)
                '&' if self.next_is(1, '&') => self.read_double(TokenKind::LogicalAnd),
                // Logical Or (||)
                '|' if self.next_is(1, '|') => self.read_double(TokenKind::LogicalOr),

                s if SINGLE_TOKENS.contains_key(&s) => self.read_single(SINGLE_TOKENS[&s]),
                c => {
                    return Err(self.error(
                        Span::new(self.position, self.position + 1),
                        format!("Unexpected character in stream: `{c}`"),
                    ));
                }
            };

            return Ok(Some(token));
        }

        Ok(None)
    }
}

/// Parses a decimal, octal (`017`) or hexadecimal (`0x1f`) literal. Returns
/// `None` for malformed text. Values too large for `u64` saturate to
/// `u64::MAX`, so range errors are left to whoever needs a narrower type.
pub fn parse_integer_literal(text: &str) -> Option<u64> {
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    Some(u64::from_str_radix(digits, radix).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let source = SourceFile::from_memory(text);
        let mut lexer = Lexer::new(&source);
        let mut kinds = Vec::new();

        while let Some(token) = lexer.next().unwrap() {
            kinds.push(token.kind);
        }

        kinds
    }

    fn lex_error(text: &str) -> String {
        let source = SourceFile::from_memory(text);
        let mut lexer = Lexer::new(&source);

        loop {
            match lexer.next() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("expected a lex error for {text:?}"),
                Err(error) => return error.to_string(),
            }
        }
    }

    #[test]
    fn lexes_function_header() {
        assert_eq!(
            kinds("int main() { return 0; }"),
            vec![
                TokenKind::Keyword(Keyword::Int),
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::OpenBrace,
                TokenKind::Keyword(Keyword::Return),
                TokenKind::IntegerLiteral,
                TokenKind::Semicolon,
                TokenKind::CloseBrace,
            ]
        );
    }

    #[test]
    fn prefers_two_character_operators() {
        assert_eq!(
            kinds("<= < >= > == != && || !"),
            vec![
                TokenKind::LessThanOrEqualTo,
                TokenKind::LessThan,
                TokenKind::GreaterThanOrEqualTo,
                TokenKind::GreaterThan,
                TokenKind::DoubleEquals,
                TokenKind::NotEquals,
                TokenKind::LogicalAnd,
                TokenKind::LogicalOr,
                TokenKind::Bang,
            ]
        );
    }

    #[test]
    fn skips_comments() {
        assert_eq!(
            kinds("1 // two\n/* three\n */ - 4"),
            vec![
                TokenKind::IntegerLiteral,
                TokenKind::Minus,
                TokenKind::IntegerLiteral,
            ]
        );
    }

    #[test]
    fn keywords_need_whole_words() {
        assert_eq!(
            kinds("returnx int_"),
            vec![TokenKind::Identifier, TokenKind::Identifier]
        );
    }

    #[test]
    fn peek_does_not_consume() {
        let source = SourceFile::from_memory("return");
        let mut lexer = Lexer::new(&source);

        let peeked = lexer.peek().unwrap();
        assert_eq!(peeked, lexer.next().unwrap());
        assert_eq!(lexer.next().unwrap(), None);
    }

    #[test]
    fn parses_literal_radixes() {
        assert_eq!(parse_integer_literal("0"), Some(0));
        assert_eq!(parse_integer_literal("42"), Some(42));
        assert_eq!(parse_integer_literal("017"), Some(15));
        assert_eq!(parse_integer_literal("0x1F"), Some(31));
        assert_eq!(parse_integer_literal("08"), None);
        assert_eq!(parse_integer_literal("0x"), None);
    }

    #[test]
    fn oversized_literals_saturate() {
        assert_eq!(parse_integer_literal("99999999999999999999"), Some(u64::MAX));
        assert_eq!(parse_integer_literal("0xffffffffffffffffff"), Some(u64::MAX));
        assert_eq!(kinds("99999999999999999999"), [TokenKind::IntegerLiteral]);
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(lex_error("1 & 2"), "Unexpected character in stream: `&`");
        assert_eq!(lex_error("1 | 2"), "Unexpected character in stream: `|`");
        assert_eq!(lex_error("12ab"), "Malformed integer literal `12ab`");
        assert_eq!(
            lex_error("/* never closed"),
            "Reached end of file while reading block comment"
        );
        assert_eq!(
            lex_error("return é"),
            "Unexpected non-ascii character in stream: `é`"
        );
    }
}
