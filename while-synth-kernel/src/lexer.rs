//! Hand-rolled scanner for the While language.
//!
//! The grammar has a half-dozen fixed token shapes and no nesting-sensitive
//! lexical rules, so a regex engine buys nothing here; this mirrors the
//! teacher's own preference for a direct byte-scan over `bumpalo`/regex
//! machinery where the token set is small and fixed.

use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::token::{ArithOp, RelOp, Span, Token, TokenKind};

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer { source, bytes: source.as_bytes(), pos: 0 }
    }

    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = matches!(tok.kind, TokenKind::Eof);
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();
        let start = self.pos;

        let Some(b) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, Span::new(start, start)));
        };

        // `??` hole
        if b == b'?' && self.peek_at(1) == Some(b'?') {
            self.pos += 2;
            return Ok(Token::new(TokenKind::Hole, Span::new(start, self.pos)));
        }

        // Signed or unsigned integer literal: a leading sign counts only
        // when immediately (no whitespace) followed by a digit, matching
        // the original grammar's `[+\-]?\d+` lexeme, which otherwise falls
        // back to the single-character arithmetic operator.
        if (b == b'+' || b == b'-') && matches!(self.peek_at(1), Some(d) if d.is_ascii_digit()) {
            self.pos += 1;
            return self.scan_number(start, b == b'-');
        }
        if b.is_ascii_digit() {
            return self.scan_number(start, false);
        }

        if is_ident_start(b) {
            return Ok(self.scan_ident_or_keyword(start));
        }

        match b {
            b':' if self.peek_at(1) == Some(b'=') => {
                self.pos += 2;
                Ok(Token::new(TokenKind::Assign, Span::new(start, self.pos)))
            }
            b';' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::Semicolon, Span::new(start, self.pos)))
            }
            b'(' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::LParen, Span::new(start, self.pos)))
            }
            b')' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::RParen, Span::new(start, self.pos)))
            }
            b'+' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::Arith(ArithOp::Add), Span::new(start, self.pos)))
            }
            b'-' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::Arith(ArithOp::Sub), Span::new(start, self.pos)))
            }
            b'*' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::Arith(ArithOp::Mul), Span::new(start, self.pos)))
            }
            b'/' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::Arith(ArithOp::Div), Span::new(start, self.pos)))
            }
            b'=' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::Rel(RelOp::Eq), Span::new(start, self.pos)))
            }
            b'!' if self.peek_at(1) == Some(b'=') => {
                self.pos += 2;
                Ok(Token::new(TokenKind::Rel(RelOp::NotEq), Span::new(start, self.pos)))
            }
            b'<' if self.peek_at(1) == Some(b'=') => {
                self.pos += 2;
                Ok(Token::new(TokenKind::Rel(RelOp::LtEq), Span::new(start, self.pos)))
            }
            b'>' if self.peek_at(1) == Some(b'=') => {
                self.pos += 2;
                Ok(Token::new(TokenKind::Rel(RelOp::GtEq), Span::new(start, self.pos)))
            }
            b'<' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::Rel(RelOp::Lt), Span::new(start, self.pos)))
            }
            b'>' => {
                self.pos += 1;
                Ok(Token::new(TokenKind::Rel(RelOp::Gt), Span::new(start, self.pos)))
            }
            other => Err(ParseError::new(
                ParseErrorKind::UnexpectedChar(other as char),
                Span::new(start, start + 1),
            )),
        }
    }

    fn scan_number(&mut self, start: usize, _negative: bool) -> ParseResult<Token> {
        let digits_start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == digits_start {
            return Err(ParseError::new(ParseErrorKind::UnterminatedNumber, Span::new(start, self.pos)));
        }
        let text = &self.source[start..self.pos];
        let value: i64 = text
            .parse()
            .map_err(|_| ParseError::new(ParseErrorKind::UnterminatedNumber, Span::new(start, self.pos)))?;
        Ok(Token::new(TokenKind::Number(value), Span::new(start, self.pos)))
    }

    fn scan_ident_or_keyword(&mut self, start: usize) -> Token {
        while matches!(self.peek(), Some(b) if is_ident_continue(b)) {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        let kind = match text {
            "skip" => TokenKind::Skip,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "assert" => TokenKind::Assert,
            _ => TokenKind::Ident(text.to_string()),
        };
        Token::new(kind, Span::new(start, self.pos))
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_simple_assignment() {
        assert_eq!(
            kinds("a := 6"),
            vec![TokenKind::Ident("a".into()), TokenKind::Assign, TokenKind::Number(6), TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_hole() {
        assert_eq!(kinds("a := ??"), vec![
            TokenKind::Ident("a".into()),
            TokenKind::Assign,
            TokenKind::Hole,
            TokenKind::Eof
        ]);
    }

    #[test]
    fn keyword_not_matched_as_prefix_of_identifier() {
        assert_eq!(kinds("ifx := 1"), vec![
            TokenKind::Ident("ifx".into()),
            TokenKind::Assign,
            TokenKind::Number(1),
            TokenKind::Eof
        ]);
    }

    #[test]
    fn signed_number_only_when_adjacent_to_sign() {
        assert_eq!(
            kinds("a + -3"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Arith(ArithOp::Add),
                TokenKind::Number(-3),
                TokenKind::Eof
            ]
        );
        assert_eq!(
            kinds("a - 3"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Arith(ArithOp::Sub),
                TokenKind::Number(3),
                TokenKind::Eof
            ]
        );
    }
}
