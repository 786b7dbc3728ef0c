//! Recursive-descent parser for the While language.
//!
//! The grammar (see crate root docs) is unambiguous and has no backtracking
//! points, so this is a plain `Vec<Token>` + cursor walk rather than the
//! arena/checkpoint machinery a backtracking grammar would need.

use crate::ast::{Expr, Stmt};
use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub fn parse(source: &str) -> ParseResult<Stmt> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let stmt = parser.parse_s()?;
    parser.expect_eof()?;
    Ok(stmt)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn span(&self) -> crate::token::Span {
        self.tokens[self.pos].span
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> ParseResult<()> {
        if self.peek() == kind {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedToken { expected, found: self.peek().clone() },
                self.span(),
            ))
        }
    }

    fn expect_eof(&mut self) -> ParseResult<()> {
        if matches!(self.peek(), TokenKind::Eof) {
            Ok(())
        } else {
            Err(ParseError::new(ParseErrorKind::TrailingInput, self.span()))
        }
    }

    /// `S → S1 | S1 ';' S`
    fn parse_s(&mut self) -> ParseResult<Stmt> {
        let first = self.parse_s1()?;
        if matches!(self.peek(), TokenKind::Semicolon) {
            self.advance();
            let rest = self.parse_s()?;
            Ok(Stmt::seq(first, rest))
        } else {
            Ok(first)
        }
    }

    /// `S1 → skip | id ':=' E | if E then S else S1 | while E do S1 | '(' S ')' | assert E`
    fn parse_s1(&mut self) -> ParseResult<Stmt> {
        match self.peek().clone() {
            TokenKind::Skip => {
                self.advance();
                Ok(Stmt::Skip)
            }
            TokenKind::Ident(name) => {
                self.advance();
                self.expect(&TokenKind::Assign, "':='")?;
                let value = self.parse_e()?;
                Ok(Stmt::Assign { target: name, value })
            }
            TokenKind::If => {
                self.advance();
                let cond = self.parse_cond()?;
                self.expect(&TokenKind::Then, "'then'")?;
                let then_branch = self.parse_s()?;
                self.expect(&TokenKind::Else, "'else'")?;
                let else_branch = self.parse_s1()?;
                Ok(Stmt::if_then_else(cond, then_branch, else_branch))
            }
            TokenKind::While => {
                self.advance();
                let cond = self.parse_cond()?;
                self.expect(&TokenKind::Do, "'do'")?;
                let body = self.parse_s1()?;
                Ok(Stmt::while_do(cond, body))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_s()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Assert => {
                self.advance();
                let prop = self.parse_e()?;
                Ok(Stmt::Assert(prop))
            }
            _ => Err(ParseError::new(ParseErrorKind::ExpectedStatement, self.span())),
        }
    }

    /// Parses an `E` that must come out as a relational node, for `if`/`while`
    /// conditions (spec §3's "conditions are relational" invariant).
    fn parse_cond(&mut self) -> ParseResult<Expr> {
        let span = self.span();
        let e = self.parse_e()?;
        if matches!(e, Expr::Rel { .. }) {
            Ok(e)
        } else {
            Err(ParseError::new(ParseErrorKind::ExpectedRelationalCondition, span))
        }
    }

    /// `E → E0 | E0 op E0`
    fn parse_e(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_e0()?;
        match self.peek().clone() {
            TokenKind::Arith(op) => {
                self.advance();
                let rhs = self.parse_e0()?;
                Ok(Expr::arith(op, lhs, rhs))
            }
            TokenKind::Rel(op) => {
                self.advance();
                let rhs = self.parse_e0()?;
                Ok(Expr::rel(op, lhs, rhs))
            }
            _ => Ok(lhs),
        }
    }

    /// `E0 → id | num | '??' | '(' E ')'`
    fn parse_e0(&mut self) -> ParseResult<Expr> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::ident(name))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::num(n))
            }
            TokenKind::Hole => {
                self.advance();
                Ok(Expr::Hole)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_e()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(ParseError::new(ParseErrorKind::ExpectedExpression, self.span())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{ArithOp, RelOp};

    #[test]
    fn parses_simple_assignment() {
        let ast = parse("a := 6").unwrap();
        assert_eq!(ast, Stmt::Assign { target: "a".into(), value: Expr::num(6) });
    }

    #[test]
    fn parses_sequence_right_associated() {
        let ast = parse("a := 1; b := 2; c := 3").unwrap();
        assert_eq!(
            ast,
            Stmt::seq(
                Stmt::Assign { target: "a".into(), value: Expr::num(1) },
                Stmt::seq(
                    Stmt::Assign { target: "b".into(), value: Expr::num(2) },
                    Stmt::Assign { target: "c".into(), value: Expr::num(3) },
                )
            )
        );
    }

    #[test]
    fn parses_if_then_else() {
        let ast = parse("if a < b then a := 1 else a := 2").unwrap();
        assert_eq!(
            ast,
            Stmt::if_then_else(
                Expr::rel(RelOp::Lt, Expr::ident("a"), Expr::ident("b")),
                Stmt::Assign { target: "a".into(), value: Expr::num(1) },
                Stmt::Assign { target: "a".into(), value: Expr::num(2) },
            )
        );
    }

    #[test]
    fn parses_while_with_parenthesized_body() {
        let ast = parse("while b > 0 do (a := a + 1; b := b - 1)").unwrap();
        assert_eq!(
            ast,
            Stmt::while_do(
                Expr::rel(RelOp::Gt, Expr::ident("b"), Expr::num(0)),
                Stmt::seq(
                    Stmt::Assign {
                        target: "a".into(),
                        value: Expr::arith(ArithOp::Add, Expr::ident("a"), Expr::num(1)),
                    },
                    Stmt::Assign {
                        target: "b".into(),
                        value: Expr::arith(ArithOp::Sub, Expr::ident("b"), Expr::num(1)),
                    },
                )
            )
        );
    }

    #[test]
    fn rejects_non_relational_condition() {
        assert!(parse("if a + 1 then a := 1 else a := 2").is_err());
    }

    #[test]
    fn rejects_chained_operators() {
        assert!(parse("a := 1 + 2 + 3").is_err());
    }

    #[test]
    fn rejects_trailing_input() {
        assert!(parse("a := 1 b := 2").is_err());
    }

    #[test]
    fn parses_hole_and_assert() {
        let ast = parse("a := ??; assert a = 2").unwrap();
        assert_eq!(
            ast,
            Stmt::seq(
                Stmt::Assign { target: "a".into(), value: Expr::Hole },
                Stmt::Assert(Expr::rel(RelOp::Eq, Expr::ident("a"), Expr::num(2))),
            )
        );
    }
}
