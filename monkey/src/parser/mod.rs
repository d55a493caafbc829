//! Pratt parser
//!
//! Two tokens of lookahead (`cur`, `peek`) advance in lock-step. Each
//! malformed construct records a [`ParseError`] and yields `None`; the
//! parser moves on to the next statement without further recovery, so one
//! mistake may produce several messages.

use crate::ast::{
    BlockStatement, Expression, FunctionLiteral, Identifier, InfixOperator, PrefixOperator,
    Program, Statement,
};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};
use std::rc::Rc;
use tracing::trace;


/// Stack growth for deeply nested expressions
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Binding power, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl Precedence {
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            TokenKind::LBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    cur: Token,
    peek: Token,
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    pub fn new(mut lexer: Lexer<'src>) -> Self {
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            cur,
            peek,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Parse statements until `EOF`. Check [`Parser::errors`] before using
    /// the result.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.cur.is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }
        Program { statements }
    }

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.cur = std::mem::replace(&mut self.peek, next);
    }

    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek.is(kind) {
            self.next_token();
            Some(())
        } else {
            self.errors.push(ParseError::unexpected_token(
                kind,
                self.peek.kind,
                self.peek.span,
            ));
            None
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek.is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    // ============================================
    // Statements
    // ============================================

    fn parse_statement(&mut self) -> Option<Statement> {
        trace!(token = %self.cur.kind, "statement");
        match self.cur.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();
        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier::new(self.cur.clone());
        self.expect_peek(TokenKind::Assign)?;
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.cur.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Expression { token, expression })
    }

    /// Statements up to the closing `}` (or `EOF`). `cur` is the `{`.
    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.cur.clone();
        let mut statements = Vec::new();
        self.next_token();
        while !self.cur.is(TokenKind::RBrace) && !self.cur.is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }
        BlockStatement { token, statements }
    }

    // ============================================
    // Expressions
    // ============================================

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.parse_expression_inner(precedence)
        })
    }

    fn parse_expression_inner(&mut self, precedence: Precedence) -> Option<Expression> {
        trace!(?precedence, token = %self.cur.kind, "expression");
        let mut left = self.parse_prefix()?;

        while !self.peek.is(TokenKind::Semicolon) && precedence < Precedence::of(self.peek.kind)
        {
            self.next_token();
            left = match self.cur.kind {
                TokenKind::LParen => self.parse_call_expression(left)?,
                TokenKind::LBracket => self.parse_index_expression(left)?,
                _ => self.parse_infix_expression(left)?,
            };
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur.kind {
            TokenKind::Ident => Some(Expression::Identifier(Identifier::new(self.cur.clone()))),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::String => Some(Expression::String {
                token: self.cur.clone(),
                value: self.cur.literal.clone(),
            }),
            TokenKind::True | TokenKind::False => Some(Expression::Boolean {
                token: self.cur.clone(),
                value: self.cur.is(TokenKind::True),
            }),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            kind => {
                self.errors
                    .push(ParseError::no_prefix_parse_fn(kind, self.cur.span));
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.cur.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer {
                token: self.cur.clone(),
                value,
            }),
            Err(_) => {
                self.errors
                    .push(ParseError::invalid_integer(&self.cur.literal, self.cur.span));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur.clone();
        let operator = PrefixOperator::from_token(token.kind)?;
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur.clone();
        let operator = InfixOperator::from_token(token.kind)?;
        let precedence = Precedence::of(token.kind);
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Some(expression)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.cur.clone();
        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement();

        let alternative = if self.peek.is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.cur.clone();
        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_delimited(TokenKind::RParen, Self::parse_parameter)?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement();
        Some(Expression::Function(FunctionLiteral {
            token,
            parameters: Rc::new(parameters),
            body: Rc::new(body),
        }))
    }

    fn parse_parameter(&mut self) -> Option<Identifier> {
        if self.cur.is(TokenKind::Ident) {
            Some(Identifier::new(self.cur.clone()))
        } else {
            self.errors.push(ParseError::unexpected_token(
                TokenKind::Ident,
                self.cur.kind,
                self.cur.span,
            ));
            None
        }
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.cur.clone();
        let arguments = self.parse_delimited(TokenKind::RParen, Self::parse_list_item)?;
        Some(Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur.clone();
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RBracket)?;
        Some(Expression::Index {
            token,
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.cur.clone();
        let elements = self.parse_delimited(TokenKind::RBracket, Self::parse_list_item)?;
        Some(Expression::Array { token, elements })
    }

    /// `{k: v, ...}`; a trailing comma before `}` is accepted
    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.cur.clone();
        let mut pairs = Vec::new();

        while !self.peek.is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            self.expect_peek(TokenKind::Colon)?;
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek.is(TokenKind::RBrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }
        self.expect_peek(TokenKind::RBrace)?;

        Some(Expression::Hash { token, pairs })
    }

    fn parse_list_item(&mut self) -> Option<Expression> {
        self.parse_expression(Precedence::Lowest)
    }

    /// Comma-separated items up to `end`. `cur` is the opening delimiter;
    /// `item` starts with `cur` on the item's first token.
    fn parse_delimited<T>(
        &mut self,
        end: TokenKind,
        mut item: impl FnMut(&mut Self) -> Option<T>,
    ) -> Option<Vec<T>> {
        let mut items = Vec::new();
        if self.peek.is(end) {
            self.next_token();
            return Some(items);
        }

        self.next_token();
        items.push(item(self)?);
        while self.peek.is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            items.push(item(self)?);
        }
        self.expect_peek(end)?;

        Some(items)
    }
}

/// Parse a complete source text
pub fn parse(source: &str) -> Result<Program, Vec<ParseError>> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    if parser.errors().is_empty() {
        Ok(program)
    } else {
        Err(parser.into_errors())
    }
}
