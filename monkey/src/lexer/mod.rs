//! Lexer implementation using logos

mod token;

pub use token::{Token, TokenKind, lookup_ident};

use crate::ast::Span;
use logos::Logos;
use tracing::trace;

/// Raw lexemes recognised by the generated scanner.
///
/// Words are classified against the keyword table afterwards, and string
/// bodies are cut out of the quoted slice, so this enum stays small.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
enum Lexeme {
    #[regex("[a-zA-Z_]+")]
    Word,

    #[regex("[0-9]+")]
    Digits,

    #[token("\"", quoted)]
    Quoted,

    #[token("=", |_| TokenKind::Assign)]
    #[token("+", |_| TokenKind::Plus)]
    #[token("-", |_| TokenKind::Minus)]
    #[token("!", |_| TokenKind::Bang)]
    #[token("*", |_| TokenKind::Asterisk)]
    #[token("/", |_| TokenKind::Slash)]
    #[token("<", |_| TokenKind::Lt)]
    #[token(">", |_| TokenKind::Gt)]
    #[token("==", |_| TokenKind::Eq)]
    #[token("!=", |_| TokenKind::NotEq)]
    #[token(",", |_| TokenKind::Comma)]
    #[token(";", |_| TokenKind::Semicolon)]
    #[token(":", |_| TokenKind::Colon)]
    #[token("(", |_| TokenKind::LParen)]
    #[token(")", |_| TokenKind::RParen)]
    #[token("{", |_| TokenKind::LBrace)]
    #[token("}", |_| TokenKind::RBrace)]
    #[token("[", |_| TokenKind::LBracket)]
    #[token("]", |_| TokenKind::RBracket)]
    Punct(TokenKind),
}

/// Extend a string lexeme up to and including the closing quote, or to the
/// end of input when the string is unterminated. No escapes are decoded.
fn quoted(lex: &mut logos::Lexer<Lexeme>) {
    let rest = lex.remainder();
    let len = rest.find('"').map_or(rest.len(), |close| close + 1);
    lex.bump(len);
}

/// Lazy token stream over a source string.
///
/// Once the input is exhausted every further call yields an `EOF` token.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, Lexeme>,
    len: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: Lexeme::lexer(source),
            len: source.len(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        let Some(result) = self.inner.next() else {
            return Token::new(TokenKind::Eof, "", Span::point(self.len));
        };

        let span = Span::from(self.inner.span());
        let slice = self.inner.slice();
        let token = match result {
            Ok(Lexeme::Word) => Token::new(lookup_ident(slice), slice, span),
            Ok(Lexeme::Digits) => Token::new(TokenKind::Int, slice, span),
            Ok(Lexeme::Quoted) => {
                let body = &slice[1..];
                let body = body.strip_suffix('"').unwrap_or(body);
                Token::new(TokenKind::String, body, span)
            }
            Ok(Lexeme::Punct(kind)) => Token::new(kind, slice, span),
            Err(()) => Token::new(TokenKind::Illegal, slice, span),
        };

        trace!(kind = %token.kind, literal = %token.literal, %span, "token");
        token
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

/// Collect every token before `EOF`
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\r\n ").is_empty());
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        for _ in 0..3 {
            let eof = lexer.next_token();
            assert_eq!(eof.kind, TokenKind::Eof);
            assert_eq!(eof.span, Span::point(1));
        }
    }

    #[test]
    fn test_full_program() {
        let input = r#"let five = 5;
let add = fn(x, y) {
  x + y;
};
let result = add(five, 10);
!-/*5;
5 < 10 > 5;
if (5 < 10) {
    return true;
} else {
    return false;
}
10 == 10;
10 != 9;
"foobar"
"foo bar"
[1, 2];
{"foo": "bar"}
"#;
        let expected: Vec<(TokenKind, &str)> = vec![
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "five"),
            (TokenKind::Assign, "="),
            (TokenKind::Int, "5"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "add"),
            (TokenKind::Assign, "="),
            (TokenKind::Function, "fn"),
            (TokenKind::LParen, "("),
            (TokenKind::Ident, "x"),
            (TokenKind::Comma, ","),
            (TokenKind::Ident, "y"),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Ident, "x"),
            (TokenKind::Plus, "+"),
            (TokenKind::Ident, "y"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "result"),
            (TokenKind::Assign, "="),
            (TokenKind::Ident, "add"),
            (TokenKind::LParen, "("),
            (TokenKind::Ident, "five"),
            (TokenKind::Comma, ","),
            (TokenKind::Int, "10"),
            (TokenKind::RParen, ")"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Bang, "!"),
            (TokenKind::Minus, "-"),
            (TokenKind::Slash, "/"),
            (TokenKind::Asterisk, "*"),
            (TokenKind::Int, "5"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Int, "5"),
            (TokenKind::Lt, "<"),
            (TokenKind::Int, "10"),
            (TokenKind::Gt, ">"),
            (TokenKind::Int, "5"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::If, "if"),
            (TokenKind::LParen, "("),
            (TokenKind::Int, "5"),
            (TokenKind::Lt, "<"),
            (TokenKind::Int, "10"),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Return, "return"),
            (TokenKind::True, "true"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Else, "else"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Return, "return"),
            (TokenKind::False, "false"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Int, "10"),
            (TokenKind::Eq, "=="),
            (TokenKind::Int, "10"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Int, "10"),
            (TokenKind::NotEq, "!="),
            (TokenKind::Int, "9"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::String, "foobar"),
            (TokenKind::String, "foo bar"),
            (TokenKind::LBracket, "["),
            (TokenKind::Int, "1"),
            (TokenKind::Comma, ","),
            (TokenKind::Int, "2"),
            (TokenKind::RBracket, "]"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::LBrace, "{"),
            (TokenKind::String, "foo"),
            (TokenKind::Colon, ":"),
            (TokenKind::String, "bar"),
            (TokenKind::RBrace, "}"),
        ];

        let tokens = tokenize(input);
        assert_eq!(tokens.len(), expected.len());
        for (i, (token, (kind, literal))) in tokens.iter().zip(&expected).enumerate() {
            assert_eq!(token.kind, *kind, "token {i}");
            assert_eq!(token.literal, *literal, "token {i}");
        }
    }

    #[test]
    fn test_identifiers_stop_at_digits() {
        let tokens = tokenize("x1 foo_bar");
        let pairs: Vec<_> = tokens.iter().map(|t| (t.kind, t.literal.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                (TokenKind::Ident, "x"),
                (TokenKind::Int, "1"),
                (TokenKind::Ident, "foo_bar"),
            ]
        );
    }

    #[test]
    fn test_negative_number_is_two_tokens() {
        assert_eq!(kinds("-5"), vec![TokenKind::Minus, TokenKind::Int]);
    }

    #[test]
    fn test_strings_are_verbatim() {
        let tokens = tokenize(r#""a\nb" "" "unterminated"#);
        let literals: Vec<_> = tokens.iter().map(|t| t.literal.as_str()).collect();
        assert_eq!(literals, vec![r"a\nb", "", "unterminated"]);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::String));
    }

    #[test]
    fn test_illegal_characters_pass_through() {
        let tokens = tokenize("a @ b");
        assert_eq!(tokens[1].kind, TokenKind::Illegal);
        assert_eq!(tokens[1].literal, "@");
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }

    #[test]
    fn test_spans_are_byte_ranges() {
        let tokens = tokenize("let ab = 10;");
        let spans: Vec<_> = tokens.iter().map(|t| t.span.to_string()).collect();
        assert_eq!(spans, vec!["0..3", "4..6", "7..8", "9..11", "11..12"]);
    }
}
