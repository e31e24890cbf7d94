pub mod error;
pub mod expressions;
pub mod statements;

use crate::ast::Program;
use crate::lexer::{Token, TokenKind};
pub use error::ParseError;
use statements::parse_statement;

/// Recursive-descent parser with one token of lookahead. The first error
/// aborts with no partial result; the parser is not resumable.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// `tokens` must be `tokenize` output: non-empty, `EndOfInput` last.
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last(),
            Some(Token {
                kind: TokenKind::EndOfInput,
                ..
            })
        ));
        Self {
            tokens,
            position: 0,
        }
    }

    pub(crate) fn at(&self) -> &Token {
        &self.tokens[self.position]
    }

    /// Consumes and returns the current token. `EndOfInput` is sticky, so
    /// lookahead never runs off the end of the stream.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if token.kind != TokenKind::EndOfInput {
            self.position += 1;
        }
        token
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.advance();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(ParseError::unexpected_token(kind, token))
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Token, ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Identifier => Ok(token),
            _ => Err(ParseError::unexpected_other(
                error::Expected::Identifier,
                token,
            )),
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        while self.at().kind != TokenKind::EndOfInput {
            body.push(parse_statement(self)?);
        }
        Ok(Program { body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(input: &str) -> Result<Program, ParseError> {
        Parser::new(tokenize(input).unwrap()).parse_program()
    }

    fn test_parsing(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            let program = parse(input).unwrap();
            assert_eq!(program.to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_arithmetic_precedence() {
        let tests = vec![
            ("2 + 3 * 4", "(2 + (3 * 4));\n"),
            ("(2 + 3) * 4", "((2 + 3) * 4);\n"),
            ("1 - 2 + 3", "((1 - 2) + 3);\n"),
            ("a * b / c % d", "(((a * b) / c) % d);\n"),
            ("a + b / c", "(a + (b / c));\n"),
        ];
        test_parsing(tests);
    }

    #[test]
    fn test_multiplicative_right_operand_is_full_chain() {
        let tests = vec![
            ("3 * two()", "(3 * two());\n"),
            ("2 * a.b", "(2 * (a.b));\n"),
        ];
        test_parsing(tests);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let tests = vec![
            ("x = 5", "(x = 5);\n"),
            ("a = b = 5", "(a = (b = 5));\n"),
            // A non-identifier target parses; it fails at evaluation time.
            ("1 = 2", "(1 = 2);\n"),
        ];
        test_parsing(tests);
    }

    #[test]
    fn test_var_declarations() {
        let tests = vec![
            ("let x = 5;", "let x = 5;\n"),
            ("let x;", "let x;\n"),
            ("const pi = 3.14;", "const pi = 3.14;\n"),
            ("let o = { a: 5, b };", "let o = {a: 5, b};\n"),
            ("let o = {};", "let o = {};\n"),
        ];
        test_parsing(tests);
    }

    #[test]
    fn test_function_declaration() {
        let tests = vec![
            ("fn add(a, b) { a + b }", "fn add(a, b) { (a + b); }\n"),
            ("fn nothing() {}", "fn nothing() { }\n"),
            (
                "fn outer() { let x = 1; fn inner() { x } inner }",
                "fn outer() { let x = 1; fn inner() { x; } inner; }\n",
            ),
        ];
        test_parsing(tests);
    }

    #[test]
    fn test_call_and_member_chains() {
        let tests = vec![
            ("f()", "f();\n"),
            ("f()()", "f()();\n"),
            ("add(1, 2 + 3)", "add(1, (2 + 3));\n"),
            ("a.b", "(a.b);\n"),
            ("a.b[c]", "((a.b)[c]);\n"),
            ("a[1 + 2].b", "((a[(1 + 2)]).b);\n"),
            ("point.x = 5", "((point.x) = 5);\n"),
        ];
        test_parsing(tests);
    }

    #[test]
    fn test_expression_statement_terminator() {
        let tests = vec![
            ("y;", "y;\n"),
            ("x = 2;", "(x = 2);\n"),
            ("1; 2; 3", "1;\n2;\n3;\n"),
        ];
        test_parsing(tests);
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let input = "let x = 1; fn f(a) { a * x } f(2 + 3);";
        let first = parse(input).unwrap();
        let second = parse(input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_const_requires_initializer() {
        assert!(matches!(
            parse("const x;"),
            Err(ParseError::ConstantWithoutInitializer { .. })
        ));
    }

    #[test]
    fn test_function_parameters_must_be_identifiers() {
        assert!(matches!(
            parse("fn f(1) {}"),
            Err(ParseError::NonIdentifierParameter { .. })
        ));
        assert!(matches!(
            parse("fn f(a + b) {}"),
            Err(ParseError::NonIdentifierParameter { .. })
        ));
    }

    #[test]
    fn test_dot_requires_identifier() {
        assert!(matches!(
            parse("a.1"),
            Err(ParseError::NonIdentifierProperty { .. })
        ));
    }

    #[test]
    fn test_unexpected_token_aborts() {
        assert!(matches!(
            parse("let 5 = 3;"),
            Err(ParseError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse("let x = ;"),
            Err(ParseError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse("(1 + 2"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }
}
