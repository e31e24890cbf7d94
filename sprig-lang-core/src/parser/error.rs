use crate::lexer::{Span, Token, TokenKind};
use thiserror::Error;

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found:?} at {span}", found = .got.text, span = .got.span)]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("constant {name:?} declared without a value at {span}")]
    ConstantWithoutInitializer { name: String, span: Span },
    #[error("function parameter must be a plain identifier at {span}")]
    NonIdentifierParameter { span: Span },
    #[error("dot access requires an identifier on the right at {span}")]
    NonIdentifierProperty { span: Span },
    #[error("invalid numeric literal {text:?} at {span}")]
    InvalidNumber { text: String, span: Span },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{:?}", kind),
            Expected::Identifier => write!(f, "an identifier"),
            Expected::Expression => write!(f, "an expression"),
        }
    }
}

impl ParseError {
    pub fn unexpected_token(expected: TokenKind, got: Token) -> Self {
        ParseError::UnexpectedToken {
            expected: Expected::Token(expected),
            got,
        }
    }

    pub fn unexpected_other(expected: Expected, got: Token) -> Self {
        ParseError::UnexpectedToken { expected, got }
    }
}
