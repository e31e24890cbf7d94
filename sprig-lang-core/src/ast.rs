use std::fmt::Display;

use crate::lexer::Span;

#[derive(Debug, PartialEq)]
pub struct Program {
    pub body: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    VarDeclaration(VarDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    Expression(Expression),
}

#[derive(Debug, PartialEq, Clone)]
pub struct VarDeclaration {
    pub constant: bool,
    pub name: String,
    pub value: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionDeclaration {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExpressionKind {
    NumericLiteral(f64),
    Identifier(String),
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Assign {
        target: Box<Expression>,
        value: Box<Expression>,
    },
    ObjectLiteral(Vec<Property>),
    Member {
        object: Box<Expression>,
        property: Box<Expression>,
        computed: bool,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

/// An object literal entry. `value: None` is the shorthand form, resolved
/// by looking the key up in the current scope at evaluation time.
#[derive(Debug, PartialEq, Clone)]
pub struct Property {
    pub key: String,
    pub value: Option<Expression>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    pub fn to_str(self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
        }
    }

    pub fn from_str(text: &str) -> Option<Self> {
        use BinaryOperator::*;
        match text {
            "+" => Some(Plus),
            "-" => Some(Minus),
            "*" => Some(Multiply),
            "/" => Some(Divide),
            "%" => Some(Modulo),
            _ => None,
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.body {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;
        match self {
            VarDeclaration(declaration) => write!(f, "{}", declaration),
            FunctionDeclaration(declaration) => write!(f, "{}", declaration),
            Expression(expression) => write!(f, "{};", expression),
        }
    }
}

impl Display for VarDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keyword = if self.constant { "const" } else { "let" };
        match &self.value {
            Some(value) => write!(f, "{} {} = {};", keyword, self.name, value),
            None => write!(f, "{} {};", keyword, self.name),
        }
    }
}

impl Display for FunctionDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn {}({}) {{", self.name, self.parameters.join(", "))?;
        for statement in &self.body {
            write!(f, " {}", statement)?;
        }
        write!(f, " }}")
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ExpressionKind::*;
        match &self.kind {
            NumericLiteral(value) => write!(f, "{}", value),
            Identifier(name) => write!(f, "{}", name),
            Binary {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator.to_str(), right),
            Assign { target, value } => write!(f, "({} = {})", target, value),
            ObjectLiteral(properties) => {
                write!(f, "{{")?;
                for (i, property) in properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", property)?;
                }
                write!(f, "}}")
            }
            Member {
                object,
                property,
                computed,
            } => {
                if *computed {
                    write!(f, "({}[{}])", object, property)
                } else {
                    write!(f, "({}.{})", object, property)
                }
            }
            Call { callee, arguments } => {
                write!(
                    f,
                    "{}({})",
                    callee,
                    arguments
                        .iter()
                        .map(|argument| argument.to_string())
                        .collect::<Vec<String>>()
                        .join(", ")
                )
            }
        }
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {}", self.key, value),
            None => write!(f, "{}", self.key),
        }
    }
}
