use crate::ast::{ExpressionKind, FunctionDeclaration, Statement, VarDeclaration};
use crate::lexer::TokenKind;
use crate::parser::expressions::{parse_arguments, parse_expression};
use crate::parser::{ParseError, Parser};

pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    match parser.at().kind {
        TokenKind::Let | TokenKind::Const => {
            Ok(Statement::VarDeclaration(parse_var_declaration(parser)?))
        }
        TokenKind::Fn => Ok(Statement::FunctionDeclaration(parse_function_declaration(
            parser,
        )?)),
        _ => {
            let expression = parse_expression(parser)?;
            // A semicolon after an expression statement is an optional
            // terminator.
            if parser.at().kind == TokenKind::SemiColon {
                parser.advance();
            }
            Ok(Statement::Expression(expression))
        }
    }
}

fn parse_var_declaration(parser: &mut Parser) -> Result<VarDeclaration, ParseError> {
    let keyword = parser.advance();
    let constant = keyword.kind == TokenKind::Const;
    let name = parser.parse_ident()?;

    if parser.at().kind == TokenKind::SemiColon {
        parser.advance();
        if constant {
            return Err(ParseError::ConstantWithoutInitializer {
                name: name.text,
                span: keyword.span,
            });
        }
        return Ok(VarDeclaration {
            constant: false,
            name: name.text,
            value: None,
            span: keyword.span,
        });
    }

    parser.expect(TokenKind::Equals)?;
    let value = parse_expression(parser)?;
    parser.expect(TokenKind::SemiColon)?;

    Ok(VarDeclaration {
        constant,
        name: name.text,
        value: Some(value),
        span: keyword.span,
    })
}

fn parse_function_declaration(parser: &mut Parser) -> Result<FunctionDeclaration, ParseError> {
    let keyword = parser.advance();
    let name = parser.parse_ident()?;

    // The argument list is parsed as expressions and each must reduce to a
    // bare identifier.
    let arguments = parse_arguments(parser)?;
    let mut parameters = Vec::with_capacity(arguments.len());
    for argument in arguments {
        match argument.kind {
            ExpressionKind::Identifier(parameter) => parameters.push(parameter),
            _ => {
                return Err(ParseError::NonIdentifierParameter {
                    span: argument.span,
                })
            }
        }
    }

    parser.expect(TokenKind::OpenBrace)?;
    let mut body = Vec::new();
    while !matches!(
        parser.at().kind,
        TokenKind::CloseBrace | TokenKind::EndOfInput
    ) {
        body.push(parse_statement(parser)?);
    }
    parser.expect(TokenKind::CloseBrace)?;

    Ok(FunctionDeclaration {
        name: name.text,
        parameters,
        body,
        span: keyword.span,
    })
}
