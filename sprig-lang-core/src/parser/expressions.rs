use crate::ast::{BinaryOperator, Expression, ExpressionKind, Property};
use crate::lexer::{Token, TokenKind};
use crate::parser::error::Expected;
use crate::parser::{ParseError, Parser};

pub fn parse_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    parse_assignment(parser)
}

/// Right-associative; target validity is checked at evaluation time.
fn parse_assignment(parser: &mut Parser) -> Result<Expression, ParseError> {
    let target = parse_object_literal(parser)?;

    if parser.at().kind == TokenKind::Equals {
        parser.advance();
        let value = parse_assignment(parser)?;
        let span = target.span;
        return Ok(Expression::new(
            ExpressionKind::Assign {
                target: Box::new(target),
                value: Box::new(value),
            },
            span,
        ));
    }

    Ok(target)
}

fn parse_object_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    if parser.at().kind != TokenKind::OpenBrace {
        return parse_additive(parser);
    }
    let open = parser.advance();

    let mut properties = Vec::new();
    while !matches!(
        parser.at().kind,
        TokenKind::CloseBrace | TokenKind::EndOfInput
    ) {
        let key = parser.parse_ident()?;

        // Shorthand property: `{ key }` or `{ key, ... }`.
        match parser.at().kind {
            TokenKind::Comma => {
                parser.advance();
                properties.push(Property {
                    key: key.text,
                    value: None,
                });
                continue;
            }
            TokenKind::CloseBrace => {
                properties.push(Property {
                    key: key.text,
                    value: None,
                });
                continue;
            }
            _ => {}
        }

        parser.expect(TokenKind::Colon)?;
        let value = parse_expression(parser)?;
        properties.push(Property {
            key: key.text,
            value: Some(value),
        });

        if parser.at().kind != TokenKind::CloseBrace {
            parser.expect(TokenKind::Comma)?;
        }
    }
    parser.expect(TokenKind::CloseBrace)?;

    Ok(Expression::new(
        ExpressionKind::ObjectLiteral(properties),
        open.span,
    ))
}

fn binary_operator(token: &Token) -> Option<BinaryOperator> {
    if token.kind != TokenKind::BinaryOperator {
        return None;
    }
    BinaryOperator::from_str(&token.text)
}

fn parse_additive(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut left = parse_multiplicative(parser)?;

    loop {
        let operator = match binary_operator(parser.at()) {
            Some(operator @ (BinaryOperator::Plus | BinaryOperator::Minus)) => operator,
            _ => break,
        };
        parser.advance();
        let right = parse_multiplicative(parser)?;
        let span = left.span;
        left = Expression::new(
            ExpressionKind::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        );
    }

    Ok(left)
}

fn parse_multiplicative(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut left = parse_call_member(parser)?;

    loop {
        let operator = match binary_operator(parser.at()) {
            Some(
                operator @ (BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo),
            ) => operator,
            _ => break,
        };
        parser.advance();
        // The right operand goes through the full call/member chain so that
        // `2 * f()` and `2 * a.b` group as expected.
        let right = parse_call_member(parser)?;
        let span = left.span;
        left = Expression::new(
            ExpressionKind::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        );
    }

    Ok(left)
}

fn parse_call_member(parser: &mut Parser) -> Result<Expression, ParseError> {
    let member = parse_member(parser)?;

    if parser.at().kind == TokenKind::OpenParen {
        return parse_call(parser, member);
    }
    Ok(member)
}

/// Call chains right-fold: `f()()` parses as `Call(Call(f))`.
fn parse_call(parser: &mut Parser, callee: Expression) -> Result<Expression, ParseError> {
    let span = callee.span;
    let arguments = parse_arguments(parser)?;
    let call = Expression::new(
        ExpressionKind::Call {
            callee: Box::new(callee),
            arguments,
        },
        span,
    );

    if parser.at().kind == TokenKind::OpenParen {
        return parse_call(parser, call);
    }
    Ok(call)
}

pub(crate) fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expression>, ParseError> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = Vec::new();
    if parser.at().kind != TokenKind::CloseParen {
        arguments.push(parse_expression(parser)?);
        while parser.at().kind == TokenKind::Comma {
            parser.advance();
            arguments.push(parse_expression(parser)?);
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(arguments)
}

fn parse_member(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut object = parse_primary(parser)?;

    loop {
        let (property, computed) = match parser.at().kind {
            TokenKind::Dot => {
                parser.advance();
                let property = parse_primary(parser)?;
                if !matches!(property.kind, ExpressionKind::Identifier(_)) {
                    return Err(ParseError::NonIdentifierProperty {
                        span: property.span,
                    });
                }
                (property, false)
            }
            TokenKind::OpenBracket => {
                parser.advance();
                let property = parse_expression(parser)?;
                parser.expect(TokenKind::CloseBracket)?;
                (property, true)
            }
            _ => break,
        };

        let span = object.span;
        object = Expression::new(
            ExpressionKind::Member {
                object: Box::new(object),
                property: Box::new(property),
                computed,
            },
            span,
        );
    }

    Ok(object)
}

fn parse_primary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let token = parser.advance();
    match token.kind {
        TokenKind::Identifier => Ok(Expression::new(
            ExpressionKind::Identifier(token.text),
            token.span,
        )),
        TokenKind::Number => {
            let value: f64 = token.text.parse().map_err(|_| ParseError::InvalidNumber {
                text: token.text.clone(),
                span: token.span,
            })?;
            Ok(Expression::new(
                ExpressionKind::NumericLiteral(value),
                token.span,
            ))
        }
        TokenKind::OpenParen => {
            let expression = parse_expression(parser)?;
            parser.expect(TokenKind::CloseParen)?;
            Ok(expression)
        }
        _ => Err(ParseError::unexpected_other(Expected::Expression, token)),
    }
}
