use gc::Gc;

use sprig_lang_core::ast::{
    self, BinaryOperator, Expression, ExpressionKind, Property, Statement,
};
use sprig_lang_core::lexer::Span;

use crate::environment::{Environment, EnvironmentError};
use crate::object::{EvalError, Function, Value};

/// Evaluates every top-level statement in order; the program's value is the
/// value of its last statement (Null for an empty program).
pub fn eval_program(program: &ast::Program, environment: &Environment) -> Result<Gc<Value>, EvalError> {
    let mut output = Value::null();
    for statement in &program.body {
        output = eval_statement(statement, environment)?;
    }
    Ok(output)
}

pub fn eval_statement(
    statement: &Statement,
    environment: &Environment,
) -> Result<Gc<Value>, EvalError> {
    match statement {
        Statement::VarDeclaration(declaration) => eval_var_declaration(declaration, environment),
        Statement::FunctionDeclaration(declaration) => {
            eval_function_declaration(declaration, environment)
        }
        Statement::Expression(expression) => eval_expression(expression, environment),
    }
}

fn eval_var_declaration(
    declaration: &ast::VarDeclaration,
    environment: &Environment,
) -> Result<Gc<Value>, EvalError> {
    let value = match &declaration.value {
        Some(expression) => eval_expression(expression, environment)?,
        None => Value::null(),
    };
    environment
        .declare(&declaration.name, value, declaration.constant)
        .map_err(|_| EvalError::DuplicateDeclaration {
            name: declaration.name.clone(),
            span: declaration.span,
        })
}

/// Builds a function closing over the current environment and binds it as a
/// constant under its own name.
fn eval_function_declaration(
    declaration: &ast::FunctionDeclaration,
    environment: &Environment,
) -> Result<Gc<Value>, EvalError> {
    let function = Value::function(
        declaration.name.clone(),
        declaration.parameters.clone(),
        declaration.body.clone(),
        declaration.span,
        environment.clone(),
    );
    environment
        .declare(&declaration.name, function, true)
        .map_err(|_| EvalError::DuplicateDeclaration {
            name: declaration.name.clone(),
            span: declaration.span,
        })
}

pub fn eval_expression(
    expression: &Expression,
    environment: &Environment,
) -> Result<Gc<Value>, EvalError> {
    match &expression.kind {
        ExpressionKind::NumericLiteral(value) => Ok(Value::number(*value)),
        ExpressionKind::Identifier(name) => {
            environment
                .lookup(name)
                .ok_or_else(|| EvalError::UnknownIdentifier {
                    name: name.clone(),
                    span: expression.span,
                })
        }
        ExpressionKind::Binary {
            operator,
            left,
            right,
        } => {
            let left = eval_expression(left, environment)?;
            let right = eval_expression(right, environment)?;
            Ok(eval_binary_operation(*operator, &left, &right))
        }
        ExpressionKind::Assign { target, value } => eval_assignment(target, value, environment),
        ExpressionKind::ObjectLiteral(properties) => {
            eval_object_literal(properties, expression.span, environment)
        }
        ExpressionKind::Member {
            object,
            property,
            computed,
        } => eval_member_expression(object, property, *computed, environment),
        ExpressionKind::Call { callee, arguments } => {
            eval_call_expression(callee, arguments, environment)
        }
    }
}

/// Both operands are always evaluated. Two Numbers get standard f64
/// semantics (division by zero gives infinities/NaN); any other operand
/// combination yields Null.
fn eval_binary_operation(operator: BinaryOperator, left: &Value, right: &Value) -> Gc<Value> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Value::number(match operator {
            BinaryOperator::Plus => left + right,
            BinaryOperator::Minus => left - right,
            BinaryOperator::Multiply => left * right,
            BinaryOperator::Divide => left / right,
            BinaryOperator::Modulo => left % right,
        }),
        _ => Value::null(),
    }
}

fn eval_assignment(
    target: &Expression,
    value: &Expression,
    environment: &Environment,
) -> Result<Gc<Value>, EvalError> {
    let ExpressionKind::Identifier(name) = &target.kind else {
        return Err(EvalError::InvalidAssignmentTarget { span: target.span });
    };

    let value = eval_expression(value, environment)?;
    environment.assign(name, value).map_err(|error| match error {
        EnvironmentError::Constant(_) => EvalError::AssignmentToConstant {
            name: name.clone(),
            span: target.span,
        },
        _ => EvalError::UnknownIdentifier {
            name: name.clone(),
            span: target.span,
        },
    })
}

fn eval_object_literal(
    properties: &[Property],
    span: Span,
    environment: &Environment,
) -> Result<Gc<Value>, EvalError> {
    let mut entries: Vec<(String, Gc<Value>)> = Vec::with_capacity(properties.len());
    for property in properties {
        let value = match &property.value {
            Some(expression) => eval_expression(expression, environment)?,
            // Shorthand: the key doubles as a name looked up in the
            // current scope.
            None => {
                environment
                    .lookup(&property.key)
                    .ok_or_else(|| EvalError::UnknownIdentifier {
                        name: property.key.clone(),
                        span,
                    })?
            }
        };
        // A repeated key overwrites in place, keeping its first position.
        match entries.iter_mut().find(|(key, _)| *key == property.key) {
            Some(entry) => entry.1 = value,
            None => entries.push((property.key.clone(), value)),
        }
    }
    Ok(Value::object(entries))
}

/// Property read-through. A missing key yields Null; a non-object base is
/// an error.
fn eval_member_expression(
    object: &Expression,
    property: &Expression,
    computed: bool,
    environment: &Environment,
) -> Result<Gc<Value>, EvalError> {
    let base = eval_expression(object, environment)?;
    let Value::Object(entries) = base.as_ref() else {
        return Err(EvalError::MemberAccessOnNonObject { span: object.span });
    };

    let key = if computed {
        let index = eval_expression(property, environment)?;
        property_key(&index).ok_or(EvalError::InvalidPropertyKey {
            span: property.span,
        })?
    } else {
        match &property.kind {
            ExpressionKind::Identifier(name) => name.clone(),
            _ => {
                return Err(EvalError::InvalidPropertyKey {
                    span: property.span,
                })
            }
        }
    };

    Ok(entries
        .iter()
        .find(|(entry_key, _)| *entry_key == key)
        .map(|(_, value)| value.clone())
        .unwrap_or_else(Value::null))
}

/// Null, Number and Boolean values render to property keys through their
/// display form; functions and objects have none.
fn property_key(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Number(_) | Value::Boolean(_) => Some(value.to_string()),
        _ => None,
    }
}

/// The callee evaluates first, then every argument left-to-right.
fn eval_call_expression(
    callee: &Expression,
    arguments: &[Expression],
    environment: &Environment,
) -> Result<Gc<Value>, EvalError> {
    let function = eval_expression(callee, environment)?;

    let mut evaluated = Vec::with_capacity(arguments.len());
    for argument in arguments {
        evaluated.push(eval_expression(argument, environment)?);
    }

    match function.as_ref() {
        Value::NativeFunction(native) => (native.func)(environment, evaluated),
        Value::Function(function) => apply_function(function, evaluated),
        _ => Err(EvalError::CallNonFunction { span: callee.span }),
    }
}

/// Runs a user function in a fresh scope parented at the function's
/// *captured* environment, not the call site's. Parameters bind
/// positionally; a parameter without a matching argument binds to Null, and
/// extra arguments are ignored. The result is the value of the last body
/// statement.
fn apply_function(function: &Function, arguments: Vec<Gc<Value>>) -> Result<Gc<Value>, EvalError> {
    let scope = Environment::new_enclosed(function.env.clone());

    let mut arguments = arguments.into_iter();
    for parameter in &function.parameters {
        let value = arguments.next().unwrap_or_else(Value::null);
        scope
            .declare(parameter, value, false)
            .map_err(|_| EvalError::DuplicateDeclaration {
                name: parameter.clone(),
                span: function.span,
            })?;
    }

    let mut output = Value::null();
    for statement in &function.body {
        output = eval_statement(statement, &scope)?;
    }
    Ok(output)
}
