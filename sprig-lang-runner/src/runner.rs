use std::path::Path;

use sprig_lang_core::lexer::{self, LexError};
use sprig_lang_core::parser::{self, ParseError};
use sprig_lang_interpreter::builtins;
use sprig_lang_interpreter::environment::Environment;
use sprig_lang_interpreter::evaluator;
use sprig_lang_interpreter::object::{EvalError, Value};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Tokenize, parse and evaluate one source text against the given scope.
pub fn evaluate(source: &str, environment: &Environment) -> Result<gc::Gc<Value>, RunError> {
    let tokens = lexer::tokenize(source)?;
    let program = parser::Parser::new(tokens).parse_program()?;
    Ok(evaluator::eval_program(&program, environment)?)
}

/// Runs a script file in a fresh global environment and prints the value of
/// its last statement.
pub fn execute_file(path: &Path) -> Result<(), RunError> {
    let source = std::fs::read_to_string(path)?;
    let environment = builtins::create_global_environment();
    let evaluated = evaluate(&source, &environment)?;
    println!("{evaluated}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use sprig_lang_interpreter::builtins::create_global_environment;
    use sprig_lang_interpreter::object::Value;

    use super::{evaluate, RunError};

    #[test]
    fn test_evaluate_pipeline() {
        let environment = create_global_environment();
        let result = evaluate("let x = 2; x * pi", &environment).unwrap();
        assert_eq!(result, Value::number(2.0 * std::f64::consts::PI));
    }

    #[test]
    fn test_environment_persists_across_evaluations() {
        let environment = create_global_environment();
        evaluate("let x = 1;", &environment).unwrap();
        assert_eq!(evaluate("x + 1", &environment).unwrap(), Value::number(2.0));
    }

    #[test]
    fn test_each_stage_reports_its_error() {
        let environment = create_global_environment();
        assert!(matches!(
            evaluate("let x = @;", &environment),
            Err(RunError::Lex(_))
        ));
        assert!(matches!(
            evaluate("let = 1;", &environment),
            Err(RunError::Parse(_))
        ));
        assert!(matches!(
            evaluate("missing", &environment),
            Err(RunError::Eval(_))
        ));
    }
}
