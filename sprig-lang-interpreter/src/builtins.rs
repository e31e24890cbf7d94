use std::time::{SystemTime, UNIX_EPOCH};

use gc::Gc;

use crate::environment::Environment;
use crate::object::{EvalError, NativeFn, Value};

const NATIVES: [(&str, NativeFn); 2] = [("print", print), ("time", time)];

/// The root scope every program runs under: the `null`/`true`/`false`/`pi`
/// constants and the native functions.
pub fn create_global_environment() -> Environment {
    let environment = Environment::new();

    let constants = [
        ("null", Value::null()),
        ("true", Value::boolean(true)),
        ("false", Value::boolean(false)),
        ("pi", Value::number(std::f64::consts::PI)),
    ];
    for (name, value) in constants {
        // The environment is freshly created, so these cannot collide.
        let _ = environment.declare(name, value, true);
    }
    for (name, func) in NATIVES {
        let _ = environment.declare(name, Value::native_function(name, func), true);
    }

    environment
}

/// Prints its arguments space-separated on one line and returns Null.
fn print(_environment: &Environment, arguments: Vec<Gc<Value>>) -> Result<Gc<Value>, EvalError> {
    let rendered: Vec<String> = arguments
        .iter()
        .map(|argument| argument.to_string())
        .collect();
    println!("{}", rendered.join(" "));
    Ok(Value::null())
}

/// Milliseconds since the Unix epoch as a Number.
fn time(_environment: &Environment, _arguments: Vec<Gc<Value>>) -> Result<Gc<Value>, EvalError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|error| EvalError::NativeFunction {
            name: "time".to_owned(),
            message: error.to_string(),
        })?;
    Ok(Value::number(elapsed.as_millis() as f64))
}
