use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use sprig_lang_interpreter::builtins;

use crate::runner;

const PROMPT: &str = ">> ";

/// Read-eval-print loop over one persistent global environment. Errors are
/// printed and the loop continues; only Ctrl-D (or a terminal failure)
/// ends it.
pub fn start() -> Result<(), ReadlineError> {
    let environment = builtins::create_global_environment();

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(PROMPT);

        let line = match readline {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                continue; // Clear line
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                line
            }
        };

        match runner::evaluate(&line, &environment) {
            Ok(value) => println!("{value}"),
            Err(error) => println!("{error}"),
        }
    }
    Ok(())
}
