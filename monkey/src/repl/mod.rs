//! REPL (Read-Eval-Print Loop) for Monkey

use crate::error::ParseError;
use crate::interp::{Interpreter, Object};
use crate::parser::parse;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

const PROMPT: &str = ">> ";
const HISTORY_FILE: &str = ".monkey_history";

/// Result of feeding one input to a [`Session`]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The input did not parse; nothing was evaluated
    ParseErrors(Vec<ParseError>),
    /// The value of the last statement, if there was one
    Evaluated(Option<Object>),
}

/// Renders exactly what the REPL prints
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::ParseErrors(errors) => {
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "parser error: {error}")?;
                }
                Ok(())
            }
            Outcome::Evaluated(Some(value)) => write!(f, "{value}"),
            Outcome::Evaluated(None) => Ok(()),
        }
    }
}

/// Evaluation state shared by successive inputs
#[derive(Default)]
pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and evaluate one input against the session's globals
    pub fn eval(&mut self, input: &str) -> Outcome {
        match parse(input) {
            Ok(program) => Outcome::Evaluated(self.interpreter.eval_program(&program)),
            Err(errors) => Outcome::ParseErrors(errors),
        }
    }

    /// Drop every binding made so far
    pub fn reset(&mut self) {
        self.interpreter.reset();
    }
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new() -> Result<Self, ReadlineError> {
        let editor = DefaultEditor::new()?;
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            session: Session::new(),
            history_path,
        };

        // A missing history file is normal on first start
        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL until `:quit` or end of input
    pub fn run(&mut self) -> Result<(), ReadlineError> {
        println!("Monkey REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with(':') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.eval_input(line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        if let Some(ref path) = self.history_path
            && let Err(err) = self.editor.save_history(path)
        {
            warn!(path = %path.display(), "could not save history: {err}");
        }

        Ok(())
    }

    /// Handle REPL commands (starting with :). Returns true to exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                self.print_help();
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            ":reset" => {
                self.session.reset();
                println!("Environment cleared.");
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    fn print_help(&self) {
        println!("Monkey REPL Commands:");
        println!("  :help, :h, :?   Show this help");
        println!("  :quit, :q       Exit the REPL");
        println!("  :clear          Clear the screen");
        println!("  :reset          Forget all bindings");
        println!();
        println!("You can enter:");
        println!("  - Expressions: 1 + 2 * 3, if (x > 1) {{ x }} else {{ 0 }}");
        println!("  - Bindings: let add = fn(a, b) {{ a + b }};");
        println!("  - Calls: add(1, 2)");
        println!();
        println!("Built-in functions:");
        println!("  len(x)          Length of an array or string");
        println!("  first(arr)      First element, or null");
        println!("  last(arr)       Last element, or null");
        println!("  rest(arr)       All but the first element, or null");
        println!("  push(arr, x)    New array with x appended");
        println!("  puts(...)       Print each argument on its own line");
    }

    fn eval_input(&mut self, input: &str) {
        let outcome = self.session.eval(input);
        if !matches!(outcome, Outcome::Evaluated(None)) {
            println!("{outcome}");
        }
    }
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_constants() {
        assert_eq!(PROMPT, ">> ");
        assert_eq!(HISTORY_FILE, ".monkey_history");
    }

    #[test]
    fn test_session_prints_inspection() {
        let mut session = Session::new();
        assert_snapshot!(session.eval("1 + 2").to_string(), @"3");
        assert_snapshot!(session.eval(r#""mon" + "key""#).to_string(), @"monkey");
        assert_snapshot!(session.eval("[1, true, if (false) { 1 }]").to_string(), @"[1, true, null]");
        assert_snapshot!(session.eval("-true").to_string(), @"ERROR: unknown operator: -BOOLEAN");
    }

    #[test]
    fn test_session_function_inspection() {
        let mut session = Session::new();
        assert_snapshot!(session.eval("fn(x, y) { x + y }").to_string(), @r"
        fn(x, y) {
        (x + y)
        }
        ");
        assert_snapshot!(session.eval("len").to_string(), @"builtin function");
    }

    #[test]
    fn test_session_parse_errors() {
        let mut session = Session::new();
        let outcome = session.eval("let = 10;");
        assert!(matches!(&outcome, Outcome::ParseErrors(errors) if errors.len() == 2));
        assert_snapshot!(outcome.to_string(), @r"
        parser error: expected next token to be IDENT, got = instead
        parser error: no prefix parse function for = found
        ");
    }

    #[test]
    fn test_parse_errors_do_not_evaluate() {
        let mut session = Session::new();
        session.eval("let x = 1;");
        assert!(matches!(session.eval("let x = 2; )"), Outcome::ParseErrors(_)));
        assert_eq!(session.eval("x"), Outcome::Evaluated(Some(Object::Integer(1))));
    }

    #[test]
    fn test_session_keeps_bindings_until_reset() {
        let mut session = Session::new();
        session.eval("let double = fn(x) { x * 2 };");
        assert_eq!(
            session.eval("double(21)"),
            Outcome::Evaluated(Some(Object::Integer(42)))
        );

        session.reset();
        assert_snapshot!(session.eval("double(21)").to_string(), @"ERROR: identifier not found: double");
    }

    #[test]
    fn test_empty_input_prints_nothing() {
        let mut session = Session::new();
        assert_eq!(session.eval("   "), Outcome::Evaluated(None));
        assert_eq!(session.eval("").to_string(), "");
    }

    #[test]
    fn test_handle_command_returns_correctly() {
        let mut repl = Repl::new().expect("editor");
        assert!(repl.handle_command(":quit"));
        assert!(repl.handle_command(":q"));
        assert!(repl.handle_command(":exit"));
        assert!(!repl.handle_command(":help"));
        assert!(!repl.handle_command(":clear"));
        assert!(!repl.handle_command(":anything_else"));
    }

    #[test]
    fn test_reset_command_clears_session() {
        let mut repl = Repl::new().expect("editor");
        repl.eval_input("let a = 1;");
        assert!(!repl.handle_command(":reset"));
        assert!(matches!(
            repl.session.eval("a"),
            Outcome::Evaluated(Some(Object::Error(_)))
        ));
    }
}
