//! Interactive front end for the `simd-lisp` binary
//!
//! Each line is handed to [`Session::repl_dispatch`]. A callable result is
//! run with no arguments and printed as `<a, b, c, d>`. Compilation
//! failures print nothing; the cause goes to the debug log.

use std::path::PathBuf;

use log::debug;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::error::CompileError;
use crate::jit::{ExternalFn, Vec4};
use crate::pipeline::Session;

const HISTORY_FILE: &str = ".simd_lisp_history";
const PROMPT: &str = "> ";

/// Line-editing loop over one session
pub struct Repl {
    editor: DefaultEditor,
    history: Option<PathBuf>,
    emit: bool,
}

impl Repl {
    /// `emit` prints the IR of every function compiled by a line; it needs a
    /// session with IR capture enabled.
    pub fn new(emit: bool) -> rustyline::Result<Self> {
        let mut editor = DefaultEditor::new()?;
        let history = history_path();
        if let Some(path) = &history {
            // A missing history file is normal on first run
            if editor.load_history(path).is_err() {
                debug!("no history loaded from {}", path.display());
            }
        }
        Ok(Repl {
            editor,
            history,
            emit,
        })
    }

    /// Read and evaluate lines until an empty line, EOF, or interrupt.
    pub fn run(&mut self, session: &mut Session) -> rustyline::Result<()> {
        println!("simd-lisp v{}", env!("CARGO_PKG_VERSION"));
        println!("Enter an empty line to quit");
        println!();

        loop {
            let line = match self.editor.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            };
            if line.trim().is_empty() {
                break;
            }
            self.add_history(&line);

            let emitted = session.ir_listing().len();
            for output in eval_line(session, &line) {
                println!("{output}");
            }
            if self.emit {
                print_ir(session, emitted);
            }
        }

        if let Some(path) = &self.history {
            self.editor.save_history(path)?;
        }
        println!("Goodbye!");
        Ok(())
    }

    /// Record `line` in the history. Failures are logged and otherwise ignored.
    pub fn add_history(&mut self, line: &str) {
        if let Err(err) = self.editor.add_history_entry(line) {
            debug!("history entry not recorded: {}", err);
        }
    }
}

/// Evaluate the first form of `line`, as the interactive loop does.
pub fn eval_line(session: &mut Session, line: &str) -> Vec<String> {
    render(line, session.repl_dispatch(line)).into_iter().collect()
}

/// Evaluate every form of `source` in order, stopping at the first failure.
///
/// Results of the forms before a failure are still printed.
pub fn eval_all(session: &mut Session, source: &str) -> Vec<String> {
    session
        .repl_dispatch_all(source)
        .into_iter()
        .filter_map(|result| render(source, result))
        .collect()
}

/// Print the IR captured after the listing held `from` entries.
pub fn print_ir(session: &Session, from: usize) {
    for text in &session.ir_listing()[from..] {
        println!("{text}");
    }
}

/// Render a vector as `<a, b, c, d>`.
pub fn format_vec4(v: &Vec4) -> String {
    format!("<{}, {}, {}, {}>", v[0], v[1], v[2], v[3])
}

/// The printed line for one dispatched form, if it produced a value.
fn render(source: &str, result: Result<Option<ExternalFn>, CompileError>) -> Option<String> {
    match result {
        Ok(Some(f)) => match f.call(&[]) {
            Ok(v) => Some(format_vec4(&v)),
            Err(err) => {
                debug!("{}: {}", source, err);
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            debug!("{}: {}", source, err);
            None
        }
    }
}

fn history_path() -> Option<PathBuf> {
    let home = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(home).map(|dir| PathBuf::from(dir).join(HISTORY_FILE))
}
