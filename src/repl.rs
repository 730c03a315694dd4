use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::completion::Completer;
use crate::executor::Executor;

pub const PROMPT: &str = "linesh> ";
pub const WELCOME: &str = "Welcome to linesh! Type 'exit' to quit.";
pub const FAREWELL: &str = "Goodbye!";

/// What the loop should do with one raw line.
#[derive(Debug, PartialEq, Eq)]
pub enum LineAction<'a> {
    Skip,
    Exit,
    Execute(&'a str),
}

pub fn classify(line: &str) -> LineAction<'_> {
    match line.trim() {
        "" => LineAction::Skip,
        "exit" => LineAction::Exit,
        trimmed => LineAction::Execute(trimmed),
    }
}

/// Interactive read loop. Returns once `exit` is entered or input ends.
pub fn run(executor: &mut Executor) -> rustyline::Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        // SIGINT reaches the foreground children; the shell itself survives.
        if let Err(e) = ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst)) {
            log::warn!("could not install interrupt handler: {}", e);
        }
    }

    let mut rl: Editor<Completer, DefaultHistory> = Editor::new()?;
    let paths = executor.env().get("PATH").cloned().unwrap_or_default();
    rl.set_helper(Some(Completer::new(&paths)));

    println!("{}", WELCOME);

    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            log::debug!("interrupt received while a command was running");
        }

        match rl.readline(PROMPT) {
            Ok(line) => match classify(&line) {
                LineAction::Skip => {}
                LineAction::Exit => break,
                LineAction::Execute(command) => {
                    if let Err(e) = rl.add_history_entry(command) {
                        log::debug!("history not updated: {}", e);
                    }
                    executor.execute_line(command);
                }
            },
            Err(ReadlineError::Interrupted) => {
                log::debug!("line discarded by interrupt");
            }
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(err) => {
                eprintln!("Error reading input: {}", err);
            }
        }
    }

    println!("{}", FAREWELL);
    Ok(())
}
