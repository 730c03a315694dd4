//! Execution core of a line-oriented command interpreter.
//!
//! A line is expanded (`$NAME`), split into `&&`/`||` segments, each segment
//! into `|` stages, and every stage is run as a builtin or an external
//! process. See [`executor::Executor::execute_line`].

pub mod ast;
pub mod builtins;
pub mod completion;
pub mod executor;
pub mod expand;
pub mod launcher;
pub mod parser;
pub mod redirection;
pub mod repl;
pub mod tokenizer;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;
