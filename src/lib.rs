//! A tiny interactive command shell.
//!
//! This crate reads one command line at a time, decides whether it names a
//! built-in behavior or an external executable, applies any requested file
//! redirection, runs it, and reports a normalized result: output text, an
//! exit code, and whether the shell itself should terminate. It is
//! intentionally small and easy to read.
//!
//! The main entry point is [`Interpreter`], which evaluates single lines and
//! hosts the interactive loop. The public modules [`command`] and [`env`]
//! expose the dispatch contract and the process-environment snapshot;
//! [`redirect`] and [`errors`] cover the redirection seam.

mod builtin;
pub mod command;
pub mod env;
pub mod errors;
mod external;
mod interpreter;
mod lexer;
pub mod redirect;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;

pub use command::EvalResult;
