use crate::env::Environment;
use crate::redirect::RedirectionSpec;
use anyhow::Result;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// The normalized outcome of evaluating one command line.
///
/// This triple is the sole contract between the evaluator and the
/// read-print loop: `output` is printed when non-empty, `code` is the
/// command-level status, and `should_exit` tells the loop to stop and make
/// `code` the process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalResult {
    pub output: String,
    pub code: ExitCode,
    pub should_exit: bool,
}

impl EvalResult {
    /// Successful result carrying output text.
    pub fn ok(output: impl Into<String>) -> Self {
        EvalResult {
            output: output.into(),
            code: 0,
            should_exit: false,
        }
    }

    /// Silent result carrying only a status code.
    pub fn status(code: ExitCode) -> Self {
        EvalResult {
            output: String::new(),
            code,
            should_exit: false,
        }
    }

    /// Failed result carrying a diagnostic and a non-zero code.
    pub fn failure(output: impl Into<String>, code: ExitCode) -> Self {
        EvalResult {
            output: output.into(),
            code,
            should_exit: false,
        }
    }

    /// Result that asks the read-print loop to terminate with `code`.
    ///
    /// Termination always travels through this flag; nothing ends the
    /// process while an evaluation still holds resources.
    pub fn terminate(code: ExitCode) -> Self {
        EvalResult {
            output: String::new(),
            code,
            should_exit: true,
        }
    }

    /// The command-not-found result, conventionally code 127.
    pub fn not_found(name: &str) -> Self {
        EvalResult {
            output: format!("{name}: command not found"),
            code: 127,
            should_exit: false,
        }
    }
}

/// Read-only view of the shell handed to an executing command.
///
/// Carries the process environment snapshot and the names of the registered
/// builtins (the `type` builtin reports against this list).
pub struct ShellContext<'a> {
    pub env: &'a Environment,
    pub builtins: &'a [&'static str],
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// Implemented by builtins via a blanket impl and by external commands.
/// External commands take the stream handles they need out of `redirect`;
/// builtins leave it untouched and let the evaluator reconcile their output.
pub trait ExecutableCommand {
    fn execute(
        self: Box<Self>,
        shell: &ShellContext<'_>,
        redirect: &mut RedirectionSpec,
    ) -> Result<EvalResult>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
/// Implementations can use the environment to resolve executables (e.g., using PATH).
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;

    /// Name of the builtin this factory produces, if it produces one.
    fn builtin_name(&self) -> Option<&'static str> {
        None
    }
}
