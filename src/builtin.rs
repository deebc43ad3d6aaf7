use crate::command::{CommandFactory, EvalResult, ExecutableCommand, ExitCode, ShellContext};
use crate::env::Environment;
use crate::external::find_command_path;
use crate::interpreter::Factory;
use crate::redirect::RedirectionSpec;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::ffi::OsStr;
use std::path::Path;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// in-process without spawning a child process. A handler is a pure function
/// from its parsed arguments to an [`EvalResult`]; it never touches the
/// redirection handles — the interpreter reconciles its output afterwards.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "echo" or "type".
    fn name() -> &'static str;

    /// Executes the command against the read-only shell context.
    fn run(self, shell: &ShellContext<'_>) -> Result<EvalResult>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        shell: &ShellContext<'_>,
        _redirect: &mut RedirectionSpec,
    ) -> Result<EvalResult> {
        match T::run(*self, shell) {
            Ok(result) => Ok(result),
            Err(e) => Ok(EvalResult::failure(e.to_string(), 1)),
        }
    }
}

/// Outcome of an argument vector the `argh` parser rejected (or an early
/// exit such as `--help`): the parser's own text becomes the result.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        _shell: &ShellContext<'_>,
        _redirect: &mut RedirectionSpec,
    ) -> Result<EvalResult> {
        let output = self.output.trim_end();
        Ok(if self.is_error {
            EvalResult::failure(output, 1)
        } else {
            EvalResult::ok(output)
        })
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }

    fn builtin_name(&self) -> Option<&'static str> {
        Some(T::name())
    }
}

#[derive(FromArgs)]
/// Terminate the shell, optionally with an explicit exit code.
pub struct Exit {
    #[argh(positional, greedy)]
    /// exit code, base 10; defaults to 0. Surplus arguments are ignored.
    pub args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    /// Never terminates the process itself: the termination flag travels in
    /// the result so the loop can act on it once all handles are released.
    fn run(self, _shell: &ShellContext<'_>) -> Result<EvalResult> {
        let Some(arg) = self.args.first() else {
            return Ok(EvalResult::terminate(0));
        };
        match arg.parse::<ExitCode>() {
            Ok(code) => Ok(EvalResult::terminate(code)),
            // A malformed code still terminates the shell, signaling the
            // usage error through code 2.
            Err(_) => Ok(EvalResult {
                output: format!("exit: {arg}: numeric argument required"),
                code: 2,
                should_exit: true,
            }),
        }
    }
}

#[derive(FromArgs)]
/// Write the arguments to standard output, separated by spaces.
pub struct Echo {
    #[argh(positional, greedy)]
    /// values to print as-is, separated by spaces.
    pub args: Vec<String>,
}

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn run(self, _shell: &ShellContext<'_>) -> Result<EvalResult> {
        Ok(EvalResult::ok(self.args.join(" ")))
    }
}

#[derive(FromArgs)]
/// Report how a command name would be interpreted: as a shell builtin or as
/// an executable found on the search path.
pub struct Type {
    #[argh(positional, greedy)]
    /// command names to look up; only the first is consulted.
    pub names: Vec<String>,
}

impl BuiltinCommand for Type {
    fn name() -> &'static str {
        "type"
    }

    fn run(self, shell: &ShellContext<'_>) -> Result<EvalResult> {
        let Some(name) = self.names.first() else {
            return Ok(EvalResult::failure("type: usage: type name", 1));
        };
        if shell.builtins.iter().any(|b| *b == name.as_str()) {
            return Ok(EvalResult::ok(format!("{name} is a shell builtin")));
        }
        let search_paths = shell.env.get_var("PATH").unwrap_or_default();
        match find_command_path(OsStr::new(&search_paths), Path::new(name)) {
            Some(path) => Ok(EvalResult::ok(format!("{name} is {}", path.display()))),
            None => Ok(EvalResult::failure(format!("{name}: not found"), 1)),
        }
    }
}
