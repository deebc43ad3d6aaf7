use crate::command::{CommandFactory, EvalResult, ExitCode, ShellContext};
use crate::env::Environment;
use crate::lexer;
use crate::redirect::{self, RedirectionSpec};
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate — builtins and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The shell evaluator plus its thin interactive loop.
///
/// One evaluation runs synchronously through a fixed pipeline: tokenize the
/// line, extract the redirections, dispatch to the first factory that
/// recognizes the command, reconcile builtin output against a redirected
/// stdout, and return the normalized [`EvalResult`]. The interpreter holds an
/// [`Environment`] snapshot and an ordered list of [`CommandFactory`] values,
/// both fixed at construction.
///
/// Example
/// ```
/// use minishell::Interpreter;
/// let sh = Interpreter::default();
/// let result = sh.evaluate("echo hello world");
/// assert_eq!(result.output, "hello world");
/// assert_eq!(result.code, 0);
/// assert!(!result.should_exit);
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
    builtins: Vec<&'static str>,
}

impl Interpreter {
    /// Create a new interpreter from an environment snapshot and an ordered
    /// set of command factories.
    pub fn new(env: Environment, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        let builtins = commands.iter().filter_map(|f| f.builtin_name()).collect();
        Self {
            env,
            commands,
            builtins,
        }
    }

    /// Evaluate one input line and return the normalized result.
    ///
    /// Every failure mode is folded into the result; the caller never sees a
    /// Rust error from an evaluation. Any file handle opened for redirection
    /// is closed by the time this returns, whichever path produced the
    /// result.
    pub fn evaluate(&self, line: &str) -> EvalResult {
        let trimmed = line.trim();
        let tokens = lexer::tokenize(trimmed);
        if tokens.is_empty() {
            // Degenerate upstream behavior, kept: a blank line reports
            // itself as an unknown command.
            return EvalResult::not_found(trimmed);
        }

        let (argv, mut redirect) = match redirect::extract(&tokens) {
            Ok(extracted) => extracted,
            Err(e) => return EvalResult::failure(e.to_string(), 1),
        };

        let Some((name, args)) = argv.split_first() else {
            // The line held only redirections. The targets were already
            // opened (and truncated) above; the handles drop here.
            return EvalResult::not_found(trimmed);
        };
        let args: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

        match self.dispatch(name, &args, &mut redirect) {
            Some(result) => reconcile(result, redirect),
            None => EvalResult::not_found(name),
        }
    }

    /// Walk the factory list in order; the first one that recognizes `name`
    /// executes. `None` means no factory matched — command not found.
    fn dispatch(
        &self,
        name: &str,
        args: &[&str],
        redirect: &mut RedirectionSpec,
    ) -> Option<EvalResult> {
        let shell = ShellContext {
            env: &self.env,
            builtins: &self.builtins,
        };
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args) {
                let result = match cmd.execute(&shell, redirect) {
                    Ok(result) => result,
                    Err(e) => EvalResult::failure(e.to_string(), 1),
                };
                return Some(result);
            }
        }
        None
    }

    /// Run the interactive read-print loop until a command asks to exit.
    ///
    /// Issues the `$ ` prompt, reads one line, evaluates it, prints non-empty
    /// output, and stops when a result carries the termination flag. Returns
    /// the code the process should exit with. Ctrl-C abandons the current
    /// line and prompts again; Ctrl-D ends the session like a normal exit.
    pub fn repl(&self) -> Result<ExitCode> {
        let mut rl = DefaultEditor::new()?;
        loop {
            match rl.readline("$ ") {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    let result = self.evaluate(&line);
                    if !result.output.is_empty() {
                        println!("{}", result.output);
                    }
                    if result.should_exit {
                        return Ok(result.code);
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(0),
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// The one subtlety the evaluator owns: builtins never claim the stdout
/// handle, so when the command line redirected stdout, their printable
/// output belongs in the file (with the line break the terminal would have
/// added) and the terminal sees nothing. External commands consumed the
/// handle at spawn time and are unaffected.
fn reconcile(mut result: EvalResult, mut redirect: RedirectionSpec) -> EvalResult {
    if let Some(mut file) = redirect.stdout.take() {
        if !result.output.is_empty() {
            if let Err(e) = writeln!(file, "{}", result.output) {
                return EvalResult::failure(format!("write error: {e}"), 1);
            }
            result.output = String::new();
        }
    }
    result
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - builtins: `exit`, `echo`, `type`
    /// - the external command launcher
    fn default() -> Self {
        use crate::builtin::{Echo, Exit, Type};
        use crate::external::ExternalCommand;
        Self::new(
            Environment::new(),
            vec![
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<Echo>::default()),
                Box::new(Factory::<Type>::default()),
                Box::new(Factory::<ExternalCommand>::default()),
            ],
        )
    }
}
