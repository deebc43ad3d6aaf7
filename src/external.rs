use crate::command::{CommandFactory, EvalResult, ExecutableCommand, ShellContext};
use crate::env::Environment;
use crate::interpreter::Factory;
use crate::redirect::RedirectionSpec;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// Command that is not a builtin: a resolved executable and its arguments.
///
/// Exists only for one spawn/wait cycle; the stream bindings are taken out
/// of the [`RedirectionSpec`] at spawn time.
pub struct ExternalCommand {
    path: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(path: OsString, args: Vec<OsString>) -> Self {
        Self { path, args }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let search_paths = env.get_var("PATH")?;
        let executable = find_command_path(OsStr::new(&search_paths), Path::new(name))?;
        Some(Box::new(ExternalCommand::new(
            executable.as_os_str().to_owned(),
            args.iter().map(|x| x.into()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        shell: &ShellContext<'_>,
        redirect: &mut RedirectionSpec,
    ) -> Result<EvalResult> {
        let mut command = std::process::Command::new(&self.path);
        command
            .args(&self.args)
            .envs(shell.env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&shell.env.current_dir);

        // Each stream binds to its extracted handle when one exists;
        // otherwise the child inherits the shell's own stream.
        match redirect.stdin.take() {
            Some(file) => command.stdin(Stdio::from(file)),
            None => command.stdin(Stdio::inherit()),
        };
        match redirect.stdout.take() {
            Some(file) => command.stdout(Stdio::from(file)),
            None => command.stdout(Stdio::inherit()),
        };
        match redirect.stderr.take() {
            Some(file) => command.stderr(Stdio::from(file)),
            None => command.stderr(Stdio::inherit()),
        };

        let mut child = command
            .spawn()
            .with_context(|| format!("{}: failed to start", self.path.to_string_lossy()))?;
        let status = child.wait()?;
        let code = match status.code() {
            Some(x) => x,
            None => terminated_by_signal(status),
        };
        Ok(EvalResult::status(code))
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// - An absolute path resolves to itself if it exists.
/// - `./foo` (and, off Unix, any relative path) resolves against the current
///   directory.
/// - A relative path with multiple components (e.g. `bin/tool`) resolves
///   against the filesystem directly.
/// - A bare single-component name consults each directory of `search_paths`
///   in order and returns the first existing match.
/// - An empty path resolves to nothing.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.as_os_str().is_empty() {
        return None;
    }
    if path.is_absolute() {
        return path.exists().then(|| Cow::Borrowed(path));
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    if path.components().nth(1).is_some() {
        // Multi-component relative path, e.g. `bin/tool`.
        return path.exists().then(|| Cow::Borrowed(path));
    }

    find_in_search_path(search_paths, path.as_os_str()).map(Cow::Owned)
}

fn find_in_search_path(search_paths: &OsStr, name: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.exists())
}
