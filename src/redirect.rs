//! Extraction of redirection operators from a token sequence.
//!
//! Operators are recognized as standalone tokens, each consuming the token
//! after it as the target filename. Targets are opened here, so a command
//! never runs when its redirection targets are unusable.

use crate::errors::ShellError;
use std::fs::{File, OpenOptions};

/// Owned stream bindings extracted from one command line.
///
/// At most one handle per stream; when an operator for a stream repeats, the
/// later open wins and the earlier handle is dropped at that point. The spec
/// is exclusively owned by the evaluation that created it, and `Drop` closes
/// whatever is still held on every exit path.
#[derive(Debug, Default)]
pub struct RedirectionSpec {
    pub stdin: Option<File>,
    pub stdout: Option<File>,
    pub stderr: Option<File>,
}

#[derive(Clone, Copy)]
enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

#[derive(Clone, Copy)]
enum Mode {
    Read,
    Truncate,
    Append,
}

fn operator(token: &str) -> Option<(Stream, Mode)> {
    match token {
        ">" | "1>" => Some((Stream::Stdout, Mode::Truncate)),
        ">>" | "1>>" => Some((Stream::Stdout, Mode::Append)),
        "2>" => Some((Stream::Stderr, Mode::Truncate)),
        "<" => Some((Stream::Stdin, Mode::Read)),
        _ => None,
    }
}

fn open_target(path: &str, mode: Mode) -> Result<File, ShellError> {
    let opened = match mode {
        Mode::Read => File::open(path),
        Mode::Truncate => OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path),
        Mode::Append => OpenOptions::new().append(true).create(true).open(path),
    };
    opened.map_err(|e| ShellError::open(path, e))
}

/// Scan `tokens` left to right, open every redirection target, and return
/// the non-redirection tokens in order together with the owned handles.
///
/// A trailing operator with no filename after it is a syntax error; a target
/// that cannot be opened is an open error. Either way the handles opened so
/// far are released when the partial spec drops.
pub fn extract(tokens: &[String]) -> Result<(Vec<String>, RedirectionSpec), ShellError> {
    let mut remaining = Vec::new();
    let mut spec = RedirectionSpec::default();

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        match operator(token) {
            Some((stream, mode)) => {
                let target = tokens.get(i + 1).ok_or_else(|| ShellError::syntax(token))?;
                let file = open_target(target, mode)?;
                let slot = match stream {
                    Stream::Stdin => &mut spec.stdin,
                    Stream::Stdout => &mut spec.stdout,
                    Stream::Stderr => &mut spec.stderr,
                };
                *slot = Some(file);
                i += 2;
            }
            None => {
                remaining.push(token.clone());
                i += 1;
            }
        }
    }

    Ok((remaining, spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_unique_temp_dir(tag: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("redirect_test_{}_{}_{}", tag, std::process::id(), nanos));
        fs::create_dir_all(&p).expect("create temp dir");
        p
    }

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn passthrough_without_operators() {
        let (remaining, spec) = extract(&toks(&["echo", "hello", "world"])).unwrap();
        assert_eq!(remaining, ["echo", "hello", "world"]);
        assert!(spec.stdin.is_none());
        assert!(spec.stdout.is_none());
        assert!(spec.stderr.is_none());
    }

    #[test]
    fn extracts_stdout_truncate() {
        let dir = make_unique_temp_dir("trunc");
        let target = dir.join("out.txt").to_string_lossy().to_string();

        let (remaining, spec) = extract(&toks(&["echo", "hi", ">", &target])).unwrap();
        assert_eq!(remaining, ["echo", "hi"]);
        assert!(spec.stdout.is_some());
        assert!(fs::metadata(&target).is_ok());

        drop(spec);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn truncate_discards_previous_content() {
        let dir = make_unique_temp_dir("discard");
        let target = dir.join("out.txt").to_string_lossy().to_string();
        fs::write(&target, "old content\n").unwrap();

        let (_, spec) = extract(&toks(&["cmd", "1>", &target])).unwrap();
        drop(spec);

        assert_eq!(fs::read_to_string(&target).unwrap(), "");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn append_preserves_previous_content() {
        let dir = make_unique_temp_dir("append");
        let target = dir.join("out.txt").to_string_lossy().to_string();
        fs::write(&target, "first\n").unwrap();

        let (_, mut spec) = extract(&toks(&["cmd", ">>", &target])).unwrap();
        let mut file = spec.stdout.take().unwrap();
        writeln!(file, "second").unwrap();
        drop(file);

        assert_eq!(fs::read_to_string(&target).unwrap(), "first\nsecond\n");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn surrounding_tokens_are_preserved_in_order() {
        let dir = make_unique_temp_dir("order");
        let target = dir.join("out.txt").to_string_lossy().to_string();

        let (remaining, _spec) = extract(&toks(&["a", ">", &target, "b", "c"])).unwrap();
        assert_eq!(remaining, ["a", "b", "c"]);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn stderr_operator_is_recognized() {
        let dir = make_unique_temp_dir("stderr");
        let target = dir.join("err.txt").to_string_lossy().to_string();

        let (remaining, spec) = extract(&toks(&["cmd", "2>", &target])).unwrap();
        assert_eq!(remaining, ["cmd"]);
        assert!(spec.stderr.is_some());
        assert!(spec.stdout.is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn stdin_requires_existing_file() {
        let dir = make_unique_temp_dir("stdin");
        let missing = dir.join("missing.txt").to_string_lossy().to_string();

        let err = extract(&toks(&["cat", "<", &missing])).unwrap_err();
        assert!(matches!(err, ShellError::Open { .. }));
        assert!(err.to_string().contains("missing.txt"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn stdin_opens_existing_file() {
        let dir = make_unique_temp_dir("stdin_ok");
        let target = dir.join("in.txt").to_string_lossy().to_string();
        fs::write(&target, "data\n").unwrap();

        let (remaining, spec) = extract(&toks(&["cat", "<", &target])).unwrap();
        assert_eq!(remaining, ["cat"]);
        assert!(spec.stdin.is_some());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn trailing_operator_is_a_syntax_error() {
        for op in [">", "1>", ">>", "1>>", "2>", "<"] {
            let err = extract(&toks(&["echo", "hi", op])).unwrap_err();
            assert!(matches!(err, ShellError::Syntax { .. }));
            assert!(err.to_string().contains(op));
        }
    }

    #[test]
    fn last_operator_for_a_stream_wins() {
        let dir = make_unique_temp_dir("lastwins");
        let first = dir.join("first.txt").to_string_lossy().to_string();
        let second = dir.join("second.txt").to_string_lossy().to_string();

        let (_, mut spec) = extract(&toks(&["cmd", ">", &first, ">", &second])).unwrap();
        let mut file = spec.stdout.take().unwrap();
        writeln!(file, "winner").unwrap();
        drop(file);

        assert_eq!(fs::read_to_string(&first).unwrap(), "");
        assert_eq!(fs::read_to_string(&second).unwrap(), "winner\n");
        let _ = fs::remove_dir_all(dir);
    }
}
