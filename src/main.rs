use minishell::Interpreter;

fn main() {
    let shell = Interpreter::default();
    match shell.repl() {
        // The only place the process terminates: after the loop has
        // returned and every evaluation has released its resources.
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("minishell: {err}");
            std::process::exit(1);
        }
    }
}
