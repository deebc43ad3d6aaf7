//! Splitting a raw command line into argument tokens.
//!
//! The only quoting construct is the single quote: everything between a pair
//! of quotes, spaces included, belongs to the surrounding token, and the
//! quote characters themselves are stripped. Adjacent quoted and unquoted
//! spans fuse into one token (`a'b c'` is the single token `ab c`).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between tokens, skipping separators.
    Separator,
    /// Accumulating an unquoted word.
    Word,
    /// Inside a single-quoted span; the space separator loses its meaning.
    Quoted,
}

struct Lexer {
    state: State,
    buffer: String,
    tokens: Vec<String>,
}

impl Lexer {
    fn new() -> Self {
        Lexer {
            state: State::Separator,
            buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    fn feed(&mut self, ch: char) {
        match self.state {
            State::Separator => self.handle_separator(ch),
            State::Word => self.handle_word(ch),
            State::Quoted => self.handle_quoted(ch),
        }
    }

    fn handle_separator(&mut self, ch: char) {
        match ch {
            ' ' => {}
            '\'' => self.state = State::Quoted,
            c => {
                self.buffer.push(c);
                self.state = State::Word;
            }
        }
    }

    fn handle_word(&mut self, ch: char) {
        match ch {
            ' ' => {
                self.emit();
                self.state = State::Separator;
            }
            '\'' => self.state = State::Quoted,
            c => self.buffer.push(c),
        }
    }

    fn handle_quoted(&mut self, ch: char) {
        match ch {
            '\'' => self.state = State::Word,
            c => self.buffer.push(c),
        }
    }

    /// Zero-length tokens are never emitted, so consecutive separators
    /// collapse and a bare `''` produces nothing.
    fn emit(&mut self) {
        if !self.buffer.is_empty() {
            self.tokens.push(std::mem::take(&mut self.buffer));
        }
    }

    fn finish(mut self) -> Vec<String> {
        // An input that ends while still inside a quoted span is read as if
        // the quote closed at end of input. Under-specified upstream behavior,
        // kept rather than turned into an error.
        self.emit();
        self.tokens
    }
}

/// Split `line` into argument tokens, honoring single-quote grouping.
///
/// Only the space character separates tokens. Tokenization cannot fail.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut lexer = Lexer::new();
    for ch in line.chars() {
        lexer.feed(ch);
    }
    lexer.finish()
}
