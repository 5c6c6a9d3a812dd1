//! Line tokenizer. Purely lexical: no validation happens here and
//! tokenizing never fails.

/// Characters that split a line into tokens. Every delimiter is also
/// emitted as its own single-character token.
pub const DELIMITERS: &str = " \n\t`~!@#$%^&*()-_=+[{]}\\|;:'\",<.>/?";

/// Marker appended after the last token so the parser can observe
/// end-of-instruction as a regular token.
pub const END_OF_LINE: &str = "\n";

pub struct Lexer {
    delimiters: Vec<char>,
    end_marker: Option<String>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self {
            delimiters: DELIMITERS.chars().collect(),
            end_marker: Some(END_OF_LINE.to_string()),
        }
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the trailing end-of-line marker token.
    pub fn without_end_marker(mut self) -> Self {
        self.end_marker = None;
        self
    }

    fn is_delimiter(&self, c: char) -> bool {
        self.delimiters.contains(&c)
    }

    /// Split one line: maximal runs of non-delimiters become tokens, each
    /// delimiter becomes a single-character token, empty runs vanish.
    pub fn tokenize(&self, line: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut run = String::new();
        for c in line.chars() {
            if self.is_delimiter(c) {
                if !run.is_empty() {
                    tokens.push(std::mem::take(&mut run));
                }
                tokens.push(c.to_string());
            } else {
                run.push(c);
            }
        }
        if !run.is_empty() {
            tokens.push(run);
        }
        if let Some(end) = &self.end_marker {
            tokens.push(end.clone());
        }
        tokens
    }
}

/// Tokenize with the default delimiter set and end marker.
pub fn tokenize(line: &str) -> Vec<String> {
    Lexer::new().tokenize(line)
}
