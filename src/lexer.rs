//! Splitting a raw input line into the words the dispatcher works with.
//!
//! The shell has no quoting, escaping or substitution: a line is cut on the
//! space character and empty fields are dropped. Tabs and other whitespace
//! stay inside words.

/// A single line of input together with its tokens.
///
/// The raw text is kept next to the tokens because some builtins (`echo`)
/// and some diagnostics (`command not found`) work on the line as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    raw: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> CommandLine<'a> {
    /// Tokenize `raw`. A trailing `\n` is stripped first; a `\r` before it
    /// stays part of the line.
    pub fn parse(raw: &'a str) -> Self {
        let raw = raw.strip_suffix('\n').unwrap_or(raw);
        Self {
            raw,
            tokens: split_into_tokens(raw),
        }
    }

    /// The line as typed, without its line break.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    /// Command name, i.e. the first token.
    pub fn name(&self) -> Option<&'a str> {
        self.tokens.first().copied()
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[&'a str] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The remainder of the line after the command name and at most one
    /// separating space, with interior spacing left untouched.
    pub fn echo_text(&self) -> &'a str {
        let rest = self.raw.trim_start_matches(' ');
        let rest = match self.name() {
            Some(name) => rest.strip_prefix(name).unwrap_or(rest),
            None => rest,
        };
        rest.strip_prefix(' ').unwrap_or(rest)
    }
}

/// Split `line` on spaces, discarding the empty fields produced by leading,
/// trailing or repeated separators.
pub fn split_into_tokens(line: &str) -> Vec<&str> {
    line.split(' ').filter(|field| !field.is_empty()).collect()
}
