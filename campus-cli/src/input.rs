use std::io::BufRead;

use crate::error::SessionError;

/// Reads commands as a mix of whitespace-separated tokens and whole lines.
///
/// A token read leaves the reader just after the token, so a following
/// [`next_line`](Self::next_line) returns the remainder of the same line.
/// Tokens skip blank lines; lines never do.
///
pub struct CommandReader<R> {
    input: R,
    line: String,
    offset: usize,
    loaded: bool,
}

impl<R: BufRead> CommandReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: String::new(),
            offset: 0,
            loaded: false,
        }
    }

    /// Makes sure a line is buffered. `false` at end of input.
    fn fill(&mut self) -> Result<bool, SessionError> {
        if self.loaded {
            return Ok(true);
        }
        self.line.clear();
        self.offset = 0;
        if self.input.read_line(&mut self.line)? == 0 {
            return Ok(false);
        }
        let content = self.line.trim_end_matches(['\n', '\r']).len();
        self.line.truncate(content);
        self.loaded = true;
        Ok(true)
    }

    pub fn next_token(&mut self) -> Result<String, SessionError> {
        loop {
            if !self.fill()? {
                return Err(SessionError::Exhausted);
            }
            let rest = &self.line[self.offset..];
            let trimmed = rest.trim_start();
            if trimmed.is_empty() {
                self.loaded = false;
                continue;
            }
            let start = self.offset + (rest.len() - trimmed.len());
            let len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
            self.offset = start + len;
            return Ok(self.line[start..self.offset].to_string());
        }
    }

    /// Rest of the current line, or the next line if the current one was
    /// consumed. Trimmed.
    ///
    pub fn next_line(&mut self) -> Result<String, SessionError> {
        if !self.fill()? {
            return Err(SessionError::Exhausted);
        }
        let rest = self.line[self.offset..].trim().to_string();
        self.loaded = false;
        Ok(rest)
    }

    pub fn next_number(&mut self) -> Result<i64, SessionError> {
        let token = self.next_token()?;
        token.parse().map_err(|_| SessionError::NotANumber(token))
    }

    /// Drops whatever is left of the current line.
    pub fn skip_line(&mut self) {
        self.loaded = false;
    }
}
