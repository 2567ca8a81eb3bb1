//! Lexer.
//!
//! Turns raw Dockerfile lines into one token per logical line. Continuation
//! lines are merged first; heredoc bodies are consumed together with the
//! instruction that opens them.

mod comment;
mod heredoc;
mod merge;
mod params;

pub use comment::{find_unquoted, split_comment};
pub use heredoc::{scan_heredoc, Heredoc};
pub use merge::{merge_lines, split_lines};
pub use params::{take_param, take_params, Param};

use std::collections::HashMap;

use dockerfile_parser_core::error::{DockerfileError, Result};

use crate::token::{Token, TokenKind};

/// Line-oriented lexer over merged logical lines.
#[derive(Debug, Clone)]
pub struct Lexer {
    lines: Vec<String>,
    current_line: usize,
}

impl Lexer {
    /// Create a lexer over physical lines.
    pub fn new<S: AsRef<str>>(input: &[S]) -> Self {
        Self {
            lines: merge_lines(input),
            current_line: 0,
        }
    }

    /// Create a lexer over a whole Dockerfile text.
    pub fn from_text(content: &str) -> Self {
        Self::new(&split_lines(content))
    }

    /// Rewind to the first logical line.
    pub fn reset(&mut self) {
        self.current_line = 0;
    }

    /// Logical lines after merging.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lex every remaining line. The trailing EOF token is not included.
    pub fn lex(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Produce the token for the next logical line (or heredoc range).
    ///
    /// Fails with [`DockerfileError::IllegalInstruction`] naming the logical
    /// line index when the leading word is not a known instruction.
    pub fn next_token(&mut self) -> Result<Token> {
        let line_index = self.current_line;
        let Some(line) = self.lines.get(line_index).cloned() else {
            return Ok(Token::eof());
        };
        self.current_line += 1;

        if line.is_empty() {
            return Ok(Token::new(TokenKind::EmptyLine, ""));
        }
        if let Some(body) = line.strip_prefix('#') {
            return Ok(lex_comment(body));
        }

        let (word, rest) = split_first_word(&line);
        let kind =
            TokenKind::from_keyword(word).ok_or_else(|| DockerfileError::IllegalInstruction {
                line: line_index,
                keyword: word.to_string(),
            })?;

        let (params, rest) = if kind.accepts_flags() {
            take_params(rest)
        } else {
            (HashMap::new(), rest)
        };

        let mut token = Token::new(kind, "");
        token.params = params;

        if kind.accepts_heredoc() {
            let following = &self.lines[self.current_line..];
            let mut search_from = 0;
            while let Some(offset) = find_unquoted(&rest[search_from..], "<<") {
                let marker = search_from + offset;
                if let Some(heredoc) = scan_heredoc(&rest[marker + 2..], following) {
                    self.current_line += heredoc.consumed;
                    token.content = rest[..marker].trim().to_string();
                    token.multiline_content = Some(heredoc.lines);
                    token.heredoc_strip_mode = heredoc.strip_tabs;
                    return Ok(token);
                }
                // Skip the whole run of `<` so a here-string is not retried
                search_from = marker + 2;
                while rest[search_from..].starts_with('<') {
                    search_from += 1;
                }
            }
        }

        let (content, inline_comment) = split_comment(rest);
        token.content = content;
        token.inline_comment = inline_comment;
        Ok(token)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => None,
            Err(e) => {
                // Stop after the first failure
                self.current_line = self.lines.len();
                Some(Err(e))
            }
            other => Some(other),
        }
    }
}

/// Lex physical lines into tokens.
pub fn lex<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Token>> {
    Lexer::new(lines).lex()
}

/// Split a `#` line body into a comment or a parser directive.
fn lex_comment(body: &str) -> Token {
    let text = body.trim();
    match parse_directive(text) {
        Some((key, value)) => Token::new(TokenKind::ParserDirective, format!("{key}={value}")),
        None => Token::new(TokenKind::Comment, text),
    }
}

/// Parse a comment body as a `key=value` parser directive.
///
/// Keys are made of ASCII alphanumerics, `-` and `_` and keep their
/// original case; the value must not be empty.
pub fn parse_directive(text: &str) -> Option<(String, String)> {
    let (key, value) = text.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_key || value.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

/// Split a string into the first word and the rest.
fn split_first_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.find(char::is_whitespace) {
        Some(pos) => (&s[..pos], s[pos..].trim_start()),
        None => (s, ""),
    }
}
