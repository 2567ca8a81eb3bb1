//! Tokens produced by the lexer.

use std::collections::HashMap;

/// Kind of a token: an instruction keyword or a structural line type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,
    /// Add local or remote files and directories.
    Add,
    /// Use build-time variables.
    Arg,
    /// Specify default commands.
    Cmd,
    /// Copy files and directories.
    Copy,
    /// Specify default executable.
    Entrypoint,
    /// Set environment variables.
    Env,
    /// Describe which ports the application is listening on.
    Expose,
    /// Create a new build stage from a base image.
    From,
    /// Check a container's health on startup.
    Healthcheck,
    /// Add metadata to an image.
    Label,
    /// Specify the author of an image.
    Maintainer,
    /// Specify instructions for when the image is used in a build.
    Onbuild,
    /// Execute build commands.
    Run,
    /// Set the default shell of an image.
    Shell,
    /// Specify the system call signal for exiting a container.
    Stopsignal,
    /// Set user and group ID.
    User,
    /// Create volume mounts.
    Volume,
    /// Change working directory.
    Workdir,
    Comment,
    ParserDirective,
    EmptyLine,
}

impl TokenKind {
    /// Look up an instruction keyword, ignoring case.
    pub fn from_keyword(word: &str) -> Option<TokenKind> {
        let kind = match word.to_ascii_uppercase().as_str() {
            "ADD" => TokenKind::Add,
            "ARG" => TokenKind::Arg,
            "CMD" => TokenKind::Cmd,
            "COPY" => TokenKind::Copy,
            "ENTRYPOINT" => TokenKind::Entrypoint,
            "ENV" => TokenKind::Env,
            "EXPOSE" => TokenKind::Expose,
            "FROM" => TokenKind::From,
            "HEALTHCHECK" => TokenKind::Healthcheck,
            "LABEL" => TokenKind::Label,
            "MAINTAINER" => TokenKind::Maintainer,
            "ONBUILD" => TokenKind::Onbuild,
            "RUN" => TokenKind::Run,
            "SHELL" => TokenKind::Shell,
            "STOPSIGNAL" => TokenKind::Stopsignal,
            "USER" => TokenKind::User,
            "VOLUME" => TokenKind::Volume,
            "WORKDIR" => TokenKind::Workdir,
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical upper-case keyword, or the kind name for structural tokens.
    pub fn keyword(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Add => "ADD",
            TokenKind::Arg => "ARG",
            TokenKind::Cmd => "CMD",
            TokenKind::Copy => "COPY",
            TokenKind::Entrypoint => "ENTRYPOINT",
            TokenKind::Env => "ENV",
            TokenKind::Expose => "EXPOSE",
            TokenKind::From => "FROM",
            TokenKind::Healthcheck => "HEALTHCHECK",
            TokenKind::Label => "LABEL",
            TokenKind::Maintainer => "MAINTAINER",
            TokenKind::Onbuild => "ONBUILD",
            TokenKind::Run => "RUN",
            TokenKind::Shell => "SHELL",
            TokenKind::Stopsignal => "STOPSIGNAL",
            TokenKind::User => "USER",
            TokenKind::Volume => "VOLUME",
            TokenKind::Workdir => "WORKDIR",
            TokenKind::Comment => "COMMENT",
            TokenKind::ParserDirective => "PARSER_DIRECTIVE",
            TokenKind::EmptyLine => "EMPTY_LINE",
        }
    }

    /// Instructions that take leading `--key[=value]` flags.
    pub fn accepts_flags(&self) -> bool {
        matches!(
            self,
            TokenKind::From
                | TokenKind::Add
                | TokenKind::Copy
                | TokenKind::Run
                | TokenKind::Healthcheck
        )
    }

    /// Instructions whose content may open a heredoc block literal.
    pub fn accepts_heredoc(&self) -> bool {
        matches!(self, TokenKind::Add | TokenKind::Copy | TokenKind::Run)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A single lexed logical line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Flag parameters; repeated flags keep every value in source order
    pub params: HashMap<String, Vec<String>>,
    /// Primary text after the flags and before any trailing comment
    pub content: String,
    pub inline_comment: Option<String>,
    /// Captured heredoc lines, opening remainder and terminator included
    pub multiline_content: Option<Vec<String>>,
    /// `<<-` was used
    pub heredoc_strip_mode: bool,
}

impl Token {
    /// A token with no parameters or comment.
    pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            params: HashMap::new(),
            content: content.into(),
            inline_comment: None,
            multiline_content: None,
            heredoc_strip_mode: false,
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }

    /// Builder-style flag insertion, mostly useful for tests.
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    /// Last value given for a flag.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Every value given for a flag, in source order.
    pub fn param_values(&self, key: &str) -> &[String] {
        self.params.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Last value of a flag, or `default` when absent.
    pub fn param_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.param(key).unwrap_or(default)
    }

    /// Boolean flag: present without a value, or with value `true`.
    pub fn flag(&self, key: &str) -> bool {
        self.param(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn is_heredoc(&self) -> bool {
        self.multiline_content.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_case_insensitive() {
        assert_eq!(TokenKind::from_keyword("FROM"), Some(TokenKind::From));
        assert_eq!(TokenKind::from_keyword("from"), Some(TokenKind::From));
        assert_eq!(TokenKind::from_keyword("HealthCheck"), Some(TokenKind::Healthcheck));
        assert_eq!(TokenKind::from_keyword("BOGUS"), None);
        // Structural kinds are not keywords
        assert_eq!(TokenKind::from_keyword("COMMENT"), None);
        assert_eq!(TokenKind::from_keyword("EOF"), None);
    }

    #[test]
    fn test_keyword_round_trip() {
        for word in ["ADD", "ARG", "ONBUILD", "STOPSIGNAL", "WORKDIR"] {
            let kind = TokenKind::from_keyword(word).unwrap();
            assert_eq!(kind.keyword(), word);
        }
    }

    #[test]
    fn test_param_accessors() {
        let token = Token::new(TokenKind::Run, "make")
            .with_param("mount", "type=cache,target=/a")
            .with_param("mount", "type=cache,target=/b")
            .with_param("network", "none");
        assert_eq!(token.param_values("mount").len(), 2);
        assert_eq!(token.param("mount"), Some("type=cache,target=/b"));
        assert_eq!(token.param_or("security", "sandbox"), "sandbox");
        assert!(token.param_values("device").is_empty());
    }

    #[test]
    fn test_flag() {
        let token = Token::new(TokenKind::Copy, "a b")
            .with_param("link", "true")
            .with_param("parents", "false");
        assert!(token.flag("link"));
        assert!(!token.flag("parents"));
        assert!(!token.flag("missing"));
    }

    #[test]
    fn test_accepts_flags_and_heredoc() {
        assert!(TokenKind::Run.accepts_flags());
        assert!(TokenKind::From.accepts_flags());
        assert!(!TokenKind::Cmd.accepts_flags());
        assert!(TokenKind::Copy.accepts_heredoc());
        assert!(!TokenKind::Healthcheck.accepts_heredoc());
    }
}
