//! Dockerfile Parser
//!
//! Lexes Dockerfile text into tokens, parses the tokens into a chain of build
//! stages and reconstructs canonical Dockerfile lines from that chain.
//!
//! ```text
//! lines --lex--> Vec<Token> --parse--> StageNode --reconstruct--> Vec<String>
//! ```
//!
//! Lexing is the only fallible step: an unknown instruction keyword yields
//! [`DockerfileError::IllegalInstruction`]. Parsing and reconstruction always
//! succeed.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{
    AddInstruction, CopyInstruction, Healthcheck, HealthcheckConfig, InstructionNode, PortInfo,
    Protocol, RunCommand, RunInstruction, StageId, StageNode,
};
pub use dockerfile_parser_core::{DockerfileError, ParserConfig, Result};
pub use lexer::{lex, Lexer};
pub use parser::{parse, Parser};
pub use token::{Token, TokenKind};

/// Reconstruct Dockerfile lines from a stage chain.
pub fn reconstruct(root: &StageNode) -> Vec<String> {
    root.reconstruct()
}

/// Lex and parse a whole Dockerfile text.
pub fn parse_text(content: &str) -> Result<StageNode> {
    let tokens = lexer::Lexer::from_text(content).lex()?;
    Ok(parse(tokens))
}

/// Lex and parse physical lines with an explicit parser configuration.
pub fn parse_lines_with_config<S: AsRef<str>>(
    lines: &[S],
    config: &ParserConfig,
) -> Result<StageNode> {
    let tokens = lex(lines)?;
    Ok(Parser::with_config(tokens, config.clone()).parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_round_trip() {
        let root = parse_text("FROM alpine AS base\nUSER app\n").unwrap();
        assert_eq!(reconstruct(&root), vec!["FROM alpine AS base", "USER app"]);
    }

    #[test]
    fn test_parse_text_illegal() {
        let err = parse_text("FROM alpine\nNOPE x\n").unwrap_err();
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_parse_lines_with_config() {
        let config = ParserConfig {
            max_trigger_depth: 1,
        };
        let root = parse_lines_with_config(&["FROM a", "ONBUILD ONBUILD USER x"], &config).unwrap();
        assert_eq!(
            reconstruct(&root),
            vec!["FROM a", "ONBUILD ONBUILD USER x"]
        );
    }
}
