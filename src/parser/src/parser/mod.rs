//! Parser.
//!
//! Builds the stage chain from a token stream. Parsing never fails: tokens
//! that cannot become instructions are logged and skipped, and malformed
//! `ONBUILD` triggers degrade to [`InstructionNode::Unknown`].

mod util;

pub use util::{
    parse_arg_pairs, parse_assigns, parse_from_content, parse_ports, parse_word_list,
    split_sources, strip_cmd_prefix,
};

use std::collections::HashMap;

use dockerfile_parser_core::config::ParserConfig;

use crate::ast::{
    AddInstruction, CopyInstruction, Healthcheck, HealthcheckConfig, InstructionNode, RunCommand,
    RunInstruction, StageNode,
};
use crate::lexer::{lex, parse_directive};
use crate::token::{Token, TokenKind};

/// Token stream parser.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    config: ParserConfig,
    /// `ONBUILD` nesting level of this parser
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_config(tokens, ParserConfig::default())
    }

    pub fn with_config(tokens: Vec<Token>, config: ParserConfig) -> Self {
        Self {
            tokens,
            config,
            depth: 0,
        }
    }

    /// Parse the tokens and return the root of the stage chain.
    pub fn parse(self) -> StageNode {
        let mut stages = vec![StageNode::root()];
        // Lower-cased stage name -> arena index
        let mut named: HashMap<String, usize> = HashMap::new();

        for token in &self.tokens {
            let current = stages.len() - 1;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::From => {
                    let stage = build_stage(token);
                    tracing::debug!(stage = %stage, index = stages.len(), "Opening stage");
                    if let Some(name) = &stage.name {
                        named.insert(name.to_ascii_lowercase(), stages.len());
                    }
                    stages.push(stage);
                }
                TokenKind::ParserDirective => match parse_directive(&token.content) {
                    Some((key, value)) => {
                        stages[current].directives.insert(key, value);
                    }
                    None => tracing::warn!(content = %token.content, "Malformed parser directive"),
                },
                _ => {
                    let Some(node) = self.build_instruction(token) else {
                        tracing::warn!(kind = %token.kind, "Skipping token without instruction");
                        continue;
                    };
                    if let InstructionNode::Copy(copy) = &node {
                        if let Some(target) = resolve_stage(&copy.from, &named, current) {
                            let id = stages[current].id;
                            stages[target].referenced_by.insert(id);
                        }
                    }
                    stages[current].instructions.push(node);
                }
            }
        }

        link(stages)
    }

    /// Build the instruction node for a non-stage token.
    fn build_instruction(&self, token: &Token) -> Option<InstructionNode> {
        let content = token.content.as_str();
        let node = match token.kind {
            TokenKind::Add => InstructionNode::Add(build_add(token)),
            TokenKind::Copy => InstructionNode::Copy(build_copy(token)),
            TokenKind::Arg => InstructionNode::Arg {
                pairs: parse_arg_pairs(content),
            },
            TokenKind::Env => InstructionNode::Env {
                pairs: parse_assigns(content),
            },
            TokenKind::Label => InstructionNode::Label {
                pairs: parse_assigns(content),
            },
            TokenKind::Cmd => InstructionNode::Cmd {
                cmd: parse_word_list(content),
            },
            TokenKind::Entrypoint => InstructionNode::Entrypoint {
                exec: parse_word_list(content),
            },
            TokenKind::Shell => InstructionNode::Shell {
                shell: parse_word_list(content),
            },
            TokenKind::Volume => InstructionNode::Volume {
                mounts: parse_word_list(content),
            },
            TokenKind::Expose => InstructionNode::Expose {
                ports: parse_ports(content),
            },
            TokenKind::Healthcheck => InstructionNode::Healthcheck(build_healthcheck(token)),
            TokenKind::Run => InstructionNode::Run(build_run(token)),
            TokenKind::Maintainer => InstructionNode::Maintainer {
                name: content.to_string(),
            },
            TokenKind::Stopsignal => InstructionNode::Stopsignal {
                signal: content.to_string(),
            },
            TokenKind::User => InstructionNode::User {
                user: content.to_string(),
            },
            TokenKind::Workdir => InstructionNode::Workdir {
                path: content.to_string(),
            },
            TokenKind::Onbuild => InstructionNode::Onbuild {
                trigger: Box::new(self.build_trigger(content)),
            },
            TokenKind::Comment => InstructionNode::Comment {
                text: content.to_string(),
            },
            TokenKind::EmptyLine => InstructionNode::EmptyLine,
            TokenKind::From
            | TokenKind::ParserDirective
            | TokenKind::Illegal
            | TokenKind::Eof => return None,
        };
        Some(node)
    }

    /// Lex and parse an `ONBUILD` payload as a standalone instruction.
    fn build_trigger(&self, text: &str) -> InstructionNode {
        let unknown = || InstructionNode::Unknown {
            text: text.to_string(),
        };

        if self.depth >= self.config.max_trigger_depth {
            tracing::warn!(
                depth = self.depth,
                text,
                "ONBUILD nesting limit reached, keeping trigger as text"
            );
            return unknown();
        }
        if text.trim().is_empty() {
            return unknown();
        }

        let tokens = match lex(&[text]) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(error = %e, text, "Failed to lex ONBUILD trigger");
                return unknown();
            }
        };

        let nested = Parser {
            tokens,
            config: self.config.clone(),
            depth: self.depth + 1,
        };
        let mut root = nested.parse();
        std::mem::take(&mut root.instructions)
            .into_iter()
            .next()
            .unwrap_or_else(|| {
                tracing::warn!(text, "ONBUILD trigger is not an instruction");
                unknown()
            })
    }
}

/// Parse a token stream with the default configuration.
pub fn parse(tokens: Vec<Token>) -> StageNode {
    Parser::new(tokens).parse()
}

fn build_stage(token: &Token) -> StageNode {
    let (image, name) = parse_from_content(&token.content);
    let mut stage = StageNode::new(image, name);
    stage.platform = token.param("platform").map(str::to_string);
    stage
}

fn build_add(token: &Token) -> AddInstruction {
    if token.is_heredoc() {
        tracing::warn!("Heredoc ADD is not supported, emitting an empty instruction");
        return AddInstruction::default();
    }
    let (sources, destination) = split_sources(parse_word_list(&token.content));
    AddInstruction {
        sources,
        destination,
        keep_git_dir: token.flag("keep-git-dir"),
        checksum: token.param_or("checksum", "").to_string(),
        chown: token.param_or("chown", "").to_string(),
        chmod: token.param_or("chmod", "").to_string(),
        link: token.flag("link"),
        exclude: token.param_values("exclude").to_vec(),
    }
}

fn build_copy(token: &Token) -> CopyInstruction {
    if token.is_heredoc() {
        tracing::warn!("Heredoc COPY is not supported, emitting an empty instruction");
        return CopyInstruction::default();
    }
    let (sources, destination) = split_sources(parse_word_list(&token.content));
    CopyInstruction {
        sources,
        destination,
        from: token.param_or("from", "").to_string(),
        chown: token.param_or("chown", "").to_string(),
        chmod: token.param_or("chmod", "").to_string(),
        link: token.flag("link"),
        parents: token.flag("parents"),
        exclude: token.param_values("exclude").to_vec(),
    }
}

fn build_healthcheck(token: &Token) -> Healthcheck {
    if token.content.trim().eq_ignore_ascii_case("NONE") {
        return Healthcheck::Cancelled;
    }

    let defaults = HealthcheckConfig::default();
    let retries = match token.param("retries") {
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(value, "Invalid HEALTHCHECK retries, using default");
            defaults.retries
        }),
        None => defaults.retries,
    };

    Healthcheck::Check(HealthcheckConfig {
        interval: token.param_or("interval", &defaults.interval).to_string(),
        timeout: token.param_or("timeout", &defaults.timeout).to_string(),
        start_period: token.param_or("start-period", &defaults.start_period).to_string(),
        start_interval: token
            .param_or("start-interval", &defaults.start_interval)
            .to_string(),
        retries,
        cmd: parse_word_list(strip_cmd_prefix(&token.content)),
    })
}

fn build_run(token: &Token) -> RunInstruction {
    let command = match &token.multiline_content {
        Some(lines) => RunCommand::Heredoc {
            prefix: token.content.clone(),
            lines: lines.clone(),
            strip_tabs: token.heredoc_strip_mode,
        },
        None => RunCommand::Exec(parse_word_list(&token.content)),
    };
    RunInstruction {
        command,
        mounts: token.param_values("mount").to_vec(),
        network: token.param_or("network", "").to_string(),
        security: token.param_or("security", "").to_string(),
        device: token.param_or("device", "").to_string(),
    }
}

/// Arena index of the stage a `--from` value refers to, by name or by
/// `FROM` index. Images and self references resolve to `None`.
fn resolve_stage(from: &str, named: &HashMap<String, usize>, current: usize) -> Option<usize> {
    if from.is_empty() {
        return None;
    }
    let target = named.get(&from.to_ascii_lowercase()).copied().or_else(|| {
        // Index 0 is the first FROM stage, which sits after the root
        from.parse::<usize>()
            .ok()
            .map(|index| index + 1)
            .filter(|&target| target <= current)
    })?;
    (target != current).then_some(target)
}

/// Link arena stages into a chain headed by the root.
fn link(mut stages: Vec<StageNode>) -> StageNode {
    let mut next: Option<Box<StageNode>> = None;
    while stages.len() > 1 {
        let Some(mut stage) = stages.pop() else {
            break;
        };
        stage.next = next;
        next = Some(Box::new(stage));
    }
    let mut root = stages.pop().unwrap_or_else(StageNode::root);
    root.next = next;
    root
}
