//! Turns a syntax tree back into Dockerfile lines.
//!
//! Flags are emitted in a fixed order per instruction and only when they
//! differ from their default; key/value pairs come out sorted by key; list
//! forms come out as JSON arrays.

use std::collections::BTreeMap;

use super::{
    AddInstruction, CopyInstruction, Healthcheck, InstructionNode, RunCommand, RunInstruction,
    StageNode,
};

/// Space-separated line builder.
struct Line {
    words: Vec<String>,
}

impl Line {
    fn new(keyword: &str) -> Self {
        Self {
            words: vec![keyword.to_string()],
        }
    }

    fn word(mut self, word: impl Into<String>) -> Self {
        let word = word.into();
        if !word.is_empty() {
            self.words.push(word);
        }
        self
    }

    fn words(mut self, words: &[String]) -> Self {
        self.words
            .extend(words.iter().filter(|w| !w.is_empty()).cloned());
        self
    }

    /// `--key=value`, skipped when the value is empty.
    fn flag(self, key: &str, value: &str) -> Self {
        if value.is_empty() {
            return self;
        }
        self.word(format!("--{key}={value}"))
    }

    /// `--key=true`, skipped when false.
    fn bool_flag(self, key: &str, value: bool) -> Self {
        if !value {
            return self;
        }
        self.flag(key, "true")
    }

    /// One `--key=value` per entry.
    fn list_flag(self, key: &str, values: &[String]) -> Self {
        values.iter().fold(self, |line, value| line.flag(key, value))
    }

    fn finish(self) -> String {
        self.words.join(" ")
    }
}

/// JSON array form of a word list.
fn escape_slice(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// `key=value`, quoting values that contain whitespace.
fn format_pair(key: &str, value: &str) -> String {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if !quoted && value.contains(char::is_whitespace) {
        format!("{key}=\"{}\"", value.replace('"', "\\\""))
    } else {
        format!("{key}={value}")
    }
}

fn pairs_line(keyword: &str, pairs: &BTreeMap<String, String>, bare_empty: bool) -> String {
    pairs
        .iter()
        .fold(Line::new(keyword), |line, (key, value)| {
            if bare_empty && value.is_empty() {
                line.word(key.as_str())
            } else {
                line.word(format_pair(key, value))
            }
        })
        .finish()
}

impl StageNode {
    /// Reconstruct this stage and every following stage, one element per line.
    pub fn reconstruct(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for stage in self.stages() {
            if stage.has_image() {
                let mut from = Line::new("FROM")
                    .flag("platform", stage.platform.as_deref().unwrap_or(""))
                    .word(stage.base_image.as_str());
                if let Some(name) = &stage.name {
                    from = from.word("AS").word(name.as_str());
                }
                lines.push(from.finish());
            }
            lines.extend(
                stage
                    .directives
                    .iter()
                    .map(|(key, value)| format!("# {key}={value}")),
            );
            for instruction in &stage.instructions {
                lines.extend(instruction.reconstruct());
            }
        }
        lines
    }
}

impl InstructionNode {
    /// Reconstruct this instruction. Most instructions yield one line;
    /// heredoc `RUN` (also behind `ONBUILD`) yields several.
    pub fn reconstruct(&self) -> Vec<String> {
        let keyword = self.keyword();
        let line = match self {
            InstructionNode::Add(add) => reconstruct_add(add),
            InstructionNode::Copy(copy) => reconstruct_copy(copy),
            InstructionNode::Arg { pairs } => pairs_line(keyword, pairs, true),
            InstructionNode::Env { pairs } | InstructionNode::Label { pairs } => {
                pairs_line(keyword, pairs, false)
            }
            InstructionNode::Cmd { cmd: words }
            | InstructionNode::Entrypoint { exec: words }
            | InstructionNode::Shell { shell: words }
            | InstructionNode::Volume { mounts: words } => {
                format!("{keyword} {}", escape_slice(words))
            }
            InstructionNode::Expose { ports } => ports
                .iter()
                .fold(Line::new(keyword), |line, port| line.word(port.to_string()))
                .finish(),
            InstructionNode::Healthcheck(Healthcheck::Cancelled) => format!("{keyword} NONE"),
            InstructionNode::Healthcheck(Healthcheck::Check(check)) => Line::new(keyword)
                .flag("interval", &check.interval)
                .flag("timeout", &check.timeout)
                .flag("start-period", &check.start_period)
                .flag("start-interval", &check.start_interval)
                .flag("retries", &check.retries.to_string())
                .word("CMD")
                .word(escape_slice(&check.cmd))
                .finish(),
            InstructionNode::Maintainer { name: value }
            | InstructionNode::Stopsignal { signal: value }
            | InstructionNode::User { user: value }
            | InstructionNode::Workdir { path: value } => {
                Line::new(keyword).word(value.as_str()).finish()
            }
            InstructionNode::Onbuild { trigger } => {
                let mut nested = trigger.reconstruct();
                if let Some(first) = nested.first_mut() {
                    first.insert_str(0, "ONBUILD ");
                }
                return nested;
            }
            InstructionNode::Run(run) => return reconstruct_run(run),
            InstructionNode::Unknown { text } => text.clone(),
            InstructionNode::Comment { text } if text.is_empty() => "#".to_string(),
            InstructionNode::Comment { text } => format!("# {text}"),
            InstructionNode::EmptyLine => String::new(),
        };
        vec![line]
    }
}

fn reconstruct_add(add: &AddInstruction) -> String {
    Line::new("ADD")
        .bool_flag("keep-git-dir", add.keep_git_dir)
        .flag("checksum", &add.checksum)
        .flag("chown", &add.chown)
        .flag("chmod", &add.chmod)
        .bool_flag("link", add.link)
        .list_flag("exclude", &add.exclude)
        .words(&add.sources)
        .word(add.destination.as_str())
        .finish()
}

fn reconstruct_copy(copy: &CopyInstruction) -> String {
    Line::new("COPY")
        .flag("from", &copy.from)
        .flag("chown", &copy.chown)
        .flag("chmod", &copy.chmod)
        .bool_flag("link", copy.link)
        .bool_flag("parents", copy.parents)
        .list_flag("exclude", &copy.exclude)
        .words(&copy.sources)
        .word(copy.destination.as_str())
        .finish()
}

fn reconstruct_run(run: &RunInstruction) -> Vec<String> {
    let line = Line::new("RUN")
        .list_flag("mount", &run.mounts)
        .flag("network", &run.network)
        .flag("security", &run.security)
        .flag("device", &run.device);

    match &run.command {
        RunCommand::Exec(words) => vec![line.word(escape_slice(words)).finish()],
        RunCommand::Heredoc {
            prefix,
            lines,
            strip_tabs,
        } => {
            let marker = if *strip_tabs { "<<-" } else { "<<" };
            let (first, body) = match lines.split_first() {
                Some((first, body)) => (first.trim_start(), body),
                None => ("", &[][..]),
            };
            let opening = line.word(prefix.as_str()).word(marker).word(first).finish();
            std::iter::once(opening).chain(body.iter().cloned()).collect()
        }
    }
}
