//! Dockerfile syntax tree.
//!
//! A tree is a chain of [`StageNode`]s. The root stage has no base image and
//! holds whatever precedes the first `FROM`; every `FROM` opens the next
//! stage in the chain. Each stage owns its instructions in source order.

mod reconstruct;

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Process-unique stage identifier, generated once when a stage is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StageId(Uuid);

impl StageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One `FROM`-delimited build stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageNode {
    pub id: StageId,
    /// Alias from `AS <name>`; `None` for anonymous stages
    pub name: Option<String>,
    /// Base image text; empty for the root stage
    pub base_image: String,
    /// `--platform` flag of the `FROM` line
    pub platform: Option<String>,
    pub instructions: Vec<InstructionNode>,
    /// Parser directives found in this stage's comment lines
    pub directives: BTreeMap<String, String>,
    /// Ids of later stages that copy from this one
    pub referenced_by: HashSet<StageId>,
    /// Not serialized; walk the chain with [`StageNode::stages`]
    #[serde(skip)]
    pub next: Option<Box<StageNode>>,
}

impl StageNode {
    /// The implicit stage that precedes the first `FROM`.
    pub fn root() -> Self {
        Self::new("", None)
    }

    pub fn new(base_image: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: StageId::new(),
            name,
            base_image: base_image.into(),
            platform: None,
            instructions: Vec::new(),
            directives: BTreeMap::new(),
            referenced_by: HashSet::new(),
            next: None,
        }
    }

    /// Whether this stage came from a `FROM` line.
    pub fn has_image(&self) -> bool {
        !self.base_image.is_empty()
    }

    /// Iterate over this stage and every following stage.
    pub fn stages(&self) -> Stages<'_> {
        Stages {
            current: Some(self),
        }
    }

    pub fn stage_count(&self) -> usize {
        self.stages().count()
    }

    /// First stage named `name` (case-insensitive).
    pub fn find_stage(&self, name: &str) -> Option<&StageNode> {
        self.stages().find(|stage| {
            stage
                .name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
    }

    /// Value of the parser directive `key` in this stage (case-insensitive).
    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn find_by_id(&self, id: StageId) -> Option<&StageNode> {
        self.stages().find(|stage| stage.id == id)
    }

    /// Total number of instruction nodes across the chain.
    pub fn instruction_count(&self) -> usize {
        self.stages().map(|stage| stage.instructions.len()).sum()
    }
}

impl Drop for StageNode {
    fn drop(&mut self) {
        // Unlink the chain iteratively so long chains don't recurse
        let mut next = self.next.take();
        while let Some(mut stage) = next {
            next = stage.next.take();
        }
    }
}

impl fmt::Display for StageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("anon");
        if self.has_image() {
            write!(f, "Stage {} ({})", name, self.base_image)
        } else {
            write!(f, "Stage root")
        }
    }
}

/// Iterator over a stage chain.
pub struct Stages<'a> {
    current: Option<&'a StageNode>,
}

impl<'a> Iterator for Stages<'a> {
    type Item = &'a StageNode;

    fn next(&mut self) -> Option<Self::Item> {
        let stage = self.current?;
        self.current = stage.next.as_deref();
        Some(stage)
    }
}

/// A single instruction inside a stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstructionNode {
    /// `ADD [flags] <src>... <dest>`
    Add(AddInstruction),
    /// `ARG <name>[=<default>] ...`
    Arg { pairs: BTreeMap<String, String> },
    /// `CMD ["exec", "form"]`
    Cmd { cmd: Vec<String> },
    /// `COPY [flags] <src>... <dest>`
    Copy(CopyInstruction),
    /// `ENTRYPOINT ["exec", "form"]`
    Entrypoint { exec: Vec<String> },
    /// `ENV <key>=<value> ...`
    Env { pairs: BTreeMap<String, String> },
    /// `EXPOSE <port>[/<proto>] ...`
    Expose { ports: Vec<PortInfo> },
    Healthcheck(Healthcheck),
    /// `LABEL <key>=<value> ...`
    Label { pairs: BTreeMap<String, String> },
    Maintainer { name: String },
    /// `ONBUILD <instruction>`
    Onbuild { trigger: Box<InstructionNode> },
    Run(RunInstruction),
    /// `SHELL ["executable", "parameters"]`
    Shell { shell: Vec<String> },
    Stopsignal { signal: String },
    User { user: String },
    Volume { mounts: Vec<String> },
    Workdir { path: String },
    /// Raw text of an ONBUILD trigger that could not be lexed
    Unknown { text: String },
    Comment { text: String },
    EmptyLine,
}

impl InstructionNode {
    /// Instruction keyword (or node kind for non-instruction lines).
    pub fn keyword(&self) -> &'static str {
        match self {
            InstructionNode::Add(_) => "ADD",
            InstructionNode::Arg { .. } => "ARG",
            InstructionNode::Cmd { .. } => "CMD",
            InstructionNode::Copy(_) => "COPY",
            InstructionNode::Entrypoint { .. } => "ENTRYPOINT",
            InstructionNode::Env { .. } => "ENV",
            InstructionNode::Expose { .. } => "EXPOSE",
            InstructionNode::Healthcheck(_) => "HEALTHCHECK",
            InstructionNode::Label { .. } => "LABEL",
            InstructionNode::Maintainer { .. } => "MAINTAINER",
            InstructionNode::Onbuild { .. } => "ONBUILD",
            InstructionNode::Run(_) => "RUN",
            InstructionNode::Shell { .. } => "SHELL",
            InstructionNode::Stopsignal { .. } => "STOPSIGNAL",
            InstructionNode::User { .. } => "USER",
            InstructionNode::Volume { .. } => "VOLUME",
            InstructionNode::Workdir { .. } => "WORKDIR",
            InstructionNode::Unknown { .. } => "UNKNOWN",
            InstructionNode::Comment { .. } => "COMMENT",
            InstructionNode::EmptyLine => "EMPTY_LINE",
        }
    }
}

impl fmt::Display for InstructionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.keyword();
        match self {
            InstructionNode::Add(add) => write!(
                f,
                "{keyword} {:?} -> {}",
                add.sources, add.destination
            ),
            InstructionNode::Copy(copy) => {
                write!(f, "{keyword} {:?} -> {}", copy.sources, copy.destination)?;
                if !copy.from.is_empty() {
                    write!(f, " (from {})", copy.from)?;
                }
                Ok(())
            }
            InstructionNode::Arg { pairs }
            | InstructionNode::Env { pairs }
            | InstructionNode::Label { pairs } => {
                let keys: Vec<&str> = pairs.keys().map(String::as_str).collect();
                write!(f, "{keyword} {}", keys.join(", "))
            }
            InstructionNode::Cmd { cmd: words }
            | InstructionNode::Entrypoint { exec: words }
            | InstructionNode::Shell { shell: words }
            | InstructionNode::Volume { mounts: words } => write!(f, "{keyword} {:?}", words),
            InstructionNode::Expose { ports } => {
                let ports: Vec<String> = ports.iter().map(PortInfo::to_string).collect();
                write!(f, "{keyword} {}", ports.join(" "))
            }
            InstructionNode::Healthcheck(Healthcheck::Cancelled) => write!(f, "{keyword} NONE"),
            InstructionNode::Healthcheck(Healthcheck::Check(check)) => {
                write!(f, "{keyword} every {} {:?}", check.interval, check.cmd)
            }
            InstructionNode::Maintainer { name: value }
            | InstructionNode::Stopsignal { signal: value }
            | InstructionNode::User { user: value }
            | InstructionNode::Workdir { path: value } => write!(f, "{keyword} {value}"),
            InstructionNode::Onbuild { trigger } => write!(f, "{keyword} {trigger}"),
            InstructionNode::Run(run) => match &run.command {
                RunCommand::Exec(words) => write!(f, "{keyword} {:?}", words),
                RunCommand::Heredoc { lines, .. } => {
                    write!(f, "{keyword} heredoc ({} lines)", lines.len())
                }
            },
            InstructionNode::Unknown { text } => write!(f, "{keyword} {text}"),
            InstructionNode::Comment { text } => write!(f, "# {text}"),
            InstructionNode::EmptyLine => write!(f, "{keyword}"),
        }
    }
}

/// `ADD` instruction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddInstruction {
    pub sources: Vec<String>,
    pub destination: String,
    pub keep_git_dir: bool,
    pub checksum: String,
    pub chown: String,
    pub chmod: String,
    pub link: bool,
    pub exclude: Vec<String>,
}

/// `COPY` instruction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CopyInstruction {
    pub sources: Vec<String>,
    pub destination: String,
    /// Stage name, stage index or image given with `--from`
    pub from: String,
    pub chown: String,
    pub chmod: String,
    pub link: bool,
    pub parents: bool,
    pub exclude: Vec<String>,
}

/// Network protocol of an exposed port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

/// One `port[/protocol]` entry of `EXPOSE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortInfo {
    pub port: String,
    pub protocol: Protocol,
}

impl PortInfo {
    pub fn new(port: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            port: port.into(),
            protocol,
        }
    }
}

impl fmt::Display for PortInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port, self.protocol.as_str())
    }
}

/// `HEALTHCHECK` instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Healthcheck {
    /// `HEALTHCHECK NONE`
    Cancelled,
    Check(HealthcheckConfig),
}

/// Parameters of an active health check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthcheckConfig {
    pub interval: String,
    pub timeout: String,
    pub start_period: String,
    pub start_interval: String,
    pub retries: u32,
    pub cmd: Vec<String>,
}

impl Default for HealthcheckConfig {
    fn default() -> Self {
        Self {
            interval: "30s".to_string(),
            timeout: "30s".to_string(),
            start_period: "0s".to_string(),
            start_interval: "5s".to_string(),
            retries: 3,
            cmd: Vec::new(),
        }
    }
}

/// `RUN` instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunInstruction {
    pub command: RunCommand,
    /// `--mount` specs in source order
    pub mounts: Vec<String>,
    pub network: String,
    pub security: String,
    pub device: String,
}

impl RunInstruction {
    pub fn exec(cmd: Vec<String>) -> Self {
        Self {
            command: RunCommand::Exec(cmd),
            mounts: Vec::new(),
            network: String::new(),
            security: String::new(),
            device: String::new(),
        }
    }

    pub fn is_heredoc(&self) -> bool {
        matches!(self.command, RunCommand::Heredoc { .. })
    }
}

/// Body of a `RUN` instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunCommand {
    /// Word list, re-emitted as a JSON array
    Exec(Vec<String>),
    /// Block literal kept verbatim
    Heredoc {
        /// Command text before the `<<` marker
        prefix: String,
        /// Opening-line remainder, body and terminator
        lines: Vec<String>,
        strip_tabs: bool,
    },
}
