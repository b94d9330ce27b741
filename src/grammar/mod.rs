//! Command grammar
//!
//! This module handles:
//! - Command definitions (CommandSpec, PathToken, Flag, View)
//! - The builtin command table (via registry module)
//! - Compiling the table into a prefix tree and validating it (via tree module)
//!
//! The grammar is the only place commands are described. The resolver walks
//! the tree, the dispatcher reads the matched spec, and the help screen is
//! rendered from the table.

use crate::bundle::layout;
use crate::error::{Result, grammar_invalid};

pub mod registry;
pub mod tree;

pub use tree::{Node, PathMatch};

/// Tokens the resolver handles before consulting the grammar
pub const RESERVED_WORDS: &[&str] = &["pxctl", "exit", "quit", "help", "?"];

/// A flag a command may accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    /// Print the captured JSON instead of the text view
    Json,
}

impl Flag {
    pub const ALL: &'static [Flag] = &[Flag::Json];

    /// Every accepted spelling, short form first
    pub fn spellings(self) -> &'static [&'static str] {
        match self {
            Flag::Json => &["-j", "--json"],
        }
    }

    /// Recognize a flag token
    pub fn parse(token: &str) -> Option<Flag> {
        Flag::ALL
            .iter()
            .copied()
            .find(|f| f.spellings().contains(&token))
    }
}

/// How a command's data is shown when JSON was not asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The captured text as is
    Raw,
    /// One row per volume
    VolumeTable,
    /// Every detail of one volume
    VolumeDetail,
}

/// Section a command is listed under in the help screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandGroup {
    Volume,
    Cluster,
    Host,
}

impl CommandGroup {
    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Volume => "Volume commands",
            CommandGroup::Cluster => "Cluster / system",
            CommandGroup::Host => "Host commands",
        }
    }
}

/// One position of a command path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathToken {
    pub canonical: String,
    pub abbreviations: Vec<String>,
}

impl PathToken {
    pub fn new(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            abbreviations: Vec::new(),
        }
    }
}

/// One supported command family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Canonical path, `pxctl` excluded
    pub tokens: Vec<PathToken>,
    pub flags: Vec<Flag>,
    pub min_args: usize,
    pub max_args: usize,
    /// Placeholder shown for the positional argument in help
    pub arg_name: Option<String>,
    /// Bundle resource the command reads
    pub resource: String,
    /// Resource read instead when `-j` is given
    pub json_resource: Option<String>,
    pub view: View,
    pub group: CommandGroup,
    /// Whether the live tool spells it with a `pxctl` prefix
    pub pxctl: bool,
    pub summary: String,
}

impl CommandSpec {
    /// Create a command from its space-separated canonical path
    pub fn new(path: &str, resource: impl Into<String>) -> Self {
        Self {
            tokens: path.split_whitespace().map(PathToken::new).collect(),
            flags: Vec::new(),
            min_args: 0,
            max_args: 0,
            arg_name: None,
            resource: resource.into(),
            json_resource: None,
            view: View::Raw,
            group: CommandGroup::Cluster,
            pxctl: true,
            summary: String::new(),
        }
    }

    /// Accept `abbreviation` for the path token `canonical`
    ///
    /// An abbreviation for a token that is not on the path is ignored; the
    /// registry tests catch such typos.
    pub fn with_abbrev(mut self, canonical: &str, abbreviation: &str) -> Self {
        if let Some(token) = self.tokens.iter_mut().find(|t| t.canonical == canonical) {
            token.abbreviations.push(abbreviation.to_string());
        }
        self
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Positional argument count bounds, inclusive
    pub fn with_args(mut self, min: usize, max: usize, name: &str) -> Self {
        self.min_args = min;
        self.max_args = max;
        self.arg_name = Some(name.to_string());
        self
    }

    pub fn with_json_resource(mut self, resource: impl Into<String>) -> Self {
        self.json_resource = Some(resource.into());
        self
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    pub fn in_group(mut self, group: CommandGroup) -> Self {
        self.group = group;
        self
    }

    /// Mark a host command, typed without the `pxctl` prefix
    pub fn host(mut self) -> Self {
        self.group = CommandGroup::Host;
        self.pxctl = false;
        self
    }

    pub fn describe(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    /// Full canonical path, e.g. `volume inspect`
    pub fn canonical(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.canonical.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Shortest spelling, e.g. `v i`
    pub fn abbreviated(&self) -> Option<String> {
        if self.tokens.iter().all(|t| t.abbreviations.is_empty()) {
            return None;
        }
        Some(
            self.tokens
                .iter()
                .map(|t| {
                    t.abbreviations
                        .iter()
                        .min_by_key(|a| a.len())
                        .unwrap_or(&t.canonical)
                        .as_str()
                })
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    pub fn accepts(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn accepts_arg_count(&self, count: usize) -> bool {
        (self.min_args..=self.max_args).contains(&count)
    }

    /// Human description of the arity, e.g. `exactly 1`
    pub fn arity(&self) -> String {
        match (self.min_args, self.max_args) {
            (0, 0) => "no arguments".to_string(),
            (min, max) if min == max => format!("exactly {}", min),
            (0, max) => format!("at most {}", max),
            (min, max) => format!("between {} and {}", min, max),
        }
    }

    fn validate(&self) -> Result<()> {
        let canonical = self.canonical();
        if self.tokens.is_empty() {
            return Err(grammar_invalid("a command has an empty path"));
        }
        if RESERVED_WORDS.contains(&self.tokens[0].canonical.as_str()) {
            return Err(grammar_invalid(format!(
                "'{}' starts with a reserved word",
                canonical
            )));
        }
        if self.min_args > self.max_args {
            return Err(grammar_invalid(format!(
                "'{}' takes at least {} but at most {} arguments",
                canonical, self.min_args, self.max_args
            )));
        }
        for token in &self.tokens {
            let spellings = std::iter::once(&token.canonical).chain(&token.abbreviations);
            for spelling in spellings {
                if spelling.is_empty() || spelling.starts_with('-') {
                    return Err(grammar_invalid(format!(
                        "'{}' has an invalid token '{}'",
                        canonical, spelling
                    )));
                }
            }
        }
        if self.resource.is_empty() {
            return Err(grammar_invalid(format!("'{}' serves no resource", canonical)));
        }
        for resource in std::iter::once(&self.resource).chain(&self.json_resource) {
            if layout::expected(resource).is_none() {
                return Err(grammar_invalid(format!(
                    "'{}' reads unknown resource '{}'",
                    canonical, resource
                )));
            }
        }
        Ok(())
    }
}

/// The validated command table and its prefix tree
#[derive(Debug, Clone)]
pub struct CommandGrammar {
    specs: Vec<CommandSpec>,
    root: Node,
}

impl CommandGrammar {
    /// Compile a command table
    ///
    /// Fails if a spec is malformed or two specs share a canonical path.
    pub fn new(specs: Vec<CommandSpec>) -> Result<Self> {
        let mut root = Node::root();
        for (idx, spec) in specs.iter().enumerate() {
            spec.validate()?;
            root.insert(idx, &spec.tokens)?;
        }
        tracing::debug!(commands = specs.len(), "compiled command grammar");
        Ok(Self { specs, root })
    }

    /// The grammar of every builtin command
    pub fn builtin() -> Result<Self> {
        Self::new(registry::builtin_commands())
    }

    /// Every command, in table order
    pub fn all_specs(&self) -> &[CommandSpec] {
        &self.specs
    }

    pub fn spec(&self, idx: usize) -> Option<&CommandSpec> {
        self.specs.get(idx)
    }

    /// Match path tokens against the prefix tree
    pub fn match_path(&self, tokens: &[&str]) -> PathMatch {
        tree::longest_match(&self.root, tokens)
    }
}
