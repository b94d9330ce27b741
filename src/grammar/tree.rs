//! Prefix tree over canonical command paths
//!
//! Each node is one canonical token together with every abbreviation any
//! command declared for it at that position. Matching walks the tree with the
//! input tokens and keeps the deepest node that ends a command.

use std::collections::BTreeSet;

use super::PathToken;
use crate::error::{Result, grammar_invalid};

/// One position in the command tree
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub canonical: String,
    pub abbreviations: BTreeSet<String>,
    pub children: Vec<Node>,
    /// Index of the command ending here
    pub spec: Option<usize>,
}

/// Outcome of matching input tokens against the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    /// Command `spec` matched using the first `consumed` tokens
    Found { spec: usize, consumed: usize },
    /// No command is a prefix of the input
    NoMatch,
    /// `token` names several positions that all lead to a command
    Ambiguous {
        token: String,
        candidates: Vec<String>,
    },
}

impl Node {
    pub fn root() -> Self {
        Self::default()
    }

    fn new(token: &PathToken) -> Self {
        Self {
            canonical: token.canonical.clone(),
            abbreviations: token.abbreviations.iter().cloned().collect(),
            children: Vec::new(),
            spec: None,
        }
    }

    /// Whether an input token names this node
    pub fn matches(&self, token: &str) -> bool {
        self.canonical == token || self.abbreviations.contains(token)
    }

    /// Add the path of command `spec`, merging shared prefixes
    pub fn insert(&mut self, spec: usize, tokens: &[PathToken]) -> Result<()> {
        let Some((first, rest)) = tokens.split_first() else {
            if self.spec.is_some() {
                return Err(grammar_invalid(format!(
                    "two commands share the path ending in '{}'",
                    self.canonical
                )));
            }
            self.spec = Some(spec);
            return Ok(());
        };

        let idx = match self
            .children
            .iter()
            .position(|c| c.canonical == first.canonical)
        {
            Some(idx) => {
                self.children[idx]
                    .abbreviations
                    .extend(first.abbreviations.iter().cloned());
                idx
            }
            None => {
                self.children.push(Node::new(first));
                self.children.len() - 1
            }
        };
        self.children[idx].insert(spec, rest)
    }

    fn candidates(&self, token: &str) -> Vec<&Node> {
        self.children.iter().filter(|c| c.matches(token)).collect()
    }
}

/// Match `tokens` from `root`, preferring the longest path ending in a command
///
/// When a token names several children, only those from which the remaining
/// tokens still reach a command are kept, and of those the ones consuming the
/// most tokens; if more than one remains the match is ambiguous.
pub fn longest_match(root: &Node, tokens: &[&str]) -> PathMatch {
    match walk(root, tokens, 0) {
        Ok(Some((spec, consumed))) => PathMatch::Found { spec, consumed },
        Ok(None) => PathMatch::NoMatch,
        Err(ambiguous) => ambiguous,
    }
}

fn walk(
    node: &Node,
    tokens: &[&str],
    depth: usize,
) -> std::result::Result<Option<(usize, usize)>, PathMatch> {
    let here = node.spec.map(|spec| (spec, depth));
    let Some(token) = tokens.get(depth) else {
        return Ok(here);
    };

    let candidates = node.candidates(token);
    match candidates.as_slice() {
        [] => Ok(here),
        [only] => Ok(walk(only, tokens, depth + 1)?.or(here)),
        _ => {
            let mut complete = Vec::new();
            for candidate in candidates.iter().copied() {
                if let Some(found) = walk(candidate, tokens, depth + 1)? {
                    complete.push((candidate, found));
                }
            }
            let deepest = complete.iter().map(|(_, (_, consumed))| *consumed).max();
            complete.retain(|(_, (_, consumed))| Some(*consumed) == deepest);
            match complete.as_slice() {
                [] => Ok(here),
                [(_, found)] => Ok(Some(*found)),
                _ => Err(PathMatch::Ambiguous {
                    token: (*token).to_string(),
                    candidates: complete
                        .iter()
                        .map(|(node, _)| node.canonical.clone())
                        .collect(),
                }),
            }
        }
    }
}
