use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Direction an alter moves the schema in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Progresses the schema forward with new change.
    Up,
    /// Undoes the matching up alter.
    Down,
}

impl Direction {
    /// Case-insensitive parse of a metadata `direction` value.
    pub fn parse(value: &str) -> Option<Direction> {
        match value.to_ascii_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One alter file's parsed contents. Immutable once parsed; owned by exactly
/// one [`AlterGroup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alter {
    /// Path the alter was read from; identity in error messages.
    pub file: PathBuf,

    pub direction: Direction,

    /// Opaque `[0-9A-Za-z]+` identifier shared by the up/down pair.
    pub ref_key: String,

    /// Ref of the logically preceding group. `None` marks a root candidate.
    pub back_ref: Option<String>,

    /// Environments this alter must run in. Mutually exclusive with
    /// `skip_env`.
    pub require_env: BTreeSet<String>,

    /// Environments this alter must not run in.
    pub skip_env: BTreeSet<String>,
}

/// An up/down pair of alters sharing one ref, plus its links in the chain.
///
/// Both directions are optional while scanning; the builder rejects any
/// group that is still incomplete.
#[derive(Debug, Clone, Default)]
pub struct AlterGroup {
    pub up: Option<Alter>,
    pub down: Option<Alter>,

    /// Ref of the child group. Set during linking; at most one per group,
    /// which is what keeps the chain linear.
    pub forward_ref: Option<String>,

    /// Ref of the parent group, set during linking.
    pub back_ref: Option<String>,

    /// Group-level gating sets, assigned once both members are validated to
    /// agree.
    pub require_env: BTreeSet<String>,
    pub skip_env: BTreeSet<String>,
}

impl AlterGroup {
    /// A group is complete once both directions are present.
    pub fn is_complete(&self) -> bool {
        self.up.is_some() && self.down.is_some()
    }
}

/// The fully linked, validated, linear sequence of alter groups.
///
/// Invariant: following `forward_ref` from [`Chain::head`] visits every
/// group exactly once and terminates at [`Chain::tail`].
#[derive(Debug, Clone)]
pub struct Chain {
    groups: BTreeMap<String, AlterGroup>,
    head: String,
    tail: String,
}

impl Chain {
    pub(crate) fn new(groups: BTreeMap<String, AlterGroup>, head: String, tail: String) -> Self {
        Self { groups, head, tail }
    }

    /// The root group: the one with no declared parent.
    pub fn head(&self) -> &AlterGroup {
        &self.groups[&self.head]
    }

    /// The last group: the one no other group points back to.
    pub fn tail(&self) -> &AlterGroup {
        &self.groups[&self.tail]
    }

    pub fn head_ref(&self) -> &str {
        &self.head
    }

    pub fn tail_ref(&self) -> &str {
        &self.tail
    }

    pub fn get(&self, ref_key: &str) -> Option<&AlterGroup> {
        self.groups.get(ref_key)
    }

    pub fn contains(&self, ref_key: &str) -> bool {
        self.groups.contains_key(ref_key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Walk the chain from head to tail following forward links.
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            groups: &self.groups,
            next: Some(self.head.as_str()),
        }
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = (&'a str, &'a AlterGroup);
    type IntoIter = ChainIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`Chain`], head first.
pub struct ChainIter<'a> {
    groups: &'a BTreeMap<String, AlterGroup>,
    next: Option<&'a str>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (&'a str, &'a AlterGroup);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next.take()?;
        let group = self.groups.get(key)?;
        self.next = group.forward_ref.as_deref();
        Some((key, group))
    }
}
