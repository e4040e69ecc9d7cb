use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::error::ChainError;
use crate::types::{AlterGroup, Chain, Direction};

/// Links scanned groups into a single chain and validates the topology.
///
/// Two passes: per-group consistency first (pairing, matching backrefs,
/// matching gating sets), then linking via backrefs with divergence, root
/// and cycle detection. Groups are visited in ref order, so which error is
/// surfaced for a multi-fault directory is deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainBuilder;

impl ChainBuilder {
    /// Consume the grouped-but-unlinked pairs and produce a [`Chain`], or
    /// report why no valid chain exists.
    pub fn build(
        &self,
        mut groups: BTreeMap<String, AlterGroup>,
    ) -> std::result::Result<Chain, ChainError> {
        // Pass A: validate each group independently and assign the shared
        // gating sets.
        for group in groups.values_mut() {
            let (require_env, skip_env) = validate_pair(group)?;
            group.require_env = require_env;
            group.skip_env = skip_env;
        }

        // Pass B: resolve backrefs against the index and link parent to
        // child, watching for divergence.
        let declared: Vec<(String, String, PathBuf)> = groups
            .iter()
            .filter_map(|(key, group)| {
                let up = group.up.as_ref()?;
                let back = up.back_ref.clone()?;
                Some((key.clone(), back, up.file.clone()))
            })
            .collect();

        for (child, parent, file) in declared {
            if !groups.contains_key(&parent) {
                return Err(ChainError::InvalidBackRef {
                    back_ref: parent,
                    file,
                });
            }
            if let Some(group) = groups.get(&parent) {
                // A forward link that is already set means this parent was
                // previously claimed by another child.
                if let Some(first_child) = group.forward_ref.clone() {
                    return Err(ChainError::Divergent {
                        parent,
                        first_child,
                        second_child: child,
                    });
                }
            }
            if let Some(group) = groups.get_mut(&child) {
                group.back_ref = Some(parent.clone());
            }
            if let Some(group) = groups.get_mut(&parent) {
                group.forward_ref = Some(child);
            }
        }

        // Locate the unique head and tail. Multiple tails would imply a
        // divergence already reported above, so the tail slot just keeps the
        // last candidate.
        let mut head: Option<&str> = None;
        let mut tail: Option<&str> = None;
        for (key, group) in &groups {
            if group.back_ref.is_none() {
                if let Some(first) = head {
                    return Err(ChainError::DuplicateRoot {
                        first: first.to_string(),
                        second: key.clone(),
                    });
                }
                head = Some(key);
            }
            if group.forward_ref.is_none() {
                tail = Some(key);
            }
        }
        let (head, tail) = match (head, tail) {
            (Some(head), Some(tail)) => (head.to_string(), tail.to_string()),
            _ => return Err(ChainError::Cyclic),
        };

        // The head-to-tail walk must cover every group; anything left over
        // sits on a detached cycle that the root/tail scan cannot see.
        let mut visited = 0usize;
        let mut cursor = Some(head.as_str());
        while let Some(key) = cursor {
            visited += 1;
            cursor = groups.get(key).and_then(|group| group.forward_ref.as_deref());
        }
        if visited != groups.len() {
            return Err(ChainError::Cyclic);
        }

        Ok(Chain::new(groups, head, tail))
    }
}

/// Per-group consistency: both directions present, backrefs equal, gating
/// sets equal. Returns the shared (require, skip) sets on success.
fn validate_pair(
    group: &AlterGroup,
) -> std::result::Result<(BTreeSet<String>, BTreeSet<String>), ChainError> {
    let (up, down) = match (&group.up, &group.down) {
        (Some(up), Some(down)) => (up, down),
        (Some(up), None) => {
            return Err(ChainError::MissingAlter {
                ref_key: up.ref_key.clone(),
                missing: Direction::Down,
                sibling: up.file.clone(),
            });
        }
        (None, Some(down)) => {
            return Err(ChainError::MissingAlter {
                ref_key: down.ref_key.clone(),
                missing: Direction::Up,
                sibling: down.file.clone(),
            });
        }
        // The scanner never produces a group with neither slot filled.
        (None, None) => return Ok((BTreeSet::new(), BTreeSet::new())),
    };

    if up.back_ref != down.back_ref {
        return Err(ChainError::BackRefMismatch {
            ref_key: up.ref_key.clone(),
            up_value: up.back_ref.clone().unwrap_or_default(),
            down_value: down.back_ref.clone().unwrap_or_default(),
        });
    }

    if up.skip_env != down.skip_env {
        return Err(ChainError::EnvMismatch {
            field: "skip-env",
            up_file: up.file.clone(),
            down_file: down.file.clone(),
        });
    }

    if up.require_env != down.require_env {
        return Err(ChainError::EnvMismatch {
            field: "require-env",
            up_file: up.file.clone(),
            down_file: down.file.clone(),
        });
    }

    Ok((up.require_env.clone(), up.skip_env.clone()))
}
