//! Mount tree construction and listing
//!
//! The tree is built once from an ordered collection of link specs and is
//! immutable afterwards. A reload builds a whole new tree; a failed build
//! must leave the previous tree in effect, so construction never mutates
//! shared state.

use crate::node::{InternalDir, MountLink, MountNode};
use crate::path::{split_path, PathError};
use crate::spec::{LinkKind, LinkSpec, SpecError, TargetRef};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use thiserror::Error;
use uuid::Uuid;

/// Identity of one built tree
///
/// Every successful build gets a fresh id, so callers can tell which
/// snapshot served a resolution across reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeId(Uuid);

impl TreeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TreeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur while building a mount tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// A source path is malformed
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// A link spec violates its structural invariants
    #[error("Spec error: {0}")]
    Spec(#[from] SpecError),

    /// Two entries declare the same normalized source path
    #[error("Conflicting mount entries at {0}")]
    Conflict(String),

    /// More than one fallback entry was supplied
    #[error("More than one fallback entry in the mount table")]
    MultipleFallback,

    /// A non-fallback entry claimed the root path
    #[error("The root path is reserved for the fallback entry")]
    RootLink,
}

/// A read-only listing entry for one mount point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountPointInfo {
    pub source_path: String,
    pub kind: LinkKind,
    pub targets: Vec<TargetRef>,
}

/// The mount tree: a prefix trie of links plus an optional fallback
#[derive(Debug, Clone)]
pub struct MountTree {
    id: TreeId,
    root: MountNode,
    fallback: Option<LinkSpec>,
}

impl MountTree {
    /// Builds a tree from an ordered collection of link specs
    ///
    /// Nesting is insertion-order independent: a deeper link may be added
    /// under an existing link, and a link may be attached where internal
    /// structure already exists. Two links at the same exact path conflict.
    pub fn build(specs: Vec<LinkSpec>) -> Result<Self, BuildError> {
        let mut root = MountNode::Internal(InternalDir::new(""));
        let mut fallback: Option<LinkSpec> = None;

        for spec in specs {
            spec.validate()?;
            match spec.kind() {
                LinkKind::Fallback => {
                    if fallback.is_some() {
                        return Err(BuildError::MultipleFallback);
                    }
                    fallback = Some(spec);
                }
                _ => insert_link(&mut root, spec)?,
            }
        }

        Ok(Self {
            id: TreeId::new(),
            root,
            fallback,
        })
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn root(&self) -> &MountNode {
        &self.root
    }

    /// The designated fallback entry, if one was configured
    pub fn fallback(&self) -> Option<&LinkSpec> {
        self.fallback.as_ref()
    }

    /// Lists all non-fallback mount points in source-path order
    pub fn mount_points(&self) -> Vec<MountPointInfo> {
        let mut out = Vec::new();
        collect_mount_points(&self.root, &mut out);
        out
    }
}

/// Inserts one non-fallback link into the trie
fn insert_link(root: &mut MountNode, spec: LinkSpec) -> Result<(), BuildError> {
    let segments: Vec<String> = split_path(spec.source_path())?
        .into_iter()
        .map(String::from)
        .collect();

    if segments.is_empty() {
        return Err(BuildError::RootLink);
    }

    // Walk or create nodes for every segment except the last. Descending
    // through an existing link node is legal: that is a deeper link nesting
    // under a shallower one.
    let mut node = root;
    for segment in &segments[..segments.len() - 1] {
        node = node
            .children_mut()
            .entry(segment.clone())
            .or_insert_with(|| MountNode::Internal(InternalDir::new(segment.clone())));
    }

    let last = segments[segments.len() - 1].clone();
    match node.children_mut().entry(last.clone()) {
        Entry::Vacant(vacant) => {
            vacant.insert(MountNode::Link(MountLink::new(last, spec)));
        }
        Entry::Occupied(mut occupied) => match occupied.get_mut() {
            MountNode::Internal(dir) => {
                // A deeper link created this internal node earlier; the new
                // link takes its place and keeps the subtree.
                let subtree = dir.take_children();
                *occupied.get_mut() =
                    MountNode::Link(MountLink::with_children(last, spec, subtree));
            }
            MountNode::Link(_) => {
                return Err(BuildError::Conflict(spec.source_path().to_string()));
            }
        },
    }

    Ok(())
}

fn collect_mount_points(node: &MountNode, out: &mut Vec<MountPointInfo>) {
    for child in node.children().values() {
        if let Some(spec) = child.link_spec() {
            out.push(MountPointInfo {
                source_path: spec.source_path().to_string(),
                kind: spec.kind(),
                targets: spec.targets().to_vec(),
            });
        }
        collect_mount_points(child, out);
    }
}
