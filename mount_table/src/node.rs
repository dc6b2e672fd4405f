//! Mount tree nodes
//!
//! The tree is a tagged union of two variants: internal directories that
//! exist purely to give structure to the mounts below them, and link nodes
//! carrying a [`LinkSpec`]. A link node may itself have children: that is
//! what makes nested mount points work.

use crate::spec::LinkSpec;
use std::collections::BTreeMap;

/// A node in the mount tree
#[derive(Debug, Clone)]
pub enum MountNode {
    /// A directory with no target of its own
    Internal(InternalDir),
    /// A mount point, possibly with deeper mounts nested beneath it
    Link(MountLink),
}

/// An internal (non-terminal) directory node
#[derive(Debug, Clone)]
pub struct InternalDir {
    name: String,
    children: BTreeMap<String, MountNode>,
}

/// A link (terminal) node carrying a mount entry
#[derive(Debug, Clone)]
pub struct MountLink {
    name: String,
    spec: LinkSpec,
    children: BTreeMap<String, MountNode>,
}

impl InternalDir {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: BTreeMap::new(),
        }
    }

    pub(crate) fn take_children(&mut self) -> BTreeMap<String, MountNode> {
        std::mem::take(&mut self.children)
    }
}

impl MountLink {
    pub fn new(name: impl Into<String>, spec: LinkSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            children: BTreeMap::new(),
        }
    }

    /// Creates a link node that keeps an existing subtree
    ///
    /// Used when a link is attached at a position where internal structure
    /// already exists (shallower link configured after a deeper one).
    pub fn with_children(
        name: impl Into<String>,
        spec: LinkSpec,
        children: BTreeMap<String, MountNode>,
    ) -> Self {
        Self {
            name: name.into(),
            spec,
            children,
        }
    }

    pub fn spec(&self) -> &LinkSpec {
        &self.spec
    }
}

impl MountNode {
    pub fn name(&self) -> &str {
        match self {
            MountNode::Internal(dir) => &dir.name,
            MountNode::Link(link) => &link.name,
        }
    }

    /// Looks up a child by path segment, case-sensitive exact match
    ///
    /// Works uniformly across both variants; a pure leaf link simply has no
    /// children.
    pub fn child(&self, segment: &str) -> Option<&MountNode> {
        self.children().get(segment)
    }

    pub fn children(&self) -> &BTreeMap<String, MountNode> {
        match self {
            MountNode::Internal(dir) => &dir.children,
            MountNode::Link(link) => &link.children,
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut BTreeMap<String, MountNode> {
        match self {
            MountNode::Internal(dir) => &mut dir.children,
            MountNode::Link(link) => &mut link.children,
        }
    }

    /// Child segment names in sorted order
    pub fn child_names(&self) -> Vec<String> {
        self.children().keys().cloned().collect()
    }

    pub fn is_link(&self) -> bool {
        matches!(self, MountNode::Link(_))
    }

    /// The link spec carried by this node, if it is a link node
    pub fn link_spec(&self) -> Option<&LinkSpec> {
        match self {
            MountNode::Internal(_) => None,
            MountNode::Link(link) => Some(&link.spec),
        }
    }
}
