//! Namespace service implementation
//!
//! Holds the serving mount tree behind one swappable reference and pairs
//! engine resolutions with binder calls.

use crate::binder::{BindError, InternalDirView, TargetBinder};
use mount_table::{
    BuildError, LinkKind, LinkSpec, MountPointInfo, MountTree, PathError, ResolutionKind,
    ResolvedTarget, TreeId,
};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur during a bound resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The query path is malformed
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// The binder could not produce a handle for the matched target
    #[error("Bind error: {0}")]
    Bind(#[from] BindError),
}

/// An engine resolution paired with the binder's handle
#[derive(Debug)]
pub struct ResolutionResult<H> {
    pub kind: ResolutionKind,
    pub resolved_path: String,
    pub remaining_path: String,
    pub bound_target: H,
    pub last_component_is_link: bool,
}

/// The namespace service
///
/// The tree is immutable once built; reload builds a complete replacement
/// and swaps the shared reference, so readers never observe a partially
/// built tree and a failed reload leaves the previous table serving.
pub struct NamespaceService<B: TargetBinder> {
    tree: RwLock<Arc<MountTree>>,
    binder: B,
}

impl<B: TargetBinder> NamespaceService<B> {
    /// Builds the initial mount table and wraps it with a binder
    pub fn new(specs: Vec<LinkSpec>, binder: B) -> Result<Self, BuildError> {
        let tree = MountTree::build(specs)?;
        Ok(Self {
            tree: RwLock::new(Arc::new(tree)),
            binder,
        })
    }

    /// A pinned snapshot of the serving tree
    ///
    /// The snapshot stays valid across reloads; callers that issue several
    /// related resolutions can hold one to get a consistent view.
    pub fn snapshot(&self) -> Arc<MountTree> {
        self.tree
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Identity of the currently serving tree
    pub fn tree_id(&self) -> TreeId {
        self.snapshot().id()
    }

    /// Replaces the mount table atomically
    ///
    /// Returns the new tree's id. On error the previous table keeps
    /// serving untouched.
    pub fn reload(&self, specs: Vec<LinkSpec>) -> Result<TreeId, BuildError> {
        let tree = Arc::new(MountTree::build(specs)?);
        let id = tree.id();
        *self.tree.write().unwrap_or_else(|e| e.into_inner()) = tree;
        Ok(id)
    }

    /// Lists all non-fallback mount points of the serving table
    pub fn mount_points(&self) -> Vec<MountPointInfo> {
        self.snapshot().mount_points()
    }

    /// Resolves a path and binds the matched target to a handle
    ///
    /// The binder is invoked exactly once, after resolution, and its output
    /// is never cached here.
    pub fn resolve(
        &self,
        path: &str,
        resolve_last_component: bool,
    ) -> Result<ResolutionResult<B::Handle>, ResolveError> {
        let tree = self.snapshot();
        let resolution = tree.resolve(path, resolve_last_component)?;

        let bound_target = match &resolution.target {
            ResolvedTarget::Link(spec) | ResolvedTarget::Fallback(spec) => match spec.kind() {
                LinkKind::Merge { .. } => self.binder.bind_merge(spec)?,
                LinkKind::Single | LinkKind::Fallback => self.binder.bind_single(spec)?,
            },
            ResolvedTarget::InternalDir { children } => {
                self.binder.bind_internal(&InternalDirView {
                    path: resolution.resolved_path.clone(),
                    children: children.clone(),
                })?
            }
        };

        Ok(ResolutionResult {
            kind: resolution.kind,
            resolved_path: resolution.resolved_path,
            remaining_path: resolution.remaining_path,
            bound_target,
            last_component_is_link: resolution.last_component_is_link,
        })
    }
}
