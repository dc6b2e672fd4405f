//! Target binder contract
//!
//! The binder turns a matched link into a live backend handle. It is
//! supplied by the embedding system; this crate only calls it. Binding may
//! block (it typically opens a backend connection) and may fail, and the
//! service never retries or caches on the binder's behalf.

use mount_table::LinkSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a binder can surface
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// A merge link could not reach its minimum successful-target count
    #[error("Insufficient targets: required {required}, available {available}")]
    InsufficientTargets { required: usize, available: usize },

    /// The backend refused or failed the connection
    #[error("Backend error: {0}")]
    Backend(String),
}

/// View of an internal directory handed to the binder
///
/// Carries the resolved path and the child segment names at the stop node,
/// so a synthetic internal handle can list the mount structure beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalDirView {
    pub path: String,
    pub children: Vec<String>,
}

/// Turns matched links into backend handles
///
/// `bind_single` covers single-target and fallback links. `bind_merge`
/// composes one fan-out handle over a merge link's targets and must fail
/// with [`BindError::InsufficientTargets`] when fewer than the link's
/// `min_replicas` targets are available. `bind_internal` produces the
/// synthetic handle for internal directories.
pub trait TargetBinder {
    type Handle;

    fn bind_single(&self, spec: &LinkSpec) -> Result<Self::Handle, BindError>;

    fn bind_merge(&self, spec: &LinkSpec) -> Result<Self::Handle, BindError>;

    fn bind_internal(&self, dir: &InternalDirView) -> Result<Self::Handle, BindError>;
}
