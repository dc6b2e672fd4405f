//! # Mount Table
//!
//! This crate implements the mount-resolution core of a federated namespace:
//! a prefix tree of configured links mapping path prefixes to storage
//! backend targets, and a resolver that maps any absolute path to the
//! responsible link with deterministic longest-prefix-match semantics.
//!
//! ## Design
//!
//! - **LinkSpec**: immutable description of one mount entry (single target,
//!   multi-target merge, or fallback)
//! - **MountTree**: built once from an ordered collection of link specs,
//!   immutable afterwards, safe for unsynchronized concurrent reads
//! - **Resolution**: per-call result carrying resolved/remaining path and
//!   the matched target, never cached by this crate
//!
//! Nested mount points are supported: a link's own subtree may contain
//! further, deeper links, and resolution prefers the deepest link passed
//! through during the walk. Target backends, configuration formats, and
//! permission checks are explicitly outside this crate.

pub mod node;
pub mod path;
pub mod resolve;
pub mod spec;
pub mod tree;

pub use node::{InternalDir, MountLink, MountNode};
pub use path::{join_segments, split_path, PathError};
pub use resolve::{Resolution, ResolutionKind, ResolvedTarget};
pub use spec::{LinkKind, LinkSpec, SpecError, TargetRef};
pub use tree::{BuildError, MountPointInfo, MountTree, TreeId};
