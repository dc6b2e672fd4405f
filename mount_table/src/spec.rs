//! Link specifications
//!
//! A [`LinkSpec`] is the immutable description of one mount entry: its
//! source path, its kind, and its target reference(s). Specs are pure data;
//! the loader that produces them (configuration file, remote store) lives
//! outside this crate.

use crate::path::{split_path, PathError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while constructing a link specification
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    /// Source path is malformed
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// Merge links need at least two targets
    #[error("Merge link needs at least two targets, got {0}")]
    TooFewTargets(usize),

    /// Merge minimum replica count must be between 1 and the target count
    #[error("Merge replica minimum {min} out of range for {targets} targets")]
    ReplicaMinOutOfRange { min: usize, targets: usize },

    /// Single and fallback links carry exactly one target
    #[error("Link needs exactly one target, got {0}")]
    NotExactlyOneTarget(usize),

    /// Fallback links are rooted at `/`
    #[error("Fallback link must have source path /, got {0}")]
    FallbackNotRoot(String),
}

/// An opaque target reference understood by the target binder
///
/// Typically a URI naming a backend (`disk://volume0`, `remote://cluster/a`).
/// This crate never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef(String);

impl TargetRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn uri(&self) -> &str {
        &self.0
    }
}

/// The kind of a mount entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    /// One source path, one backend target
    Single,
    /// One source path fanned out across several targets; a bind succeeds
    /// only when at least `min_replicas` targets are available
    Merge { min_replicas: usize },
    /// The lowest-priority link, rooted at `/`, used when nothing matches
    Fallback,
}

/// An immutable description of one mount entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    source_path: String,
    kind: LinkKind,
    targets: Vec<TargetRef>,
}

impl LinkSpec {
    /// Creates a single-target link
    pub fn single(source_path: impl Into<String>, target: TargetRef) -> Result<Self, SpecError> {
        let spec = Self {
            source_path: source_path.into(),
            kind: LinkKind::Single,
            targets: vec![target],
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Creates a multi-target merge link
    ///
    /// Requires at least two targets and `1 <= min_replicas <= targets.len()`.
    pub fn merge(
        source_path: impl Into<String>,
        targets: Vec<TargetRef>,
        min_replicas: usize,
    ) -> Result<Self, SpecError> {
        let spec = Self {
            source_path: source_path.into(),
            kind: LinkKind::Merge { min_replicas },
            targets,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Creates the fallback link, rooted at `/`
    pub fn fallback(target: TargetRef) -> Self {
        Self {
            source_path: "/".to_string(),
            kind: LinkKind::Fallback,
            targets: vec![target],
        }
    }

    /// Checks the structural invariants of this spec
    ///
    /// Constructors call this, and the tree builder re-checks specs that
    /// arrive through deserialization.
    pub fn validate(&self) -> Result<(), SpecError> {
        split_path(&self.source_path)?;
        match self.kind {
            LinkKind::Single => {
                if self.targets.len() != 1 {
                    return Err(SpecError::NotExactlyOneTarget(self.targets.len()));
                }
            }
            LinkKind::Merge { min_replicas } => {
                if self.targets.len() < 2 {
                    return Err(SpecError::TooFewTargets(self.targets.len()));
                }
                if min_replicas == 0 || min_replicas > self.targets.len() {
                    return Err(SpecError::ReplicaMinOutOfRange {
                        min: min_replicas,
                        targets: self.targets.len(),
                    });
                }
            }
            LinkKind::Fallback => {
                if self.targets.len() != 1 {
                    return Err(SpecError::NotExactlyOneTarget(self.targets.len()));
                }
                if self.source_path != "/" {
                    return Err(SpecError::FallbackNotRoot(self.source_path.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn targets(&self) -> &[TargetRef] {
        &self.targets
    }
}
