//! # Namespace Service
//!
//! This crate layers a service on top of the [`mount_table`] engine: it
//! binds resolution results to live backend handles through a pluggable
//! [`TargetBinder`], and it supports atomic reload of the mount table:
//! readers in flight keep their tree snapshot, and a failed reload leaves
//! the previous table serving.
//!
//! The binder is supplied by the embedding system. This crate calls it
//! lazily, once per resolution, and never caches the handles it produces.

pub mod binder;
pub mod service;

pub use binder::{BindError, InternalDirView, TargetBinder};
pub use service::{NamespaceService, ResolutionResult, ResolveError};
