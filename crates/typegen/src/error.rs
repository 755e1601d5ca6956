// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy.
//!
//! [`ConfigError`] covers everything detected while the registry is being
//! populated and frozen; it is fatal for the whole run. [`EmitError`] is
//! raised per artifact during emission and aborts only the current type.

use std::path::PathBuf;
use thiserror::Error;

use crate::emit::ArtifactKind;

/// Setup and resolution failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("type '{name}' is already registered")]
    DuplicateType { name: String },

    #[error("type '{name}' is not registered")]
    UnresolvedType { name: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Value-type mutual containment. `cycle` starts and ends on the same type.
    #[error("cyclic by-value dependency: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
}

/// Per-artifact emission failures.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("sink cannot open {kind} artifact '{artifact}': {reason}")]
    MissingSink {
        kind: ArtifactKind,
        artifact: String,
        reason: String,
    },

    #[error("type '{type_name}' has no foreign-runtime representation")]
    UnsupportedConversion { type_name: String },

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
