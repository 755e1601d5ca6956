// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-description driven code generator.
//!
//! Generates, for every registered type, native host code, its declaration
//! header, a foreign-runtime wrapper (header and implementation), a
//! middleware serialization adaptor and a test stub.
//!
//! # Pipeline
//!
//! 1. Populate a [`RegistryBuilder`] with [`TypeBuilder`]s, either in code or
//!    from a YAML [`RegistryConfig`](config::RegistryConfig).
//! 2. [`RegistryBuilder::freeze`] resolves every reference, computes the
//!    dependency order and rejects by-value cycles.
//! 3. [`emit_all`] walks the resolved order and writes each type's artifacts
//!    to an [`ArtifactSink`] as one batch.
//!
//! # Quick Start
//!
//! ```
//! use typegen::{emit_all, EmitPolicy, MemorySink, RegistryBuilder, TypeBuilder};
//!
//! let mut reg = RegistryBuilder::new();
//! reg.register(TypeBuilder::primitive("int"))?;
//! reg.register(TypeBuilder::structure("Point").member("x", "int").member("y", "int"))?;
//! let registry = reg.freeze()?;
//!
//! let sink = MemorySink::new();
//! let report = emit_all(&registry, &sink, EmitPolicy::FailFast)?;
//! assert_eq!(report.emitted.len(), 1);
//! assert!(sink.file("Point_decl.h").is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod emit;
pub mod error;
pub mod naming;
pub mod registry;
pub mod resolver;
pub mod signature;
pub mod types;

pub use config::{LoadError, RegistryConfig};
pub use emit::{
    customer_includes, emit_all, ArtifactKind, ArtifactPlan, ArtifactSink, BodyGenerator,
    CppBodies, EmitPolicy, Emitter, FileSink, GenerationReport, MemorySink,
};
pub use error::{ConfigError, EmitError};
pub use registry::{Registry, RegistryBuilder, TypeRef};
pub use signature::{schema, signature, synopsis, version_key, Signature, TypeSchema};
pub use types::{TypeBuilder, TypeDescription, TypeId, TypeKind};
