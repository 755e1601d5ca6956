// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multi-artifact emission.
//!
//! Each type with an artifact plan produces up to six outputs: host code,
//! the type header, a foreign-runtime wrapper header and implementation, a
//! middleware adaptor and a test stub.

mod adaptor;
mod artifact;
mod bodies;
mod pipeline;
mod sink;

pub use adaptor::render_adaptor;
pub use artifact::{customer_includes, ArtifactKind, ArtifactPlan};
pub use bodies::{BodyGenerator, CppBodies};
pub use pipeline::{emit_all, EmitPolicy, EmittedType, Emitter, GenerationReport};
pub use sink::{
    ArtifactRequest, ArtifactSink, ArtifactStream, FileSink, MemorySink, TemplateParams,
};
