// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Emission pipeline.
//!
//! For one type, every planned artifact is opened on the sink, filled by the
//! fixed procedure for its kind and kept in memory. Only when all of them
//! succeed is the batch committed; the first failure drops the rest, so a
//! type is either fully written or not at all.

use rayon::prelude::*;

use super::adaptor::render_adaptor;
use super::artifact::{ArtifactKind, ArtifactPlan};
use super::bodies::{BodyGenerator, CppBodies};
use super::sink::{ArtifactRequest, ArtifactSink, ArtifactStream, TemplateParams};
use crate::error::EmitError;
use crate::registry::Registry;
use crate::signature;
use crate::types::{TypeDescription, TypeId};

static DEFAULT_BODIES: CppBodies = CppBodies;

/// What to do when a type fails to emit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmitPolicy {
    /// Stop at the first failing type.
    #[default]
    FailFast,
    /// Record the failure and go on with the next type.
    Continue,
}

/// Outcome for one successfully emitted type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmittedType {
    pub type_name: String,
    pub version_key: String,
    pub artifacts: Vec<String>,
}

/// Result of a generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub emitted: Vec<EmittedType>,
    pub failures: Vec<(String, EmitError)>,
}

impl GenerationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifact_count(&self) -> usize {
        self.emitted.iter().map(|t| t.artifacts.len()).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("  Type Generation Report");
        println!("{}", "=".repeat(60));
        println!();
        println!("  [OK] Types:      {}", self.emitted.len());
        println!("  [OK] Artifacts:  {} files", self.artifact_count());
        if !self.failures.is_empty() {
            println!("  [!!] Failures:   {}", self.failures.len());
            for (name, err) in &self.failures {
                println!("       - {name}: {err}");
            }
        }
        println!();
        println!("{}", "=".repeat(60));
    }
}

/// Runs the per-artifact procedures against a sink.
pub struct Emitter<'a> {
    registry: &'a Registry,
    sink: &'a dyn ArtifactSink,
    bodies: &'a dyn BodyGenerator,
}

impl<'a> Emitter<'a> {
    pub fn new(registry: &'a Registry, sink: &'a dyn ArtifactSink) -> Self {
        Self {
            registry,
            sink,
            bodies: &DEFAULT_BODIES,
        }
    }

    #[must_use]
    pub fn with_bodies(mut self, bodies: &'a dyn BodyGenerator) -> Self {
        self.bodies = bodies;
        self
    }

    /// Emit every planned artifact of `id` and commit them as one batch.
    pub fn emit_type(&self, id: TypeId) -> Result<EmittedType, EmitError> {
        let ty = self.registry.by_id(id);
        let plan = ArtifactPlan::for_type(ty);
        let params = TemplateParams::for_type(ty);

        let mut streams: Vec<ArtifactStream> = Vec::with_capacity(plan.len());
        for (kind, file_name) in plan.iter() {
            let request = ArtifactRequest {
                kind,
                file_name,
                type_name: ty.type_name(),
                params: &params,
            };
            let mut out = self.sink.open_artifact(&request)?;
            self.emit_artifact(kind, ty, &plan, &mut out)?;
            tracing::debug!("rendered {} for {}", file_name, ty.type_name());
            streams.push(out);
        }

        let artifacts: Vec<String> = streams.iter().map(|s| s.file_name().to_string()).collect();
        if !streams.is_empty() {
            self.sink.commit(ty.type_name(), streams)?;
        }

        Ok(EmittedType {
            type_name: ty.type_name().to_string(),
            version_key: signature::version_key(self.registry, ty),
            artifacts,
        })
    }

    /// Emit all types in resolved order.
    pub fn emit_all(&self, policy: EmitPolicy) -> Result<GenerationReport, EmitError> {
        let mut report = GenerationReport::new();
        for &id in self.registry.resolved() {
            let outcome = self.emit_type(id);
            self.record(&mut report, id, outcome, policy)?;
        }
        tracing::info!(
            "emitted {} types ({} artifacts)",
            report.emitted.len(),
            report.artifact_count()
        );
        Ok(report)
    }

    /// Emit types concurrently; the report keeps resolved order.
    ///
    /// Under [`EmitPolicy::FailFast`] the first failure in resolved order is
    /// returned, but types emitted concurrently with it are already committed.
    pub fn emit_all_parallel(&self, policy: EmitPolicy) -> Result<GenerationReport, EmitError> {
        let outcomes: Vec<(TypeId, Result<EmittedType, EmitError>)> = self
            .registry
            .resolved()
            .par_iter()
            .map(|&id| (id, self.emit_type(id)))
            .collect();

        let mut report = GenerationReport::new();
        for (id, outcome) in outcomes {
            self.record(&mut report, id, outcome, policy)?;
        }
        tracing::info!(
            "emitted {} types in parallel ({} artifacts)",
            report.emitted.len(),
            report.artifact_count()
        );
        Ok(report)
    }

    fn record(
        &self,
        report: &mut GenerationReport,
        id: TypeId,
        outcome: Result<EmittedType, EmitError>,
        policy: EmitPolicy,
    ) -> Result<(), EmitError> {
        match outcome {
            Ok(emitted) => {
                if !emitted.artifacts.is_empty() {
                    report.emitted.push(emitted);
                }
                Ok(())
            }
            Err(err) if policy == EmitPolicy::Continue => {
                let name = self.registry.by_id(id).type_name().to_string();
                tracing::warn!("failed to emit {}: {}", name, err);
                report.failures.push((name, err));
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn emit_artifact(
        &self,
        kind: ArtifactKind,
        ty: &TypeDescription,
        plan: &ArtifactPlan,
        out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        match kind {
            ArtifactKind::TypeHeader => self.emit_type_header(ty, out),
            ArtifactKind::HostCode => self.emit_host_code(ty, plan, out),
            ArtifactKind::WrapperHeader => self.emit_wrapper_header(ty, out),
            ArtifactKind::WrapperCode => self.emit_wrapper_code(ty, plan, out),
            ArtifactKind::MiddlewareAdaptor => {
                out.lines(&render_adaptor(ty.type_name())?);
                Ok(())
            }
            ArtifactKind::TestStub => self.bodies.test_impl(self.registry, ty, out),
        }
    }

    /// `#include` line for `kind` of `id`, if that type plans one.
    fn include_of(&self, id: TypeId, kind: ArtifactKind) -> Option<String> {
        ArtifactPlan::for_type(self.registry.by_id(id))
            .get(kind)
            .map(|name| format!("#include \"{name}\""))
    }

    fn emit_type_header(&self, ty: &TypeDescription, out: &mut ArtifactStream) -> Result<(), EmitError> {
        self.bodies.forward_decl(self.registry, ty, out)?;
        for &dep in self.registry.decl_dependencies(ty) {
            if let Some(line) = self.include_of(dep, ArtifactKind::TypeHeader) {
                out.line(line);
            }
        }
        for header in &ty.extras().header_includes {
            if header.starts_with('<') {
                out.line(format!("#include {header}"));
            } else {
                out.line(format!("#include \"{header}\""));
            }
        }
        self.bodies.type_decl(self.registry, ty, out)?;
        for decl in &ty.extras().function_decls {
            out.line(decl);
        }
        Ok(())
    }

    fn emit_host_code(
        &self,
        ty: &TypeDescription,
        plan: &ArtifactPlan,
        out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        out.line("#include \"common/std_headers.h\"");
        if let Some(header) = plan.get(ArtifactKind::TypeHeader) {
            out.line(format!("#include \"{header}\""));
        }
        for &dep in self.registry.defn_dependencies(ty) {
            if let Some(line) = self.include_of(dep, ArtifactKind::TypeHeader) {
                out.line(line);
            }
        }
        out.blank();
        self.bodies.host_impl(self.registry, ty, out)?;
        for code in &ty.extras().host_code {
            out.line(code);
        }
        Ok(())
    }

    fn emit_wrapper_header(&self, ty: &TypeDescription, out: &mut ArtifactStream) -> Result<(), EmitError> {
        let deps = self.registry.decl_dependencies(ty).iter().copied();
        for id in deps.chain(std::iter::once(ty.id())) {
            if let Some(line) = self.include_of(id, ArtifactKind::TypeHeader) {
                out.line(line);
            }
        }
        for header in &ty.extras().wrapper_header_includes {
            out.line(format!("#include \"{header}\""));
        }
        self.bodies.wrapper_decl(self.registry, ty, out)
    }

    fn emit_wrapper_code(
        &self,
        ty: &TypeDescription,
        plan: &ArtifactPlan,
        out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        out.line("#include \"common/std_headers.h\"");
        out.line("#include \"nodebase/jswrapbase.h\"");
        if let Some(header) = plan.get(ArtifactKind::TypeHeader) {
            out.line(format!("#include \"{header}\""));
        }
        if let Some(header) = plan.get(ArtifactKind::WrapperHeader) {
            out.line(format!("#include \"{header}\""));
        }
        let deps = self.registry.decl_dependencies(ty);
        let dep_names: Vec<&str> = deps
            .iter()
            .map(|id| self.registry.by_id(*id).type_name())
            .collect();
        out.line(format!("/* declDependencies = {} */", dep_names.join(",")));
        for &dep in deps {
            if let Some(line) = self.include_of(dep, ArtifactKind::WrapperHeader) {
                out.line(line);
            }
        }
        out.line("#include \"vec_jsWrap.h\"");
        out.line("#include \"build.src/map_string_jsonstr_jsWrap.h\"");
        out.blank();
        self.bodies.wrapper_impl(self.registry, ty, out)
    }
}

/// Emit every registered type to `sink` with the default bodies.
pub fn emit_all(
    registry: &Registry,
    sink: &dyn ArtifactSink,
    policy: EmitPolicy,
) -> Result<GenerationReport, EmitError> {
    Emitter::new(registry, sink).emit_all(policy)
}
