// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Type Artifact Generator
//
// Loads a YAML registry description, freezes it and writes every type's
// artifacts plus a manifest.json into the output directory.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use typegen::config::RegistryConfig;
use typegen::{
    schema, ArtifactPlan, EmitPolicy, Emitter, FileSink, GenerationReport, Registry, TypeSchema,
};

/// Generation options from the command line.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub out_dir: PathBuf,
    pub parallel: bool,
    pub keep_going: bool,
}

/// Manifest entry for one emitted type.
#[derive(Debug, Serialize)]
struct ManifestType<'a> {
    name: &'a str,
    version_key: &'a str,
    artifacts: &'a [String],
    schema: TypeSchema,
}

/// Generator state
pub struct TypeGenerator {
    registry: Registry,
}

impl TypeGenerator {
    /// Load and freeze a registry description.
    pub fn from_config(path: &Path) -> Result<Self> {
        tracing::info!("Loading registry from: {:?}", path);
        let config = RegistryConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        let registry = config
            .load_registry()
            .context("Invalid registry description")?;
        tracing::info!("Registry frozen: {} types", registry.len());
        Ok(Self { registry })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Emit all artifacts and the manifest.
    pub fn generate(&self, opts: &GenerateOptions) -> Result<GenerationReport> {
        let sink = FileSink::create(&opts.out_dir).context("Failed to create output directory")?;
        let policy = if opts.keep_going {
            EmitPolicy::Continue
        } else {
            EmitPolicy::FailFast
        };

        tracing::info!("Stage 1: Emitting artifacts");
        let emitter = Emitter::new(&self.registry, &sink);
        let report = if opts.parallel {
            emitter.emit_all_parallel(policy)
        } else {
            emitter.emit_all(policy)
        }
        .context("Emission failed")?;

        tracing::info!("Stage 2: Generating manifest");
        self.write_manifest(&opts.out_dir, &report)?;

        Ok(report)
    }

    /// `name@signature` for every type, in resolved order.
    pub fn version_keys(&self) -> Vec<String> {
        self.registry
            .resolved()
            .iter()
            .map(|id| typegen::version_key(&self.registry, self.registry.by_id(*id)))
            .collect()
    }

    /// One line per planning type: artifact files and declaration deps.
    pub fn plan_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for &id in self.registry.resolved() {
            let ty = self.registry.by_id(id);
            let plan = ArtifactPlan::for_type(ty);
            if plan.is_empty() {
                continue;
            }
            let files: Vec<&str> = plan.iter().map(|(_, name)| name).collect();
            let deps: Vec<&str> = self
                .registry
                .decl_dependencies(ty)
                .iter()
                .map(|d| self.registry.by_id(*d).type_name())
                .collect();
            lines.push(format!(
                "{}: {} [deps: {}]",
                ty.type_name(),
                files.join(" "),
                deps.join(", ")
            ));
        }
        lines
    }

    fn write_manifest(&self, out_dir: &Path, report: &GenerationReport) -> Result<()> {
        let mut types = Vec::with_capacity(report.emitted.len());
        for emitted in &report.emitted {
            let ty = self
                .registry
                .get(emitted.type_name.as_str())
                .context("Emitted type missing from registry")?;
            types.push(ManifestType {
                name: &emitted.type_name,
                version_key: &emitted.version_key,
                artifacts: &emitted.artifacts,
                schema: schema(&self.registry, ty),
            });
        }
        let failures: Vec<serde_json::Value> = report
            .failures
            .iter()
            .map(|(name, err)| serde_json::json!({ "type": name, "error": err.to_string() }))
            .collect();

        let manifest = serde_json::json!({
            "generated_date": chrono::Local::now().to_rfc3339(),
            "total_types": report.emitted.len(),
            "total_artifacts": report.artifact_count(),
            "types": types,
            "failures": failures,
        });

        let manifest_path = out_dir.join("manifest.json");
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
            .context("Failed to write manifest.json")?;

        tracing::info!("[OK] Generated manifest.json");
        Ok(())
    }
}
