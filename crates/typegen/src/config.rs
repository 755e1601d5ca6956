// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative registry description.
//!
//! A YAML document lists every type with its variant shape and
//! customizations:
//!
//! ```yaml
//! types:
//!   - name: int
//!     kind: primitive
//!   - name: Pair
//!     kind: struct
//!     members:
//!       - { name: first, type: int }
//!       - { name: second, type: int }
//!   - name: vector<Pair>
//!     kind: collection
//!     container: vector
//!     elements: [Pair]
//! ```
//!
//! Types are registered in document order, which is also the tie-break order
//! of the resolved sequence.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::error::ConfigError;
use crate::registry::{Registry, RegistryBuilder};
use crate::types::TypeBuilder;

/// Loading failures.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Top-level registry description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub types: Vec<TypeConfig>,
}

/// One type entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeConfig {
    pub name: String,

    #[serde(flatten)]
    pub shape: ShapeConfig,

    /// No native storage: only wrapper artifacts are generated.
    #[serde(default)]
    pub wrapper_only: bool,

    #[serde(flatten)]
    pub customizations: CustomizationConfig,
}

/// Variant shape, selected by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeConfig {
    Primitive,
    Struct {
        #[serde(default)]
        members: Vec<MemberConfig>,
    },
    Collection {
        container: String,
        #[serde(default)]
        elements: Vec<String>,
    },
    Pointer {
        pointee: String,
    },
    Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Append-only customization lists, applied in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomizationConfig {
    pub decl_dependencies: Vec<String>,
    pub defn_dependencies: Vec<String>,
    pub header_includes: Vec<String>,
    pub wrapper_header_includes: Vec<String>,
    pub function_decls: Vec<String>,
    pub member_decls: Vec<String>,
    pub constructor_args: Vec<String>,
    pub constructor_code: Vec<String>,
    pub destructor_code: Vec<String>,
    pub host_code: Vec<String>,
    pub wrapper_methods: Vec<String>,
    pub wrapper_accessors: Vec<String>,
}

impl RegistryConfig {
    /// Load a description from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn to_yaml(&self) -> Result<String, LoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Populate a registry builder; nothing is resolved yet.
    pub fn to_builder(&self) -> Result<RegistryBuilder, ConfigError> {
        let mut reg = RegistryBuilder::new();
        for ty in &self.types {
            let mut builder = ty.to_type_builder()?;
            ty.customizations.apply(&mut builder)?;
            reg.register(builder)?;
        }
        Ok(reg)
    }

    /// Populate and freeze in one step.
    pub fn load_registry(&self) -> Result<Registry, ConfigError> {
        self.to_builder()?.freeze()
    }
}

impl TypeConfig {
    fn to_type_builder(&self) -> Result<TypeBuilder, ConfigError> {
        let mut builder = match &self.shape {
            ShapeConfig::Primitive => TypeBuilder::primitive(&self.name),
            ShapeConfig::Struct { members } => members
                .iter()
                .fold(TypeBuilder::structure(&self.name), |b, m| {
                    b.member(&m.name, &m.type_name)
                }),
            ShapeConfig::Collection {
                container,
                elements,
            } => {
                if container.trim().is_empty() {
                    return Err(ConfigError::InvalidArgument(format!(
                        "{}: collection without container",
                        self.name
                    )));
                }
                elements
                    .iter()
                    .fold(TypeBuilder::collection(&self.name, container), |b, e| {
                        b.element(e)
                    })
            }
            ShapeConfig::Pointer { pointee } => TypeBuilder::pointer(&self.name, pointee),
            ShapeConfig::Object => TypeBuilder::object(&self.name),
        };
        if self.wrapper_only {
            builder = builder.wrapper_only();
        }
        Ok(builder)
    }
}

impl CustomizationConfig {
    fn apply(&self, b: &mut TypeBuilder) -> Result<(), ConfigError> {
        for dep in &self.decl_dependencies {
            b.add_decl_dependency(dep)?;
        }
        for dep in &self.defn_dependencies {
            b.add_defn_dependency(dep)?;
        }
        for s in &self.header_includes {
            b.add_header_include(s);
        }
        for s in &self.wrapper_header_includes {
            b.add_wrapper_header_include(s);
        }
        for s in &self.function_decls {
            b.add_function_decl(s);
        }
        for s in &self.member_decls {
            b.add_member_decl(s);
        }
        for s in &self.constructor_args {
            b.add_constructor_arg(s);
        }
        for s in &self.constructor_code {
            b.add_constructor_code(s);
        }
        for s in &self.destructor_code {
            b.add_destructor_code(s);
        }
        for s in &self.host_code {
            b.add_host_code(s);
        }
        for s in &self.wrapper_methods {
            b.add_wrapper_method(s);
        }
        for s in &self.wrapper_accessors {
            b.add_wrapper_accessor(s);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
types:
  - name: int
    kind: primitive
  - name: Pair
    kind: struct
    members:
      - { name: first, type: int }
      - { name: second, type: int }
    header_includes: ["<cmath>", "common/extra.h"]
  - name: vector<Pair>
    kind: collection
    container: vector
    elements: [Pair]
  - name: Pair*
    kind: pointer
    pointee: Pair
  - name: Handle
    kind: object
    wrapper_only: true
    decl_dependencies: [Pair]
"#;

    #[test]
    fn test_parse_sample() {
        let config = RegistryConfig::from_yaml_str(SAMPLE).expect("parse");
        assert_eq!(config.types.len(), 5);
        assert!(matches!(
            &config.types[1].shape,
            ShapeConfig::Struct { members } if members.len() == 2
        ));
        assert_eq!(config.types[1].customizations.header_includes.len(), 2);
        assert!(config.types[4].wrapper_only);
    }

    #[test]
    fn test_load_registry() {
        let registry = RegistryConfig::from_yaml_str(SAMPLE)
            .expect("parse")
            .load_registry()
            .expect("freeze");
        assert_eq!(registry.len(), 5);

        let handle = registry.get("Handle").expect("Handle");
        assert!(handle.is_wrapper_only());
        assert_eq!(handle.explicit_decl_dependencies().len(), 1);

        let pair = registry.get("Pair").expect("Pair");
        assert_eq!(pair.extras().header_includes[0], "<cmath>");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let yaml = "types:\n  - name: X\n    kind: union\n";
        assert!(matches!(
            RegistryConfig::from_yaml_str(yaml),
            Err(LoadError::Yaml(_))
        ));
    }

    #[test]
    fn test_unresolved_member() {
        let yaml = r#"
types:
  - name: S
    kind: struct
    members:
      - { name: a, type: Missing }
"#;
        let config = RegistryConfig::from_yaml_str(yaml).expect("parse");
        assert!(matches!(
            config.load_registry(),
            Err(ConfigError::UnresolvedType { name }) if name == "Missing"
        ));
    }

    #[test]
    fn test_empty_dependency_rejected() {
        let yaml = r#"
types:
  - name: S
    kind: struct
    decl_dependencies: [""]
"#;
        let config = RegistryConfig::from_yaml_str(yaml).expect("parse");
        assert!(matches!(
            config.to_builder(),
            Err(ConfigError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = RegistryConfig::from_yaml_str(SAMPLE).expect("parse");
        let text = config.to_yaml().expect("serialize");
        let again = RegistryConfig::from_yaml_str(&text).expect("reparse");
        assert_eq!(again.types.len(), config.types.len());
        assert_eq!(again.types[2].name, "vector<Pair>");
    }
}
