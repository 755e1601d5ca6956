// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry.
//!
//! Population happens on a [`RegistryBuilder`]. [`RegistryBuilder::freeze`]
//! consumes it and returns the read-only [`Registry`] used by queries and
//! emission, so nothing can be customized once generation has started.
//!
//! Freezing resolves every [`TypeRef`] exactly once, computes the resolved
//! (dependency) order and memoizes each type's dependency sets and synopsis. Any
//! configuration error surfaces there, before a single file is written.
//!
//! # Example
//!
//! ```
//! use typegen::{RegistryBuilder, TypeBuilder};
//!
//! let mut reg = RegistryBuilder::new();
//! reg.register(TypeBuilder::primitive("int"))?;
//! reg.register(TypeBuilder::structure("Point").member("x", "int").member("y", "int"))?;
//! let registry = reg.freeze()?;
//!
//! assert_eq!(registry.get("Point")?.wrapper_name(), "Point");
//! # Ok::<(), typegen::ConfigError>(())
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::ConfigError;
use crate::naming;
use crate::resolver;
use crate::types::{TypeBuilder, TypeDescription, TypeId};

/// Opaque reference to a type by its canonical name.
///
/// Every API that records an edge takes `impl Into<TypeRef>`, so callers may
/// pass a name, a builder or an already-frozen description.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for TypeRef {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<&TypeRef> for TypeRef {
    fn from(value: &TypeRef) -> Self {
        value.clone()
    }
}

impl From<&TypeBuilder> for TypeRef {
    fn from(value: &TypeBuilder) -> Self {
        Self(value.type_name().to_string())
    }
}

impl From<&TypeDescription> for TypeRef {
    fn from(value: &TypeDescription) -> Self {
        Self(value.type_name().to_string())
    }
}

/// Setup-phase registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: Vec<TypeBuilder>,
    index: HashMap<String, usize>,
    wrappers: HashMap<String, String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type. A name may only be registered once, and no two
    /// types may share a wrapper name since it names their artifact files.
    pub fn register(&mut self, ty: TypeBuilder) -> Result<TypeRef, ConfigError> {
        ty.validate()?;
        let name = ty.type_name().to_string();
        if self.index.contains_key(&name) {
            return Err(ConfigError::DuplicateType { name });
        }
        let wrapper = naming::wrapper_name(&name);
        if let Some(existing) = self.wrappers.get(&wrapper) {
            return Err(ConfigError::InvalidArgument(format!(
                "'{existing}' and '{name}' both map to wrapper name '{wrapper}'"
            )));
        }
        tracing::trace!("registered type {} as {}", name, wrapper);
        self.wrappers.insert(wrapper, name.clone());
        self.index.insert(name.clone(), self.types.len());
        self.types.push(ty);
        Ok(TypeRef(name))
    }

    /// Mutable access to a registered type's accumulators.
    pub fn customize(&mut self, ty: impl Into<TypeRef>) -> Result<&mut TypeBuilder, ConfigError> {
        let ty = ty.into();
        match self.index.get(ty.name()) {
            Some(&i) => Ok(&mut self.types[i]),
            None => Err(ConfigError::UnresolvedType {
                name: ty.name().to_string(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolve all references and produce the read-only registry.
    pub fn freeze(self) -> Result<Registry, ConfigError> {
        let ids: HashMap<String, TypeId> = self
            .index
            .iter()
            .map(|(name, &i)| (name.clone(), TypeId::new(i)))
            .collect();
        let resolve = |r: &TypeRef| {
            ids.get(r.name())
                .copied()
                .ok_or_else(|| ConfigError::UnresolvedType {
                    name: r.name().to_string(),
                })
        };

        let types = self
            .types
            .into_iter()
            .enumerate()
            .map(|(i, b)| b.freeze(TypeId::new(i), resolve))
            .collect::<Result<Vec<_>, _>>()?;

        let mut registry = Registry {
            types,
            index: ids,
            order: Vec::new(),
            rank: Vec::new(),
            closures: Vec::new(),
            synopses: Vec::new(),
        };

        registry.order = resolver::resolve_order(&registry)?;
        registry.rank = vec![0; registry.types.len()];
        for (pos, id) in registry.order.iter().enumerate() {
            registry.rank[id.index()] = pos;
        }
        registry.closures = registry
            .types
            .iter()
            .map(|ty| resolver::closure(&registry, ty.id()))
            .collect();

        // Pointer synopses only name their pointee; every other type reads
        // its members' cached text, which resolved order has already filled.
        registry.synopses = vec![String::new(); registry.types.len()];
        let pointers = registry.types.iter().filter(|t| t.is_pointer()).map(TypeDescription::id);
        let values = registry
            .order
            .iter()
            .copied()
            .filter(|id| !registry.types[id.index()].is_pointer());
        let fill_order: Vec<TypeId> = pointers.chain(values).collect();
        for id in fill_order {
            let ty = &registry.types[id.index()];
            let text = ty.kind().as_variant().synopsis(ty.type_name(), &registry);
            registry.synopses[id.index()] = text;
        }

        tracing::debug!("registry frozen with {} types", registry.types.len());
        Ok(registry)
    }
}

/// Memoized dependency sets of one type, each in resolved order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Closure {
    pub(crate) all_types: Vec<TypeId>,
    pub(crate) decl: Vec<TypeId>,
    pub(crate) defn: Vec<TypeId>,
}

/// Frozen, read-only registry.
#[derive(Debug)]
pub struct Registry {
    types: Vec<TypeDescription>,
    index: HashMap<String, TypeId>,
    order: Vec<TypeId>,
    rank: Vec<usize>,
    closures: Vec<Closure>,
    synopses: Vec<String>,
}

impl Registry {
    /// Canonical description for a name or reference.
    pub fn get(&self, ty: impl Into<TypeRef>) -> Result<&TypeDescription, ConfigError> {
        let ty = ty.into();
        self.index
            .get(ty.name())
            .map(|id| &self.types[id.index()])
            .ok_or_else(|| ConfigError::UnresolvedType {
                name: ty.name().to_string(),
            })
    }

    /// Description for an id handed out by this registry.
    ///
    /// # Panics
    ///
    /// Panics if `id` comes from a different registry with more types.
    pub fn by_id(&self, id: TypeId) -> &TypeDescription {
        &self.types[id.index()]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescription> {
        self.types.iter()
    }

    /// Type ids in resolved order: every declaration dependency precedes
    /// its dependents, ties broken by registration order.
    pub fn resolved(&self) -> &[TypeId] {
        &self.order
    }

    /// Position of `id` in [`resolved`](Self::resolved).
    pub fn rank(&self, id: TypeId) -> usize {
        self.rank[id.index()]
    }

    /// Transitive value-type closure of `ty`'s members, excluding `ty`.
    pub fn all_types(&self, ty: &TypeDescription) -> &[TypeId] {
        &self.closures[ty.id().index()].all_types
    }

    /// `all_types` plus explicit declaration edges.
    pub fn decl_dependencies(&self, ty: &TypeDescription) -> &[TypeId] {
        &self.closures[ty.id().index()].decl
    }

    /// Explicit definition edges only.
    pub fn defn_dependencies(&self, ty: &TypeDescription) -> &[TypeId] {
        &self.closures[ty.id().index()].defn
    }

    /// Canonical shape text of `id`, computed once at freeze.
    pub fn synopsis(&self, id: TypeId) -> &str {
        &self.synopses[id.index()]
    }

    /// Order an arbitrary set of ids by resolved rank, dropping duplicates.
    pub fn sort_types(&self, ids: impl IntoIterator<Item = TypeId>) -> Vec<TypeId> {
        resolver::sort_types(self, ids)
    }

    pub(crate) fn types(&self) -> &[TypeDescription] {
        &self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RegistryBuilder {
        let mut reg = RegistryBuilder::new();
        reg.register(TypeBuilder::primitive("Int")).expect("register");
        reg.register(TypeBuilder::collection("ListOfInt", "vector").element("Int"))
            .expect("register");
        reg.register(
            TypeBuilder::structure("Pair")
                .member("a", "Int")
                .member("b", "ListOfInt"),
        )
        .expect("register");
        reg
    }

    #[test]
    fn test_duplicate_registration() {
        let mut reg = RegistryBuilder::new();
        reg.register(TypeBuilder::object("Dup")).expect("first");
        let err = reg.register(TypeBuilder::object("Dup")).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateType { name } if name == "Dup"));
    }

    #[test]
    fn test_wrapper_name_clash_rejected() {
        let mut reg = RegistryBuilder::new();
        reg.register(TypeBuilder::object("Foo::Bar")).expect("first");
        let err = reg.register(TypeBuilder::object("Foo_Bar")).unwrap_err();
        let ConfigError::InvalidArgument(msg) = &err else {
            panic!("unexpected error: {err}");
        };
        assert!(msg.contains("'Foo::Bar'"), "{msg}");
        assert!(msg.contains("wrapper name 'Foo_Bar'"), "{msg}");
        assert_eq!(reg.len(), 1);
        assert!(!reg.contains("Foo_Bar"));
    }

    #[test]
    fn test_whitespace_variant_clash_rejected() {
        let mut reg = RegistryBuilder::new();
        reg.register(TypeBuilder::object("Foo")).expect("first");
        assert!(matches!(
            reg.register(TypeBuilder::object(" Foo")),
            Err(ConfigError::InvalidArgument(_))
        ));
        reg.register(TypeBuilder::primitive("unsigned int")).expect("spaced");
        reg.register(TypeBuilder::primitive("unsignedint")).expect("distinct wrapper");
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_get_by_name_and_description() {
        let registry = sample().freeze().expect("freeze");
        let pair = registry.get("Pair").expect("Pair");
        let again = registry.get(pair).expect("by description");
        assert_eq!(pair.id(), again.id());
        assert!(std::ptr::eq(pair, again));
    }

    #[test]
    fn test_get_unknown_name() {
        let registry = sample().freeze().expect("freeze");
        assert!(matches!(
            registry.get("Nope"),
            Err(ConfigError::UnresolvedType { name }) if name == "Nope"
        ));
    }

    #[test]
    fn test_unresolved_edge_fails_freeze() {
        let mut reg = sample();
        reg.customize("Pair")
            .expect("Pair")
            .add_decl_dependency("Missing")
            .expect("non-empty");
        assert!(matches!(
            reg.freeze(),
            Err(ConfigError::UnresolvedType { name }) if name == "Missing"
        ));
    }

    #[test]
    fn test_unresolved_member_fails_freeze() {
        let mut reg = RegistryBuilder::new();
        reg.register(TypeBuilder::structure("S").member("x", "Ghost"))
            .expect("register");
        assert!(reg.freeze().is_err());
    }

    #[test]
    fn test_customize_unknown() {
        let mut reg = sample();
        assert!(matches!(
            reg.customize("Nope"),
            Err(ConfigError::UnresolvedType { .. })
        ));
    }

    #[test]
    fn test_iteration_is_registration_order() {
        let registry = sample().freeze().expect("freeze");
        let names: Vec<&str> = registry.iter().map(|t| t.type_name()).collect();
        assert_eq!(names, vec!["Int", "ListOfInt", "Pair"]);
    }

    #[test]
    fn test_synopses_cached_for_shared_members() {
        let mut reg = RegistryBuilder::new();
        reg.register(TypeBuilder::primitive("L0")).expect("register");
        for level in 1..=12 {
            let below = format!("L{}", level - 1);
            reg.register(
                TypeBuilder::structure(format!("L{level}"))
                    .member("a", below.as_str())
                    .member("b", below.as_str()),
            )
            .expect("register");
        }
        let registry = reg.freeze().expect("freeze");

        let mut expected = "(L0)".to_string();
        for level in 1..=12 {
            expected = format!("(L{level}={{a:{expected},b:{expected}}})");
            let id = registry.get(format!("L{level}")).expect("level").id();
            assert_eq!(registry.synopsis(id), expected);
        }
    }

    #[test]
    fn test_synopsis_through_pointer_member() {
        let mut reg = RegistryBuilder::new();
        reg.register(TypeBuilder::structure("Node").member("next", "Node*"))
            .expect("register");
        reg.register(TypeBuilder::pointer("Node*", "Node"))
            .expect("register");
        let registry = reg.freeze().expect("freeze");
        let node = registry.get("Node").expect("Node");
        assert_eq!(registry.synopsis(node.id()), "(Node={next:(Node**Node)})");
    }

    #[test]
    fn test_type_ref_conversions() {
        let b = TypeBuilder::object("ns::Thing");
        assert_eq!(TypeRef::from(&b).name(), "ns::Thing");
        assert_eq!(TypeRef::from("x").to_string(), "x");
        assert!(TypeRef::from(" ").is_empty());
    }
}
