// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptions.
//!
//! A [`TypeDescription`] is the frozen, read-only form of a type: identity,
//! variant shape and the per-type customizations collected during setup.
//! Setup code never builds one directly; it fills a [`TypeBuilder`] and
//! hands it to the [`RegistryBuilder`](crate::registry::RegistryBuilder),
//! which resolves every reference when the registry is frozen.

mod builder;
mod kind;

pub use builder::TypeBuilder;
pub use kind::{
    Capabilities, CollectionType, Member, ObjectType, PointerType, PrimitiveType, StructType,
    TypeKind, Variant,
};

use std::fmt;

/// Index of a type inside its registry (registration order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Free-form text accumulated on a type during setup. Every list is
/// append-only and keeps insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Customizations {
    pub function_decls: Vec<String>,
    pub member_decls: Vec<String>,
    pub constructor_args: Vec<String>,
    pub host_code: Vec<String>,
    pub wrapper_header_includes: Vec<String>,
    pub header_includes: Vec<String>,
    pub constructor_code: Vec<String>,
    pub destructor_code: Vec<String>,
    pub wrapper_methods: Vec<String>,
    pub wrapper_accessors: Vec<String>,
}

/// Frozen description of one registered type.
#[derive(Clone, Debug)]
pub struct TypeDescription {
    pub(crate) id: TypeId,
    pub(crate) type_name: String,
    pub(crate) wrapper_name: String,
    pub(crate) kind: TypeKind,
    pub(crate) wrapper_only: bool,
    pub(crate) extras: Customizations,
    pub(crate) decl_edges: Vec<TypeId>,
    pub(crate) defn_edges: Vec<TypeId>,
}

impl TypeDescription {
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Canonical source identifier, e.g. `vector<Foo>`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Sanitized identifier, e.g. `vector_Foo`.
    pub fn wrapper_name(&self) -> &str {
        &self.wrapper_name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// No native storage: host code and type header are not generated.
    pub fn is_wrapper_only(&self) -> bool {
        self.wrapper_only
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind.as_variant().capabilities()
    }

    pub fn is_struct(&self) -> bool {
        self.capabilities().is_struct
    }

    pub fn is_collection(&self) -> bool {
        self.capabilities().is_collection
    }

    pub fn is_primitive(&self) -> bool {
        self.capabilities().is_primitive
    }

    pub fn is_pointer(&self) -> bool {
        self.capabilities().is_pointer
    }

    pub fn is_object(&self) -> bool {
        self.capabilities().is_object
    }

    pub fn is_pod(&self) -> bool {
        self.capabilities().is_pod
    }

    pub fn is_copy_constructible(&self) -> bool {
        self.capabilities().is_copy_constructible
    }

    pub fn has_array_nature(&self) -> bool {
        self.capabilities().has_array_nature
    }

    pub fn has_foreign_wrapper(&self) -> bool {
        self.capabilities().has_foreign_wrapper
    }

    /// Native values of this type can be handed to its wrapper class.
    /// Wrapper-only types have no native storage to hand over.
    pub fn converts_via_wrapper(&self) -> bool {
        self.has_foreign_wrapper() && !self.wrapper_only
    }

    pub fn members(&self) -> &[Member] {
        self.kind.as_variant().members()
    }

    pub fn member_types(&self) -> Vec<TypeId> {
        self.kind.as_variant().member_types()
    }

    /// Pointee for pointer types, the type itself otherwise.
    pub fn non_pointer_type(&self) -> TypeId {
        self.kind.as_variant().pointee().unwrap_or(self.id)
    }

    pub fn extras(&self) -> &Customizations {
        &self.extras
    }

    pub fn constructor_args(&self) -> &[String] {
        &self.extras.constructor_args
    }

    /// Declaration edges added explicitly during setup, insertion order.
    pub fn explicit_decl_dependencies(&self) -> &[TypeId] {
        &self.decl_edges
    }

    /// Definition edges added explicitly during setup, insertion order.
    pub fn explicit_defn_dependencies(&self) -> &[TypeId] {
        &self.defn_edges
    }
}
