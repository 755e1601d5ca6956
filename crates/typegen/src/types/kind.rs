// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Closed set of type variants.
//!
//! Each variant implements [`Variant`], which exposes the shape shared by all
//! of them: capabilities, members, the pointer indirection and the canonical
//! synopsis text. [`TypeKind`] dispatches to the concrete variant.

use super::TypeId;
use crate::registry::Registry;

/// Fixed capability predicates of a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub is_struct: bool,
    pub is_collection: bool,
    pub is_primitive: bool,
    pub is_pointer: bool,
    pub is_object: bool,
    pub is_pod: bool,
    pub is_copy_constructible: bool,
    pub has_array_nature: bool,
    pub has_foreign_wrapper: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            is_struct: false,
            is_collection: false,
            is_primitive: false,
            is_pointer: false,
            is_object: false,
            is_pod: false,
            is_copy_constructible: true,
            has_array_nature: false,
            has_foreign_wrapper: false,
        }
    }
}

/// Named struct member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub type_id: TypeId,
}

/// Contract shared by every variant.
pub trait Variant {
    fn capabilities(&self) -> Capabilities;

    fn members(&self) -> &[Member] {
        &[]
    }

    /// Types referenced by this variant's shape, in declaration order.
    fn member_types(&self) -> Vec<TypeId> {
        self.members().iter().map(|m| m.type_id).collect()
    }

    /// Target of a pointer variant; `None` means the type is its own
    /// non-pointer type.
    fn pointee(&self) -> Option<TypeId> {
        None
    }

    /// Whether the type gets generated artifacts of its own. Built-in
    /// target-language types (scalars, raw pointers) do not.
    fn plans_artifacts(&self) -> bool {
        true
    }

    /// Canonical shape text. Must not depend on anything but the shape.
    /// Value members are read from the registry's synopsis cache.
    fn synopsis(&self, type_name: &str, registry: &Registry) -> String;
}

/// Scalar built into the target language.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrimitiveType;

impl Variant for PrimitiveType {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            is_primitive: true,
            is_pod: true,
            ..Capabilities::default()
        }
    }

    fn plans_artifacts(&self) -> bool {
        false
    }

    fn synopsis(&self, type_name: &str, _registry: &Registry) -> String {
        format!("({type_name})")
    }
}

/// Record with ordered named members.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructType {
    pub members: Vec<Member>,
}

impl Variant for StructType {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            is_struct: true,
            has_foreign_wrapper: true,
            ..Capabilities::default()
        }
    }

    fn members(&self) -> &[Member] {
        &self.members
    }

    fn synopsis(&self, type_name: &str, registry: &Registry) -> String {
        let fields: Vec<String> = self
            .members
            .iter()
            .map(|m| format!("{}:{}", m.name, registry.synopsis(m.type_id)))
            .collect();
        format!("({type_name}={{{}}})", fields.join(","))
    }
}

/// Template container such as `vector<T>` or `map<K,V>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectionType {
    pub container: String,
    pub elements: Vec<TypeId>,
}

impl Variant for CollectionType {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            is_collection: true,
            has_array_nature: true,
            has_foreign_wrapper: true,
            ..Capabilities::default()
        }
    }

    fn member_types(&self) -> Vec<TypeId> {
        self.elements.clone()
    }

    fn synopsis(&self, type_name: &str, registry: &Registry) -> String {
        let elements: Vec<String> = self
            .elements
            .iter()
            .map(|id| registry.synopsis(*id).to_string())
            .collect();
        format!("({type_name}={}[{}])", self.container, elements.join(","))
    }
}

/// Reference to another registered type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerType {
    pub pointee: TypeId,
}

impl Variant for PointerType {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            is_pointer: true,
            ..Capabilities::default()
        }
    }

    fn member_types(&self) -> Vec<TypeId> {
        vec![self.pointee]
    }

    fn pointee(&self) -> Option<TypeId> {
        Some(self.pointee)
    }

    fn plans_artifacts(&self) -> bool {
        false
    }

    // Pointee by name only: pointer cycles must not recurse.
    fn synopsis(&self, type_name: &str, registry: &Registry) -> String {
        format!("({type_name}*{})", registry.by_id(self.pointee).type_name())
    }
}

/// Hand-written native class; shape is opaque to the generator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectType;

impl Variant for ObjectType {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            is_object: true,
            is_copy_constructible: false,
            has_foreign_wrapper: true,
            ..Capabilities::default()
        }
    }

    fn synopsis(&self, type_name: &str, _registry: &Registry) -> String {
        format!("({type_name})")
    }
}

/// Concrete variant of a [`TypeDescription`](super::TypeDescription).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Primitive(PrimitiveType),
    Struct(StructType),
    Collection(CollectionType),
    Pointer(PointerType),
    Object(ObjectType),
}

impl TypeKind {
    pub fn as_variant(&self) -> &dyn Variant {
        match self {
            Self::Primitive(v) => v,
            Self::Struct(v) => v,
            Self::Collection(v) => v,
            Self::Pointer(v) => v,
            Self::Object(v) => v,
        }
    }

    /// Short lowercase label, as used by the YAML registry description.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Struct(_) => "struct",
            Self::Collection(_) => "collection",
            Self::Pointer(_) => "pointer",
            Self::Object(_) => "object",
        }
    }
}
