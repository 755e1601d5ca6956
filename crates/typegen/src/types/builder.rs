// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Setup-time builder for type descriptions.

use super::kind::{
    CollectionType, Member, ObjectType, PointerType, PrimitiveType, StructType, TypeKind,
};
use super::{Customizations, TypeDescription, TypeId};
use crate::error::ConfigError;
use crate::naming;
use crate::registry::TypeRef;

/// Variant shape with unresolved references.
#[derive(Clone, Debug)]
pub(crate) enum ShapeSpec {
    Primitive,
    Struct { members: Vec<(String, TypeRef)> },
    Collection { container: String, elements: Vec<TypeRef> },
    Pointer { pointee: TypeRef },
    Object,
}

/// Mutable description of a type, used only before the registry is frozen.
///
/// Shape methods (`member`, `element`, `wrapper_only`) consume and return the
/// builder for declaration chains; the `add_*` accumulators take `&mut self`
/// so setup code can keep customizing a type after it has been registered
/// (see [`RegistryBuilder::customize`](crate::registry::RegistryBuilder::customize)).
#[derive(Clone, Debug)]
pub struct TypeBuilder {
    type_name: String,
    shape: ShapeSpec,
    wrapper_only: bool,
    extras: Customizations,
    decl_edges: Vec<TypeRef>,
    defn_edges: Vec<TypeRef>,
    misuse: Option<String>,
}

impl TypeBuilder {
    fn with_shape(type_name: impl Into<String>, shape: ShapeSpec) -> Self {
        Self {
            type_name: type_name.into(),
            shape,
            wrapper_only: false,
            extras: Customizations::default(),
            decl_edges: Vec::new(),
            defn_edges: Vec::new(),
            misuse: None,
        }
    }

    pub fn primitive(type_name: impl Into<String>) -> Self {
        Self::with_shape(type_name, ShapeSpec::Primitive)
    }

    /// Struct with no members yet; add them with [`member`](Self::member).
    pub fn structure(type_name: impl Into<String>) -> Self {
        Self::with_shape(
            type_name,
            ShapeSpec::Struct {
                members: Vec::new(),
            },
        )
    }

    /// Collection over `container` with no element types yet; add them with
    /// [`element`](Self::element).
    pub fn collection(type_name: impl Into<String>, container: impl Into<String>) -> Self {
        Self::with_shape(
            type_name,
            ShapeSpec::Collection {
                container: container.into(),
                elements: Vec::new(),
            },
        )
    }

    pub fn pointer(type_name: impl Into<String>, pointee: impl Into<TypeRef>) -> Self {
        Self::with_shape(
            type_name,
            ShapeSpec::Pointer {
                pointee: pointee.into(),
            },
        )
    }

    pub fn object(type_name: impl Into<String>) -> Self {
        Self::with_shape(type_name, ShapeSpec::Object)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn member(mut self, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        let name = name.into();
        match &mut self.shape {
            ShapeSpec::Struct { members } => members.push((name, ty.into())),
            _ => self.note_misuse(format!("member '{name}' on non-struct")),
        }
        self
    }

    #[must_use]
    pub fn element(mut self, ty: impl Into<TypeRef>) -> Self {
        match &mut self.shape {
            ShapeSpec::Collection { elements, .. } => elements.push(ty.into()),
            _ => self.note_misuse("element type on non-collection".to_string()),
        }
        self
    }

    /// Mark the type as having no native storage.
    #[must_use]
    pub fn wrapper_only(mut self) -> Self {
        self.wrapper_only = true;
        self
    }

    fn note_misuse(&mut self, what: String) {
        if self.misuse.is_none() {
            self.misuse = Some(format!("{}: {what}", self.type_name));
        }
    }

    pub fn add_function_decl(&mut self, decl: impl Into<String>) -> &mut Self {
        self.extras.function_decls.push(decl.into());
        self
    }

    pub fn add_member_decl(&mut self, decl: impl Into<String>) -> &mut Self {
        self.extras.member_decls.push(decl.into());
        self
    }

    pub fn add_constructor_arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.extras.constructor_args.push(arg.into());
        self
    }

    pub fn add_host_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.extras.host_code.push(code.into());
        self
    }

    /// Extra type whose declaration this type's declaration needs.
    pub fn add_decl_dependency(
        &mut self,
        ty: impl Into<TypeRef>,
    ) -> Result<&mut Self, ConfigError> {
        let ty = ty.into();
        if ty.is_empty() {
            return Err(ConfigError::InvalidArgument(format!(
                "{}: empty declaration dependency",
                self.type_name
            )));
        }
        self.decl_edges.push(ty);
        Ok(self)
    }

    /// Extra type the implementation needs beyond the declaration.
    pub fn add_defn_dependency(
        &mut self,
        ty: impl Into<TypeRef>,
    ) -> Result<&mut Self, ConfigError> {
        let ty = ty.into();
        if ty.is_empty() {
            return Err(ConfigError::InvalidArgument(format!(
                "{}: empty definition dependency",
                self.type_name
            )));
        }
        self.defn_edges.push(ty);
        Ok(self)
    }

    /// Raw header include; a leading `<` selects the angle-bracket form.
    pub fn add_header_include(&mut self, header: impl Into<String>) -> &mut Self {
        self.extras.header_includes.push(header.into());
        self
    }

    pub fn add_wrapper_header_include(&mut self, header: impl Into<String>) -> &mut Self {
        self.extras.wrapper_header_includes.push(header.into());
        self
    }

    pub fn add_constructor_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.extras.constructor_code.push(code.into());
        self
    }

    pub fn add_destructor_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.extras.destructor_code.push(code.into());
        self
    }

    pub fn add_wrapper_method(&mut self, code: impl Into<String>) -> &mut Self {
        self.extras.wrapper_methods.push(code.into());
        self
    }

    pub fn add_wrapper_accessor(&mut self, code: impl Into<String>) -> &mut Self {
        self.extras.wrapper_accessors.push(code.into());
        self
    }

    /// Checks that only need the builder itself.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.type_name.trim().is_empty() {
            return Err(ConfigError::InvalidArgument("empty type name".into()));
        }
        if let Some(misuse) = &self.misuse {
            return Err(ConfigError::InvalidArgument(misuse.clone()));
        }
        let wrapper = naming::wrapper_name(&self.type_name);
        if !naming::is_valid_wrapper_name(&wrapper) {
            return Err(ConfigError::InvalidArgument(format!(
                "type name '{}' yields no usable wrapper name",
                self.type_name
            )));
        }
        if let ShapeSpec::Struct { members } = &self.shape {
            for (i, (name, _)) in members.iter().enumerate() {
                if name.is_empty() {
                    return Err(ConfigError::InvalidArgument(format!(
                        "{}: member {i} has no name",
                        self.type_name
                    )));
                }
                if members[..i].iter().any(|(other, _)| other == name) {
                    return Err(ConfigError::InvalidArgument(format!(
                        "{}: duplicate member '{name}'",
                        self.type_name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Resolve every reference and produce the frozen description.
    pub(crate) fn freeze<F>(self, id: TypeId, resolve: F) -> Result<TypeDescription, ConfigError>
    where
        F: Fn(&TypeRef) -> Result<TypeId, ConfigError>,
    {
        let kind = match self.shape {
            ShapeSpec::Primitive => TypeKind::Primitive(PrimitiveType),
            ShapeSpec::Struct { members } => TypeKind::Struct(StructType {
                members: members
                    .into_iter()
                    .map(|(name, ty)| {
                        Ok(Member {
                            name,
                            type_id: resolve(&ty)?,
                        })
                    })
                    .collect::<Result<_, ConfigError>>()?,
            }),
            ShapeSpec::Collection {
                container,
                elements,
            } => TypeKind::Collection(CollectionType {
                container,
                elements: elements.iter().map(&resolve).collect::<Result<_, _>>()?,
            }),
            ShapeSpec::Pointer { pointee } => TypeKind::Pointer(PointerType {
                pointee: resolve(&pointee)?,
            }),
            ShapeSpec::Object => TypeKind::Object(ObjectType),
        };

        Ok(TypeDescription {
            id,
            wrapper_name: naming::wrapper_name(&self.type_name),
            type_name: self.type_name,
            kind,
            wrapper_only: self.wrapper_only,
            extras: self.extras,
            decl_edges: self.decl_edges.iter().map(&resolve).collect::<Result<_, _>>()?,
            defn_edges: self.defn_edges.iter().map(&resolve).collect::<Result<_, _>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulators_keep_insertion_order() {
        let mut b = TypeBuilder::structure("Foo");
        b.add_function_decl("void a();")
            .add_function_decl("void b();")
            .add_host_code("// one")
            .add_host_code("// two");
        assert_eq!(b.extras.function_decls, vec!["void a();", "void b();"]);
        assert_eq!(b.extras.host_code, vec!["// one", "// two"]);
    }

    #[test]
    fn test_empty_dependency_rejected() {
        let mut b = TypeBuilder::structure("Foo");
        assert!(matches!(
            b.add_decl_dependency(""),
            Err(ConfigError::InvalidArgument(_))
        ));
        assert!(matches!(
            b.add_defn_dependency(String::new()),
            Err(ConfigError::InvalidArgument(_))
        ));
        assert!(b.add_decl_dependency("Bar").is_ok());
        assert_eq!(b.decl_edges.len(), 1);
    }

    #[test]
    fn test_member_on_primitive_is_misuse() {
        let b = TypeBuilder::primitive("int").member("x", "int");
        assert!(matches!(
            b.validate(),
            Err(ConfigError::InvalidArgument(msg)) if msg.contains("non-struct")
        ));
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let b = TypeBuilder::structure("P")
            .member("a", "int")
            .member("a", "double");
        assert!(b.validate().is_err());
    }

    #[test]
    fn test_unusable_wrapper_name_rejected() {
        assert!(TypeBuilder::object(">>").validate().is_err());
        assert!(TypeBuilder::object("  ").validate().is_err());
        assert!(TypeBuilder::object("ns::Thing").validate().is_ok());
    }
}
