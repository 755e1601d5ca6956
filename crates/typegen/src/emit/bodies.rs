// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Target-language body generators.
//!
//! The pipeline owns includes, ordering and customization splicing; the
//! bodies in between come from a [`BodyGenerator`]. [`CppBodies`] is the
//! default: C++ host types with node-style JS wrappers.

use crate::error::EmitError;
use crate::registry::Registry;
use crate::types::{TypeDescription, TypeKind};

use super::sink::ArtifactStream;

/// Variant-specific body text for each artifact.
///
/// Every hook defaults to emitting nothing.
pub trait BodyGenerator: Send + Sync {
    fn forward_decl(
        &self,
        _registry: &Registry,
        _ty: &TypeDescription,
        _out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        Ok(())
    }

    fn type_decl(
        &self,
        _registry: &Registry,
        _ty: &TypeDescription,
        _out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        Ok(())
    }

    fn host_impl(
        &self,
        _registry: &Registry,
        _ty: &TypeDescription,
        _out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        Ok(())
    }

    fn wrapper_decl(
        &self,
        _registry: &Registry,
        _ty: &TypeDescription,
        _out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        Ok(())
    }

    fn wrapper_impl(
        &self,
        _registry: &Registry,
        _ty: &TypeDescription,
        _out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        Ok(())
    }

    fn test_impl(
        &self,
        _registry: &Registry,
        _ty: &TypeDescription,
        _out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        Ok(())
    }
}

/// Default C++ / JS-wrapper bodies.
#[derive(Clone, Copy, Debug, Default)]
pub struct CppBodies;

impl CppBodies {
    /// Expression converting a native value of `ty` to its foreign-runtime
    /// representation.
    pub fn to_foreign_expr(
        registry: &Registry,
        ty: &TypeDescription,
        value_expr: &str,
    ) -> Result<String, EmitError> {
        if ty.is_primitive() {
            return Ok(format!("convCToJs(isolate, {value_expr})"));
        }
        if ty.is_pointer() {
            let pointee = registry.by_id(ty.non_pointer_type());
            return Self::to_foreign_expr(registry, pointee, &format!("(*{value_expr})"));
        }
        if ty.converts_via_wrapper() {
            return Ok(format!(
                "JsWrap_{}::MemberInstance(isolate, args.This(), {value_expr})",
                ty.wrapper_name()
            ));
        }
        Err(EmitError::UnsupportedConversion {
            type_name: ty.type_name().to_string(),
        })
    }

    pub fn var_decl(ty: &TypeDescription, var: &str) -> String {
        format!("{} {var}", ty.type_name())
    }

    pub fn formal_parameter(ty: &TypeDescription, var: &str) -> String {
        if ty.is_primitive() || ty.is_pointer() {
            format!("{} {var}", ty.type_name())
        } else {
            format!("{} const &{var}", ty.type_name())
        }
    }

    fn has_body_struct(ty: &TypeDescription) -> bool {
        matches!(ty.kind(), TypeKind::Struct(_) | TypeKind::Object(_))
    }
}

impl BodyGenerator for CppBodies {
    fn forward_decl(
        &self,
        _registry: &Registry,
        ty: &TypeDescription,
        out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        if Self::has_body_struct(ty) {
            out.line("struct TYPENAME;");
        }
        Ok(())
    }

    fn type_decl(
        &self,
        registry: &Registry,
        ty: &TypeDescription,
        out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        if !Self::has_body_struct(ty) {
            return Ok(());
        }
        out.line("struct TYPENAME {");
        out.line("  TYPENAME();");
        let mut params: Vec<String> = ty
            .members()
            .iter()
            .map(|m| Self::formal_parameter(registry.by_id(m.type_id), &format!("_{}", m.name)))
            .collect();
        params.extend(ty.constructor_args().iter().cloned());
        if !params.is_empty() {
            out.line(format!("  TYPENAME({});", params.join(", ")));
        }
        if !ty.extras().destructor_code.is_empty() {
            out.line("  ~TYPENAME();");
        }
        for member in ty.members() {
            out.line(format!(
                "  {};",
                Self::var_decl(registry.by_id(member.type_id), &member.name)
            ));
        }
        for decl in &ty.extras().member_decls {
            out.line(format!("  {decl}"));
        }
        out.line("};");
        Ok(())
    }

    fn host_impl(
        &self,
        _registry: &Registry,
        ty: &TypeDescription,
        out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        if !Self::has_body_struct(ty) {
            return Ok(());
        }
        out.line("TYPENAME::TYPENAME()");
        out.line("{");
        for code in &ty.extras().constructor_code {
            out.line(format!("  {code}"));
        }
        out.line("}");
        if !ty.extras().destructor_code.is_empty() {
            out.line("TYPENAME::~TYPENAME()");
            out.line("{");
            for code in &ty.extras().destructor_code {
                out.line(format!("  {code}"));
            }
            out.line("}");
        }
        Ok(())
    }

    fn wrapper_decl(
        &self,
        _registry: &Registry,
        ty: &TypeDescription,
        out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        out.line("struct JsWrap_JSTYPE;");
        out.line("void jsInit_JSTYPE(v8::Local<v8::Object> exports);");
        if ty.converts_via_wrapper() {
            out.line("v8::Local<v8::Value> jsToJs_JSTYPE(v8::Isolate *isolate, TYPENAME const &it);");
        }
        Ok(())
    }

    fn wrapper_impl(
        &self,
        registry: &Registry,
        ty: &TypeDescription,
        out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        let mut accessors: Vec<String> = Vec::new();
        for member in ty.members() {
            let member_ty = registry.by_id(member.type_id);
            let expr = Self::to_foreign_expr(registry, member_ty, &format!("thisObj->it->{}", member.name))?;
            out.line(format!(
                "static void jsGet_JSTYPE_{}(v8::Local<v8::String> name, v8::PropertyCallbackInfo<v8::Value> const &args) {{",
                member.name
            ));
            out.line("  v8::Isolate *isolate = args.GetIsolate();");
            out.line("  auto thisObj = node::ObjectWrap::Unwrap<JsWrap_JSTYPE>(args.This());");
            out.line(format!("  args.GetReturnValue().Set({expr});"));
            out.line("}");
            accessors.push(format!(
                "  tpl->InstanceTemplate()->SetAccessor(v8::String::NewFromUtf8(isolate, \"{0}\"), &jsGet_JSTYPE_{0});",
                member.name
            ));
        }
        for method in &ty.extras().wrapper_methods {
            out.lines(method);
        }
        for accessor in &ty.extras().wrapper_accessors {
            out.lines(accessor);
        }
        out.blank();
        out.line("void jsInit_JSTYPE(v8::Local<v8::Object> exports) {");
        out.line("  v8::Isolate *isolate = exports->GetIsolate();");
        out.line("  auto tpl = v8::FunctionTemplate::New(isolate, jsNew_JSTYPE);");
        out.line("  tpl->SetClassName(v8::String::NewFromUtf8(isolate, \"JSTYPE\"));");
        for line in accessors {
            out.line(line);
        }
        out.line("  JsWrap_JSTYPE::constructor.Reset(isolate, tpl->GetFunction());");
        out.line("  exports->Set(v8::String::NewFromUtf8(isolate, \"JSTYPE\"), tpl->GetFunction());");
        out.line("}");
        Ok(())
    }

    fn test_impl(
        &self,
        _registry: &Registry,
        ty: &TypeDescription,
        out: &mut ArtifactStream,
    ) -> Result<(), EmitError> {
        if !ty.is_struct() {
            return Ok(());
        }
        out.line("'use strict';");
        out.line("const ur = require('ur');");
        out.line("const assert = require('assert');");
        out.blank();
        out.line("describe('JSTYPE', function() {");
        out.line("  it('constructs', function() {");
        out.line("    const t = new ur.JSTYPE();");
        out.line("    assert.ok(t);");
        for member in ty.members() {
            out.line(format!("    assert.ok('{}' in t);", member.name));
        }
        out.line("  });");
        out.line("});");
        Ok(())
    }
}
