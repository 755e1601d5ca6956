// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Content signatures.
//!
//! A type's synopsis is a canonical rendering of its shape. Its signature is
//! the first 8 characters of the base64-encoded SHA-1 of that text, so it
//! changes exactly when the shape changes. Signatures are used downstream
//! as cache and compatibility keys (`version_key`).

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::fmt;

use crate::registry::Registry;
use crate::types::TypeDescription;

/// Number of base64 characters kept from the digest.
pub const SIGNATURE_LEN: usize = 8;

/// Short content hash of a type's synopsis.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Signature(String);

impl Signature {
    /// Hash arbitrary synopsis text.
    pub fn compute(synopsis: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(synopsis.as_bytes());
        let digest = hasher.finalize();
        let mut encoded = STANDARD.encode(digest);
        encoded.truncate(SIGNATURE_LEN);
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical shape text of `ty`.
pub fn synopsis(registry: &Registry, ty: &TypeDescription) -> String {
    registry.synopsis(ty.id()).to_string()
}

pub fn signature(registry: &Registry, ty: &TypeDescription) -> Signature {
    Signature::compute(registry.synopsis(ty.id()))
}

/// `type_name@signature`.
pub fn version_key(registry: &Registry, ty: &TypeDescription) -> String {
    format!("{}@{}", ty.type_name(), signature(registry, ty))
}

/// Member entry of a [`TypeSchema`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemaMember {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Serializable shape summary, consumed by foreign-runtime tooling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSchema {
    pub typename: String,
    pub has_array_nature: bool,
    pub members: Vec<SchemaMember>,
}

pub fn schema(registry: &Registry, ty: &TypeDescription) -> TypeSchema {
    TypeSchema {
        typename: ty.wrapper_name().to_string(),
        has_array_nature: ty.has_array_nature(),
        members: ty
            .members()
            .iter()
            .map(|m| SchemaMember {
                name: m.name.clone(),
                type_name: registry.by_id(m.type_id).type_name().to_string(),
            })
            .collect(),
    }
}
