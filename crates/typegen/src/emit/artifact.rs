// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Artifact kinds and per-type artifact plans.

use std::fmt;

use crate::types::TypeDescription;

/// One generated output per type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    HostCode,
    TypeHeader,
    WrapperHeader,
    WrapperCode,
    MiddlewareAdaptor,
    TestStub,
}

impl ArtifactKind {
    /// Emission order.
    pub const ALL: [ArtifactKind; 6] = [
        Self::HostCode,
        Self::TypeHeader,
        Self::WrapperHeader,
        Self::WrapperCode,
        Self::MiddlewareAdaptor,
        Self::TestStub,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HostCode => "hostCode",
            Self::TypeHeader => "typeHeader",
            Self::WrapperHeader => "wrapperHeader",
            Self::WrapperCode => "wrapperCode",
            Self::MiddlewareAdaptor => "middlewareAdaptor",
            Self::TestStub => "testStub",
        }
    }

    /// Native-storage artifacts, dropped for wrapper-only types.
    pub const fn needs_native_storage(self) -> bool {
        matches!(self, Self::HostCode | Self::TypeHeader)
    }

    fn file_name(self, base: &str) -> String {
        match self {
            Self::HostCode => format!("{base}_host.cc"),
            Self::TypeHeader => format!("{base}_decl.h"),
            Self::WrapperHeader => format!("{base}_jsWrap.h"),
            Self::WrapperCode => format!("{base}_jsWrap.cc"),
            Self::MiddlewareAdaptor => format!("{base}_ros.h"),
            Self::TestStub => format!("test_{base}.js"),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named artifacts a type produces, in emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtifactPlan {
    entries: Vec<(ArtifactKind, String)>,
}

impl ArtifactPlan {
    pub fn for_type(ty: &TypeDescription) -> Self {
        if !ty.kind().as_variant().plans_artifacts() {
            return Self::default();
        }
        let base = ty.wrapper_name();
        let entries = ArtifactKind::ALL
            .iter()
            .filter(|kind| !(ty.is_wrapper_only() && kind.needs_native_storage()))
            .map(|kind| (*kind, kind.file_name(base)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, name)| name.as_str())
    }

    pub fn has(&self, kind: ArtifactKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArtifactKind, &str)> {
        self.entries.iter().map(|(k, n)| (*k, n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Include lines client code uses to pull in `ty`'s declaration.
pub fn customer_includes(ty: &TypeDescription) -> Vec<String> {
    ArtifactPlan::for_type(ty)
        .get(ArtifactKind::TypeHeader)
        .map(|header| vec![format!("#include \"{header}\"")])
        .unwrap_or_default()
}
