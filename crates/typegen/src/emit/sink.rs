// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Artifact sinks.
//!
//! The pipeline asks a sink for one [`ArtifactStream`] per planned artifact,
//! fills them in memory, then hands the whole batch back through
//! [`ArtifactSink::commit`]. A sink therefore sees a type's artifacts all at
//! once and can publish them together.

use parking_lot::Mutex;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::artifact::ArtifactKind;
use crate::error::EmitError;
use crate::types::TypeDescription;

/// Tokens substituted in every emitted line.
///
/// A token is an alphanumeric run; `_` separates tokens, so `JsWrap_JSTYPE`
/// expands while `TYPENAMES` does not.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateParams(Vec<(String, String)>);

impl TemplateParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// `TYPENAME` and `JSTYPE` for `ty`.
    pub fn for_type(ty: &TypeDescription) -> Self {
        Self::new()
            .with("TYPENAME", ty.type_name())
            .with("JSTYPE", ty.wrapper_name())
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn pattern(&self) -> Option<Regex> {
        if self.0.is_empty() {
            return None;
        }
        let keys: Vec<String> = self.0.iter().map(|(k, _)| regex::escape(k)).collect();
        Regex::new(&format!(r"[A-Za-z0-9]*(?:{})[A-Za-z0-9]*", keys.join("|"))).ok()
    }
}

/// What the pipeline asks a sink to open.
#[derive(Clone, Copy, Debug)]
pub struct ArtifactRequest<'a> {
    pub kind: ArtifactKind,
    pub file_name: &'a str,
    pub type_name: &'a str,
    pub params: &'a TemplateParams,
}

/// Parameterized, in-memory output stream for one artifact.
#[derive(Debug)]
pub struct ArtifactStream {
    kind: ArtifactKind,
    file_name: String,
    params: TemplateParams,
    pattern: Option<Regex>,
    contents: String,
}

impl ArtifactStream {
    pub fn new(kind: ArtifactKind, file_name: impl Into<String>, params: TemplateParams) -> Self {
        let pattern = params.pattern();
        Self {
            kind,
            file_name: file_name.into(),
            params,
            pattern,
            contents: String::new(),
        }
    }

    pub fn from_request(request: &ArtifactRequest<'_>) -> Self {
        Self::new(request.kind, request.file_name, request.params.clone())
    }

    /// Append one line, substituting template parameters.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        match &self.pattern {
            Some(re) => {
                let params = &self.params;
                let replaced = re.replace_all(text, |caps: &Captures<'_>| {
                    params.get(&caps[0]).unwrap_or(&caps[0]).to_string()
                });
                self.contents.push_str(&replaced);
            }
            None => self.contents.push_str(text),
        }
        self.contents.push('\n');
    }

    /// Append every line of a multi-line block.
    pub fn lines(&mut self, block: &str) {
        for l in block.lines() {
            self.line(l);
        }
    }

    pub fn blank(&mut self) {
        self.contents.push('\n');
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn into_contents(self) -> String {
        self.contents
    }
}

/// Destination of generated artifacts.
pub trait ArtifactSink: Send + Sync {
    fn open_artifact(&self, request: &ArtifactRequest<'_>) -> Result<ArtifactStream, EmitError>;

    /// Publish all artifacts of one type together.
    fn commit(&self, type_name: &str, artifacts: Vec<ArtifactStream>) -> Result<(), EmitError>;
}

/// Writes artifacts below a root directory.
///
/// Commits write every file of the batch to a temporary name first and only
/// then rename them into place, one batch at a time. A failed write leaves
/// nothing behind. A failed rename removes every temporary file not yet
/// renamed, but files renamed before it stay in place: renames of several
/// files cannot be made atomic as a group.
#[derive(Debug)]
pub struct FileSink {
    root: PathBuf,
    lock: Mutex<()>,
}

impl FileSink {
    /// Sink over an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    /// Create `root` (and parents) and return a sink over it.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, EmitError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| EmitError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl ArtifactSink for FileSink {
    fn open_artifact(&self, request: &ArtifactRequest<'_>) -> Result<ArtifactStream, EmitError> {
        if !self.root.is_dir() {
            return Err(EmitError::MissingSink {
                kind: request.kind,
                artifact: request.file_name.to_string(),
                reason: format!("{} is not a directory", self.root.display()),
            });
        }
        Ok(ArtifactStream::from_request(request))
    }

    fn commit(&self, type_name: &str, artifacts: Vec<ArtifactStream>) -> Result<(), EmitError> {
        let _guard = self.lock.lock();

        let mut staged = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            let path = self.root.join(artifact.file_name());
            let tmp = Self::temp_path(&path);
            if let Err(source) = fs::write(&tmp, artifact.contents()) {
                for (staged_tmp, _) in &staged {
                    let _ = fs::remove_file(staged_tmp);
                }
                return Err(EmitError::Io { path: tmp, source });
            }
            staged.push((tmp, path));
        }

        for (i, (tmp, path)) in staged.iter().enumerate() {
            if let Err(source) = fs::rename(tmp, path) {
                for (pending, _) in &staged[i..] {
                    let _ = fs::remove_file(pending);
                }
                tracing::warn!(
                    "partial commit for {}: {} of {} artifacts in place",
                    type_name,
                    i,
                    staged.len()
                );
                return Err(EmitError::Io {
                    path: path.clone(),
                    source,
                });
            }
        }

        tracing::debug!("committed {} artifacts for {}", artifacts.len(), type_name);
        Ok(())
    }
}

/// Keeps committed artifacts in memory, keyed by file name.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<BTreeMap<String, String>>,
    requests: Mutex<Vec<(ArtifactKind, String)>>,
    refused: Vec<ArtifactKind>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request for `kind` with [`EmitError::MissingSink`].
    #[must_use]
    pub fn refusing(mut self, kind: ArtifactKind) -> Self {
        self.refused.push(kind);
        self
    }

    pub fn file(&self, name: &str) -> Option<String> {
        self.files.lock().get(name).cloned()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files.lock().keys().cloned().collect()
    }

    /// Every open request seen, including refused ones, in arrival order.
    pub fn requests(&self) -> Vec<(ArtifactKind, String)> {
        self.requests.lock().clone()
    }
}

impl ArtifactSink for MemorySink {
    fn open_artifact(&self, request: &ArtifactRequest<'_>) -> Result<ArtifactStream, EmitError> {
        self.requests
            .lock()
            .push((request.kind, request.type_name.to_string()));
        if self.refused.contains(&request.kind) {
            return Err(EmitError::MissingSink {
                kind: request.kind,
                artifact: request.file_name.to_string(),
                reason: "refused".into(),
            });
        }
        Ok(ArtifactStream::from_request(request))
    }

    fn commit(&self, _type_name: &str, artifacts: Vec<ArtifactStream>) -> Result<(), EmitError> {
        let mut files = self.files.lock();
        for artifact in artifacts {
            let name = artifact.file_name().to_string();
            files.insert(name, artifact.into_contents());
        }
        Ok(())
    }
}
