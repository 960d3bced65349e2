//! Model reference classification and normalization.
//!
//! A model reference is whatever string the caller used to point at a model:
//! a hub repo id (`org/name`), an object-store URI (`s3://`, `minio://`),
//! a plain URL or a local path. This module decides which of those it is,
//! infers the serialization format from the file extension and rewrites
//! storage URIs into access URIs through the registry client.

use crate::error::{RegistrarError, Result};
use crate::registry::RegistryClient;

/// Prefixes that mark a reference as a URI or absolute path rather than a hub repo id.
const NON_HUB_PREFIXES: &[&str] = &["http", "s3://", "minio://", "/"];

/// Object-store schemes, in match order.
const STORAGE_SCHEMES: &[&str] = &["minio://", "s3://"];

/// Extension to format lookup. Keys are lowercase and carry no leading dot.
const FORMAT_BY_EXTENSION: &[(&str, ModelFormat)] = &[
    ("onnx", ModelFormat::Onnx),
    ("pkl", ModelFormat::Sklearn),
    ("pt", ModelFormat::Pytorch),
    ("joblib", ModelFormat::Sklearn),
    ("h5", ModelFormat::Keras),
    ("sav", ModelFormat::Sklearn),
];

/// What kind of thing a model reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A repo id on the model hub, e.g. `bert-base-uncased/config`.
    HubRepo,
    /// An object in S3 or MinIO.
    StorageUri,
    /// Any other URL or a local path; passed through untouched.
    Other,
}

/// Serialization format inferred from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Onnx,
    Sklearn,
    Pytorch,
    Keras,
    Unknown,
}

impl ModelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::Onnx => "onnx",
            ModelFormat::Sklearn => "sklearn",
            ModelFormat::Pytorch => "pytorch",
            ModelFormat::Keras => "keras",
            ModelFormat::Unknown => "unknown",
        }
    }

    /// Look up a bare extension (no dot), ignoring case.
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_lowercase();
        FORMAT_BY_EXTENSION
            .iter()
            .find(|(key, _)| *key == ext)
            .map(|(_, format)| *format)
            .unwrap_or(ModelFormat::Unknown)
    }

    pub fn is_known(&self) -> bool {
        *self != ModelFormat::Unknown
    }
}

impl std::fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a model reference.
///
/// Scheme and absolute-path checks run before the slash heuristic, so
/// `http-proxy/model` is `Other` and `s3://a/b/c` is `StorageUri`.
pub fn classify(reference: &str) -> ReferenceKind {
    if is_hub_repo(reference) {
        ReferenceKind::HubRepo
    } else if storage_scheme(reference).is_some() {
        ReferenceKind::StorageUri
    } else {
        ReferenceKind::Other
    }
}

fn is_hub_repo(reference: &str) -> bool {
    reference.contains('/')
        && !NON_HUB_PREFIXES
            .iter()
            .any(|prefix| reference.starts_with(prefix))
}

/// The storage scheme a reference starts with, if any.
pub fn storage_scheme(reference: &str) -> Option<&'static str> {
    STORAGE_SCHEMES
        .iter()
        .copied()
        .find(|scheme| reference.starts_with(scheme))
}

/// Infer the model format from the reference's file extension.
///
/// Only the text after the last `/` is considered, so a trailing slash
/// leaves nothing to inspect. Leading dots never start an extension: `.pkl`
/// and `..pkl` both yield `Unknown`.
pub fn infer_format(reference: &str) -> ModelFormat {
    let file_name = reference.rsplit('/').next().unwrap_or(reference);
    file_name
        .trim_start_matches('.')
        .rsplit_once('.')
        .map(|(_, ext)| ModelFormat::from_extension(ext))
        .unwrap_or(ModelFormat::Unknown)
}

/// Rewrite a storage URI into an access URI.
///
/// Strips the matched scheme and hands the remaining `bucket/key` path plus
/// the storage key to the registry client. References without a storage
/// scheme are returned unchanged.
pub fn resolve_storage_uri<C>(
    client: &C,
    reference: &str,
    storage_key: Option<&str>,
) -> Result<String>
where
    C: RegistryClient + ?Sized,
{
    let Some(scheme) = storage_scheme(reference) else {
        return Ok(reference.to_string());
    };

    let storage_key = storage_key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| RegistrarError::MissingStorageKey {
            reference: reference.to_string(),
        })?;

    let path = &reference[scheme.len()..];
    client.construct_storage_uri(path, storage_key)
}
