//! Model registry client abstraction.
//!
//! The registration logic only needs three capabilities from a registry:
//! building a storage access URI, registering a hub model and registering
//! an artifact-backed model. [`RegistryClient`] captures those so the
//! decision logic can be exercised without a live service.
//!
//! # Module Organization
//!
//! - [`http`] - REST implementation against a Kubeflow-style model registry
//! - [`types`] - Wire types for the registry API

mod http;
mod types;

pub use http::HttpRegistryClient;
pub use types::{custom_properties, CustomProperty};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata attached to a registration.
pub type Metadata = Map<String, Value>;

/// Fields for registering a model hosted on the model hub.
#[derive(Debug, Clone, PartialEq)]
pub struct HubModelRegistration {
    pub name: String,
    /// Hub repo id, e.g. `org/model-name`.
    pub repo_id: String,
    pub description: Option<String>,
    pub version: String,
    pub metadata: Metadata,
}

/// Fields for registering a model backed by a single artifact URI.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRegistration {
    pub name: String,
    /// Resolved artifact URI.
    pub uri: String,
    pub format: String,
    pub description: Option<String>,
    pub version: String,
    pub storage_key: Option<String>,
    pub metadata: Metadata,
}

/// A registered model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredModelRef {
    pub id: String,
    pub name: String,
}

/// A registered model version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersionRef {
    pub id: String,
    pub name: String,
}

/// An artifact attached to a model version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub model: RegisteredModelRef,
    pub version: ModelVersionRef,
    pub artifacts: Vec<ArtifactRef>,
}

/// Capabilities the registration logic needs from a model registry.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Build an access URI for an object-store path (`bucket/key`, no scheme).
    fn construct_storage_uri(&self, path: &str, storage_key: &str) -> Result<String>;

    /// Register a model that lives in a hub repo.
    async fn register_hub_model(&self, request: HubModelRegistration) -> Result<RegistrationResult>;

    /// Register a model backed by an artifact URI.
    async fn register_model(&self, request: ModelRegistration) -> Result<RegistrationResult>;
}
