//! Centralized configuration for the registrar.
//!
//! Constant structs hold defaults and fixed protocol values. The `*Settings`
//! structs carry runtime values that front ends fill from flags or the
//! environment.

use crate::error::{RegistrarError, Result};
use std::time::Duration;

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const USER_AGENT: &'static str = "model-registrar/0.1";
}

/// Model registry defaults and API constants.
pub struct RegistryConfig;

impl RegistryConfig {
    pub const DEFAULT_SERVER_ADDRESS: &'static str =
        "http://model-registry-service.kubeflow.svc.cluster.local:8080";
    pub const API_PATH: &'static str = "api/model_registry/v1alpha3";
    pub const DEFAULT_AUTHOR: &'static str = "Anonymous";
    pub const DEFAULT_DESCRIPTION: &'static str = "No description provided";
    pub const DEFAULT_VERSION: &'static str = "1";
    pub const MODEL_FORMAT_VERSION: &'static str = "1";
    pub const DEFAULT_STORAGE_REGION: &'static str = "us-east-1";
    pub const HUB_BASE_URL: &'static str = "https://huggingface.co";
}

/// Pipeline service defaults.
pub struct PipelineConfig;

impl PipelineConfig {
    pub const DEFAULT_IAM_URL: &'static str =
        "https://ig.aidtaas.com/mobius-iam-service/v1.0/login";
    pub const DEFAULT_SERVICE_URL: &'static str = "https://ig.aidtaas.com/bob-service-test/v1.0";
    pub const DEFAULT_EXPERIMENT_ID: &'static str = "37e5cbe2-9fd7-4bc1-ad49-86d8a4a2c2e3";
    pub const DEFAULT_PIPELINE_NAME: &'static str = "piercing_jun23a";
    pub const DEFAULT_PIPELINE_DESCRIPTION: &'static str = "ML pipeline for piercing";
    pub const PIPELINE_TYPE: &'static str = "ML";
    pub const REQUEST_TYPE: &'static str = "TENANT";
}

/// Object-store settings used to turn bucket paths into access URIs.
#[derive(Debug, Clone, Default)]
pub struct StorageSettings {
    /// S3-compatible endpoint, e.g. `http://minio-service.kubeflow:9000`.
    pub endpoint: Option<String>,
    /// Region reported to the registry; defaults to `us-east-1`.
    pub region: Option<String>,
}

impl StorageSettings {
    pub fn region(&self) -> &str {
        self.region
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(RegistryConfig::DEFAULT_STORAGE_REGION)
    }
}

/// Connection settings for the model registry.
#[derive(Clone)]
pub struct RegistrySettings {
    pub server_address: String,
    pub author: String,
    pub user_token: Option<String>,
    pub storage: StorageSettings,
    pub timeout: Duration,
}

impl RegistrySettings {
    /// Settings pointing at the in-cluster registry with the given token.
    pub fn new(user_token: impl Into<String>) -> Self {
        Self {
            user_token: Some(user_token.into()),
            ..Self::default()
        }
    }

    /// Return the token, failing if it is absent or blank.
    pub fn require_token(&self) -> Result<&str> {
        self.user_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RegistrarError::missing_credential("user token"))
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            server_address: RegistryConfig::DEFAULT_SERVER_ADDRESS.to_string(),
            author: RegistryConfig::DEFAULT_AUTHOR.to_string(),
            user_token: None,
            storage: StorageSettings::default(),
            timeout: NetworkConfig::REQUEST_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for RegistrySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrySettings")
            .field("server_address", &self.server_address)
            .field("author", &self.author)
            .field("user_token", &"<redacted>")
            .field("storage", &self.storage)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// IAM login credentials for the pipeline service.
#[derive(Clone, Default)]
pub struct IamCredentials {
    pub user_name: String,
    pub password: String,
    pub product_id: String,
}

impl std::fmt::Debug for IamCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IamCredentials")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .field("product_id", &self.product_id)
            .finish()
    }
}

/// Endpoints and credentials for the hosted pipeline service.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub iam_url: String,
    pub service_url: String,
    pub experiment_id: String,
    pub credentials: IamCredentials,
    pub timeout: Duration,
}

impl PipelineSettings {
    /// Check that every login field is present.
    pub fn validate(&self) -> Result<()> {
        let creds = &self.credentials;
        for (field, value) in [
            ("IAM user name", &creds.user_name),
            ("IAM password", &creds.password),
            ("IAM product id", &creds.product_id),
        ] {
            if value.trim().is_empty() {
                return Err(RegistrarError::missing_credential(field));
            }
        }
        Ok(())
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            iam_url: PipelineConfig::DEFAULT_IAM_URL.to_string(),
            service_url: PipelineConfig::DEFAULT_SERVICE_URL.to_string(),
            experiment_id: PipelineConfig::DEFAULT_EXPERIMENT_ID.to_string(),
            credentials: IamCredentials::default(),
            timeout: NetworkConfig::REQUEST_TIMEOUT,
        }
    }
}
