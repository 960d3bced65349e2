//! REST client for a Kubeflow-style model registry.

use super::types::{
    custom_properties, CustomProperty, ModelArtifact, ModelArtifactCreate, ModelVersion,
    ModelVersionCreate, RegisteredModel, RegisteredModelCreate,
};
use super::{HubModelRegistration, ModelRegistration, RegistrationResult, RegistryClient};
use crate::config::{RegistryConfig, RegistrySettings, StorageSettings};
use crate::error::{RegistrarError, Result};
use crate::network::HttpClient;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, info};

const ARTIFACT_TYPE: &str = "model-artifact";

/// Artifact fields that differ between hub and storage-backed registrations.
struct ArtifactSpec<'a> {
    uri: &'a str,
    format: Option<&'a str>,
    storage_key: Option<&'a str>,
}

/// Model registry client speaking the registry's REST API.
pub struct HttpRegistryClient {
    http: HttpClient,
    /// `{server_address}/api/model_registry/v1alpha3`
    api_base: String,
    author: String,
    storage: StorageSettings,
}

impl std::fmt::Debug for HttpRegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRegistryClient")
            .field("api_base", &self.api_base)
            .field("author", &self.author)
            .field("storage", &self.storage)
            .finish()
    }
}

impl HttpRegistryClient {
    /// Create a client from connection settings.
    ///
    /// Fails with `MissingCredential` when no user token is configured, so
    /// no registration is attempted without one.
    pub fn new(settings: RegistrySettings) -> Result<Self> {
        let token = settings.require_token()?.to_string();

        let server = url::Url::parse(&settings.server_address).map_err(|e| {
            RegistrarError::Config {
                message: format!("Invalid registry address '{}': {}", settings.server_address, e),
            }
        })?;
        if !matches!(server.scheme(), "http" | "https") {
            return Err(RegistrarError::Config {
                message: format!("Unsupported registry scheme: {}", server.scheme()),
            });
        }

        let api_base = format!(
            "{}/{}",
            settings.server_address.trim_end_matches('/'),
            RegistryConfig::API_PATH
        );
        let author = if settings.author.trim().is_empty() {
            RegistryConfig::DEFAULT_AUTHOR.to_string()
        } else {
            settings.author
        };

        Ok(Self {
            http: HttpClient::with_timeout(settings.timeout)?.with_bearer(token),
            api_base,
            author,
            storage: settings.storage,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn find_model(&self, name: &str) -> Result<Option<RegisteredModel>> {
        let url = format!(
            "{}/registered_model?name={}",
            self.api_base,
            urlencoding::encode(name)
        );
        self.http.get_optional_json(&url).await
    }

    async fn find_or_create_model(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<RegisteredModel> {
        if let Some(model) = self.find_model(name).await? {
            debug!("Reusing registered model {} ({})", model.name, model.id);
            return Ok(model);
        }

        let body = RegisteredModelCreate {
            name,
            owner: &self.author,
            description,
        };
        let model: RegisteredModel = self
            .http
            .post_json(&format!("{}/registered_models", self.api_base), &body)
            .await?;
        info!("Created registered model {} ({})", model.name, model.id);
        Ok(model)
    }

    async fn register(
        &self,
        name: &str,
        version: &str,
        description: Option<&str>,
        properties: BTreeMap<String, CustomProperty>,
        artifact: ArtifactSpec<'_>,
    ) -> Result<RegistrationResult> {
        let model = self.find_or_create_model(name, description).await?;

        let version_body = ModelVersionCreate {
            name: version,
            author: &self.author,
            registered_model_id: &model.id,
            description,
            custom_properties: properties,
        };
        let model_version: ModelVersion = self
            .http
            .post_json(
                &format!("{}/registered_models/{}/versions", self.api_base, model.id),
                &version_body,
            )
            .await?;

        let artifact_body = ModelArtifactCreate {
            artifact_type: ARTIFACT_TYPE,
            name,
            uri: artifact.uri,
            description,
            model_format_name: artifact.format,
            model_format_version: artifact.format.map(|_| RegistryConfig::MODEL_FORMAT_VERSION),
            storage_key: artifact.storage_key,
        };
        let model_artifact: ModelArtifact = self
            .http
            .post_json(
                &format!("{}/model_versions/{}/artifacts", self.api_base, model_version.id),
                &artifact_body,
            )
            .await?;

        info!(
            "Registered {} version {} (artifact {})",
            model.name, model_version.name, model_artifact.id
        );

        Ok(RegistrationResult {
            model: model.into(),
            version: model_version.into(),
            artifacts: vec![model_artifact.into()],
        })
    }
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    fn construct_storage_uri(&self, path: &str, storage_key: &str) -> Result<String> {
        let endpoint = self
            .storage
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| RegistrarError::Config {
                message: "Storage endpoint is required to resolve storage URIs".into(),
            })?;

        Ok(format!(
            "s3://{}/{}?endpoint={}&defaultRegion={}",
            storage_key,
            path,
            endpoint,
            self.storage.region()
        ))
    }

    async fn register_hub_model(&self, request: HubModelRegistration) -> Result<RegistrationResult> {
        let uri = format!("{}/{}", RegistryConfig::HUB_BASE_URL, request.repo_id);

        let mut properties = custom_properties(&request.metadata);
        properties.insert(
            "_registered_from".to_string(),
            CustomProperty::string("huggingface"),
        );
        properties.insert("repo_id".to_string(), CustomProperty::string(&request.repo_id));

        self.register(
            &request.name,
            &request.version,
            request.description.as_deref(),
            properties,
            ArtifactSpec {
                uri: &uri,
                format: None,
                storage_key: None,
            },
        )
        .await
    }

    async fn register_model(&self, request: ModelRegistration) -> Result<RegistrationResult> {
        self.register(
            &request.name,
            &request.version,
            request.description.as_deref(),
            custom_properties(&request.metadata),
            ArtifactSpec {
                uri: &request.uri,
                format: Some(&request.format),
                storage_key: request.storage_key.as_deref(),
            },
        )
        .await
    }
}
