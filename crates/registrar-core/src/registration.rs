//! Registration request assembly.
//!
//! Turns a model name, a raw reference and optional hints into a
//! [`RegistrationRequest`], then hands it to a [`RegistryClient`].
//! Unknown formats are a hard failure: a format hint is required whenever
//! the reference has no recognized extension.

use crate::config::RegistryConfig;
use crate::error::{RegistrarError, Result};
use crate::reference::{classify, infer_format, resolve_storage_uri, ReferenceKind};
use crate::registry::{
    HubModelRegistration, Metadata, ModelRegistration, RegistrationResult, RegistryClient,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Caller input for one registration attempt.
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub name: String,
    /// Hub repo id, storage URI, URL or local path.
    pub reference: String,
    pub format: Option<String>,
    pub description: Option<String>,
    pub version: String,
    pub storage_key: Option<String>,
    pub metadata: Metadata,
}

impl RegistrationInput {
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            format: None,
            description: None,
            version: RegistryConfig::DEFAULT_VERSION.to_string(),
            storage_key: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = Some(storage_key.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A fully assembled registration, ready for the registry client.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationRequest {
    Hub(HubModelRegistration),
    Model(ModelRegistration),
}

/// Treat empty or whitespace-only strings as absent.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Build the request for one registration.
///
/// Hub repo references skip format inference and storage resolution; the
/// reference becomes the repo id verbatim. Everything else needs a format
/// (hint or extension) and storage URIs additionally need a storage key.
pub fn build_registration_request<C>(
    client: &C,
    input: &RegistrationInput,
) -> Result<RegistrationRequest>
where
    C: RegistryClient + ?Sized,
{
    if input.name.trim().is_empty() {
        return Err(RegistrarError::Validation {
            field: "model_name".into(),
            message: "must not be empty".into(),
        });
    }
    if input.reference.trim().is_empty() {
        return Err(RegistrarError::Validation {
            field: "uri_or_repo".into(),
            message: "must not be empty".into(),
        });
    }

    let kind = classify(&input.reference);
    debug!("Classified '{}' as {:?}", input.reference, kind);

    if kind == ReferenceKind::HubRepo {
        return Ok(RegistrationRequest::Hub(HubModelRegistration {
            name: input.name.clone(),
            repo_id: input.reference.clone(),
            description: input.description.clone(),
            version: input.version.clone(),
            metadata: input.metadata.clone(),
        }));
    }

    let format = match non_blank(&input.format) {
        Some(hint) => hint.to_string(),
        None => {
            let inferred = infer_format(&input.reference);
            if !inferred.is_known() {
                return Err(RegistrarError::UnresolvableFormat {
                    reference: input.reference.clone(),
                });
            }
            inferred.as_str().to_string()
        }
    };

    let storage_key = non_blank(&input.storage_key);
    let uri = match kind {
        ReferenceKind::StorageUri => resolve_storage_uri(client, &input.reference, storage_key)?,
        _ => input.reference.clone(),
    };

    Ok(RegistrationRequest::Model(ModelRegistration {
        name: input.name.clone(),
        uri,
        format,
        description: input.description.clone(),
        version: input.version.clone(),
        storage_key: storage_key.map(str::to_string),
        metadata: input.metadata.clone(),
    }))
}

/// Send a built request to the registry.
pub async fn submit<C>(client: &C, request: RegistrationRequest) -> Result<RegistrationResult>
where
    C: RegistryClient + ?Sized,
{
    match request {
        RegistrationRequest::Hub(hub) => client.register_hub_model(hub).await,
        RegistrationRequest::Model(model) => client.register_model(model).await,
    }
}

/// Build and submit in one step.
pub async fn register<C>(client: &C, input: &RegistrationInput) -> Result<RegistrationResult>
where
    C: RegistryClient + ?Sized,
{
    let request = build_registration_request(client, input)?;
    submit(client, request).await
}

/// Parse caller metadata, failing on anything but a JSON object.
///
/// Empty input is an empty mapping.
pub fn parse_metadata_strict(text: &str) -> Result<Metadata> {
    if text.trim().is_empty() {
        return Ok(Metadata::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(RegistrarError::MalformedMetadata {
            message: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(e) => Err(RegistrarError::MalformedMetadata {
            message: e.to_string(),
        }),
    }
}

/// Parse caller metadata, degrading to an empty mapping on bad input.
pub fn parse_metadata(text: &str) -> Metadata {
    parse_metadata_strict(text).unwrap_or_else(|e| {
        warn!("Ignoring metadata: {}", e);
        Metadata::new()
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::testing::RecordingClient;
    use serde_json::json;

    fn model_request(request: RegistrationRequest) -> ModelRegistration {
        match request {
            RegistrationRequest::Model(model) => model,
            other => panic!("expected a model request, got {other:?}"),
        }
    }

    #[test]
    fn test_hub_reference_is_verbatim_and_ignores_hints() {
        let client = RecordingClient::default();
        let input = RegistrationInput::new("bert", "org/model-name")
            .with_format("onnx")
            .with_storage_key("bucket")
            .with_version("4");

        let request = build_registration_request(&client, &input).unwrap();
        assert_eq!(
            request,
            RegistrationRequest::Hub(HubModelRegistration {
                name: "bert".into(),
                repo_id: "org/model-name".into(),
                description: None,
                version: "4".into(),
                metadata: Metadata::new(),
            })
        );
        assert!(client.storage_calls().is_empty());
    }

    #[test]
    fn test_hub_reference_skips_format_inference() {
        let client = RecordingClient::default();
        let input = RegistrationInput::new("bert", "bert-base-uncased/config");

        // No extension and no hint would fail for any other kind of reference.
        let request = build_registration_request(&client, &input).unwrap();
        assert!(matches!(request, RegistrationRequest::Hub(_)));
    }

    #[test]
    fn test_minio_reference_is_resolved() {
        let client = RecordingClient::default();
        let input = RegistrationInput::new("my-cool-model", "minio://mlpipeline/models/my-model.onnx")
            .with_storage_key("mlpipeline");

        let model = model_request(build_registration_request(&client, &input).unwrap());
        assert_eq!(model.format, "onnx");
        assert_eq!(model.uri, "resolved://mlpipeline/mlpipeline/models/my-model.onnx");
        assert_eq!(model.storage_key.as_deref(), Some("mlpipeline"));
        assert_eq!(
            client.storage_calls(),
            vec![(
                "mlpipeline/models/my-model.onnx".to_string(),
                "mlpipeline".to_string()
            )]
        );
    }

    #[test]
    fn test_storage_reference_without_key_fails() {
        let client = RecordingClient::default();
        let input = RegistrationInput::new("m", "s3://bucket/model.pkl").with_storage_key("");

        let err = build_registration_request(&client, &input).unwrap_err();
        assert!(matches!(err, RegistrarError::MissingStorageKey { .. }));
    }

    #[test]
    fn test_unknown_format_is_a_hard_failure() {
        let client = RecordingClient::default();
        let input = RegistrationInput::new("m", "model.xyz");

        let err = build_registration_request(&client, &input).unwrap_err();
        assert!(matches!(
            err,
            RegistrarError::UnresolvableFormat { ref reference } if reference == "model.xyz"
        ));
    }

    #[test]
    fn test_trailing_slash_storage_reference_has_no_format() {
        let client = RecordingClient::default();
        let input = RegistrationInput::new("m", "s3://b/model.onnx/").with_storage_key("b");

        let err = build_registration_request(&client, &input).unwrap_err();
        assert!(matches!(err, RegistrarError::UnresolvableFormat { .. }));
        assert!(client.storage_calls().is_empty());
    }

    #[test]
    fn test_format_hint_wins_over_extension() {
        let client = RecordingClient::default();
        let input = RegistrationInput::new("m", "model.xyz").with_format("tensorflow");

        let model = model_request(build_registration_request(&client, &input).unwrap());
        assert_eq!(model.format, "tensorflow");
        assert_eq!(model.uri, "model.xyz");
    }

    #[test]
    fn test_blank_format_hint_falls_back_to_inference() {
        let client = RecordingClient::default();
        let input = RegistrationInput::new("m", "https://host/files/model.H5").with_format("  ");

        let model = model_request(build_registration_request(&client, &input).unwrap());
        assert_eq!(model.format, "keras");
        assert_eq!(model.uri, "https://host/files/model.H5");
        assert!(client.storage_calls().is_empty());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let client = RecordingClient::default();
        let err = build_registration_request(&client, &RegistrationInput::new(" ", "m.pt"))
            .unwrap_err();
        assert!(matches!(err, RegistrarError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_dispatches_by_kind() {
        let client = RecordingClient::default();

        let hub = register(&client, &RegistrationInput::new("bert", "org/bert"))
            .await
            .unwrap();
        assert_eq!(hub.artifacts[0].uri, "org/bert");

        let local = register(&client, &RegistrationInput::new("local", "/models/model.joblib"))
            .await
            .unwrap();
        assert_eq!(local.artifacts[0].format.as_deref(), Some("sklearn"));

        assert_eq!(client.hub_calls().len(), 1);
        assert_eq!(client.model_calls().len(), 1);
        assert_eq!(client.model_calls()[0].uri, "/models/model.joblib");
    }

    #[test]
    fn test_parse_metadata() {
        let metadata = parse_metadata(r#"{"task": "classification", "epochs": 3}"#);
        assert_eq!(metadata.get("task"), Some(&json!("classification")));
        assert_eq!(metadata.get("epochs"), Some(&json!(3)));

        assert!(parse_metadata("").is_empty());
        assert!(parse_metadata("{not json").is_empty());
        assert!(parse_metadata("[1, 2]").is_empty());
    }

    #[test]
    fn test_parse_metadata_strict_reports_shape() {
        let err = parse_metadata_strict("\"text\"").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed metadata: expected a JSON object, got a string"
        );
    }
}
