//! Wire types for the model registry REST API.

use super::{ArtifactRef, Metadata, ModelVersionRef, RegisteredModelRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Typed custom property value as the registry stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metadataType")]
pub enum CustomProperty {
    MetadataStringValue { string_value: String },
    /// Integers travel as decimal strings.
    MetadataIntValue { int_value: String },
    MetadataDoubleValue { double_value: f64 },
    MetadataBoolValue { bool_value: bool },
}

impl CustomProperty {
    /// Map a JSON value to a property. Null maps to nothing; arrays and
    /// objects are kept as their JSON text.
    pub fn from_value(value: &Value) -> Option<Self> {
        let property = match value {
            Value::Null => return None,
            Value::Bool(b) => CustomProperty::MetadataBoolValue { bool_value: *b },
            Value::Number(n) if n.is_i64() || n.is_u64() => CustomProperty::MetadataIntValue {
                int_value: n.to_string(),
            },
            Value::Number(n) => CustomProperty::MetadataDoubleValue {
                double_value: n.as_f64().unwrap_or_default(),
            },
            Value::String(s) => CustomProperty::MetadataStringValue {
                string_value: s.clone(),
            },
            other => CustomProperty::MetadataStringValue {
                string_value: other.to_string(),
            },
        };
        Some(property)
    }

    pub fn string(value: impl Into<String>) -> Self {
        CustomProperty::MetadataStringValue {
            string_value: value.into(),
        }
    }
}

/// Convert registration metadata into registry custom properties.
pub fn custom_properties(metadata: &Metadata) -> BTreeMap<String, CustomProperty> {
    metadata
        .iter()
        .filter_map(|(key, value)| CustomProperty::from_value(value).map(|p| (key.clone(), p)))
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RegisteredModelCreate<'a> {
    pub name: &'a str,
    pub owner: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RegisteredModel {
    pub id: String,
    pub name: String,
}

impl From<RegisteredModel> for RegisteredModelRef {
    fn from(model: RegisteredModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ModelVersionCreate<'a> {
    pub name: &'a str,
    pub author: &'a str,
    pub registered_model_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_properties: BTreeMap<String, CustomProperty>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ModelVersion {
    pub id: String,
    pub name: String,
}

impl From<ModelVersion> for ModelVersionRef {
    fn from(version: ModelVersion) -> Self {
        Self {
            id: version.id,
            name: version.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ModelArtifactCreate<'a> {
    pub artifact_type: &'static str,
    pub name: &'a str,
    pub uri: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_format_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_format_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ModelArtifact {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub model_format_name: Option<String>,
}

impl From<ModelArtifact> for ArtifactRef {
    fn from(artifact: ModelArtifact) -> Self {
        Self {
            id: artifact.id,
            name: artifact.name.unwrap_or_default(),
            uri: artifact.uri.unwrap_or_default(),
            format: artifact.model_format_name,
        }
    }
}
