//! Request and response types for the hosted pipeline service.

use crate::config::PipelineConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pipeline definition submitted by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRequest {
    pub pipeline_name: String,
    pub pipeline_description: String,
    pub pipeline_json: Map<String, Value>,
}

impl Default for PipelineRequest {
    fn default() -> Self {
        Self {
            pipeline_name: PipelineConfig::DEFAULT_PIPELINE_NAME.to_string(),
            pipeline_description: PipelineConfig::DEFAULT_PIPELINE_DESCRIPTION.to_string(),
            pipeline_json: Map::new(),
        }
    }
}

/// Identifiers of a created and triggered pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub pipeline_id: String,
    pub run_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LoginBody<'a> {
    pub user_name: &'a str,
    pub password: &'a str,
    pub product_id: &'a str,
    pub request_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreatePipelineBody<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub json_input: [&'a Map<String, Value>; 1],
    pub pipeline_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreatePipelineResponse {
    pub pipeline_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TriggerBody<'a> {
    pub pipeline_type: &'static str,
    pub container_resources: Map<String, Value>,
    pub experiment_id: &'a str,
    pub enable_caching: bool,
    pub parameters: Map<String, Value>,
    pub version: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TriggerResponse {
    pub run_id: String,
}
