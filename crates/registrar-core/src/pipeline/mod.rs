//! Client for the hosted ML pipeline service.
//!
//! A run is three calls: an IAM login for an access token, pipeline
//! creation, then a trigger against the configured experiment.

mod types;

pub use types::{PipelineRequest, PipelineRun};
use types::{
    CreatePipelineBody, CreatePipelineResponse, LoginBody, LoginResponse, TriggerBody,
    TriggerResponse,
};

use crate::config::{PipelineConfig, PipelineSettings};
use crate::error::{RegistrarError, Result};
use crate::network::HttpClient;
use serde_json::Map;
use tracing::info;

/// Client for creating and triggering pipelines.
#[derive(Debug, Clone)]
pub struct PipelineClient {
    http: HttpClient,
    settings: PipelineSettings,
}

impl PipelineClient {
    /// Create a client. Fails if any IAM credential is missing.
    pub fn new(settings: PipelineSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            http: HttpClient::with_timeout(settings.timeout)?,
            settings,
        })
    }

    /// Log in and return an access token.
    pub async fn login(&self) -> Result<String> {
        let creds = &self.settings.credentials;
        let body = LoginBody {
            user_name: &creds.user_name,
            password: &creds.password,
            product_id: &creds.product_id,
            request_type: PipelineConfig::REQUEST_TYPE,
        };
        let response: LoginResponse = self.http.post_json(&self.settings.iam_url, &body).await?;
        if response.access_token.is_empty() {
            return Err(RegistrarError::missing_credential("IAM access token"));
        }
        Ok(response.access_token)
    }

    /// Create a pipeline and return its id.
    pub async fn create_pipeline(&self, token: &str, request: &PipelineRequest) -> Result<String> {
        let body = CreatePipelineBody {
            name: &request.pipeline_name,
            description: &request.pipeline_description,
            json_input: [&request.pipeline_json],
            pipeline_type: PipelineConfig::PIPELINE_TYPE,
        };
        let url = format!("{}/pipeline", self.service_url());
        let response: CreatePipelineResponse = self
            .http
            .post_json_with_bearer(&url, &body, Some(token))
            .await?;
        info!("Created pipeline {}", response.pipeline_id);
        Ok(response.pipeline_id)
    }

    /// Trigger a run of an existing pipeline and return the run id.
    pub async fn trigger_pipeline(&self, token: &str, pipeline_id: &str) -> Result<String> {
        let body = TriggerBody {
            pipeline_type: PipelineConfig::PIPELINE_TYPE,
            container_resources: Map::new(),
            experiment_id: &self.settings.experiment_id,
            enable_caching: true,
            parameters: Map::new(),
            version: 1,
        };
        let url = format!(
            "{}/pipeline/trigger/ml?pipelineId={}",
            self.service_url(),
            urlencoding::encode(pipeline_id)
        );
        let response: TriggerResponse = self
            .http
            .post_json_with_bearer(&url, &body, Some(token))
            .await?;
        info!("Triggered pipeline {} as run {}", pipeline_id, response.run_id);
        Ok(response.run_id)
    }

    /// Log in, create the pipeline and trigger it.
    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineRun> {
        if request.pipeline_name.trim().is_empty() {
            return Err(RegistrarError::Validation {
                field: "pipeline_name".into(),
                message: "must not be empty".into(),
            });
        }

        let token = self.login().await?;
        let pipeline_id = self.create_pipeline(&token, request).await?;
        let run_id = self.trigger_pipeline(&token, &pipeline_id).await?;
        Ok(PipelineRun {
            pipeline_id,
            run_id,
        })
    }

    fn service_url(&self) -> &str {
        self.settings.service_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IamCredentials;
    use axum::{
        extract::{Query, State},
        http::HeaderMap,
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<(String, Option<String>, Value)>>>;

    fn bearer(headers: &HeaderMap) -> Option<String> {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    async fn spawn_service(calls: Calls) -> String {
        let app = Router::new()
            .route(
                "/login",
                post(
                    |State(calls): State<Calls>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        calls.lock().unwrap().push(("login".into(), bearer(&headers), body));
                        Json(json!({"accessToken": "tok-1"}))
                    },
                ),
            )
            .route(
                "/svc/pipeline",
                post(
                    |State(calls): State<Calls>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        calls.lock().unwrap().push(("create".into(), bearer(&headers), body));
                        Json(json!({"pipelineId": "pipe-9"}))
                    },
                ),
            )
            .route(
                "/svc/pipeline/trigger/ml",
                post(
                    |State(calls): State<Calls>,
                     headers: HeaderMap,
                     Query(query): Query<HashMap<String, String>>,
                     Json(body): Json<Value>| async move {
                        let label = format!("trigger:{}", query.get("pipelineId").cloned().unwrap_or_default());
                        calls.lock().unwrap().push((label, bearer(&headers), body));
                        Json(json!({"runId": "run-3"}))
                    },
                ),
            )
            .with_state(calls);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn settings(base: &str) -> PipelineSettings {
        PipelineSettings {
            iam_url: format!("{base}/login"),
            service_url: format!("{base}/svc/"),
            experiment_id: "exp-1".into(),
            credentials: IamCredentials {
                user_name: "user".into(),
                password: "pass".into(),
                product_id: "prod".into(),
            },
            ..PipelineSettings::default()
        }
    }

    #[test]
    fn test_new_requires_credentials() {
        let err = PipelineClient::new(PipelineSettings::default()).unwrap_err();
        assert!(matches!(err, RegistrarError::MissingCredential { .. }));
    }

    #[tokio::test]
    async fn test_run_logs_in_creates_and_triggers() {
        let calls = Calls::default();
        let base = spawn_service(calls.clone()).await;
        let client = PipelineClient::new(settings(&base)).unwrap();

        let mut request = PipelineRequest::default();
        request.pipeline_json.insert("steps".into(), json!(["train"]));
        let run = client.run(&request).await.unwrap();

        assert_eq!(
            run,
            PipelineRun {
                pipeline_id: "pipe-9".into(),
                run_id: "run-3".into()
            }
        );

        let calls = calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 3);

        let (_, auth, login) = &calls[0];
        assert!(auth.is_none());
        assert_eq!(login["userName"], "user");
        assert_eq!(login["requestType"], "TENANT");

        let (_, auth, create) = &calls[1];
        assert_eq!(auth.as_deref(), Some("Bearer tok-1"));
        assert_eq!(create["name"], "piercing_jun23a");
        assert_eq!(create["jsonInput"], json!([{"steps": ["train"]}]));
        assert_eq!(create["pipelineType"], "ML");

        let (label, auth, trigger) = &calls[2];
        assert_eq!(label, "trigger:pipe-9");
        assert_eq!(auth.as_deref(), Some("Bearer tok-1"));
        assert_eq!(trigger["experimentId"], "exp-1");
        assert_eq!(trigger["enableCaching"], true);
        assert_eq!(trigger["version"], 1);
    }

    #[tokio::test]
    async fn test_run_rejects_blank_name_before_login() {
        let calls = Calls::default();
        let base = spawn_service(calls.clone()).await;
        let client = PipelineClient::new(settings(&base)).unwrap();

        let request = PipelineRequest {
            pipeline_name: " ".into(),
            ..PipelineRequest::default()
        };
        let err = client.run(&request).await.unwrap_err();
        assert!(matches!(err, RegistrarError::Validation { .. }));
        assert!(calls.lock().unwrap().is_empty());
    }
}
