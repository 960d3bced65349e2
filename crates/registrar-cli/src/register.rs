//! `registrar register` command.

use anyhow::{Context, Result};
use clap::Args;
use registrar_core::{
    parse_metadata, register, HttpRegistryClient, RegistrationInput, RegistrationResult,
    RegistryConfig, RegistrySettings, StorageSettings,
};
use tracing::info;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Name of the registered model
    #[arg(long, alias = "model_name")]
    pub model_name: String,

    /// Hub repo id, s3:// or minio:// URI, URL or local path
    #[arg(long, alias = "uri_or_repo")]
    pub uri_or_repo: String,

    /// Registry access token
    #[arg(long, alias = "user_token", env = "MODEL_REGISTRY_TOKEN", hide_env_values = true)]
    pub user_token: Option<String>,

    /// Author recorded on the model version
    #[arg(long, default_value = "")]
    pub author: String,

    /// Storage key (bucket) used to resolve storage URIs
    #[arg(long, alias = "storage_key", default_value = "")]
    pub storage_key: String,

    /// Model format; inferred from the file extension when empty
    #[arg(long, alias = "model_format", default_value = "")]
    pub model_format: String,

    #[arg(long, default_value = RegistryConfig::DEFAULT_DESCRIPTION)]
    pub description: String,

    #[arg(long, default_value = RegistryConfig::DEFAULT_VERSION)]
    pub version: String,

    /// Metadata as a JSON object
    #[arg(long, default_value = "{}")]
    pub metadata: String,

    /// Model registry address
    #[arg(
        long,
        alias = "registry_url",
        env = "MODEL_REGISTRY_URL",
        default_value = RegistryConfig::DEFAULT_SERVER_ADDRESS
    )]
    pub registry_url: String,

    /// S3-compatible endpoint used when resolving storage URIs
    #[arg(long, env = "AWS_S3_ENDPOINT")]
    pub storage_endpoint: Option<String>,

    /// Region reported with resolved storage URIs
    #[arg(long, env = "AWS_DEFAULT_REGION")]
    pub storage_region: Option<String>,
}

impl RegisterArgs {
    fn settings(&self) -> RegistrySettings {
        RegistrySettings {
            server_address: self.registry_url.clone(),
            author: self.author.clone(),
            user_token: self.user_token.clone(),
            storage: StorageSettings {
                endpoint: self.storage_endpoint.clone(),
                region: self.storage_region.clone(),
            },
            ..RegistrySettings::default()
        }
    }

    fn input(&self) -> RegistrationInput {
        RegistrationInput::new(&self.model_name, &self.uri_or_repo)
            .with_format(&self.model_format)
            .with_storage_key(&self.storage_key)
            .with_description(&self.description)
            .with_version(&self.version)
            .with_metadata(parse_metadata(&self.metadata))
    }
}

pub async fn run(args: RegisterArgs) -> Result<()> {
    let client = HttpRegistryClient::new(args.settings())?;
    info!("Registering {} from {}", args.model_name, args.uri_or_repo);

    let result = register(&client, &args.input())
        .await
        .with_context(|| format!("Failed to register model '{}'", args.model_name))?;

    print_result(&result)?;
    Ok(())
}

fn print_result(result: &RegistrationResult) -> Result<()> {
    println!("Model: {}", serde_json::to_string(&result.model)?);
    println!("Model Version: {}", serde_json::to_string(&result.version)?);
    println!("Model Artifacts: {}", serde_json::to_string(&result.artifacts)?);
    Ok(())
}
