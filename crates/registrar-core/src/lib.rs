//! Registrar Core - model registration logic and REST clients.
//!
//! Classifies model references (hub repo ids, object-store URIs, plain URLs
//! and local paths), assembles registration requests and sends them to a
//! model registry. Also contains a small client for triggering runs on a
//! hosted ML pipeline service.
//!
//! # Example
//!
//! ```rust,ignore
//! use registrar_core::{register, HttpRegistryClient, RegistrationInput, RegistrySettings};
//!
//! #[tokio::main]
//! async fn main() -> registrar_core::Result<()> {
//!     let client = HttpRegistryClient::new(RegistrySettings::new("my-token"))?;
//!
//!     let input = RegistrationInput::new("my-cool-model", "minio://mlpipeline/models/my-model.onnx")
//!         .with_storage_key("mlpipeline");
//!     let result = register(&client, &input).await?;
//!     println!("Registered version {}", result.version.id);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod network;
pub mod pipeline;
pub mod reference;
pub mod registration;
pub mod registry;

pub use config::{
    IamCredentials, NetworkConfig, PipelineConfig, PipelineSettings, RegistryConfig,
    RegistrySettings, StorageSettings,
};
pub use error::{RegistrarError, Result};
pub use pipeline::{PipelineClient, PipelineRequest, PipelineRun};
pub use reference::{classify, infer_format, resolve_storage_uri, ModelFormat, ReferenceKind};
pub use registration::{
    build_registration_request, parse_metadata, parse_metadata_strict, register, submit,
    RegistrationInput, RegistrationRequest,
};
pub use registry::{
    ArtifactRef, HttpRegistryClient, HubModelRegistration, Metadata, ModelRegistration,
    ModelVersionRef, RegisteredModelRef, RegistrationResult, RegistryClient,
};
