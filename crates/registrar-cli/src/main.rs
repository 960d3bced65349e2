//! Registrar - model registration CLI and pipeline trigger service.
//!
//! `registrar register` classifies a model reference and records it in the
//! model registry. `registrar serve` exposes an HTTP endpoint that creates
//! and triggers runs on the hosted pipeline service.

mod handler;
mod register;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use registrar_core::{IamCredentials, PipelineClient, PipelineConfig, PipelineSettings};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "registrar")]
#[command(about = "Register ML models and trigger ML pipelines")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a model in the model registry
    Register(register::RegisterArgs),
    /// Serve the pipeline trigger endpoint
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// IAM login endpoint
    #[arg(long, env = "PIPELINE_IAM_URL", default_value = PipelineConfig::DEFAULT_IAM_URL)]
    iam_url: String,

    /// Pipeline service base URL
    #[arg(long, env = "PIPELINE_SERVICE_URL", default_value = PipelineConfig::DEFAULT_SERVICE_URL)]
    service_url: String,

    /// Experiment that triggered runs are filed under
    #[arg(long, env = "PIPELINE_EXPERIMENT_ID", default_value = PipelineConfig::DEFAULT_EXPERIMENT_ID)]
    experiment_id: String,

    /// IAM user name
    #[arg(long, env = "PIPELINE_IAM_USERNAME", default_value = "")]
    iam_username: String,

    /// IAM password
    #[arg(long, env = "PIPELINE_IAM_PASSWORD", default_value = "", hide_env_values = true)]
    iam_password: String,

    /// IAM product id
    #[arg(long, env = "PIPELINE_IAM_PRODUCT_ID", default_value = "")]
    iam_product_id: String,
}

impl ServeArgs {
    fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            iam_url: self.iam_url.clone(),
            service_url: self.service_url.clone(),
            experiment_id: self.experiment_id.clone(),
            credentials: IamCredentials {
                user_name: self.iam_username.clone(),
                password: self.iam_password.clone(),
                product_id: self.iam_product_id.clone(),
            },
            ..PipelineSettings::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries command output only
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match args.command {
        Command::Register(register_args) => register::run(register_args).await,
        Command::Serve(serve_args) => serve(serve_args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    info!("Starting pipeline trigger service");

    let pipeline = PipelineClient::new(args.pipeline_settings())?;
    let addr = server::start_server(pipeline, &args.host, args.port).await?;

    // Machine-readable port line for callers that bind to port 0
    println!("SERVER_PORT={}", addr.port());

    info!("Pipeline trigger service running on {}", addr);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
