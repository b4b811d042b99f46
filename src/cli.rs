//! # secretctl
//!
//! Command-line client for the secret store HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! # List secrets in the default namespace
//! secretctl list
//!
//! # Create or replace a secret
//! secretctl create --name db-pass --namespace team-a --value hunter2
//!
//! # Create a secret from a binary file
//! secretctl create --name tls-key --namespace team-a --from-file ./key.pem
//!
//! # Remove a secret
//! secretctl delete --name db-pass --namespace team-a
//! ```

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Args, Parser, Subcommand};
use reqwest::{Method, RequestBuilder, Response};
use secret_store::constants::{DEFAULT_SECRET_STORE_URL, SECRETS_ROUTE};
use secret_store::secrets::SecretSummary;
use secret_store::server::ErrorResponse;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "secretctl")]
#[command(about = "Namespace secret store CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the secret store
    #[arg(long, global = true, env = "SECRET_STORE_URL", default_value = DEFAULT_SECRET_STORE_URL)]
    url: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List secret names in a namespace
    List {
        /// Namespace (server default when omitted)
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// Create or replace a secret
    Create(CreateArgs),
    /// Delete a secret
    Delete {
        /// Secret name
        #[arg(long)]
        name: String,

        /// Namespace (server default when omitted)
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

#[derive(Debug, Args)]
struct CreateArgs {
    /// Secret name
    #[arg(long)]
    name: String,

    /// Namespace (server default when omitted)
    #[arg(short, long)]
    namespace: Option<String>,

    /// Secret value as text
    #[arg(long, conflicts_with = "from_file", required_unless_present = "from_file")]
    value: Option<String>,

    /// Read the secret value from a file, sent as raw bytes
    #[arg(long)]
    from_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let endpoint = format!("{}{}", cli.url.trim_end_matches('/'), SECRETS_ROUTE);

    match cli.command {
        Commands::List { namespace } => list_secrets(&client, &endpoint, namespace.as_deref()).await,
        Commands::Create(args) => create_secret(&client, &endpoint, args).await,
        Commands::Delete { name, namespace } => {
            delete_secret(&client, &endpoint, &name, namespace.as_deref()).await
        }
    }
}

async fn list_secrets(client: &reqwest::Client, endpoint: &str, namespace: Option<&str>) -> Result<()> {
    let response = send(with_namespace(client.get(endpoint), namespace)).await?;
    let secrets: Vec<SecretSummary> = response
        .json()
        .await
        .context("Failed to decode secret listing")?;

    if secrets.is_empty() {
        println!("No secrets found.");
        return Ok(());
    }

    println!("{:<40} {:<30}", "NAME", "NAMESPACE");
    println!("{}", "-".repeat(70));
    for secret in &secrets {
        println!("{:<40} {:<30}", secret.name, secret.namespace);
    }
    Ok(())
}

async fn create_secret(client: &reqwest::Client, endpoint: &str, args: CreateArgs) -> Result<()> {
    let body = create_body(&args).await?;
    send(client.request(Method::POST, endpoint).json(&body)).await?;
    println!("Secret '{}' created", args.name);
    Ok(())
}

async fn create_body(args: &CreateArgs) -> Result<Value> {
    let mut body = json!({ "name": args.name });
    if let Some(namespace) = &args.namespace {
        body["namespace"] = json!(namespace);
    }
    match (&args.value, &args.from_file) {
        (_, Some(path)) => {
            let raw = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            body["rawValue"] = json!(STANDARD.encode(raw));
        }
        (Some(value), None) => body["value"] = json!(value),
        (None, None) => anyhow::bail!("Either --value or --from-file is required"),
    }
    Ok(body)
}

async fn delete_secret(
    client: &reqwest::Client,
    endpoint: &str,
    name: &str,
    namespace: Option<&str>,
) -> Result<()> {
    let mut body = json!({ "name": name });
    if let Some(namespace) = namespace {
        body["namespace"] = json!(namespace);
    }
    send(client.delete(endpoint).json(&body)).await?;
    println!("Secret '{name}' deleted");
    Ok(())
}

fn with_namespace(request: RequestBuilder, namespace: Option<&str>) -> RequestBuilder {
    match namespace {
        Some(namespace) => request.query(&[("namespace", namespace)]),
        None => request,
    }
}

/// Send a request, turning non-2xx responses into errors carrying the server message
async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await.context("Failed to reach secret store")?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(err) => anyhow::bail!("{} ({}): {}", status, err.error, err.message),
        Err(_) => anyhow::bail!("{status}: {text}"),
    }
}
