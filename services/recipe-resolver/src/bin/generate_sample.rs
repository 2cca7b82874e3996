//! Calls the generation endpoint once and writes the envelope to
//! `output.json`. Useful for checking provider credentials and output shape.

use anyhow::Context;
use shared::config::Settings;
use shared::dto::ResolveResponse;
use shared::openai_client::GenerationClient;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_QUERY: &str = "Test recipe with unique ingredients and flavors";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if dotenv.is_err() {
        warn!("no .env file found, ensure environment variables are set");
    }

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_QUERY.to_string());
    let settings = Settings::new()?;
    let client = GenerationClient::from_settings(&settings)?;
    info!(provider = ?client.provider(), %query, "generating sample");

    let (primary, alternatives) = client
        .generate(&query)
        .await
        .context("error generating recipe")?
        .normalize();
    let response = ResolveResponse {
        primary_recipe: primary,
        alternative_recipes: alternatives,
    };

    let data = serde_json::to_string_pretty(&response)?;
    tokio::fs::write("output.json", data)
        .await
        .context("error writing output.json")?;
    println!("Output JSON written to output.json");
    Ok(())
}
