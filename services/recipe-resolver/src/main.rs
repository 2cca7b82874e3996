//! HTTP service resolving recipe queries.

use actix_web::{middleware::Logger, web, App, HttpServer};
use recipe_resolver::{corpus, resolver::Resolver, routes};
use shared::config::Settings;
use shared::openai_client::GenerationClient;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Err(e) = dotenv {
        warn!("no .env loaded ({e}); relying on process environment");
    }

    let settings = Settings::new()?;
    if settings.endpoint().is_none() {
        warn!("LLM_ENDPOINT not set; unmatched queries will get fallback recipes");
    }
    let generator = GenerationClient::from_settings(&settings)?;

    let corpus = corpus::corpus();
    info!(recipes = corpus.len(), "corpus loaded");
    let resolver = web::Data::new(Resolver::new(corpus, Arc::new(generator)));

    info!(bind = %settings.http_bind, port = settings.port(), "starting recipe-resolver");
    HttpServer::new(move || {
        App::new()
            .app_data(resolver.clone())
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind((settings.http_bind.as_str(), settings.port()))?
    .run()
    .await?;
    Ok(())
}
