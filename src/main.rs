#![allow(non_snake_case)]

mod cli;

use std::env;
use std::sync::Arc;

use eventBooking::clients::api_client::ApiClient;
use eventBooking::config::AppConfig;
use eventBooking::service::token_store::TokenStore;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "warn";

#[tokio::main]
async fn main() {
    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            eprintln!("Ignoring config file {}: {}", path, err);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    };

    let filter = config
        .log_filter()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let token_file = config.token_file();
    let tokens = match TokenStore::open(&token_file) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::error!("Unable to open session file {}: {}", token_file, err);
            return;
        }
    };
    let api_base = config.api_base();
    tracing::debug!("using API at {}", api_base);
    let api = Arc::new(ApiClient::new(&api_base, tokens.clone()));

    cli::cli(api, tokens).await;
}
