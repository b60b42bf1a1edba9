#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use placebot_config::Config;
use placebot_dialog::DialogEngine;
use placebot_messenger::{MessengerClient, WebhookState};
use placebot_providers::{ApiAiClassifier, FoursquareProvider};
use placebot_session::SessionStore;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "placebot")]
#[command(about = "Venue-search chat assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server
    Serve {
        /// Listen port override
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config::load()?;
            info!("Loaded config from ~/placebot/config.json");

            let timeout = Duration::from_secs(config.search.request_timeout_secs);

            let mut classifier = ApiAiClassifier::new(
                config.nlu.access_token.clone(),
                config.nlu.lang.clone(),
                timeout,
            )?;
            if let Some(base_url) = config.nlu.base_url.clone() {
                classifier = classifier.with_base_url(base_url);
            }

            let mut places = FoursquareProvider::new(
                config.places.client_id.clone(),
                config.places.client_secret.clone(),
                timeout,
            )?;
            if let Some(base_url) = config.places.base_url.clone() {
                places = places.with_base_url(base_url);
            }

            let transport =
                MessengerClient::new(config.messenger.page_access_token.clone(), timeout)?;

            let engine = DialogEngine::new(Arc::new(SessionStore::new()), Arc::new(places));

            let state = Arc::new(WebhookState {
                engine,
                classifier: Arc::new(classifier),
                transport: Arc::new(transport),
                verify_token: config.messenger.verify_token.clone(),
                app_secret: config.messenger.app_secret.clone(),
            });

            let port = port.unwrap_or(config.server.port);
            placebot_messenger::serve(state, port).await?;
        }
        Commands::Init => {
            Config::create_config()?;
        }
        Commands::Version => {
            println!("placebot {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
