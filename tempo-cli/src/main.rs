mod app;
mod cli;
mod config;
mod recorder_store;
mod test_data;
mod time_utils;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use config::TempoConfig;
use std::sync::Arc;
use tempo_events::{EventGateway, EventsURL, HttpEventGateway, InMemoryGateway};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = TempoConfig::load()?;
    let sort_order = cli.sort_order().unwrap_or(config.sort_order);
    let recorder_file = recorder_store::recorder_path(cli.dev)?;

    if cli.dev {
        tracing::info!("using in-memory events");
        let gateway = InMemoryGateway::new().with_events(test_data::dev_events());
        let app = App::new(
            Arc::new(gateway),
            &config.default_title,
            sort_order,
            recorder_file,
        );
        run(cli.command, &app).await
    } else {
        tracing::info!(api_url = %config.api_url, "using events backend");
        let gateway = HttpEventGateway::new(EventsURL::new(config.api_url.as_str()));
        let app = App::new(
            Arc::new(gateway),
            &config.default_title,
            sort_order,
            recorder_file,
        );
        run(cli.command, &app).await
    }
}

async fn run<G: EventGateway>(command: Commands, app: &App<G>) -> Result<()> {
    match command {
        Commands::List => {
            print!("{}", app.list().await?);
        }
        Commands::Start => match app.start()? {
            Some(_) => println!("{}", app.status()?),
            None => println!("Already recording. {}", app.status()?),
        },
        Commands::Stop => match app.stop().await? {
            Some(created) => println!("Saved #{} \"{}\"", created.id, created.title),
            None => println!("Recorder is not running"),
        },
        Commands::Status => {
            println!("{}", app.status()?);
        }
        Commands::Record => {
            println!("Recording, press Ctrl-C to stop");
            if let Some(created) = app.record().await? {
                println!("Saved #{} \"{}\"", created.id, created.title);
            }
        }
        Commands::Rename { id, title } => {
            let updated = app.rename(id, title).await?;
            println!("Renamed #{} to \"{}\"", updated.id, updated.title);
        }
        Commands::Delete { id } => {
            app.delete(id).await?;
            println!("Deleted #{}", id);
        }
        Commands::ConfigPath => {
            let path = TempoConfig::config_path()?;
            if !path.exists() {
                TempoConfig::default().save_to(&path)?;
            }
            println!("{}", path.display());
        }
    }

    Ok(())
}
