use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use client_core::{
    Draft, DraftField, HttpRecordService, LocalRecordService, RecordService, ViewController,
};
use tokio::io::{self, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod shell;
mod ui;

use config::{load_settings, Settings, SETTINGS_FILE};
use ui::{render, RenderOptions};

#[derive(Parser, Debug)]
#[command(name = "listings", about = "List and add property listings")]
struct Cli {
    /// Listings backend base URL; overrides the settings file and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Keep records in this process instead of talking to a backend.
    #[arg(long, global = true)]
    local: bool,
    /// Show location, size and price columns.
    #[arg(long, global = true)]
    detailed: bool,
    #[arg(long, global = true, default_value = SETTINGS_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current property list.
    List,
    /// Create a property, then print the refreshed list.
    Add(AddArgs),
    /// Fill in and submit the form interactively.
    Shell,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    zip: String,
    #[arg(long, default_value = "")]
    location_code: String,
    #[arg(long, default_value = "")]
    size_sqft: String,
    #[arg(long, default_value = "")]
    base_price_usd: String,
}

impl AddArgs {
    fn into_draft(self) -> Draft {
        Draft::new()
            .with(DraftField::Address, self.address)
            .with(DraftField::City, self.city)
            .with(DraftField::Zip, self.zip)
            .with(DraftField::LocationCode, self.location_code)
            .with(DraftField::SizeSqft, self.size_sqft)
            .with(DraftField::BasePriceUsd, self.base_price_usd)
    }
}

impl Cli {
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(url) = &self.server_url {
            settings.server_url = url.clone();
        }
        if self.detailed {
            settings.detailed = true;
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_service(cli: &Cli, settings: &Settings) -> Result<Arc<dyn RecordService>> {
    if cli.local {
        info!("using in-process record service");
        return Ok(Arc::new(LocalRecordService::new()));
    }
    let service = HttpRecordService::new(&settings.server_url)?;
    info!(server_url = %service.base_url(), "using listings backend");
    Ok(Arc::new(service))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;
    cli.apply_overrides(&mut settings);
    init_tracing(&settings.log_filter);

    let controller = ViewController::new(build_service(&cli, &settings)?);
    let options = RenderOptions {
        detailed: settings.detailed,
    };

    // A refresh error after a successful create still exits cleanly; the new
    // id is printed next to the error.
    let succeeded = match cli.command.unwrap_or(Command::List) {
        Command::List => controller.refresh().await.is_ok(),
        Command::Add(args) => controller.submit(args.into_draft()).await.is_ok(),
        Command::Shell => {
            shell::run(
                &controller,
                options,
                BufReader::new(io::stdin()),
                io::stdout(),
            )
            .await?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    let state = controller.snapshot().await;
    let mut stdout = io::stdout();
    stdout.write_all(render(&state, options).as_bytes()).await?;
    stdout.flush().await?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
