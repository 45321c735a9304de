use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use flagged_orders::cli::{Cli, ListKind};
use flagged_orders::config::{load_config, AppConfig};
use flagged_orders::domain::entities::highlight::describe_tag;
use flagged_orders::usecase::services::extract_service::{ExtractRequest, ExtractService};

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    let config = cli.apply(config);

    if cli.file_path.is_none() && cli.list.is_none() {
        return launch_desktop();
    }

    let input = cli.input()?.clone();
    let service = ExtractService::default();

    match cli.list {
        Some(ListKind::Headers) => {
            let labels = service
                .headers(&input)
                .with_context(|| format!("failed to read headers of {}", input.display()))?;
            for (idx, label) in labels.iter().enumerate() {
                println!("{idx}: {label}");
            }
        }
        Some(ListKind::Colors) => list_colors(&service, &config, &input)?,
        None => {
            let request = ExtractRequest {
                input,
                output: Cli::output_path(&config),
                options: config.options(),
            };
            let report = service.run(&request)?;
            println!("{}", report.summary());
        }
    }
    Ok(())
}

fn list_colors(service: &ExtractService, config: &AppConfig, input: &Path) -> Result<()> {
    let column = config.layout().select_marker;
    let census = service
        .marker_census(input, &column)
        .with_context(|| format!("failed to read fills of {}", input.display()))?;
    if census.is_empty() {
        println!("no filled cells in marker column {column}");
    }
    for (tag, count) in census {
        println!("{}: {count}", describe_tag(&tag));
    }
    Ok(())
}

#[cfg(feature = "desktop")]
fn launch_desktop() -> Result<()> {
    let webview_data_dir = flagged_orders::platform::desktop::data_dir::default_webview_data_dir()?;

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Flagged Orders"))
                .with_data_directory(webview_data_dir),
        )
        .launch(flagged_orders::app::App);
    Ok(())
}

#[cfg(not(feature = "desktop"))]
fn launch_desktop() -> Result<()> {
    anyhow::bail!("an input .xlsx file is required (built without the desktop app)")
}
