// ABOUTME: Main entry point for the gridcat application
// ABOUTME: Discovers images, picks a graphics protocol, and renders a resize-aware grid

use anyhow::Result;
use clap::Parser;
use gridcat::cli::Cli;
use gridcat::cli_output::CliOutput;
use gridcat::config::Config;
use gridcat::image_protocols::{TerminalCapabilities, ThumbnailEncoder, select_protocol};
use gridcat::terminal::{CrosstermGeometry, spawn_resize_listener, stdout_is_terminal};
use gridcat_core::{Coordinator, GridError, Renderer, build_image_set, discover, resize_channel};
use std::io;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = CliOutput::new();
    if let Err(e) = run(cli, &output).await {
        output.report(&e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

async fn run(cli: Cli, output: &CliOutput) -> Result<()> {
    if cli.directory.is_none() {
        return Err(GridError::MissingDirectory.into());
    }

    let config = Config::load(cli.config.as_deref())?;
    let settings = cli.settings(&config)?;
    let Some(directory) = settings.directory.as_deref() else {
        return Err(GridError::MissingDirectory.into());
    };

    let paths = discover(directory, settings.discovery)?;
    log::debug!("Discovered {} images in {}", paths.len(), directory.display());

    let encoder = ThumbnailEncoder::new(settings.thumbnail_max_px);
    let images = build_image_set(&paths, &encoder, |e| {
        if settings.report_skipped {
            output.skipped(e);
        }
    })?;

    let is_terminal = stdout_is_terminal();
    let protocol = select_protocol(
        settings.protocol,
        &TerminalCapabilities::detect(),
        is_terminal,
    );
    log::debug!("Rendering {} images with the {} protocol", images.len(), protocol);

    let renderer = Renderer::new(io::stdout(), protocol.into_protocol());
    let geometry = CrosstermGeometry::new(settings.fallback);
    let mut coordinator = Coordinator::new(images, geometry, renderer);

    let (notifier, receiver) = resize_channel();
    if settings.watch.should_watch(is_terminal) {
        spawn_resize_listener(notifier)?;
    } else {
        notifier.close();
    }

    coordinator.run(&receiver).await?;
    Ok(())
}
