// ABOUTME: CLI argument definitions for gridcat and their merge with file configuration
// ABOUTME: Defines the command-line interface structure using clap derive macros

use crate::config::{Config, WatchMode};
use crate::image_protocols::ProtocolChoice;
use anyhow::Result;
use clap::Parser;
use gridcat_core::{DiscoveryOptions, TerminalGeometry};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gridcat")]
#[command(about = "Show a directory of images as a grid of inline terminal thumbnails", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory to scan for images
    pub directory: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Stop after this many images
    #[arg(short = 'n', long, value_name = "N")]
    pub max_images: Option<usize>,

    /// Graphics protocol: auto, kitty, iterm2 or plain
    #[arg(long, value_name = "PROTOCOL", value_parser = parse_protocol)]
    pub protocol: Option<ProtocolChoice>,

    /// Render once and exit instead of redrawing on resize
    #[arg(long)]
    pub once: bool,

    /// Enable verbose output for debugging and report skipped files
    #[arg(long, short)]
    pub verbose: bool,

    /// Additional config file, applied last
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

fn parse_protocol(value: &str) -> Result<ProtocolChoice, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

/// Effective options after applying flags over config
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub directory: Option<PathBuf>,
    pub discovery: DiscoveryOptions,
    pub protocol: ProtocolChoice,
    pub watch: WatchMode,
    pub thumbnail_max_px: u32,
    pub fallback: TerminalGeometry,
    pub report_skipped: bool,
}

impl Cli {
    pub fn settings(&self, config: &Config) -> Result<Settings> {
        let protocol = match (self.protocol, config.protocol.as_deref()) {
            (Some(choice), _) => choice,
            (None, Some(name)) => name.parse()?,
            (None, None) => ProtocolChoice::Auto,
        };

        let watch = if self.once {
            WatchMode::Never
        } else {
            config.watch_mode()
        };

        Ok(Settings {
            directory: self.directory.clone(),
            discovery: DiscoveryOptions::new(
                self.recursive || config.recursive.unwrap_or(false),
                self.max_images.or(config.max_images),
            ),
            protocol,
            watch,
            thumbnail_max_px: config.thumbnail_max_px(),
            fallback: TerminalGeometry::new(config.fallback_columns(), config.fallback_rows()),
            report_skipped: self.verbose || config.report_skipped.unwrap_or(false),
        })
    }
}
