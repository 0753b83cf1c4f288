// ABOUTME: Terminal graphics protocols for inline thumbnails and protocol selection
// ABOUTME: Maps detected capabilities and user choices onto gridcat-core's ImageProtocol

use crate::constants::{canonical_protocol, protocols};
use anyhow::{Result, anyhow};
use gridcat_core::{ImageProtocol, PlainProtocol};
use std::fmt;
use std::str::FromStr;

pub mod detection;
pub mod iterm2;
pub mod kitty;
pub mod scaling;

pub use detection::TerminalCapabilities;
pub use iterm2::ITerm2Protocol;
pub use kitty::KittyProtocol;
pub use scaling::ThumbnailEncoder;

/// A concrete protocol the renderer can write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolKind {
    Kitty,
    ITerm2,
    Plain,
}

impl ProtocolKind {
    pub fn name(self) -> &'static str {
        match self {
            ProtocolKind::Kitty => protocols::KITTY,
            ProtocolKind::ITerm2 => protocols::ITERM2,
            ProtocolKind::Plain => protocols::PLAIN,
        }
    }

    pub fn into_protocol(self) -> Box<dyn ImageProtocol> {
        match self {
            ProtocolKind::Kitty => Box::new(KittyProtocol),
            ProtocolKind::ITerm2 => Box::new(ITerm2Protocol),
            ProtocolKind::Plain => Box::new(PlainProtocol),
        }
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the user asked for: a specific protocol or detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolChoice {
    #[default]
    Auto,
    Fixed(ProtocolKind),
}

impl FromStr for ProtocolChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match canonical_protocol(s) {
            Some(protocols::AUTO) => Ok(ProtocolChoice::Auto),
            Some(protocols::KITTY) => Ok(ProtocolChoice::Fixed(ProtocolKind::Kitty)),
            Some(protocols::ITERM2) => Ok(ProtocolChoice::Fixed(ProtocolKind::ITerm2)),
            Some(protocols::PLAIN) => Ok(ProtocolChoice::Fixed(ProtocolKind::Plain)),
            _ => Err(anyhow!(
                "Unknown protocol '{}'. Valid values: {}",
                s,
                protocols::ALL.join(", ")
            )),
        }
    }
}

/// Pick the protocol to render with.
///
/// An explicit choice always wins. Detection honors a forced override; otherwise
/// graphics are only used when stdout is a terminal that supports them.
pub fn select_protocol(
    choice: ProtocolChoice,
    capabilities: &TerminalCapabilities,
    stdout_is_terminal: bool,
) -> ProtocolKind {
    match choice {
        ProtocolChoice::Fixed(kind) => kind,
        ProtocolChoice::Auto if !stdout_is_terminal && !capabilities.forced => ProtocolKind::Plain,
        ProtocolChoice::Auto => capabilities
            .preferred_protocol()
            .unwrap_or(ProtocolKind::Plain),
    }
}
