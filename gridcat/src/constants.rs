// ABOUTME: Centralized constants for the gridcat application
// ABOUTME: Contains defaults, config file locations, protocol names and aliases

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Defaults applied when neither flags nor config set a value
pub mod defaults {
    /// Longest thumbnail edge in pixels before encoding
    pub const THUMBNAIL_MAX_PX: u32 = 512;

    /// Geometry used when the terminal size cannot be read
    pub const FALLBACK_COLUMNS: u16 = 80;
    pub const FALLBACK_ROWS: u16 = 24;
}

/// Config file names and directories
pub mod config_files {
    pub const APP_DIR: &str = "gridcat";
    pub const FILE_NAME: &str = "config.toml";
    pub const PROJECT_FILE: &str = "gridcat.toml";
}

pub mod env {
    /// Overrides terminal protocol detection
    pub const FORCE_PROTOCOL: &str = "GRIDCAT_FORCE_PROTOCOL";
}

/// Graphics protocol names
pub mod protocols {
    pub const AUTO: &str = "auto";
    pub const KITTY: &str = "kitty";
    pub const ITERM2: &str = "iterm2";
    pub const PLAIN: &str = "plain";

    pub const ALL: &[&str] = &[AUTO, KITTY, ITERM2, PLAIN];

    /// Kitty graphics payload chunk size (a multiple of 4)
    pub const KITTY_CHUNK_SIZE: usize = 4096;
}

/// Alternate spellings accepted for protocol names in config and env
pub static PROTOCOL_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("auto", protocols::AUTO);
    m.insert("detect", protocols::AUTO);
    m.insert("kitty", protocols::KITTY);
    m.insert("ghostty", protocols::KITTY);
    m.insert("iterm2", protocols::ITERM2);
    m.insert("iterm", protocols::ITERM2);
    m.insert("plain", protocols::PLAIN);
    m.insert("text", protocols::PLAIN);
    m.insert("none", protocols::PLAIN);
    m.insert("disable", protocols::PLAIN);
    m.insert("disabled", protocols::PLAIN);
    m
});

/// Resolve a protocol name or alias, case-insensitively
pub fn canonical_protocol(name: &str) -> Option<&'static str> {
    PROTOCOL_ALIASES
        .get(name.trim().to_lowercase().as_str())
        .copied()
}
