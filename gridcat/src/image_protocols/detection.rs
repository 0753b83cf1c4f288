// ABOUTME: Terminal capability detection for image protocol support
// ABOUTME: Determines which graphics protocols the current terminal understands

use super::ProtocolKind;
use crate::constants::{canonical_protocol, env as env_vars, protocols};
use std::env;

#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub supports_kitty_images: bool,
    pub supports_iterm2_images: bool,
    pub terminal_name: String,
    /// Set when GRIDCAT_FORCE_PROTOCOL decided the result
    pub forced: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        // Check for user override first
        if let Ok(forced_protocol) = env::var(env_vars::FORCE_PROTOCOL) {
            return Self::from_forced_protocol(&forced_protocol);
        }

        Self::detect_without_override()
    }

    /// Create capabilities from forced protocol override
    fn from_forced_protocol(protocol: &str) -> Self {
        let terminal_name = format!("forced-{}", protocol.trim().to_lowercase());
        let forced = |kitty, iterm2| Self {
            supports_kitty_images: kitty,
            supports_iterm2_images: iterm2,
            terminal_name: terminal_name.clone(),
            forced: true,
        };

        match canonical_protocol(protocol) {
            Some(protocols::KITTY) => forced(true, false),
            Some(protocols::ITERM2) => forced(false, true),
            Some(protocols::PLAIN) => forced(false, false),
            Some(protocols::AUTO) => Self::detect_without_override(),
            _ => {
                log::warn!(
                    "Unknown protocol '{}' in {}. Valid values: kitty, iterm2, plain",
                    protocol,
                    env_vars::FORCE_PROTOCOL
                );
                Self::detect_without_override()
            }
        }
    }

    /// Detect capabilities from the terminal environment alone
    fn detect_without_override() -> Self {
        let term_program = env::var("TERM_PROGRAM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        let wezterm_exe = env::var("WEZTERM_EXECUTABLE").ok();
        let kitty_window_id = env::var("KITTY_WINDOW_ID").ok();

        let capabilities = Self {
            supports_kitty_images: detect_kitty_support(
                &term_program,
                &term,
                &wezterm_exe,
                &kitty_window_id,
            ),
            supports_iterm2_images: detect_iterm2_support(&term_program, &term),
            terminal_name: determine_terminal_name(&term_program, &term),
            forced: false,
        };

        log::debug!("Detected terminal capabilities: {:?}", capabilities);
        capabilities
    }

    pub fn supports_inline_images(&self) -> bool {
        self.supports_kitty_images || self.supports_iterm2_images
    }

    pub fn preferred_protocol(&self) -> Option<ProtocolKind> {
        // Prefer Kitty for terminals that support both
        if self.supports_kitty_images {
            Some(ProtocolKind::Kitty)
        } else if self.supports_iterm2_images {
            Some(ProtocolKind::ITerm2)
        } else {
            None
        }
    }
}

fn detect_kitty_support(
    term_program: &str,
    term: &str,
    wezterm_exe: &Option<String>,
    kitty_window_id: &Option<String>,
) -> bool {
    if term_program == "kitty" || kitty_window_id.is_some() {
        return true;
    }

    if term_program == "WezTerm" || wezterm_exe.is_some() {
        return true;
    }

    if term_program == "ghostty" {
        return true;
    }

    term.contains("kitty") || term.contains("ghostty")
}

fn detect_iterm2_support(term_program: &str, term: &str) -> bool {
    if term_program == "iTerm.app" {
        return true;
    }

    if matches!(
        term_program,
        "WezTerm" | "mintty" | "Hyper" | "Warp" | "Tabby" | "Terminus"
    ) {
        return true;
    }

    term.contains("iterm")
}

fn determine_terminal_name(term_program: &str, term: &str) -> String {
    if !term_program.is_empty() {
        term_program.to_string()
    } else if !term.is_empty() {
        term.to_string()
    } else {
        "unknown".to_string()
    }
}
