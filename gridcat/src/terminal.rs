// ABOUTME: Terminal adapters: live window geometry via crossterm and resize signal forwarding
// ABOUTME: Signal handlers only mark a re-render as owed; rendering happens on the coordinator loop

use anyhow::{Context, Result};
use gridcat_core::{GeometryProvider, GridError, ResizeNotifier, TerminalGeometry};
use std::io::IsTerminal;

/// Reads the window size from the controlling terminal on every call.
#[derive(Debug, Clone, Copy)]
pub struct CrosstermGeometry {
    fallback: TerminalGeometry,
}

impl CrosstermGeometry {
    pub fn new(fallback: TerminalGeometry) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> TerminalGeometry {
        self.fallback
    }
}

impl GeometryProvider for CrosstermGeometry {
    fn geometry(&self) -> Result<TerminalGeometry, GridError> {
        match crossterm::terminal::size() {
            Ok((columns, rows)) => {
                Ok(TerminalGeometry::new(columns, rows).or_fallback(self.fallback))
            }
            Err(e) => {
                log::debug!("Terminal size unavailable ({}), using {}", e, self.fallback);
                Ok(self.fallback)
            }
        }
    }
}

pub fn stdout_is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Forward window-change signals to `notifier`. Interrupt or terminate closes it.
#[cfg(unix)]
pub fn spawn_resize_listener(notifier: ResizeNotifier) -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    // Register every handler before the first render so no signal is missed
    let mut winch =
        signal(SignalKind::window_change()).context("Failed to listen for window size changes")?;
    let mut interrupt =
        signal(SignalKind::interrupt()).context("Failed to listen for interrupts")?;
    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to listen for termination")?;

    let resize_notifier = notifier.clone();
    tokio::spawn(async move {
        while winch.recv().await.is_some() {
            resize_notifier.notify();
        }
    });

    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.recv() => log::debug!("Interrupted, stopping resize watch"),
            _ = terminate.recv() => log::debug!("Terminated, stopping resize watch"),
        }
        notifier.close();
    });

    Ok(())
}

#[cfg(not(unix))]
pub fn spawn_resize_listener(notifier: ResizeNotifier) -> Result<()> {
    log::warn!("Resize notifications are not supported on this platform");
    notifier.close();
    Ok(())
}
