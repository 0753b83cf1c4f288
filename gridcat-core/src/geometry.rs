// ABOUTME: Terminal geometry expressed in character cells and the provider seam
// ABOUTME: Providers are queried fresh for every render; nothing here is cached

use crate::error::GridError;
use std::fmt;

/// Terminal size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalGeometry {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalGeometry {
    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    /// Replace a zero-sized geometry with `fallback`.
    ///
    /// Some environments (pipes, CI) report 0x0; the layout engine needs at
    /// least one column to stay within its width bound.
    pub fn or_fallback(self, fallback: TerminalGeometry) -> Self {
        if self.is_empty() { fallback } else { self }
    }
}

impl fmt::Display for TerminalGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

/// Reports the current terminal size.
pub trait GeometryProvider {
    fn geometry(&self) -> Result<TerminalGeometry, GridError>;
}

/// A provider that always reports the same size.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeometry(pub TerminalGeometry);

impl GeometryProvider for FixedGeometry {
    fn geometry(&self) -> Result<TerminalGeometry, GridError> {
        Ok(self.0)
    }
}

impl<P: GeometryProvider + ?Sized> GeometryProvider for &P {
    fn geometry(&self) -> Result<TerminalGeometry, GridError> {
        (**self).geometry()
    }
}
