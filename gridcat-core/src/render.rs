// ABOUTME: Composes a grid layout and encoded payloads into terminal output
// ABOUTME: Protocol escapes are pluggable; the plain data-URI protocol is the universal fallback

use crate::encoder::{ImageEntry, ImageSet};
use crate::error::GridError;
use crate::layout::GridLayout;
use base64::{Engine, engine::general_purpose::STANDARD};
use crossterm::cursor::{MoveDown, MoveTo, MoveToColumn, MoveUp, RestorePosition, SavePosition};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::io::Write;

pub const NO_IMAGES_MESSAGE: &str = "No images found";

/// Size of one grid cell in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u16,
    pub height: u16,
}

impl From<&GridLayout> for CellSize {
    fn from(layout: &GridLayout) -> Self {
        Self {
            width: layout.cell_width,
            height: layout.cell_height,
        }
    }
}

pub trait ImageProtocol {
    /// Short protocol name used in logs and config.
    fn name(&self) -> &'static str;

    /// Wrap an image payload in the protocol's escape sequence, sized to `cell`.
    fn render_image(&self, image: &ImageEntry, cell: CellSize) -> Result<String, GridError>;

    /// Whether images are positioned inside grid cells with cursor movement.
    /// Text-only protocols return `false` and are written one per line.
    fn places_in_cells(&self) -> bool {
        true
    }

    /// Escape that removes previously drawn images before a redraw, if any.
    fn clear_sequence(&self) -> Option<&'static str> {
        None
    }
}

/// Text fallback: a PNG data URI per image.
pub struct PlainProtocol;

impl ImageProtocol for PlainProtocol {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn render_image(&self, image: &ImageEntry, _cell: CellSize) -> Result<String, GridError> {
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(image.payload())))
    }

    fn places_in_cells(&self) -> bool {
        false
    }
}

pub struct Renderer<W: Write> {
    out: W,
    protocol: Box<dyn ImageProtocol>,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, protocol: Box<dyn ImageProtocol>) -> Self {
        Self { out, protocol }
    }

    pub fn plain(out: W) -> Self {
        Self::new(out, Box::new(PlainProtocol))
    }

    pub fn protocol_name(&self) -> &'static str {
        self.protocol.name()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Write a status line and flush it.
    pub fn write_line(&mut self, line: &str) -> Result<(), GridError> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    /// Prepare the screen for a full redraw. Text protocols keep scrolling.
    pub fn begin_redraw(&mut self) -> Result<(), GridError> {
        if !self.protocol.places_in_cells() {
            return Ok(());
        }
        if let Some(clear) = self.protocol.clear_sequence() {
            self.out.write_all(clear.as_bytes())?;
        }
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    /// Render `images` according to `layout`, flushing before returning.
    pub fn render(&mut self, images: &ImageSet, layout: &GridLayout) -> Result<(), GridError> {
        if images.is_empty() || layout.is_empty() {
            return self.write_line(NO_IMAGES_MESSAGE);
        }

        writeln!(
            self.out,
            "rows: {} columns: {} cell: {}x{}",
            layout.rows, layout.columns, layout.cell_width, layout.cell_height
        )?;

        let entries: Vec<&ImageEntry> = images.iter().collect();
        for (row, chunk) in entries.chunks(layout.columns).enumerate() {
            let first_index = row * layout.columns;
            if self.protocol.places_in_cells() {
                self.render_cell_row(chunk, first_index, layout)?;
            } else {
                if row > 0 {
                    writeln!(self.out)?;
                }
                self.render_text_row(chunk, first_index, layout)?;
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn render_cell_row(
        &mut self,
        row: &[&ImageEntry],
        first_index: usize,
        layout: &GridLayout,
    ) -> Result<(), GridError> {
        let cell = CellSize::from(layout);
        let width = layout.cell_width as usize;

        let mut labels = String::new();
        for image in row {
            let label = truncate_label(&image.label(), width.saturating_sub(1));
            labels.push_str(&format!("{:<width$}", label, width = width));
        }
        writeln!(self.out, "{}", labels.trim_end())?;

        // Reserve the rows first so scrolling cannot invalidate saved positions.
        for _ in 0..cell.height {
            writeln!(self.out)?;
        }
        queue!(self.out, MoveUp(cell.height))?;

        for (offset, image) in row.iter().enumerate() {
            let escape = self.protocol.render_image(image, cell)?;
            queue!(
                self.out,
                SavePosition,
                MoveToColumn(layout.cell_origin(first_index + offset))
            )?;
            self.out.write_all(escape.as_bytes())?;
            queue!(self.out, RestorePosition)?;
        }

        queue!(self.out, MoveDown(cell.height), MoveToColumn(0))?;

        // The header above is clipped to the cell; full names go below the row.
        for (offset, image) in row.iter().enumerate() {
            self.write_label(first_index + offset, image, layout)?;
        }
        Ok(())
    }

    fn render_text_row(
        &mut self,
        row: &[&ImageEntry],
        first_index: usize,
        layout: &GridLayout,
    ) -> Result<(), GridError> {
        let cell = CellSize::from(layout);
        for (offset, image) in row.iter().enumerate() {
            self.write_label(first_index + offset, image, layout)?;
            let escape = self.protocol.render_image(image, cell)?;
            writeln!(self.out, "{}", escape)?;
        }
        Ok(())
    }

    /// One line per image: grid position, full path and intrinsic size.
    fn write_label(
        &mut self,
        index: usize,
        image: &ImageEntry,
        layout: &GridLayout,
    ) -> Result<(), GridError> {
        let (r, c) = layout.position(index);
        writeln!(
            self.out,
            "[{},{}] {} ({}x{})",
            r,
            c,
            image.path().display(),
            image.width(),
            image.height()
        )?;
        Ok(())
    }
}

/// Shorten `label` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut cut: String = label.chars().take(max - 1).collect();
    cut.push('…');
    cut
}
