// ABOUTME: iTerm2 terminal inline image protocol implementation
// ABOUTME: Handles base64 encoding with iTerm2-specific escape sequences sized in cells

use crate::constants::protocols::ITERM2;
use base64::{Engine, engine::general_purpose::STANDARD};
use gridcat_core::{CellSize, GridError, ImageEntry, ImageProtocol};

pub struct ITerm2Protocol;

impl ImageProtocol for ITerm2Protocol {
    fn name(&self) -> &'static str {
        ITERM2
    }

    fn render_image(&self, image: &ImageEntry, cell: CellSize) -> Result<String, GridError> {
        let base64_data = STANDARD.encode(image.payload());
        let filename_b64 = STANDARD.encode(image.label().as_bytes());

        // \x1b]1337;File=name=..;size=..;width=..;height=..;inline=1:data\x07
        Ok(format!(
            "\x1b]1337;File=name={};size={};width={};height={};preserveAspectRatio=1;inline=1:{}\x07",
            filename_b64,
            image.payload().len(),
            cell.width,
            cell.height,
            base64_data
        ))
    }
}
