// ABOUTME: Kitty terminal graphics protocol implementation
// ABOUTME: Handles base64 encoding, chunking and cell-sized placement for the Kitty graphics protocol

use crate::constants::protocols::{KITTY, KITTY_CHUNK_SIZE};
use base64::{Engine, engine::general_purpose::STANDARD};
use gridcat_core::{CellSize, GridError, ImageEntry, ImageProtocol};

/// Removes every image placement on screen
const DELETE_ALL: &str = "\x1b_Ga=d,d=A,q=2\x1b\\";

pub struct KittyProtocol;

impl ImageProtocol for KittyProtocol {
    fn name(&self) -> &'static str {
        KITTY
    }

    fn render_image(&self, image: &ImageEntry, cell: CellSize) -> Result<String, GridError> {
        if image.payload().is_empty() {
            return Err(GridError::encoding(image.path(), "empty payload"));
        }

        let base64_data = STANDARD.encode(image.payload());

        // base64 output is ASCII, so byte chunks are valid str slices
        let chunks: Vec<&str> = base64_data
            .as_bytes()
            .chunks(KITTY_CHUNK_SIZE)
            .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
            .collect();

        let mut output = String::with_capacity(base64_data.len() + chunks.len() * 16 + 64);

        for (i, chunk) in chunks.iter().enumerate() {
            let more = if i + 1 < chunks.len() { 1 } else { 0 };

            if i == 0 {
                // First chunk: transmit+display PNG scaled into the cell, cursor stays put
                output.push_str(&format!(
                    "\x1b_Ga=T,f=100,c={},r={},C=1,q=2,m={};{}\x1b\\",
                    cell.width, cell.height, more, chunk
                ));
            } else {
                output.push_str(&format!("\x1b_Gm={};{}\x1b\\", more, chunk));
            }
        }

        Ok(output)
    }

    fn clear_sequence(&self) -> Option<&'static str> {
        Some(DELETE_ALL)
    }
}
