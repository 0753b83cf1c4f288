// ABOUTME: Encoder seam turning image paths into display payloads, and the frozen image set
// ABOUTME: Per-file encoding failures are contained here and never abort the whole run

use crate::error::GridError;
use std::path::{Path, PathBuf};

/// Encoded payload plus the intrinsic pixel size of the source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub payload: Vec<u8>,
}

/// Maps a file path to a payload suitable for terminal display.
pub trait ImageEncoder {
    fn encode(&self, path: &Path) -> Result<EncodedImage, GridError>;
}

impl<E: ImageEncoder + ?Sized> ImageEncoder for &E {
    fn encode(&self, path: &Path) -> Result<EncodedImage, GridError> {
        (**self).encode(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    path: PathBuf,
    width: u32,
    height: u32,
    payload: Vec<u8>,
}

impl ImageEntry {
    pub fn new(path: impl Into<PathBuf>, encoded: EncodedImage) -> Self {
        Self {
            path: path.into(),
            width: encoded.width,
            height: encoded.height,
            payload: encoded.payload,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// File name used for labels, falling back to the full path.
    pub fn label(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Ordered image sequence. Append-only until frozen, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    entries: Vec<ImageEntry>,
    frozen: bool,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Returns `false` (and drops the entry) once frozen.
    pub fn push(&mut self, entry: ImageEntry) -> bool {
        if self.frozen {
            log::warn!("Ignoring {} added after freeze", entry.path.display());
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn freeze(mut self) -> Self {
        self.frozen = true;
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }
}

impl<'a> IntoIterator for &'a ImageSet {
    type Item = &'a ImageEntry;
    type IntoIter = std::slice::Iter<'a, ImageEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Encode `paths` in order into a frozen [`ImageSet`].
///
/// Files that fail to encode are passed to `on_skip` and left out; fatal
/// errors from the encoder still abort.
pub fn build_image_set<E, F>(
    paths: &[PathBuf],
    encoder: &E,
    mut on_skip: F,
) -> Result<ImageSet, GridError>
where
    E: ImageEncoder + ?Sized,
    F: FnMut(&GridError),
{
    let mut set = ImageSet::new();

    for path in paths {
        match encoder.encode(path) {
            Ok(encoded) => {
                log::debug!(
                    "Encoded {} ({}x{}, {} bytes)",
                    path.display(),
                    encoded.width,
                    encoded.height,
                    encoded.payload.len()
                );
                set.push(ImageEntry::new(path.clone(), encoded));
            }
            Err(e) if !e.is_fatal() => {
                log::warn!("{}", e);
                on_skip(&e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(set.freeze())
}
