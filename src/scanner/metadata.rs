//! Pixel dimensions for media files, read from headers only.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use image::ImageReader;
use tracing::{trace, warn};

use crate::models::MediaKind;

/// Dimension reported when a file cannot be measured.
pub const UNKNOWN_DIMENSION: u32 = 0;

/// How far into an MP4/MOV file we look for the track header.
const MP4_HEADER_BYTES: u64 = 128 * 1024;

/// Returns `(width, height)`, or `(0, 0)` when the file can't be measured.
/// A broken file still shows up in the gallery.
pub fn dimensions(path: &Path, kind: MediaKind) -> (u32, u32) {
    let measured = match kind {
        MediaKind::Image => image_dimensions(path),
        MediaKind::Video => video_dimensions(path),
    };
    measured.unwrap_or((UNKNOWN_DIMENSION, UNKNOWN_DIMENSION))
}

fn image_dimensions(path: &Path) -> Option<(u32, u32)> {
    let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(e) => {
            warn!(?path, error = %e, "Failed to open image");
            return None;
        }
    };
    match reader.into_dimensions() {
        Ok(dims) => {
            trace!(?path, width = dims.0, height = dims.1, "Read image header");
            Some(dims)
        }
        Err(e) => {
            warn!(?path, error = %e, "Failed to read image dimensions");
            None
        }
    }
}

fn video_dimensions(path: &Path) -> Option<(u32, u32)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "mp4" && ext != "mov" {
        trace!(?path, "No header reader for video container");
        return None;
    }

    let mut buffer = Vec::new();
    let read = File::open(path).and_then(|f| f.take(MP4_HEADER_BYTES).read_to_end(&mut buffer));
    if let Err(e) = read {
        warn!(?path, error = %e, "Failed to read video header");
        return None;
    }
    track_header_dimensions(&buffer)
}

/// Finds the first `tkhd` box with a non-zero size. Width and height sit at
/// the end of the box as 16.16 fixed point; their offset depends on the box
/// version.
fn track_header_dimensions(buffer: &[u8]) -> Option<(u32, u32)> {
    buffer
        .windows(4)
        .enumerate()
        .filter(|(_, tag)| *tag == b"tkhd")
        .find_map(|(at, _)| {
            let version = *buffer.get(at + 4)?;
            let offset = if version == 0 { at + 80 } else { at + 92 };
            let field = |start: usize| -> Option<u32> {
                let bytes = buffer.get(start..start + 4)?;
                Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) >> 16)
            };
            let (w, h) = (field(offset)?, field(offset + 4)?);
            (w > 0 && h > 0).then_some((w, h))
        })
}
