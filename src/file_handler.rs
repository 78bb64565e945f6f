use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::channel::oneshot;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{WhiteboardError, WhiteboardResult};

/// Raster format a canvas export is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    /// `.jpg`/`.jpeg` (any case) is JPEG; everything else, including no
    /// extension, is PNG
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("jpg" | "jpeg") => Self::Jpeg,
            _ => Self::Png,
        }
    }
}

/// Encode pixels; JPEG drops the alpha channel
pub fn encode(
    pixels: &RgbaImage,
    format: ExportFormat,
    jpeg_quality: u8,
) -> WhiteboardResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            pixels
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(WhiteboardError::Encode)?;
        }
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(pixels.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, jpeg_quality)
                .encode_image(&rgb)
                .map_err(WhiteboardError::Encode)?;
        }
    }
    Ok(bytes)
}

/// Encode by the path's extension and write the file
pub fn save(pixels: &RgbaImage, path: &Path, jpeg_quality: u8) -> WhiteboardResult<()> {
    let format = ExportFormat::from_path(path);
    let bytes = encode(pixels, format, jpeg_quality)?;
    std::fs::write(path, &bytes).map_err(|err| WhiteboardError::io(path, err))?;
    log::info!(
        "Saved {}x{} canvas as {:?} to {} ({} bytes)",
        pixels.width(),
        pixels.height(),
        format,
        path.display(),
        bytes.len()
    );
    Ok(())
}

/// Decode an image of any supported format into RGBA
pub fn decode(bytes: &[u8]) -> WhiteboardResult<Arc<RgbaImage>> {
    let img = image::load_from_memory(bytes).map_err(WhiteboardError::Decode)?;
    log::debug!("Successfully decoded image: {}x{}", img.width(), img.height());
    Ok(Arc::new(img.to_rgba8()))
}

pub fn load(path: &Path) -> WhiteboardResult<Arc<RgbaImage>> {
    log::info!("Processing image from path: {}", path.display());
    let bytes = std::fs::read(path).map_err(|err| WhiteboardError::io(path, err))?;
    decode(&bytes)
}

/// An export running on a worker thread
#[derive(Debug)]
pub struct PendingSave {
    path: PathBuf,
    receiver: oneshot::Receiver<WhiteboardResult<()>>,
}

impl PendingSave {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check; `None` while the worker is still busy
    pub fn poll(&mut self) -> Option<WhiteboardResult<()>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(WhiteboardError::SaveCancelled)),
        }
    }

    /// Block until the worker finishes
    pub fn wait(self) -> WhiteboardResult<()> {
        futures::executor::block_on(self.receiver).unwrap_or(Err(WhiteboardError::SaveCancelled))
    }
}

/// Encode and write `snapshot` on a worker thread.
///
/// The caller hands over an owned copy of the pixels, so the canvas can keep
/// changing while the export runs.
pub fn save_in_background(snapshot: RgbaImage, path: PathBuf, jpeg_quality: u8) -> PendingSave {
    let (sender, receiver) = oneshot::channel();
    let worker_path = path.clone();
    std::thread::spawn(move || {
        let result = save(&snapshot, &worker_path, jpeg_quality);
        if sender.send(result).is_err() {
            log::warn!("Save of {} finished after the UI stopped waiting", worker_path.display());
        }
    });
    PendingSave { path, receiver }
}
