//! Texture sources for the renderer.
//!
//! The renderer consumes decoded RGBA8 pixel data; where it came from (a
//! file on disk or the procedural fallback) is decided here.

use std::path::Path;

/// Errors from loading a texture file.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decoded RGBA8 texture data, ready for GPU upload.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Decode an image file into RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::ImageReader::open(path)?
            .decode()?
            .to_rgba8();
        let (width, height) = image.dimensions();
        tracing::info!("loaded texture {} ({width}x{height})", path.display());
        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    /// A `size` × `size` checkerboard with `cell`-pixel cells.
    pub fn checkerboard(size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        assert!(size > 0 && cell > 0);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let color = if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b };
                pixels.extend_from_slice(&color);
            }
        }
        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    /// The built-in stand-in for a grass texture: two greens in a fine
    /// checker, used when no texture file is supplied or loading fails.
    pub fn grass_fallback() -> Self {
        Self::checkerboard(64, 4, [58, 121, 39, 255], [88, 152, 60, 255])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn checkerboard_dimensions_and_length() {
        let texture = TextureData::checkerboard(8, 2, [0, 0, 0, 255], [255, 255, 255, 255]);
        assert_eq!(texture.width, 8);
        assert_eq!(texture.height, 8);
        assert_eq!(texture.pixels.len(), 8 * 8 * 4);
    }

    #[test]
    fn checkerboard_cells_alternate() {
        let a = [10, 20, 30, 255];
        let b = [200, 210, 220, 255];
        let texture = TextureData::checkerboard(4, 2, a, b);

        let pixel = |x: usize, y: usize| {
            let i = (y * 4 + x) * 4;
            [
                texture.pixels[i],
                texture.pixels[i + 1],
                texture.pixels[i + 2],
                texture.pixels[i + 3],
            ]
        };
        assert_eq!(pixel(0, 0), a);
        assert_eq!(pixel(2, 0), b);
        assert_eq!(pixel(0, 2), b);
        assert_eq!(pixel(2, 2), a);
    }

    #[test]
    fn grass_fallback_is_upload_ready() {
        let texture = TextureData::grass_fallback();
        assert_eq!(
            texture.pixels.len(),
            (texture.width * texture.height * 4) as usize
        );
        // Fully opaque
        assert!(texture.pixels.chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = TextureData::load("/no/such/texture.png");
        assert!(matches!(result, Err(TextureError::Io(_))));
    }

    #[test]
    fn load_garbage_is_decode_error() {
        let mut file = tempfile::NamedTempFile::with_suffix(".png").unwrap();
        file.write_all(b"not an image at all").unwrap();
        let result = TextureData::load(file.path());
        assert!(matches!(result, Err(TextureError::Decode(_))));
    }
}
