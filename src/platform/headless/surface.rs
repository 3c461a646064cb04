//=========================================================================
// Headless Surfaces
//=========================================================================
//
// CPU-side RGBA images. Color key and alpha modulation are recorded on
// the surface and applied once, when the pixels are baked for upload.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use image::RgbaImage;

//=== Internal Dependencies ===============================================

use crate::core::color::Color;
use crate::platform::BackendError;

//=== Surface =============================================================

/// A decoded image waiting to become a texture.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    color_key: Option<Color>,
    alpha_mod: u8,
}

impl Surface {
    pub(crate) fn from_pixels(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            color_key: None,
            alpha_mod: 255,
        }
    }

    /// Reads and decodes a PNG or BMP file.
    pub(crate) fn load(path: &Path) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path)?;
        let decoded = image::load_from_memory(&bytes).map_err(BackendError::decode)?;
        Ok(Self::from_pixels(decoded.to_rgba8()))
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub(crate) fn set_color_key(&mut self, key: Color) {
        self.color_key = Some(key);
    }

    pub(crate) fn set_alpha_mod(&mut self, alpha: u8) {
        self.alpha_mod = alpha;
    }

    /// Final pixels with color key and alpha modulation applied.
    pub(crate) fn bake(&self) -> RgbaImage {
        let mut out = self.pixels.clone();

        for pixel in out.pixels_mut() {
            let [r, g, b, a] = pixel.0;

            if self.color_key.is_some_and(|key| key.same_rgb(&Color::rgb(r, g, b))) {
                pixel.0[3] = 0;
                continue;
            }
            if self.alpha_mod < 255 {
                pixel.0[3] = (u16::from(a) * u16::from(self.alpha_mod) / 255) as u8;
            }
        }
        out
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn bake_without_adjustments_is_identity() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 200]));
        let surface = Surface::from_pixels(image.clone());

        assert_eq!(surface.bake(), image);
        assert_eq!(surface.size(), (3, 2));
    }

    #[test]
    fn color_key_ignores_source_alpha() {
        let mut surface = Surface::from_pixels(RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 17])));

        surface.set_color_key(Color::rgba(9, 9, 9, 255));

        assert_eq!(surface.bake().get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn alpha_mod_multiplies_existing_alpha() {
        let mut surface = Surface::from_pixels(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128])));

        surface.set_alpha_mod(128);

        assert_eq!(surface.bake().get_pixel(0, 0)[3], 64);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Surface::load(Path::new("missing/nothing.bmp")).unwrap_err();

        assert!(matches!(err, BackendError::Io(_)));
    }
}
