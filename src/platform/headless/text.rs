//=========================================================================
// Headless Text Rasterizer
//=========================================================================
//
// Scalable fonts via fontdue. Text is laid out on a single line along
// one baseline; glyph coverage becomes the alpha channel.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};

use fontdue::{Font as FontFace, FontSettings};
use image::{Rgba, RgbaImage};
use slotmap::SlotMap;

//=== Internal Dependencies ===============================================

use super::surface::Surface;
use crate::core::color::Color;
use crate::core::resource::FontKey;
use crate::platform::BackendError;

//=== FontStore ===========================================================

struct OpenFont {
    face: FontFace,
    px: f32,
}

#[derive(Default)]
pub(crate) struct FontStore {
    fonts: SlotMap<FontKey, OpenFont>,
}

impl FontStore {
    pub(crate) fn open(&mut self, path: &Path, size: u32) -> Result<FontKey, BackendError> {
        if size == 0 {
            return Err(BackendError::Font("font size must be positive".into()));
        }

        let bytes = std::fs::read(path)?;
        let settings = FontSettings {
            scale: size as f32,
            ..FontSettings::default()
        };
        let face = FontFace::from_bytes(bytes, settings)
            .map_err(|e| BackendError::Font(e.to_string()))?;

        Ok(self.fonts.insert(OpenFont { face, px: size as f32 }))
    }

    pub(crate) fn close(&mut self, key: FontKey) {
        self.fonts.remove(key);
    }

    pub(crate) fn clear(&mut self) {
        self.fonts.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Renders one line of text, sized to the laid-out glyphs.
    pub(crate) fn render(&self, key: FontKey, text: &str, color: Color) -> Result<Surface, BackendError> {
        let font = self.fonts.get(key).ok_or(BackendError::InvalidHandle)?;
        let face = &font.face;
        let px = font.px;

        let (ascent, descent) = match face.horizontal_line_metrics(px) {
            Some(m) => (m.ascent, m.descent),
            None => (px, 0.0),
        };

        //--- Layout -------------------------------------------------------
        let mut pen = 0.0f32;
        let mut prev: Option<char> = None;
        let mut placed = Vec::with_capacity(text.len());

        for ch in text.chars() {
            if let Some(kern) = prev.and_then(|p| face.horizontal_kern(p, ch, px)) {
                pen += kern;
            }
            let (metrics, coverage) = face.rasterize(ch, px);
            let advance = metrics.advance_width;
            placed.push((pen, metrics, coverage));
            pen += advance;
            prev = Some(ch);
        }

        let width = pen.ceil() as u32;
        let height = (ascent - descent).ceil() as u32;
        if width == 0 || height == 0 {
            return Err(BackendError::Font("text has zero width".into()));
        }

        //--- Rasterize ----------------------------------------------------
        let mut pixels = RgbaImage::from_pixel(width, height, Rgba([color.r, color.g, color.b, 0]));
        let baseline = ascent.round() as i32;

        for (origin, metrics, coverage) in placed {
            let left = origin.round() as i32 + metrics.xmin;
            let top = baseline - metrics.ymin - metrics.height as i32;

            for (i, value) in coverage.iter().enumerate() {
                if *value == 0 {
                    continue;
                }
                let x = left + (i % metrics.width) as i32;
                let y = top + (i / metrics.width) as i32;
                if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                    continue;
                }

                let alpha = (u16::from(*value) * u16::from(color.a) / 255) as u8;
                let pixel = pixels.get_pixel_mut(x as u32, y as u32);
                pixel.0[3] = pixel.0[3].max(alpha);
            }
        }

        Ok(Surface::from_pixels(pixels))
    }
}

//=== System Fonts ========================================================

/// Returns the first common sans-serif font found on this machine.
pub fn find_system_font() -> Option<PathBuf> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        let mut store = FontStore::default();

        let err = store.open(Path::new("whatever.ttf"), 0).unwrap_err();

        assert!(matches!(err, BackendError::Font(_)));
    }

    #[test]
    fn garbage_font_file_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        let mut store = FontStore::default();

        assert!(matches!(store.open(&path, 12), Err(BackendError::Font(_))));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn closed_font_is_an_invalid_handle() {
        let Some(path) = find_system_font() else {
            return;
        };
        let mut store = FontStore::default();
        let key = store.open(&path, 16).unwrap();

        store.close(key);

        assert!(matches!(
            store.render(key, "x", Color::BLACK),
            Err(BackendError::InvalidHandle)
        ));
    }

    #[test]
    fn rendered_text_has_ink_in_the_text_color() {
        let Some(path) = find_system_font() else {
            return;
        };
        let mut store = FontStore::default();
        let key = store.open(&path, 32).unwrap();

        let pixels = store.render(key, "H", Color::RED).unwrap().bake();

        assert!(pixels.pixels().any(|p| p.0[3] > 200));
        assert!(pixels.pixels().all(|p| p.0[..3] == [255, 0, 0]));
    }
}
