//=========================================================================
// Headless Renderer
//=========================================================================
//
// Records draw commands instead of rasterizing them.
//
// Frame model:
//   draw calls ──> pending ──present()──> last_frame, frames += 1
//
// Textures keep their baked RGBA pixels so uploads can be inspected.
//
//=========================================================================

//=== External Dependencies ===============================================

use image::RgbaImage;
use slotmap::SlotMap;

//=== Internal Dependencies ===============================================

use crate::core::color::Color;
use crate::core::draw::{BlendMode, Flip};
use crate::core::geometry::Rect;
use crate::core::resource::TextureKey;
use crate::platform::BackendError;

//=== DrawCommand =========================================================

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect {
        rect: Rect,
        color: Color,
    },
    CopyTexture {
        texture: TextureKey,
        dest: Rect,
        angle: f64,
        flip: Flip,
    },
}

//=== Renderer ============================================================

struct TextureData {
    pixels: RgbaImage,
    blend: BlendMode,
}

pub(crate) struct Renderer {
    draw_color: Color,
    pending: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    frames: u64,
    textures: SlotMap<TextureKey, TextureData>,
}

impl Renderer {
    pub(crate) fn new() -> Self {
        Self {
            draw_color: Color::BLACK,
            pending: Vec::with_capacity(64),
            last_frame: Vec::new(),
            frames: 0,
            textures: SlotMap::with_key(),
        }
    }

    //--- Draw State -------------------------------------------------------

    pub(crate) fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    pub(crate) fn draw_color(&self) -> Color {
        self.draw_color
    }

    //--- Commands ---------------------------------------------------------

    pub(crate) fn clear(&mut self) {
        self.pending.push(DrawCommand::Clear(self.draw_color));
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect) {
        self.pending.push(DrawCommand::FillRect {
            rect,
            color: self.draw_color,
        });
    }

    pub(crate) fn copy_texture(
        &mut self,
        texture: TextureKey,
        dest: Rect,
        angle: f64,
        flip: Flip,
    ) -> Result<(), BackendError> {
        if !self.textures.contains_key(texture) {
            return Err(BackendError::InvalidHandle);
        }
        self.pending.push(DrawCommand::CopyTexture { texture, dest, angle, flip });
        Ok(())
    }

    pub(crate) fn present(&mut self) {
        self.last_frame.clear();
        std::mem::swap(&mut self.last_frame, &mut self.pending);
        self.frames += 1;
    }

    pub(crate) fn pending(&self) -> &[DrawCommand] {
        &self.pending
    }

    pub(crate) fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }

    //--- Textures ---------------------------------------------------------

    pub(crate) fn create_texture(&mut self, pixels: RgbaImage) -> TextureKey {
        self.textures.insert(TextureData {
            pixels,
            blend: BlendMode::None,
        })
    }

    pub(crate) fn set_blend_mode(&mut self, key: TextureKey, mode: BlendMode) -> Result<(), BackendError> {
        let texture = self.textures.get_mut(key).ok_or(BackendError::InvalidHandle)?;
        texture.blend = mode;
        Ok(())
    }

    pub(crate) fn destroy_texture(&mut self, key: TextureKey) {
        self.textures.remove(key);
    }

    pub(crate) fn texture_pixels(&self, key: TextureKey) -> Option<&RgbaImage> {
        self.textures.get(key).map(|t| &t.pixels)
    }

    pub(crate) fn texture_blend_mode(&self, key: TextureKey) -> Option<BlendMode> {
        self.textures.get(key).map(|t| t.blend)
    }

    pub(crate) fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Drops every texture and recorded frame.
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
