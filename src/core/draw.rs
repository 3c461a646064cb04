//=========================================================================
// Draw Facade
//
// Immediate-mode drawing into the frame being built.
//
// Nothing reaches the screen until `present()`. The backend's draw color
// is shared state: `clear()` sets it to the background first and
// `fill_rect()` restores whatever it found.
//
//=========================================================================

//=== External Dependencies ===============================================

use bitflags::bitflags;
use log::warn;

//=== Internal Dependencies ===============================================

use crate::context::Context;
use crate::core::color::Color;
use crate::core::geometry::Rect;
use crate::core::resource::Texture;
use crate::platform::Backend;

//=== Flip / BlendMode ====================================================

bitflags! {
    /// Mirroring applied when a texture is copied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flip: u8 {
        const HORIZONTAL = 0b01;
        const VERTICAL   = 0b10;
    }
}

impl Flip {
    pub const NONE: Self = Self::empty();
}

impl Default for Flip {
    fn default() -> Self {
        Self::NONE
    }
}

/// How a texture combines with what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Overwrite.
    None,
    /// Alpha blending.
    #[default]
    Blend,
}

//=== Draw Operations =====================================================

impl<B: Backend> Context<B> {
    /// Fills the frame with the background color.
    pub fn clear(&mut self) {
        self.backend.set_draw_color(self.background);
        if let Err(e) = self.backend.clear() {
            warn!(target: "render", "clear failed: {}", e);
        }
    }

    /// Shows the frame built since the last present.
    pub fn present(&mut self) {
        self.backend.present();
    }

    /// Copies the whole texture into `dest`, scaling to fit.
    pub fn draw_texture(&mut self, texture: &Texture, dest: Rect) {
        self.draw_texture_ex(texture, dest, 0.0, Flip::NONE);
    }

    /// Copies the whole texture into `dest`, rotated clockwise by `angle`
    /// degrees about the center of `dest`, then mirrored per `flip`.
    ///
    /// A freed texture draws nothing; debug builds log the skipped call.
    pub fn draw_texture_ex(&mut self, texture: &Texture, dest: Rect, angle: f64, flip: Flip) {
        let Some(key) = texture.handle() else {
            if cfg!(debug_assertions) {
                warn!(target: "render", "Skipping draw of a freed texture at {:?}", dest);
            }
            return;
        };

        if let Err(e) = self.backend.copy_texture(key, dest, angle, flip) {
            warn!(target: "render", "copy_texture failed: {}", e);
        }
    }

    /// Draws the texture at its native size with the top-left at (`x`, `y`).
    pub fn draw_texture_at(&mut self, texture: &Texture, x: i32, y: i32) {
        let dest = Rect::new(x, y, texture.width(), texture.height());
        self.draw_texture(texture, dest);
    }

    /// Fills `rect` with `color` at `alpha` opacity (255 = opaque). The
    /// previous draw color is restored afterwards.
    pub fn fill_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        let saved = self.backend.draw_color();

        self.backend.set_draw_color(color.with_alpha(alpha));
        if let Err(e) = self.backend.fill_rect(rect) {
            warn!(target: "render", "fill_rect failed: {}", e);
        }

        self.backend.set_draw_color(saved);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;
    use crate::core::resource::TextureOptions;
    use crate::platform::headless::{DrawCommand, HeadlessBackend};
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn context() -> Context<HeadlessBackend> {
        ContextBuilder::new("draw", 320, 240)
            .with_background(Color::rgb(10, 20, 30))
            .build(HeadlessBackend::new())
            .expect("headless init")
    }

    fn load_square(ctx: &mut Context<HeadlessBackend>, dir: &TempDir, size: u32) -> Texture {
        let path = dir.path().join("square.png");
        RgbaImage::from_pixel(size, size, Rgba([0, 255, 0, 255]))
            .save(&path)
            .unwrap();
        ctx.load_texture(&path, TextureOptions::default()).unwrap()
    }

    //=====================================================================
    // Frame Tests
    //=====================================================================

    #[test]
    fn nothing_is_visible_before_present() {
        let mut ctx = context();

        ctx.clear();
        ctx.fill_rect(Rect::new(0, 0, 5, 5), Color::RED, 255);

        assert_eq!(ctx.backend().frames_presented(), 0);
        assert!(ctx.backend().last_frame().is_empty());
        assert_eq!(ctx.backend().pending_commands().len(), 2);

        ctx.present();

        assert_eq!(ctx.backend().frames_presented(), 1);
        assert_eq!(ctx.backend().last_frame().len(), 2);
        assert!(ctx.backend().pending_commands().is_empty());
    }

    #[test]
    fn clear_uses_background() {
        let mut ctx = context();
        ctx.backend_mut().set_draw_color(Color::RED);

        ctx.clear();

        assert_eq!(
            ctx.backend().pending_commands(),
            &[DrawCommand::Clear(Color::rgb(10, 20, 30))]
        );
    }

    #[test]
    fn fill_rect_restores_draw_color() {
        let mut ctx = context();
        ctx.clear();

        ctx.fill_rect(Rect::new(1, 2, 3, 4), Color::BLUE, 100);

        assert_eq!(ctx.backend().draw_color(), Color::rgb(10, 20, 30));
        assert_eq!(
            ctx.backend().pending_commands()[1],
            DrawCommand::FillRect {
                rect: Rect::new(1, 2, 3, 4),
                color: Color::rgba(0, 0, 255, 100),
            }
        );
    }

    //=====================================================================
    // Texture Draw Tests
    //=====================================================================

    #[test]
    fn draw_texture_at_uses_native_size() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context();
        let texture = load_square(&mut ctx, &dir, 16);

        ctx.draw_texture_at(&texture, 40, 50);

        match &ctx.backend().pending_commands()[0] {
            DrawCommand::CopyTexture { dest, angle, flip, .. } => {
                assert_eq!(*dest, Rect::new(40, 50, 16, 16));
                assert_eq!(*angle, 0.0);
                assert_eq!(*flip, Flip::NONE);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn draw_texture_ex_passes_rotation_and_flip() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context();
        let texture = load_square(&mut ctx, &dir, 8);
        let flip = Flip::HORIZONTAL | Flip::VERTICAL;

        ctx.draw_texture_ex(&texture, Rect::new(0, 0, 32, 32), 90.0, flip);

        match &ctx.backend().pending_commands()[0] {
            DrawCommand::CopyTexture { texture: key, angle, flip: f, .. } => {
                assert_eq!(Some(*key), texture.handle());
                assert_eq!(*angle, 90.0);
                assert_eq!(*f, flip);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn freed_texture_draws_nothing() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context();
        let mut texture = load_square(&mut ctx, &dir, 8);
        ctx.free_texture(&mut texture);

        ctx.draw_texture(&texture, Rect::new(0, 0, 8, 8));

        assert!(ctx.backend().pending_commands().is_empty());
    }
}
