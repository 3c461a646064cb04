//=========================================================================
// Resource Manager
//
// Load, create, play and free operations on the runtime context.
//
// Texture load pipeline:
// ```text
//   load_surface ─> color key? ─> alpha < 255? ─> create_texture
//        │                                            │
//        └──────────── free_surface <── blend mode ───┘
// ```
//
// Every failure is returned as a `ResourceLoadError` naming the operation
// and the path; use `Context::or_exit` for fail-fast loading.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Font, Music, Repeat, ResourceLoadError, ResourceOp, Sound, Texture};
use crate::context::Context;
use crate::core::color::Color;
use crate::core::draw::BlendMode;
use crate::platform::{Backend, BackendError};

//=== TextureOptions ======================================================

/// Per-load adjustments applied before the image is uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureOptions {
    /// Pixels of exactly this RGB become fully transparent.
    pub color_key: Option<Color>,
    /// Uniform opacity, 0 (invisible) to 255 (opaque).
    pub alpha: u8,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            color_key: None,
            alpha: 255,
        }
    }
}

impl TextureOptions {
    pub fn with_color_key(mut self, key: Color) -> Self {
        self.color_key = Some(key);
        self
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }
}

//=========================================================================
// Textures
//=========================================================================

impl<B: Backend> Context<B> {
    /// Decodes an image file and uploads it as a blend-enabled texture.
    pub fn load_texture(
        &mut self,
        path: impl AsRef<Path>,
        options: TextureOptions,
    ) -> Result<Texture, ResourceLoadError> {
        let path = path.as_ref();
        let wrap = |e: BackendError| ResourceLoadError::new(ResourceOp::LoadTexture, path, e);

        let mut surface = self.backend.load_surface(path).map_err(wrap)?;

        if let Some(key) = options.color_key {
            self.backend.set_color_key(&mut surface, key);
        }
        if options.alpha < 255 {
            self.backend.set_surface_alpha(&mut surface, options.alpha);
        }

        let texture = self.upload(surface).map_err(wrap)?;
        debug!(
            target: "resource",
            "Loaded texture '{}' ({}x{})",
            path.display(),
            texture.width(),
            texture.height()
        );
        Ok(texture)
    }

    /// Destroys the backend texture and leaves `texture` inert. Freeing an
    /// already freed texture does nothing.
    pub fn free_texture(&mut self, texture: &mut Texture) {
        if let Some(key) = texture.release() {
            self.backend.destroy_texture(key);
            debug!(target: "resource", "Freed texture {:?}", key);
        }
    }

    /// Surface → texture, consuming the surface on every path.
    fn upload(&mut self, surface: B::Surface) -> Result<Texture, BackendError> {
        let (width, height) = self.backend.surface_size(&surface);
        let created = self.backend.create_texture(&surface);
        self.backend.free_surface(surface);

        let key = created?;
        if let Err(e) = self.backend.set_texture_blend_mode(key, BlendMode::Blend) {
            self.backend.destroy_texture(key);
            return Err(e);
        }
        Ok(Texture::new(key, width, height))
    }

    //=====================================================================
    // Fonts and Text
    //=====================================================================

    /// Opens a scalable font at `size` pixels.
    pub fn load_font(&mut self, path: impl AsRef<Path>, size: u32) -> Result<Font, ResourceLoadError> {
        let path = path.as_ref();
        let key = self
            .backend
            .open_font(path, size)
            .map_err(|e| ResourceLoadError::new(ResourceOp::LoadFont, path, e))?;

        debug!(target: "resource", "Opened font '{}' at {}px", path.display(), size);
        Ok(Font::new(key, size))
    }

    pub fn free_font(&mut self, font: Font) {
        self.backend.close_font(font.handle);
        debug!(target: "resource", "Closed font {:?}", font.handle);
    }

    /// Renders `text` in `color` into a new texture sized to the text.
    ///
    /// The caller owns the result; free the previous one before replacing
    /// it each frame.
    pub fn create_font_texture(
        &mut self,
        font: &Font,
        text: &str,
        color: Color,
    ) -> Result<Texture, ResourceLoadError> {
        let wrap = |e: BackendError| ResourceLoadError::new(ResourceOp::RenderText, text, e);

        let surface = self.backend.render_text(font.handle, text, color).map_err(wrap)?;
        self.upload(surface).map_err(wrap)
    }

    //=====================================================================
    // Audio
    //=====================================================================

    pub fn load_sound(&mut self, path: impl AsRef<Path>) -> Result<Sound, ResourceLoadError> {
        let path = path.as_ref();
        let handle = self
            .backend
            .load_chunk(path)
            .map_err(|e| ResourceLoadError::new(ResourceOp::LoadSound, path, e))?;

        debug!(target: "resource", "Loaded sound '{}'", path.display());
        Ok(Sound { handle })
    }

    pub fn free_sound(&mut self, sound: Sound) {
        self.backend.free_chunk(sound.handle);
        debug!(target: "resource", "Freed sound {:?}", sound.handle);
    }

    pub fn load_music(&mut self, path: impl AsRef<Path>) -> Result<Music, ResourceLoadError> {
        let path = path.as_ref();
        let handle = self
            .backend
            .load_music(path)
            .map_err(|e| ResourceLoadError::new(ResourceOp::LoadMusic, path, e))?;

        debug!(target: "resource", "Loaded music '{}'", path.display());
        Ok(Music { handle })
    }

    pub fn free_music(&mut self, music: Music) {
        self.backend.free_music(music.handle);
        debug!(target: "resource", "Freed music {:?}", music.handle);
    }

    /// Plays `sound` on the first free mixing channel, overlapping any
    /// sound already playing. Returns the channel used.
    ///
    /// Playback is fire-and-forget: when every channel is busy the sound
    /// is dropped and `None` is returned.
    pub fn play_sound(&mut self, sound: &Sound, repeat: Repeat) -> Option<usize> {
        if repeat.is_silent() {
            return None;
        }

        match self.backend.play_channel(sound.handle, repeat) {
            Ok(Some(channel)) => Some(channel),
            Ok(None) => {
                warn!(target: "resource", "No free mixing channel, sound dropped");
                None
            }
            Err(e) => {
                warn!(target: "resource", "Sound playback failed: {}", e);
                None
            }
        }
    }

    /// Starts `music`, replacing the active track.
    pub fn play_music(&mut self, music: &Music, repeat: Repeat) {
        if repeat.is_silent() {
            return;
        }

        if let Err(e) = self.backend.play_music(music.handle, repeat) {
            warn!(target: "resource", "Music playback failed: {}", e);
        }
    }

    pub fn stop_music(&mut self) {
        self.backend.halt_music();
    }

    pub fn stop_all_sounds(&mut self) {
        self.backend.halt_channels();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;
    use crate::platform::headless::HeadlessBackend;
    use crate::platform::AudioSpec;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    //--- Test Helpers -----------------------------------------------------

    fn context() -> Context<HeadlessBackend> {
        ContextBuilder::new("resources", 200, 200)
            .build(HeadlessBackend::new())
            .expect("headless init")
    }

    fn write_png(dir: &TempDir, name: &str, image: &RgbaImage) -> PathBuf {
        let path = dir.path().join(name);
        image.save(&path).expect("write png");
        path
    }

    fn write_wav(dir: &TempDir, name: &str, millis: u32) -> PathBuf {
        let rate = 8_000u32;
        let data_len = rate * millis / 1000 * 2;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&rate.to_le_bytes());
        bytes.extend_from_slice(&(rate * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(bytes.len() + data_len as usize, 0);

        let path = dir.path().join(name);
        std::fs::write(&path, bytes).expect("write wav");
        path
    }

    //=====================================================================
    // Texture Tests
    //=====================================================================

    #[test]
    fn load_texture_records_size_and_frees_inert() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "ball.png", &RgbaImage::from_pixel(64, 64, Rgba([255, 0, 0, 255])));
        let mut ctx = context();

        let mut texture = ctx.load_texture(&path, TextureOptions::default()).unwrap();
        assert_eq!((texture.width(), texture.height()), (64, 64));
        assert_eq!(ctx.backend().texture_count(), 1);
        assert_eq!(
            ctx.backend().texture_blend_mode(texture.handle().unwrap()),
            Some(BlendMode::Blend)
        );

        ctx.free_texture(&mut texture);
        assert!(texture.is_freed());
        assert_eq!((texture.width(), texture.height()), (0, 0));
        assert_eq!(ctx.backend().texture_count(), 0);

        // Double free is a no-op
        ctx.free_texture(&mut texture);
        assert_eq!(ctx.backend().texture_count(), 0);
    }

    #[test]
    fn color_key_makes_matching_pixels_transparent() {
        let dir = TempDir::new().unwrap();
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 255, 255]));
        image.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        let path = write_png(&dir, "sprite.png", &image);
        let mut ctx = context();

        let texture = ctx
            .load_texture(&path, TextureOptions::default().with_color_key(Color::rgb(255, 0, 255)))
            .unwrap();
        let pixels = ctx.backend().texture_pixels(texture.handle().unwrap()).unwrap();

        assert_eq!(pixels.get_pixel(0, 0)[3], 0);
        assert_eq!(pixels.get_pixel(1, 0)[3], 255);
    }

    #[test]
    fn alpha_option_scales_opacity() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "ghost.png", &RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));
        let mut ctx = context();

        let texture = ctx
            .load_texture(&path, TextureOptions::default().with_alpha(128))
            .unwrap();
        let pixels = ctx.backend().texture_pixels(texture.handle().unwrap()).unwrap();

        assert_eq!(pixels.get_pixel(2, 2)[3], 128);
    }

    #[test]
    fn missing_image_reports_operation_and_path() {
        let mut ctx = context();

        let err = ctx
            .load_texture("no/such/file.png", TextureOptions::default())
            .unwrap_err();

        assert_eq!(err.op, ResourceOp::LoadTexture);
        assert_eq!(err.path, PathBuf::from("no/such/file.png"));
        assert!(err.to_string().starts_with("failed to load texture 'no/such/file.png'"));
        assert_eq!(ctx.backend().texture_count(), 0);
    }

    #[test]
    fn undecodable_image_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let mut ctx = context();

        let err = ctx.load_texture(&path, TextureOptions::default()).unwrap_err();

        assert!(matches!(err.source, BackendError::Decode(_)));
    }

    //=====================================================================
    // Font Tests
    //=====================================================================

    #[test]
    fn missing_font_is_an_error() {
        let mut ctx = context();

        let err = ctx.load_font("no/such/font.ttf", 16).unwrap_err();

        assert_eq!(err.op, ResourceOp::LoadFont);
    }

    /// Uses a system font when one is installed.
    #[test]
    fn font_texture_has_text_dimensions() {
        let Some(font_path) = crate::platform::headless::find_system_font() else {
            return;
        };
        let mut ctx = context();
        let font = ctx.load_font(&font_path, 24).unwrap();

        let mut short = ctx.create_font_texture(&font, "1", Color::BLACK).unwrap();
        let mut long = ctx.create_font_texture(&font, "Score: 100", Color::BLACK).unwrap();

        assert!(short.width() > 0 && short.height() > 0);
        assert!(long.width() > short.width());

        let empty = ctx.create_font_texture(&font, "", Color::BLACK).unwrap_err();
        assert_eq!(empty.op, ResourceOp::RenderText);

        ctx.free_texture(&mut short);
        ctx.free_texture(&mut long);
        ctx.free_font(font);
        assert_eq!(ctx.backend().texture_count(), 0);
        assert_eq!(ctx.backend().font_count(), 0);
    }

    //=====================================================================
    // Audio Tests
    //=====================================================================

    #[test]
    fn sounds_overlap_on_separate_channels() {
        let dir = TempDir::new().unwrap();
        let path = write_wav(&dir, "bounce.wav", 500);
        let mut ctx = context();
        let sound = ctx.load_sound(&path).unwrap();

        let first = ctx.play_sound(&sound, Repeat::ONCE);
        let second = ctx.play_sound(&sound, Repeat::ONCE);

        assert_eq!(first, Some(0));
        assert_eq!(second, Some(1));
        assert_eq!(ctx.backend().busy_channels(), 2);

        ctx.stop_all_sounds();
        assert_eq!(ctx.backend().busy_channels(), 0);
        ctx.free_sound(sound);
    }

    #[test]
    fn zero_repeat_plays_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_wav(&dir, "click.wav", 100);
        let mut ctx = context();
        let sound = ctx.load_sound(&path).unwrap();

        assert_eq!(ctx.play_sound(&sound, Repeat::Times(0)), None);
        assert_eq!(ctx.backend().busy_channels(), 0);
    }

    #[test]
    fn sound_is_dropped_when_all_channels_busy() {
        let dir = TempDir::new().unwrap();
        let path = write_wav(&dir, "hit.wav", 2_000);
        let mut ctx = ContextBuilder::new("audio", 10, 10)
            .with_audio(AudioSpec {
                mix_channels: 1,
                ..AudioSpec::default()
            })
            .build(HeadlessBackend::new())
            .unwrap();
        let sound = ctx.load_sound(&path).unwrap();

        assert_eq!(ctx.play_sound(&sound, Repeat::Forever), Some(0));
        assert_eq!(ctx.play_sound(&sound, Repeat::ONCE), None);
    }

    #[test]
    fn unrecognized_audio_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, vec![0u8; 64]).unwrap();
        let mut ctx = context();

        let err = ctx.load_sound(&path).unwrap_err();

        assert_eq!(err.op, ResourceOp::LoadSound);
        assert!(matches!(err.source, BackendError::Audio(_)));
    }

    #[test]
    fn music_replaces_active_track() {
        let dir = TempDir::new().unwrap();
        let theme = write_wav(&dir, "theme.wav", 100);
        let boss = write_wav(&dir, "boss.wav", 100);
        let mut ctx = context();
        let theme = ctx.load_music(&theme).unwrap();
        let boss = ctx.load_music(&boss).unwrap();

        ctx.play_music(&theme, Repeat::Forever);
        assert_eq!(ctx.backend().active_music(), Some(theme.handle));

        ctx.play_music(&boss, Repeat::ONCE);
        assert_eq!(ctx.backend().active_music(), Some(boss.handle));

        ctx.stop_music();
        assert_eq!(ctx.backend().active_music(), None);

        ctx.free_music(theme);
        ctx.free_music(boss);
    }

    //=====================================================================
    // Logging Tests
    //=====================================================================

    struct CapturedLog(Mutex<Vec<String>>);

    impl log::Log for CapturedLog {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut lines) = self.0.lock() {
                lines.push(format!("{}: {}", record.target(), record.args()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURED: CapturedLog = CapturedLog(Mutex::new(Vec::new()));

    fn captured_lines() -> Vec<String> {
        CAPTURED.0.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    #[test]
    fn freeing_audio_is_logged() {
        // Unit tests install no other logger
        let _ = log::set_logger(&CAPTURED);
        log::set_max_level(log::LevelFilter::Trace);

        let dir = TempDir::new().unwrap();
        let path = write_wav(&dir, "log.wav", 50);
        let mut ctx = context();
        let sound = ctx.load_sound(&path).unwrap();
        let music = ctx.load_music(&path).unwrap();
        let freed_sound = format!("resource: Freed sound {:?}", sound.handle);
        let freed_music = format!("resource: Freed music {:?}", music.handle);

        ctx.free_sound(sound);
        ctx.free_music(music);

        let lines = captured_lines();
        assert!(lines.contains(&freed_sound));
        assert!(lines.contains(&freed_music));
    }
}
