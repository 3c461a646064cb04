//=========================================================================
// Headless Backend
//
// A complete `Backend` with no window, GPU or audio device.
//
// Collaborators:
// ```text
//   events    crossbeam channel + key snapshot     (event_queue)
//   images    image crate, RGBA surfaces           (surface)
//   text      fontdue rasterizer                   (text)
//   renderer  recorded draw commands per frame     (renderer)
//   audio     signature checks + channel records   (audio)
// ```
//
// Subsystem gating matches a real multimedia library: rendering and
// texture creation need `init_video`, sound needs `init_audio`, fonts
// need `init_text`. Events and image decoding work at any time.
//
//=========================================================================

//=== Submodules ==========================================================

mod audio;
mod event_queue;
mod renderer;
mod surface;
mod text;

pub use event_queue::EventInjector;
pub use renderer::DrawCommand;
pub use surface::Surface;
pub use text::find_system_font;

//=== External Dependencies ===============================================

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use image::RgbaImage;
use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use event_queue::EventQueue;

pub(crate) use audio::Mixer;
pub(crate) use renderer::Renderer;
pub(crate) use text::FontStore;

use super::interface::{Backend, BackendError};
use super::config::{AudioSpec, WindowSpec};
use crate::core::color::Color;
use crate::core::draw::{BlendMode, Flip};
use crate::core::geometry::Rect;
use crate::core::input::event::PlatformEvent;
use crate::core::input::keyboard::KeySnapshot;
use crate::core::resource::{FontKey, MusicKey, Repeat, SoundKey, TextureKey};

//=== HeadlessConfig ======================================================

/// Failure injection for exercising error paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessConfig {
    pub fail_video_init: bool,
    pub fail_audio_init: bool,
    pub fail_text_init: bool,
}

//=== HeadlessBackend =====================================================

pub struct HeadlessBackend {
    config: HeadlessConfig,
    started: Instant,
    window: Option<WindowSpec>,
    text_ready: bool,
    shut_down: bool,
    events: EventQueue,
    renderer: Renderer,
    fonts: FontStore,
    mixer: Mixer,
    messages: Vec<(String, String)>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::with_config(HeadlessConfig::default())
    }

    pub fn with_config(config: HeadlessConfig) -> Self {
        Self {
            config,
            started: Instant::now(),
            window: None,
            text_ready: false,
            shut_down: false,
            events: EventQueue::new(),
            renderer: Renderer::new(),
            fonts: FontStore::default(),
            mixer: Mixer::default(),
            messages: Vec::new(),
        }
    }

    /// Handle for feeding input events, usable from any thread.
    pub fn injector(&self) -> EventInjector {
        self.events.injector()
    }

    fn require_video(&self) -> Result<(), BackendError> {
        match self.window {
            Some(_) => Ok(()),
            None => Err(BackendError::NotInitialized("video")),
        }
    }

    //=====================================================================
    // Inspection
    //=====================================================================

    pub fn window(&self) -> Option<&WindowSpec> {
        self.window.as_ref()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn frames_presented(&self) -> u64 {
        self.renderer.frames()
    }

    /// Commands of the most recently presented frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        self.renderer.last_frame()
    }

    /// Commands drawn since the last present.
    pub fn pending_commands(&self) -> &[DrawCommand] {
        self.renderer.pending()
    }

    pub fn texture_count(&self) -> usize {
        self.renderer.texture_count()
    }

    /// Uploaded pixels, after color key and alpha were applied.
    pub fn texture_pixels(&self, key: TextureKey) -> Option<&RgbaImage> {
        self.renderer.texture_pixels(key)
    }

    pub fn texture_blend_mode(&self, key: TextureKey) -> Option<BlendMode> {
        self.renderer.texture_blend_mode(key)
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    /// Parameters the audio device was opened with.
    pub fn audio_device(&self) -> Option<&AudioSpec> {
        self.mixer.device()
    }

    pub fn busy_channels(&self) -> usize {
        self.mixer.busy_channels()
    }

    /// Sounds started since audio was opened.
    pub fn total_sound_plays(&self) -> u64 {
        self.mixer.total_plays()
    }

    pub fn active_music(&self) -> Option<MusicKey> {
        self.mixer.active_music()
    }

    /// Message boxes shown so far, as (title, message).
    pub fn messages(&self) -> &[(String, String)] {
        &self.messages
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Backend Implementation
//=========================================================================

impl Backend for HeadlessBackend {
    type Surface = Surface;

    //--- Subsystem Bring-up -----------------------------------------------

    fn init_video(&mut self, window: &WindowSpec) -> Result<(), BackendError> {
        if self.config.fail_video_init {
            return Err(BackendError::Window("no display available".into()));
        }

        info!(
            target: "platform",
            "Headless window '{}' {}x{} ({:?} scaling)",
            window.title, window.width, window.height, window.scale_quality
        );
        self.window = Some(window.clone());
        self.events.reopen();
        self.shut_down = false;
        Ok(())
    }

    fn init_audio(&mut self, audio: &AudioSpec) -> Result<(), BackendError> {
        if self.config.fail_audio_init {
            return Err(BackendError::Audio("no audio device available".into()));
        }

        info!(
            target: "platform",
            "Headless audio {} Hz {:?} {}ch, {} mixing channels",
            audio.frequency, audio.format, audio.channels, audio.mix_channels
        );
        self.mixer.open(audio);
        Ok(())
    }

    fn init_text(&mut self) -> Result<(), BackendError> {
        if self.config.fail_text_init {
            return Err(BackendError::Font("text engine unavailable".into()));
        }
        self.text_ready = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }

        self.mixer.close();
        self.fonts.clear();
        self.renderer.reset();
        self.events.close();
        self.text_ready = false;
        self.window = None;
        self.shut_down = true;
        debug!(target: "platform", "Headless backend shut down");
    }

    fn show_message_box(&mut self, title: &str, message: &str) {
        error!(target: "platform", "[{}] {}", title, message);
        eprintln!("{}: {}", title, message);
        self.messages.push((title.to_owned(), message.to_owned()));
    }

    //--- Renderer ---------------------------------------------------------

    fn set_draw_color(&mut self, color: Color) {
        self.renderer.set_draw_color(color);
    }

    fn draw_color(&self) -> Color {
        self.renderer.draw_color()
    }

    fn clear(&mut self) -> Result<(), BackendError> {
        self.require_video()?;
        self.renderer.clear();
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> Result<(), BackendError> {
        self.require_video()?;
        self.renderer.fill_rect(rect);
        Ok(())
    }

    fn copy_texture(
        &mut self,
        texture: TextureKey,
        dest: Rect,
        angle: f64,
        flip: Flip,
    ) -> Result<(), BackendError> {
        self.require_video()?;
        self.renderer.copy_texture(texture, dest, angle, flip)
    }

    fn present(&mut self) {
        if self.window.is_some() {
            self.renderer.present();
        }
    }

    //--- Events -----------------------------------------------------------

    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.events.poll()
    }

    fn keyboard_state(&self) -> &KeySnapshot {
        self.events.keys()
    }

    //--- Image ------------------------------------------------------------

    fn load_surface(&mut self, path: &Path) -> Result<Surface, BackendError> {
        Surface::load(path)
    }

    fn set_color_key(&mut self, surface: &mut Surface, key: Color) {
        surface.set_color_key(key);
    }

    fn set_surface_alpha(&mut self, surface: &mut Surface, alpha: u8) {
        surface.set_alpha_mod(alpha);
    }

    fn surface_size(&self, surface: &Surface) -> (u32, u32) {
        surface.size()
    }

    fn create_texture(&mut self, surface: &Surface) -> Result<TextureKey, BackendError> {
        self.require_video()?;
        Ok(self.renderer.create_texture(surface.bake()))
    }

    fn set_texture_blend_mode(
        &mut self,
        texture: TextureKey,
        mode: BlendMode,
    ) -> Result<(), BackendError> {
        self.renderer.set_blend_mode(texture, mode)
    }

    fn free_surface(&mut self, surface: Surface) {
        drop(surface);
    }

    fn destroy_texture(&mut self, texture: TextureKey) {
        self.renderer.destroy_texture(texture);
    }

    //--- Text -------------------------------------------------------------

    fn open_font(&mut self, path: &Path, size: u32) -> Result<FontKey, BackendError> {
        if !self.text_ready {
            return Err(BackendError::NotInitialized("text"));
        }
        self.fonts.open(path, size)
    }

    fn render_text(&mut self, font: FontKey, text: &str, color: Color) -> Result<Surface, BackendError> {
        if !self.text_ready {
            return Err(BackendError::NotInitialized("text"));
        }
        self.fonts.render(font, text, color)
    }

    fn close_font(&mut self, font: FontKey) {
        self.fonts.close(font);
    }

    //--- Audio ------------------------------------------------------------

    fn load_chunk(&mut self, path: &Path) -> Result<SoundKey, BackendError> {
        self.mixer.load_chunk(path)
    }

    fn load_music(&mut self, path: &Path) -> Result<MusicKey, BackendError> {
        self.mixer.load_music(path)
    }

    fn play_channel(&mut self, chunk: SoundKey, repeat: Repeat) -> Result<Option<usize>, BackendError> {
        self.mixer.play(chunk, repeat)
    }

    fn play_music(&mut self, music: MusicKey, repeat: Repeat) -> Result<(), BackendError> {
        self.mixer.play_music(music, repeat)
    }

    fn halt_channels(&mut self) {
        self.mixer.halt_channels();
    }

    fn halt_music(&mut self) {
        self.mixer.halt_music();
    }

    fn free_chunk(&mut self, chunk: SoundKey) {
        self.mixer.free_chunk(chunk);
    }

    fn free_music(&mut self, music: MusicKey) {
        self.mixer.free_music(music);
    }

    //--- Timing -----------------------------------------------------------

    fn ticks(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn delay(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
