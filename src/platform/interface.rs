//=========================================================================
// Backend Interface
//=========================================================================
//
// The contract between the facade and the multimedia backend.
//
// Every collaborator the facade consumes is one group of methods here:
//
// ```text
//   rasterization/compositing   set_draw_color, clear, fill_rect,
//                               copy_texture, present
//   event queue                 poll_event, keyboard_state
//   image decoder               load_surface, set_color_key,
//                               set_surface_alpha, create_texture,
//                               free_surface
//   text rasterization          open_font, render_text
//   audio mixing                load_chunk, load_music, play_channel,
//                               play_music, halt_*, free_*
// ```
//
// The facade never validates handle liveness itself; a backend reports a
// stale key as `BackendError::InvalidHandle`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::error::Error as StdError;
use std::path::Path;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::config::{AudioSpec, WindowSpec};
use crate::core::color::Color;
use crate::core::draw::{BlendMode, Flip};
use crate::core::geometry::Rect;
use crate::core::input::event::PlatformEvent;
use crate::core::input::keyboard::KeySnapshot;
use crate::core::resource::{FontKey, MusicKey, Repeat, SoundKey, TextureKey};

//=== BackendError ========================================================

/// Failures reported by a backend collaborator.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A subsystem was used before its `init_*` call succeeded.
    #[error("{0} subsystem is not initialized")]
    NotInitialized(&'static str),

    /// Window or renderer creation failed.
    #[error("window creation failed: {0}")]
    Window(String),

    /// File could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Image data could not be decoded.
    #[error("image decode failed: {0}")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),

    /// Font could not be opened or text could not be rendered.
    #[error("font error: {0}")]
    Font(String),

    /// Audio data could not be loaded or played.
    #[error("audio error: {0}")]
    Audio(String),

    /// The key does not name a live backend resource.
    #[error("invalid or released handle")]
    InvalidHandle,
}

impl BackendError {
    /// Wraps any decoder error.
    pub fn decode<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Decode(Box::new(err))
    }
}

//=== Backend =============================================================

/// A multimedia backend driven by one frame-loop thread.
///
/// All methods are synchronous. Resource keys are allocated by the backend
/// and stay valid until the matching destroy/free call.
pub trait Backend {
    /// CPU-side decoded image, alive only between decode and upload.
    type Surface;

    //--- Subsystem Bring-up -----------------------------------------------

    /// Creates the window and renderer with a fixed logical resolution.
    fn init_video(&mut self, window: &WindowSpec) -> Result<(), BackendError>;

    /// Opens the audio device.
    fn init_audio(&mut self, audio: &AudioSpec) -> Result<(), BackendError>;

    /// Starts the text rasterizer.
    fn init_text(&mut self) -> Result<(), BackendError>;

    /// Tears every subsystem down. Must be safe to call more than once.
    fn shutdown(&mut self);

    /// Shows a blocking diagnostic to the user.
    fn show_message_box(&mut self, title: &str, message: &str);

    //--- Renderer ---------------------------------------------------------

    fn set_draw_color(&mut self, color: Color);

    fn draw_color(&self) -> Color;

    /// Fills the whole target with the current draw color.
    fn clear(&mut self) -> Result<(), BackendError>;

    /// Fills `rect` with the current draw color.
    fn fill_rect(&mut self, rect: Rect) -> Result<(), BackendError>;

    /// Copies the whole texture into `dest`, rotated clockwise by `angle`
    /// degrees around the center of `dest` and mirrored per `flip`.
    fn copy_texture(
        &mut self,
        texture: TextureKey,
        dest: Rect,
        angle: f64,
        flip: Flip,
    ) -> Result<(), BackendError>;

    /// Shows everything drawn since the last present.
    fn present(&mut self);

    //--- Events -----------------------------------------------------------

    /// Pops the next pending event. Pumping the queue also refreshes the
    /// keyboard snapshot.
    fn poll_event(&mut self) -> Option<PlatformEvent>;

    /// Level-triggered key state as of the last pump.
    fn keyboard_state(&self) -> &KeySnapshot;

    //--- Image ------------------------------------------------------------

    fn load_surface(&mut self, path: &Path) -> Result<Self::Surface, BackendError>;

    /// Pixels matching `key` (alpha ignored) become fully transparent on upload.
    fn set_color_key(&mut self, surface: &mut Self::Surface, key: Color);

    /// Uniform alpha multiplier applied on upload.
    fn set_surface_alpha(&mut self, surface: &mut Self::Surface, alpha: u8);

    fn surface_size(&self, surface: &Self::Surface) -> (u32, u32);

    fn create_texture(&mut self, surface: &Self::Surface) -> Result<TextureKey, BackendError>;

    fn set_texture_blend_mode(
        &mut self,
        texture: TextureKey,
        mode: BlendMode,
    ) -> Result<(), BackendError>;

    fn free_surface(&mut self, surface: Self::Surface);

    fn destroy_texture(&mut self, texture: TextureKey);

    //--- Text -------------------------------------------------------------

    /// Opens a scalable font at a fixed pixel size.
    fn open_font(&mut self, path: &Path, size: u32) -> Result<FontKey, BackendError>;

    fn render_text(
        &mut self,
        font: FontKey,
        text: &str,
        color: Color,
    ) -> Result<Self::Surface, BackendError>;

    fn close_font(&mut self, font: FontKey);

    //--- Audio ------------------------------------------------------------

    fn load_chunk(&mut self, path: &Path) -> Result<SoundKey, BackendError>;

    fn load_music(&mut self, path: &Path) -> Result<MusicKey, BackendError>;

    /// Plays on the first free channel. Returns the channel, or `None` if
    /// every channel is busy.
    fn play_channel(&mut self, chunk: SoundKey, repeat: Repeat)
        -> Result<Option<usize>, BackendError>;

    /// Starts `music`, replacing whatever stream was active.
    fn play_music(&mut self, music: MusicKey, repeat: Repeat) -> Result<(), BackendError>;

    fn halt_channels(&mut self);

    fn halt_music(&mut self);

    fn free_chunk(&mut self, chunk: SoundKey);

    fn free_music(&mut self, music: MusicKey);

    //--- Timing -----------------------------------------------------------

    /// Milliseconds since the backend was created. Monotonic.
    fn ticks(&self) -> u64;

    /// Blocks the calling thread for `ms` milliseconds.
    fn delay(&mut self, ms: u32);
}
