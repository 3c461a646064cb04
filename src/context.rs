//=========================================================================
// Runtime Context
//
// One-shot subsystem bring-up, the running flag, and frame pacing.
//
// Architecture:
// ```text
//     ContextBuilder  ──build(backend)──>  Context<B>
//         │                                  │
//         ├─ with_background()               ├─ update_events()   (input)
//         ├─ with_audio()                    ├─ draw_* / fill_rect (draw)
//         └─ with_scale_quality()            ├─ load_* / free_*   (resources)
//                                            └─ present(), pace_frame()
// ```
//
// Per frame:
//   update_events() → queries → clear() → draw calls → present() → delay
//
//=========================================================================

//=== External Dependencies ===============================================

use std::error::Error as StdError;
use std::fmt;

use log::{error, info};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::color::Color;
use crate::core::geometry::Rect;
use crate::core::input::{ButtonState, InputSystem, MouseButton, MouseState, ScanCode, TickControl};
use crate::platform::{AudioSpec, Backend, BackendError, ScaleQuality, WindowSpec};

//=== InitError ===========================================================

/// The subsystem whose bring-up failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    Video,
    Audio,
    Text,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
        })
    }
}

/// Context initialization failed. There is no partially initialized state:
/// every subsystem brought up before the failure has been shut down again.
#[derive(Debug, Error)]
#[error("failed to initialize {subsystem} subsystem: {source}")]
pub struct InitError {
    pub subsystem: Subsystem,
    #[source]
    pub source: BackendError,
}

//=== ContextBuilder ======================================================

/// Builder for configuring and constructing a [`Context`].
///
/// # Default Values
///
/// - **Background**: opaque white
/// - **Scale quality**: linear
/// - **Audio**: 22050 Hz, signed 16-bit, stereo, 640-sample chunks,
///   8 mixing channels
///
/// # Examples
///
/// ```no_run
/// use aetheric_facade::prelude::*;
///
/// let mut ctx = ContextBuilder::new("Breakout", 814, 600)
///     .with_background(Color::BLACK)
///     .build_or_exit(HeadlessBackend::new());
///
/// while ctx.is_running() {
///     let start = ctx.ticks();
///     ctx.update_events();
///     ctx.clear();
///     // draw...
///     ctx.present();
///     ctx.pace_frame(start, 10);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    window: WindowSpec,
    background: Color,
    audio: AudioSpec,
}

impl ContextBuilder {
    /// Creates a builder for a `width` × `height` window.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );

        Self {
            window: WindowSpec {
                title: title.into(),
                width,
                height,
                scale_quality: ScaleQuality::default(),
            },
            background: Color::WHITE,
            audio: AudioSpec::default(),
        }
    }

    /// Sets the color `clear()` fills the screen with.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Sets the audio device parameters.
    ///
    /// # Panics
    ///
    /// Panics if the frequency, channel count or mixing channel count is zero.
    pub fn with_audio(mut self, audio: AudioSpec) -> Self {
        assert!(audio.frequency > 0, "Audio frequency must be positive");
        assert!(audio.channels > 0, "Audio channel count must be positive");
        assert!(audio.mix_channels > 0, "Mixing channel count must be positive");
        self.audio = audio;
        self
    }

    /// Sets the filter used when scaling the logical resolution.
    pub fn with_scale_quality(mut self, quality: ScaleQuality) -> Self {
        self.window.scale_quality = quality;
        self
    }

    //--- Build ------------------------------------------------------------

    /// Brings up video, audio and text on `backend`, in that order.
    ///
    /// # Errors
    ///
    /// Returns the first failing subsystem. The backend is shut down
    /// before the error is returned.
    pub fn build<B: Backend>(self, mut backend: B) -> Result<Context<B>, InitError> {
        match self.init_subsystems(&mut backend) {
            Ok(()) => Ok(self.into_context(backend)),
            Err(e) => {
                backend.shutdown();
                Err(e)
            }
        }
    }

    /// Like [`build`](Self::build), but reports a failure to the user and
    /// terminates the process.
    pub fn build_or_exit<B: Backend>(self, mut backend: B) -> Context<B> {
        match self.init_subsystems(&mut backend) {
            Ok(()) => self.into_context(backend),
            Err(e) => {
                report_fatal(&mut backend, "Initialization failed", &e);
                backend.shutdown();
                std::process::exit(1);
            }
        }
    }

    fn init_subsystems<B: Backend>(&self, backend: &mut B) -> Result<(), InitError> {
        info!(
            target: "platform",
            "Initializing context '{}' ({}x{})",
            self.window.title, self.window.width, self.window.height
        );

        backend
            .init_video(&self.window)
            .map_err(|source| InitError { subsystem: Subsystem::Video, source })?;
        backend.set_draw_color(self.background);

        backend
            .init_audio(&self.audio)
            .map_err(|source| InitError { subsystem: Subsystem::Audio, source })?;

        backend
            .init_text()
            .map_err(|source| InitError { subsystem: Subsystem::Text, source })?;

        info!(target: "platform", "All subsystems initialized");
        Ok(())
    }

    fn into_context<B: Backend>(self, backend: B) -> Context<B> {
        Context {
            backend,
            input: InputSystem::new(),
            running: true,
            background: self.background,
            window: self.window,
            shut_down: false,
        }
    }
}

//=== Context =============================================================

/// The single active runtime context.
///
/// Owns the backend, the input state and the running flag. Everything the
/// application does per frame goes through this value; see the draw and
/// resource methods in [`crate::core::draw`] and
/// [`crate::core::resource`].
pub struct Context<B: Backend> {
    pub(crate) backend: B,
    pub(crate) input: InputSystem,
    running: bool,
    pub(crate) background: Color,
    window: WindowSpec,
    shut_down: bool,
}

impl<B: Backend> Context<B> {
    //--- Running Flag -----------------------------------------------------

    /// Returns `false` once a quit request, an Escape press, or
    /// [`stop`](Self::stop) has been observed.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ends the frame loop at the next `is_running` check.
    pub fn stop(&mut self) {
        info!(target: "platform", "Stop requested");
        self.running = false;
    }

    //--- Input ------------------------------------------------------------

    /// Drains this frame's events and refreshes input state.
    ///
    /// Call exactly once per frame, before any input query.
    pub fn update_events(&mut self) {
        if self.input.update(&mut self.backend) == TickControl::Exit && self.running {
            info!(target: "input", "Exit requested by platform event");
            self.running = false;
        }
    }

    pub fn input(&self) -> &InputSystem {
        &self.input
    }

    pub fn mouse(&self) -> &MouseState {
        self.input.mouse()
    }

    /// See [`InputSystem::key_pressed`].
    pub fn key_pressed(&self, code: ScanCode) -> bool {
        self.input.key_pressed(code)
    }

    /// See [`InputSystem::key_released`].
    pub fn key_released(&self, code: ScanCode) -> bool {
        self.input.key_released(code)
    }

    /// See [`InputSystem::key_held`].
    pub fn key_held(&self, code: ScanCode) -> bool {
        self.input.key_held(code)
    }

    /// See [`InputSystem::key_down`].
    pub fn key_down(&self, code: ScanCode) -> bool {
        self.input.key_down(code)
    }

    /// See [`InputSystem::mouse_event_is`].
    pub fn mouse_event_is(&self, button: MouseButton, clicks: u8, state: ButtonState) -> bool {
        self.input.mouse_event_is(button, clicks, state)
    }

    pub fn mouse_position(&self) -> (i32, i32) {
        self.input.mouse_position()
    }

    pub fn mouse_clicked(&self) -> bool {
        self.input.mouse_clicked()
    }

    pub fn mouse_in(&self, rect: &Rect) -> bool {
        self.input.mouse_in(rect)
    }

    //--- Timing -----------------------------------------------------------

    /// Milliseconds since the backend started.
    pub fn ticks(&self) -> u64 {
        self.backend.ticks()
    }

    /// Blocks the whole thread for `ms` milliseconds.
    pub fn delay(&mut self, ms: u32) {
        self.backend.delay(ms);
    }

    /// Sleeps whatever is left of a `frame_ms` budget that began at
    /// `frame_start` (a value of [`ticks`](Self::ticks)). Returns the
    /// milliseconds slept.
    pub fn pace_frame(&mut self, frame_start: u64, frame_ms: u32) -> u32 {
        let elapsed = self.ticks().saturating_sub(frame_start);
        let remaining = u64::from(frame_ms).saturating_sub(elapsed) as u32;
        if remaining > 0 {
            self.delay(remaining);
        }
        remaining
    }

    //--- Accessors --------------------------------------------------------

    /// Logical resolution (equals the requested window size).
    pub fn logical_size(&self) -> (u32, u32) {
        (self.window.width, self.window.height)
    }

    pub fn title(&self) -> &str {
        &self.window.title
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    //--- Fatal Errors -----------------------------------------------------

    /// Unwraps `result`, or reports the error to the user and terminates.
    ///
    /// This is the fail-fast policy for bundled assets:
    ///
    /// ```no_run
    /// # use aetheric_facade::prelude::*;
    /// # let mut ctx = ContextBuilder::new("x", 8, 8).build_or_exit(HeadlessBackend::new());
    /// let result = ctx.load_texture("assets/ball.png", TextureOptions::default());
    /// let ball = ctx.or_exit(result);
    /// ```
    pub fn or_exit<T, E>(&mut self, result: Result<T, E>) -> T
    where
        E: StdError,
    {
        match result {
            Ok(value) => value,
            Err(e) => {
                report_fatal(&mut self.backend, "Fatal error", &e);
                self.shutdown();
                std::process::exit(1);
            }
        }
    }

    //--- Teardown ---------------------------------------------------------

    /// Stops all audio and shuts the backend down. Idempotent; also runs
    /// on drop.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.running = false;

        self.backend.halt_channels();
        self.backend.halt_music();
        self.backend.shutdown();
        info!(target: "platform", "Context shut down");
    }
}

impl<B: Backend> Drop for Context<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//--- Internal Helpers ----------------------------------------------------

fn report_fatal<B: Backend>(backend: &mut B, title: &str, err: &dyn StdError) {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    error!(target: "platform", "{}: {}", title, message);
    backend.show_message_box(title, &message);
}

//=========================================================================
// Unit Tests
//=========================================================================
