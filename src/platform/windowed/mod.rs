//=========================================================================
// Windowed Backend
//
// A `Backend` with a real OS window driven by Winit.
//
// Architecture:
// ```text
//   poll_event ──> pending empty? ──> EventLoop::pump_app_events(0 ms)
//                                        │
//                                        ↓
//                                   WindowState (ApplicationHandler)
//                                    ├─ event_mapper: Winit → PlatformEvent
//                                    ├─ key snapshot
//                                    └─ pending: VecDeque<PlatformEvent>
// ```
//
// The event loop is pumped from the frame-loop thread instead of owning
// it, so the facade keeps its poll-driven shape. Images, text, audio and
// draw recording share the headless collaborators; frames are recorded,
// not composited onto the window.
//
// Winit allows one event loop per process, so the loop is created by the
// first `init_video` and outlives `shutdown`.
//
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info, trace};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

//=== Internal Dependencies ===============================================

use super::config::{AudioSpec, WindowSpec};
use super::headless::{DrawCommand, FontStore, Mixer, Renderer, Surface};
use super::interface::{Backend, BackendError};
use crate::core::color::Color;
use crate::core::draw::{BlendMode, Flip};
use crate::core::geometry::Rect;
use crate::core::input::event::{MouseButton, PlatformEvent, ScanCode};
use crate::core::input::keyboard::KeySnapshot;
use crate::core::resource::{FontKey, MusicKey, Repeat, SoundKey, TextureKey};
use event_mapper::{key_event, to_logical, wheel_steps, ClickCounter};

/// Pumps allowed for the platform to deliver `resumed` after `init_video`.
const WINDOW_CREATE_PUMPS: usize = 8;

//=== WindowState =========================================================

/// Everything the Winit callbacks touch.
struct WindowState {
    spec: Option<WindowSpec>,
    window: Option<Window>,
    create_error: Option<String>,
    pending: VecDeque<PlatformEvent>,
    keys: KeySnapshot,
    cursor: (i32, i32),
    clicks: ClickCounter,
}

impl WindowState {
    fn new() -> Self {
        Self {
            spec: None,
            window: None,
            create_error: None,
            pending: VecDeque::with_capacity(64),
            keys: [false; ScanCode::COUNT],
            cursor: (0, 0),
            clicks: ClickCounter::default(),
        }
    }

    /// Creates the requested window once the platform allows it.
    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.create_error.is_some() {
            return;
        }
        let Some(spec) = &self.spec else {
            return;
        };

        let attrs = WindowAttributes::default()
            .with_title(spec.title.clone())
            .with_inner_size(LogicalSize::new(spec.width, spec.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.create_error = Some(e.to_string());
            }
        }
    }

    /// Queues an event, keeping the key snapshot in step.
    fn push(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::KeyDown { scancode, .. } => self.keys[scancode.index()] = true,
            PlatformEvent::KeyUp { scancode } => self.keys[scancode.index()] = false,
            _ => {}
        }
        self.pending.push_back(event);
    }

    //--- Event Folding ----------------------------------------------------

    fn on_cursor(&mut self, position: PhysicalPosition<f64>, window: (u32, u32)) {
        let logical = self.spec.as_ref().map_or(window, |s| (s.width, s.height));
        self.cursor = to_logical(position, window, logical);
        let (x, y) = self.cursor;
        self.push(PlatformEvent::MouseMotion { x, y });
    }

    fn on_button(&mut self, button: WinitMouseButton, state: ElementState, now: Instant) {
        let button = MouseButton::from(button);
        let clicks = match state {
            ElementState::Pressed => self.clicks.press(button, now, self.cursor),
            ElementState::Released => self.clicks.release(button),
        };
        let (x, y) = self.cursor;
        self.push(PlatformEvent::MouseButton {
            button,
            state: state.into(),
            clicks,
            x,
            y,
        });
    }

    fn on_wheel(&mut self, delta: MouseScrollDelta) {
        match wheel_steps(delta) {
            (0, 0) => {}
            (x, y) => self.push(PlatformEvent::MouseWheel { x, y }),
        }
    }

    /// Key-up events are not delivered while unfocused; release everything.
    fn on_focus_lost(&mut self) {
        self.keys = [false; ScanCode::COUNT];
    }

    fn close(&mut self) {
        self.window = None;
        self.spec = None;
        self.create_error = None;
        self.pending.clear();
        self.keys = [false; ScanCode::COUNT];
        self.cursor = (0, 0);
        self.clicks = ClickCounter::default();
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_window(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.push(PlatformEvent::Quit);
            }

            WindowEvent::KeyboardInput { event: key, .. } => {
                match key_event(key.physical_key, key.state, key.repeat) {
                    Some(event) => self.push(event),
                    None => trace!(target: "platform", "Unmapped key ignored"),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.on_button(button, state, Instant::now());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let size = self
                    .window
                    .as_ref()
                    .map(|w| w.inner_size())
                    .map_or((0, 0), |s| (s.width, s.height));
                self.on_cursor(position, size);
            }

            WindowEvent::MouseWheel { delta, .. } => self.on_wheel(delta),

            WindowEvent::Focused(false) => self.on_focus_lost(),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Re-init after shutdown gets no second `resumed`
        self.ensure_window(event_loop);
    }
}

//=== WindowedBackend =====================================================

/// Backend with an OS window.
///
/// Must live on the main thread: Winit refuses to create its event loop
/// anywhere else on most platforms.
pub struct WindowedBackend {
    started: Instant,
    event_loop: Option<EventLoop<()>>,
    state: WindowState,
    text_ready: bool,
    shut_down: bool,
    renderer: Renderer,
    fonts: FontStore,
    mixer: Mixer,
}

impl WindowedBackend {
    /// No OS resources are touched until `init_video`.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            event_loop: None,
            state: WindowState::new(),
            text_ready: false,
            shut_down: false,
            renderer: Renderer::new(),
            fonts: FontStore::default(),
            mixer: Mixer::default(),
        }
    }

    /// Delivers whatever the OS has queued, without blocking.
    fn pump(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.state) {
            debug!(target: "platform", "Event loop exited with code {}", code);
            self.state.push(PlatformEvent::Quit);
        }
    }

    fn require_video(&self) -> Result<(), BackendError> {
        match self.state.window {
            Some(_) => Ok(()),
            None => Err(BackendError::NotInitialized("video")),
        }
    }

    //=====================================================================
    // Inspection
    //=====================================================================

    /// Current inner size of the window in physical pixels.
    pub fn window_size(&self) -> Option<(u32, u32)> {
        self.state.window.as_ref().map(|w| {
            let size = w.inner_size();
            (size.width, size.height)
        })
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
}

impl Default for WindowedBackend {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Backend Implementation
//=========================================================================

impl Backend for WindowedBackend {
    type Surface = Surface;

    //--- Subsystem Bring-up -----------------------------------------------

    fn init_video(&mut self, window: &WindowSpec) -> Result<(), BackendError> {
        if self.event_loop.is_none() {
            let event_loop = EventLoop::new().map_err(|e| BackendError::Window(e.to_string()))?;
            event_loop.set_control_flow(ControlFlow::Poll);
            self.event_loop = Some(event_loop);
        }

        self.state.close();
        self.state.spec = Some(window.clone());
        for _ in 0..WINDOW_CREATE_PUMPS {
            self.pump();
            if self.state.window.is_some() || self.state.create_error.is_some() {
                break;
            }
        }

        if let Some(err) = self.state.create_error.take() {
            self.state.spec = None;
            return Err(BackendError::Window(err));
        }
        if self.state.window.is_none() {
            self.state.spec = None;
            return Err(BackendError::Window("platform never resumed the application".into()));
        }

        info!(
            target: "platform",
            "Window '{}' {}x{} logical ({:?} scaling)",
            window.title, window.width, window.height, window.scale_quality
        );
        self.shut_down = false;
        Ok(())
    }

    fn init_audio(&mut self, audio: &AudioSpec) -> Result<(), BackendError> {
        info!(
            target: "platform",
            "Audio {} Hz {:?} {}ch, {} mixing channels",
            audio.frequency, audio.format, audio.channels, audio.mix_channels
        );
        self.mixer.open(audio);
        Ok(())
    }

    fn init_text(&mut self) -> Result<(), BackendError> {
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
        self.state.close();
        self.text_ready = false;
        self.shut_down = true;
        debug!(target: "platform", "Windowed backend shut down");
    }

    fn show_message_box(&mut self, title: &str, message: &str) {
        error!(target: "platform", "[{}] {}", title, message);
        eprintln!("{}: {}", title, message);
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
        if let Some(window) = &self.state.window {
            window.pre_present_notify();
            self.renderer.present();
        }
    }

    //--- Events -----------------------------------------------------------

    fn poll_event(&mut self) -> Option<PlatformEvent> {
        if self.state.pending.is_empty() {
            self.pump();
        }
        self.state.pending.pop_front()
    }

    fn keyboard_state(&self) -> &KeySnapshot {
        &self.state.keys
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
//
// Nothing here opens a window; the event folding is driven directly.
//
