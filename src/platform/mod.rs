//=========================================================================
// Platform Layer
//
// The backend contract and its implementations.
//
// Architecture:
// ```text
//   Context<B> ──> B: Backend ──> window / renderer
//                                 event queue
//                                 image decoder
//                                 text rasterizer
//                                 audio mixer
// ```
//
// Responsibilities:
// - Define the `Backend` trait every collaborator sits behind
// - Carry the window and audio parameters handed to subsystem bring-up
// - Provide `HeadlessBackend`, a device-free implementation driven by
//   injected events
// - Provide `WindowedBackend`, which pumps a Winit event loop for a real
//   OS window
//
//=========================================================================

//=== Submodules ==========================================================

mod interface;
mod config;

pub mod headless;

// Desktop targets only: the pump-events extension is unavailable on web and iOS
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub mod windowed;

//=== Public Exports ======================================================

pub use interface::{Backend, BackendError};
pub use config::{AudioSpec, SampleFormat, ScaleQuality, WindowSpec};
