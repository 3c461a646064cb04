//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_facade::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Context
pub use crate::context::{Context, ContextBuilder, InitError, Subsystem};

// Geometry and drawing
pub use crate::core::color::Color;
pub use crate::core::draw::{BlendMode, Flip};
pub use crate::core::geometry::{intersects, point_in, Rect};

// Input
pub use crate::core::input::{ButtonState, MouseButton, ScanCode};

// Resources
pub use crate::core::resource::{
    Font, Music, Repeat, ResourceLoadError, Sound, Texture, TextureOptions,
};

// Platform
pub use crate::platform::headless::HeadlessBackend;
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub use crate::platform::windowed::WindowedBackend;
pub use crate::platform::{AudioSpec, Backend, ScaleQuality};
