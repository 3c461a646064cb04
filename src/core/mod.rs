//=========================================================================
// Core
//
// Backend-independent building blocks of the facade.
//
// Modules:
// - `geometry`: rectangles, overlap and containment tests
// - `color`: RGBA colors
// - `input`: per-frame keyboard and mouse state
// - `resource`: texture, font, sound and music handles
// - `draw`: drawing operations on the context
//
//=========================================================================

pub mod color;
pub mod draw;
pub mod geometry;
pub mod input;
pub mod resource;
