//=========================================================================
// Aetheric Facade - Library Root
//
// A thin, beginner-oriented 2D multimedia facade: one context, a fixed
// logical resolution, edge-triggered input, owned resource handles and
// immediate-mode drawing.
//
// Typical usage:
// ```no_run
// use aetheric_facade::prelude::*;
//
// let mut ctx = ContextBuilder::new("Ball Follow", 640, 480)
//     .build_or_exit(HeadlessBackend::new());
//
// while ctx.is_running() {
//     let start = ctx.ticks();
//     ctx.update_events();
//     ctx.clear();
//     ctx.fill_rect(Rect::new(10, 10, 20, 20), Color::RED, 255);
//     ctx.present();
//     ctx.pace_frame(start, 16);
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the backend-independent types and the input, resource and
// draw operations. `platform` holds the backend contract, the headless
// implementation and the Winit-backed windowed one.
//
pub mod core;
pub mod platform;
pub mod prelude;

mod context;

//--- Public Exports ------------------------------------------------------

pub use context::{Context, ContextBuilder, InitError, Subsystem};
pub use crate::core::color::Color;
pub use crate::core::draw::{BlendMode, Flip};
pub use crate::core::geometry::{intersects, point_in, Rect};
