//=========================================================================
// Resources
//
// Owning wrappers around backend-resident handles.
//
// Ownership rules:
// - None of the handle types is `Clone` or `Copy`; whoever holds the
//   value owns the backend resource
// - `Texture` is released in place: the handle is taken out and the size
//   zeroed, so a second release finds nothing to free
// - `Font`, `Sound` and `Music` are released by value, so use after free
//   does not compile
// - Nothing is released implicitly; dropping a live handle leaks the
//   backend resource until shutdown
//
//=========================================================================

//=== Submodules ==========================================================

mod error;
mod manager;

pub use error::{ResourceLoadError, ResourceOp};
pub use manager::TextureOptions;

//=== Backend Keys ========================================================

slotmap::new_key_type! {
    /// Backend key of a GPU-resident texture.
    pub struct TextureKey;
    /// Backend key of an open font.
    pub struct FontKey;
    /// Backend key of a decoded sound chunk.
    pub struct SoundKey;
    /// Backend key of a music stream.
    pub struct MusicKey;
}

//=== Texture =============================================================

/// A drawable image living in the backend.
///
/// Width and height are fixed at creation. After
/// [`Context::free_texture`](crate::Context::free_texture) the texture is
/// inert: no handle, zero size.
#[derive(Debug)]
pub struct Texture {
    handle: Option<TextureKey>,
    width: u32,
    height: u32,
}

impl Texture {
    pub(crate) fn new(handle: TextureKey, width: u32, height: u32) -> Self {
        Self {
            handle: Some(handle),
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Backend key, or `None` once freed.
    pub fn handle(&self) -> Option<TextureKey> {
        self.handle
    }

    pub fn is_freed(&self) -> bool {
        self.handle.is_none()
    }

    /// Takes the handle out and zeroes the size.
    pub(crate) fn release(&mut self) -> Option<TextureKey> {
        self.width = 0;
        self.height = 0;
        self.handle.take()
    }
}

impl Default for Texture {
    /// An inert texture, handy as a placeholder before the first render.
    fn default() -> Self {
        Self {
            handle: None,
            width: 0,
            height: 0,
        }
    }
}

//=== Font ================================================================

/// An open scalable font at a fixed pixel size.
///
/// Only used as input to
/// [`Context::create_font_texture`](crate::Context::create_font_texture).
#[derive(Debug)]
pub struct Font {
    pub(crate) handle: FontKey,
    size: u32,
}

impl Font {
    pub(crate) fn new(handle: FontKey, size: u32) -> Self {
        Self { handle, size }
    }

    /// Pixel size the font was opened at.
    pub fn size(&self) -> u32 {
        self.size
    }
}

//=== Sound / Music =======================================================

/// A short sample; any number of instances may play at once.
#[derive(Debug)]
pub struct Sound {
    pub(crate) handle: SoundKey,
}

/// A streamed track; only one plays at a time, system-wide.
#[derive(Debug)]
pub struct Music {
    pub(crate) handle: MusicKey,
}

//=== Repeat ==============================================================

/// How many times a sound or track plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Play this many times in total. `Times(0)` plays nothing.
    Times(u32),
    /// Loop until halted.
    Forever,
}

impl Repeat {
    pub const ONCE: Self = Repeat::Times(1);

    /// Returns `true` if nothing would be played.
    pub fn is_silent(self) -> bool {
        self == Repeat::Times(0)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
