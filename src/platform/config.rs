//=========================================================================
// Subsystem Configuration
//=========================================================================
//
// Plain configuration values handed to `Backend::init_*`.
//
//=========================================================================

//=== WindowSpec ==========================================================

/// Texture filtering used when the logical resolution is scaled to the
/// real window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleQuality {
    Nearest,
    #[default]
    Linear,
}

/// Window and renderer parameters.
///
/// `width` × `height` is both the initial window size and the fixed
/// logical resolution, so downstream geometry never depends on the real
/// window size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub scale_quality: ScaleQuality,
}

//=== AudioSpec ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Signed 16-bit, native byte order.
    S16,
    F32,
}

/// Audio device parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpec {
    /// Output sample rate in Hz.
    pub frequency: u32,
    pub format: SampleFormat,
    /// 1 = mono, 2 = stereo.
    pub channels: u16,
    /// Samples per mixing chunk.
    pub chunk_size: u32,
    /// Number of mixing channels available to overlapping sounds.
    pub mix_channels: usize,
}

impl Default for AudioSpec {
    fn default() -> Self {
        Self {
            frequency: 22_050,
            format: SampleFormat::S16,
            channels: 2,
            chunk_size: 640,
            mix_channels: 8,
        }
    }
}
