//=========================================================================
// Resource Errors
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::platform::BackendError;

//=== ResourceOp ==========================================================

/// The load/create operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOp {
    LoadTexture,
    LoadFont,
    LoadSound,
    LoadMusic,
    RenderText,
}

impl fmt::Display for ResourceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoadTexture => "load texture",
            Self::LoadFont => "load font",
            Self::LoadSound => "load sound",
            Self::LoadMusic => "load music",
            Self::RenderText => "render text",
        };
        f.write_str(name)
    }
}

//=== ResourceLoadError ===================================================

/// A resource could not be created.
///
/// `path` names the file for file loads and the rendered text for
/// [`ResourceOp::RenderText`].
#[derive(Debug, Error)]
#[error("failed to {op} '{}': {source}", .path.display())]
pub struct ResourceLoadError {
    pub op: ResourceOp,
    pub path: PathBuf,
    #[source]
    pub source: BackendError,
}

impl ResourceLoadError {
    pub(crate) fn new(op: ResourceOp, path: impl Into<PathBuf>, source: BackendError) -> Self {
        Self {
            op,
            path: path.into(),
            source,
        }
    }
}
