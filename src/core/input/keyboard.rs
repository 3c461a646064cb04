//=========================================================================
// Keyboard State
//=========================================================================
//
// Double-buffered keyboard snapshot.
//
// Architecture:
//   backend snapshot → current ; current → previous (once per update)
//
// Edge queries are a pure diff of the two buffers:
//
// ```text
//   previous  current   meaning
//   --------  -------   --------
//   up        down      pressed
//   down      down      held
//   down      up        released
//   up        up        (none)
// ```
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::event::ScanCode;

/// Level-triggered key snapshot, indexed by [`ScanCode::index`].
pub type KeySnapshot = [bool; ScanCode::COUNT];

//=== KeyboardState =======================================================

/// Current and previous keyboard snapshots.
///
/// Both buffers start "all released", so a key that is already down on
/// the first update reports as pressed, not held.
#[derive(Debug, Clone)]
pub struct KeyboardState {
    current: KeySnapshot,
    previous: KeySnapshot,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self {
            current: [false; ScanCode::COUNT],
            previous: [false; ScanCode::COUNT],
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Copies the current snapshot into the previous slot.
    pub(super) fn advance(&mut self) {
        self.previous = self.current;
    }

    /// Replaces the current snapshot with a fresh read from the backend.
    pub(super) fn load(&mut self, snapshot: &KeySnapshot) {
        self.current.copy_from_slice(snapshot);
    }

    //--- Queries ----------------------------------------------------------

    /// Key went down this frame.
    #[inline]
    pub fn pressed(&self, code: ScanCode) -> bool {
        !self.previous[code.index()] && self.current[code.index()]
    }

    /// Key went up this frame.
    #[inline]
    pub fn released(&self, code: ScanCode) -> bool {
        self.previous[code.index()] && !self.current[code.index()]
    }

    /// Key was down last frame and still is.
    #[inline]
    pub fn held(&self, code: ScanCode) -> bool {
        self.previous[code.index()] && self.current[code.index()]
    }

    /// Key is down right now, regardless of last frame.
    #[inline]
    pub fn down(&self, code: ScanCode) -> bool {
        self.current[code.index()]
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
