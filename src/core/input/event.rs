//=========================================================================
// Platform Event Types
//
// Defines the portable representation of everything the backend's event
// queue can deliver to the input system.
//
// Responsibilities:
// - Name physical keys by scan code (layout independent)
// - Name mouse buttons the way the backend numbers them
// - Carry click counts and pressed/released state for button events
// - Represent quit requests alongside input
//
// Event Flow:
// ```text
// Backend event queue
//         ↓
//    PlatformEvent (this module)
//         ↓
//    InputSystem::update() (folds events into keyboard/mouse state)
//         ↓
//    Edge-triggered queries (pressed / released / held)
// ```
//
//=========================================================================

//=== ScanCode ============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// `KeyA` is always the same physical key regardless of layout.
///
/// The discriminant doubles as the index into keyboard snapshots, so the
/// enum is `repr(usize)` and dense. [`ScanCode::COUNT`] is the snapshot
/// length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(usize)]
pub enum ScanCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Modifiers --------------------------------------------------------

    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Keys the backend reports but this enum does not name.
    ///
    /// Kept as the last variant so it is a valid snapshot index.
    Unidentified,
}

impl ScanCode {
    /// Number of scan codes, i.e. the length of a keyboard snapshot.
    pub const COUNT: usize = ScanCode::Unidentified as usize + 1;

    /// Index of this key in a keyboard snapshot.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The backend numbers buttons 1 (left), 2 (middle), 3 (right); anything
/// else (side and thumb buttons) arrives as `Other` with its raw number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Middle button (wheel click).
    Middle,

    /// Secondary button (typically right).
    Right,

    /// Side buttons, thumb buttons, macro keys.
    Other(u8),
}

impl From<u8> for MouseButton {
    fn from(raw: u8) -> Self {
        match raw {
            1 => MouseButton::Left,
            2 => MouseButton::Middle,
            3 => MouseButton::Right,
            other => MouseButton::Other(other),
        }
    }
}

//=== ButtonState =========================================================

/// Whether a button event was a press or a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Pressed,
    Released,
}

impl ButtonState {
    pub fn is_pressed(self) -> bool {
        self == ButtonState::Pressed
    }
}

//=== PlatformEvent =======================================================

/// One entry of the backend's event queue.
///
/// Coordinates are in logical window space (pixels, top-left origin).
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Window close / OS shutdown request.
    Quit,

    /// Key went down. `repeat` is set for auto-repeat events.
    KeyDown { scancode: ScanCode, repeat: bool },

    /// Key went up.
    KeyUp { scancode: ScanCode },

    /// Mouse button pressed or released.
    ///
    /// `clicks` is 1 for a single click, 2 for a double click, and so on.
    MouseButton {
        button: MouseButton,
        state: ButtonState,
        clicks: u8,
        x: i32,
        y: i32,
    },

    /// Cursor moved.
    MouseMotion { x: i32, y: i32 },

    /// Wheel scrolled; positive `y` is away from the user.
    MouseWheel { x: i32, y: i32 },

    /// Anything the input system does not consume (focus, resize, ...).
    Other,
}

impl PlatformEvent {
    /// Returns `true` for events that should stop the frame loop.
    ///
    /// Quit requests and Escape key-downs both qualify.
    pub fn requests_exit(&self) -> bool {
        matches!(
            self,
            PlatformEvent::Quit
                | PlatformEvent::KeyDown {
                    scancode: ScanCode::Escape,
                    ..
                }
        )
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scancode_indices_are_dense() {
        assert_eq!(ScanCode::Digit0.index(), 0);
        assert_eq!(ScanCode::KeyA.index(), 10);
        assert_eq!(ScanCode::Unidentified.index(), ScanCode::COUNT - 1);
    }

    #[test]
    fn mouse_button_from_raw_number() {
        assert_eq!(MouseButton::from(1), MouseButton::Left);
        assert_eq!(MouseButton::from(2), MouseButton::Middle);
        assert_eq!(MouseButton::from(3), MouseButton::Right);
        assert_eq!(MouseButton::from(4), MouseButton::Other(4));
    }

    #[test]
    fn quit_and_escape_request_exit() {
        assert!(PlatformEvent::Quit.requests_exit());
        assert!(PlatformEvent::KeyDown { scancode: ScanCode::Escape, repeat: false }.requests_exit());
        assert!(PlatformEvent::KeyDown { scancode: ScanCode::Escape, repeat: true }.requests_exit());
    }

    #[test]
    fn other_events_do_not_request_exit() {
        assert!(!PlatformEvent::KeyUp { scancode: ScanCode::Escape }.requests_exit());
        assert!(!PlatformEvent::KeyDown { scancode: ScanCode::Space, repeat: false }.requests_exit());
        assert!(!PlatformEvent::MouseMotion { x: 1, y: 2 }.requests_exit());
        assert!(!PlatformEvent::Other.requests_exit());
    }
}
