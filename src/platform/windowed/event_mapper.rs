//=========================================================================
// Window Event Mapper
//
// Converts Winit input types to the facade's `PlatformEvent` vocabulary.
//
// Responsibilities:
// - Translate physical key codes to `ScanCode`
// - Translate mouse buttons, wheel deltas and cursor positions
// - Count repeated presses of one button as multi-clicks
// - Filter keys this facade does not name
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{ButtonState, MouseButton, PlatformEvent, ScanCode};

//=== Key Conversion ======================================================
//
// Only the keys `ScanCode` names are mapped; everything else becomes
// `Unidentified`.
//

impl From<WinitKeyCode> for ScanCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Numeric keys -----------------------------------------------------
            Digit0 => ScanCode::Digit0, Digit1 => ScanCode::Digit1,
            Digit2 => ScanCode::Digit2, Digit3 => ScanCode::Digit3,
            Digit4 => ScanCode::Digit4, Digit5 => ScanCode::Digit5,
            Digit6 => ScanCode::Digit6, Digit7 => ScanCode::Digit7,
            Digit8 => ScanCode::Digit8, Digit9 => ScanCode::Digit9,

            //--- Alphabetic keys --------------------------------------------------
            KeyA => ScanCode::KeyA, KeyB => ScanCode::KeyB, KeyC => ScanCode::KeyC,
            KeyD => ScanCode::KeyD, KeyE => ScanCode::KeyE, KeyF => ScanCode::KeyF,
            KeyG => ScanCode::KeyG, KeyH => ScanCode::KeyH, KeyI => ScanCode::KeyI,
            KeyJ => ScanCode::KeyJ, KeyK => ScanCode::KeyK, KeyL => ScanCode::KeyL,
            KeyM => ScanCode::KeyM, KeyN => ScanCode::KeyN, KeyO => ScanCode::KeyO,
            KeyP => ScanCode::KeyP, KeyQ => ScanCode::KeyQ, KeyR => ScanCode::KeyR,
            KeyS => ScanCode::KeyS, KeyT => ScanCode::KeyT, KeyU => ScanCode::KeyU,
            KeyV => ScanCode::KeyV, KeyW => ScanCode::KeyW, KeyX => ScanCode::KeyX,
            KeyY => ScanCode::KeyY, KeyZ => ScanCode::KeyZ,

            //--- Function keys ----------------------------------------------------
            F1 => ScanCode::F1, F2 => ScanCode::F2, F3 => ScanCode::F3,
            F4 => ScanCode::F4, F5 => ScanCode::F5, F6 => ScanCode::F6,
            F7 => ScanCode::F7, F8 => ScanCode::F8, F9 => ScanCode::F9,
            F10 => ScanCode::F10, F11 => ScanCode::F11, F12 => ScanCode::F12,

            //--- Arrow keys -------------------------------------------------------
            ArrowDown => ScanCode::ArrowDown, ArrowLeft => ScanCode::ArrowLeft,
            ArrowRight => ScanCode::ArrowRight, ArrowUp => ScanCode::ArrowUp,

            //--- Modifiers --------------------------------------------------------
            ShiftLeft => ScanCode::LeftShift, ShiftRight => ScanCode::RightShift,
            ControlLeft => ScanCode::LeftCtrl, ControlRight => ScanCode::RightCtrl,
            AltLeft => ScanCode::LeftAlt, AltRight => ScanCode::RightAlt,

            //--- Special keys -----------------------------------------------------
            Space => ScanCode::Space,
            Enter => ScanCode::Enter,
            Escape => ScanCode::Escape,
            Tab => ScanCode::Tab,
            Backspace => ScanCode::Backspace,
            Delete => ScanCode::Delete,

            //--- Fallback ---------------------------------------------------------
            _ => ScanCode::Unidentified,
        }
    }
}

/// Builds the key event for a physical key, or `None` for keys without a
/// `ScanCode`.
pub(crate) fn key_event(key: PhysicalKey, state: ElementState, repeat: bool) -> Option<PlatformEvent> {
    let scancode = match key {
        PhysicalKey::Code(code) => ScanCode::from(code),
        PhysicalKey::Unidentified(_) => return None,
    };

    if scancode == ScanCode::Unidentified {
        return None;
    }

    Some(match state {
        ElementState::Pressed => PlatformEvent::KeyDown { scancode, repeat },
        ElementState::Released => PlatformEvent::KeyUp { scancode },
    })
}

//=== Mouse Conversion ====================================================
//
// Extra buttons keep the conventional numbering: back = 4, forward = 5.
//

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Back => MouseButton::Other(4),
            WinitMouseButton::Forward => MouseButton::Other(5),
            WinitMouseButton::Other(raw) => MouseButton::from(u8::try_from(raw).unwrap_or(u8::MAX)),
        }
    }
}

impl From<ElementState> for ButtonState {
    fn from(state: ElementState) -> Self {
        match state {
            ElementState::Pressed => ButtonState::Pressed,
            ElementState::Released => ButtonState::Released,
        }
    }
}

/// Whole wheel steps per axis. Line deltas round to the nearest step with
/// any movement counting as at least one; pixel deltas give the direction.
pub(crate) fn wheel_steps(delta: MouseScrollDelta) -> (i32, i32) {
    fn direction(v: f64) -> i32 {
        if v > 0.0 {
            1
        } else if v < 0.0 {
            -1
        } else {
            0
        }
    }

    fn lines(v: f32) -> i32 {
        match v.round() as i32 {
            0 => direction(f64::from(v)),
            whole => whole,
        }
    }

    match delta {
        MouseScrollDelta::LineDelta(x, y) => (lines(x), lines(y)),
        MouseScrollDelta::PixelDelta(p) => (direction(p.x), direction(p.y)),
    }
}

/// Scales a cursor position in physical window pixels to the logical
/// resolution.
pub(crate) fn to_logical(position: PhysicalPosition<f64>, window: (u32, u32), logical: (u32, u32)) -> (i32, i32) {
    let scale = |v: f64, real: u32, target: u32| {
        if real == 0 {
            v as i32
        } else {
            (v * f64::from(target) / f64::from(real)).floor() as i32
        }
    };
    (scale(position.x, window.0, logical.0), scale(position.y, window.1, logical.1))
}

//=== ClickCounter ========================================================

/// Presses of the same button closer than this count as one multi-click.
const MULTI_CLICK_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum cursor travel, in logical pixels, between presses of a multi-click.
const MULTI_CLICK_SLOP: i32 = 4;

/// Derives click counts, which Winit does not report.
#[derive(Debug, Default)]
pub(crate) struct ClickCounter {
    last: Option<(MouseButton, Instant, (i32, i32))>,
    count: u8,
}

impl ClickCounter {
    /// Registers a press and returns its click count, starting at 1.
    pub(crate) fn press(&mut self, button: MouseButton, at: Instant, position: (i32, i32)) -> u8 {
        self.count = match self.last {
            Some((prev, when, (px, py)))
                if prev == button
                    && at.saturating_duration_since(when) <= MULTI_CLICK_INTERVAL
                    && (position.0 - px).abs() <= MULTI_CLICK_SLOP
                    && (position.1 - py).abs() <= MULTI_CLICK_SLOP =>
            {
                self.count.saturating_add(1)
            }
            _ => 1,
        };
        self.last = Some((button, at, position));
        self.count
    }

    /// Click count to report on release: the count of the matching press.
    pub(crate) fn release(&self, button: MouseButton) -> u8 {
        match self.last {
            Some((prev, _, _)) if prev == button => self.count.max(1),
            _ => 1,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
