//=========================================================================
// Mouse State
//=========================================================================
//
// Aggregated mouse state folded from button, motion and wheel events.
//
// Update rules:
// - button events → left/middle/right flags + last-event fields
// - motion events → position
// - wheel events  → wheel_up/wheel_down for the current update only
// - empty queue   → the three button flags are forced false
//
// The three button flags are mutually exclusive: they describe the last
// button acted upon, not a true multi-button chord. This is a known
// simplification kept for compatibility with the flag-style API.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::event::{ButtonState, MouseButton};
use crate::core::geometry::{self, Rect};

//=== ButtonEvent =========================================================

/// The most recent raw button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: MouseButton,
    pub clicks: u8,
    pub state: ButtonState,
}

//=== MouseState ==========================================================

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    /// Cursor position in logical window coordinates.
    pub x: i32,
    pub y: i32,

    //--- Button Flags (mutually exclusive) --------------------------------
    pub left: bool,
    pub middle: bool,
    pub right: bool,

    //--- Wheel (this update only) -----------------------------------------
    pub wheel_up: bool,
    pub wheel_down: bool,

    last_event: Option<ButtonEvent>,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Event Folding ----------------------------------------------------

    /// Applies one button event: sets the flag for `button` from `state`
    /// and clears the other two, then records the event.
    pub(super) fn apply_button(&mut self, button: MouseButton, state: ButtonState, clicks: u8) {
        let down = state.is_pressed();
        self.left = down && button == MouseButton::Left;
        self.middle = down && button == MouseButton::Middle;
        self.right = down && button == MouseButton::Right;

        self.last_event = Some(ButtonEvent { button, clicks, state });
    }

    pub(super) fn apply_motion(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub(super) fn apply_wheel(&mut self, dy: i32) {
        if dy > 0 {
            self.wheel_up = true;
        } else if dy < 0 {
            self.wheel_down = true;
        }
    }

    /// "No activity this frame": forces the button flags false.
    ///
    /// Position and the last-event fields are kept.
    pub(super) fn clear_buttons(&mut self) {
        self.left = false;
        self.middle = false;
        self.right = false;
    }

    pub(super) fn clear_wheel(&mut self) {
        self.wheel_up = false;
        self.wheel_down = false;
    }

    //--- Queries ----------------------------------------------------------

    /// Returns the last recorded button event, if any.
    pub fn last_event(&self) -> Option<ButtonEvent> {
        self.last_event
    }

    /// Returns `true` iff the last button event matches all three fields.
    ///
    /// Distinguishes e.g. a single-click press from a double-click press.
    pub fn event_is(&self, button: MouseButton, clicks: u8, state: ButtonState) -> bool {
        self.last_event == Some(ButtonEvent { button, clicks, state })
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Cursor inside `rect`, boundaries included.
    pub fn is_in(&self, rect: &Rect) -> bool {
        geometry::point_in(rect, self.x, self.y)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed_flags(mouse: &MouseState) -> usize {
        [mouse.left, mouse.middle, mouse.right].iter().filter(|b| **b).count()
    }

    #[test]
    fn button_down_sets_exactly_one_flag() {
        let mut mouse = MouseState::new();

        for button in [MouseButton::Left, MouseButton::Middle, MouseButton::Right] {
            mouse.apply_button(button, ButtonState::Pressed, 1);
            assert_eq!(pressed_flags(&mouse), 1, "{button:?}");
        }
        assert!(mouse.right);
    }

    #[test]
    fn button_up_clears_flags() {
        let mut mouse = MouseState::new();

        mouse.apply_button(MouseButton::Left, ButtonState::Pressed, 1);
        mouse.apply_button(MouseButton::Left, ButtonState::Released, 1);

        assert_eq!(pressed_flags(&mouse), 0);
        assert!(mouse.event_is(MouseButton::Left, 1, ButtonState::Released));
    }

    #[test]
    fn event_match_requires_all_fields() {
        let mut mouse = MouseState::new();
        assert!(!mouse.event_is(MouseButton::Left, 1, ButtonState::Pressed));

        mouse.apply_button(MouseButton::Left, ButtonState::Pressed, 2);

        assert!(mouse.event_is(MouseButton::Left, 2, ButtonState::Pressed));
        assert!(!mouse.event_is(MouseButton::Left, 1, ButtonState::Pressed));
        assert!(!mouse.event_is(MouseButton::Right, 2, ButtonState::Pressed));
        assert!(!mouse.event_is(MouseButton::Left, 2, ButtonState::Released));
    }

    #[test]
    fn clear_buttons_keeps_position_and_last_event() {
        let mut mouse = MouseState::new();
        mouse.apply_motion(30, 40);
        mouse.apply_button(MouseButton::Middle, ButtonState::Pressed, 1);

        mouse.clear_buttons();

        assert_eq!(pressed_flags(&mouse), 0);
        assert_eq!(mouse.position(), (30, 40));
        assert!(mouse.event_is(MouseButton::Middle, 1, ButtonState::Pressed));
    }

    #[test]
    fn wheel_direction_flags() {
        let mut mouse = MouseState::new();

        mouse.apply_wheel(1);
        assert!(mouse.wheel_up && !mouse.wheel_down);

        mouse.clear_wheel();
        mouse.apply_wheel(-3);
        assert!(!mouse.wheel_up && mouse.wheel_down);
    }

    #[test]
    fn is_in_uses_inclusive_bounds() {
        let mut mouse = MouseState::new();
        let rect = Rect::new(0, 0, 10, 10);

        mouse.apply_motion(10, 10);
        assert!(mouse.is_in(&rect));

        mouse.apply_motion(11, 10);
        assert!(!mouse.is_in(&rect));
    }
}
