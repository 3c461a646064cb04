//=========================================================================
// Input System
//
// Turns one level-triggered poll per frame into edge-triggered queries.
//
// Responsibilities:
// - Drain every pending backend event once per frame
// - Double-buffer the keyboard snapshot (previous / current)
// - Fold button, motion and wheel events into `MouseState`
// - Report quit requests and Escape presses to the caller
//
// Frame lifecycle:
// ```text
//   update():
//     keyboard.advance()            current → previous (once)
//     queue empty?  ── yes ──> mouse.clear_buttons(), return
//        │ no
//     drain events → mouse / exit check
//     keyboard.load(backend.keyboard_state())
// ```
//
// Notes:
// The system never fails; an empty queue is a valid, explicit state.
// Queries before the first update see an all-released keyboard and a
// zeroed mouse.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
pub mod keyboard;
pub mod mouse;

//=== External Crates =====================================================

use log::trace;

//=== Internal Imports ====================================================

pub use event::{ButtonState, MouseButton, PlatformEvent, ScanCode};
pub use keyboard::{KeySnapshot, KeyboardState};
pub use mouse::{ButtonEvent, MouseState};

use crate::core::geometry::Rect;
use crate::platform::Backend;

//=== TickControl =========================================================

/// Frame loop control signal produced by [`InputSystem::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== InputSystem =========================================================

/// Owns the keyboard and mouse state and answers per-frame queries.
#[derive(Debug, Clone, Default)]
pub struct InputSystem {
    keyboard: KeyboardState,
    mouse: MouseState,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------
    pub fn new() -> Self {
        Self::default()
    }

    //--- update() ---------------------------------------------------------
    //
    // Call exactly once per frame, before any query for that frame.
    //
    pub fn update<B: Backend + ?Sized>(&mut self, backend: &mut B) -> TickControl {
        self.keyboard.advance();
        self.mouse.clear_wheel();

        let Some(first) = backend.poll_event() else {
            self.mouse.clear_buttons();
            return TickControl::Continue;
        };

        let mut control = TickControl::Continue;
        let mut drained = 0usize;
        let mut next = Some(first);

        while let Some(event) = next {
            if self.process_event(&event) == TickControl::Exit {
                control = TickControl::Exit;
            }
            drained += 1;
            next = backend.poll_event();
        }

        self.keyboard.load(backend.keyboard_state());
        trace!(target: "input", "Drained {} events (control: {:?})", drained, control);

        control
    }

    //--- Internal Helpers -------------------------------------------------
    fn process_event(&mut self, event: &PlatformEvent) -> TickControl {
        match *event {
            PlatformEvent::MouseButton { button, state, clicks, .. } => {
                self.mouse.apply_button(button, state, clicks);
            }

            PlatformEvent::MouseMotion { x, y } => {
                self.mouse.apply_motion(x, y);
            }

            PlatformEvent::MouseWheel { y, .. } => {
                self.mouse.apply_wheel(y);
            }

            // Key state comes from the backend snapshot, not from events
            PlatformEvent::KeyDown { .. }
            | PlatformEvent::KeyUp { .. }
            | PlatformEvent::Quit
            | PlatformEvent::Other => {}
        }

        // Runs for every event, independent of the branch above
        if event.requests_exit() {
            TickControl::Exit
        } else {
            TickControl::Continue
        }
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// Returns `true` if the key went up → down since the last update.
    pub fn key_pressed(&self, code: ScanCode) -> bool {
        self.keyboard.pressed(code)
    }

    /// Returns `true` if the key went down → up since the last update.
    pub fn key_released(&self, code: ScanCode) -> bool {
        self.keyboard.released(code)
    }

    /// Returns `true` if the key was down on both of the last two updates.
    pub fn key_held(&self, code: ScanCode) -> bool {
        self.keyboard.held(code)
    }

    /// Returns `true` while the key is down (pressed or held).
    pub fn key_down(&self, code: ScanCode) -> bool {
        self.keyboard.down(code)
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    //=====================================================================
    // Query API - Mouse
    //=====================================================================

    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    /// Returns `true` iff the last button event was exactly
    /// (`button`, `clicks`, `state`).
    pub fn mouse_event_is(&self, button: MouseButton, clicks: u8, state: ButtonState) -> bool {
        self.mouse.event_is(button, clicks, state)
    }

    /// Single left click press.
    pub fn mouse_clicked(&self) -> bool {
        self.mouse_event_is(MouseButton::Left, 1, ButtonState::Pressed)
    }

    pub fn mouse_position(&self) -> (i32, i32) {
        self.mouse.position()
    }

    /// Cursor inside `rect`, boundaries included.
    pub fn mouse_in(&self, rect: &Rect) -> bool {
        self.mouse.is_in(rect)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{EventInjector, HeadlessBackend};

    //--- Test Helpers -----------------------------------------------------

    fn setup() -> (InputSystem, HeadlessBackend, EventInjector) {
        let backend = HeadlessBackend::new();
        let injector = backend.injector();
        (InputSystem::new(), backend, injector)
    }

    fn active_predicates(input: &InputSystem, code: ScanCode) -> usize {
        [input.key_pressed(code), input.key_held(code), input.key_released(code)]
            .iter()
            .filter(|b| **b)
            .count()
    }

    //=====================================================================
    // Keyboard Tests
    //=====================================================================

    /// Key down on frames 2-4 only.
    #[test]
    fn key_frame_sequence() {
        let (mut input, mut backend, events) = setup();
        let k = ScanCode::KeyK;

        // Frame 1: nothing
        input.update(&mut backend);
        assert_eq!(active_predicates(&input, k), 0);

        // Frame 2: goes down
        events.key_down(k);
        input.update(&mut backend);
        assert!(input.key_pressed(k));
        assert_eq!(active_predicates(&input, k), 1);

        // Frames 3-4: held, no new events
        for _ in 0..2 {
            input.update(&mut backend);
            assert!(input.key_held(k));
            assert_eq!(active_predicates(&input, k), 1);
        }

        // Frame 5: goes up
        events.key_up(k);
        input.update(&mut backend);
        assert!(input.key_released(k));
        assert_eq!(active_predicates(&input, k), 1);

        // Frame 6: nothing
        input.update(&mut backend);
        assert_eq!(active_predicates(&input, k), 0);
    }

    /// A key already down before the first update reports as pressed.
    #[test]
    fn first_update_seeds_previous_as_released() {
        let (mut input, mut backend, events) = setup();

        events.key_down(ScanCode::Space);
        input.update(&mut backend);

        assert!(input.key_pressed(ScanCode::Space));
        assert!(!input.key_held(ScanCode::Space));
    }

    /// Unrelated events in a frame do not disturb a held key.
    #[test]
    fn held_key_survives_busy_frames() {
        let (mut input, mut backend, events) = setup();

        events.key_down(ScanCode::ArrowLeft);
        input.update(&mut backend);

        events.mouse_motion(3, 4);
        input.update(&mut backend);

        assert!(input.key_held(ScanCode::ArrowLeft));
        assert!(input.key_down(ScanCode::ArrowLeft));
    }

    /// Press and release inside one frame leaves the key up.
    #[test]
    fn tap_within_one_frame_is_invisible_to_snapshots() {
        let (mut input, mut backend, events) = setup();

        events.key_down(ScanCode::KeyA);
        events.key_up(ScanCode::KeyA);
        input.update(&mut backend);

        assert_eq!(active_predicates(&input, ScanCode::KeyA), 0);
    }

    //=====================================================================
    // Empty Frame Tests
    //=====================================================================

    #[test]
    fn empty_frame_forces_mouse_flags_false() {
        let (mut input, mut backend, events) = setup();

        events.mouse_button(MouseButton::Right, ButtonState::Pressed, 1, 5, 5);
        input.update(&mut backend);
        assert!(input.mouse().right);

        input.update(&mut backend);

        let mouse = input.mouse();
        assert!(!mouse.left && !mouse.middle && !mouse.right);
        assert_eq!(mouse.position(), (0, 0));
        assert!(input.mouse_event_is(MouseButton::Right, 1, ButtonState::Pressed));
    }

    #[test]
    fn empty_frame_keeps_keyboard_consistent() {
        let (mut input, mut backend, events) = setup();

        events.key_down(ScanCode::KeyW);
        input.update(&mut backend);
        input.update(&mut backend);
        input.update(&mut backend);

        assert!(input.key_held(ScanCode::KeyW));
        assert!(!input.key_pressed(ScanCode::KeyW));
        assert!(!input.key_released(ScanCode::KeyW));
    }

    //=====================================================================
    // Mouse Tests
    //=====================================================================

    /// Double-click press is distinct from a single click.
    #[test]
    fn double_click_matches_only_two_clicks() {
        let (mut input, mut backend, events) = setup();

        events.mouse_button(MouseButton::Left, ButtonState::Pressed, 2, 10, 10);
        input.update(&mut backend);

        assert!(input.mouse_event_is(MouseButton::Left, 2, ButtonState::Pressed));
        assert!(!input.mouse_event_is(MouseButton::Left, 1, ButtonState::Pressed));
        assert!(!input.mouse_clicked());
    }

    /// Every button event in a frame is folded; the last one wins.
    #[test]
    fn multiple_button_events_fold_last_write_wins() {
        let (mut input, mut backend, events) = setup();

        events.mouse_button(MouseButton::Left, ButtonState::Pressed, 1, 0, 0);
        events.mouse_button(MouseButton::Left, ButtonState::Released, 1, 0, 0);
        events.mouse_button(MouseButton::Middle, ButtonState::Pressed, 1, 0, 0);
        events.mouse_motion(7, 9);
        input.update(&mut backend);

        let mouse = input.mouse();
        assert!(mouse.middle);
        assert!(!mouse.left && !mouse.right);
        assert!(input.mouse_event_is(MouseButton::Middle, 1, ButtonState::Pressed));
        assert_eq!(input.mouse_position(), (7, 9));
    }

    /// Button events do not move the cursor.
    #[test]
    fn position_only_changes_on_motion() {
        let (mut input, mut backend, events) = setup();

        events.mouse_motion(20, 30);
        input.update(&mut backend);
        events.mouse_button(MouseButton::Left, ButtonState::Pressed, 1, 99, 99);
        input.update(&mut backend);

        assert_eq!(input.mouse_position(), (20, 30));
        assert!(input.mouse_in(&Rect::new(20, 30, 0, 0)));
    }

    #[test]
    fn wheel_flags_last_one_update() {
        let (mut input, mut backend, events) = setup();

        events.mouse_wheel(0, 1);
        input.update(&mut backend);
        assert!(input.mouse().wheel_up);

        events.mouse_motion(1, 1);
        input.update(&mut backend);
        assert!(!input.mouse().wheel_up);
    }

    //=====================================================================
    // Exit Signal Tests
    //=====================================================================

    #[test]
    fn quit_request_exits() {
        let (mut input, mut backend, events) = setup();

        events.quit();

        assert_eq!(input.update(&mut backend), TickControl::Exit);
    }

    #[test]
    fn escape_key_down_exits_and_still_updates_keyboard() {
        let (mut input, mut backend, events) = setup();

        events.key_down(ScanCode::Escape);

        assert_eq!(input.update(&mut backend), TickControl::Exit);
        assert!(input.key_pressed(ScanCode::Escape));
    }

    #[test]
    fn exit_survives_later_events_in_the_same_frame() {
        let (mut input, mut backend, events) = setup();

        events.quit();
        events.mouse_motion(1, 2);

        assert_eq!(input.update(&mut backend), TickControl::Exit);
        assert_eq!(input.mouse_position(), (1, 2));
    }

    #[test]
    fn ordinary_frames_continue() {
        let (mut input, mut backend, events) = setup();

        assert_eq!(input.update(&mut backend), TickControl::Continue);
        events.key_down(ScanCode::KeyQ);
        assert_eq!(input.update(&mut backend), TickControl::Continue);
    }
}
