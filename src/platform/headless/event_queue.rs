//=========================================================================
// Headless Event Queue
//=========================================================================
//
// Channel-fed event queue with a level-triggered keyboard snapshot.
//
// Architecture:
//   EventInjector ──Sender──> Receiver → pump() → pending → poll()
//                                           │
//                                           └─> key snapshot
//
// The snapshot is updated while pumping, not while polling, so it always
// reflects every key event that has reached the queue.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::input::event::{ButtonState, MouseButton, PlatformEvent, ScanCode};
use crate::core::input::keyboard::KeySnapshot;

//=== EventInjector =======================================================

/// Feeds events into a headless backend, from any thread.
#[derive(Debug, Clone)]
pub struct EventInjector {
    sender: Sender<PlatformEvent>,
    closed: Arc<AtomicBool>,
}

impl EventInjector {
    /// Events sent while the backend is shut down are discarded.
    pub fn send(&self, event: PlatformEvent) {
        if self.is_closed() {
            trace!(target: "platform", "Event dropped, backend is shut down");
            return;
        }
        // The queue owns a sender too, so the channel cannot be closed
        // while the backend is alive.
        if self.sender.send(event).is_err() {
            trace!(target: "platform", "Event dropped, backend is gone");
        }
    }

    pub fn key_down(&self, scancode: ScanCode) {
        self.send(PlatformEvent::KeyDown { scancode, repeat: false });
    }

    pub fn key_up(&self, scancode: ScanCode) {
        self.send(PlatformEvent::KeyUp { scancode });
    }

    pub fn mouse_button(&self, button: MouseButton, state: ButtonState, clicks: u8, x: i32, y: i32) {
        self.send(PlatformEvent::MouseButton { button, state, clicks, x, y });
    }

    pub fn mouse_motion(&self, x: i32, y: i32) {
        self.send(PlatformEvent::MouseMotion { x, y });
    }

    pub fn mouse_wheel(&self, x: i32, y: i32) {
        self.send(PlatformEvent::MouseWheel { x, y });
    }

    /// Window close request.
    pub fn quit(&self) {
        self.send(PlatformEvent::Quit);
    }

    /// `true` once the backend has shut down and until video is brought up again.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

//=== EventQueue ==========================================================

pub(crate) struct EventQueue {
    sender: Sender<PlatformEvent>,
    receiver: Receiver<PlatformEvent>,
    pending: VecDeque<PlatformEvent>,
    keys: KeySnapshot,
    closed: Arc<AtomicBool>,
}

impl EventQueue {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            pending: VecDeque::with_capacity(64),
            keys: [false; ScanCode::COUNT],
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn injector(&self) -> EventInjector {
        EventInjector {
            sender: self.sender.clone(),
            closed: Arc::clone(&self.closed),
        }
    }

    /// Moves everything sent so far into the pending queue.
    pub(crate) fn pump(&mut self) {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    match event {
                        PlatformEvent::KeyDown { scancode, .. } => self.keys[scancode.index()] = true,
                        PlatformEvent::KeyUp { scancode } => self.keys[scancode.index()] = false,
                        _ => {}
                    }
                    self.pending.push_back(event);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Pops the next event, pumping first when nothing is pending.
    pub(crate) fn poll(&mut self) -> Option<PlatformEvent> {
        if self.pending.is_empty() {
            self.pump();
        }
        self.pending.pop_front()
    }

    pub(crate) fn keys(&self) -> &KeySnapshot {
        &self.keys
    }

    /// Drops pending events, releases every key and discards anything
    /// injected until [`EventQueue::reopen`].
    pub(crate) fn close(&mut self) {
        self.closed.store(true, Ordering::Release);
        while self.receiver.try_recv().is_ok() {}
        self.pending.clear();
        self.keys = [false; ScanCode::COUNT];
    }

    pub(crate) fn reopen(&mut self) {
        self.closed.store(false, Ordering::Release);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
