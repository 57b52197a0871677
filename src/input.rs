//! Keyboard handling for the terminal front end.
//!
//! Terminals differ in what they report.  Keyboard-enhancement capable ones
//! (kitty protocol) send `Press` / `Repeat` / `Release`; classic ones only
//! send `Press`, with OS key-repeat showing up as more presses.  `KeyTracker`
//! hides the difference and hands the round loop one `FrameInput` per frame.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::entities::FrameInput;

/// A key counts as held if its last press/repeat arrived within this many
/// frames.  OS key-repeat is at least 15 Hz, so at 30 FPS a window of
/// 4 frames is always refreshed before it expires.
pub const HOLD_WINDOW: u64 = 4;

/// A Space press this close to the previous one is key-repeat, not a new
/// shot.  OS repeat runs at roughly one event per frame, while two
/// deliberate taps land at least two frames apart.
pub const FIRE_REPEAT_WINDOW: u64 = 1;

/// Out-of-round actions a key can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Restart,
}

/// Classify a key event as a program-level command, if it is one.
pub fn command_for(event: &KeyEvent) -> Option<Command> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    match event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    /// Each held key → the frame it was last seen (press or repeat).
    last_seen: HashMap<KeyCode, u64>,
    fire_pending: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key event observed during `frame`.
    pub fn record(&mut self, event: &KeyEvent, frame: u64) {
        let code = normalize(event.code);
        match event.kind {
            KeyEventKind::Press => {
                let fresh = !self.seen_within(&code, frame, FIRE_REPEAT_WINDOW);
                if code == KeyCode::Char(' ') && fresh {
                    self.fire_pending = true;
                }
                self.last_seen.insert(code, frame);
            }
            KeyEventKind::Repeat => {
                self.last_seen.insert(code, frame);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&code);
            }
        }
    }

    /// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
    fn is_held(&self, key: &KeyCode, frame: u64) -> bool {
        self.seen_within(key, frame, HOLD_WINDOW)
    }

    fn seen_within(&self, key: &KeyCode, frame: u64, window: u64) -> bool {
        self.last_seen
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= window)
            .unwrap_or(false)
    }

    /// Sample the input for `frame`.  A pending fire is consumed.
    pub fn frame_input(&mut self, frame: u64) -> FrameInput {
        let input = FrameInput {
            up: self.is_held(&KeyCode::Up, frame) || self.is_held(&KeyCode::Char('w'), frame),
            down: self.is_held(&KeyCode::Down, frame) || self.is_held(&KeyCode::Char('s'), frame),
            left: self.is_held(&KeyCode::Left, frame) || self.is_held(&KeyCode::Char('a'), frame),
            right: self.is_held(&KeyCode::Right, frame)
                || self.is_held(&KeyCode::Char('d'), frame),
            fire: self.fire_pending,
        };
        self.fire_pending = false;
        input
    }

    /// Forget everything, e.g. when a new round starts.
    pub fn clear(&mut self) {
        self.last_seen.clear();
        self.fire_pending = false;
    }
}

/// Fold upper-case letters onto lower-case so Shift/Caps Lock don't matter.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
