//! Keyboard input tracking
//!
//! Terminal key events are folded into a per-frame snapshot. Keys count as
//! held from their press until their release; terminals that never report
//! releases fall back to a hold window refreshed by OS key repeat.

use std::collections::{HashMap, HashSet};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::pong::PongInput;
use crate::sim::TickInput;

/// Frames a key stays held after its last press or repeat event
pub const HOLD_WINDOW: u64 = 8;

/// One-shot requests that bypass the per-tick input snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Menu selection digit
    Select(u8),
    CyclePace,
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    frame: u64,
    /// Frame each held key was last seen on
    last_seen: HashMap<KeyCode, u64>,
    /// Keys pressed since the last `clear_presses`
    pressed: HashSet<KeyCode>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one terminal event in; returns a command for menu/quit keys
    pub fn handle(&mut self, event: &Event) -> Option<Command> {
        let Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) = event
        else {
            return None;
        };
        let code = normalize(*code);

        match kind {
            KeyEventKind::Press => {
                self.last_seen.insert(code, self.frame);
                self.pressed.insert(code);
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(Command::Quit)
                    }
                    KeyCode::Char('p') => Some(Command::CyclePace),
                    KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| Command::Select(d as u8)),
                    _ => None,
                }
            }
            KeyEventKind::Repeat => {
                self.last_seen.insert(code, self.frame);
                None
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&code);
                None
            }
        }
    }

    /// Whether `key` is currently held
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.last_seen
            .get(&key)
            .is_some_and(|&seen| self.frame.saturating_sub(seen) <= HOLD_WINDOW)
    }

    /// Whether `key` was pressed during the current frame
    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|&key| self.is_held(key))
    }

    fn any_pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|&key| self.was_pressed(key))
    }

    /// Fall Blocks input for this frame
    pub fn fall_blocks_input(&self) -> TickInput {
        TickInput {
            left: self.any_held(&[KeyCode::Left, KeyCode::Char('a')]),
            right: self.any_held(&[KeyCode::Right, KeyCode::Char('d')]),
            fire: self.any_pressed(&[KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('w')]),
            start: self.any_pressed(&[KeyCode::Enter, KeyCode::Char(' ')]),
        }
    }

    /// Pong input for this frame
    pub fn pong_input(&self) -> PongInput {
        PongInput {
            up: self.any_held(&[KeyCode::Up, KeyCode::Char('w')]),
            down: self.any_held(&[KeyCode::Down, KeyCode::Char('s')]),
            start: self.any_pressed(&[KeyCode::Enter, KeyCode::Char(' ')]),
        }
    }

    /// Consume one-shot presses once a tick has seen them
    pub fn clear_presses(&mut self) {
        self.pressed.clear();
    }

    /// Advance the hold window by one frame. Presses not yet seen by a tick
    /// are kept.
    pub fn end_frame(&mut self) {
        self.frame += 1;
        let frame = self.frame;
        self.last_seen
            .retain(|_, seen| frame.saturating_sub(*seen) <= HOLD_WINDOW);
    }

    /// Drop all key state (used when switching screens)
    pub fn clear(&mut self) {
        self.last_seen.clear();
        self.pressed.clear();
    }
}

/// Letters are tracked lowercase so caps lock and shift don't matter
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
