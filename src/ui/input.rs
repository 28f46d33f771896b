//! Keyboard state tracker.
//!
//! Maps terminal keys onto the menu's logical buttons and tracks which are
//! held, so the menu gets both edge-triggered presses and auto-repeat.
//!
//! Uses crossterm's keyboard enhancement for Release events when available.
//! Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::engine::Button;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// Terminal key for each logical button.
fn button_for_key(code: KeyCode) -> Option<Button> {
    let button = match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Button::Up,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Button::Down,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Button::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Button::Right,
        KeyCode::Enter | KeyCode::Char(' ') => Button::A,
        KeyCode::Backspace => Button::B,
        KeyCode::Char('x') => Button::X,
        KeyCode::Char('y') => Button::Y,
        KeyCode::Tab => Button::Start,
        KeyCode::Esc => Button::Back,
        _ => return None,
    };
    Some(button)
}

pub struct KeyboardState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the last drain.
    fresh_presses: Vec<KeyCode>,

    /// Keys that saw any Press/Repeat event during the last drain,
    /// including the terminal's own auto-repeat.
    repeats: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        KeyboardState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            repeats: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the menu update.
    pub fn drain_events(&mut self) {
        self.begin_frame();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.handle_key(key);
            }
        }
        self.expire(Instant::now());
    }

    fn begin_frame(&mut self) {
        self.fresh_presses.clear();
        self.repeats.clear();
        self.raw_events.clear();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            // Without confirmed enhancement, rely on timeout-based expiry
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, Instant::now());
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
                self.repeats.push(key.code);
            }
        }
    }

    /// Fallback for terminals without Release events.
    fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn button_pressed(&self, button: Button) -> bool {
        self.fresh_presses.iter().any(|&c| button_for_key(c) == Some(button))
    }

    pub fn button_repeated(&self, button: Button) -> bool {
        self.repeats.iter().any(|&c| button_for_key(c) == Some(button))
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn first_press_is_an_edge_then_only_repeats() {
        let mut kb = KeyboardState::new();
        kb.begin_frame();
        kb.handle_key(press(KeyCode::Down));
        assert!(kb.button_pressed(Button::Down));
        assert!(kb.button_repeated(Button::Down));

        kb.begin_frame();
        kb.handle_key(press(KeyCode::Down));
        assert!(!kb.button_pressed(Button::Down));
        assert!(kb.button_repeated(Button::Down));

        kb.begin_frame();
        assert!(!kb.button_repeated(Button::Down));
        assert!(kb.is_held(KeyCode::Down));
    }

    #[test]
    fn release_is_ignored_until_enhancement_is_confirmed() {
        let mut kb = KeyboardState::new();
        kb.handle_key(press(KeyCode::Enter));
        kb.handle_key(release(KeyCode::Enter));
        assert!(kb.is_held(KeyCode::Enter));

        kb.honor_release = true;
        kb.handle_key(release(KeyCode::Enter));
        assert!(!kb.is_held(KeyCode::Enter));
    }

    #[test]
    fn held_keys_expire_after_the_timeout() {
        let mut kb = KeyboardState::new();
        kb.handle_key(press(KeyCode::Left));
        kb.expire(Instant::now() + HOLD_TIMEOUT);
        assert!(!kb.is_held(KeyCode::Left));
    }

    #[test]
    fn keys_map_to_menu_buttons() {
        assert_eq!(button_for_key(KeyCode::Enter), Some(Button::A));
        assert_eq!(button_for_key(KeyCode::Esc), Some(Button::Back));
        assert_eq!(button_for_key(KeyCode::Backspace), Some(Button::B));
        assert_eq!(button_for_key(KeyCode::Char('k')), Some(Button::Up));
        assert_eq!(button_for_key(KeyCode::F(1)), None);
    }

    #[test]
    fn ctrl_c_is_detected() {
        let mut kb = KeyboardState::new();
        kb.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(kb.ctrl_c_pressed());
        assert!(kb.was_pressed(KeyCode::Char('c')));
    }
}
