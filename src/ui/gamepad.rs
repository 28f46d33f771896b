//! Gamepad input tracker using gilrs.
//!
//! Button mapping is loaded from config.toml via `load_button_config()`.
//! Default mapping:
//!   D-pad / Left Stick    →  Navigation
//!   A (South)             →  Accept
//!   B (East)              →  Back
//!   Start                 →  Accept
//!   Select                →  Back
//!
//! Also keeps the controller list, the per-player assignment and rumble.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button as PadButton, EventType, GamepadId, Gilrs};

use crate::config::GamepadConfig;
use crate::engine::{Button, GamepadInfo};

const STICK_DEADZONE: f32 = 0.25;
/// Hold time before a direction starts repeating, and the interval after.
const REPEAT_DELAY: f32 = 0.35;
const REPEAT_INTERVAL: f32 = 0.1;

pub const PLAYERS: usize = 2;

/// Physical face and shoulder buttons.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: PadButton) -> Option<Btn> {
        match btn {
            PadButton::South => Some(Btn::A),
            PadButton::East => Some(Btn::B),
            PadButton::West => Some(Btn::X),
            PadButton::North => Some(Btn::Y),
            PadButton::LeftTrigger => Some(Btn::L1),
            PadButton::RightTrigger => Some(Btn::R1),
            PadButton::Start => Some(Btn::Start),
            PadButton::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Which physical buttons trigger each menu button (loaded from config).
struct ActionMap {
    accept: Vec<Btn>,
    back: Vec<Btn>,
    start: Vec<Btn>,
    select: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            accept: vec![Btn::A],
            back: vec![Btn::B],
            start: vec![Btn::Start],
            select: vec![Btn::Select],
        }
    }
}

impl ActionMap {
    /// Menu buttons a physical button stands for. X and Y are fixed.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn targets(&self, btn: Btn) -> Vec<Button> {
        let mut out = Vec::with_capacity(2);
        for (list, target) in [
            (&self.accept, Button::A),
            (&self.back, Button::B),
            (&self.start, Button::Start),
            (&self.select, Button::Back),
        ] {
            if list.contains(&btn) {
                out.push(target);
            }
        }
        match btn {
            Btn::X => out.push(Button::X),
            Btn::Y => out.push(Button::Y),
            _ => {}
        }
        out
    }
}

/// Per-button state: held (continuous), just_pressed (edge) and the
/// auto-repeat trigger.
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
    repeat: bool,
    held_for: f32,
}

impl BtnState {
    fn set_held(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
            self.held_for = 0.0;
        }
        self.held = held;
    }

    fn advance(&mut self, dt: f32) {
        self.repeat = self.just_pressed;
        if !self.held {
            return;
        }
        let before = self.held_for;
        self.held_for += dt;
        if self.held_for >= REPEAT_DELAY {
            let ticks_before = ((before - REPEAT_DELAY).max(-REPEAT_INTERVAL) / REPEAT_INTERVAL).floor();
            let ticks_now = ((self.held_for - REPEAT_DELAY) / REPEAT_INTERVAL).floor();
            self.repeat |= ticks_now > ticks_before;
        }
    }
}

/// Pick a controller for each player: the preferred one when connected,
/// otherwise the first connected controller nobody else uses.
pub fn assign_players(preferred: &[Option<i32>; PLAYERS], connected: &[i32]) -> [Option<i32>; PLAYERS] {
    let mut assigned = [None; PLAYERS];
    for (slot, pref) in assigned.iter_mut().zip(preferred) {
        *slot = pref.filter(|id| connected.contains(id));
    }
    for player in 0..PLAYERS {
        if assigned[player].is_none() {
            assigned[player] = connected
                .iter()
                .copied()
                .find(|id| !assigned.contains(&Some(*id)) && !preferred.contains(&Some(*id)));
        }
    }
    assigned
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    #[cfg(feature = "gamepad")]
    rumble: Vec<gilrs::ff::Effect>,

    /// Indexed by `Button::index()`.
    buttons: [BtnState; Button::ALL.len()],
    stick_x: f32,
    stick_y: f32,
    stick: [bool; 4],
    dpad: [bool; 4],

    action_map: ActionMap,

    pads: Vec<GamepadInfo>,
    change_counter: u32,
    preferred: [Option<i32>; PLAYERS],
    assigned: [Option<i32>; PLAYERS],
}

impl GamepadState {
    pub fn new() -> Self {
        let mut state = GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: Gilrs::new()
                .map_err(|err| log::warn!("gamepad support unavailable: {err}"))
                .ok(),
            #[cfg(feature = "gamepad")]
            rumble: Vec::new(),
            buttons: [BtnState::default(); Button::ALL.len()],
            stick_x: 0.0,
            stick_y: 0.0,
            stick: [false; 4],
            dpad: [false; 4],
            action_map: ActionMap::default(),
            pads: Vec::new(),
            change_counter: 0,
            preferred: [None; PLAYERS],
            assigned: [None; PLAYERS],
        };
        state.rescan();
        state
    }

    /// Load button mapping from config.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String], fallback: &mut Vec<Btn>) {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if !parsed.is_empty() {
                *fallback = parsed;
            }
        }
        let map = &mut self.action_map;
        parse_list(&cfg.accept, &mut map.accept);
        parse_list(&cfg.back, &mut map.back);
        parse_list(&cfg.start, &mut map.start);
        parse_list(&cfg.select, &mut map.select);
    }

    pub fn update(&mut self, dt: f32) {
        for b in &mut self.buttons {
            b.just_pressed = false;
        }

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();

        self.stick = [
            self.stick_y > STICK_DEADZONE,
            self.stick_y < -STICK_DEADZONE,
            self.stick_x < -STICK_DEADZONE,
            self.stick_x > STICK_DEADZONE,
        ];
        for (i, dir) in [Button::Up, Button::Down, Button::Left, Button::Right].into_iter().enumerate() {
            let held = self.dpad[i] || self.stick[i];
            self.buttons[dir.index()].set_held(held);
        }
        for b in &mut self.buttons {
            b.advance(dt);
        }
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = &mut self.gilrs else {
            return;
        };
        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        let mut rescan = false;
        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => self.set_pad_button(btn, true),
                EventType::ButtonReleased(btn, _) => self.set_pad_button(btn, false),
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_x = value,
                EventType::AxisChanged(Axis::LeftStickY, value, _) => self.stick_y = value,
                EventType::Connected | EventType::Disconnected => rescan = true,
                _ => {}
            }
        }
        if rescan {
            self.release_all();
            self.rescan();
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_pad_button(&mut self, btn: PadButton, held: bool) {
        let dpad = match btn {
            PadButton::DPadUp => Some(0),
            PadButton::DPadDown => Some(1),
            PadButton::DPadLeft => Some(2),
            PadButton::DPadRight => Some(3),
            _ => None,
        };
        if let Some(i) = dpad {
            self.dpad[i] = held;
            return;
        }
        if let Some(btn) = Btn::from_gilrs(btn) {
            for target in self.action_map.targets(btn) {
                self.buttons[target.index()].set_held(held);
            }
        }
    }

    /// Re-read the connected controllers and reassign players.
    pub fn rescan(&mut self) {
        #[cfg(feature = "gamepad")]
        if let Some(gilrs) = &self.gilrs {
            self.pads = gilrs
                .gamepads()
                .map(|(id, pad)| GamepadInfo { instance_id: usize::from(id) as i32, name: pad.name().to_string() })
                .collect();
        }
        self.change_counter = self.change_counter.wrapping_add(1);
        self.update_assignments();
        log::info!("{} controller(s) connected", self.pads.len());
    }

    pub fn update_assignments(&mut self) {
        let ids: Vec<i32> = self.pads.iter().map(|p| p.instance_id).collect();
        self.assigned = assign_players(&self.preferred, &ids);
    }

    // ── Queries ──

    pub fn just_pressed(&self, button: Button) -> bool {
        self.buttons[button.index()].just_pressed
    }

    pub fn repeated(&self, button: Button) -> bool {
        self.buttons[button.index()].repeat
    }

    pub fn gamepads(&self) -> &[GamepadInfo] {
        &self.pads
    }

    pub fn change_counter(&self) -> u32 {
        self.change_counter
    }

    pub fn preferred(&self, player: usize) -> Option<i32> {
        self.preferred.get(player).copied().flatten()
    }

    pub fn set_preferred(&mut self, player: usize, instance_id: Option<i32>) {
        if let Some(slot) = self.preferred.get_mut(player) {
            *slot = instance_id;
        }
    }

    pub fn assigned(&self, player: usize) -> Option<i32> {
        self.assigned.get(player).copied().flatten()
    }

    pub fn rumble(&mut self, player: usize, low: f32, high: f32, duration_ms: u32) {
        let Some(instance_id) = self.assigned(player) else {
            return;
        };
        #[cfg(feature = "gamepad")]
        if let Err(err) = self.play_rumble(instance_id, low, high, duration_ms) {
            log::debug!("rumble on controller {instance_id} failed: {err}");
        }
        #[cfg(not(feature = "gamepad"))]
        let _ = (instance_id, low, high, duration_ms);
    }

    #[cfg(feature = "gamepad")]
    fn play_rumble(&mut self, instance_id: i32, low: f32, high: f32, duration_ms: u32) -> Result<(), gilrs::ff::Error> {
        use gilrs::ff::{BaseEffect, BaseEffectType, EffectBuilder, Replay, Ticks};

        let Some(gilrs) = &mut self.gilrs else {
            return Ok(());
        };
        let Some(id) = gilrs
            .gamepads()
            .map(|(id, _)| id)
            .find(|id: &GamepadId| usize::from(*id) as i32 == instance_id)
        else {
            return Ok(());
        };
        let magnitude = |v: f32| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16;
        let scheduling = Replay { play_for: Ticks::from_ms(duration_ms), ..Default::default() };
        let effect = EffectBuilder::new()
            .add_effect(BaseEffect {
                kind: BaseEffectType::Strong { magnitude: magnitude(low) },
                scheduling,
                ..Default::default()
            })
            .add_effect(BaseEffect {
                kind: BaseEffectType::Weak { magnitude: magnitude(high) },
                scheduling,
                ..Default::default()
            })
            .gamepads(&[id])
            .finish(gilrs)?;
        effect.play()?;
        // Effects stop when dropped; keep only the latest one alive
        self.rumble.clear();
        self.rumble.push(effect);
        Ok(())
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in &mut self.buttons {
            *b = BtnState::default();
        }
        self.dpad = [false; 4];
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GamepadState {
        let mut state = GamepadState::new();
        state.pads.clear();
        state
    }

    #[test]
    fn config_names_override_the_defaults() {
        let mut pad = state();
        let cfg = GamepadConfig {
            accept: vec!["south".into(), "X".into()],
            back: vec!["nonsense".into()],
            ..GamepadConfig::default()
        };
        pad.load_button_config(&cfg);
        assert_eq!(pad.action_map.accept, vec![Btn::A, Btn::X]);
        assert_eq!(pad.action_map.back, vec![Btn::B]);
        assert_eq!(pad.action_map.targets(Btn::X), vec![Button::A, Button::X]);
    }

    #[test]
    fn direction_repeats_after_the_delay() {
        let mut b = BtnState::default();
        b.set_held(true);
        b.advance(0.016);
        assert!(b.just_pressed && b.repeat);

        b.just_pressed = false;
        b.advance(0.2);
        assert!(!b.repeat);
        b.advance(0.2);
        assert!(b.repeat);
        b.advance(0.02);
        assert!(!b.repeat);
        b.advance(0.06);
        assert!(b.repeat);
    }

    #[test]
    fn stick_past_the_deadzone_moves() {
        let mut pad = state();
        pad.stick_y = -0.8;
        pad.update(0.016);
        assert!(pad.just_pressed(Button::Down));
        assert!(pad.repeated(Button::Down));
        pad.update(0.016);
        assert!(!pad.just_pressed(Button::Down));
    }

    #[test]
    fn players_prefer_their_chosen_controller() {
        assert_eq!(assign_players(&[None, None], &[3, 5]), [Some(3), Some(5)]);
        assert_eq!(assign_players(&[Some(5), None], &[3, 5]), [Some(5), Some(3)]);
        assert_eq!(assign_players(&[None, Some(3)], &[3, 5]), [Some(5), Some(3)]);
        assert_eq!(assign_players(&[Some(9), None], &[3]), [Some(3), None]);
        assert_eq!(assign_players(&[None, None], &[]), [None, None]);
    }

    #[test]
    fn preferred_slots_are_bounded() {
        let mut pad = state();
        pad.set_preferred(1, Some(4));
        pad.set_preferred(7, Some(1));
        assert_eq!(pad.preferred(1), Some(4));
        assert_eq!(pad.preferred(7), None);
    }
}
