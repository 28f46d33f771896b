//! Terminal front-end: the concrete collaborators the menu runs against.

pub mod gamepad;
pub mod input;
pub mod renderer;
pub mod services;
pub mod sound;

use crossterm::event::KeyCode;

use crate::engine::{Button, GamepadInfo, InputSource};

pub use gamepad::GamepadState;
pub use input::KeyboardState;
pub use renderer::TerminalDrawer;
pub use services::{DesktopPlatform, LocalMusicDownload, LocalUpdateCheck};
pub use sound::MenuAudio;

/// Keyboard and gamepad merged into one `InputSource`.
pub struct MenuInput {
    pub keyboard: KeyboardState,
    pub gamepad: GamepadState,
}

impl MenuInput {
    pub fn new(gamepad: GamepadState) -> Self {
        MenuInput { keyboard: KeyboardState::new(), gamepad }
    }

    /// Poll both devices. Call once per frame before the menu update.
    pub fn update(&mut self, dt: f32) {
        self.keyboard.drain_events();
        self.gamepad.update(dt);
    }

    pub fn quit_requested(&self) -> bool {
        self.keyboard.ctrl_c_pressed()
    }

    pub fn cheat_sheet_toggled(&self) -> bool {
        self.keyboard.was_pressed(KeyCode::F(1))
    }

    pub fn rescan_requested(&self) -> bool {
        self.keyboard.was_pressed(KeyCode::F(3))
    }
}

impl InputSource for MenuInput {
    fn just_pressed(&self, button: Button) -> bool {
        self.keyboard.button_pressed(button) || self.gamepad.just_pressed(button)
    }

    fn just_pressed_or_repeat(&self, button: Button) -> bool {
        self.keyboard.button_repeated(button) || self.gamepad.repeated(button)
    }

    fn gamepads(&self) -> Vec<GamepadInfo> {
        self.gamepad.gamepads().to_vec()
    }

    fn gamepads_change_counter(&self) -> u32 {
        self.gamepad.change_counter()
    }

    fn preferred_gamepad(&self, player: usize) -> Option<i32> {
        self.gamepad.preferred(player)
    }

    fn set_preferred_gamepad(&mut self, player: usize, instance_id: Option<i32>) {
        self.gamepad.set_preferred(player, instance_id);
        self.gamepad.update_assignments();
    }

    fn update_player_gamepad_assignments(&mut self) {
        self.gamepad.update_assignments();
    }

    fn set_rumble(&mut self, player: usize, low: f32, high: f32, duration_ms: u32) {
        self.gamepad.rumble(player, low, high, duration_ms);
    }

    fn has_keyboard(&self) -> bool {
        true
    }

    fn has_virtual_gamepad(&self) -> bool {
        false
    }
}
