//! Contracts for the engine services the front-end consumes.
//!
//! Rendering, audio, input, the update check, the soundtrack download and
//! the host application all live outside this crate. The menu talks to them
//! only through the traits below; `ui/` provides terminal-backed versions and
//! `testing` provides recording doubles.

// ── Geometry & color ──

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// Same color with alpha multiplied by `factor`.
    pub fn fade(self, factor: f32) -> Self {
        Color { a: self.a * factor, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Rect { x: self.x + dx, y: self.y + dy, ..self }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.w).min(other.x + other.w);
        let y1 = (self.y + self.h).min(other.y + other.h);
        Rect::new(x0, y0, (x1 - x0).max(0), (y1 - y0).max(0))
    }
}

/// Text anchor inside a rect, numbered like a numeric keypad turned upside
/// down: 1 = top-left, 5 = center, 9 = bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    TopLeft = 1,
    Top = 2,
    TopRight = 3,
    Left = 4,
    Center = 5,
    Right = 6,
    BottomLeft = 7,
    Bottom = 8,
    BottomRight = 9,
}

impl Align {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Horizontal anchor: -1 left, 0 center, 1 right.
    pub fn horizontal(self) -> i32 {
        (self.code() as i32 - 1) % 3 - 1
    }

    /// Vertical anchor: -1 top, 0 middle, 1 bottom.
    pub fn vertical(self) -> i32 {
        (self.code() as i32 - 1) / 3 - 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontId {
    TitleLarge,
    TabTitle,
    Regular,
    Small,
    Tiny,
    Debug,
}

// ── Rendering ──

pub trait Drawer {
    fn screen_size(&self) -> (i32, i32);
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn print_text(&mut self, font: FontId, rect: Rect, text: &str, align: Align, color: Color);
    fn text_width(&self, font: FontId, text: &str) -> i32;
    /// Width of the widest line and total height of a possibly multi-line text.
    fn text_box_size(&self, font: FontId, text: &str) -> (i32, i32);
    fn push_scissor(&mut self, rect: Rect);
    fn pop_scissor(&mut self);
    fn perform_rendering(&mut self);
}

// ── Input ──

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    Start,
    Back,
}

impl Button {
    pub const ALL: [Button; 10] = [
        Button::Up, Button::Down, Button::Left, Button::Right,
        Button::A, Button::B, Button::X, Button::Y,
        Button::Start, Button::Back,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A connected physical controller. `instance_id` stays stable for as long
/// as the device stays connected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GamepadInfo {
    pub instance_id: i32,
    pub name: String,
}

pub trait InputSource {
    fn just_pressed(&self, button: Button) -> bool;
    fn just_pressed_or_repeat(&self, button: Button) -> bool;

    fn gamepads(&self) -> Vec<GamepadInfo>;
    /// Increments whenever a controller connects or disconnects.
    fn gamepads_change_counter(&self) -> u32;
    fn preferred_gamepad(&self, player: usize) -> Option<i32>;
    fn set_preferred_gamepad(&mut self, player: usize, instance_id: Option<i32>);
    fn update_player_gamepad_assignments(&mut self);
    fn set_rumble(&mut self, player: usize, low: f32, high: f32, duration_ms: u32);

    fn has_keyboard(&self) -> bool;
    fn has_virtual_gamepad(&self) -> bool;
}

// ── Audio ──

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioContext {
    /// Menu sound effects.
    #[cfg_attr(not(feature = "sound"), allow(dead_code))]
    Menu,
    /// Menu music, including sound-test playback.
    MenuMusic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackKind {
    Music,
    Jingle,
    SoundEffect,
}

/// One entry of the engine's audio collection.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundTestTrack {
    pub key: String,
    pub display_name: String,
    pub kind: TrackKind,
    pub modded: bool,
}

pub trait AudioOut {
    fn play_sound(&mut self, sfx: u8);
    /// Play an entry of the audio collection by key; `speed` 1.0 is normal.
    fn play_audio(&mut self, key: &str, kind: TrackKind, context: AudioContext, speed: f32);
    fn stop_context(&mut self, context: AudioContext);
    fn set_menu_music(&mut self, track: u8);
    fn restart_menu_music(&mut self);
    fn has_remastered_soundtrack(&self) -> bool;
    fn on_soundtrack_preferences_changed(&mut self, active_soundtrack: i32);
    fn sound_test_tracks(&self) -> Vec<SoundTestTrack>;
}

// ── Update check & soundtrack download ──

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateCheckState {
    Inactive,
    SendQuery,
    WaitingForResponse,
    Failed,
    HasResponse,
}

pub trait UpdateCheck {
    fn state(&self) -> UpdateCheckState;
    fn has_update(&self) -> bool;
    /// Build number of the newest available release, when known.
    fn available_version(&self) -> Option<u32>;
    fn update_url(&self) -> Option<String>;
    fn start(&mut self, release_channel: i32);
    fn reset(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DownloadState {
    ReadyForDownload,
    Pending,
    Running,
    Done,
    Failed,
    Loaded,
}

pub trait MusicDownload {
    fn is_supported(&self) -> bool;
    fn state(&self) -> DownloadState;
    fn bytes_downloaded(&self) -> u64;
    fn start(&mut self);
    fn remove(&mut self);
    fn apply(&mut self);
}

// ── Host application ──

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowMode {
    Windowed = 0,
    Fullscreen = 1,
    ExclusiveFullscreen = 2,
}

impl WindowMode {
    pub fn from_value(value: i64) -> WindowMode {
        match value {
            1 => WindowMode::Fullscreen,
            2 => WindowMode::ExclusiveFullscreen,
            _ => WindowMode::Windowed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMethod {
    Software = 0,
    OpenGlSoft = 1,
    OpenGlFull = 2,
}

impl RenderMethod {
    pub fn from_value(value: i64) -> RenderMethod {
        match value {
            0 => RenderMethod::Software,
            1 => RenderMethod::OpenGlSoft,
            _ => RenderMethod::OpenGlFull,
        }
    }
}

pub trait Platform {
    fn open_url(&mut self, url: &str);
    fn window_mode(&self) -> WindowMode;
    fn set_window_mode(&mut self, mode: WindowMode);
    fn switch_render_method(&mut self, method: RenderMethod);
    fn set_vsync_mode(&mut self, frame_sync: u8);
    fn trigger_full_scripts_reload(&mut self);
    fn rebuild_touch_controls(&mut self);
    fn enable_touch_config(&mut self);
    fn evaluate_game_recording(&mut self, mode: i32);
    fn on_exit_options(&mut self);
    fn on_faded_out_options(&mut self);
    /// Mobile and web builds have no window-mode options.
    fn is_mobile(&self) -> bool;
}

/// All collaborators, borrowed for a single update or render call.
pub struct Services<'a> {
    pub input: &'a mut dyn InputSource,
    pub audio: &'a mut dyn AudioOut,
    pub update_check: &'a mut dyn UpdateCheck,
    pub download: &'a mut dyn MusicDownload,
    pub platform: &'a mut dyn Platform,
}

/// Formats a packed build number as `vXX.XX.XX.X`.
pub fn version_string(build: u32) -> String {
    format!(
        "v{:02x}.{:02x}.{:02x}.{:x}",
        (build >> 24) & 0xff,
        (build >> 16) & 0xff,
        (build >> 8) & 0xff,
        build & 0xff
    )
}

// ════════════════════════════════════════════════════════════
//  Recording doubles for tests
// ════════════════════════════════════════════════════════════
