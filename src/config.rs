//! External configuration store.
//!
//! Reads `config.toml` from the executable's directory (or CWD) and writes
//! the same file back on `save()`. Missing files or keys fall back to
//! defaults; gameplay settings live in `[settings]` keyed by identifier,
//! unlocked secrets and achievement counters in `[progress]`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::data::{AchievementProgress, GameDatabase, PlayerProgress, SettingsStore};

pub const CONFIG_FILE: &str = "config.toml";

// ── Errors ──

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("config.toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
}

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    pub video: VideoConfig,
    pub audio: AudioConfig,
    pub input: InputConfig,
    pub system: SystemConfig,
    pub gamepad: GamepadConfig,
    pub settings: SettingsStore,
    /// Mod setting values, by mod id, then setting identifier.
    pub mod_settings: BTreeMap<String, BTreeMap<String, u32>>,
    pub progress: ProgressConfig,
    /// File this configuration was loaded from and gets saved to.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    #[serde(default = "default_render_method")]
    pub render_method: i32,
    /// Window mode used at startup.
    #[serde(default)]
    pub window_mode: i32,
    #[serde(default = "default_frame_sync")]
    pub frame_sync: u8,
    #[serde(default = "default_upscaling")]
    pub upscaling: i32,
    #[serde(default)]
    pub backdrop: i32,
    #[serde(default)]
    pub filtering: i32,
    #[serde(default)]
    pub scanlines: i32,
    #[serde(default)]
    pub bg_blur: i32,
    #[serde(default)]
    pub performance_display: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_volume")]
    pub audio_volume: f32,
    #[serde(default = "default_volume")]
    pub music_volume: f32,
    #[serde(default = "default_volume")]
    pub sound_volume: f32,
    /// 0 = emulated, 1 = remastered.
    #[serde(default = "default_soundtrack")]
    pub active_soundtrack: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Player index new controllers get assigned to, -1 for none.
    #[serde(default)]
    pub controller_autoassign: i32,
    #[serde(default)]
    pub rumble: [f32; 2],
    #[serde(default = "default_vgamepad_opacity")]
    pub vgamepad_opacity: f32,
    #[serde(default = "default_vgamepad_size")]
    pub vgamepad_dpad_size: i32,
    #[serde(default = "default_vgamepad_size")]
    pub vgamepad_buttons_size: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub release_channel: i32,
    #[serde(default)]
    pub ghost_sync: bool,
    /// -1 picks automatically.
    #[serde(default = "default_auto")]
    pub script_optimization: i32,
    #[serde(default = "default_auto")]
    pub game_recording: i32,
    #[serde(default)]
    pub instant_time_attack_restart: i32,
    #[serde(default = "default_simulation_frequency")]
    pub simulation_frequency: i32,
    #[serde(default)]
    pub dev_mode: bool,
}

/// Gamepad button names for each menu button, as understood by `ui::gamepad`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GamepadConfig {
    #[serde(default = "default_accept")]
    pub accept: Vec<String>,
    #[serde(default = "default_back")]
    pub back: Vec<String>,
    #[serde(default = "default_start")]
    pub start: Vec<String>,
    #[serde(default = "default_select")]
    pub select: Vec<String>,
}

/// Player progress as stored on disk, keyed by identifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default)]
    pub secrets: Vec<String>,
    #[serde(default)]
    pub achievements: BTreeMap<String, u32>,
}

// ── Field addressing ──

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntField {
    ReleaseChannel,
    ScriptOptimization,
    GameRecording,
    Upscaling,
    Backdrop,
    Filtering,
    Scanlines,
    BgBlur,
    PerformanceDisplay,
    ActiveSoundtrack,
    ControllerAutoassign,
    VGamepadDpadSize,
    VGamepadButtonsSize,
    InstantTimeAttackRestart,
    SimulationFrequency,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolField {
    GhostSync,
}

/// Byte-sized enum fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Enum8Field {
    FrameSync,
}

/// Fields stored as 0.0 ..= 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PercentField {
    AudioVolume,
    MusicVolume,
    SoundVolume,
    VGamepadOpacity,
    RumbleP1,
    RumbleP2,
}

impl Configuration {
    pub fn int(&self, field: IntField) -> i32 {
        match field {
            IntField::ReleaseChannel => self.system.release_channel,
            IntField::ScriptOptimization => self.system.script_optimization,
            IntField::GameRecording => self.system.game_recording,
            IntField::Upscaling => self.video.upscaling,
            IntField::Backdrop => self.video.backdrop,
            IntField::Filtering => self.video.filtering,
            IntField::Scanlines => self.video.scanlines,
            IntField::BgBlur => self.video.bg_blur,
            IntField::PerformanceDisplay => self.video.performance_display,
            IntField::ActiveSoundtrack => self.audio.active_soundtrack,
            IntField::ControllerAutoassign => self.input.controller_autoassign,
            IntField::VGamepadDpadSize => self.input.vgamepad_dpad_size,
            IntField::VGamepadButtonsSize => self.input.vgamepad_buttons_size,
            IntField::InstantTimeAttackRestart => self.system.instant_time_attack_restart,
            IntField::SimulationFrequency => self.system.simulation_frequency,
        }
    }

    pub fn boolean(&self, field: BoolField) -> bool {
        match field {
            BoolField::GhostSync => self.system.ghost_sync,
        }
    }

    pub fn enum8(&self, field: Enum8Field) -> u8 {
        match field {
            Enum8Field::FrameSync => self.video.frame_sync,
        }
    }

    pub fn percent(&self, field: PercentField) -> f32 {
        match field {
            PercentField::AudioVolume => self.audio.audio_volume,
            PercentField::MusicVolume => self.audio.music_volume,
            PercentField::SoundVolume => self.audio.sound_volume,
            PercentField::VGamepadOpacity => self.input.vgamepad_opacity,
            PercentField::RumbleP1 => self.input.rumble[0],
            PercentField::RumbleP2 => self.input.rumble[1],
        }
    }

    pub fn int_mut(&mut self, field: IntField) -> &mut i32 {
        match field {
            IntField::ReleaseChannel => &mut self.system.release_channel,
            IntField::ScriptOptimization => &mut self.system.script_optimization,
            IntField::GameRecording => &mut self.system.game_recording,
            IntField::Upscaling => &mut self.video.upscaling,
            IntField::Backdrop => &mut self.video.backdrop,
            IntField::Filtering => &mut self.video.filtering,
            IntField::Scanlines => &mut self.video.scanlines,
            IntField::BgBlur => &mut self.video.bg_blur,
            IntField::PerformanceDisplay => &mut self.video.performance_display,
            IntField::ActiveSoundtrack => &mut self.audio.active_soundtrack,
            IntField::ControllerAutoassign => &mut self.input.controller_autoassign,
            IntField::VGamepadDpadSize => &mut self.input.vgamepad_dpad_size,
            IntField::VGamepadButtonsSize => &mut self.input.vgamepad_buttons_size,
            IntField::InstantTimeAttackRestart => &mut self.system.instant_time_attack_restart,
            IntField::SimulationFrequency => &mut self.system.simulation_frequency,
        }
    }

    pub fn bool_mut(&mut self, field: BoolField) -> &mut bool {
        match field {
            BoolField::GhostSync => &mut self.system.ghost_sync,
        }
    }

    pub fn enum8_mut(&mut self, field: Enum8Field) -> &mut u8 {
        match field {
            Enum8Field::FrameSync => &mut self.video.frame_sync,
        }
    }

    pub fn percent_mut(&mut self, field: PercentField) -> &mut f32 {
        match field {
            PercentField::AudioVolume => &mut self.audio.audio_volume,
            PercentField::MusicVolume => &mut self.audio.music_volume,
            PercentField::SoundVolume => &mut self.audio.sound_volume,
            PercentField::VGamepadOpacity => &mut self.input.vgamepad_opacity,
            PercentField::RumbleP1 => &mut self.input.rumble[0],
            PercentField::RumbleP2 => &mut self.input.rumble[1],
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Serialize, Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    video: VideoConfig,
    #[serde(default)]
    audio: AudioConfig,
    #[serde(default)]
    input: InputConfig,
    #[serde(default)]
    system: SystemConfig,
    #[serde(default)]
    gamepad: GamepadConfig,
    #[serde(default)]
    settings: BTreeMap<String, u32>,
    #[serde(default)]
    mod_settings: BTreeMap<String, BTreeMap<String, u32>>,
    #[serde(default)]
    progress: ProgressConfig,
}

// ── Defaults ──

fn default_render_method() -> i32 { 2 }         // OpenGL hardware
fn default_frame_sync() -> u8 { 1 }             // V-Sync on
fn default_upscaling() -> i32 { 1 }             // integer scale
fn default_volume() -> f32 { 0.8 }
fn default_soundtrack() -> i32 { 1 }
fn default_vgamepad_opacity() -> f32 { 0.8 }
fn default_vgamepad_size() -> i32 { 100 }
fn default_auto() -> i32 { -1 }
fn default_simulation_frequency() -> i32 { 60 }

fn default_accept() -> Vec<String> { vec!["A".into()] }
fn default_back() -> Vec<String> { vec!["B".into()] }
fn default_start() -> Vec<String> { vec!["Start".into()] }
fn default_select() -> Vec<String> { vec!["Select".into()] }

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            render_method: default_render_method(),
            window_mode: 0,
            frame_sync: default_frame_sync(),
            upscaling: default_upscaling(),
            backdrop: 0,
            filtering: 0,
            scanlines: 0,
            bg_blur: 0,
            performance_display: 0,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            audio_volume: default_volume(),
            music_volume: default_volume(),
            sound_volume: default_volume(),
            active_soundtrack: default_soundtrack(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            controller_autoassign: 0,
            rumble: [0.0; 2],
            vgamepad_opacity: default_vgamepad_opacity(),
            vgamepad_dpad_size: default_vgamepad_size(),
            vgamepad_buttons_size: default_vgamepad_size(),
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            release_channel: 0,
            ghost_sync: false,
            script_optimization: default_auto(),
            game_recording: default_auto(),
            instant_time_attack_restart: 0,
            simulation_frequency: default_simulation_frequency(),
            dev_mode: false,
        }
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        GamepadConfig {
            accept: default_accept(),
            back: default_back(),
            start: default_start(),
            select: default_select(),
        }
    }
}

// ── Loading & saving ──

impl Configuration {
    pub fn defaults(db: &GameDatabase) -> Self {
        Self::from_toml(TomlConfig::default(), db)
    }

    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) XDG data dir. Missing file or keys fall back to defaults; the
    /// first candidate directory becomes the save location.
    pub fn load(db: &GameDatabase) -> Self {
        Self::load_from_dirs(db, &candidate_dirs())
    }

    /// A file that fails to parse is left alone: the defaults are used and
    /// nothing gets saved.
    pub fn load_from_dirs(db: &GameDatabase, search_dirs: &[PathBuf]) -> Self {
        match load_toml(search_dirs) {
            Found::Loaded(toml_cfg, path) => {
                let mut config = Self::from_toml(toml_cfg, db);
                config.path = Some(path);
                config
            }
            Found::Broken(path) => {
                log::warn!("{} will not be overwritten this session", path.display());
                Self::defaults(db)
            }
            Found::Missing => {
                let mut config = Self::defaults(db);
                config.path = search_dirs.first().map(|d| d.join(CONFIG_FILE));
                config
            }
        }
    }

    pub fn from_toml_str(text: &str, db: &GameDatabase) -> Result<Self, ConfigError> {
        let toml_cfg: TomlConfig = toml::from_str(text)?;
        Ok(Self::from_toml(toml_cfg, db))
    }

    pub fn to_toml(&self, db: &GameDatabase) -> Result<String, ConfigError> {
        let toml_cfg = TomlConfig {
            video: self.video.clone(),
            audio: self.audio.clone(),
            input: self.input.clone(),
            system: self.system.clone(),
            gamepad: self.gamepad.clone(),
            settings: self.settings.persisted(db),
            mod_settings: self.mod_settings.clone(),
            progress: self.progress.clone(),
        };
        Ok(toml::to_string_pretty(&toml_cfg)?)
    }

    /// Write back to the file this configuration came from. Without a path
    /// there is nothing to do.
    pub fn save(&self, db: &GameDatabase) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = self.to_toml(db)?;
        write_file(path, &text)?;
        log::debug!("saved configuration to {}", path.display());
        Ok(())
    }

    /// Rebuild the player's unlocked secrets from `[progress]`, optionally
    /// zeroing the achievement counters first. Secrets whose achievement
    /// threshold is reached get unlocked, and the result is written back
    /// to `[progress]` for the next save.
    pub fn load_player_progress(&mut self, db: &GameDatabase, reset_achievements: bool) -> PlayerProgress {
        let mut achievements = AchievementProgress::from_persisted(db, &self.progress.achievements);
        let mut secrets = PlayerProgress::from_persisted(db, &self.progress.secrets);
        if reset_achievements {
            achievements.reset_all(db);
            log::info!("achievement progress reset");
        }
        let unlocked = secrets.unlock_secrets_by_achievements(db, achievements.completed_count());
        if !unlocked.is_empty() {
            log::info!("unlocked by achievements: {unlocked:?}");
        }
        self.progress = ProgressConfig { secrets: secrets.persisted(db), achievements: achievements.persisted() };
        secrets
    }

    fn from_toml(toml_cfg: TomlConfig, db: &GameDatabase) -> Self {
        let mut settings = SettingsStore::new(db);
        settings.load_persisted(db, &toml_cfg.settings);
        Configuration {
            video: toml_cfg.video,
            audio: toml_cfg.audio,
            input: toml_cfg.input,
            system: toml_cfg.system,
            gamepad: toml_cfg.gamepad,
            settings,
            mod_settings: toml_cfg.mod_settings,
            progress: toml_cfg.progress,
            path: None,
        }
    }
}

fn write_file(path: &Path, text: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })?;
    }
    std::fs::write(path, text).map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
pub fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/retromenu)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/retromenu");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

enum Found {
    Loaded(TomlConfig, PathBuf),
    Broken(PathBuf),
    Missing,
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> Found {
    for dir in search_dirs {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            continue;
        }
        match read_toml(&path) {
            Ok(cfg) => {
                log::debug!("loaded configuration from {}", path.display());
                return Found::Loaded(cfg, path);
            }
            Err(ConfigError::Read { .. }) => {
                log::warn!("could not read {}, trying next location", path.display());
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                return Found::Broken(path);
            }
        }
    }
    Found::Missing
}

fn read_toml(path: &Path) -> Result<TomlConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    Ok(toml::from_str(&text)?)
}
