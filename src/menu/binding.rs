//! Option entry bindings: where each entry's value lives and how it is read
//! and written.

use crate::config::{BoolField, Configuration, Enum8Field, IntField, PercentField};
use crate::data::{GameDatabase, PlayerProgress, SettingId};
use crate::mods::{ModRegistry, ModSettingRef};

use super::entries::MenuEntry;
use super::option_id::{OptionId, OptionKey};

/// Top bit of a bitmask option value: set means "bit on".
const BITMASK_ON: i64 = 0x8000_0000;
const BITMASK_BITS: i64 = 0x7fff_ffff;

/// Everything an option entry can be bound to, borrowed for one call.
pub struct BackingStores<'a> {
    pub db: &'a GameDatabase,
    pub progress: &'a PlayerProgress,
    pub config: &'a mut Configuration,
    pub mods: &'a mut ModRegistry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    /// A gameplay setting storing the option value as-is.
    Setting(SettingId),
    /// One or more bits of a gameplay setting shared with other entries.
    SettingBitmask(SettingId),
    ConfigInt(IntField),
    ConfigBool(BoolField),
    ConfigEnum8(Enum8Field),
    /// Config float in 0..1, shown as 0..100.
    ConfigPercent(PercentField),
    ModSetting(ModSettingRef),
}

impl Binding {
    /// Binding of a built-in option, if it has a backing value.
    pub fn for_option(id: OptionId) -> Option<Binding> {
        use Binding::*;
        use OptionId as O;
        let binding = match id {
            O::ReleaseChannel => ConfigInt(IntField::ReleaseChannel),
            O::FrameSync => ConfigEnum8(Enum8Field::FrameSync),
            O::GhostSync => ConfigBool(BoolField::GhostSync),
            O::ScriptOptimization => ConfigInt(IntField::ScriptOptimization),
            O::GameRecordingMode => ConfigInt(IntField::GameRecording),
            O::Upscaling => ConfigInt(IntField::Upscaling),
            O::Backdrop => ConfigInt(IntField::Backdrop),
            O::Filtering => ConfigInt(IntField::Filtering),
            O::Scanlines => ConfigInt(IntField::Scanlines),
            O::BgBlur => ConfigInt(IntField::BgBlur),
            O::PerformanceDisplay => ConfigInt(IntField::PerformanceDisplay),
            O::Soundtrack => ConfigInt(IntField::ActiveSoundtrack),
            O::ControllerAutoassign => ConfigInt(IntField::ControllerAutoassign),
            O::VGamepadDpadSize => ConfigInt(IntField::VGamepadDpadSize),
            O::VGamepadButtonsSize => ConfigInt(IntField::VGamepadButtonsSize),
            O::TimeAttackInstantRestart => ConfigInt(IntField::InstantTimeAttackRestart),
            O::GameSpeed => ConfigInt(IntField::SimulationFrequency),

            O::AudioVolume => ConfigPercent(PercentField::AudioVolume),
            O::MusicVolume => ConfigPercent(PercentField::MusicVolume),
            O::SoundVolume => ConfigPercent(PercentField::SoundVolume),
            O::VGamepadOpacity => ConfigPercent(PercentField::VGamepadOpacity),
            O::ControllerRumbleP1 => ConfigPercent(PercentField::RumbleP1),
            O::ControllerRumbleP2 => ConfigPercent(PercentField::RumbleP2),

            O::Rotation => Setting(SettingId::SMOOTH_ROTATION),
            O::SpeedupAfterImages => Setting(SettingId::SPEEDUP_AFTERIMGS),
            O::FastRunAnim => Setting(SettingId::SUPERFAST_RUNANIM),
            O::MonitorStyle => Setting(SettingId::MONITOR_STYLE),
            O::TimeDisplay => Setting(SettingId::EXTENDED_HUD),
            O::LivesDisplay => Setting(SettingId::LIVES_DISPLAY),
            O::SpecialStageVisuals => Setting(SettingId::BS_VISUAL_STYLE),
            O::TailsAssist => Setting(SettingId::TAILS_ASSIST_MODE),
            O::TailsFlightCancel => Setting(SettingId::CANCEL_FLIGHT),
            O::NoControlLock => Setting(SettingId::NO_CONTROL_LOCK),
            O::HyperTails => Setting(SettingId::HYPER_TAILS),
            O::HyperDashControls => Setting(SettingId::HYPER_DASH_CONTROLS),
            O::SuperSonicAbility => Setting(SettingId::SUPER_SONIC_ABILITY),
            O::MonitorBehavior => Setting(SettingId::MONITOR_BEHAVIOR),
            O::MaintainShields => Setting(SettingId::MAINTAIN_SHIELDS),
            O::ShieldTypes => Setting(SettingId::SHIELD_TYPES),
            O::BubbleShieldBounce => Setting(SettingId::BUBBLE_SHIELD_BOUNCE),
            O::SuperCancel => Setting(SettingId::SUPER_CANCEL),
            O::InstaShield => Setting(SettingId::INSTA_SHIELD),
            O::LevelLayouts => Setting(SettingId::LEVELLAYOUTS),
            O::CameraOutrun => Setting(SettingId::CAMERA_OUTRUN),
            O::ExtendedCamera => Setting(SettingId::EXTENDED_CAMERA),
            O::SpecialStageRepeat => Setting(SettingId::BS_REPEAT_ON_FAIL),
            O::RandomMonitors => Setting(SettingId::RANDOM_MONITORS),
            O::RandomSpecialStages => Setting(SettingId::RANDOM_SPECIALSTAGES),
            O::AizBlimpSequence => Setting(SettingId::AIZ_BLIMPSEQUENCE),
            O::LbzBigArms => Setting(SettingId::LBZ_BIGARMS),
            O::SozGhostSpawn => Setting(SettingId::DISABLE_GHOST_SPAWN),
            O::Lrz2Boss => Setting(SettingId::LRZ2_BOSS),
            O::InfiniteLives => Setting(SettingId::INFINITE_LIVES),
            O::InfiniteTime => Setting(SettingId::INFINITE_TIME),
            O::SpecialStageRingCount => Setting(SettingId::BS_COUNTDOWN_RINGS),
            O::IczNighttime => Setting(SettingId::ICZ_NIGHTTIME),
            O::AntiFlicker => Setting(SettingId::GFX_ANTIFLICKER),
            O::TitleTheme => Setting(SettingId::AUDIO_TITLE_THEME),
            O::ExtraLifeJingle => Setting(SettingId::AUDIO_EXTRALIFE_JINGLE),
            O::InvincibilityTheme => Setting(SettingId::AUDIO_INVINCIBILITY_THEME),
            O::SuperTheme => Setting(SettingId::AUDIO_SUPER_THEME),
            O::MinibossTheme => Setting(SettingId::AUDIO_MINIBOSS_THEME),
            O::KnucklesTheme => Setting(SettingId::AUDIO_KNUCKLES_THEME),
            O::HpzMusic => Setting(SettingId::AUDIO_HPZ_MUSIC),
            O::Fbz2MidbossTrack => Setting(SettingId::FBZ2_MIDBOSS_TRACK),
            O::SszBossTracks => Setting(SettingId::SSZ_BOSS_TRACKS),
            O::OutroMusic => Setting(SettingId::AUDIO_OUTRO),
            O::CompetitionMenuMusic => Setting(SettingId::AUDIO_COMPETITION_MENU),
            O::ContinueScreenMusic => Setting(SettingId::AUDIO_CONTINUE_SCREEN),
            O::ContinueMusic => Setting(SettingId::CONTINUE_MUSIC),
            O::UnderwaterAudio => Setting(SettingId::UNDERWATER_AUDIO),
            O::Region => Setting(SettingId::REGION_CODE),
            O::TimeAttackGhosts => Setting(SettingId::TIME_ATTACK_GHOSTS),
            O::FixGlitches => Setting(SettingId::FIX_GLITCHES),
            O::DropDash => Setting(SettingId::DROPDASH),
            O::SuperPeelout => Setting(SettingId::SUPER_PEELOUT),
            O::DebugMode => Setting(SettingId::DEBUG_MODE),
            O::TitleScreen => Setting(SettingId::TITLE_SCREEN),

            O::LevelMusicCnz1 | O::LevelMusicCnz2 => SettingBitmask(SettingId::CNZ_PROTOTYPE_MUSIC),
            O::LevelMusicIcz1 | O::LevelMusicIcz2 => SettingBitmask(SettingId::ICZ_PROTOTYPE_MUSIC),
            O::LevelMusicLbz1 | O::LevelMusicLbz2 => SettingBitmask(SettingId::LBZ_PROTOTYPE_MUSIC),

            // Set through side effects or not values at all
            _ => return None,
        };
        Some(binding)
    }

    /// Current backing value. Bitmask bindings need the entry's options to
    /// know which bits they own, so they return the full word here.
    pub fn read(&self, stores: &BackingStores<'_>) -> Option<i64> {
        let config = &*stores.config;
        let value = match *self {
            Binding::Setting(id) | Binding::SettingBitmask(id) => config.settings.value(id) as i64,
            Binding::ConfigInt(field) => config.int(field) as i64,
            Binding::ConfigBool(field) => config.boolean(field) as i64,
            Binding::ConfigEnum8(field) => config.enum8(field) as i64,
            Binding::ConfigPercent(field) => (config.percent(field) * 100.0).round() as i64,
            Binding::ModSetting(r) => stores.mods.setting(r)?.current_value as i64,
        };
        Some(value)
    }

    pub fn write(&self, value: i64, stores: &mut BackingStores<'_>) {
        match *self {
            Binding::Setting(id) => stores.config.settings.set(id, value as u32),
            Binding::SettingBitmask(id) => {
                let mask = (value & BITMASK_BITS) as u32;
                let word = stores.config.settings.value(id);
                let word = if value & BITMASK_ON != 0 { word | mask } else { word & !mask };
                stores.config.settings.set(id, word);
            }
            Binding::ConfigInt(field) => *stores.config.int_mut(field) = value as i32,
            Binding::ConfigBool(field) => *stores.config.bool_mut(field) = value != 0,
            Binding::ConfigEnum8(field) => *stores.config.enum8_mut(field) = value as u8,
            Binding::ConfigPercent(field) => *stores.config.percent_mut(field) = value as f32 / 100.0,
            Binding::ModSetting(r) => {
                if let Some(setting) = stores.mods.setting_mut(r) {
                    setting.current_value = value as u32;
                }
            }
        }
    }
}

/// An option entry's key together with its binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionBinding {
    pub key: OptionKey,
    pub binding: Binding,
}

impl OptionBinding {
    pub fn new(key: OptionKey, binding: Binding) -> Self {
        OptionBinding { key, binding }
    }

    /// Binding of any entry key; `None` for entries without a backing value.
    pub fn for_key(key: OptionKey) -> Option<Self> {
        let binding = match key {
            OptionKey::Builtin(id) => Binding::for_option(id)?,
            OptionKey::Mod(r) => Binding::ModSetting(r),
        };
        Some(OptionBinding::new(key, binding))
    }

    /// Select the option matching the backing value; index 0 if none does.
    pub fn load_value(&self, entry: &mut MenuEntry, stores: &BackingStores<'_>) {
        let Some(value) = self.binding.read(stores) else {
            entry.selected_index = 0;
            return;
        };
        let found = match self.binding {
            Binding::SettingBitmask(_) => {
                let position = entry.options.iter().position(|o| {
                    let mask = o.value & BITMASK_BITS;
                    (o.value & BITMASK_ON != 0) == (value & mask != 0)
                });
                match position {
                    Some(index) => {
                        entry.selected_index = index;
                        true
                    }
                    None => false,
                }
            }
            _ => entry.set_selected_index_by_value(value),
        };
        if !found {
            entry.selected_index = 0;
        }
    }

    pub fn apply_value(&self, entry: &MenuEntry, stores: &mut BackingStores<'_>) {
        if let Some(value) = entry.selected_value() {
            self.binding.write(value, stores);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::tests::speedrun_mod;

    struct Stores {
        db: GameDatabase,
        progress: PlayerProgress,
        config: Configuration,
        mods: ModRegistry,
    }

    impl Stores {
        fn new() -> Self {
            let db = GameDatabase::initialize();
            let config = Configuration::defaults(&db);
            Stores { db, progress: PlayerProgress::default(), config, mods: ModRegistry::new(vec![speedrun_mod()]) }
        }

        fn borrow(&mut self) -> BackingStores<'_> {
            BackingStores { db: &self.db, progress: &self.progress, config: &mut self.config, mods: &mut self.mods }
        }
    }

    fn cnz_entries() -> (MenuEntry, MenuEntry) {
        let act1 = MenuEntry::options("Act 1:", OptionId::LevelMusicCnz1).option("Release", 0x0000_0001).option("Prototype", 0x8000_0001);
        let act2 = MenuEntry::options("Act 2:", OptionId::LevelMusicCnz2).option("Release", 0x0000_0002).option("Prototype", 0x8000_0002);
        (act1, act2)
    }

    #[test]
    fn bitmask_entries_share_a_word_independently() {
        let mut stores = Stores::new();
        let mut stores = stores.borrow();
        let b1 = OptionBinding::for_key(OptionId::LevelMusicCnz1.into()).unwrap();
        let b2 = OptionBinding::for_key(OptionId::LevelMusicCnz2.into()).unwrap();
        let (mut act1, mut act2) = cnz_entries();

        act2.selected_index = 1;
        b2.apply_value(&act2, &mut stores);
        b1.load_value(&mut act1, &stores);
        assert_eq!(act1.selected_index, 0);

        act1.selected_index = 1;
        b1.apply_value(&act1, &mut stores);
        assert_eq!(stores.config.settings.value(SettingId::CNZ_PROTOTYPE_MUSIC), 0b11);

        act1.selected_index = 0;
        b1.apply_value(&act1, &mut stores);
        act2.selected_index = 0;
        b2.load_value(&mut act2, &stores);
        assert_eq!(act2.selected_index, 1);
        assert_eq!(stores.config.settings.value(SettingId::CNZ_PROTOTYPE_MUSIC), 0b10);
    }

    #[test]
    fn percent_round_trips_through_float() {
        let mut stores = Stores::new();
        let mut stores = stores.borrow();
        let b = OptionBinding::new(OptionId::MusicVolume.into(), Binding::for_option(OptionId::MusicVolume).unwrap());
        let mut entry = MenuEntry::options("Music:", OptionId::MusicVolume).percent_options(0, 100, 5);

        b.load_value(&mut entry, &stores);
        assert_eq!(entry.selected_value(), Some(80));

        entry.selected_index = 7;
        b.apply_value(&entry, &mut stores);
        assert!((stores.config.audio.music_volume - 0.35).abs() < 1e-6);
        entry.selected_index = 0;
        b.load_value(&mut entry, &stores);
        assert_eq!(entry.selected_index, 7);
    }

    #[test]
    fn unmatched_value_falls_back_to_first_option() {
        let mut stores = Stores::new();
        let mut stores = stores.borrow();
        stores.config.video.upscaling = 42;
        let b = OptionBinding::new(OptionId::Upscaling.into(), Binding::for_option(OptionId::Upscaling).unwrap());
        let mut entry = MenuEntry::options("", OptionId::Upscaling).option("Integer", 1).option("Aspect fit", 0);
        entry.selected_index = 1;
        b.load_value(&mut entry, &stores);
        assert_eq!(entry.selected_index, 0);
    }

    #[test]
    fn bool_and_enum_fields() {
        let mut stores = Stores::new();
        let mut stores = stores.borrow();
        let ghost = OptionBinding::new(OptionId::GhostSync.into(), Binding::for_option(OptionId::GhostSync).unwrap());
        let entry = MenuEntry::options("", OptionId::GhostSync).option("Off", 0).option("On", 1);
        let mut on = entry.clone();
        on.selected_index = 1;
        ghost.apply_value(&on, &mut stores);
        assert!(stores.config.system.ghost_sync);

        let sync = Binding::for_option(OptionId::FrameSync).unwrap();
        sync.write(2, &mut stores);
        assert_eq!(sync.read(&stores), Some(2));
    }

    #[test]
    fn mod_setting_binding() {
        let mut stores = Stores::new();
        let mut stores = stores.borrow();
        let r = ModSettingRef { mod_index: 0, category: 0, setting: 0 };
        let b = OptionBinding::new(OptionKey::Mod(r), Binding::ModSetting(r));
        let mut entry = MenuEntry::options("Timer style:", OptionKey::Mod(r)).option("Hidden", 0).option("Seconds", 1).option("Frames", 2);
        b.load_value(&mut entry, &stores);
        assert_eq!(entry.selected_index, 1);
        entry.selected_index = 2;
        b.apply_value(&entry, &mut stores);
        assert_eq!(stores.mods.setting(r).unwrap().current_value, 2);

        let dangling = Binding::ModSetting(ModSettingRef { mod_index: 5, category: 0, setting: 0 });
        assert_eq!(dangling.read(&stores), None);
    }

    #[test]
    fn action_options_have_no_binding() {
        assert!(Binding::for_option(OptionId::Back).is_none());
        assert!(Binding::for_option(OptionId::WindowMode).is_none());
        assert!(Binding::for_option(OptionId::ControllerPlayer1).is_none());
    }
}
