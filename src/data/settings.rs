//! Gameplay settings.
//!
//! A setting ID packs its own metadata:
//!   - low byte:       the default value
//!   - bit 31:         the setting is purely visual (allowed in Time Attack)
//!
//! Settings files depend on this: a setting missing from the table still has
//! a well-defined value, its ID's low byte.

use std::collections::{BTreeMap, HashMap};

use super::GameDatabase;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SettingId(pub u32);

impl SettingId {
    pub const FIX_GLITCHES: SettingId              = SettingId(0x0000_0102);
    pub const NO_CONTROL_LOCK: SettingId           = SettingId(0x0000_0201);
    pub const TAILS_ASSIST_MODE: SettingId         = SettingId(0x0000_0301);
    pub const CANCEL_FLIGHT: SettingId             = SettingId(0x0000_0401);
    pub const SUPER_CANCEL: SettingId              = SettingId(0x0000_0501);
    pub const INSTA_SHIELD: SettingId              = SettingId(0x0000_0600);
    pub const HYPER_TAILS: SettingId               = SettingId(0x0000_0701);
    pub const SHIELD_TYPES: SettingId              = SettingId(0x0000_0801);

    pub const AIZ_BLIMPSEQUENCE: SettingId         = SettingId(0x0000_1000);
    pub const LBZ_BIGARMS: SettingId               = SettingId(0x0000_1100);
    pub const LRZ2_BOSS: SettingId                 = SettingId(0x0000_1201);

    pub const EXTENDED_HUD: SettingId              = SettingId(0x8000_2000);
    pub const SMOOTH_ROTATION: SettingId           = SettingId(0x8000_2101);
    pub const SPEEDUP_AFTERIMGS: SettingId         = SettingId(0x8000_2201);
    pub const BS_VISUAL_STYLE: SettingId           = SettingId(0x8000_2303);

    pub const INFINITE_LIVES: SettingId            = SettingId(0x0000_3000);
    pub const INFINITE_TIME: SettingId             = SettingId(0x0000_3100);
    pub const RANDOM_MONITORS: SettingId           = SettingId(0x0000_3200);
    pub const RANDOM_SPECIALSTAGES: SettingId      = SettingId(0x0000_3300);
    pub const BUBBLE_SHIELD_BOUNCE: SettingId      = SettingId(0x0000_3400);
    pub const CAMERA_OUTRUN: SettingId             = SettingId(0x0000_3500);
    pub const EXTENDED_CAMERA: SettingId           = SettingId(0x0000_3600);
    pub const MAINTAIN_SHIELDS: SettingId          = SettingId(0x0000_3700);
    pub const BS_REPEAT_ON_FAIL: SettingId         = SettingId(0x0000_3800);
    pub const DISABLE_GHOST_SPAWN: SettingId       = SettingId(0x0000_3901);

    pub const SUPERFAST_RUNANIM: SettingId         = SettingId(0x8000_4000);
    pub const MONITOR_STYLE: SettingId             = SettingId(0x8000_4100);
    pub const HYPER_DASH_CONTROLS: SettingId       = SettingId(0x0000_4201);
    pub const SUPER_SONIC_ABILITY: SettingId       = SettingId(0x0000_4300);
    pub const MONITOR_BEHAVIOR: SettingId          = SettingId(0x0000_4400);
    pub const LIVES_DISPLAY: SettingId             = SettingId(0x8000_4500);
    pub const BS_COUNTDOWN_RINGS: SettingId        = SettingId(0x8000_4600);
    pub const CONTINUE_MUSIC: SettingId            = SettingId(0x8000_4701);
    pub const UNDERWATER_AUDIO: SettingId          = SettingId(0x8000_4801);
    pub const ICZ_NIGHTTIME: SettingId             = SettingId(0x8000_4900);
    pub const CNZ_PROTOTYPE_MUSIC: SettingId       = SettingId(0x8000_4a00);
    pub const ICZ_PROTOTYPE_MUSIC: SettingId       = SettingId(0x8000_4b00);
    pub const LBZ_PROTOTYPE_MUSIC: SettingId       = SettingId(0x8000_4c00);
    pub const FBZ2_MIDBOSS_TRACK: SettingId        = SettingId(0x8000_4d01);
    pub const SSZ_BOSS_TRACKS: SettingId           = SettingId(0x8000_4e00);

    pub const GFX_ANTIFLICKER: SettingId           = SettingId(0x0000_5001);
    pub const LEVELLAYOUTS: SettingId              = SettingId(0x0000_5102);
    pub const REGION_CODE: SettingId               = SettingId(0x0000_5280);
    pub const TIME_ATTACK_GHOSTS: SettingId        = SettingId(0x0000_5305);

    pub const AUDIO_TITLE_THEME: SettingId         = SettingId(0x8000_6000);
    pub const AUDIO_EXTRALIFE_JINGLE: SettingId    = SettingId(0x8000_6110);
    pub const AUDIO_INVINCIBILITY_THEME: SettingId = SettingId(0x8000_6210);
    pub const AUDIO_SUPER_THEME: SettingId         = SettingId(0x8000_6301);
    pub const AUDIO_MINIBOSS_THEME: SettingId      = SettingId(0x8000_6410);
    pub const AUDIO_KNUCKLES_THEME: SettingId      = SettingId(0x8000_6510);
    pub const AUDIO_HPZ_MUSIC: SettingId           = SettingId(0x8000_6602);
    pub const AUDIO_OUTRO: SettingId               = SettingId(0x8000_6700);
    pub const AUDIO_COMPETITION_MENU: SettingId    = SettingId(0x8000_6800);
    pub const AUDIO_CONTINUE_SCREEN: SettingId     = SettingId(0x8000_6900);

    pub const DROPDASH: SettingId                  = SettingId(0x0000_7000);
    pub const SUPER_PEELOUT: SettingId             = SettingId(0x0000_7100);
    pub const DEBUG_MODE: SettingId                = SettingId(0x0000_7200);
    pub const TITLE_SCREEN: SettingId              = SettingId(0x8000_7300);
    pub const KNUCKLES_AND_TAILS: SettingId        = SettingId(0x0000_7400);

    pub fn default_value(self) -> u32 {
        self.0 & 0xff
    }

    pub fn is_purely_visual(self) -> bool {
        self.0 & 0x8000_0000 != 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Serialization {
    /// Written to the settings file under its identifier.
    Always,
    /// Written, but not offered in regular menus until unlocked.
    Hidden,
    /// Never written; resets every session.
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Setting {
    pub id: SettingId,
    pub identifier: &'static str,
    pub default_value: u32,
    pub serialization: Serialization,
    pub purely_visual: bool,
    pub allow_in_time_attack: bool,
}

impl Setting {
    fn new(id: SettingId, identifier: &'static str, serialization: Serialization, enforce_time_attack: bool) -> Self {
        let purely_visual = id.is_purely_visual();
        Setting {
            id,
            identifier,
            default_value: id.default_value(),
            serialization,
            purely_visual,
            allow_in_time_attack: enforce_time_attack || purely_visual,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.serialization != Serialization::None
    }
}

pub(crate) fn all_settings() -> Vec<Setting> {
    use Serialization::{Always, Hidden, None};

    macro_rules! setting {
        ($id:ident, $ser:expr) => { Setting::new(SettingId::$id, concat!("SETTING_", stringify!($id)), $ser, false) };
        ($id:ident, $ser:expr, time_attack) => { Setting::new(SettingId::$id, concat!("SETTING_", stringify!($id)), $ser, true) };
    }

    vec![
        setting!(FIX_GLITCHES, Always),
        setting!(NO_CONTROL_LOCK, Always),
        setting!(TAILS_ASSIST_MODE, Always),
        setting!(CANCEL_FLIGHT, Always),
        setting!(SUPER_CANCEL, Always),
        setting!(INSTA_SHIELD, Always),
        setting!(HYPER_TAILS, Always),
        setting!(SHIELD_TYPES, Always),

        setting!(AIZ_BLIMPSEQUENCE, Always),
        setting!(LBZ_BIGARMS, Always),
        setting!(LRZ2_BOSS, Always),

        setting!(EXTENDED_HUD, Always),
        setting!(SMOOTH_ROTATION, Always),
        setting!(SPEEDUP_AFTERIMGS, Always),
        setting!(BS_VISUAL_STYLE, Always),

        setting!(INFINITE_LIVES, Always),
        setting!(INFINITE_TIME, Always),
        setting!(RANDOM_MONITORS, Always),
        setting!(RANDOM_SPECIALSTAGES, Always),
        setting!(BUBBLE_SHIELD_BOUNCE, Always),
        // Minimal impact on the simulation, so still fine for Time Attack
        setting!(CAMERA_OUTRUN, Always, time_attack),
        setting!(EXTENDED_CAMERA, Always, time_attack),
        setting!(MAINTAIN_SHIELDS, Always),
        setting!(BS_REPEAT_ON_FAIL, Always),
        setting!(DISABLE_GHOST_SPAWN, Always),

        setting!(SUPERFAST_RUNANIM, Always),
        setting!(MONITOR_STYLE, Always),
        setting!(HYPER_DASH_CONTROLS, Always),
        setting!(SUPER_SONIC_ABILITY, Always),
        setting!(MONITOR_BEHAVIOR, Always),
        setting!(LIVES_DISPLAY, Always),
        setting!(BS_COUNTDOWN_RINGS, Always),
        setting!(CONTINUE_MUSIC, Always),
        setting!(UNDERWATER_AUDIO, Always),
        setting!(ICZ_NIGHTTIME, Always),
        setting!(CNZ_PROTOTYPE_MUSIC, Always),
        setting!(ICZ_PROTOTYPE_MUSIC, Always),
        setting!(LBZ_PROTOTYPE_MUSIC, Always),
        setting!(FBZ2_MIDBOSS_TRACK, Always),
        setting!(SSZ_BOSS_TRACKS, Always),

        setting!(GFX_ANTIFLICKER, Always, time_attack),
        setting!(LEVELLAYOUTS, Always),
        setting!(REGION_CODE, Always),
        setting!(TIME_ATTACK_GHOSTS, Always),

        setting!(AUDIO_TITLE_THEME, Always),
        setting!(AUDIO_EXTRALIFE_JINGLE, Always),
        setting!(AUDIO_INVINCIBILITY_THEME, Always),
        setting!(AUDIO_SUPER_THEME, Always),
        setting!(AUDIO_MINIBOSS_THEME, Always),
        setting!(AUDIO_KNUCKLES_THEME, Always),
        setting!(AUDIO_HPZ_MUSIC, Always),
        setting!(AUDIO_OUTRO, Always),
        setting!(AUDIO_COMPETITION_MENU, Always),
        setting!(AUDIO_CONTINUE_SCREEN, Always),

        setting!(DROPDASH, Hidden),
        setting!(SUPER_PEELOUT, Hidden),
        setting!(DEBUG_MODE, Hidden),
        setting!(TITLE_SCREEN, Hidden),

        setting!(KNUCKLES_AND_TAILS, None),
    ]
}

// ── Current values ──

/// Current value of every setting. Starts out at the defaults encoded in
/// the IDs; persisted through the `[settings]` table of the config file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsStore {
    values: HashMap<u32, u32>,
}

impl SettingsStore {
    pub fn new(db: &GameDatabase) -> Self {
        let mut store = SettingsStore::default();
        store.reset_to_defaults(db);
        store
    }

    pub fn value(&self, id: SettingId) -> u32 {
        self.values.get(&id.0).copied().unwrap_or(id.default_value())
    }

    pub fn set(&mut self, id: SettingId, value: u32) {
        self.values.insert(id.0, value);
    }

    pub fn reset_to_defaults(&mut self, db: &GameDatabase) {
        self.values.clear();
        for setting in db.settings() {
            self.values.insert(setting.id.0, setting.default_value);
        }
    }

    /// Values to write, keyed by identifier. Non-persisted settings are left out.
    pub fn persisted(&self, db: &GameDatabase) -> BTreeMap<String, u32> {
        db.settings()
            .iter()
            .filter(|s| s.is_persisted())
            .map(|s| (s.identifier.to_string(), self.value(s.id)))
            .collect()
    }

    /// Apply values read from the settings file. Unknown identifiers and
    /// non-persisted settings are ignored.
    pub fn load_persisted(&mut self, db: &GameDatabase, values: &BTreeMap<String, u32>) {
        for (identifier, value) in values {
            match db.setting_by_identifier(identifier) {
                Some(setting) if setting.is_persisted() => self.set(setting.id, *value),
                Some(_) => {}
                None => log::debug!("ignoring unknown setting {identifier}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_value_is_low_byte_of_id() {
        assert_eq!(SettingId::FIX_GLITCHES.default_value(), 2);
        assert_eq!(SettingId::REGION_CODE.default_value(), 0x80);
        assert_eq!(SettingId::BS_VISUAL_STYLE.default_value(), 3);
        assert_eq!(SettingId(0x1234_56ab).default_value(), 0xab);
    }

    #[test]
    fn purely_visual_is_top_bit() {
        assert!(SettingId::SMOOTH_ROTATION.is_purely_visual());
        assert!(!SettingId::FIX_GLITCHES.is_purely_visual());
    }

    #[test]
    fn unknown_setting_falls_back_to_low_byte() {
        let db = GameDatabase::initialize();
        let store = SettingsStore::new(&db);
        assert_eq!(store.value(SettingId(0x0000_ee07)), 0x07);
    }

    #[test]
    fn time_attack_eligibility() {
        let db = GameDatabase::initialize();
        let rotation = db.setting(SettingId::SMOOTH_ROTATION).unwrap();
        assert!(rotation.allow_in_time_attack);
        let outrun = db.setting(SettingId::CAMERA_OUTRUN).unwrap();
        assert!(!outrun.purely_visual);
        assert!(outrun.allow_in_time_attack);
        let lives = db.setting(SettingId::INFINITE_LIVES).unwrap();
        assert!(!lives.allow_in_time_attack);
    }

    #[test]
    fn persisted_skips_never_serialized() {
        let db = GameDatabase::initialize();
        let mut store = SettingsStore::new(&db);
        store.set(SettingId::DROPDASH, 1);
        store.set(SettingId::KNUCKLES_AND_TAILS, 1);
        let out = store.persisted(&db);
        assert_eq!(out.get("SETTING_DROPDASH"), Some(&1));
        assert!(!out.contains_key("SETTING_KNUCKLES_AND_TAILS"));
        assert_eq!(out.get("SETTING_FIX_GLITCHES"), Some(&2));
    }

    #[test]
    fn load_persisted_ignores_unknown_and_unserialized() {
        let db = GameDatabase::initialize();
        let mut store = SettingsStore::new(&db);
        let mut values = BTreeMap::new();
        values.insert("SETTING_INFINITE_LIVES".to_string(), 1);
        values.insert("SETTING_KNUCKLES_AND_TAILS".to_string(), 1);
        values.insert("SETTING_NOT_A_THING".to_string(), 9);
        store.load_persisted(&db, &values);
        assert_eq!(store.value(SettingId::INFINITE_LIVES), 1);
        assert_eq!(store.value(SettingId::KNUCKLES_AND_TAILS), 0);
    }
}
