//! Static game database: zones, gameplay settings, achievements and secrets.
//!
//! Built once at startup through [`GameDatabase::initialize`] and passed around
//! by reference. Nothing in here changes afterwards; current values live in
//! [`SettingsStore`], [`AchievementProgress`] and [`PlayerProgress`].

pub mod achievements;
pub mod settings;
pub mod zones;

use achievements::{Achievement, Secret};
use settings::Setting;
use zones::Zone;

pub use achievements::{AchievementProgress, PlayerProgress, SecretId};
pub use settings::{SettingId, SettingsStore};

pub struct GameDatabase {
    zones: Vec<Zone>,
    settings: Vec<Setting>,
    achievements: Vec<Achievement>,
    secrets: Vec<Secret>,
}

impl GameDatabase {
    pub fn initialize() -> Self {
        let db = GameDatabase {
            zones: zones::all_zones(),
            settings: settings::all_settings(),
            achievements: achievements::all_achievements(),
            secrets: achievements::all_secrets(),
        };
        log::debug!(
            "game database: {} zones, {} settings, {} achievements, {} secrets",
            db.zones.len(),
            db.settings.len(),
            db.achievements.len(),
            db.secrets.len()
        );
        db
    }

    #[cfg(test)]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone_by_internal_index(&self, index: u8) -> Option<&Zone> {
        self.zones.iter().find(|z| z.internal_index == index)
    }

    #[cfg(test)]
    pub fn setting(&self, id: SettingId) -> Option<&Setting> {
        self.settings.iter().find(|s| s.id == id)
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn setting_by_identifier(&self, identifier: &str) -> Option<&Setting> {
        self.settings.iter().find(|s| s.identifier == identifier)
    }

    #[cfg(test)]
    pub fn achievement(&self, id: achievements::AchievementId) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn secret(&self, id: SecretId) -> Option<&Secret> {
        self.secrets.iter().find(|s| s.id == id)
    }

    pub fn secrets(&self) -> &[Secret] {
        &self.secrets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::achievements::AchievementId;
    use crate::data::settings::Serialization;

    #[test]
    fn tables_are_populated() {
        let db = GameDatabase::initialize();
        assert_eq!(db.zones().len(), 14);
        assert_eq!(db.achievements().len(), 18);
        assert_eq!(db.secrets().len(), 10);
        assert!(db.settings().len() > 50);
    }

    #[test]
    fn zone_lookup_by_internal_index() {
        let db = GameDatabase::initialize();
        assert_eq!(db.zone_by_internal_index(0x16).unwrap().short_name, "hpz");
        assert_eq!(db.zone_by_internal_index(0x04).unwrap().short_name, "fbz");
        assert!(db.zone_by_internal_index(0x0d).is_none());
        assert_eq!(db.zone_by_internal_index(0x0c).unwrap().acts_time_attack, 0);
    }

    #[test]
    fn setting_ids_are_unique() {
        let db = GameDatabase::initialize();
        let mut ids: Vec<u32> = db.settings().iter().map(|s| s.id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), db.settings().len());
    }

    #[test]
    fn setting_lookup_by_identifier() {
        let db = GameDatabase::initialize();
        let s = db.setting_by_identifier("SETTING_REGION_CODE").unwrap();
        assert_eq!(s.id, SettingId::REGION_CODE);
        assert_eq!(s.default_value, 0x80);
        assert_eq!(db.setting(SettingId::TITLE_SCREEN).unwrap().serialization, Serialization::Hidden);
        assert_eq!(db.setting(SettingId::KNUCKLES_AND_TAILS).unwrap().serialization, Serialization::None);
    }

    #[test]
    fn achievement_lookup() {
        let db = GameDatabase::initialize();
        assert_eq!(db.achievement(AchievementId::SszDecoys).unwrap().image, "decoys");
    }
}
