//! Achievements and the secrets they unlock.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::GameDatabase;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AchievementId {
    Rings300,
    DoubleInvincibility,
    Continues,
    GoingHyper,
    Score,
    Electrocute,
    Longplay,
    BlueSpherePerfect,
    GlowingSpheresExitTop,
    SlotMachineJackpot,
    AizTimeAttack,
    MgzGiantRings,
    IczSnowboarding,
    IczKnuxSunrise,
    LbzStayDry,
    MhzOpenMonitors,
    FbzFreeAnimals,
    SszDecoys,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SecretId {
    CompetitionMode,
    Dropdash,
    KnuxAndTails,
    SuperPeelout,
    Debugmode,
    BlueSphere,
    LevelSelect,
    TitleSk,
    GameSpeed,
    DoomsdayZone,
}

impl AchievementId {
    /// Key the counter is persisted under.
    pub fn identifier(self) -> &'static str {
        use AchievementId::*;
        match self {
            Rings300 => "ACHIEVEMENT_300_RINGS",
            DoubleInvincibility => "ACHIEVEMENT_DOUBLE_INVINCIBILITY",
            Continues => "ACHIEVEMENT_CONTINUES",
            GoingHyper => "ACHIEVEMENT_GOING_HYPER",
            Score => "ACHIEVEMENT_SCORE",
            Electrocute => "ACHIEVEMENT_ELECTROCUTE",
            Longplay => "ACHIEVEMENT_LONGPLAY",
            BlueSpherePerfect => "ACHIEVEMENT_BS_PERFECT",
            GlowingSpheresExitTop => "ACHIEVEMENT_GS_EXIT_TOP",
            SlotMachineJackpot => "ACHIEVEMENT_SM_JACKPOT",
            AizTimeAttack => "ACHIEVEMENT_AIZ_TIMEATTACK",
            MgzGiantRings => "ACHIEVEMENT_MGZ_GIANTRINGS",
            IczSnowboarding => "ACHIEVEMENT_ICZ_SNOWBOARDING",
            IczKnuxSunrise => "ACHIEVEMENT_ICZ_KNUX_SUNRISE",
            LbzStayDry => "ACHIEVEMENT_LBZ_STAY_DRY",
            MhzOpenMonitors => "ACHIEVEMENT_MHZ_OPEN_MONITORS",
            FbzFreeAnimals => "ACHIEVEMENT_FBZ_FREE_ANIMALS",
            SszDecoys => "ACHIEVEMENT_SSZ_DECOYS",
        }
    }
}

impl SecretId {
    pub fn identifier(self) -> &'static str {
        use SecretId::*;
        match self {
            CompetitionMode => "SECRET_COMPETITION_MODE",
            Dropdash => "SECRET_DROPDASH",
            KnuxAndTails => "SECRET_KNUX_AND_TAILS",
            SuperPeelout => "SECRET_SUPER_PEELOUT",
            Debugmode => "SECRET_DEBUGMODE",
            BlueSphere => "SECRET_BLUE_SPHERE",
            LevelSelect => "SECRET_LEVELSELECT",
            TitleSk => "SECRET_TITLE_SK",
            GameSpeed => "SECRET_GAME_SPEED",
            DoomsdayZone => "SECRET_DOOMSDAY_ZONE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub hint: &'static str,
    pub image: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Secret {
    pub id: SecretId,
    pub name: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    /// Number of completed achievements needed; 0 when unlocked some other way.
    pub required_achievements: u32,
    pub unlocked_by_achievements: bool,
    pub hidden_until_unlocked: bool,
    pub shown_in_menu: bool,
    pub serialized: bool,
}

pub(crate) fn all_achievements() -> Vec<Achievement> {
    use AchievementId::*;
    let a = |id, name, description, image| Achievement { id, name, description, hint: "", image };
    vec![
        a(Rings300, "Attracted to shiny things", "Collect 300 rings without losing them.", "rings"),
        a(DoubleInvincibility, "Double dose of stars", "Open another invincibility monitor while still invincible from the last one.", "invincibility"),
        a(Continues, "Old-fashioned life insurance", "Have 5 continues in a single game.", "continues"),
        a(GoingHyper, "Going Hyper", "Collect all 14 emeralds and transform into a Hyper form.", "hyperform"),
        a(Score, "Millionaire score", "Get a score of 1,000,000 points.", "score"),
        a(Electrocute, "Electric fishing", "Defeat an underwater enemy by electrocution.", "electrocution"),
        a(Longplay, "Longplay", "Beat the game with any character.", "gamebeaten"),
        a(BlueSpherePerfect, "Clean sweep", "Complete a Blue Sphere stage with a perfect.", "perfect"),
        a(GlowingSpheresExitTop, "Is there an exit up there?", "Reach the top of the Glowing Spheres bonus stage.", "glowingspheres"),
        a(SlotMachineJackpot, "Jackpot", "Win the jackpot in the Slot Machine bonus stage.", "jackpot"),
        a(AizTimeAttack, "Cutting through the jungle", "Finish Angel Island Zone Act 1 in Time Attack in under 45 seconds.", "timeattack_aiz1"),
        a(MgzGiantRings, "Attracted to giant shiny things", "Enter or collect 6 giant rings in Marble Garden Zone Act 1 in a single run without dying.", "giantrings_mgz1"),
        a(IczSnowboarding, "Greedy snowboarder", "Collect all 50 rings in the snowboarding section of IceCap Zone Act 1.", "snowboarding"),
        a(IczKnuxSunrise, "See the sunrise once", "Defeat the upper boss of IceCap Zone Act 1 with Knuckles (you might need a friend for that).", "icecap1boss"),
        a(LbzStayDry, "Fluffy fur must not get wet", "Finish Launch Base Zone Act 2 without touching any water (requires A.I.R. level layout).", "staydry"),
        a(MhzOpenMonitors, "Monitor breaker", "Open 18 monitors in Mushroom Hill Zone Act 1 with Knuckles.", "monitors"),
        a(FbzFreeAnimals, "Squirrels on a plane", "Free 35 animals in Flying Battery Zone Act 1 before the boss.", "animals"),
        a(SszDecoys, "Don't touch", "Fight the second boss in Sonic's Sky Sanctuary, but pop at most one of the inflatable Mechas.", "decoys"),
    ]
}

pub(crate) fn all_secrets() -> Vec<Secret> {
    use SecretId::*;
    let s = |id, hidden_until_unlocked, shown_in_menu, serialized, required_achievements: u32, name, description, image| Secret {
        id,
        name,
        description,
        image,
        required_achievements,
        unlocked_by_achievements: required_achievements > 0,
        hidden_until_unlocked,
        shown_in_menu,
        serialized,
    };
    vec![
        s(CompetitionMode, false, true,  false,  0, "Competition Mode", "As known from the original Sonic 3 (& Knuckles).", "competitionmode"),
        s(Dropdash,        false, true,  true,   3, "Sonic Drop Dash", "In the Options menu (under Controls), you can now enable Sonic's Drop Dash move for Normal Game and Act Select.", "dropdash"),
        s(KnuxAndTails,    false, true,  true,   5, "Knuckles & Tails Mode", "Play as the Knuckles and Tails character combination in Normal Game and Act Select.", "knuckles_tails"),
        s(SuperPeelout,    false, true,  true,   7, "Sonic Super Peel-Out", "The Super Peel-Out move is available in the Options menu. This also unlocks the \"Max Control\" game mode in Act Select.", "superpeelout"),
        s(Debugmode,       false, true,  true,  10, "Debug Mode", "Debug Mode can be enabled in the Options menu (under Tweaks) and is available in Normal Game and Act Select.", "debugmode"),
        s(BlueSphere,      false, true,  true,  12, "Blue Sphere", "Adds the Blue Sphere game to the Extras, as known from plugging Sonic 1 into Sonic & Knuckles.", "bluesphere"),
        s(LevelSelect,     true,  true,  true,   0, "Level Select", "Adds the original Sonic 3 & Knuckles Level Select menu to the Extras.", "levelselect"),
        s(TitleSk,         true,  true,  true,   0, "Sonic & Knuckles Title", "You can now select the Sonic & Knuckles title screen in the Options menu.", "title_sk"),
        s(GameSpeed,       true,  true,  true,   0, "Game Speed", "Ready for a new challenge? Adjust the game speed to faster or slower in the Options menu.", "gamespeed"),
        s(DoomsdayZone,    true,  false, true,   0, "Doomsday Zone", "", ""),
    ]
}

// ── Progress ──

/// Per-achievement progress counters. A value of 1 or more means completed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AchievementProgress {
    values: HashMap<AchievementId, u32>,
}

impl AchievementProgress {
    pub fn value(&self, id: AchievementId) -> u32 {
        self.values.get(&id).copied().unwrap_or(0)
    }

    pub fn set_value(&mut self, id: AchievementId, value: u32) {
        self.values.insert(id, value);
    }

    pub fn completed_count(&self) -> u32 {
        self.values.values().filter(|&&v| v > 0).count() as u32
    }

    pub fn reset_all(&mut self, db: &GameDatabase) {
        self.values.clear();
        for achievement in db.achievements() {
            self.values.insert(achievement.id, 0);
        }
    }

    /// Counters from the save file. Unknown identifiers are skipped.
    pub fn from_persisted(db: &GameDatabase, stored: &BTreeMap<String, u32>) -> Self {
        let mut progress = AchievementProgress::default();
        for (identifier, &value) in stored {
            match db.achievements().iter().find(|a| a.id.identifier() == identifier) {
                Some(achievement) => progress.set_value(achievement.id, value),
                None => log::warn!("unknown achievement '{identifier}' in progress"),
            }
        }
        progress
    }

    pub fn persisted(&self) -> BTreeMap<String, u32> {
        self.values.iter().map(|(id, &value)| (id.identifier().to_string(), value)).collect()
    }
}

/// Unlocked secrets of the current player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerProgress {
    unlocked: BTreeSet<SecretId>,
}

impl PlayerProgress {
    pub fn is_secret_unlocked(&self, id: SecretId) -> bool {
        self.unlocked.contains(&id)
    }

    /// Returns true if the secret was newly unlocked.
    pub fn unlock_secret(&mut self, id: SecretId) -> bool {
        let newly = self.unlocked.insert(id);
        if newly {
            log::debug!("secret unlocked: {:?}", id);
        }
        newly
    }

    /// Unlock every achievement-gated secret whose threshold is reached.
    /// Returns the secrets that were newly unlocked.
    pub fn unlock_secrets_by_achievements(&mut self, db: &GameDatabase, completed: u32) -> Vec<SecretId> {
        db.secrets()
            .iter()
            .filter(|s| s.unlocked_by_achievements && completed >= s.required_achievements)
            .filter_map(|s| self.unlock_secret(s.id).then_some(s.id))
            .collect()
    }

    /// Secrets that get persisted, for the save file.
    pub fn serialized_secrets<'a>(&'a self, db: &'a GameDatabase) -> impl Iterator<Item = SecretId> + 'a {
        self.unlocked
            .iter()
            .copied()
            .filter(move |id| db.secret(*id).is_some_and(|s| s.serialized))
    }

    /// Unlocked secrets from the save file. Secrets that are never
    /// serialized stay locked even when listed.
    pub fn from_persisted(db: &GameDatabase, stored: &[String]) -> Self {
        let mut progress = PlayerProgress::default();
        for identifier in stored {
            match db.secrets().iter().find(|s| s.id.identifier() == identifier) {
                Some(secret) if secret.serialized => {
                    progress.unlocked.insert(secret.id);
                }
                Some(_) => {}
                None => log::warn!("unknown secret '{identifier}' in progress"),
            }
        }
        progress
    }

    pub fn persisted(&self, db: &GameDatabase) -> Vec<String> {
        self.serialized_secrets(db).map(|id| id.identifier().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_flags_match_table() {
        let db = GameDatabase::initialize();
        let comp = db.secret(SecretId::CompetitionMode).unwrap();
        assert!(!comp.serialized && comp.shown_in_menu && !comp.unlocked_by_achievements);
        let dd = db.secret(SecretId::Dropdash).unwrap();
        assert_eq!(dd.required_achievements, 3);
        assert!(dd.unlocked_by_achievements);
        let doomsday = db.secret(SecretId::DoomsdayZone).unwrap();
        assert!(doomsday.hidden_until_unlocked && !doomsday.shown_in_menu);
    }

    #[test]
    fn achievement_thresholds_unlock_in_order() {
        let db = GameDatabase::initialize();
        let mut progress = PlayerProgress::default();
        assert!(progress.unlock_secrets_by_achievements(&db, 2).is_empty());

        let unlocked = progress.unlock_secrets_by_achievements(&db, 7);
        assert_eq!(unlocked, vec![SecretId::Dropdash, SecretId::KnuxAndTails, SecretId::SuperPeelout]);
        assert!(!progress.is_secret_unlocked(SecretId::Debugmode));

        // Nothing new on a repeated call
        assert!(progress.unlock_secrets_by_achievements(&db, 7).is_empty());
        // Non-achievement secrets never unlock this way
        progress.unlock_secrets_by_achievements(&db, 100);
        assert!(!progress.is_secret_unlocked(SecretId::LevelSelect));
        assert!(progress.is_secret_unlocked(SecretId::BlueSphere));
    }

    #[test]
    fn competition_mode_is_not_serialized() {
        let db = GameDatabase::initialize();
        let mut progress = PlayerProgress::default();
        progress.unlock_secret(SecretId::CompetitionMode);
        progress.unlock_secret(SecretId::GameSpeed);
        let saved: Vec<_> = progress.serialized_secrets(&db).collect();
        assert_eq!(saved, vec![SecretId::GameSpeed]);
    }

    #[test]
    fn progress_survives_the_save_file() {
        let db = GameDatabase::initialize();
        let mut achievements = AchievementProgress::default();
        achievements.set_value(AchievementId::SszDecoys, 1);
        achievements.set_value(AchievementId::Rings300, 0);
        let stored = achievements.persisted();
        assert_eq!(stored["ACHIEVEMENT_SSZ_DECOYS"], 1);
        assert_eq!(AchievementProgress::from_persisted(&db, &stored), achievements);

        let mut secrets = PlayerProgress::default();
        secrets.unlock_secret(SecretId::TitleSk);
        secrets.unlock_secret(SecretId::CompetitionMode);
        let stored = secrets.persisted(&db);
        assert_eq!(stored, vec!["SECRET_TITLE_SK".to_string()]);

        let mut listed = stored.clone();
        listed.push("SECRET_COMPETITION_MODE".into());
        listed.push("SECRET_UNKNOWN".into());
        let reloaded = PlayerProgress::from_persisted(&db, &listed);
        assert!(reloaded.is_secret_unlocked(SecretId::TitleSk));
        assert!(!reloaded.is_secret_unlocked(SecretId::CompetitionMode));
    }

    #[test]
    fn identifiers_are_unique() {
        let db = GameDatabase::initialize();
        let mut ids: Vec<_> = db.achievements().iter().map(|a| a.id.identifier()).collect();
        ids.extend(db.secrets().iter().map(|s| s.id.identifier()));
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn reset_clears_every_counter() {
        let db = GameDatabase::initialize();
        let mut progress = AchievementProgress::default();
        progress.set_value(AchievementId::Score, 1);
        progress.set_value(AchievementId::Rings300, 3);
        assert_eq!(progress.completed_count(), 2);
        progress.reset_all(&db);
        assert_eq!(progress.completed_count(), 0);
        assert_eq!(progress.value(AchievementId::Score), 0);
    }
}
