//! Options that are hidden while in-game or until a secret is unlocked.

use crate::data::{PlayerProgress, SecretId};

use super::option_id::OptionId;

#[derive(Clone, Copy, Debug)]
pub struct ConditionalOption {
    pub option: OptionId,
    pub hidden_in_game: bool,
    pub required_secret: Option<SecretId>,
}

impl ConditionalOption {
    const fn ingame(option: OptionId) -> Self {
        ConditionalOption { option, hidden_in_game: true, required_secret: None }
    }

    const fn secret(option: OptionId, hidden_in_game: bool, secret: SecretId) -> Self {
        ConditionalOption { option, hidden_in_game, required_secret: Some(secret) }
    }

    pub fn should_be_visible(&self, entered_from_ingame: bool, progress: &PlayerProgress) -> bool {
        if self.hidden_in_game && entered_from_ingame {
            return false;
        }
        match self.required_secret {
            Some(secret) => progress.is_secret_unlocked(secret),
            None => true,
        }
    }
}

pub const CONDITIONAL_OPTIONS: &[ConditionalOption] = &[
    ConditionalOption::ingame(OptionId::Soundtrack),
    ConditionalOption::ingame(OptionId::SoundtrackDownload),
    ConditionalOption::ingame(OptionId::SoundTest),
    ConditionalOption::ingame(OptionId::TitleTheme),
    ConditionalOption::ingame(OptionId::OutroMusic),
    ConditionalOption::ingame(OptionId::CompetitionMenuMusic),

    ConditionalOption::ingame(OptionId::AntiFlicker),
    ConditionalOption::ingame(OptionId::IczNighttime),
    ConditionalOption::ingame(OptionId::MonitorStyle),

    ConditionalOption::ingame(OptionId::LevelLayouts),
    ConditionalOption::ingame(OptionId::AizBlimpSequence),
    ConditionalOption::ingame(OptionId::LbzBigArms),
    ConditionalOption::ingame(OptionId::SozGhostSpawn),
    ConditionalOption::ingame(OptionId::Lrz2Boss),
    ConditionalOption::ingame(OptionId::TimeAttackGhosts),
    ConditionalOption::ingame(OptionId::TimeAttackInstantRestart),

    ConditionalOption::secret(OptionId::DropDash, false, SecretId::Dropdash),
    ConditionalOption::secret(OptionId::SuperPeelout, false, SecretId::SuperPeelout),

    ConditionalOption::secret(OptionId::DebugMode, false, SecretId::Debugmode),
    ConditionalOption::secret(OptionId::TitleScreen, true, SecretId::TitleSk),
    ConditionalOption::ingame(OptionId::ShieldTypes),
    ConditionalOption::ingame(OptionId::RandomMonitors),
    ConditionalOption::ingame(OptionId::MonitorBehavior),
    ConditionalOption::ingame(OptionId::RandomSpecialStages),
    ConditionalOption::ingame(OptionId::SpecialStageRepeat),
    ConditionalOption::ingame(OptionId::Region),
    ConditionalOption::secret(OptionId::GameSpeed, false, SecretId::GameSpeed),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn find(option: OptionId) -> ConditionalOption {
        *CONDITIONAL_OPTIONS.iter().find(|c| c.option == option).unwrap()
    }

    #[test]
    fn ingame_flag_hides_only_when_entered_from_game() {
        let progress = PlayerProgress::default();
        let c = find(OptionId::LevelLayouts);
        assert!(c.should_be_visible(false, &progress));
        assert!(!c.should_be_visible(true, &progress));
    }

    #[test]
    fn secret_gate_follows_unlock_state() {
        let mut progress = PlayerProgress::default();
        let dropdash = find(OptionId::DropDash);
        assert!(!dropdash.should_be_visible(false, &progress));
        progress.unlock_secret(SecretId::Dropdash);
        for _ in 0..3 {
            assert!(dropdash.should_be_visible(false, &progress));
            assert!(dropdash.should_be_visible(true, &progress));
        }

        let title = find(OptionId::TitleScreen);
        progress.unlock_secret(SecretId::TitleSk);
        assert!(title.should_be_visible(false, &progress));
        assert!(!title.should_be_visible(true, &progress));
    }

    #[test]
    fn options_are_listed_once() {
        let mut seen = std::collections::HashSet::new();
        assert!(CONDITIONAL_OPTIONS.iter().all(|c| seen.insert(c.option)));
        assert_eq!(CONDITIONAL_OPTIONS.len(), 27);
    }
}
