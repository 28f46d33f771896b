//! Option identities.

use crate::mods::ModSettingRef;

/// Every built-in option the menu knows, plus the pseudo-options used for
/// plain buttons and the tab strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionId {
    // System
    ReleaseChannel,
    GhostSync,
    ScriptOptimization,
    GameRecordingMode,

    // Display
    Renderer,
    FrameSync,
    Upscaling,
    Backdrop,
    Filtering,
    Scanlines,
    BgBlur,
    WindowMode,
    WindowModeStartup,
    PerformanceDisplay,

    // Audio
    AudioVolume,
    MusicVolume,
    SoundVolume,
    Soundtrack,
    SoundtrackDownload,
    SoundTest,
    TitleTheme,
    ExtraLifeJingle,
    InvincibilityTheme,
    SuperTheme,
    MinibossTheme,
    KnucklesTheme,
    LevelMusicCnz1,
    LevelMusicCnz2,
    LevelMusicIcz1,
    LevelMusicIcz2,
    LevelMusicLbz1,
    LevelMusicLbz2,
    Fbz2MidbossTrack,
    HpzMusic,
    SszBossTracks,
    OutroMusic,
    CompetitionMenuMusic,
    ContinueScreenMusic,
    ContinueMusic,
    UnderwaterAudio,

    // Visuals
    Rotation,
    TimeDisplay,
    LivesDisplay,
    SpeedupAfterImages,
    FastRunAnim,
    AntiFlicker,
    CameraOutrun,
    ExtendedCamera,
    MonitorStyle,
    IczNighttime,
    SpecialStageVisuals,
    SpecialStageRingCount,

    // Gameplay
    LevelLayouts,
    AizBlimpSequence,
    LbzBigArms,
    SozGhostSpawn,
    Lrz2Boss,
    MaintainShields,
    TimeAttackGhosts,
    TimeAttackInstantRestart,

    // Controls
    DropDash,
    SuperPeelout,
    ControllerSetup,
    ControllerPlayer1,
    ControllerPlayer2,
    ControllerAutoassign,
    ControllerRumbleP1,
    ControllerRumbleP2,
    VGamepadOpacity,
    VGamepadDpadSize,
    VGamepadButtonsSize,
    VGamepadSetup,
    InstaShield,
    TailsAssist,
    TailsFlightCancel,
    NoControlLock,
    BubbleShieldBounce,
    HyperTails,
    SuperCancel,
    SuperSonicAbility,
    HyperDashControls,

    // Tweaks
    DebugMode,
    TitleScreen,
    GameSpeed,
    InfiniteLives,
    InfiniteTime,
    ShieldTypes,
    RandomMonitors,
    MonitorBehavior,
    RandomSpecialStages,
    SpecialStageRepeat,
    Region,
    FixGlitches,

    // Buttons
    CheckForUpdate,
    OpenHomepage,
    OpenManual,
    Back,
    TabSelection,
}

impl OptionId {
    /// Music choices; changing one of these in-game doesn't affect tracks
    /// that are already playing.
    pub fn is_music_choice(self) -> bool {
        use OptionId::*;
        matches!(
            self,
            TitleTheme
                | ExtraLifeJingle
                | InvincibilityTheme
                | SuperTheme
                | MinibossTheme
                | KnucklesTheme
                | LevelMusicCnz1
                | LevelMusicCnz2
                | LevelMusicIcz1
                | LevelMusicIcz2
                | LevelMusicLbz1
                | LevelMusicLbz2
                | Fbz2MidbossTrack
                | HpzMusic
                | SszBossTracks
                | OutroMusic
        )
    }

    pub fn controller_player(self) -> Option<usize> {
        match self {
            OptionId::ControllerPlayer1 | OptionId::ControllerRumbleP1 => Some(0),
            OptionId::ControllerPlayer2 | OptionId::ControllerRumbleP2 => Some(1),
            _ => None,
        }
    }
}

/// Key of one option entry: a built-in option or a mod-supplied setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Builtin(OptionId),
    Mod(ModSettingRef),
}

impl From<OptionId> for OptionKey {
    fn from(id: OptionId) -> Self {
        OptionKey::Builtin(id)
    }
}

impl OptionKey {
    pub fn builtin(self) -> Option<OptionId> {
        match self {
            OptionKey::Builtin(id) => Some(id),
            OptionKey::Mod(_) => None,
        }
    }
}
