//! Static per-tab entry tables, and the Mods tab built from the mod registry.

use crate::engine::Color;
use crate::mods::{ModRegistry, ModSettingRef};

use super::entries::{EntryKind, MenuEntries, MenuEntry};
use super::option_id::{OptionId, OptionKey};
use super::tabs::{Tab, TabId};

pub const OTHER_SETTINGS: &str = "Other settings";

/// Entries unlocked by secrets, listed at the top of their tab under a
/// shared title that is only shown while one of them is available.
pub fn secrets_group(tab: TabId) -> &'static [OptionId] {
    match tab {
        TabId::Controls => &[OptionId::DropDash, OptionId::SuperPeelout],
        TabId::Tweaks => &[OptionId::DebugMode, OptionId::TitleScreen, OptionId::GameSpeed],
        _ => &[],
    }
}

/// The horizontal tab strip: a single options entry with one option per tab.
pub fn build_tab_strip() -> MenuEntries {
    let mut strip = MenuEntries::new();
    let mut entry = MenuEntry::options("", OptionId::TabSelection);
    for tab in TabId::ALL {
        entry.add_option(tab.title(), tab.index() as i64);
    }
    strip.push(entry);
    strip
}

/// All tabs in strip order. The Mods tab only holds its placeholder; it is
/// filled by `build_mods_tab`.
pub fn build_tabs(has_virtual_gamepad: bool) -> Vec<Tab> {
    TabId::ALL
        .iter()
        .map(|&id| {
            let mut tab = Tab::new(id);
            tab.entries.push(MenuEntry::dummy());
            match id {
                TabId::Mods => return tab,
                TabId::System => system_tab(&mut tab.entries),
                TabId::Display => display_tab(&mut tab.entries),
                TabId::Audio => audio_tab(&mut tab.entries),
                TabId::Visuals => visuals_tab(&mut tab.entries),
                TabId::Gameplay => gameplay_tab(&mut tab.entries),
                TabId::Controls => controls_tab(&mut tab.entries, has_virtual_gamepad),
                TabId::Tweaks => tweaks_tab(&mut tab.entries),
            }
            tab.entries.push(back());
            tab
        })
        .collect()
}

fn back() -> MenuEntry {
    MenuEntry::options("Back", OptionId::Back)
}

fn off_on(text: &str, id: OptionId) -> MenuEntry {
    MenuEntry::options(text, id).option("Off", 0).option("On", 1)
}

fn system_tab(e: &mut MenuEntries) {
    e.push(MenuEntry::title("Update"));
    e.push(MenuEntry::options("Check for updates", OptionId::CheckForUpdate).with_kind(EntryKind::UpdateCheck));
    e.push(
        MenuEntry::options("", OptionId::ReleaseChannel)
            .small()
            .option("Stable updates", 0)
            .option("Stable and preview", 1)
            .option("All incl. test builds", 2),
    );

    e.push(MenuEntry::title("Ghost Sync"));
    e.push(MenuEntry::label(
        "If enabled, ghost sync shares your in-game position and\nshows all other online players in the same act as ghosts.",
        Color::rgb(0.8, 0.8, 1.0),
    ));
    e.push(
        MenuEntry::options("Ghost sync", OptionId::GhostSync)
            .small()
            .option("Disabled", 0)
            .option("Enabled", 1),
    );

    e.push(MenuEntry::title("More information"));
    e.push(MenuEntry::options("Open game homepage", OptionId::OpenHomepage));
    e.push(MenuEntry::options("Open manual", OptionId::OpenManual));

    e.push(MenuEntry::title("Debugging"));
    e.push(MenuEntry::label(
        "These settings are only meant for debugging very specific issues.\nIt's recommended to leave them at their default values.",
        Color::rgb(1.0, 0.8, 0.6),
    ));
    e.push(
        MenuEntry::advanced("Script optimization", OptionId::ScriptOptimization, -1)
            .option("Auto (Default)", -1)
            .option("Disabled", 0)
            .option("Basic", 1)
            .option("Full", 3),
    );
    e.push(
        MenuEntry::advanced("Game recording", OptionId::GameRecordingMode, -1)
            .option("Auto (Default)", -1)
            .option("Disabled", 0)
            .option("Enabled", 1),
    );
}

fn display_tab(e: &mut MenuEntries) {
    e.push(MenuEntry::title("General"));
    e.push(
        MenuEntry::options("Renderer:", OptionId::Renderer)
            .option("Failsafe / Software", 0)
            .option("OpenGL Software", 1)
            .option("OpenGL Hardware", 2),
    );
    e.push(
        MenuEntry::options("Frame sync:", OptionId::FrameSync)
            .option("V-Sync Off", 0)
            .option("V-Sync On", 1)
            .option("V-Sync + FPS cap", 2),
    );
    e.push(
        MenuEntry::options("Upscaling:", OptionId::Upscaling)
            .option("Integer scale", 1)
            .option("Aspect fit", 0)
            .option("Stretch 50%", 2)
            .option("Stretch 100%", 3),
    );
    e.push(
        MenuEntry::options("Backdrop:", OptionId::Backdrop)
            .option("Black", 0)
            .option("Classic box 1", 1)
            .option("Classic box 2", 2)
            .option("Classic box 3", 3),
    );
    e.push(
        MenuEntry::options("Filtering:", OptionId::Filtering)
            .option("Sharp", 0)
            .option("Soft 1", 1)
            .option("Soft 2", 2)
            .option("xBRZ", 3)
            .option("HQ2x", 4)
            .option("HQ3x", 5)
            .option("HQ4x", 6),
    );
    e.push(strength("Scanlines:", OptionId::Scanlines));
    e.push(strength("Background blur:", OptionId::BgBlur));

    e.push(MenuEntry::title("Window mode"));
    e.push(window_modes("Current:", OptionId::WindowMode));
    e.push(window_modes("Startup:", OptionId::WindowModeStartup));

    e.push(MenuEntry::title("Performance output"));
    e.push(
        MenuEntry::options("Show performance:", OptionId::PerformanceDisplay)
            .option("Off", 0)
            .option("Show framerate", 1)
            .option("Full profiling", 2),
    );
}

fn strength(text: &str, id: OptionId) -> MenuEntry {
    MenuEntry::options(text, id)
        .option("Off", 0)
        .option("25%", 1)
        .option("50%", 2)
        .option("75%", 3)
        .option("100%", 4)
}

fn window_modes(text: &str, id: OptionId) -> MenuEntry {
    MenuEntry::options(text, id)
        .option("Windowed", 0)
        .option("Fullscreen", 1)
        .option("Exclusive fullscreen", 2)
}

fn audio_tab(e: &mut MenuEntries) {
    e.push(MenuEntry::title("Volume"));
    e.push(MenuEntry::options("Overall volume:", OptionId::AudioVolume).percent_options(0, 100, 5));
    e.push(MenuEntry::options("Music volume:", OptionId::MusicVolume).percent_options(0, 100, 5));
    e.push(MenuEntry::options("Sound volume:", OptionId::SoundVolume).percent_options(0, 100, 5));

    e.push(MenuEntry::title("Soundtrack"));
    e.push(
        MenuEntry::options("Soundtrack type:", OptionId::Soundtrack)
            .with_kind(EntryKind::Soundtrack)
            .option("Emulated", 0)
            .option("Remastered", 1),
    );
    e.push(MenuEntry::options("", OptionId::SoundtrackDownload).with_kind(EntryKind::SoundtrackDownload));
    // Filled from the audio collection on initialization
    e.push(MenuEntry::options("Sound test:", OptionId::SoundTest));

    e.push(MenuEntry::title("Select theme"));
    e.push(MenuEntry::options("Title theme:", OptionId::TitleTheme).option("Sonic 3", 0).option("Sonic & Knuckles", 1));
    e.push(by_zone("Extra life jingle:", OptionId::ExtraLifeJingle));
    e.push(by_zone("Invincibility theme:", OptionId::InvincibilityTheme));
    e.push(
        MenuEntry::options("Super/Hyper theme:", OptionId::SuperTheme)
            .option("Normal level music", 0)
            .option("Fast level music", 1)
            .option("Sonic 2", 2)
            .option("Sonic 3", 3)
            .option("Sonic & Knuckles", 4)
            .option("Sonic 3 Prototype", 5),
    );
    e.push(by_zone("Miniboss theme:", OptionId::MinibossTheme));
    e.push(
        MenuEntry::options("Knuckles' theme:", OptionId::KnucklesTheme)
            .option("Sonic 3", 0)
            .option("Sonic & Knuckles", 1)
            .option("Sonic 3 Prototype", 2)
            .option("By zone", 0x10),
    );

    e.push(MenuEntry::title("Level music"));
    for (text, id, act) in [
        ("Carnival Night Act 1:", OptionId::LevelMusicCnz1, 1),
        ("Carnival Night Act 2:", OptionId::LevelMusicCnz2, 2),
        ("IceCap Act 1:", OptionId::LevelMusicIcz1, 1),
        ("IceCap Act 2:", OptionId::LevelMusicIcz2, 2),
        ("Launch Base Act 1:", OptionId::LevelMusicLbz1, 1),
        ("Launch Base Act 2:", OptionId::LevelMusicLbz2, 2),
    ] {
        // Low bits select the act's bit, the top bit sets or clears it
        e.push(MenuEntry::options(text, id).option("As released", act).option("Sonic 3 Prototype", 0x8000_0000 | act));
    }

    e.push(MenuEntry::title("Music selection"));
    e.push(
        MenuEntry::options("FBZ laser boss:", OptionId::Fbz2MidbossTrack)
            .option("Miniboss theme", 1)
            .option("Main boss theme", 0),
    );
    e.push(
        MenuEntry::options("Hidden Palace:", OptionId::HpzMusic)
            .option("Sonic 3", 0)
            .option("Sonic & Knuckles", 1)
            .option("S3 + S&K Miniboss", 2)
            .option("Sonic 3 Prototype", 3),
    );
    e.push(
        MenuEntry::options("Sky Sanctuary bosses:", OptionId::SszBossTracks)
            .option("Normal", 0)
            .option("Sonic 1 & 2 tracks", 1),
    );
    e.push(
        MenuEntry::options("Outro music:", OptionId::OutroMusic)
            .option("Sky Sanctuary", 0)
            .option("Sonic 3 Credits", 1)
            .option("Sonic 3 Prototype", 2),
    );
    e.push(
        MenuEntry::options("Competition menu:", OptionId::CompetitionMenuMusic)
            .option("Sonic 3", 0)
            .option("Sonic 3 Prototype", 1),
    );
    e.push(
        MenuEntry::options("Continue screen:", OptionId::ContinueScreenMusic)
            .option("Sonic 3", 0)
            .option("Sonic & Knuckles", 1),
    );

    e.push(MenuEntry::title("Music behavior"));
    e.push(MenuEntry::options("Level restart:", OptionId::ContinueMusic).option("Restart music", 0).option("Continue music", 1));

    e.push(MenuEntry::title("Effects"));
    e.push(MenuEntry::options("Underwater sound:", OptionId::UnderwaterAudio).option("Normal", 0).option("Muffled", 1));
}

fn by_zone(text: &str, id: OptionId) -> MenuEntry {
    MenuEntry::options(text, id)
        .option("Sonic 3", 0)
        .option("Sonic & Knuckles", 1)
        .option("By zone", 0x10)
}

fn visuals_tab(e: &mut MenuEntries) {
    e.push(MenuEntry::title("Visual enhancements"));
    e.push(
        MenuEntry::options("Character rotation:", OptionId::Rotation)
            .option("Original", 0)
            .option("Smooth", 1)
            .option("Mania-accurate", 2),
    );
    e.push(MenuEntry::options("Time display:", OptionId::TimeDisplay).option("Original", 0).option("Extended", 1));
    e.push(
        MenuEntry::options("Lives display:", OptionId::LivesDisplay)
            .option("Auto", 0)
            .option("Classic", 1)
            .option("Mobile", 2),
    );
    e.push(MenuEntry::options("Speed shoes:", OptionId::SpeedupAfterImages).option("No effect", 0).option("After-images", 1));
    e.push(MenuEntry::options("Running animation:", OptionId::FastRunAnim).option("Normal", 0).option("Peel-out", 1));
    e.push(
        MenuEntry::options("Flicker effects:", OptionId::AntiFlicker)
            .option("Original", 0)
            .option("Reduce slightly", 1)
            .option("Reduce strongly", 2),
    );

    e.push(MenuEntry::title("Camera"));
    e.push(off_on("Outrun camera:", OptionId::CameraOutrun));
    e.push(off_on("Extended camera:", OptionId::ExtendedCamera));

    e.push(MenuEntry::title("Objects"));
    e.push(MenuEntry::options("Monitor style:", OptionId::MonitorStyle).option("Sonic 1 / 2", 1).option("Sonic 3 & K", 0));

    e.push(MenuEntry::title("Color changes"));
    e.push(MenuEntry::options("IceCap start:", OptionId::IczNighttime).option("Daytime", 0).option("Sunrise", 1));

    e.push(MenuEntry::title("Special Stages"));
    e.push(
        MenuEntry::options("Blue Sphere style:", OptionId::SpecialStageVisuals)
            .option("Classic", 0)
            .option("Modernized", 3),
    );
    e.push(
        MenuEntry::options("Ring counter:", OptionId::SpecialStageRingCount)
            .option("Counting up", 0)
            .option("Counting down", 1),
    );
}

fn gameplay_tab(e: &mut MenuEntries) {
    e.push(MenuEntry::title("Levels"));
    e.push(
        MenuEntry::options("Level layouts:", OptionId::LevelLayouts)
            .option("Sonic 3", 0)
            .option("Sonic 3 & Knuckles", 1)
            .option("Sonic 3 A.I.R.", 2),
    );

    e.push(MenuEntry::title("Difficulty changes"));
    e.push(
        MenuEntry::options("Angel Island bombing:", OptionId::AizBlimpSequence)
            .option("Original", 0)
            .option("Alternative", 1),
    );
    e.push(
        MenuEntry::options("Big Arms fight:", OptionId::LbzBigArms)
            .option("Knuckles only", 0)
            .option("All characters", 1),
    );
    e.push(MenuEntry::options("Sandopolis ghosts:", OptionId::SozGhostSpawn).option("Disabled", 1).option("Enabled", 0));
    e.push(
        MenuEntry::options("Lava Reef Act 2 boss:", OptionId::Lrz2Boss)
            .option("8 hits", 1)
            .option("14 hits (original)", 0),
    );
    e.push(off_on("Keep shield after zone:", OptionId::MaintainShields));

    e.push(MenuEntry::title("Time Attack"));
    e.push(
        MenuEntry::options("Max. recorded ghosts:", OptionId::TimeAttackGhosts)
            .option("Off", 0)
            .option("1", 1)
            .option("3", 3)
            .option("5", 5),
    );
    e.push(
        MenuEntry::options("Quick restart:", OptionId::TimeAttackInstantRestart)
            .option("Hold Y", 0)
            .option("Press Y", 1),
    );
}

fn controls_tab(e: &mut MenuEntries, has_virtual_gamepad: bool) {
    e.push(MenuEntry::title("Unlocked by secrets"));
    e.push(off_on("Sonic Drop Dash:", OptionId::DropDash));
    e.push(off_on("Sonic Super Peel-Out:", OptionId::SuperPeelout));

    e.push(MenuEntry::title("Controls"));
    // Text depends on whether a keyboard exists, see rendering
    e.push(MenuEntry::options("Set up controllers...", OptionId::ControllerSetup));
    let no_controller = if has_virtual_gamepad { "None (touch only)" } else { "None (keyboard only)" };
    for (text, id) in [
        ("Player 1 controller:", OptionId::ControllerPlayer1),
        ("Player 2 controller:", OptionId::ControllerPlayer2),
    ] {
        // Connected controllers get appended by the gamepad list refresh
        e.push(MenuEntry::options(text, id).option(no_controller, -1));
    }
    e.push(
        MenuEntry::options("Other controllers:", OptionId::ControllerAutoassign)
            .option("Not used", -1)
            .option("Assign to player 1", 0)
            .option("Assign to player 2", 1),
    );
    e.push(MenuEntry::options("Player 1 rumble:", OptionId::ControllerRumbleP1).percent_options(0, 100, 20));
    e.push(MenuEntry::options("Player 2 rumble:", OptionId::ControllerRumbleP2).percent_options(0, 100, 20));

    if has_virtual_gamepad {
        e.push(MenuEntry::title("Virtual gamepad"));
        e.push(MenuEntry::options("Visibility:", OptionId::VGamepadOpacity).percent_options(0, 100, 10));
        e.push(MenuEntry::options("D-pad size:", OptionId::VGamepadDpadSize).number_options(50, 150, 10));
        e.push(MenuEntry::options("Buttons size:", OptionId::VGamepadButtonsSize).number_options(50, 150, 10));
        e.push(MenuEntry::options("Set up virtual gamepad layout...", OptionId::VGamepadSetup));
    }

    e.push(MenuEntry::title("Abilities"));
    e.push(off_on("Sonic Insta-Shield:", OptionId::InstaShield));
    e.push(
        MenuEntry::options("Tails assist:", OptionId::TailsAssist)
            .option("Off", 0)
            .option("A.I.R. style", 1)
            .option("Hybrid style", 2)
            .option("Mania style", 3),
    );
    e.push(MenuEntry::options("Tails flight cancel:", OptionId::TailsFlightCancel).option("Off", 0).option("Down + Jump", 1));
    e.push(MenuEntry::options("Roll jump lock:", OptionId::NoControlLock).option("Locked", 0).option("Free", 1));
    e.push(MenuEntry::options("Bubble shield bounce:", OptionId::BubbleShieldBounce).option("Sonic 3", 0).option("Mania", 1));

    e.push(MenuEntry::title("Super & Hyper forms"));
    e.push(
        MenuEntry::options("Tails super forms:", OptionId::HyperTails)
            .option("Super only", 0)
            .option("Super & Hyper", 1),
    );
    e.push(off_on("Super cancel:", OptionId::SuperCancel));
    e.push(
        MenuEntry::options("Super Sonic jump ability:", OptionId::SuperSonicAbility)
            .option("None", 0)
            .option("Shield ability", 1)
            .option("Super Dash", 2),
    );
    e.push(
        MenuEntry::options("Hyper Sonic dash:", OptionId::HyperDashControls)
            .option("Original", 0)
            .option("D-pad only", 1),
    );
}

fn tweaks_tab(e: &mut MenuEntries) {
    e.push(MenuEntry::title("Unlocked by secrets"));
    e.push(off_on("Debug mode:", OptionId::DebugMode));
    e.push(MenuEntry::options("Title screen:", OptionId::TitleScreen).option("Sonic 3", 0).option("Sonic & Knuckles", 1));
    let mut speed = MenuEntry::options("Game speed:", OptionId::GameSpeed);
    for hz in [50, 60, 75, 90, 120, 144] {
        speed.add_option(&format!("{hz} Hz"), hz);
    }
    e.push(speed);

    e.push(MenuEntry::title("Accessibility"));
    e.push(off_on("Infinite lives:", OptionId::InfiniteLives));
    e.push(off_on("Infinite time:", OptionId::InfiniteTime));

    e.push(MenuEntry::title("Game variety"));
    e.push(
        MenuEntry::options("Shields:", OptionId::ShieldTypes)
            .option("Classic shield", 0)
            .option("Elemental shields", 1)
            .option("Classic + elemental", 2)
            .option("Upgradable", 3),
    );
    e.push(
        MenuEntry::options("Randomized monitors:", OptionId::RandomMonitors)
            .option("Normal", 0)
            .option("Random shields", 1)
            .option("Random monitors", 2),
    );
    e.push(
        MenuEntry::options("Monitor behavior:", OptionId::MonitorBehavior)
            .option("Default", 0)
            .option("Fall when hit", 1),
    );

    e.push(MenuEntry::title("Special Stages"));
    e.push(
        MenuEntry::options("Special stage layouts:", OptionId::RandomSpecialStages)
            .option("Original", 0)
            .option("Random", 1),
    );
    e.push(
        MenuEntry::options("When failing:", OptionId::SpecialStageRepeat)
            .option("Advance", 0)
            .option("Don't advance", 1),
    );

    e.push(MenuEntry::title("Region"));
    e.push(
        MenuEntry::options("Region code:", OptionId::Region)
            .option("Western (\"Tails\")", 0x80)
            .option("Japan (\"Miles\")", 0x00),
    );

    e.push(MenuEntry::title("Speedrunning"));
    e.push(
        MenuEntry::options("Glitch fixes:", OptionId::FixGlitches)
            .option("No fixes", 0)
            .option("Basic fixes", 1)
            .option("All fixes", 2),
    );
}

// ── Mods tab ──

/// Rebuild the Mods tab from the registry, last loaded mod first. Returns
/// whether any mod contributed a setting.
pub fn build_mods_tab(tab: &mut Tab, mods: &ModRegistry) -> bool {
    let entries = &mut tab.entries;
    entries.truncate(1);
    let mut has_any = false;

    for (mod_index, m) in mods.active_mods().iter().enumerate().rev() {
        if m.setting_categories.is_empty() {
            continue;
        }
        entries.push(MenuEntry::section(&m.display_name));
        let mut first_title = true;

        for (category_index, category) in m.setting_categories.iter().enumerate() {
            let title = if !category.display_name.is_empty() {
                Some(category.display_name.as_str())
            } else if m.setting_categories.len() >= 2 {
                Some(OTHER_SETTINGS)
            } else {
                None
            };
            if let Some(title) = title {
                let entry = entries.push(MenuEntry::title(title));
                entry.margin_below += 3;
                if first_title {
                    entry.margin_above -= 11;
                    first_title = false;
                }
            }

            for (setting_index, setting) in category.settings.iter().enumerate() {
                let key = OptionKey::Mod(ModSettingRef { mod_index, category: category_index, setting: setting_index });
                let entry = entries.push(MenuEntry::options(&setting.display_name, key));
                for option in &setting.options {
                    entry.add_option(&option.display_name, option.value as i64);
                }
                has_any = true;
            }
        }
    }

    entries.push(back());
    has_any
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::tests::speedrun_mod;
    use crate::mods::Mod;
    use std::path::Path;

    fn keys(tab: &Tab) -> Vec<OptionId> {
        tab.entries.iter().filter_map(|e| e.key.and_then(OptionKey::builtin)).collect()
    }

    #[test]
    fn every_tab_starts_with_placeholder_and_ends_with_back() {
        let tabs = build_tabs(false);
        assert_eq!(tabs.len(), 8);
        for tab in &tabs {
            assert_eq!(tab.entries[0].kind, EntryKind::Dummy);
            if tab.id != TabId::Mods {
                let last = &tab.entries[tab.entries.len() - 1];
                assert_eq!(last.key, Some(OptionId::Back.into()));
            }
        }
        assert_eq!(tabs[TabId::Mods.index()].entries.len(), 1);
    }

    #[test]
    fn builtin_options_appear_once() {
        let tabs = build_tabs(true);
        let mut seen = std::collections::HashSet::new();
        for tab in &tabs {
            for id in keys(tab) {
                if id != OptionId::Back {
                    assert!(seen.insert(id), "{id:?} appears twice");
                }
            }
        }
        assert!(seen.contains(&OptionId::VGamepadSetup));
        assert!(seen.contains(&OptionId::SoundtrackDownload));
    }

    #[test]
    fn virtual_gamepad_entries_depend_on_platform() {
        let controls = |vg| build_tabs(vg).swap_remove(TabId::Controls.index());
        assert!(!keys(&controls(false)).contains(&OptionId::VGamepadOpacity));
        let tab = controls(true);
        assert!(keys(&tab).contains(&OptionId::VGamepadOpacity));
        let p1 = tab.entries.position(OptionId::ControllerPlayer1.into()).unwrap();
        assert_eq!(tab.entries[p1].options[0].text, "None (touch only)");
        assert_eq!(tab.entries[p1].options[0].value, -1);
    }

    #[test]
    fn secrets_groups_sit_under_first_title() {
        let tabs = build_tabs(false);
        for id in [TabId::Controls, TabId::Tweaks] {
            let tab = &tabs[id.index()];
            assert!(tab.entries[1].is_title());
            for (i, option) in secrets_group(id).iter().enumerate() {
                assert_eq!(tab.entries[i + 2].key, Some((*option).into()));
            }
        }
        assert!(secrets_group(TabId::Audio).is_empty());
    }

    #[test]
    fn tab_strip_lists_tabs_in_order() {
        let strip = build_tab_strip();
        assert_eq!(strip.len(), 1);
        let titles: Vec<_> = strip[0].options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(titles, ["MODS", "SYSTEM", "DISPLAY", "AUDIO", "VISUALS", "GAMEPLAY", "CONTROLS", "TWEAKS"]);
    }

    #[test]
    fn mods_tab_layout() {
        let plain = Mod::from_manifest("plain", "display_name = \"No Settings\"", Path::new("mod.toml")).unwrap();
        let registry = ModRegistry::new(vec![speedrun_mod(), plain]);
        let mut tab = Tab::new(TabId::Mods);
        tab.entries.push(MenuEntry::dummy());

        assert!(build_mods_tab(&mut tab, &registry));
        let kinds: Vec<_> = tab.entries.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            [
                EntryKind::Dummy,
                EntryKind::Section,
                EntryKind::Title,
                EntryKind::Options,
                EntryKind::Title,
                EntryKind::Options,
                EntryKind::Options,
            ]
        );
        assert_eq!(tab.entries[1].text, "Speedrun Tools");
        assert_eq!(tab.entries[2].margin_above, -11);
        assert_eq!(tab.entries[2].margin_below, 3);
        assert_eq!(tab.entries[4].text, OTHER_SETTINGS);
        assert_eq!(tab.entries[4].margin_above, 0);
        assert_eq!(tab.entries[3].options.len(), 3);

        // Rebuilding starts over
        assert!(!build_mods_tab(&mut tab, &ModRegistry::default()));
        assert_eq!(tab.entries.len(), 2);
    }
}
