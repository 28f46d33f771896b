//! Side effects of committing or accepting an option.
//!
//! Both tables are closed matches keyed by option identity. A `Replace`
//! handler runs instead of the generic write-back; an `AfterApply` handler
//! runs after it.

use crate::engine::{DownloadState, RenderMethod, Services, WindowMode};

use super::binding::BackingStores;
use super::option_id::OptionId;
use super::options_menu::OptionsMenu;

pub const HOMEPAGE_URL: &str = "https://sonic3air.org/";
pub const MANUAL_URL: &str = "https://sonic3air.org/Manual.pdf";
/// Opened when an update exists but the server sent no download page.
const FALLBACK_DOWNLOAD_URL: &str = "https://sonic3air.org";

const SFX_CONTROLLER_SETUP: u8 = 0x63;
const RUMBLE_PREVIEW_MS: u32 = 300;

/// Receives the option's selected value.
pub type Handler = fn(&mut OptionsMenu, &mut Services<'_>, &mut BackingStores<'_>, i64);

#[derive(Clone, Copy)]
pub enum SideEffect {
    Replace(Handler),
    AfterApply(Handler),
}

pub fn side_effect(id: OptionId) -> Option<SideEffect> {
    use OptionId as O;
    use SideEffect::*;
    let effect = match id {
        O::ReleaseChannel => Replace(release_channel),
        O::WindowMode => Replace(window_mode),
        O::Renderer => Replace(renderer),
        O::Soundtrack => Replace(soundtrack),
        O::ControllerPlayer1 | O::ControllerPlayer2 => Replace(controller_player),
        O::ControllerAutoassign => Replace(controller_autoassign),
        O::GameRecordingMode => Replace(game_recording),

        O::ControllerRumbleP1 | O::ControllerRumbleP2 => AfterApply(rumble_preview),
        O::VGamepadDpadSize | O::VGamepadButtonsSize => AfterApply(touch_controls),
        O::FrameSync => AfterApply(frame_sync),
        _ => return None,
    };
    Some(effect)
}

/// Handler for the accept button on an entry.
pub fn accept_action(id: OptionId) -> Option<Handler> {
    use OptionId as O;
    let action: Handler = match id {
        O::SoundTest => sound_test,
        O::ControllerSetup => controller_setup,
        O::VGamepadSetup => touch_config,
        O::CheckForUpdate | O::ReleaseChannel => check_for_update,
        O::SoundtrackDownload => soundtrack_download,
        O::OpenHomepage => open_homepage,
        O::OpenManual => open_manual,
        O::Back => back,
        _ => return None,
    };
    Some(action)
}

// ── Commit handlers ──

fn release_channel(menu: &mut OptionsMenu, services: &mut Services<'_>, stores: &mut BackingStores<'_>, _: i64) {
    menu.apply_selected(stores);
    services.update_check.reset();
}

fn window_mode(_: &mut OptionsMenu, services: &mut Services<'_>, _: &mut BackingStores<'_>, value: i64) {
    services.platform.set_window_mode(WindowMode::from_value(value));
}

fn renderer(_: &mut OptionsMenu, services: &mut Services<'_>, stores: &mut BackingStores<'_>, value: i64) {
    stores.config.video.render_method = value as i32;
    services.platform.switch_render_method(RenderMethod::from_value(value));
}

fn soundtrack(menu: &mut OptionsMenu, services: &mut Services<'_>, stores: &mut BackingStores<'_>, value: i64) {
    stores.config.audio.active_soundtrack = value as i32;
    menu.restart_music_if_remastered(services, stores);
    menu.update_download_visibility(services, stores);
}

fn controller_player(menu: &mut OptionsMenu, services: &mut Services<'_>, _: &mut BackingStores<'_>, value: i64) {
    let Some(player) = menu.selected_option_id().and_then(OptionId::controller_player) else {
        return;
    };
    services.input.set_preferred_gamepad(player, (value >= 0).then_some(value as i32));
}

fn controller_autoassign(menu: &mut OptionsMenu, services: &mut Services<'_>, stores: &mut BackingStores<'_>, _: i64) {
    menu.apply_selected(stores);
    services.input.update_player_gamepad_assignments();
}

fn game_recording(menu: &mut OptionsMenu, services: &mut Services<'_>, stores: &mut BackingStores<'_>, _: i64) {
    menu.apply_selected(stores);
    services.platform.evaluate_game_recording(stores.config.system.game_recording);
}

fn rumble_preview(menu: &mut OptionsMenu, services: &mut Services<'_>, _: &mut BackingStores<'_>, _: i64) {
    if let Some(player) = menu.selected_option_id().and_then(OptionId::controller_player) {
        services.input.set_rumble(player, 1.0, 1.0, RUMBLE_PREVIEW_MS);
    }
}

fn touch_controls(_: &mut OptionsMenu, services: &mut Services<'_>, _: &mut BackingStores<'_>, _: i64) {
    services.platform.rebuild_touch_controls();
}

fn frame_sync(_: &mut OptionsMenu, services: &mut Services<'_>, _: &mut BackingStores<'_>, value: i64) {
    services.platform.set_vsync_mode(value as u8);
}

// ── Accept handlers ──

fn sound_test(menu: &mut OptionsMenu, services: &mut Services<'_>, stores: &mut BackingStores<'_>, value: i64) {
    let Some(track) = usize::try_from(value).ok().and_then(|i| menu.sound_test_tracks.get(i)).cloned() else {
        return;
    };
    menu.play_sound_test(track, services, stores.config);
}

fn controller_setup(_: &mut OptionsMenu, services: &mut Services<'_>, _: &mut BackingStores<'_>, _: i64) {
    services.audio.play_sound(SFX_CONTROLLER_SETUP);
}

fn touch_config(_: &mut OptionsMenu, services: &mut Services<'_>, _: &mut BackingStores<'_>, _: i64) {
    services.platform.enable_touch_config();
}

fn check_for_update(_: &mut OptionsMenu, services: &mut Services<'_>, stores: &mut BackingStores<'_>, _: i64) {
    if services.update_check.has_update() {
        let url = services.update_check.update_url().unwrap_or_else(|| FALLBACK_DOWNLOAD_URL.to_string());
        services.platform.open_url(&url);
    } else {
        services.update_check.start(stores.config.system.release_channel);
    }
}

fn soundtrack_download(menu: &mut OptionsMenu, services: &mut Services<'_>, stores: &mut BackingStores<'_>, _: i64) {
    match services.download.state() {
        DownloadState::ReadyForDownload | DownloadState::Failed => services.download.start(),
        DownloadState::Pending | DownloadState::Running => services.download.remove(),
        DownloadState::Done => services.download.apply(),
        DownloadState::Loaded => {}
    }
    log::debug!("soundtrack download now {:?}", services.download.state());
    menu.update_download_visibility(services, stores);
    menu.restart_music_if_remastered(services, stores);
}

fn open_homepage(_: &mut OptionsMenu, services: &mut Services<'_>, _: &mut BackingStores<'_>, _: i64) {
    services.platform.open_url(HOMEPAGE_URL);
}

fn open_manual(_: &mut OptionsMenu, services: &mut Services<'_>, _: &mut BackingStores<'_>, _: i64) {
    services.platform.open_url(MANUAL_URL);
}

fn back(menu: &mut OptionsMenu, services: &mut Services<'_>, stores: &mut BackingStores<'_>, _: i64) {
    menu.go_back(services, stores);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_and_after_apply_are_disjoint() {
        assert!(matches!(side_effect(OptionId::Renderer), Some(SideEffect::Replace(_))));
        assert!(matches!(side_effect(OptionId::FrameSync), Some(SideEffect::AfterApply(_))));
        assert!(matches!(side_effect(OptionId::ControllerRumbleP2), Some(SideEffect::AfterApply(_))));
        assert!(side_effect(OptionId::Filtering).is_none());
        assert!(side_effect(OptionId::TabSelection).is_none());
    }

    #[test]
    fn buttons_have_accept_actions() {
        for id in [OptionId::Back, OptionId::OpenHomepage, OptionId::OpenManual, OptionId::CheckForUpdate, OptionId::ControllerSetup] {
            assert!(accept_action(id).is_some(), "{id:?}");
        }
        assert!(accept_action(OptionId::Filtering).is_none());
    }
}
