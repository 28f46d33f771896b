//! Entry point and frame loop.

mod config;
mod data;
mod engine;
mod menu;
mod mods;
mod overlay;
mod ui;

use std::error::Error;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags};
use crossterm::{execute, terminal};

use config::Configuration;
use data::GameDatabase;
use engine::{Drawer, RenderMethod, Services, WindowMode};
use menu::options_menu::BaseState;
use menu::{BackingStores, OptionsMenu};
use mods::ModRegistry;
use overlay::CheatSheetOverlay;
use ui::{
    DesktopPlatform, GamepadState, LocalMusicDownload, MenuAudio, MenuInput, LocalUpdateCheck, TerminalDrawer,
};

const FRAME_SLEEP: Duration = Duration::from_millis(5);
/// Longest frame step fed to the menu, so a stall doesn't skip the fades.
const MAX_DT: f32 = 0.1;
const LOG_FILE: &str = "retromenu.log";
const SOUNDTRACK_PACKAGE_ENV: &str = "RETROMENU_SOUNDTRACK";
const RESET_PROGRESS_FLAG: &str = "--reset-progress";

fn main() {
    init_logging();
    let db = GameDatabase::initialize();
    let mut config = Configuration::load(&db);
    let data_dir = data_dir(&config);

    let mut mods = ModRegistry::load_from_dir(&data_dir.join("mods"));
    mods.load_settings_from_config(&config);
    let reset_progress = std::env::args().skip(1).any(|arg| arg == RESET_PROGRESS_FLAG);
    let progress = config.load_player_progress(&db, reset_progress);

    let mut drawer = TerminalDrawer::new();
    if let Err(e) = drawer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }
    let enhanced = enable_key_release_events();

    let mut stores = BackingStores { db: &db, progress: &progress, config: &mut config, mods: &mut mods };
    let result = run(&mut drawer, &mut stores, &data_dir, enhanced);

    if enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    if let Err(e) = drawer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Menu error: {e}");
    }
}

fn run(
    drawer: &mut TerminalDrawer,
    stores: &mut BackingStores<'_>,
    data_dir: &Path,
    enhanced: bool,
) -> Result<(), Box<dyn Error>> {
    let mut gamepad = GamepadState::new();
    gamepad.load_button_config(&stores.config.gamepad);
    let mut input = MenuInput::new(gamepad);
    input.keyboard.honor_release = enhanced;

    let mut audio = MenuAudio::new(stores.db, stores.config.audio.active_soundtrack);
    let release_feed = Some(data_dir.join(ui::services::RELEASES_FILE)).filter(|p| p.is_file());
    let mut update_check = LocalUpdateCheck::new(release_feed);
    let mut download = LocalMusicDownload::new(soundtrack_package(data_dir), data_dir.to_path_buf());
    let video = &stores.config.video;
    let mut platform = DesktopPlatform::new(
        WindowMode::from_value(video.window_mode as i64),
        RenderMethod::from_value(video.render_method as i64),
        video.frame_sync,
    );
    let mut cheat_sheet = CheatSheetOverlay::new(stores.config.system.dev_mode);
    let mut menu = OptionsMenu::new(false);

    {
        audio.set_remastered_installed(download.is_installed());
        let mut services = Services {
            input: &mut input,
            audio: &mut audio,
            update_check: &mut update_check,
            download: &mut download,
            platform: &mut platform,
        };
        menu.initialize(&mut services, stores);
        menu.setup(false, &mut services, stores);
        menu.fade_in(&mut services, stores);
    }
    log::info!("options menu ready, mod options: {}", menu.has_any_mod_options());

    let start = Instant::now();
    let mut last_frame = start;
    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32().min(MAX_DT);
        last_frame = now;

        input.update(dt);
        if input.quit_requested() && menu.base_state() != BaseState::FadeOut {
            stores.mods.copy_settings_to_config(stores.config);
            stores.config.save(stores.db)?;
            menu.set_base_state(BaseState::FadeOut);
        }
        if input.cheat_sheet_toggled() {
            cheat_sheet.toggle();
        }
        if menu.base_state() == BaseState::FadeOut && cheat_sheet.is_shown() {
            cheat_sheet.set_shown(false);
        }
        if input.rescan_requested() {
            input.gamepad.rescan();
        }
        update_check.update(dt);
        download.update();
        audio.set_remastered_installed(download.is_installed());

        let mut services = Services {
            input: &mut input,
            audio: &mut audio,
            update_check: &mut update_check,
            download: &mut download,
            platform: &mut platform,
        };
        menu.update(dt, &mut services, stores);
        cheat_sheet.update(dt);
        if menu.can_be_removed() {
            break;
        }

        drawer.begin_frame();
        menu.render(drawer, start.elapsed().as_secs_f32());
        if cheat_sheet.visibility() > 0.0 {
            cheat_sheet.render(drawer);
            drawer.perform_rendering();
        }

        std::thread::sleep(FRAME_SLEEP);
    }
    log::debug!("options menu closed ({:?}) on tab {:?}", menu.state(), menu.active_tab());
    Ok(())
}

/// Directory holding mods and the installed soundtrack: the one the
/// configuration lives in.
fn data_dir(config: &Configuration) -> PathBuf {
    config
        .path
        .as_ref()
        .and_then(|p| p.parent())
        .map(Path::to_path_buf)
        .or_else(|| config::candidate_dirs().into_iter().next())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// The terminal is in use, so records go to a file in the first config
/// search directory.
fn init_logging() {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    let dir = config::candidate_dirs().into_iter().next().unwrap_or_else(|| PathBuf::from("."));
    if let Ok(file) = File::create(dir.join(LOG_FILE)) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn soundtrack_package(data_dir: &Path) -> Option<PathBuf> {
    std::env::var_os(SOUNDTRACK_PACKAGE_ENV)
        .map(PathBuf::from)
        .or_else(|| Some(data_dir.join("packages").join(ui::services::SOUNDTRACK_FILE)))
        .filter(|p| p.is_file())
}

/// Ask for key release events; only honoured when the terminal supports them.
fn enable_key_release_events() -> bool {
    if !matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
        return false;
    }
    execute!(io::stdout(), PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)).is_ok()
}
