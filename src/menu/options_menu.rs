//! The options menu: a tab strip over a row of tabs, each holding a
//! vertical list of entries.
//!
//! Focus is either on the tab strip or inside the active tab. Left/right on
//! the strip switch tabs; the tab contents slide towards the new tab while
//! input already goes to it. Committing an entry writes its value back
//! through its binding and fires any side effect registered for it.

use std::collections::HashMap;

use crate::config::Configuration;
use crate::engine::{
    Align, AudioContext, Button, Color, Drawer, FontId, InputSource, Rect, RenderMethod, Services, SoundTestTrack,
    TrackKind,
};

use super::binding::{BackingStores, OptionBinding};
use super::conditions::CONDITIONAL_OPTIONS;
use super::effects::{self, SideEffect};
use super::entries::{MenuEntries, MenuEntry, UpdateResult};
use super::layout;
use super::option_id::{OptionId, OptionKey};
use super::render::{blink_offset, render_entry, RenderContext, StatusSnapshot};
use super::tabs::{Scrolling, Tab, TabId};

/// Fade speed, in full fades per second.
const FADE_SPEED: f32 = 6.0;
/// Tab slide speed, in tabs per second.
const TAB_SLIDE_SPEED: f32 = 4.0;
const WARNING_DURATION: f32 = 4.0;
const VISIBLE_HEIGHT: i32 = 194;

const MENU_MUSIC: u8 = 0x2f;
/// Sound test key of the menu music itself; it keeps playing on exit.
const MENU_MUSIC_KEY: &str = "2f";
const FAST_TRACK_SUFFIX: &str = "_fast";
const FAST_TRACK_SPEED: f32 = 1.25;

const SFX_MOVE: u8 = 0x5b;
const SFX_TAB: u8 = 0xb7;
const SFX_BACK: u8 = 0xad;

const MAX_GAMEPAD_NAME: usize = 22;

const HIDDEN_INGAME_NOTE: &str = "Note: Some options are hidden while in-game.";
const MUSIC_CHANGE_NOTE: &str = "Note: Music changes don't affect tracks already playing.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    Inactive,
    Appearing,
    Shown,
    FadeToMenu,
    FadeToGame,
}

/// Coarse state as seen by the menu stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseState {
    Inactive,
    FadeIn,
    Show,
    FadeOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Focus {
    TabStrip,
    Content,
}

pub struct OptionsMenu {
    pub(super) state: MenuState,
    pub(super) visibility: f32,
    pub(super) tabs: Vec<Tab>,
    pub(super) tab_strip: MenuEntries,
    pub(super) focus: Focus,
    pub(super) active_tab: TabId,
    pub(super) active_tab_animated: f32,
    pub(super) scrolling: Scrolling,
    /// Tab and entry index of each keyed entry.
    pub(super) locations: HashMap<OptionKey, (usize, usize)>,
    pub(super) has_any_mod_options: bool,
    pub(super) entered_from_ingame: bool,
    pub(super) warning_timeout: f32,
    pub(super) audio_warning_timeout: f32,
    pub(super) showed_audio_warning: bool,
    pub(super) original_script_optimization: i32,
    pub(super) sound_test_tracks: Vec<SoundTestTrack>,
    pub(super) playing_sound_test: Option<SoundTestTrack>,
    pub(super) last_gamepads_counter: Option<u32>,
    pub(super) status: StatusSnapshot,
}

impl OptionsMenu {
    pub fn new(has_virtual_gamepad: bool) -> Self {
        let mut menu = OptionsMenu {
            state: MenuState::Inactive,
            visibility: 0.0,
            tabs: layout::build_tabs(has_virtual_gamepad),
            tab_strip: layout::build_tab_strip(),
            focus: Focus::TabStrip,
            active_tab: TabId::System,
            active_tab_animated: TabId::System.index() as f32,
            scrolling: Scrolling::new(VISIBLE_HEIGHT),
            locations: HashMap::new(),
            has_any_mod_options: false,
            entered_from_ingame: false,
            warning_timeout: 0.0,
            audio_warning_timeout: 0.0,
            showed_audio_warning: false,
            original_script_optimization: -1,
            sound_test_tracks: Vec::new(),
            playing_sound_test: None,
            last_gamepads_counter: None,
            status: StatusSnapshot::default(),
        };
        menu.rebuild_locations();
        menu
    }

    /// One-time setup once the collaborators and the mod registry exist.
    pub fn initialize(&mut self, services: &mut Services<'_>, stores: &mut BackingStores<'_>) {
        self.has_any_mod_options = layout::build_mods_tab(&mut self.tabs[TabId::Mods.index()], stores.mods);
        self.rebuild_locations();
        self.tab_strip[0].set_selected_index_by_value(self.active_tab.index() as i64);

        self.update_download_visibility(services, stores);
        self.fill_sound_test(services, stores.config);
        self.refresh_gamepad_lists(&*services.input, true);

        self.entered_from_ingame = false;
        self.original_script_optimization = stores.config.system.script_optimization;
        self.capture_status(services);
        log::debug!("options menu initialized, mod options: {}", self.has_any_mod_options);
    }

    /// Prepare visibility and focus for entering the menu.
    pub fn setup(&mut self, entered_from_ingame: bool, services: &mut Services<'_>, stores: &mut BackingStores<'_>) {
        self.entered_from_ingame = entered_from_ingame;

        for condition in CONDITIONAL_OPTIONS {
            let visible = condition.should_be_visible(entered_from_ingame, stores.progress)
                && should_be_shown(condition.option, services, stores.config);
            if let Some(entry) = self.entry_mut(condition.option.into()) {
                entry.set_visible(visible);
            }
        }
        if services.platform.is_mobile() {
            for id in [OptionId::WindowMode, OptionId::WindowModeStartup] {
                if let Some(entry) = self.entry_mut(id.into()) {
                    entry.set_visible(false);
                }
            }
        }

        let strip = &mut self.tab_strip[0];
        strip.options[TabId::Mods.index()].visible = !entered_from_ingame && self.has_any_mod_options;
        strip.options[TabId::System.index()].visible = !entered_from_ingame;
        strip.sanitize_selected_index();
        self.active_tab = strip.selected_value().and_then(|v| TabId::from_index(v as usize)).unwrap_or(TabId::Display);
        self.active_tab_animated = self.active_tab.index() as f32;

        let entries = &mut self.tabs[self.active_tab.index()].entries;
        entries.sanitize_selected_index();
        self.focus = if entries.selected_entry_index == 0 { Focus::TabStrip } else { Focus::Content };
        self.scrolling.reset();

        self.warning_timeout = if entered_from_ingame { WARNING_DURATION } else { 0.0 };
        self.audio_warning_timeout = 0.0;
        self.showed_audio_warning = false;
        self.original_script_optimization = stores.config.system.script_optimization;
        self.capture_status(services);
    }

    pub fn fade_in(&mut self, services: &mut Services<'_>, stores: &mut BackingStores<'_>) {
        self.state = MenuState::Appearing;

        let window_mode = services.platform.window_mode() as i64;
        self.select_value(OptionId::WindowMode, window_mode);
        self.select_value(OptionId::WindowModeStartup, stores.config.video.window_mode as i64);
        self.select_value(OptionId::Renderer, stores.config.video.render_method as i64);
        self.load_all_values(stores);

        services.audio.set_menu_music(MENU_MUSIC);
        self.playing_sound_test = None;
        log::debug!("options menu fading in");
    }

    pub fn update(&mut self, dt: f32, services: &mut Services<'_>, stores: &mut BackingStores<'_>) {
        let target = self.active_tab.index() as f32;
        let step = dt * TAB_SLIDE_SPEED;
        self.active_tab_animated += (target - self.active_tab_animated).clamp(-step, step);

        self.sync_external_values(services, stores);
        if self.state == MenuState::Shown {
            self.process_input(services, stores);
        }
        self.refresh_interactability(stores.config);
        self.scrolling.update(dt);

        match self.state {
            MenuState::Appearing => {
                self.visibility = (self.visibility + dt * FADE_SPEED).min(1.0);
                if self.visibility >= 1.0 {
                    self.state = MenuState::Shown;
                }
            }
            MenuState::FadeToMenu | MenuState::FadeToGame => {
                self.visibility = (self.visibility - dt * FADE_SPEED).max(0.0);
                if self.visibility <= 0.0 {
                    services.platform.on_faded_out_options();
                    self.state = MenuState::Inactive;
                    log::debug!("options menu faded out");
                }
            }
            MenuState::Inactive | MenuState::Shown => {}
        }

        self.warning_timeout = (self.warning_timeout - dt).max(0.0);
        self.audio_warning_timeout = (self.audio_warning_timeout - dt).max(0.0);
        self.refresh_gamepad_lists(&*services.input, false);
        self.capture_status(services);
    }

    /// Save everything and start fading out.
    pub fn go_back(&mut self, services: &mut Services<'_>, stores: &mut BackingStores<'_>) {
        services.audio.play_sound(SFX_BACK);
        if self.playing_sound_test.as_ref().is_some_and(|t| t.key != MENU_MUSIC_KEY) {
            services.audio.stop_context(AudioContext::MenuMusic);
        }

        stores.mods.copy_settings_to_config(stores.config);
        if let Err(e) = stores.config.save(stores.db) {
            log::warn!("failed to save configuration: {e}");
        }

        let script_optimization = stores.config.system.script_optimization;
        if script_optimization != self.original_script_optimization {
            log::debug!("script optimization changed to {script_optimization}, reloading scripts");
            services.platform.trigger_full_scripts_reload();
            self.original_script_optimization = script_optimization;
        }

        services.platform.on_exit_options();
        self.state = if self.entered_from_ingame { MenuState::FadeToGame } else { MenuState::FadeToMenu };
        log::debug!("leaving options menu ({:?})", self.state);
    }

    // ── State queries ──

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn base_state(&self) -> BaseState {
        match self.state {
            MenuState::Appearing => BaseState::FadeIn,
            MenuState::Shown => BaseState::Show,
            MenuState::FadeToMenu | MenuState::FadeToGame => BaseState::FadeOut,
            MenuState::Inactive => BaseState::Inactive,
        }
    }

    pub fn set_base_state(&mut self, state: BaseState) {
        self.state = match state {
            BaseState::Inactive => MenuState::Inactive,
            BaseState::FadeIn => MenuState::Appearing,
            BaseState::Show => MenuState::Shown,
            BaseState::FadeOut => MenuState::FadeToMenu,
        };
    }

    pub fn can_be_removed(&self) -> bool {
        self.state == MenuState::Inactive && self.visibility <= 0.0
    }

    pub fn active_tab(&self) -> TabId {
        self.active_tab
    }

    pub fn has_any_mod_options(&self) -> bool {
        self.has_any_mod_options
    }

    // ── Gamepads & sound test ──

    /// Rebuild the per-player controller choices when controllers came or
    /// went, keeping each player's choice where possible.
    pub fn refresh_gamepad_lists(&mut self, input: &dyn InputSource, force: bool) {
        let counter = input.gamepads_change_counter();
        if !force && self.last_gamepads_counter == Some(counter) {
            return;
        }
        self.last_gamepads_counter = Some(counter);

        let pads = input.gamepads();
        for id in [OptionId::ControllerPlayer1, OptionId::ControllerPlayer2] {
            let Some(player) = id.controller_player() else {
                continue;
            };
            let Some(entry) = self.entry_mut(id.into()) else {
                continue;
            };
            let previous = input
                .preferred_gamepad(player)
                .map(i64::from)
                .or_else(|| entry.selected_value())
                .unwrap_or(-1);

            entry.options.truncate(1);
            for pad in &pads {
                entry.add_option(&shorten_name(&pad.name), pad.instance_id as i64);
            }
            if !entry.set_selected_index_by_value(previous) {
                entry.selected_index = 0;
            }
        }
    }

    pub fn play_sound_test(&mut self, track: SoundTestTrack, services: &mut Services<'_>, config: &Configuration) {
        services.audio.stop_context(AudioContext::MenuMusic);
        match track.key.strip_suffix(FAST_TRACK_SUFFIX) {
            // The emulated soundtrack has no fast variants, speed up the normal one
            Some(base) if config.audio.active_soundtrack == 0 => {
                services.audio.play_audio(base, track.kind, AudioContext::MenuMusic, FAST_TRACK_SPEED);
            }
            _ => services.audio.play_audio(&track.key, track.kind, AudioContext::MenuMusic, 1.0),
        }
        self.playing_sound_test = Some(track);
    }

    // ── Helpers used by the effect handlers ──

    pub(super) fn selected_option_id(&self) -> Option<OptionId> {
        self.tabs[self.active_tab.index()].entries.selected()?.key?.builtin()
    }

    /// Write the selected entry of the active tab back to its store.
    pub(super) fn apply_selected(&self, stores: &mut BackingStores<'_>) {
        let Some(entry) = self.tabs[self.active_tab.index()].entries.selected() else {
            return;
        };
        if let Some(binding) = entry.key.and_then(OptionBinding::for_key) {
            binding.apply_value(entry, stores);
        }
    }

    pub(super) fn update_download_visibility(&mut self, services: &Services<'_>, stores: &BackingStores<'_>) {
        let visible = should_be_shown(OptionId::SoundtrackDownload, services, stores.config);
        if let Some(entry) = self.entry_mut(OptionId::SoundtrackDownload.into()) {
            entry.set_visible(visible);
        }
    }

    /// Restart the menu music, or the running sound test, under the current
    /// soundtrack preference.
    pub(super) fn restart_music_if_remastered(&mut self, services: &mut Services<'_>, stores: &BackingStores<'_>) {
        if !services.audio.has_remastered_soundtrack() {
            return;
        }
        services.audio.stop_context(AudioContext::MenuMusic);
        services.audio.on_soundtrack_preferences_changed(stores.config.audio.active_soundtrack);
        match self.playing_sound_test.clone() {
            Some(track) => self.play_sound_test(track, services, stores.config),
            None => services.audio.restart_menu_music(),
        }
    }

    // ── Internals ──

    fn rebuild_locations(&mut self) {
        self.locations.clear();
        for (tab_index, tab) in self.tabs.iter().enumerate() {
            for (entry_index, entry) in tab.entries.iter().enumerate() {
                if let Some(key) = entry.key {
                    self.locations.entry(key).or_insert((tab_index, entry_index));
                }
            }
        }
    }

    fn entry(&self, key: OptionKey) -> Option<&MenuEntry> {
        let &(tab, index) = self.locations.get(&key)?;
        Some(&self.tabs[tab].entries[index])
    }

    fn entry_mut(&mut self, key: OptionKey) -> Option<&mut MenuEntry> {
        let &(tab, index) = self.locations.get(&key)?;
        Some(&mut self.tabs[tab].entries[index])
    }

    fn select_value(&mut self, id: OptionId, value: i64) {
        if let Some(entry) = self.entry_mut(id.into()) {
            entry.set_selected_index_by_value(value);
        }
    }

    fn load_value(&mut self, key: OptionKey, stores: &BackingStores<'_>) {
        let Some(binding) = OptionBinding::for_key(key) else {
            return;
        };
        if let Some(entry) = self.entry_mut(key) {
            binding.load_value(entry, stores);
        }
    }

    fn load_all_values(&mut self, stores: &BackingStores<'_>) {
        for tab in &mut self.tabs {
            for entry in tab.entries.iter_mut() {
                if let Some(binding) = entry.key.and_then(OptionBinding::for_key) {
                    binding.load_value(entry, stores);
                }
            }
        }
    }

    /// Values that can change outside the menu, e.g. through hotkeys.
    fn sync_external_values(&mut self, services: &Services<'_>, stores: &BackingStores<'_>) {
        let window_mode = services.platform.window_mode() as i64;
        self.select_value(OptionId::WindowMode, window_mode);
        for id in [OptionId::FrameSync, OptionId::Filtering, OptionId::BgBlur, OptionId::AudioVolume] {
            self.load_value(id.into(), stores);
        }
        self.select_value(OptionId::Renderer, stores.config.video.render_method as i64);
    }

    fn refresh_interactability(&mut self, config: &Configuration) {
        let software = RenderMethod::from_value(config.video.render_method as i64) == RenderMethod::Software;
        let filtering = config.video.filtering;
        if let Some(entry) = self.entry_mut(OptionId::Scanlines.into()) {
            entry.set_interactable(!software && filtering < 3);
        }
        if let Some(entry) = self.entry_mut(OptionId::Filtering.into()) {
            entry.set_interactable(!software);
        }
    }

    fn fill_sound_test(&mut self, services: &Services<'_>, config: &Configuration) {
        let mut tracks: Vec<SoundTestTrack> = services
            .audio
            .sound_test_tracks()
            .into_iter()
            .filter(|t| matches!(t.kind, TrackKind::Music | TrackKind::Jingle))
            .collect();
        tracks.sort_by(|a, b| a.key.cmp(&b.key));

        if let Some(entry) = self.entry_mut(OptionId::SoundTest.into()) {
            entry.options.clear();
            for (index, track) in tracks.iter().enumerate() {
                entry.add_option(&track.key, index as i64);
                if track.key.ends_with(FAST_TRACK_SUFFIX) && !config.system.dev_mode {
                    if let Some(option) = entry.options.last_mut() {
                        option.visible = false;
                    }
                }
            }
            entry.sanitize_selected_index();
        }
        self.sound_test_tracks = tracks;
    }

    fn capture_status(&mut self, services: &Services<'_>) {
        self.status = StatusSnapshot {
            update_state: services.update_check.state(),
            has_update: services.update_check.has_update(),
            available_version: services.update_check.available_version(),
            download_state: services.download.state(),
            bytes_downloaded: services.download.bytes_downloaded(),
            has_keyboard: services.input.has_keyboard(),
        };
    }

    // ── Input ──

    fn process_input(&mut self, services: &mut Services<'_>, stores: &mut BackingStores<'_>) {
        let vertical = services.input.just_pressed_or_repeat(Button::Up)
            || services.input.just_pressed_or_repeat(Button::Down);

        if self.focus == Focus::TabStrip && vertical {
            let entries = &mut self.tabs[self.active_tab.index()].entries;
            if let Some(index) = entries.first_interactable() {
                entries.selected_entry_index = index;
                self.focus = Focus::Content;
                services.audio.play_sound(SFX_MOVE);
            }
        } else {
            match self.focus {
                Focus::TabStrip => match self.tab_strip.update(&*services.input) {
                    UpdateResult::OptionChanged => {
                        let value = self.tab_strip[0].selected_value().unwrap_or(0);
                        if let Some(tab) = TabId::from_index(value as usize) {
                            self.active_tab = tab;
                            log::debug!("switched to tab {tab:?}");
                        }
                        services.audio.play_sound(SFX_TAB);
                    }
                    UpdateResult::EntryChanged => services.audio.play_sound(SFX_MOVE),
                    UpdateResult::None => {}
                },
                Focus::Content => {
                    let entries = &mut self.tabs[self.active_tab.index()].entries;
                    match entries.update(&*services.input) {
                        UpdateResult::EntryChanged => {
                            if entries.selected_entry_index == 0 {
                                self.focus = Focus::TabStrip;
                            }
                            services.audio.play_sound(SFX_MOVE);
                        }
                        UpdateResult::OptionChanged => {
                            services.audio.play_sound(SFX_MOVE);
                            self.commit(services, stores);
                        }
                        UpdateResult::None => {}
                    }
                }
            }
        }

        let input = &*services.input;
        let accept = [Button::Start, Button::A, Button::X].into_iter().any(|b| input.just_pressed(b));
        let back = [Button::Back, Button::B].into_iter().any(|b| input.just_pressed(b));
        if accept {
            if self.focus == Focus::Content {
                self.accept(services, stores);
            }
        } else if back {
            self.go_back(services, stores);
        }
    }

    /// The selected entry's option changed.
    fn commit(&mut self, services: &mut Services<'_>, stores: &mut BackingStores<'_>) {
        let Some(entry) = self.tabs[self.active_tab.index()].entries.selected() else {
            return;
        };
        let (Some(key), Some(value)) = (entry.key, entry.selected_value()) else {
            return;
        };
        log::debug!("option {key:?} set to {value}");
        let id = key.builtin();

        match id.and_then(effects::side_effect) {
            Some(SideEffect::Replace(handler)) => handler(self, services, stores, value),
            effect => {
                if let Some(startup) = self.entry(OptionId::WindowModeStartup.into()).and_then(MenuEntry::selected_value) {
                    stores.config.video.window_mode = startup as i32;
                }
                self.apply_selected(stores);
                if let Some(SideEffect::AfterApply(handler)) = effect {
                    handler(self, services, stores, value);
                }
                if self.entered_from_ingame && !self.showed_audio_warning && id.is_some_and(OptionId::is_music_choice) {
                    self.audio_warning_timeout = WARNING_DURATION;
                    self.showed_audio_warning = true;
                }
            }
        }
    }

    fn accept(&mut self, services: &mut Services<'_>, stores: &mut BackingStores<'_>) {
        let Some(entry) = self.tabs[self.active_tab.index()].entries.selected() else {
            return;
        };
        let Some(id) = entry.key.and_then(OptionKey::builtin) else {
            return;
        };
        let value = entry.selected_value().unwrap_or(0);
        if let Some(action) = effects::accept_action(id) {
            action(self, services, stores, value);
        }
    }

    // ── Rendering ──

    pub fn render(&mut self, drawer: &mut dyn Drawer, time: f32) {
        let mut anchor_x = 200;
        let mut alpha = 1.0;
        if !matches!(self.state, MenuState::Shown | MenuState::FadeToGame) {
            anchor_x += ((1.0 - self.visibility) * 300.0).round() as i32;
            alpha = self.visibility;
        }
        if alpha <= 0.0 {
            return;
        }

        let (width, height) = drawer.screen_size();
        let start_y = 30 - self.scrolling.offset();
        drawer.push_scissor(Rect::new(0, 30, width, height - 30));

        let first = self.active_tab_animated.floor().max(0.0) as usize;
        let last = (self.active_tab_animated.ceil() as usize).min(self.tabs.len() - 1);
        let mut selection_span = None;
        for tab_index in first..=last {
            let offset = tab_index as f32 - self.active_tab_animated;
            let tab_alpha = alpha * (1.0 - offset.abs());
            let base_x = anchor_x + (offset * 250.0).round() as i32;
            let tab = &self.tabs[tab_index];
            let content_focus = self.focus == Focus::Content && tab.id == self.active_tab;

            let mut ctx = RenderContext {
                drawer: &mut *drawer,
                status: &self.status,
                sound_test_tracks: &self.sound_test_tracks,
                time,
                x: base_x,
                y: start_y + 12,
                tab_alpha,
                is_selected: false,
                is_mods_tab: tab.id == TabId::Mods,
            };
            for (line, entry) in tab.entries.iter().enumerate().skip(1) {
                if !entry.is_visible() || (entry.is_title() && !title_is_shown(tab, line)) {
                    continue;
                }
                let y1 = ctx.y - start_y;
                ctx.is_selected = content_focus && line == tab.entries.selected_entry_index;
                render_entry(&mut ctx, entry);
                if ctx.is_selected {
                    selection_span = Some((y1 - 30, ctx.y - start_y + 45));
                }
                ctx.y += if ctx.is_mods_tab { 13 } else { 16 };
            }
        }
        drawer.pop_scissor();
        if let Some((y1, y2)) = selection_span {
            self.scrolling.set_current_selection(y1, y2);
        }

        self.render_tab_bar(drawer, anchor_x, alpha, time);
        if self.entered_from_ingame {
            self.render_notes(drawer, alpha);
        }
        drawer.perform_rendering();
    }

    fn render_tab_bar(&mut self, drawer: &mut dyn Drawer, anchor_x: i32, alpha: f32, time: f32) {
        drawer.draw_rect(Rect::new(anchor_x - 200, -6, 400, 48), Color::rgba(0.1, 0.15, 0.3, alpha * 0.9));

        let strip = &self.tab_strip[0];
        let focused = self.focus == Focus::TabStrip;
        let highlight = if focused { Color::YELLOW } else { Color::WHITE };
        for (k, option) in strip.options.iter().enumerate() {
            if !option.visible {
                continue;
            }
            let px = ((k as f32 - self.active_tab_animated) * 180.0).round() as i32 + anchor_x - 80;
            let color = if k == strip.selected_index {
                highlight.fade(alpha)
            } else {
                Color::rgba(0.9, 0.9, 0.9, alpha * 0.8)
            };
            drawer.print_text(FontId::TabTitle, Rect::new(px, 4, 160, 20), &option.text, Align::Center, color);
        }

        let index = strip.selected_index;
        let can_go_left = strip.options[..index].iter().any(|o| o.visible);
        let can_go_right = strip.options.iter().skip(index + 1).any(|o| o.visible);
        let distance = 77 + if focused { blink_offset(time) } else { 0 };
        let arrow_color = highlight.fade(alpha);
        if can_go_left {
            drawer.print_text(FontId::Regular, Rect::new(anchor_x - distance, 10, 0, 10), "<", Align::Center, arrow_color);
        }
        if can_go_right {
            drawer.print_text(FontId::Regular, Rect::new(anchor_x + distance, 10, 0, 10), ">", Align::Center, arrow_color);
        }

        if focused {
            self.scrolling.set_current_selection(0, 4);
        }
    }

    fn render_notes(&self, drawer: &mut dyn Drawer, alpha: f32) {
        for (timeout, text) in [(self.warning_timeout, HIDDEN_INGAME_NOTE), (self.audio_warning_timeout, MUSIC_CHANGE_NOTE)] {
            if timeout <= 0.0 {
                continue;
            }
            let shown = (timeout / 0.3).clamp(0.0, 1.0);
            let y = 210 + ((1.0 - shown) * 16.0).round() as i32;
            drawer.draw_rect(Rect::new(0, y, 400, 16), Color::rgba(1.0, 0.75, 0.5, alpha * 0.95));
            drawer.print_text(FontId::Small, Rect::new(0, y + 1, 400, 14), text, Align::Center, Color::rgba(1.0, 0.9, 0.8, alpha));

            drawer.draw_rect(Rect::new(0, y - 1, 400, 1), Color::rgba(0.4, 0.2, 0.0, alpha * 0.95));
            for (i, fade) in [0.9, 0.6, 0.3].into_iter().enumerate() {
                drawer.draw_rect(Rect::new(0, y - 2 - i as i32, 400, 1), Color::rgba(0.9, 0.9, 0.9, alpha * fade));
            }
        }
    }
}

/// Entry-specific visibility beyond the in-game and secret conditions.
fn should_be_shown(id: OptionId, services: &Services<'_>, config: &Configuration) -> bool {
    match id {
        OptionId::SoundtrackDownload => {
            config.audio.active_soundtrack == 1
                && services.download.is_supported()
                && !services.audio.has_remastered_soundtrack()
        }
        _ => true,
    }
}

/// Titles are only drawn above something selectable. The first title of a
/// tab with a secrets group also needs one of the secrets to be available.
fn title_is_shown(tab: &Tab, line: usize) -> bool {
    let entries = &tab.entries;
    let group = layout::secrets_group(tab.id);
    if line == 1 && !group.is_empty() {
        let any_secret = group
            .iter()
            .filter_map(|&id| entries.position(id.into()))
            .any(|i| entries[i].is_fully_interactable());
        if !any_secret {
            return false;
        }
    }
    let back = Some(OptionKey::from(OptionId::Back));
    entries
        .iter()
        .skip(line + 1)
        .take_while(|e| !e.is_title() && e.key != back)
        .any(MenuEntry::is_fully_interactable)
}

fn shorten_name(name: &str) -> String {
    if name.chars().count() > MAX_GAMEPAD_NAME {
        let short: String = name.chars().take(MAX_GAMEPAD_NAME - 2).collect();
        format!("{short}...")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{GameDatabase, PlayerProgress, SecretId};
    use crate::engine::testing::{DrawCall, Harness, RecordingDrawer};
    use crate::engine::{DownloadState, WindowMode};
    use crate::mods::tests::speedrun_mod;
    use crate::mods::{Mod, ModRegistry, ModSettingRef};

    const FRAME: f32 = 1.0 / 60.0;

    struct Fixture {
        harness: Harness,
        db: GameDatabase,
        progress: PlayerProgress,
        config: Configuration,
        mods: ModRegistry,
        menu: OptionsMenu,
    }

    fn track(key: &str, kind: TrackKind) -> SoundTestTrack {
        SoundTestTrack { key: key.to_string(), display_name: format!("Track {key}"), kind, modded: false }
    }

    impl Fixture {
        fn new(mods: Vec<Mod>) -> Self {
            let db = GameDatabase::initialize();
            let config = Configuration::defaults(&db);
            let mut harness = Harness::default();
            harness.audio.tracks = vec![
                track("2f", TrackKind::Music),
                track("01_fast", TrackKind::Music),
                track("01", TrackKind::Music),
                track("2a", TrackKind::Jingle),
                track("sfx_ring", TrackKind::SoundEffect),
            ];
            let mut fixture = Fixture {
                harness,
                db,
                progress: PlayerProgress::default(),
                config,
                mods: ModRegistry::new(mods),
                menu: OptionsMenu::new(false),
            };
            fixture.run(|menu, services, stores| menu.initialize(services, stores));
            fixture
        }

        fn run<R>(&mut self, f: impl FnOnce(&mut OptionsMenu, &mut Services<'_>, &mut BackingStores<'_>) -> R) -> R {
            let mut services = self.harness.services();
            let mut stores = BackingStores {
                db: &self.db,
                progress: &self.progress,
                config: &mut self.config,
                mods: &mut self.mods,
            };
            f(&mut self.menu, &mut services, &mut stores)
        }

        fn enter(&mut self, ingame: bool) {
            self.run(|menu, services, stores| {
                menu.setup(ingame, services, stores);
                menu.fade_in(services, stores);
            });
            self.frames(20);
        }

        fn frames(&mut self, count: usize) {
            for _ in 0..count {
                self.run(|menu, services, stores| menu.update(FRAME, services, stores));
                self.harness.input.clear();
            }
        }

        fn press(&mut self, button: Button) {
            self.harness.input.press(button);
            self.frames(1);
        }

        /// Put the cursor on an entry as if navigated there.
        fn focus_on(&mut self, key: impl Into<OptionKey>) {
            let key: OptionKey = key.into();
            let (tab, index) = self.menu.locations[&key];
            self.menu.active_tab = TabId::from_index(tab).unwrap();
            self.menu.active_tab_animated = tab as f32;
            self.menu.tab_strip[0].selected_index = tab;
            self.menu.tabs[tab].entries.selected_entry_index = index;
            self.menu.focus = Focus::Content;
        }

        fn entry(&self, id: OptionId) -> &MenuEntry {
            self.menu.entry(id.into()).unwrap()
        }

        fn render(&mut self) -> RecordingDrawer {
            let mut drawer = RecordingDrawer::default();
            self.menu.render(&mut drawer, 0.0);
            drawer
        }
    }

    #[test]
    fn fades_in_onto_the_tab_strip() {
        let mut f = Fixture::new(vec![]);
        assert_eq!(f.menu.base_state(), BaseState::Inactive);
        f.enter(false);
        assert_eq!(f.menu.state(), MenuState::Shown);
        assert_eq!(f.menu.base_state(), BaseState::Show);
        assert_eq!(f.menu.focus, Focus::TabStrip);
        assert_eq!(f.menu.active_tab(), TabId::System);
        assert_eq!(f.harness.audio.menu_music, Some(MENU_MUSIC));
    }

    #[test]
    fn tab_strip_skips_hidden_tabs() {
        let mut f = Fixture::new(vec![]);
        f.enter(false);
        f.press(Button::Left);
        assert_eq!(f.menu.active_tab(), TabId::System);
        f.press(Button::Right);
        assert_eq!(f.menu.active_tab(), TabId::Display);
        assert_eq!(f.harness.audio.sounds.last(), Some(&SFX_TAB));

        // The slide lags behind the selection
        assert!(f.menu.active_tab_animated < TabId::Display.index() as f32);
        f.frames(30);
        assert_eq!(f.menu.active_tab_animated, TabId::Display.index() as f32);

        let mut f = Fixture::new(vec![]);
        f.enter(true);
        assert_eq!(f.menu.active_tab(), TabId::Display);
        f.press(Button::Left);
        assert_eq!(f.menu.active_tab(), TabId::Display);
    }

    #[test]
    fn mods_tab_needs_mod_settings() {
        let mut f = Fixture::new(vec![]);
        assert!(!f.menu.has_any_mod_options());
        f.enter(false);
        assert!(!f.menu.tab_strip[0].options[TabId::Mods.index()].visible);

        let mut f = Fixture::new(vec![speedrun_mod()]);
        assert!(f.menu.has_any_mod_options());
        f.enter(false);
        f.press(Button::Left);
        assert_eq!(f.menu.active_tab(), TabId::Mods);

        // Mod values are loaded on entry and written back on commit
        let r = ModSettingRef { mod_index: 0, category: 0, setting: 0 };
        let (tab, index) = f.menu.locations[&OptionKey::Mod(r)];
        assert_eq!(f.menu.tabs[tab].entries[index].selected_value(), Some(1));
        f.focus_on(OptionKey::Mod(r));
        f.press(Button::Right);
        assert_eq!(f.mods.setting(r).unwrap().current_value, 2);
    }

    #[test]
    fn vertical_navigation_moves_between_strip_and_content() {
        let mut f = Fixture::new(vec![]);
        f.enter(false);
        f.press(Button::Down);
        assert_eq!(f.menu.focus, Focus::Content);
        let entries = &f.menu.tabs[TabId::System.index()].entries;
        assert_eq!(entries.selected_entry_index, entries.first_interactable().unwrap());
        assert_eq!(f.harness.audio.sounds.last(), Some(&SFX_MOVE));

        f.press(Button::Down);
        assert_eq!(f.menu.selected_option_id(), Some(OptionId::ReleaseChannel));
        f.press(Button::Up);
        f.press(Button::Up);
        assert_eq!(f.menu.focus, Focus::TabStrip);

        // Left/right on the strip don't touch the content list
        f.press(Button::Right);
        assert_eq!(f.menu.focus, Focus::TabStrip);
    }

    #[test]
    fn ingame_entry_hides_options_and_shows_note() {
        let mut f = Fixture::new(vec![]);
        f.run(|menu, services, stores| menu.setup(true, services, stores));
        assert_eq!(f.menu.warning_timeout, WARNING_DURATION);
        assert!(!f.entry(OptionId::LevelLayouts).is_visible());
        assert!(!f.entry(OptionId::SoundTest).is_visible());
        assert!(f.entry(OptionId::ExtraLifeJingle).is_visible());

        f.run(|menu, services, stores| menu.fade_in(services, stores));
        let mut last = f.menu.warning_timeout;
        for _ in 0..300 {
            f.frames(1);
            assert!(f.menu.warning_timeout <= last);
            last = f.menu.warning_timeout;
        }
        assert_eq!(last, 0.0);

        f.run(|menu, services, stores| menu.setup(false, services, stores));
        assert_eq!(f.menu.warning_timeout, 0.0);
        assert!(f.entry(OptionId::LevelLayouts).is_visible());
    }

    #[test]
    fn secret_entries_follow_progress() {
        let mut f = Fixture::new(vec![]);
        for _ in 0..2 {
            f.run(|menu, services, stores| menu.setup(false, services, stores));
            assert!(!f.entry(OptionId::DropDash).is_visible());
        }
        f.progress.unlock_secret(SecretId::Dropdash);
        for _ in 0..2 {
            f.run(|menu, services, stores| menu.setup(true, services, stores));
            assert!(f.entry(OptionId::DropDash).is_visible());
            assert!(!f.entry(OptionId::SuperPeelout).is_visible());
        }
    }

    #[test]
    fn display_options_reach_the_platform() {
        let mut f = Fixture::new(vec![]);
        f.enter(false);

        f.focus_on(OptionId::Renderer);
        f.press(Button::Left);
        assert_eq!(f.config.video.render_method, 1);
        assert_eq!(f.harness.platform.render_methods, [RenderMethod::OpenGlSoft]);

        f.focus_on(OptionId::FrameSync);
        f.press(Button::Right);
        assert_eq!(f.config.video.frame_sync, 2);
        assert_eq!(f.harness.platform.vsync, [2]);

        f.focus_on(OptionId::WindowMode);
        f.press(Button::Right);
        assert_eq!(f.harness.platform.window_mode, WindowMode::Fullscreen);
        assert_eq!(f.config.video.window_mode, 0);

        f.focus_on(OptionId::WindowModeStartup);
        f.press(Button::Right);
        f.press(Button::Right);
        assert_eq!(f.config.video.window_mode, 2);
    }

    #[test]
    fn software_renderer_disables_filters() {
        let mut f = Fixture::new(vec![]);
        f.enter(false);
        assert!(f.entry(OptionId::Scanlines).is_interactable());

        f.config.video.filtering = 3;
        f.frames(1);
        assert!(!f.entry(OptionId::Scanlines).is_interactable());
        assert!(f.entry(OptionId::Filtering).is_interactable());
        assert_eq!(f.entry(OptionId::Filtering).selected_value(), Some(3));

        f.config.video.filtering = 0;
        f.config.video.render_method = 0;
        f.frames(1);
        assert!(!f.entry(OptionId::Scanlines).is_interactable());
        assert!(!f.entry(OptionId::Filtering).is_interactable());
    }

    #[test]
    fn mobile_hides_window_modes() {
        let mut f = Fixture::new(vec![]);
        f.harness.platform.mobile = true;
        f.enter(false);
        assert!(!f.entry(OptionId::WindowMode).is_visible());
        assert!(!f.entry(OptionId::WindowModeStartup).is_visible());
    }

    #[test]
    fn gamepad_lists_follow_connections() {
        let mut f = Fixture::new(vec![]);
        f.enter(false);
        assert_eq!(f.entry(OptionId::ControllerPlayer1).options.len(), 1);

        f.harness.input.connect(7, "Wireless Controller With A Very Long Name");
        f.frames(1);
        let p1 = f.entry(OptionId::ControllerPlayer1);
        assert_eq!(p1.options.len(), 2);
        assert_eq!(p1.options[1].text, "Wireless Controller ...");
        assert_eq!(p1.options[1].value, 7);
        assert_eq!(p1.selected_index, 0);

        f.focus_on(OptionId::ControllerPlayer1);
        f.press(Button::Right);
        assert_eq!(f.harness.input.preferred[0], Some(7));

        // A new controller keeps player 1 on their pick
        f.harness.input.connect(9, "Pad");
        f.frames(1);
        assert_eq!(f.entry(OptionId::ControllerPlayer1).selected_value(), Some(7));
        assert_eq!(f.entry(OptionId::ControllerPlayer2).selected_value(), Some(-1));
        assert_eq!(f.entry(OptionId::ControllerPlayer2).options.len(), 3);

        f.press(Button::Left);
        assert_eq!(f.harness.input.preferred[0], None);
    }

    #[test]
    fn controller_options_side_effects() {
        let mut f = Fixture::new(vec![]);
        f.enter(false);

        f.focus_on(OptionId::ControllerAutoassign);
        f.press(Button::Right);
        assert_eq!(f.config.input.controller_autoassign, 1);
        assert_eq!(f.harness.input.reassignments, 1);

        f.focus_on(OptionId::ControllerRumbleP2);
        f.press(Button::Right);
        assert!((f.config.input.rumble[1] - 0.2).abs() < 1e-6);
        assert_eq!(f.harness.input.rumbles, [(1, 300)]);

        f.focus_on(OptionId::ControllerSetup);
        f.press(Button::A);
        assert_eq!(f.harness.audio.sounds.last(), Some(&0x63));
    }

    #[test]
    fn soundtrack_switch_restarts_music() {
        let mut f = Fixture::new(vec![]);
        f.harness.audio.remastered = true;
        f.enter(false);
        assert!(!f.entry(OptionId::SoundtrackDownload).is_visible());

        f.focus_on(OptionId::Soundtrack);
        f.press(Button::Left);
        assert_eq!(f.config.audio.active_soundtrack, 0);
        assert_eq!(f.harness.audio.soundtrack_changes, [0]);
        assert_eq!(f.harness.audio.restarts, 1);
        assert!(f.harness.audio.stopped.contains(&AudioContext::MenuMusic));
    }

    #[test]
    fn soundtrack_download_cycles_through_states() {
        let mut f = Fixture::new(vec![]);
        f.enter(false);
        assert!(f.entry(OptionId::SoundtrackDownload).is_visible());

        f.focus_on(OptionId::SoundtrackDownload);
        f.press(Button::A);
        assert_eq!(f.harness.download.state, DownloadState::Pending);
        assert_eq!(f.menu.status.download_state, DownloadState::Pending);
        f.press(Button::A);
        assert_eq!(f.harness.download.state, DownloadState::ReadyForDownload);

        f.harness.download.state = DownloadState::Done;
        f.press(Button::A);
        assert_eq!(f.harness.download.state, DownloadState::Loaded);

        // Emulated soundtrack needs no download
        f.focus_on(OptionId::Soundtrack);
        f.press(Button::Left);
        assert!(!f.entry(OptionId::SoundtrackDownload).is_visible());
    }

    #[test]
    fn sound_test_lists_music_and_speeds_up_fast_tracks() {
        let mut f = Fixture::new(vec![]);
        let keys: Vec<_> = f.entry(OptionId::SoundTest).options.iter().map(|o| (o.text.as_str(), o.visible)).collect();
        assert_eq!(keys, [("01", true), ("01_fast", false), ("2a", true), ("2f", true)]);

        let fast = track("01_fast", TrackKind::Music);
        f.config.audio.active_soundtrack = 0;
        f.run(|menu, services, stores| menu.play_sound_test(fast.clone(), services, stores.config));
        assert_eq!(f.harness.audio.played.last(), Some(&("01".to_string(), AudioContext::MenuMusic, FAST_TRACK_SPEED)));

        f.config.audio.active_soundtrack = 1;
        f.run(|menu, services, stores| menu.play_sound_test(fast.clone(), services, stores.config));
        assert_eq!(f.harness.audio.played.last(), Some(&("01_fast".to_string(), AudioContext::MenuMusic, 1.0)));
    }

    #[test]
    fn leaving_stops_sound_test_unless_menu_music() {
        let mut f = Fixture::new(vec![]);
        f.enter(false);
        f.focus_on(OptionId::SoundTest);
        f.press(Button::A);
        assert_eq!(f.menu.playing_sound_test.as_ref().map(|t| t.key.as_str()), Some("01"));
        let stops = f.harness.audio.stopped.len();
        f.press(Button::B);
        assert_eq!(f.harness.audio.stopped.len(), stops + 1);

        let mut f = Fixture::new(vec![]);
        f.enter(false);
        let menu_music = track(MENU_MUSIC_KEY, TrackKind::Music);
        f.run(|menu, services, stores| menu.play_sound_test(menu_music, services, stores.config));
        let stops = f.harness.audio.stopped.len();
        f.press(Button::B);
        assert_eq!(f.harness.audio.stopped.len(), stops);
    }

    #[test]
    fn music_change_in_game_warns_once() {
        let mut f = Fixture::new(vec![]);
        f.enter(true);
        f.focus_on(OptionId::ExtraLifeJingle);
        // The default is the last option, so step left to really change it
        f.press(Button::Left);
        assert!(f.menu.audio_warning_timeout > WARNING_DURATION - 0.1);
        assert!(f.menu.showed_audio_warning);

        f.frames(300);
        f.press(Button::Right);
        assert_eq!(f.menu.audio_warning_timeout, 0.0);

        let mut f = Fixture::new(vec![]);
        f.enter(false);
        f.focus_on(OptionId::ExtraLifeJingle);
        f.press(Button::Left);
        assert_eq!(f.menu.audio_warning_timeout, 0.0);
    }

    #[test]
    fn update_check_and_links() {
        let mut f = Fixture::new(vec![]);
        f.config.system.release_channel = 1;
        f.enter(false);

        f.focus_on(OptionId::CheckForUpdate);
        f.press(Button::A);
        assert_eq!(f.harness.update_check.started, [1]);

        f.focus_on(OptionId::ReleaseChannel);
        f.press(Button::Right);
        assert_eq!(f.config.system.release_channel, 2);
        assert_eq!(f.harness.update_check.resets, 1);

        f.harness.update_check.update = Some(0x2401_0900);
        f.focus_on(OptionId::CheckForUpdate);
        f.press(Button::X);
        f.focus_on(OptionId::OpenManual);
        f.press(Button::Start);
        assert_eq!(f.harness.platform.urls, ["https://sonic3air.org", effects::MANUAL_URL]);
    }

    #[test]
    fn going_back_saves_and_fades_out() {
        let mut f = Fixture::new(vec![speedrun_mod()]);
        let dir = std::env::temp_dir().join(format!("retromenu-options-{}", std::process::id()));
        f.config.path = Some(dir.join("config.toml"));
        f.enter(false);

        f.focus_on(OptionId::ScriptOptimization);
        f.press(Button::Right);
        assert_eq!(f.config.system.script_optimization, 0);
        f.press(Button::B);

        assert_eq!(f.menu.state(), MenuState::FadeToMenu);
        assert_eq!(f.menu.base_state(), BaseState::FadeOut);
        assert_eq!(f.harness.audio.sounds.last(), Some(&SFX_BACK));
        assert_eq!(f.harness.platform.script_reloads, 1);
        assert_eq!(f.harness.platform.exits, 1);
        assert_eq!(f.config.mod_settings["speedrun"]["timer_style"], 1);

        let saved = std::fs::read_to_string(dir.join("config.toml")).unwrap();
        let reloaded = Configuration::from_toml_str(&saved, &f.db).unwrap();
        assert_eq!(reloaded.system.script_optimization, 0);
        let _ = std::fs::remove_dir_all(&dir);

        assert!(!f.menu.can_be_removed());
        f.frames(20);
        assert_eq!(f.menu.state(), MenuState::Inactive);
        assert_eq!(f.harness.platform.faded_out, 1);
        assert!(f.menu.can_be_removed());
    }

    #[test]
    fn going_back_from_game_returns_to_game() {
        let mut f = Fixture::new(vec![]);
        f.enter(true);
        f.press(Button::Back);
        assert_eq!(f.menu.state(), MenuState::FadeToGame);
        assert_eq!(f.harness.platform.script_reloads, 0);
        f.focus_on(OptionId::Back);
        f.menu.set_base_state(BaseState::Show);
        f.press(Button::A);
        assert_eq!(f.menu.state(), MenuState::FadeToGame);
        assert_eq!(f.harness.platform.exits, 2);
    }

    #[test]
    fn renders_tab_bar_and_content() {
        let mut f = Fixture::new(vec![]);
        assert!(f.render().calls.is_empty());

        f.enter(false);
        let drawer = f.render();
        assert!(drawer.has_text("SYSTEM"));
        assert!(drawer.has_text("DISPLAY"));
        assert!(!drawer.has_text("MODS"));
        assert!(drawer.has_text("* Update *"));
        assert!(drawer.has_text("Check for updates"));
        assert!(!drawer.has_text(HIDDEN_INGAME_NOTE));
        assert!(drawer.scissors.is_empty());
        assert_eq!(drawer.max_scissor_depth, 1);
        assert_eq!(drawer.frames, 1);
    }

    fn tab_arrows(drawer: &RecordingDrawer) -> (bool, bool) {
        let arrow = |glyph: &str| {
            drawer.calls.iter().any(|c| matches!(c, DrawCall::Text { text, rect, .. } if text == glyph && rect.y == 10))
        };
        (arrow("<"), arrow(">"))
    }

    #[test]
    fn entering_again_scrolls_back_to_the_top() {
        let mut f = Fixture::new(vec![]);
        f.enter(false);
        f.menu.scrolling.set_current_selection(400, 460);
        f.frames(60);
        assert!(f.menu.scrolling.offset() > 0);

        f.run(|menu, services, stores| menu.setup(false, services, stores));
        assert_eq!(f.menu.scrolling.offset(), 0);
    }

    #[test]
    fn tab_arrows_only_point_at_visible_tabs() {
        let mut f = Fixture::new(vec![]);
        f.enter(false);
        assert_eq!(tab_arrows(&f.render()), (false, true));

        let last = f.menu.tab_strip[0].options.len() - 1;
        f.menu.tab_strip[0].options[last].visible = false;
        f.menu.tab_strip[0].selected_index = last - 1;
        assert_eq!(tab_arrows(&f.render()), (true, false));
    }

    #[test]
    fn secrets_title_needs_an_unlocked_secret() {
        let mut f = Fixture::new(vec![]);
        f.enter(false);
        f.focus_on(OptionId::ControllerSetup);
        let drawer = f.render();
        assert!(!drawer.has_text("* Unlocked by secrets *"));
        assert!(drawer.has_text("* Controls *"));
        assert!(drawer.has_text("Set up keyboard and controllers..."));

        f.progress.unlock_secret(SecretId::SuperPeelout);
        f.run(|menu, services, stores| menu.setup(false, services, stores));
        let drawer = f.render();
        assert!(drawer.has_text("* Unlocked by secrets *"));
        assert!(drawer.has_text("Sonic Super Peel-Out:"));
    }

    #[test]
    fn ingame_note_is_drawn() {
        let mut f = Fixture::new(vec![]);
        f.enter(true);
        let drawer = f.render();
        assert!(drawer.has_text(HIDDEN_INGAME_NOTE));
        assert!(!drawer.has_text("SYSTEM"));
    }

    #[test]
    fn long_gamepad_names_are_shortened() {
        assert_eq!(shorten_name("Pad"), "Pad");
        assert_eq!(shorten_name("0123456789012345678901"), "0123456789012345678901");
        assert_eq!(shorten_name("01234567890123456789012"), "01234567890123456789...");
    }
}
