//! Per-entry rendering.
//!
//! Each entry kind draws itself at the context's cursor and advances the
//! cursor's y coordinate past whatever it drew.

use crate::engine::{
    version_string, Align, Color, DownloadState, Drawer, FontId, Rect, SoundTestTrack, UpdateCheckState,
};

use super::entries::{EntryKind, MenuEntry};
use super::option_id::OptionId;

const GAME_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));
const NOT_AVAILABLE: &str = "not available";

/// Collaborator state the entries display, captured once per update so
/// rendering needs no services.
#[derive(Clone, Debug)]
pub struct StatusSnapshot {
    pub update_state: UpdateCheckState,
    pub has_update: bool,
    pub available_version: Option<u32>,
    pub download_state: DownloadState,
    pub bytes_downloaded: u64,
    pub has_keyboard: bool,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        StatusSnapshot {
            update_state: UpdateCheckState::Inactive,
            has_update: false,
            available_version: None,
            download_state: DownloadState::ReadyForDownload,
            bytes_downloaded: 0,
            has_keyboard: true,
        }
    }
}

pub struct RenderContext<'a> {
    pub drawer: &'a mut dyn Drawer,
    pub status: &'a StatusSnapshot,
    pub sound_test_tracks: &'a [SoundTestTrack],
    /// Seconds since start, drives the arrow blinking.
    pub time: f32,
    pub x: i32,
    pub y: i32,
    pub tab_alpha: f32,
    pub is_selected: bool,
    pub is_mods_tab: bool,
}

impl RenderContext<'_> {
    /// Arrow offset bouncing 0..3 and back, six steps per second.
    pub fn blink_offset(&self) -> i32 {
        blink_offset(self.time)
    }
}

pub fn blink_offset(time: f32) -> i32 {
    let offset = (time * 6.0).rem_euclid(6.0) as i32;
    if offset > 3 { 6 - offset } else { offset }
}

fn point(x: i32, y: i32) -> Rect {
    Rect::new(x, y, 0, 10)
}

pub fn render_entry(ctx: &mut RenderContext<'_>, entry: &MenuEntry) {
    ctx.y += entry.margin_above;
    match &entry.kind {
        EntryKind::Dummy => {}
        EntryKind::Title => render_title(ctx, &entry.text),
        EntryKind::Section => render_section(ctx, &entry.text),
        EntryKind::Label { color } => render_label(ctx, &entry.text, *color),
        EntryKind::Options | EntryKind::Soundtrack => render_options(ctx, entry, None, Color::WHITE, Color::YELLOW),
        EntryKind::AdvancedOption { default_value } => render_advanced(ctx, entry, *default_value),
        EntryKind::UpdateCheck => render_update_check(ctx, entry),
        EntryKind::SoundtrackDownload => render_soundtrack_download(ctx, entry),
    }
    ctx.y += entry.margin_below;
}

// ── Decoration ──

pub fn render_title(ctx: &mut RenderContext<'_>, text: &str) {
    ctx.y += 15;
    let color = Color::rgba(0.6, 0.8, 1.0, ctx.tab_alpha);
    ctx.drawer.print_text(FontId::Regular, point(ctx.x, ctx.y), &format!("* {text} *"), Align::Center, color);
    ctx.y += 2;
}

pub fn render_section(ctx: &mut RenderContext<'_>, text: &str) {
    let alpha = ctx.tab_alpha;
    let line = Color::rgba(0.7, 1.0, 0.9, alpha);
    let shadow = Color::rgba(0.0, 0.0, 0.0, alpha * 0.75);
    let (x, y) = (ctx.x, ctx.y + 14);

    let width = ctx.drawer.text_width(FontId::Regular, text);
    ctx.drawer.print_text(FontId::Regular, point(x - 140, y), text, Align::Left, line);
    ctx.drawer.draw_rect(Rect::new(x - 185, y + 4, 40, 1), line);
    ctx.drawer.draw_rect(Rect::new(x - 184, y + 5, 40, 1), shadow);
    ctx.drawer.draw_rect(Rect::new(x - 135 + width, y + 4, 320 - width, 1), line);
    ctx.drawer.draw_rect(Rect::new(x - 134 + width, y + 5, 320 - width, 1), shadow);
    ctx.y = y + 7;
}

pub fn render_label(ctx: &mut RenderContext<'_>, text: &str, color: Color) {
    ctx.y -= 1;
    let (_, box_height) = ctx.drawer.text_box_size(FontId::Tiny, text);
    ctx.drawer.print_text(FontId::Tiny, point(ctx.x, ctx.y), text, Align::Center, color.fade(ctx.tab_alpha));
    ctx.y += box_height - 4;
}

// ── Options ──

/// Shared options rendering. `button_text` overrides the entry text for
/// entries whose caption follows collaborator state.
pub fn render_options(
    ctx: &mut RenderContext<'_>,
    entry: &MenuEntry,
    button_text: Option<&str>,
    normal: Color,
    selected: Color,
) {
    let font = if entry.small_font || ctx.is_mods_tab { FontId::Small } else { FontId::Regular };
    let disabled = !entry.is_interactable();
    let color = if ctx.is_selected {
        selected
    } else if disabled {
        Color::rgb(0.4, 0.4, 0.4)
    } else {
        normal
    };
    let color = color.fade(ctx.tab_alpha);
    let id = entry.key.and_then(|k| k.builtin());
    let x = ctx.x;

    if entry.options.is_empty() {
        // Plain button
        if id == Some(OptionId::Back) {
            ctx.y += 16;
        }
        let text = match id {
            Some(OptionId::ControllerSetup) if ctx.status.has_keyboard => "Set up keyboard and controllers...",
            Some(OptionId::ControllerSetup) => "Set up controllers...",
            _ => button_text.unwrap_or(entry.text.as_str()),
        };
        ctx.drawer.print_text(font, point(x, ctx.y), text, Align::Center, color);

        if ctx.is_selected {
            let half_width = ctx.drawer.text_width(font, text) / 2;
            let distance = 16 + ctx.blink_offset();
            ctx.drawer.print_text(font, point(x - half_width - distance, ctx.y), ">>", Align::Center, color);
            ctx.drawer.print_text(font, point(x + half_width + distance, ctx.y), "<<", Align::Center, color);
        }
        if id == Some(OptionId::ControllerSetup) {
            ctx.y += 4;
        }
        return;
    }

    let can_go_left = !disabled && entry.selected_index > 0;
    let can_go_right = !disabled && entry.selected_index + 1 < entry.options.len();
    let center = if entry.text.is_empty() { x } else { x + 88 };
    let mut arrow_distance = 75;
    if ctx.is_selected {
        arrow_distance += ctx.blink_offset();
    }

    if !entry.text.is_empty() {
        ctx.drawer.print_text(font, point(x - 40, ctx.y), &entry.text, Align::Right, color);
    }

    let mut value = if disabled && id != Some(OptionId::Renderer) {
        NOT_AVAILABLE.to_string()
    } else {
        entry.selected().map(|o| o.text.clone()).unwrap_or_default()
    };
    let track = if id == Some(OptionId::SoundTest) {
        entry.selected_value().and_then(|v| ctx.sound_test_tracks.get(v as usize))
    } else {
        None
    };
    if track.is_some_and(|t| t.modded) {
        value.push_str(" (modded)");
    }
    ctx.drawer.print_text(font, Rect::new(center - 80, ctx.y, 160, 10), &value, Align::Center, color);

    if can_go_left {
        ctx.drawer.print_text(font, point(center - arrow_distance, ctx.y), "<", Align::Center, color);
    }
    if can_go_right {
        ctx.drawer.print_text(font, point(center + arrow_distance, ctx.y), ">", Align::Center, color);
    }

    if let Some(track) = track {
        ctx.y += 13;
        ctx.drawer.print_text(FontId::Tiny, Rect::new(center - 80, ctx.y, 160, 10), &track.display_name, Align::Center, color);
    }
}

/// Options entry tinted while set away from its default.
pub fn render_advanced(ctx: &mut RenderContext<'_>, entry: &MenuEntry, default_value: i64) {
    let is_default = entry.selected_value() == Some(default_value);
    let (normal, selected) = if is_default {
        (Color::WHITE, Color::YELLOW)
    } else {
        (Color::rgb(1.0, 0.5, 0.5), Color::rgb(1.0, 0.75, 0.0))
    };
    render_options(ctx, entry, None, normal, selected);
    ctx.y -= 1;
}

pub fn render_update_check(ctx: &mut RenderContext<'_>, entry: &MenuEntry) {
    let alpha = ctx.tab_alpha;
    let x = ctx.x;
    let status = ctx.status;

    ctx.drawer.print_text(FontId::Small, point(x - 100, ctx.y), "Your game version:", Align::Left, Color::WHITE.fade(alpha));
    ctx.drawer.print_text(FontId::Small, point(x + 100, ctx.y), GAME_VERSION, Align::Right, Color::rgba(0.8, 1.0, 0.8, alpha));
    ctx.y += 12;

    let y = ctx.y;
    match status.update_state {
        UpdateCheckState::Failed => {
            ctx.drawer.print_text(FontId::Small, point(x, y), "Can't connect to server", Align::Center, Color::rgba(1.0, 0.0, 0.0, alpha));
        }
        UpdateCheckState::SendQuery | UpdateCheckState::WaitingForResponse => {
            ctx.drawer.print_text(FontId::Small, point(x, y), "Connecting to server...", Align::Center, Color::WHITE.fade(alpha));
        }
        UpdateCheckState::HasResponse if status.has_update => {
            let version = status.available_version.map(version_string).unwrap_or_default();
            ctx.drawer.print_text(FontId::Small, point(x - 100, y), "Update available:", Align::Left, Color::WHITE.fade(alpha));
            ctx.drawer.print_text(FontId::Small, point(x + 100, y), &version, Align::Right, Color::rgba(1.0, 1.0, 0.6, alpha));
        }
        UpdateCheckState::HasResponse => {
            ctx.drawer.print_text(FontId::Small, point(x, y), "You're using the latest version", Align::Center, Color::rgba(0.8, 1.0, 0.8, alpha));
        }
        UpdateCheckState::Inactive => {
            ctx.drawer.print_text(FontId::Small, point(x, y), "Ready to check for updates", Align::Center, Color::rgba(0.8, 0.8, 0.8, alpha));
        }
    }
    ctx.y += 20;

    let button = if status.has_update { "Open download page" } else { "Check for updates" };
    render_options(ctx, entry, Some(button), Color::WHITE, Color::YELLOW);
}

pub fn render_soundtrack_download(ctx: &mut RenderContext<'_>, entry: &MenuEntry) {
    let status = ctx.status;
    let (text, button) = match status.download_state {
        DownloadState::Loaded => return,
        DownloadState::ReadyForDownload => ("Download the remastered soundtrack now? (126 MB)".to_string(), "Start download"),
        DownloadState::Pending => ("Waiting for download...".to_string(), "Stop download"),
        DownloadState::Running => (format!("Downloading... {} MB", status.bytes_downloaded / (1024 * 1024)), "Stop download"),
        DownloadState::Done => ("Download complete".to_string(), "Load soundtrack"),
        DownloadState::Failed => ("Download failed".to_string(), "Restart download"),
    };

    let center = ctx.x;
    let color = Color::rgba(0.8, 1.0, 0.9, ctx.tab_alpha);
    ctx.drawer.print_text(FontId::Tiny, Rect::new(center - 80, ctx.y, 160, 10), &text, Align::Center, color);
    ctx.y += 12;

    let mut small = entry.clone();
    small.small_font = true;
    render_options(ctx, &small, Some(button), Color::WHITE, Color::YELLOW);
    ctx.y += 3;
}
