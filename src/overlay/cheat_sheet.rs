//! Hotkey cheat sheet, toggled with F1.

use crate::engine::{Align, Color, Drawer, FontId, Rect};

/// Seconds for a full fade in or out.
const FADE_TIME: f32 = 0.1;
const WIDTH: i32 = 330;
const ROW_HEIGHT: i32 = 18;

pub const TITLE: &str = "Hotkey overview - show/hide with F1";

const HOTKEYS: &[(&str, &str)] = &[
    ("Alt+Enter", "Toggle fullscreen"),
    ("Alt+F/G",   "Change upscaling method"),
    ("Alt+H",     "Change frame sync method"),
    ("Alt+B",     "Change background blur"),
    ("Alt+P",     "Change performance display"),
    ("F2",        "Save game recording for debugging"),
    ("F3",        "Rescan connected controllers"),
    ("F4",        "Swap player 1/2 controllers"),
];

const DEV_HOTKEYS: &[(&str, &str)] = &[
    ("F5",        "Save state"),
    ("F7",        "Reload last state"),
    ("F8",        "Load state"),
    ("F10",       "Reload resources"),
    ("F11",       "Reload scripts"),
    ("0..9",      "Debug keys (can be queried in scripts)"),
    (",",         "Show plane B content"),
    (".",         "Show plane A content"),
    ("-",         "Show VRAM content"),
    ("Tab",       "Dump shown plane, VRAM or palette"),
    ("Alt+1..8",  "Toggle layer rendering"),
    ("Alt+M",     "Toggle palette display"),
    ("Alt+R",     "Change render method"),
    ("Alt+T",     "Toggle abstracted level rendering"),
    ("Alt+V",     "Toggle debug visualization"),
    ("Alt+C",     "Cycle debug visualizations"),
];

#[derive(Debug, Default)]
pub struct CheatSheetOverlay {
    should_be_shown: bool,
    visibility: f32,
    developer_features: bool,
}

impl CheatSheetOverlay {
    pub fn new(developer_features: bool) -> Self {
        CheatSheetOverlay { developer_features, ..Default::default() }
    }

    pub fn set_shown(&mut self, shown: bool) {
        self.should_be_shown = shown;
    }

    pub fn toggle(&mut self) {
        self.should_be_shown = !self.should_be_shown;
    }

    pub fn is_shown(&self) -> bool {
        self.should_be_shown
    }

    pub fn visibility(&self) -> f32 {
        self.visibility
    }

    pub fn update(&mut self, dt: f32) {
        let step = dt / FADE_TIME;
        self.visibility = if self.should_be_shown {
            (self.visibility + step).min(1.0)
        } else {
            (self.visibility - step).max(0.0)
        };
    }

    fn rows(&self) -> impl Iterator<Item = &'static (&'static str, &'static str)> {
        let dev: &[_] = if self.developer_features { DEV_HOTKEYS } else { &[] };
        HOTKEYS.iter().chain(dev.iter())
    }

    fn rect(&self, screen: (i32, i32)) -> Rect {
        let rows = self.rows().count() as i32;
        let h = 58 + rows * ROW_HEIGHT;
        let x = ((screen.0 - WIDTH) as f32 * 0.95).round() as i32;
        let y = ((screen.1 - h) as f32 * (1.0 - self.visibility * 0.1)).round() as i32;
        Rect::new(x, y, WIDTH, h)
    }

    pub fn render(&self, drawer: &mut dyn Drawer) {
        if self.visibility <= 0.0 {
            return;
        }
        let alpha = self.visibility;
        let white = Color::WHITE.fade(alpha);

        let rect = self.rect(drawer.screen_size());
        drawer.draw_rect(rect, Color::rgba(0.1, 0.1, 0.1, alpha * 0.6));

        let mut line = Rect::new(rect.x + 20, rect.y + 16, 40, 20);
        drawer.print_text(FontId::Debug, line, TITLE, Align::TopLeft, Color::rgba(0.5, 1.0, 1.0, alpha));
        line.y += 26;

        for (i, (key, description)) in self.rows().enumerate() {
            if i == HOTKEYS.len() {
                line.y += 8;
            }
            drawer.print_text(FontId::Debug, line, key, Align::TopLeft, white);
            drawer.print_text(FontId::Debug, line.offset(65, 0), description, Align::TopLeft, white);
            line.y += ROW_HEIGHT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{DrawCall, RecordingDrawer};

    #[test]
    fn fades_in_over_a_tenth_of_a_second() {
        let mut overlay = CheatSheetOverlay::new(false);
        overlay.toggle();
        overlay.update(0.05);
        assert!((overlay.visibility() - 0.5).abs() < 1e-5);
        overlay.update(0.2);
        assert_eq!(overlay.visibility(), 1.0);
        overlay.set_shown(false);
        overlay.update(1.0);
        assert_eq!(overlay.visibility(), 0.0);
    }

    #[test]
    fn hidden_overlay_draws_nothing() {
        let overlay = CheatSheetOverlay::new(true);
        let mut drawer = RecordingDrawer::default();
        overlay.render(&mut drawer);
        assert!(drawer.calls.is_empty());
    }

    #[test]
    fn developer_rows_only_in_dev_mode() {
        for (dev, rows) in [(false, 8), (true, 24)] {
            let mut overlay = CheatSheetOverlay::new(dev);
            overlay.set_shown(true);
            overlay.update(1.0);
            let mut drawer = RecordingDrawer::default();
            overlay.render(&mut drawer);

            assert!(drawer.has_text(TITLE));
            assert_eq!(drawer.has_text("Reload scripts"), dev);
            // Title plus key and description per row
            assert_eq!(drawer.texts().len(), 1 + rows * 2);

            let Some(DrawCall::Rect(background, _)) = drawer.calls.first().cloned() else {
                panic!("background missing");
            };
            assert_eq!(background.w, 330);
            assert_eq!(background.h, 58 + rows as i32 * 18);
        }
    }
}
